use crate::error::{ImgFsError, Result};
use crate::store::{Store, Validity};
use log::info;

/// Invalidates the slot matching `img_id`. Payload bytes are never
/// reclaimed; a later insert may reuse the slot but not its old payload
/// ranges (spec.md §4.2.6).
pub fn delete(store: &mut Store, img_id: &str) -> Result<()> {
    let i = store.find_by_id(img_id).ok_or(ImgFsError::ImageNotFound)?;

    store.metadata[i].is_valid = Validity::Empty;
    store.write_metadata(i)?;

    store.header.nb_files -= 1;
    store.header.version += 1;
    store.write_header()?;

    info!("deleted {} (slot {})", img_id, i);
    Ok(())
}
