use crate::error::{ImgFsError, Result};
use crate::store::Store;
use log::debug;

/// Scans every other valid slot for a matching `img_id` (fails with
/// `DuplicateId`) or a matching content hash (copies `offset`/`size` for
/// every resolution and signals the caller not to append the payload again).
/// The scan covers all `max_files` slots, not just `nb_files`, since holes
/// from prior deletes can appear below the last valid index; the first
/// content match encountered wins (spec.md §4.2.5).
pub fn dedup(store: &mut Store, i: usize) -> Result<()> {
    let img_id = store.metadata[i].img_id.clone();
    let sha = store.metadata[i].sha;

    let mut content_match: Option<usize> = None;
    for j in 0..store.metadata.len() {
        if j == i || !store.metadata[j].is_valid() {
            continue;
        }
        if store.metadata[j].img_id == img_id {
            return Err(ImgFsError::DuplicateId);
        }
        if content_match.is_none() && store.metadata[j].sha == sha {
            content_match = Some(j);
        }
    }

    match content_match {
        Some(j) => {
            debug!("dedup: slot {} shares content with slot {}", i, j);
            let offset = store.metadata[j].offset;
            let size = store.metadata[j].size;
            store.metadata[i].offset = offset;
            store.metadata[i].size = size;
        }
        None => {
            store.metadata[i].offset[crate::store::Resolution::Orig.index()] = 0;
        }
    }

    Ok(())
}
