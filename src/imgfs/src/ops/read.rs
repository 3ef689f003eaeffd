use crate::error::{ImgFsError, Result};
use crate::ops::lazy_resize::lazy_resize;
use crate::store::{Resolution, Store};
use log::debug;

/// Reads the bytes of `img_id` at the requested resolution, lazily
/// materialising it first if needed (spec.md §4.2.3).
pub fn read(store: &mut Store, img_id: &str, resolution: Resolution) -> Result<Vec<u8>> {
    let i = store.find_by_id(img_id).ok_or(ImgFsError::ImageNotFound)?;

    if store.metadata[i].size[resolution.index()] == 0 && !matches!(resolution, Resolution::Orig) {
        lazy_resize(store, i, resolution)?;
    }

    let size = store.metadata[i].size[resolution.index()];
    let offset = store.metadata[i].offset[resolution.index()];
    debug!("read({}, {:?}) -> {} bytes at {}", img_id, resolution, size, offset);
    store.read_payload(offset, size)
}
