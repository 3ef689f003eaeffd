use crate::codec;
use crate::error::Result;
use crate::store::{Resolution, Store};
use log::debug;

/// Materialises a derived resolution on first read and caches it in the
/// payload region (spec.md §4.2.4). No-op if the slot already has that
/// resolution materialised. Never bumps `version`: lazy materialisation is
/// invisible cache work, not a logical mutation of the store.
pub fn lazy_resize(store: &mut Store, i: usize, resolution: Resolution) -> Result<()> {
    debug_assert!(matches!(resolution, Resolution::Thumb | Resolution::Small));

    if store.metadata[i].size[resolution.index()] != 0 {
        return Ok(());
    }

    let orig = Resolution::Orig.index();
    let orig_offset = store.metadata[i].offset[orig];
    let orig_size = store.metadata[i].size[orig];

    let original_bytes = store.read_payload(orig_offset, orig_size)?;
    let image = codec::decode(&original_bytes)?;

    let (target_w, target_h) = match resolution {
        Resolution::Thumb => store.header.thumb_res(),
        Resolution::Small => store.header.small_res(),
        Resolution::Orig => unreachable!("lazy_resize is never called for ORIG"),
    };
    let resized = codec::thumbnail(&image, target_w, target_h);
    let encoded = codec::encode(&resized)?;

    let offset = store.append_payload(&encoded)?;
    store.metadata[i].size[resolution.index()] = encoded.len() as u32;
    store.metadata[i].offset[resolution.index()] = offset;
    store.write_metadata(i)?;

    debug!(
        "lazily resized slot {} to {:?} ({} bytes at offset {})",
        i,
        resolution,
        encoded.len(),
        offset
    );
    Ok(())
}
