use crate::error::{ImgFsError, Result};
use crate::ops::dedup::dedup;
use crate::store::{MetadataRecord, Resolution, Store, Validity, MAX_IMG_ID};
use log::{error, info};
use sha2::{Digest, Sha256};

/// Inserts a new image under `img_id`, deduplicating by content hash
/// against every existing slot (spec.md §4.2.2).
pub fn insert(store: &mut Store, img_id: &str, bytes: &[u8]) -> Result<()> {
    if img_id.is_empty() || img_id.len() > MAX_IMG_ID - 1 {
        return Err(ImgFsError::InvalidImgId);
    }
    if bytes.is_empty() {
        return Err(ImgFsError::InvalidArgument);
    }
    if store.header.nb_files == store.header.max_files {
        return Err(ImgFsError::ImgfsFull);
    }

    let i = store.find_empty_slot().ok_or(ImgFsError::ImgfsFull)?;
    let previous = store.metadata[i].clone();

    let sha = {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    };
    let (width, height) = crate::codec::dimensions(bytes)?;

    store.metadata[i] = MetadataRecord {
        img_id: img_id.to_string(),
        sha,
        orig_res: (width, height),
        size: [0, 0, bytes.len() as u32],
        offset: [0, 0, 0],
        is_valid: Validity::NonEmpty,
    };

    if let Err(err) = dedup(store, i) {
        store.metadata[i] = previous;
        error!("insert({}) rejected: {}", img_id, err);
        return Err(err);
    }

    let orig = Resolution::Orig.index();
    if store.metadata[i].offset[orig] == 0 {
        let offset = store.append_payload(bytes)?;
        store.metadata[i].offset[orig] = offset;
    }

    store.header.nb_files += 1;
    store.header.version += 1;
    store.write_header()?;
    store.write_metadata(i)?;

    info!("inserted {} into slot {}", img_id, i);
    Ok(())
}
