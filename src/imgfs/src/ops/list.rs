use crate::store::Store;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Stdout,
    Json,
}

/// `list(F, mode) → output` (spec.md §4.2.1): dispatches to the
/// human-readable or JSON rendering of the store's contents. Never mutates.
pub fn list(store: &Store, mode: ListMode) -> String {
    match mode {
        ListMode::Stdout => list_stdout(store),
        ListMode::Json => list_json(store),
    }
}

/// The wire shape of the `/imgfs/list` JSON body: `{"Images": [...]}`
/// (spec.md §4.3).
#[derive(Debug, Serialize)]
pub struct ListingJson {
    #[serde(rename = "Images")]
    pub images: Vec<String>,
}

/// Lists every valid slot's `img_id`s, never mutating the store (spec.md
/// §4.2.1).
pub fn list_ids(store: &Store) -> Vec<String> {
    let mut seen = 0u32;
    let mut ids = Vec::new();
    for record in &store.metadata {
        if seen >= store.header.nb_files {
            break;
        }
        if record.is_valid() {
            seen += 1;
            ids.push(record.img_id.clone());
        }
    }
    ids
}

fn list_json(store: &Store) -> String {
    let listing = ListingJson {
        images: list_ids(store),
    };
    serde_json::to_string(&listing).expect("ListingJson serialisation is infallible")
}

/// Human-readable dump of the header plus every valid metadata record, in
/// increasing slot index order (spec.md §4.2.1).
fn list_stdout(store: &Store) -> String {
    let mut out = String::new();
    write_header(&mut out, store);

    let mut seen = 0u32;
    for record in &store.metadata {
        if seen >= store.header.nb_files {
            break;
        }
        if record.is_valid() {
            seen += 1;
            write_metadata(&mut out, record);
        }
    }

    if seen == 0 {
        let _ = writeln!(out, "<< empty imgFS >>");
    }
    out
}

fn write_header(out: &mut String, store: &Store) {
    let header = &store.header;
    let _ = writeln!(out, "*****************************************");
    let _ = writeln!(out, "********** IMGFS HEADER START ***********");
    let _ = writeln!(out, "TYPE: {}", header.name);
    let _ = writeln!(out, "VERSION: {}", header.version);
    let _ = writeln!(
        out,
        "IMAGE COUNT: {}\t\tMAX IMAGES: {}",
        header.nb_files, header.max_files
    );
    let (tw, th) = header.thumb_res();
    let (sw, sh) = header.small_res();
    let _ = writeln!(out, "THUMBNAIL: {} x {}\tSMALL: {} x {}", tw, th, sw, sh);
    let _ = writeln!(out, "*********** IMGFS HEADER END ************");
    let _ = writeln!(out, "*****************************************");
}

fn write_metadata(out: &mut String, record: &crate::store::MetadataRecord) {
    use crate::store::Resolution;
    let sha_hex: String = record.sha.iter().map(|b| format!("{:02x}", b)).collect();
    let _ = writeln!(out, "IMAGE ID: {}", record.img_id);
    let _ = writeln!(out, "SHA: {}", sha_hex);
    let _ = writeln!(out, "VALID: {}", record.is_valid() as u16);
    let orig = Resolution::Orig.index();
    let thumb = Resolution::Thumb.index();
    let small = Resolution::Small.index();
    let _ = writeln!(
        out,
        "OFFSET ORIG. : {}\t\tSIZE ORIG. : {}",
        record.offset[orig], record.size[orig]
    );
    let _ = writeln!(
        out,
        "OFFSET THUMB.: {}\t\tSIZE THUMB.: {}",
        record.offset[thumb], record.size[thumb]
    );
    let _ = writeln!(
        out,
        "OFFSET SMALL : {}\t\tSIZE SMALL : {}",
        record.offset[small], record.size[small]
    );
    let _ = writeln!(out, "ORIGINAL: {} x {}", record.orig_res.0, record.orig_res.1);
    let _ = writeln!(out, "*****************************************");
}
