//! The five core operations and the two algorithms they share (spec.md
//! §4.2).

mod create;
mod dedup;
mod delete;
mod insert;
mod lazy_resize;
mod list;
mod read;

pub use create::{create, CreateOptions, DEFAULT_MAX_FILES, DEFAULT_SMALL_RES, DEFAULT_THUMB_RES, MAX_SMALL_RES, MAX_THUMB_RES};
pub use delete::delete;
pub use insert::insert;
pub use list::{list, list_ids, ListMode, ListingJson};
pub use read::read;
