use crate::error::{ImgFsError, Result};
use crate::store::{Header, Store};
use std::path::Path;

pub const DEFAULT_MAX_FILES: u32 = 128;
pub const DEFAULT_THUMB_RES: u16 = 64;
pub const DEFAULT_SMALL_RES: u16 = 256;
pub const MAX_THUMB_RES: u16 = 128;
pub const MAX_SMALL_RES: u16 = 512;

/// Centralises the defaults and maxima from spec.md §6; constructed from
/// `clap`-parsed CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct CreateOptions {
    pub max_files: u32,
    pub thumb_res: (u16, u16),
    pub small_res: (u16, u16),
}

impl Default for CreateOptions {
    fn default() -> CreateOptions {
        CreateOptions {
            max_files: DEFAULT_MAX_FILES,
            thumb_res: (DEFAULT_THUMB_RES, DEFAULT_THUMB_RES),
            small_res: (DEFAULT_SMALL_RES, DEFAULT_SMALL_RES),
        }
    }
}

impl CreateOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_files == 0 {
            return Err(ImgFsError::MaxFiles);
        }
        let (tw, th) = self.thumb_res;
        if tw == 0 || th == 0 || tw > MAX_THUMB_RES || th > MAX_THUMB_RES {
            return Err(ImgFsError::Resolutions);
        }
        let (sw, sh) = self.small_res;
        if sw == 0 || sh == 0 || sw > MAX_SMALL_RES || sh > MAX_SMALL_RES {
            return Err(ImgFsError::Resolutions);
        }
        Ok(())
    }
}

/// Stamps a fresh imgFS file (spec.md §4.2.7).
pub fn create<P: AsRef<Path>>(path: P, opts: CreateOptions) -> Result<Store> {
    opts.validate()?;
    let header = Header::new(opts.max_files, opts.thumb_res, opts.small_res);
    Store::create(path, header)
}
