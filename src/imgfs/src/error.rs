//! The closed error taxonomy shared by the store, the operations layer, the
//! HTTP engine and both binaries. One variant per error kind named in the
//! on-disk/wire-visible error table; callers map a variant back to a CLI exit
//! code or an HTTP error body, never to a raw `errno`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImgFsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("out of memory")]
    OutOfMemory,

    #[error("invalid argument")]
    InvalidArgument,

    #[error("invalid command")]
    InvalidCommand,

    #[error("not enough arguments")]
    NotEnoughArguments,

    #[error("invalid image id")]
    InvalidImgId,

    #[error("imgFS is full")]
    ImgfsFull,

    #[error("image not found")]
    ImageNotFound,

    #[error("duplicate image id")]
    DuplicateId,

    #[error("invalid resolution")]
    Resolutions,

    #[error("invalid max_files value")]
    MaxFiles,

    #[error("image library error: {0}")]
    ImgLib(#[from] image::ImageError),

    #[error("runtime error")]
    Runtime,
}

pub type Result<T> = std::result::Result<T, ImgFsError>;

impl ImgFsError {
    /// The stable negative exit code for this error kind, one per row of the
    /// error table; success (`ERR_NONE`) is represented by `Ok` and never
    /// appears here.
    pub fn exit_code(&self) -> i32 {
        match self {
            ImgFsError::Io(_) => -1,
            ImgFsError::OutOfMemory => -2,
            ImgFsError::InvalidArgument => -3,
            ImgFsError::InvalidCommand => -4,
            ImgFsError::NotEnoughArguments => -5,
            ImgFsError::InvalidImgId => -6,
            ImgFsError::ImgfsFull => -7,
            ImgFsError::ImageNotFound => -8,
            ImgFsError::DuplicateId => -9,
            ImgFsError::Resolutions => -10,
            ImgFsError::MaxFiles => -11,
            ImgFsError::ImgLib(_) => -12,
            ImgFsError::Runtime => -13,
        }
    }
}
