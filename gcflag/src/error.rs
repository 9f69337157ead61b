use std::path::PathBuf;

use thiserror::Error;

/// Errors from flag decoding and encoding, image fitting, and the save-file
/// container. All of these are terminal for the current operation; nothing
/// in this crate retries or guesses at intent.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither pixel layout is fully present in the record, or its declared
    /// dimensions are unusable.
    #[error("malformed flag record: {0}")]
    MalformedRecord(String),

    /// An encode was handed a grid whose shape disagrees with the size the
    /// record declares.
    #[error("flag record declares {expected:?} but the grid is {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The source image is unusable, or the fit mode is not recognized.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// No space race exists at the requested index.
    #[error("no space race at index {0}")]
    NotFound(usize),

    /// The given path does not contain a `level.dat`.
    #[error("no level.dat under {}; not a world folder", .0.display())]
    NotAWorld(PathBuf),

    #[error("space race data i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("space race data is not valid nbt: {0}")]
    Nbt(#[from] quartz_nbt::io::NbtIoError),
}
