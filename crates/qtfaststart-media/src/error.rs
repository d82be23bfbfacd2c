//! Error types for qtfaststart-media.

use crate::mp4::AtomType;
use std::io;
use thiserror::Error;

/// Result type for qtfaststart-media operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for qtfaststart-media operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading or writing a whole file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A header or atom body runs past the end of its enclosing range.
    #[error("Truncated atom at offset {offset}: need {need} bytes, have {available}")]
    Truncated {
        offset: u64,
        need: u64,
        available: u64,
    },

    /// An atom declares a size that cannot hold its own header.
    #[error("Invalid file format: atom {atom_type} at offset {offset} reported a size of only {size} bytes")]
    AtomTooSmall {
        atom_type: AtomType,
        offset: u64,
        size: u64,
        header_size: u8,
    },

    /// A top-level atom outside the known QuickTime vocabulary.
    #[error("{atom_type:?} at offset {offset} is not a valid top-level atom")]
    UnknownTopLevelAtom { atom_type: AtomType, offset: u64 },

    /// One of the mandatory top-level atoms is absent.
    #[error("Invalid file: {0} atom not found")]
    MissingAtom(&'static str),

    /// A mandatory top-level atom appears more than once (strict mode only).
    #[error("Invalid file: duplicate {atom_type} atom at offset {offset}")]
    DuplicateAtom { atom_type: AtomType, offset: u64 },

    /// The movie uses a compressed `cmov` atom.
    #[error("Compressed moov atoms are not supported")]
    CompressedMoov,

    /// A chunk-offset table declares more entries than it can hold.
    #[error("Invalid {atom_type} table at offset {offset}: {entries} entries do not fit")]
    InvalidChunkOffsetTable {
        atom_type: AtomType,
        offset: u64,
        entries: u32,
    },
}

impl Error {
    /// Create a truncation error.
    pub fn truncated(offset: u64, need: u64, available: u64) -> Self {
        Self::Truncated {
            offset,
            need,
            available,
        }
    }

    /// Whether this error means the file is well-formed but uses a variant
    /// this crate does not handle, as opposed to being malformed.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::CompressedMoov | Self::UnknownTopLevelAtom { .. })
    }
}
