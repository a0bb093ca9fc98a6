//! Error type for firmware decoding, discovery and patching.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StrapError>;

/// Broad category of a [`StrapError`], matching how a caller reacts to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or undersized structure, bad signature, unknown version.
    Decode,
    /// An anchor pattern or table pointer is missing from the image.
    Discovery,
    /// The requested strap key is absent at mutation time.
    NotFound,
    /// Reading or writing a file failed.
    Io,
}

#[derive(Debug, Error)]
pub enum StrapError {
    #[error("{structure}: expected {expected} bytes, got {actual} bytes")]
    Truncated {
        structure: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{structure}: {len} bytes at offset {offset:#x} run past the end of the image")]
    OutOfBounds {
        structure: &'static str,
        offset: usize,
        len: usize,
    },

    #[error("invalid BIOS: firmware signature {found:#010x} is not ATOM")]
    BadSignature { found: u32 },

    #[error("unknown VRAM module version: {0}")]
    UnsupportedModuleVersion(u8),

    #[error("{structure}: module size {size} is smaller than its {min} fixed bytes")]
    InvalidModuleSize {
        structure: &'static str,
        size: usize,
        min: usize,
    },

    #[error("{structure}: declared size {size} does not cover its {min} byte header")]
    InvalidTableSize {
        structure: &'static str,
        size: usize,
        min: usize,
    },

    #[error("VRAM modules occupy {used} bytes but VRAM_Info declares {declared}")]
    ModulesOverrun { declared: usize, used: usize },

    #[error("invalid strap file: {0}")]
    StrapFile(String),

    #[error("ATOM ROM header not found")]
    HeaderNotFound,

    #[error("{0} table is absent from the master data table")]
    TableAbsent(&'static str),

    #[error("400MHz strap not found in VRAM_Info")]
    StrapNotFound,

    #[error("no timings for index {index} at {clock_range} (10kHz units)")]
    TimingNotFound { clock_range: u32, index: u8 },

    #[error("byte pattern for index {index} at {clock_range} (10kHz units) not found in image")]
    PatternNotFound { clock_range: u32, index: u8 },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StrapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrapError::Truncated { .. }
            | StrapError::OutOfBounds { .. }
            | StrapError::BadSignature { .. }
            | StrapError::UnsupportedModuleVersion(_)
            | StrapError::InvalidModuleSize { .. }
            | StrapError::InvalidTableSize { .. }
            | StrapError::ModulesOverrun { .. }
            | StrapError::StrapFile(_) => ErrorKind::Decode,
            StrapError::HeaderNotFound
            | StrapError::TableAbsent(_)
            | StrapError::StrapNotFound => ErrorKind::Discovery,
            StrapError::TimingNotFound { .. } | StrapError::PatternNotFound { .. } => {
                ErrorKind::NotFound
            }
            StrapError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StrapError::Io {
            path: path.into(),
            source,
        }
    }

    /// Length check shared by every fixed-size decoder.
    pub(crate) fn expect_len(structure: &'static str, expected: usize, bytes: &[u8]) -> Result<()> {
        if bytes.len() != expected {
            return Err(StrapError::Truncated {
                structure,
                expected,
                actual: bytes.len(),
            });
        }

        Ok(())
    }
}
