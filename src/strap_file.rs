//! Strap sets saved to disk, so tuned timings can be carried from one
//! image to another. The file is MessagePack, xz-compressed.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

use crate::atom::VramTimingEntry;
use crate::bios::BiosImage;
use crate::error::{Result, StrapError};

pub const STRAP_FILE_VERSION: u8 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StrapFile {
    pub version: u8,
    /// Name of the image the straps were exported from.
    pub source: Option<String>,
    pub straps: Vec<VramTimingEntry>,
}

impl StrapFile {
    pub fn from_image(image: &BiosImage, source: Option<String>) -> Result<StrapFile> {
        Ok(StrapFile {
            version: STRAP_FILE_VERSION,
            source,
            straps: image.timings()?,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec(self).map_err(|e| StrapError::StrapFile(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<StrapFile> {
        let file: StrapFile = rmp_serde::from_slice(bytes).map_err(|e| StrapError::StrapFile(e.to_string()))?;

        if file.version != STRAP_FILE_VERSION {
            return Err(StrapError::StrapFile(format!("unsupported version {}", file.version)));
        }

        Ok(file)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        let file = File::create(path).map_err(|e| StrapError::io(path, e))?;
        let mut compressor = XzEncoder::new(file, 6);
        compressor.write_all(&bytes).map_err(|e| StrapError::io(path, e))?;
        compressor.finish().map_err(|e| StrapError::io(path, e))?;

        debug!("exported {} straps to {}", self.straps.len(), path.display());

        Ok(())
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<StrapFile> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| StrapError::io(path, e))?;
        let mut bytes = Vec::new();
        let mut decompressor = XzDecoder::new(file);
        decompressor.read_to_end(&mut bytes).map_err(|e| StrapError::io(path, e))?;

        StrapFile::from_bytes(&bytes)
    }

    /// Apply every strap by key, in file order. Stops at the first key the
    /// image does not carry; straps before it stay applied.
    pub fn apply(&self, image: &mut BiosImage) -> Result<usize> {
        for strap in &self.straps {
            image.set_timing(strap)?;
        }

        Ok(self.straps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::VRAM_TIMING_LATENCY_SIZE;

    fn strap_file() -> StrapFile {
        StrapFile {
            version: STRAP_FILE_VERSION,
            source: Some("card.rom".to_string()),
            straps: vec![
                VramTimingEntry::new(40000, 0, [0x11; VRAM_TIMING_LATENCY_SIZE]),
                VramTimingEntry::new(175000, 1, [0x22; VRAM_TIMING_LATENCY_SIZE]),
            ],
        }
    }

    #[test]
    fn survives_messagepack() {
        let file = strap_file();
        let bytes = file.to_bytes().unwrap();

        assert_eq!(StrapFile::from_bytes(&bytes).unwrap(), file);
    }

    #[test]
    fn rejects_other_versions() {
        let mut file = strap_file();
        file.version = 2;
        let bytes = file.to_bytes().unwrap();

        assert!(StrapFile::from_bytes(&bytes).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(StrapFile::from_bytes(&[0xc1, 0x00, 0x13]).is_err());
    }

    #[test]
    fn survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("straps.xz");
        let file = strap_file();

        file.write(&path).unwrap();

        assert_eq!(StrapFile::read(&path).unwrap(), file);
    }
}
