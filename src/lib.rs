//! Memory timing ("strap") editor for AMD ATOM graphics card firmware.
//!
//! The image is walked from the ATOM ROM header through the master data
//! table to VRAM_Info, where the strap rows are located by byte pattern.
//! Straps are patched in place and the legacy ROM checksum is repaired
//! on save.
//!
//! ```no_run
//! # fn main() -> atomstrap::Result<()> {
//! let mut image = atomstrap::open("card.rom")?;
//!
//! for strap in atomstrap::list_timings(&image)? {
//!     println!("{} MHz index {}: {}", strap.frequency_mhz(), strap.index, strap.latency_hex());
//! }
//!
//! atomstrap::apply_timing(&mut image, 175000, 0, [0; 48])?;
//! atomstrap::save(&mut image, "card-tuned.rom")?;
//! # Ok(())
//! # }
//! ```

pub mod atom;
mod bios;
mod error;
mod strap_file;
pub mod util;

use std::path::Path;

pub use atom::{VramModule, VramTimingEntry, VRAM_TIMING_LATENCY_SIZE};
pub use bios::BiosImage;
pub use error::{ErrorKind, Result, StrapError};
pub use strap_file::{StrapFile, STRAP_FILE_VERSION};

pub fn open<P: AsRef<Path>>(path: P) -> Result<BiosImage> {
    BiosImage::open(path)
}

pub fn list_timings(image: &BiosImage) -> Result<Vec<VramTimingEntry>> {
    image.timings()
}

pub fn get_vram_modules(image: &BiosImage) -> Result<Vec<VramModule>> {
    image.vram_modules()
}

/// `clock_range` is in 10kHz units, as stored in the image.
pub fn apply_timing(
    image: &mut BiosImage,
    clock_range: u32,
    ram_ic_index: u8,
    latency: [u8; VRAM_TIMING_LATENCY_SIZE],
) -> Result<()> {
    image.set_timing(&VramTimingEntry::new(clock_range, ram_ic_index, latency))
}

pub fn save<P: AsRef<Path>>(image: &mut BiosImage, path: P) -> Result<()> {
    image.save(path)
}
