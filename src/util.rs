pub mod range;

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

pub use self::range::Range;

// Callers slice to the exact field width first; a short slice is a bug
// in the caller and panics inside byteorder.

pub fn read_u16(bytes: &[u8]) -> u16 {
    LittleEndian::read_u16(bytes)
}

pub fn read_u24(bytes: &[u8]) -> u32 {
    LittleEndian::read_u24(bytes)
}

pub fn read_u32(bytes: &[u8]) -> u32 {
    LittleEndian::read_u32(bytes)
}

pub fn write_u16(bytes: &mut [u8], value: u16) {
    LittleEndian::write_u16(bytes, value)
}

pub fn write_u24(bytes: &mut [u8], value: u32) {
    LittleEndian::write_u24(bytes, value)
}

pub fn write_u32(bytes: &mut [u8], value: u32) {
    LittleEndian::write_u32(bytes, value)
}

/// Leftmost offset of `needle` in `haystack`.
///
/// An empty needle, or one longer than the haystack, never matches.
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Byte sum modulo 256.
pub fn checksum8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

pub fn read_file_to_box(path: &Path) -> io::Result<Box<[u8]>> {
    let mut file = File::open(path)?;
    let mut file_buffer = Vec::new();

    file.read_to_end(&mut file_buffer)?;

    Ok(file_buffer.into_boxed_slice())
}
