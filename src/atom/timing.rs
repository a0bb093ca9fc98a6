use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::error::{Result, StrapError};
use crate::util;

use super::{VRAM_TIMING_ENTRY_SIZE, VRAM_TIMING_LATENCY_SIZE};

/// Identity of a strap row: clock range (10kHz units) and RAM IC index.
pub type TimingKey = (u32, u8);

/// ATOM_VRAM_TIMING_ENTRY: one strap row.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct VramTimingEntry {
    /// Upper bound of the memory clock range, in 10kHz units (24 bits).
    pub clock_range: u32,
    /// RAM IC (VRAM module) the row applies to.
    pub index: u8,
    #[serde(with = "BigArray")]
    pub latency: [u8; VRAM_TIMING_LATENCY_SIZE],
}

impl VramTimingEntry {
    pub fn new(clock_range: u32, index: u8, latency: [u8; VRAM_TIMING_LATENCY_SIZE]) -> VramTimingEntry {
        VramTimingEntry {
            clock_range,
            index,
            latency,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<VramTimingEntry> {
        StrapError::expect_len("ATOM_VRAM_TIMING_ENTRY", VRAM_TIMING_ENTRY_SIZE, bytes)?;

        let mut latency = [0; VRAM_TIMING_LATENCY_SIZE];
        latency.copy_from_slice(&bytes[4..]);

        Ok(VramTimingEntry {
            clock_range: util::read_u24(&bytes[0..3]),
            index: bytes[3],
            latency,
        })
    }

    pub fn to_bytes(&self) -> [u8; VRAM_TIMING_ENTRY_SIZE] {
        let mut bytes = [0; VRAM_TIMING_ENTRY_SIZE];

        bytes[..4].copy_from_slice(&self.search_pattern());
        bytes[4..].copy_from_slice(&self.latency);

        bytes
    }

    pub fn key(&self) -> TimingKey {
        (self.clock_range, self.index)
    }

    pub fn frequency_mhz(&self) -> u32 {
        self.clock_range / 100
    }

    /// The four bytes preceding the latency block in the image: the clock
    /// range in its low three bytes, then the index.
    pub fn search_pattern(&self) -> [u8; 4] {
        let mut pattern = [0; 4];

        util::write_u24(&mut pattern[..3], self.clock_range & 0x00ff_ffff);
        pattern[3] = self.index;

        pattern
    }

    pub fn latency_hex(&self) -> String {
        self.latency.iter().map(|b| format!("{:02X}", b)).collect()
    }
}
