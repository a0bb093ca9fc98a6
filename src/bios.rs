//! A loaded firmware image and the edit operations on it.

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::atom::{
    CommonTableHeader, DataTable, MasterDataTable, RomHeader, VramInfo, VramModule, VramTimingEntry,
    COMMON_TABLE_HEADER_SIZE, MASTER_DATA_TABLE_SIZE_V1_1, ROM_BLOCK_SIZE, ROM_CHECKSUM_OFFSET,
    ROM_HEADER_SIZE_V1_1, ROM_HEADER_TAG_V1_1, ROM_SIZE_OFFSET, STRAP_400MHZ_MARKER,
    VRAM_TIMING_ENTRY_SIZE, VRAM_TIMING_MAX_ENTRIES,
};
use crate::error::{ErrorKind, Result, StrapError};
use crate::util::{self, Range};

/// Owns the raw image bytes for one edit session.
///
/// Only the byte buffer and the ROM header anchor are kept. Every table is
/// decoded into a fresh copy on request, so a patch can never leave a
/// stale view behind.
pub struct BiosImage {
    data: Box<[u8]>,
    rom_header_offset: usize,
}

impl BiosImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<BiosImage> {
        let path = path.as_ref();
        let data = util::read_file_to_box(path).map_err(|e| StrapError::io(path, e))?;

        debug!("read {} bytes from {}", data.len(), path.display());

        BiosImage::from_bytes(data)
    }

    /// Locate the ROM header and check that the master data table is
    /// readable. VRAM_Info and the straps are resolved on demand.
    pub fn from_bytes<B: Into<Box<[u8]>>>(data: B) -> Result<BiosImage> {
        let data = data.into();

        let rom_header_offset = util::find_bytes(&data, &ROM_HEADER_TAG_V1_1).ok_or(StrapError::HeaderNotFound)?;
        let image = BiosImage {
            data,
            rom_header_offset,
        };

        let rom_header = image.rom_header()?;
        image.master_data_table()?;

        debug!(
            "ATOM ROM header at {:#x}, master data table at {:#x}",
            rom_header_offset, rom_header.master_data_table_offset
        );

        Ok(image)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Box<[u8]> {
        self.data
    }

    pub fn rom_header_offset(&self) -> usize {
        self.rom_header_offset
    }

    pub fn rom_header(&self) -> Result<RomHeader> {
        let bytes = self.window("ATOM_ROM_HEADER", Range::with_len(self.rom_header_offset, ROM_HEADER_SIZE_V1_1))?;

        RomHeader::from_bytes(bytes)
    }

    pub fn master_data_table(&self) -> Result<MasterDataTable> {
        let offset = usize::from(self.rom_header()?.master_data_table_offset);
        let bytes = self.window("ATOM_MASTER_DATA_TABLE", Range::with_len(offset, MASTER_DATA_TABLE_SIZE_V1_1))?;

        MasterDataTable::from_bytes(bytes)
    }

    pub fn vram_info_offset(&self) -> Result<usize> {
        self.master_data_table()?
            .offset(DataTable::VramInfo)
            .map(usize::from)
            .ok_or_else(|| StrapError::TableAbsent(DataTable::VramInfo.name()))
    }

    pub fn vram_info_header(&self) -> Result<CommonTableHeader> {
        let offset = self.vram_info_offset()?;
        let bytes = self.window("ATOM_COMMON_TABLE_HEADER", Range::with_len(offset, COMMON_TABLE_HEADER_SIZE))?;

        CommonTableHeader::from_bytes(bytes)
    }

    /// The bytes VRAM_Info declares for itself, straps included.
    pub fn vram_info_range(&self) -> Result<Range> {
        let offset = self.vram_info_offset()?;
        let header = self.vram_info_header()?;

        Ok(Range::with_len(offset, header.size()))
    }

    pub fn vram_info(&self) -> Result<VramInfo> {
        let bytes = self.window("ATOM_VRAM_INFO", self.vram_info_range()?)?;

        VramInfo::from_bytes(bytes)
    }

    pub fn vram_modules(&self) -> Result<Vec<VramModule>> {
        Ok(self.vram_info()?.modules)
    }

    /// Absolute offset of the first strap row.
    ///
    /// Nothing in VRAM_Info records where the strap array starts. The 400MHz
    /// row is the first one in every image seen so far, so its clock range
    /// bytes are used as the anchor.
    pub fn timings_offset(&self) -> Result<usize> {
        let range = self.vram_info_range()?;
        let vram_info = self.window("ATOM_VRAM_INFO", range)?;

        let relative = util::find_bytes(vram_info, &STRAP_400MHZ_MARKER).ok_or(StrapError::StrapNotFound)?;

        Ok(range.0 + relative)
    }

    /// Strap rows in file order, up to the first zero clock range.
    pub fn timings(&self) -> Result<Vec<VramTimingEntry>> {
        let start = self.timings_offset()?;
        let mut entries = Vec::new();

        for i in 0..VRAM_TIMING_MAX_ENTRIES {
            let range = Range::with_len(start + i * VRAM_TIMING_ENTRY_SIZE, VRAM_TIMING_ENTRY_SIZE);
            let bytes = match range.slice(&self.data) {
                Some(bytes) => bytes,
                None => break,
            };

            let entry = VramTimingEntry::from_bytes(bytes)?;
            if entry.clock_range == 0 {
                break;
            }

            trace!("strap {} at {:#x}: {} MHz index {}", i, range.0, entry.frequency_mhz(), entry.index);
            entries.push(entry);
        }

        debug!("found {} straps starting at {:#x}", entries.len(), start);

        Ok(entries)
    }

    /// Distinct RAM IC indices, in the order their first strap appears.
    pub fn ram_ic_indices(&self) -> Result<Vec<u8>> {
        let mut indices = Vec::new();

        for entry in self.timings()? {
            if !indices.contains(&entry.index) {
                indices.push(entry.index);
            }
        }

        Ok(indices)
    }

    /// Overwrite the latency bytes of the strap keyed by
    /// `(entry.clock_range, entry.index)`.
    ///
    /// The key must still be listed by [`BiosImage::timings`]; the target
    /// offset is then found afresh by searching the whole image for the
    /// key bytes. An image whose straps cannot be located carries no key.
    pub fn set_timing(&mut self, entry: &VramTimingEntry) -> Result<()> {
        let (clock_range, index) = entry.key();

        let timings = match self.timings() {
            Ok(timings) => timings,
            Err(e) if e.kind() == ErrorKind::Discovery => {
                return Err(StrapError::TimingNotFound { clock_range, index })
            }
            Err(e) => return Err(e),
        };

        if !timings.iter().any(|e| e.key() == entry.key()) {
            return Err(StrapError::TimingNotFound { clock_range, index });
        }

        let pattern = entry.search_pattern();
        let offset = util::find_bytes(&self.data, &pattern).ok_or(StrapError::PatternNotFound { clock_range, index })?;

        let latency = Range::with_len(offset + pattern.len(), entry.latency.len());
        let target = self
            .data
            .get_mut(latency.0..latency.1)
            .ok_or(StrapError::PatternNotFound { clock_range, index })?;
        target.copy_from_slice(&entry.latency);

        debug!("patched {} MHz index {} at {:#x}", entry.frequency_mhz(), index, latency.0);

        Ok(())
    }

    /// Bytes covered by the checksum: the size byte counts 512-byte blocks.
    fn checksum_range(&self) -> Range {
        let size = usize::from(self.data[ROM_SIZE_OFFSET]) * ROM_BLOCK_SIZE;

        Range(0, size.min(self.data.len()))
    }

    /// Sum of the checksummed bytes, modulo 256. Zero for a valid image.
    pub fn checksum(&self) -> u8 {
        let range = self.checksum_range();

        util::checksum8(&self.data[range.0..range.1])
    }

    pub fn checksum_valid(&self) -> bool {
        self.checksum() == 0
    }

    /// Adjust the checksum byte so the block sum is zero. Returns the
    /// checksum byte now stored in the image.
    pub fn fix_checksum(&mut self) -> u8 {
        let sum = self.checksum();

        if sum != 0 {
            let byte = &mut self.data[ROM_CHECKSUM_OFFSET];
            *byte = byte.wrapping_sub(sum);

            debug!("checksum byte adjusted to {:#04x}", *byte);
        }

        self.data[ROM_CHECKSUM_OFFSET]
    }

    /// Repair the checksum, then write the whole image to `path`.
    ///
    /// The repair stays applied in memory even if the write fails.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        self.fix_checksum();
        fs::write(path, &self.data).map_err(|e| StrapError::io(path, e))?;

        debug!("wrote {} bytes to {}", self.data.len(), path.display());

        Ok(())
    }

    fn window(&self, structure: &'static str, range: Range) -> Result<&[u8]> {
        range.slice(&self.data).ok_or(StrapError::OutOfBounds {
            structure,
            offset: range.0,
            len: range.len(),
        })
    }
}
