use crate::error::{Result, StrapError};
use crate::util;

use super::{VramModuleHeader, VRAM_MODULE_HEADER_SIZE, VRAM_MODULE_V7_FIXED_SIZE, VRAM_MODULE_V8_FIXED_SIZE};

/// A VRAM module record, tagged by the module version declared in
/// VRAM_Info. Only the v7 and v8 layouts are modelled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VramModule {
    V7(VramModuleV7),
    V8(VramModuleV8),
}

/// ATOM_VRAM_MODULE_V7.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VramModuleV7 {
    pub header: VramModuleHeader,
    pub private_reserved: u16,
    pub enable_channels: u16,
    pub ext_memory_id: u8,
    pub memory_type: u8,
    pub channel_num: u8,
    pub channel_width: u8,
    pub density: u8,
    pub reserve: u8,
    pub misc: u8,
    pub vrefi: u8,
    pub npl_rt: u8,
    pub preamble: u8,
    pub memory_size: u8,
    pub seq_setting_offset: u16,
    pub reserved: u8,
    pub emrs2_value: u16,
    pub emrs3_value: u16,
    pub memory_vendor_id: u8,
    pub refresh_rate_factor: u8,
    pub fifo_depth: u8,
    pub cdr_bandwidth: u8,
    pub part_number: Option<String>,
}

/// ATOM_VRAM_MODULE_V8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VramModuleV8 {
    pub header: VramModuleHeader,
    pub mc_ram_cfg: u16,
    pub enable_channels: u16,
    pub ext_memory_id: u8,
    pub memory_type: u8,
    pub channel_num: u8,
    pub channel_width: u8,
    pub density: u8,
    pub bank_col: u8,
    pub misc: u8,
    pub vrefi: u8,
    pub reserved: u16,
    pub memory_size: u16,
    pub mc_tunning_set_id: u8,
    pub row_num: u8,
    pub emrs2_value: u16,
    pub emrs3_value: u16,
    pub memory_vendor_id: u8,
    pub refresh_rate_factor: u8,
    pub fifo_depth: u8,
    pub cdr_bandwidth: u8,
    pub channel_map_cfg1: u32,
    pub bank_map_cfg: u32,
    pub reserved2: u32,
    pub part_number: Option<String>,
}

impl VramModule {
    /// Decode one module. `bytes` spans exactly the module's declared size.
    pub fn from_bytes(version: u8, bytes: &[u8]) -> Result<VramModule> {
        match version {
            7 => VramModuleV7::from_bytes(bytes).map(VramModule::V7),
            8 => VramModuleV8::from_bytes(bytes).map(VramModule::V8),
            _ => Err(StrapError::UnsupportedModuleVersion(version)),
        }
    }

    pub fn version(&self) -> u8 {
        match self {
            VramModule::V7(_) => 7,
            VramModule::V8(_) => 8,
        }
    }

    pub fn header(&self) -> &VramModuleHeader {
        match self {
            VramModule::V7(m) => &m.header,
            VramModule::V8(m) => &m.header,
        }
    }

    /// Byte extent of the record, including its header.
    pub fn size(&self) -> usize {
        usize::from(self.header().module_size)
    }

    pub fn part_number(&self) -> Option<&str> {
        match self {
            VramModule::V7(m) => m.part_number.as_deref(),
            VramModule::V8(m) => m.part_number.as_deref(),
        }
    }

    pub fn memory_type(&self) -> u8 {
        match self {
            VramModule::V7(m) => m.memory_type,
            VramModule::V8(m) => m.memory_type,
        }
    }

    pub fn memory_vendor_id(&self) -> u8 {
        match self {
            VramModule::V7(m) => m.memory_vendor_id,
            VramModule::V8(m) => m.memory_vendor_id,
        }
    }

    /// Vendor from the low nibble of the vendor id byte.
    pub fn vendor_name(&self) -> &'static str {
        match self.memory_vendor_id() & 0x0f {
            0x1 => "Samsung",
            0x2 => "Infineon",
            0x3 => "Elpida",
            0x4 => "Etron",
            0x5 => "Nanya",
            0x6 => "Hynix",
            0x7 => "Mosel",
            0x8 => "Winbond",
            0x9 => "ESMT",
            0xf => "Micron",
            _ => "Unknown",
        }
    }

    pub fn density(&self) -> u8 {
        match self {
            VramModule::V7(m) => m.density,
            VramModule::V8(m) => m.density,
        }
    }

    pub fn channel_num(&self) -> u8 {
        match self {
            VramModule::V7(m) => m.channel_num,
            VramModule::V8(m) => m.channel_num,
        }
    }

    pub fn channel_width(&self) -> u8 {
        match self {
            VramModule::V7(m) => m.channel_width,
            VramModule::V8(m) => m.channel_width,
        }
    }
}

impl VramModuleV7 {
    pub fn from_bytes(bytes: &[u8]) -> Result<VramModuleV7> {
        check_module_size("ATOM_VRAM_MODULE_V7", bytes, VRAM_MODULE_V7_FIXED_SIZE)?;

        let u16_at = |offset: usize| util::read_u16(&bytes[offset..offset + 2]);

        Ok(VramModuleV7 {
            header: VramModuleHeader::from_bytes(&bytes[..VRAM_MODULE_HEADER_SIZE])?,
            private_reserved: u16_at(6),
            enable_channels: u16_at(8),
            ext_memory_id: bytes[10],
            memory_type: bytes[11],
            channel_num: bytes[12],
            channel_width: bytes[13],
            density: bytes[14],
            reserve: bytes[15],
            misc: bytes[16],
            vrefi: bytes[17],
            npl_rt: bytes[18],
            preamble: bytes[19],
            memory_size: bytes[20],
            seq_setting_offset: u16_at(21),
            reserved: bytes[23],
            emrs2_value: u16_at(24),
            emrs3_value: u16_at(26),
            memory_vendor_id: bytes[28],
            refresh_rate_factor: bytes[29],
            fifo_depth: bytes[30],
            cdr_bandwidth: bytes[31],
            part_number: part_number(&bytes[VRAM_MODULE_V7_FIXED_SIZE..]),
        })
    }
}

impl VramModuleV8 {
    pub fn from_bytes(bytes: &[u8]) -> Result<VramModuleV8> {
        check_module_size("ATOM_VRAM_MODULE_V8", bytes, VRAM_MODULE_V8_FIXED_SIZE)?;

        let u16_at = |offset: usize| util::read_u16(&bytes[offset..offset + 2]);
        let u32_at = |offset: usize| util::read_u32(&bytes[offset..offset + 4]);

        Ok(VramModuleV8 {
            header: VramModuleHeader::from_bytes(&bytes[..VRAM_MODULE_HEADER_SIZE])?,
            mc_ram_cfg: u16_at(6),
            enable_channels: u16_at(8),
            ext_memory_id: bytes[10],
            memory_type: bytes[11],
            channel_num: bytes[12],
            channel_width: bytes[13],
            density: bytes[14],
            bank_col: bytes[15],
            misc: bytes[16],
            vrefi: bytes[17],
            reserved: u16_at(18),
            memory_size: u16_at(20),
            mc_tunning_set_id: bytes[22],
            row_num: bytes[23],
            emrs2_value: u16_at(24),
            emrs3_value: u16_at(26),
            memory_vendor_id: bytes[28],
            refresh_rate_factor: bytes[29],
            fifo_depth: bytes[30],
            cdr_bandwidth: bytes[31],
            channel_map_cfg1: u32_at(32),
            bank_map_cfg: u32_at(36),
            reserved2: u32_at(40),
            part_number: part_number(&bytes[VRAM_MODULE_V8_FIXED_SIZE..]),
        })
    }
}

fn check_module_size(structure: &'static str, bytes: &[u8], fixed: usize) -> Result<()> {
    if bytes.len() < fixed {
        return Err(StrapError::InvalidModuleSize {
            structure,
            size: bytes.len(),
            min: fixed,
        });
    }

    Ok(())
}

/// Trailing part number text, NUL padded. A single stray byte is not a name.
fn part_number(trailing: &[u8]) -> Option<String> {
    if trailing.len() <= 1 {
        return None;
    }

    let end = trailing.iter().position(|&b| b == 0).unwrap_or(trailing.len());
    Some(String::from_utf8_lossy(&trailing[..end]).into_owned())
}
