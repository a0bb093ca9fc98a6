use crate::error::{Result, StrapError};
use crate::util;

use super::{CommonTableHeader, VramModule, COMMON_TABLE_HEADER_SIZE, VRAM_INFO_FIXED_SIZE_V2_2, VRAM_MODULE_HEADER_SIZE};

/// ATOM_VRAM_MODULE_HEADER: the prefix shared by every module layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VramModuleHeader {
    pub channel_map_cfg: u32,
    pub module_size: u16,
}

impl VramModuleHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<VramModuleHeader> {
        StrapError::expect_len("ATOM_VRAM_MODULE_HEADER", VRAM_MODULE_HEADER_SIZE, bytes)?;

        Ok(VramModuleHeader {
            channel_map_cfg: util::read_u32(&bytes[0..4]),
            module_size: util::read_u16(&bytes[4..6]),
        })
    }

    pub fn to_bytes(&self) -> [u8; VRAM_MODULE_HEADER_SIZE] {
        let mut bytes = [0; VRAM_MODULE_HEADER_SIZE];

        util::write_u32(&mut bytes[0..4], self.channel_map_cfg);
        util::write_u16(&mut bytes[4..6], self.module_size);

        bytes
    }
}

/// ATOM_VRAM_INFO v2.2 with its module records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VramInfo {
    pub header: CommonTableHeader,
    pub mem_adjust_tbl_offset: u16,
    pub mem_clk_patch_tbl_offset: u16,
    pub mc_adjust_per_tile_tbl_offset: u16,
    pub mc_phy_init_table_offset: u16,
    pub dram_data_remap_tbl_offset: u16,
    pub reserved: u16,
    pub num_modules: u8,
    pub mem_clk_patch_tbl_ver: u8,
    pub module_version: u8,
    pub mc_phy_tile_num: u8,
    pub modules: Vec<VramModule>,
}

impl VramInfo {
    /// Decode the whole structure. `bytes` spans the size declared in its
    /// common header; the fixed part is read first to learn the module
    /// count and version, then each module is re-sliced by its own size.
    pub fn from_bytes(bytes: &[u8]) -> Result<VramInfo> {
        if bytes.len() < VRAM_INFO_FIXED_SIZE_V2_2 {
            return Err(StrapError::Truncated {
                structure: "ATOM_VRAM_INFO",
                expected: VRAM_INFO_FIXED_SIZE_V2_2,
                actual: bytes.len(),
            });
        }

        let u16_at = |offset: usize| util::read_u16(&bytes[offset..offset + 2]);

        let mut info = VramInfo {
            header: CommonTableHeader::from_bytes(&bytes[..COMMON_TABLE_HEADER_SIZE])?,
            mem_adjust_tbl_offset: u16_at(4),
            mem_clk_patch_tbl_offset: u16_at(6),
            mc_adjust_per_tile_tbl_offset: u16_at(8),
            mc_phy_init_table_offset: u16_at(10),
            dram_data_remap_tbl_offset: u16_at(12),
            reserved: u16_at(14),
            num_modules: bytes[16],
            mem_clk_patch_tbl_ver: bytes[17],
            module_version: bytes[18],
            mc_phy_tile_num: bytes[19],
            modules: Vec::new(),
        };

        if info.module_version != 7 && info.module_version != 8 {
            return Err(StrapError::UnsupportedModuleVersion(info.module_version));
        }

        let mut offset = VRAM_INFO_FIXED_SIZE_V2_2;
        for _ in 0..info.num_modules {
            let overrun = |used: usize| StrapError::ModulesOverrun {
                declared: bytes.len(),
                used,
            };

            let header_bytes = bytes
                .get(offset..offset + VRAM_MODULE_HEADER_SIZE)
                .ok_or_else(|| overrun(offset + VRAM_MODULE_HEADER_SIZE))?;
            let size = usize::from(VramModuleHeader::from_bytes(header_bytes)?.module_size);

            let module_bytes = bytes
                .get(offset..offset + size)
                .ok_or_else(|| overrun(offset + size))?;
            info.modules.push(VramModule::from_bytes(info.module_version, module_bytes)?);

            offset += size;
        }

        Ok(info)
    }

    /// Fixed part plus the module records actually present.
    pub fn size(&self) -> usize {
        VRAM_INFO_FIXED_SIZE_V2_2 + self.modules.iter().map(VramModule::size).sum::<usize>()
    }

    /// Size declared in the common header, which also covers the tables
    /// that follow the module records.
    pub fn declared_size(&self) -> usize {
        self.header.size()
    }
}
