use crate::error::{Result, StrapError};
use crate::util;

use super::{ATOM_BIOS_SIGNATURE, COMMON_TABLE_HEADER_SIZE, ROM_HEADER_SIZE_V1_1};

/// Header in front of every ATOM table. `size` includes the header itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommonTableHeader {
    pub size: u16,
    pub format_rev: u8,
    pub content_rev: u8,
}

impl CommonTableHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<CommonTableHeader> {
        StrapError::expect_len("ATOM_COMMON_TABLE_HEADER", COMMON_TABLE_HEADER_SIZE, bytes)?;

        let size = util::read_u16(&bytes[0..2]);
        if usize::from(size) < COMMON_TABLE_HEADER_SIZE {
            return Err(StrapError::InvalidTableSize {
                structure: "ATOM_COMMON_TABLE_HEADER",
                size: usize::from(size),
                min: COMMON_TABLE_HEADER_SIZE,
            });
        }

        Ok(CommonTableHeader {
            size,
            format_rev: bytes[2],
            content_rev: bytes[3],
        })
    }

    pub fn to_bytes(&self) -> [u8; COMMON_TABLE_HEADER_SIZE] {
        let mut bytes = [0; COMMON_TABLE_HEADER_SIZE];

        util::write_u16(&mut bytes[0..2], self.size);
        bytes[2] = self.format_rev;
        bytes[3] = self.content_rev;

        bytes
    }

    pub fn size(&self) -> usize {
        usize::from(self.size)
    }
}

/// ATOM_ROM_HEADER v1.1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RomHeader {
    pub header: CommonTableHeader,
    pub firmware_signature: u32,
    pub bios_runtime_segment_address: u16,
    pub protected_mode_info_offset: u16,
    pub config_filename_offset: u16,
    pub crc_block_offset: u16,
    pub bios_bootup_message_offset: u16,
    pub int10_offset: u16,
    pub pci_bus_dev_init_code: u16,
    pub io_base_address: u16,
    pub subsystem_vendor_id: u16,
    pub subsystem_id: u16,
    pub pci_info_offset: u16,
    pub master_command_table_offset: u16,
    pub master_data_table_offset: u16,
    pub extended_function_code: u8,
    pub reserved: u8,
}

impl RomHeader {
    pub fn from_bytes(bytes: &[u8]) -> Result<RomHeader> {
        StrapError::expect_len("ATOM_ROM_HEADER", ROM_HEADER_SIZE_V1_1, bytes)?;

        let firmware_signature = util::read_u32(&bytes[4..8]);
        if firmware_signature != ATOM_BIOS_SIGNATURE {
            return Err(StrapError::BadSignature {
                found: firmware_signature,
            });
        }

        let u16_at = |offset: usize| util::read_u16(&bytes[offset..offset + 2]);

        Ok(RomHeader {
            header: CommonTableHeader::from_bytes(&bytes[..COMMON_TABLE_HEADER_SIZE])?,
            firmware_signature,
            bios_runtime_segment_address: u16_at(8),
            protected_mode_info_offset: u16_at(10),
            config_filename_offset: u16_at(12),
            crc_block_offset: u16_at(14),
            bios_bootup_message_offset: u16_at(16),
            int10_offset: u16_at(18),
            pci_bus_dev_init_code: u16_at(20),
            io_base_address: u16_at(22),
            subsystem_vendor_id: u16_at(24),
            subsystem_id: u16_at(26),
            pci_info_offset: u16_at(28),
            master_command_table_offset: u16_at(30),
            master_data_table_offset: u16_at(32),
            extended_function_code: bytes[34],
            reserved: bytes[35],
        })
    }

    pub fn to_bytes(&self) -> [u8; ROM_HEADER_SIZE_V1_1] {
        let mut bytes = [0; ROM_HEADER_SIZE_V1_1];

        bytes[..COMMON_TABLE_HEADER_SIZE].copy_from_slice(&self.header.to_bytes());
        util::write_u32(&mut bytes[4..8], self.firmware_signature);

        let fields = [
            self.bios_runtime_segment_address,
            self.protected_mode_info_offset,
            self.config_filename_offset,
            self.crc_block_offset,
            self.bios_bootup_message_offset,
            self.int10_offset,
            self.pci_bus_dev_init_code,
            self.io_base_address,
            self.subsystem_vendor_id,
            self.subsystem_id,
            self.pci_info_offset,
            self.master_command_table_offset,
            self.master_data_table_offset,
        ];
        for (i, value) in fields.iter().enumerate() {
            let offset = 8 + i * 2;
            util::write_u16(&mut bytes[offset..offset + 2], *value);
        }

        bytes[34] = self.extended_function_code;
        bytes[35] = self.reserved;

        bytes
    }
}
