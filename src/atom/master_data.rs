use crate::error::{Result, StrapError};
use crate::util;

use super::{CommonTableHeader, COMMON_TABLE_HEADER_SIZE, MASTER_DATA_TABLE_ENTRIES, MASTER_DATA_TABLE_SIZE_V1_1};

/// Entries of ATOM_MASTER_LIST_OF_DATA_TABLES, in table order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataTable {
    UtilityPipeLine,
    MultimediaCapabilityInfo,
    MultimediaConfigInfo,
    StandardVesaTiming,
    FirmwareInfo,
    PaletteData,
    LcdInfo,
    DigTransmitterInfo,
    AnalogTvInfo,
    SupportedDevicesInfo,
    GpioI2cInfo,
    VramUsageByFirmware,
    GpioPinLut,
    VesaToInternalModeLut,
    ComponentVideoInfo,
    PowerPlayInfo,
    GpuVirtualizationInfo,
    SaveRestoreInfo,
    PpllSsInfo,
    OemInfo,
    XtmdsInfo,
    MclkSsInfo,
    ObjectHeader,
    IndirectIoAccess,
    McInitParameter,
    AsicVddcInfo,
    AsicInternalSsInfo,
    TvVideoMode,
    VramInfo,
    MemoryTrainingInfo,
    IntegratedSystemInfo,
    AsicProfilingInfo,
    VoltageObjectInfo,
    PowerSourceInfo,
    ServiceInfo,
}

impl DataTable {
    pub const ALL: [DataTable; MASTER_DATA_TABLE_ENTRIES] = [
        DataTable::UtilityPipeLine,
        DataTable::MultimediaCapabilityInfo,
        DataTable::MultimediaConfigInfo,
        DataTable::StandardVesaTiming,
        DataTable::FirmwareInfo,
        DataTable::PaletteData,
        DataTable::LcdInfo,
        DataTable::DigTransmitterInfo,
        DataTable::AnalogTvInfo,
        DataTable::SupportedDevicesInfo,
        DataTable::GpioI2cInfo,
        DataTable::VramUsageByFirmware,
        DataTable::GpioPinLut,
        DataTable::VesaToInternalModeLut,
        DataTable::ComponentVideoInfo,
        DataTable::PowerPlayInfo,
        DataTable::GpuVirtualizationInfo,
        DataTable::SaveRestoreInfo,
        DataTable::PpllSsInfo,
        DataTable::OemInfo,
        DataTable::XtmdsInfo,
        DataTable::MclkSsInfo,
        DataTable::ObjectHeader,
        DataTable::IndirectIoAccess,
        DataTable::McInitParameter,
        DataTable::AsicVddcInfo,
        DataTable::AsicInternalSsInfo,
        DataTable::TvVideoMode,
        DataTable::VramInfo,
        DataTable::MemoryTrainingInfo,
        DataTable::IntegratedSystemInfo,
        DataTable::AsicProfilingInfo,
        DataTable::VoltageObjectInfo,
        DataTable::PowerSourceInfo,
        DataTable::ServiceInfo,
    ];

    /// Position of the entry after the common header.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DataTable::UtilityPipeLine => "UtilityPipeLine",
            DataTable::MultimediaCapabilityInfo => "MultimediaCapabilityInfo",
            DataTable::MultimediaConfigInfo => "MultimediaConfigInfo",
            DataTable::StandardVesaTiming => "StandardVESA_Timing",
            DataTable::FirmwareInfo => "FirmwareInfo",
            DataTable::PaletteData => "PaletteData",
            DataTable::LcdInfo => "LCD_Info",
            DataTable::DigTransmitterInfo => "DIGTransmitterInfo",
            DataTable::AnalogTvInfo => "AnalogTV_Info",
            DataTable::SupportedDevicesInfo => "SupportedDevicesInfo",
            DataTable::GpioI2cInfo => "GPIO_I2C_Info",
            DataTable::VramUsageByFirmware => "VRAM_UsageByFirmware",
            DataTable::GpioPinLut => "GPIO_Pin_LUT",
            DataTable::VesaToInternalModeLut => "VESA_ToInternalModeLUT",
            DataTable::ComponentVideoInfo => "ComponentVideoInfo",
            DataTable::PowerPlayInfo => "PowerPlayInfo",
            DataTable::GpuVirtualizationInfo => "GPUVirtualizationInfo",
            DataTable::SaveRestoreInfo => "SaveRestoreInfo",
            DataTable::PpllSsInfo => "PPLL_SS_Info",
            DataTable::OemInfo => "OemInfo",
            DataTable::XtmdsInfo => "XTMDS_Info",
            DataTable::MclkSsInfo => "MclkSS_Info",
            DataTable::ObjectHeader => "Object_Header",
            DataTable::IndirectIoAccess => "IndirectIOAccess",
            DataTable::McInitParameter => "MC_InitParameter",
            DataTable::AsicVddcInfo => "ASIC_VDDC_Info",
            DataTable::AsicInternalSsInfo => "ASIC_InternalSS_Info",
            DataTable::TvVideoMode => "TV_VideoMode",
            DataTable::VramInfo => "VRAM_Info",
            DataTable::MemoryTrainingInfo => "MemoryTrainingInfo",
            DataTable::IntegratedSystemInfo => "IntegratedSystemInfo",
            DataTable::AsicProfilingInfo => "ASIC_ProfilingInfo",
            DataTable::VoltageObjectInfo => "VoltageObjectInfo",
            DataTable::PowerSourceInfo => "PowerSourceInfo",
            DataTable::ServiceInfo => "ServiceInfo",
        }
    }
}

/// ATOM_MASTER_DATA_TABLE v1.1. Offsets are relative to the image start;
/// zero means the table is absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterDataTable {
    pub header: CommonTableHeader,
    offsets: [u16; MASTER_DATA_TABLE_ENTRIES],
}

impl MasterDataTable {
    pub fn from_bytes(bytes: &[u8]) -> Result<MasterDataTable> {
        StrapError::expect_len("ATOM_MASTER_DATA_TABLE", MASTER_DATA_TABLE_SIZE_V1_1, bytes)?;

        let mut offsets = [0; MASTER_DATA_TABLE_ENTRIES];
        for (i, entry) in bytes[COMMON_TABLE_HEADER_SIZE..].chunks_exact(2).enumerate() {
            offsets[i] = util::read_u16(entry);
        }

        Ok(MasterDataTable {
            header: CommonTableHeader::from_bytes(&bytes[..COMMON_TABLE_HEADER_SIZE])?,
            offsets,
        })
    }

    pub fn to_bytes(&self) -> [u8; MASTER_DATA_TABLE_SIZE_V1_1] {
        let mut bytes = [0; MASTER_DATA_TABLE_SIZE_V1_1];

        bytes[..COMMON_TABLE_HEADER_SIZE].copy_from_slice(&self.header.to_bytes());
        for (entry, offset) in bytes[COMMON_TABLE_HEADER_SIZE..].chunks_exact_mut(2).zip(self.offsets.iter()) {
            util::write_u16(entry, *offset);
        }

        bytes
    }

    pub fn offset(&self, table: DataTable) -> Option<u16> {
        match self.offsets[table.index()] {
            0 => None,
            offset => Some(offset),
        }
    }

    pub fn present(&self) -> impl Iterator<Item = (DataTable, u16)> + '_ {
        DataTable::ALL
            .iter()
            .filter_map(move |&table| self.offset(table).map(|offset| (table, offset)))
    }
}
