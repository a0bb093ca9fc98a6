//! Decoders for the ATOM firmware tables on the path from the ROM header
//! down to the VRAM timing straps.
//!
//! Every decoder takes an exact-length slice (or, for variable-size
//! tables, a slice whose prefix is the fixed part) and returns an owned
//! copy of the fields. Nothing here keeps a reference into the image.

mod header;
mod master_data;
mod timing;
mod vram_info;
mod vram_module;

pub use self::header::{CommonTableHeader, RomHeader};
pub use self::master_data::{DataTable, MasterDataTable};
pub use self::timing::{TimingKey, VramTimingEntry};
pub use self::vram_info::{VramInfo, VramModuleHeader};
pub use self::vram_module::{VramModule, VramModuleV7, VramModuleV8};

/// ATOM_COMMON_TABLE_HEADER, all revisions.
pub const COMMON_TABLE_HEADER_SIZE: usize = 4;

/// ATOM_ROM_HEADER v1.1: its common header bytes double as the search tag.
pub const ROM_HEADER_TAG_V1_1: [u8; 4] = [0x24, 0x00, 0x01, 0x01];
pub const ROM_HEADER_SIZE_V1_1: usize = 36;
/// "ATOM" read little-endian.
pub const ATOM_BIOS_SIGNATURE: u32 = 0x4d4f_5441;

/// ATOM_MASTER_DATA_TABLE v1.1: header plus 35 u16 offsets.
pub const MASTER_DATA_TABLE_ENTRIES: usize = 35;
pub const MASTER_DATA_TABLE_SIZE_V1_1: usize = COMMON_TABLE_HEADER_SIZE + MASTER_DATA_TABLE_ENTRIES * 2;

/// ATOM_VRAM_INFO v2.2 fixed part, before the module records.
pub const VRAM_INFO_FIXED_SIZE_V2_2: usize = COMMON_TABLE_HEADER_SIZE + 16;
pub const VRAM_MODULE_HEADER_SIZE: usize = 6;
pub const VRAM_MODULE_V7_FIXED_SIZE: usize = 32;
pub const VRAM_MODULE_V8_FIXED_SIZE: usize = 44;

/// ATOM_VRAM_TIMING_ENTRY: u24 clock range, u8 index, 48 latency bytes.
pub const VRAM_TIMING_ENTRY_SIZE: usize = 0x34;
pub const VRAM_TIMING_LATENCY_SIZE: usize = 0x30;
pub const VRAM_TIMING_MAX_ENTRIES: usize = 32;

/// Low 24 bits of the 400MHz clock range (40000 in 10kHz units). The
/// first strap row in known images carries this value.
pub const STRAP_400MHZ_MARKER: [u8; 3] = [0x40, 0x9c, 0x00];

/// Legacy expansion ROM checksum byte and block size.
pub const ROM_CHECKSUM_OFFSET: usize = 0x21;
pub const ROM_SIZE_OFFSET: usize = 2;
pub const ROM_BLOCK_SIZE: usize = 512;
