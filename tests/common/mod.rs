#![allow(dead_code)]

use atomstrap::VRAM_TIMING_LATENCY_SIZE;

pub const ROM_HEADER_OFFSET: usize = 0x48;
pub const MASTER_DATA_TABLE_OFFSET: usize = 0x100;
pub const VRAM_INFO_OFFSET: usize = 0x200;
pub const VRAM_INFO_FIXED_SIZE: usize = 20;
pub const STRAP_SIZE: usize = 0x34;

pub fn latency(fill: u8) -> [u8; VRAM_TIMING_LATENCY_SIZE] {
    [fill; VRAM_TIMING_LATENCY_SIZE]
}

pub fn rom_header(master_data_table_offset: u16) -> Vec<u8> {
    let mut bytes = vec![0u8; 36];

    bytes[0..4].copy_from_slice(&[0x24, 0x00, 0x01, 0x01]);
    bytes[4..8].copy_from_slice(b"ATOM");
    bytes[24..26].copy_from_slice(&0x1002u16.to_le_bytes());
    bytes[26..28].copy_from_slice(&0x0b36u16.to_le_bytes());
    bytes[32..34].copy_from_slice(&master_data_table_offset.to_le_bytes());

    bytes
}

pub fn master_data_table(vram_info_offset: u16) -> Vec<u8> {
    let mut bytes = vec![0u8; 74];

    bytes[0..4].copy_from_slice(&[0x4a, 0x00, 0x01, 0x01]);
    bytes[60..62].copy_from_slice(&vram_info_offset.to_le_bytes());

    bytes
}

/// A v7/v8 module record with the given fixed size and part number.
pub fn module(fixed: usize, part_number: &str) -> Vec<u8> {
    let mut bytes = vec![0u8; fixed];
    bytes.extend_from_slice(part_number.as_bytes());
    bytes.resize(fixed + 20, 0);

    let size = bytes.len() as u16;
    bytes[0..4].copy_from_slice(&0x0000_3210u32.to_le_bytes());
    bytes[4..6].copy_from_slice(&size.to_le_bytes());
    bytes[11] = 0x50;
    bytes[12] = 8;
    bytes[13] = 4;
    bytes[28] = 0x06;

    bytes
}

pub fn strap(clock_range: u32, index: u8, latency: &[u8; VRAM_TIMING_LATENCY_SIZE]) -> Vec<u8> {
    let mut bytes = clock_range.to_le_bytes()[..3].to_vec();
    bytes.push(index);
    bytes.extend_from_slice(latency);
    bytes
}

/// Builds a firmware image: ROM header, master data table, then VRAM_Info
/// holding the modules followed by the straps and a zero terminator row.
pub struct ImageBuilder {
    pub size_blocks: u8,
    pub module_version: u8,
    pub modules: Vec<Vec<u8>>,
    pub straps: Vec<(u32, u8, [u8; VRAM_TIMING_LATENCY_SIZE])>,
    pub signature: [u8; 4],
    pub vram_info_offset: u16,
}

impl ImageBuilder {
    pub fn new() -> ImageBuilder {
        ImageBuilder {
            size_blocks: 8,
            module_version: 8,
            modules: vec![module(44, "H5GC4H24AJR"), module(44, "K4G41325FE")],
            straps: vec![
                (40000, 0, latency(0x10)),
                (80000, 0, latency(0x11)),
                (125000, 0, latency(0x12)),
                (175000, 0, latency(0x13)),
                (40000, 1, latency(0x20)),
                (80000, 1, latency(0x21)),
                (125000, 1, latency(0x22)),
                (175000, 1, latency(0x23)),
            ],
            signature: *b"ATOM",
            vram_info_offset: VRAM_INFO_OFFSET as u16,
        }
    }

    pub fn straps_offset(&self) -> usize {
        VRAM_INFO_OFFSET + VRAM_INFO_FIXED_SIZE + self.modules.iter().map(Vec::len).sum::<usize>()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut image = vec![0u8; usize::from(self.size_blocks) * 512];
        image[0] = 0x55;
        image[1] = 0xaa;
        image[2] = self.size_blocks;

        let mut header = rom_header(MASTER_DATA_TABLE_OFFSET as u16);
        header[4..8].copy_from_slice(&self.signature);
        place(&mut image, ROM_HEADER_OFFSET, &header);
        place(&mut image, MASTER_DATA_TABLE_OFFSET, &master_data_table(self.vram_info_offset));

        let mut vram_info = vec![0u8; VRAM_INFO_FIXED_SIZE];
        for m in &self.modules {
            vram_info.extend_from_slice(m);
        }
        let straps_at = vram_info.len() as u16;
        for (clock_range, index, latency) in &self.straps {
            vram_info.extend_from_slice(&strap(*clock_range, *index, latency));
        }
        vram_info.extend_from_slice(&[0u8; STRAP_SIZE]);

        let size = vram_info.len() as u16;
        vram_info[0..2].copy_from_slice(&size.to_le_bytes());
        vram_info[2] = 2;
        vram_info[3] = 2;
        vram_info[6..8].copy_from_slice(&straps_at.to_le_bytes());
        vram_info[16] = self.modules.len() as u8;
        vram_info[17] = 1;
        vram_info[18] = self.module_version;
        place(&mut image, VRAM_INFO_OFFSET, &vram_info);

        image
    }
}

pub fn place(image: &mut [u8], offset: usize, bytes: &[u8]) {
    image[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// The minimal layout: ROM tag at 100, master table at 200, VRAM_Info at
/// 300 declaring 40 bytes with one v8 module, and a single strap at 320.
pub fn minimal_image(len: usize) -> Vec<u8> {
    let mut image = vec![0u8; len];

    place(&mut image, 100, &rom_header(200));
    place(&mut image, 200, &master_data_table(300));

    let mut vram_info = vec![0u8; VRAM_INFO_FIXED_SIZE];
    vram_info[0..2].copy_from_slice(&40u16.to_le_bytes());
    vram_info[2] = 2;
    vram_info[3] = 2;
    vram_info[16] = 1;
    vram_info[18] = 8;
    place(&mut image, 300, &vram_info);

    place(&mut image, 320, &strap(40000, 3, &latency(0xaa)));

    image
}
