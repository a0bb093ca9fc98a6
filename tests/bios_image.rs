mod common;

use atomstrap::atom::{DataTable, MasterDataTable, RomHeader, VramModule};
use atomstrap::{BiosImage, ErrorKind, StrapError, VramTimingEntry};

use common::*;

fn load(builder: &ImageBuilder) -> BiosImage {
    BiosImage::from_bytes(builder.build()).unwrap()
}

#[test]
fn minimal_image_lists_single_strap() {
    let image = BiosImage::from_bytes(minimal_image(1024)).unwrap();

    assert_eq!(image.rom_header_offset(), 100);
    assert_eq!(image.vram_info_offset().unwrap(), 300);
    assert_eq!(image.timings_offset().unwrap(), 320);

    let timings = atomstrap::list_timings(&image).unwrap();
    assert_eq!(timings, vec![VramTimingEntry::new(40000, 3, latency(0xaa))]);
}

#[test]
fn strap_running_past_end_of_image_ends_the_list() {
    let image = BiosImage::from_bytes(minimal_image(320 + STRAP_SIZE + 10)).unwrap();

    assert_eq!(image.timings().unwrap().len(), 1);
}

#[test]
fn timings_in_file_order() {
    let builder = ImageBuilder::new();
    let image = load(&builder);

    let keys: Vec<_> = image.timings().unwrap().iter().map(VramTimingEntry::key).collect();
    let expected: Vec<_> = builder.straps.iter().map(|&(c, i, _)| (c, i)).collect();

    assert_eq!(keys, expected);
    assert_eq!(image.timings_offset().unwrap(), builder.straps_offset());
    assert_eq!(image.ram_ic_indices().unwrap(), vec![0, 1]);
}

#[test]
fn zero_clock_range_ends_the_list() {
    let builder = ImageBuilder::new();
    let mut bytes = builder.build();
    let fifth = builder.straps_offset() + 4 * STRAP_SIZE;
    bytes[fifth..fifth + 3].copy_from_slice(&[0, 0, 0]);

    let image = BiosImage::from_bytes(bytes).unwrap();
    let timings = image.timings().unwrap();

    assert_eq!(timings.len(), 4);
    assert!(timings.iter().all(|t| t.index == 0));
}

#[test]
fn at_most_32_straps() {
    let mut builder = ImageBuilder::new();
    builder.straps = (0..40).map(|i| (40000 + i * 100, 0, latency(i as u8))).collect();

    let timings = load(&builder).timings().unwrap();

    assert_eq!(timings.len(), 32);
    assert_eq!(timings[31].clock_range, 40000 + 31 * 100);
}

#[test]
fn missing_rom_header() {
    let err = BiosImage::from_bytes(vec![0u8; 1024]).err().unwrap();

    assert!(matches!(err, StrapError::HeaderNotFound));
    assert_eq!(err.kind(), ErrorKind::Discovery);
}

#[test]
fn bad_signature() {
    let mut builder = ImageBuilder::new();
    builder.signature = *b"ATIM";

    let err = BiosImage::from_bytes(builder.build()).err().unwrap();

    assert!(matches!(err, StrapError::BadSignature { .. }));
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn master_table_past_end_of_image() {
    let mut bytes = vec![0u8; 256];
    place(&mut bytes, 0x10, &rom_header(0x00f0));

    let err = BiosImage::from_bytes(bytes).err().unwrap();

    assert!(matches!(err, StrapError::OutOfBounds { offset: 0xf0, len: 74, .. }));
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn absent_vram_info() {
    let mut builder = ImageBuilder::new();
    builder.vram_info_offset = 0;
    let image = load(&builder);

    let err = image.timings().unwrap_err();

    assert!(matches!(err, StrapError::TableAbsent("VRAM_Info")));
    assert_eq!(err.kind(), ErrorKind::Discovery);
}

#[test]
fn vram_info_size_below_header_length() {
    let mut bytes = ImageBuilder::new().build();
    place(&mut bytes, VRAM_INFO_OFFSET, &2u16.to_le_bytes());
    let image = BiosImage::from_bytes(bytes).unwrap();

    let err = image.timings().unwrap_err();
    assert!(matches!(
        err,
        StrapError::InvalidTableSize {
            structure: "ATOM_COMMON_TABLE_HEADER",
            size: 2,
            min: 4
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Decode);

    assert_eq!(image.vram_info_header().unwrap_err().kind(), ErrorKind::Decode);
    assert_eq!(image.vram_info().unwrap_err().kind(), ErrorKind::Decode);
}

#[test]
fn missing_400mhz_strap() {
    let mut builder = ImageBuilder::new();
    builder.straps.retain(|&(clock_range, _, _)| clock_range != 40000);
    let image = load(&builder);

    let err = image.timings().unwrap_err();

    assert!(matches!(err, StrapError::StrapNotFound));
    assert_eq!(err.kind(), ErrorKind::Discovery);
}

#[test]
fn decodes_modules() {
    let image = load(&ImageBuilder::new());

    let info = image.vram_info().unwrap();
    assert_eq!(info.declared_size(), image.vram_info_range().unwrap().len());
    assert_eq!(info.module_version, 8);

    let modules = atomstrap::get_vram_modules(&image).unwrap();
    let parts: Vec<_> = modules.iter().map(VramModule::part_number).collect();
    assert_eq!(parts, vec![Some("H5GC4H24AJR"), Some("K4G41325FE")]);
    assert!(modules.iter().all(|m| m.version() == 8 && m.vendor_name() == "Hynix"));
}

#[test]
fn decodes_v7_modules() {
    let mut builder = ImageBuilder::new();
    builder.module_version = 7;
    builder.modules = vec![module(32, "EDW4032BABG")];

    let modules = load(&builder).vram_modules().unwrap();

    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].version(), 7);
    assert_eq!(modules[0].part_number(), Some("EDW4032BABG"));
}

#[test]
fn unsupported_module_version() {
    let mut builder = ImageBuilder::new();
    builder.module_version = 9;
    let image = load(&builder);

    let err = image.vram_modules().unwrap_err();
    assert!(matches!(err, StrapError::UnsupportedModuleVersion(9)));
    assert_eq!(err.kind(), ErrorKind::Decode);

    // straps only need the VRAM_Info extent
    assert_eq!(image.timings().unwrap().len(), builder.straps.len());
}

#[test]
fn structures_round_trip_against_image_bytes() {
    let builder = ImageBuilder::new();
    let image = load(&builder);
    let bytes = image.as_bytes();

    let header = image.rom_header().unwrap();
    assert_eq!(header.to_bytes()[..], bytes[ROM_HEADER_OFFSET..ROM_HEADER_OFFSET + 36]);
    assert_eq!(RomHeader::from_bytes(&header.to_bytes()).unwrap(), header);
    assert_eq!((header.subsystem_vendor_id, header.subsystem_id), (0x1002, 0x0b36));

    let master = image.master_data_table().unwrap();
    assert_eq!(master.to_bytes()[..], bytes[MASTER_DATA_TABLE_OFFSET..MASTER_DATA_TABLE_OFFSET + 74]);
    assert_eq!(MasterDataTable::from_bytes(&master.to_bytes()).unwrap(), master);
    assert_eq!(master.present().count(), 1);
    assert_eq!(master.offset(DataTable::VramInfo), Some(VRAM_INFO_OFFSET as u16));

    let start = builder.straps_offset();
    for (i, strap) in image.timings().unwrap().iter().enumerate() {
        let at = start + i * STRAP_SIZE;
        assert_eq!(strap.to_bytes()[..], bytes[at..at + STRAP_SIZE]);
    }
}
