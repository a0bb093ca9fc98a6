#[macro_use]
extern crate clap;

mod options;

use std::path::Path;

use anyhow::{Context, Result};
use clap::App;
use tracing_subscriber::EnvFilter;

use atomstrap::atom::{DataTable, ROM_CHECKSUM_OFFSET};
use atomstrap::{BiosImage, StrapFile, VramTimingEntry};

use crate::options::{Command, Options};

fn main() -> Result<()> {
    let yaml = load_yaml!("cli.yml");
    let matches = App::from_yaml(yaml).get_matches();
    let options = Options::from_matches(&matches)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(options.log_filter())))
        .with_writer(std::io::stderr)
        .init();

    match options.command {
        Command::Info { rom } => cmd_info(&rom),
        Command::Modules { rom } => cmd_modules(&rom),
        Command::Timings { rom, index } => cmd_timings(&rom, index),
        Command::Set {
            rom,
            mhz,
            index,
            latency,
            output,
        } => {
            let mut image = open(&rom)?;
            let strap = VramTimingEntry::new(mhz.saturating_mul(100), index, latency);

            image
                .set_timing(&strap)
                .with_context(|| format!("failed to set timings for index {} at {} MHz", index, mhz))?;
            save(&mut image, &output)
        }
        Command::Export { rom, file } => {
            let image = open(&rom)?;
            let source = rom.file_name().map(|name| name.to_string_lossy().into_owned());
            let straps = StrapFile::from_image(&image, source)?;

            straps.write(&file)?;
            println!("Exported {} straps to {}", straps.straps.len(), file.display());
            Ok(())
        }
        Command::Import { rom, file, output } => {
            let mut image = open(&rom)?;
            let straps = StrapFile::read(&file)?;

            let applied = straps.apply(&mut image)?;
            println!("Applied {} straps from {}", applied, file.display());
            save(&mut image, &output)
        }
    }
}

fn open(rom: &Path) -> Result<BiosImage> {
    BiosImage::open(rom).with_context(|| format!("failed to open {}", rom.display()))
}

fn save(image: &mut BiosImage, output: &Path) -> Result<()> {
    image
        .save(output)
        .with_context(|| format!("failed to save {}", output.display()))?;

    println!("Successfully saved to {}", output.display());
    Ok(())
}

fn cmd_info(rom: &Path) -> Result<()> {
    let image = open(rom)?;
    let header = image.rom_header()?;
    let master = image.master_data_table()?;

    println!("{}: {} bytes", rom.display(), image.as_bytes().len());
    println!("ROM header at {:#06x}", image.rom_header_offset());
    println!(
        "  subsystem {:04x}:{:04x}",
        header.subsystem_vendor_id, header.subsystem_id
    );
    println!("  master command table {:#06x}", header.master_command_table_offset);
    println!("  master data table {:#06x}", header.master_data_table_offset);

    println!("Data tables:");
    for (table, offset) in master.present() {
        println!("  {:<24} {:#06x}", table.name(), offset);
    }

    if master.offset(DataTable::VramInfo).is_some() {
        let vram = image.vram_info_header()?;
        println!(
            "VRAM_Info v{}.{}, {} bytes",
            vram.format_rev,
            vram.content_rev,
            vram.size()
        );

        match image.timings_offset() {
            Ok(offset) => println!("  straps at {:#06x}", offset),
            Err(e) => println!("  {}", e),
        }
    }

    println!(
        "Checksum {:#04x} ({})",
        image.as_bytes()[ROM_CHECKSUM_OFFSET],
        if image.checksum_valid() { "valid" } else { "invalid" }
    );

    Ok(())
}

fn cmd_modules(rom: &Path) -> Result<()> {
    let image = open(rom)?;
    let info = image.vram_info()?;

    println!("{} VRAM modules, version {}", info.modules.len(), info.module_version);
    for (i, module) in info.modules.iter().enumerate() {
        println!(
            "  [{}] {} {:#04x} type {:#04x} density {:#04x} channels {}x{} {}",
            i,
            module.vendor_name(),
            module.memory_vendor_id(),
            module.memory_type(),
            module.density(),
            module.channel_num(),
            module.channel_width(),
            module.part_number().unwrap_or("-")
        );
    }

    Ok(())
}

fn cmd_timings(rom: &Path, index: Option<u8>) -> Result<()> {
    let image = open(rom)?;

    for strap in image.timings()? {
        if index.map_or(true, |i| i == strap.index) {
            println!("{:>5} MHz  {:>3}  {}", strap.frequency_mhz(), strap.index, strap.latency_hex());
        }
    }

    Ok(())
}
