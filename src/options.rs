use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::ArgMatches;

use atomstrap::VRAM_TIMING_LATENCY_SIZE;

pub enum Command {
    Info { rom: PathBuf },
    Modules { rom: PathBuf },
    Timings { rom: PathBuf, index: Option<u8> },
    Set {
        rom: PathBuf,
        mhz: u32,
        index: u8,
        latency: [u8; VRAM_TIMING_LATENCY_SIZE],
        output: PathBuf,
    },
    Export { rom: PathBuf, file: PathBuf },
    Import { rom: PathBuf, file: PathBuf, output: PathBuf },
}

pub struct Options {
    pub verbosity: u64,
    pub command: Command,
}

impl Options {
    pub fn from_matches(matches: &ArgMatches) -> Result<Options> {
        let (name, sub) = match matches.subcommand() {
            (name, Some(sub)) => (name, sub),
            _ => bail!("no command given"),
        };

        let verbosity = matches.occurrences_of("verbose").max(sub.occurrences_of("verbose"));

        let command = match name {
            "info" => Command::Info { rom: path(sub, "ROM")? },
            "modules" => Command::Modules { rom: path(sub, "ROM")? },
            "timings" => Command::Timings {
                rom: path(sub, "ROM")?,
                index: sub.value_of("index").map(parse_index).transpose()?,
            },
            "set" => Command::Set {
                rom: path(sub, "ROM")?,
                mhz: value(sub, "mhz")?
                    .parse()
                    .with_context(|| format!("invalid frequency {:?}", sub.value_of("mhz")))?,
                index: parse_index(value(sub, "index")?)?,
                latency: parse_latency(value(sub, "latency")?)?,
                output: path(sub, "output")?,
            },
            "export" => Command::Export {
                rom: path(sub, "ROM")?,
                file: path(sub, "FILE")?,
            },
            "import" => Command::Import {
                rom: path(sub, "ROM")?,
                file: path(sub, "FILE")?,
                output: path(sub, "output")?,
            },
            other => bail!("unknown command {}", other),
        };

        Ok(Options { verbosity, command })
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn value<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches.value_of(name).ok_or_else(|| anyhow!("missing {}", name))
}

fn path(matches: &ArgMatches, name: &str) -> Result<PathBuf> {
    value(matches, name).map(PathBuf::from)
}

fn parse_index(value: &str) -> Result<u8> {
    value.parse().with_context(|| format!("invalid RAM IC index {:?}", value))
}

/// Latency bytes as written by `timings`: exactly 96 hex digits.
pub fn parse_latency(hex: &str) -> Result<[u8; VRAM_TIMING_LATENCY_SIZE]> {
    let hex = hex.trim();

    if hex.len() != VRAM_TIMING_LATENCY_SIZE * 2 || !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
        bail!("latency must be exactly {} hex digits", VRAM_TIMING_LATENCY_SIZE * 2);
    }

    let mut latency = [0; VRAM_TIMING_LATENCY_SIZE];
    for (i, byte) in latency.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)?;
    }

    Ok(latency)
}
