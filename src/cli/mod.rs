//! Command-line surface of the `bzip3` binary.
//!
//! One of `-e`, `-d` or `-t` selects the operation. File names follow the
//! usual suffix conventions: encoding `FILE` writes `FILE.bz3` unless an
//! output is given, decoding `FILE.bz3` strips the suffix. `-c` forces the
//! standard streams; binary data is never knowingly written to or read from
//! a terminal.

use std::fs::File;
use std::io::{BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser};

use crate::io as stream_io;

const BZ3_EXTENSION: &str = ".bz3";
const MIB: usize = 1024 * 1024;

#[derive(Parser, Debug)]
#[command(
    name = "bzip3",
    version,
    about = "A better and stronger spiritual successor to bzip2"
)]
#[command(group(ArgGroup::new("mode").required(true).multiple(false)))]
pub struct Cli {
    /// Encode the input
    #[arg(short = 'e', group = "mode")]
    pub encode: bool,

    /// Decode the input
    #[arg(short = 'd', group = "mode")]
    pub decode: bool,

    /// Verify the input without writing any output
    #[arg(short = 't', group = "mode")]
    pub test: bool,

    /// Force reading/writing the standard streams
    #[arg(short = 'c')]
    pub stdio: bool,

    /// Overwrite the output file if it already exists
    #[arg(short = 'f')]
    pub force: bool,

    /// Block size in MiB
    #[arg(
        short = 'b',
        value_name = "N",
        default_value_t = 8,
        value_parser = clap::value_parser!(u32).range(1..=511)
    )]
    pub block_mib: u32,

    /// Parallel workers, at most 16; 0 picks one per CPU core
    #[arg(
        short = 'j',
        value_name = "N",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(0..=16)
    )]
    pub jobs: u32,

    /// Input file; standard input when omitted
    pub input: Option<PathBuf>,

    /// Output file; derived from the input name when omitted
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
    Test,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.encode {
            Mode::Encode
        } else if self.decode {
            Mode::Decode
        } else {
            Mode::Test
        }
    }
}

/// Derive the output path from the mode and input name, mirroring the
/// suffix conventions. `None` means the standard output.
fn resolve_output(cli: &Cli, mode: Mode) -> anyhow::Result<Option<PathBuf>> {
    if mode == Mode::Test {
        return Ok(None);
    }
    if let Some(out) = &cli.output {
        return Ok(Some(out.clone()));
    }
    if cli.stdio {
        return Ok(None);
    }
    let Some(input) = &cli.input else {
        return Ok(None);
    };
    let name = input
        .to_str()
        .context("input file name is not valid UTF-8")?;
    match mode {
        Mode::Encode => Ok(Some(PathBuf::from(format!("{name}{BZ3_EXTENSION}")))),
        Mode::Decode => match name.strip_suffix(BZ3_EXTENSION) {
            Some(stem) if !stem.is_empty() => Ok(Some(PathBuf::from(stem))),
            _ => bail!("cannot determine an output file name from {name:?}; pass one explicitly"),
        },
        Mode::Test => unreachable!(),
    }
}

/// Execute the parsed command line. Errors map to exit code 1 in `main`.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = cli.mode();
    let block_size = cli.block_mib as usize * MIB;
    let workers = if cli.jobs == 0 {
        num_cpus::get().clamp(1, crate::batch::MAX_PARALLEL_BLOCKS)
    } else {
        cli.jobs as usize
    };

    let output_path = resolve_output(&cli, mode)?;

    // Refuse terminal binary traffic: compressed bytes to a TTY, or
    // compressed input from one.
    if mode == Mode::Encode && output_path.is_none() && std::io::stdout().is_terminal() {
        bail!("refusing to write compressed data to the terminal");
    }
    if mode != Mode::Encode && cli.input.is_none() && std::io::stdin().is_terminal() {
        bail!("refusing to read compressed data from the terminal");
    }

    if let Some(out) = &output_path {
        if out.exists() && !cli.force {
            bail!("output file {} already exists; use -f to overwrite", out.display());
        }
    }

    let mut reader: BufReader<Box<dyn Read>> = match &cli.input {
        Some(path) => BufReader::new(Box::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => BufReader::new(Box::new(std::io::stdin())),
    };

    match mode {
        Mode::Test => {
            stream_io::test_stream(&mut reader, workers)?;
        }
        Mode::Encode | Mode::Decode => {
            let mut writer: BufWriter<Box<dyn Write>> = match &output_path {
                Some(path) => BufWriter::new(Box::new(
                    File::create(path).with_context(|| format!("creating {}", path.display()))?,
                )),
                None => BufWriter::new(Box::new(std::io::stdout())),
            };
            if mode == Mode::Encode {
                stream_io::compress_stream(&mut reader, &mut writer, block_size, workers)?;
            } else {
                stream_io::decompress_stream(&mut reader, Some(&mut writer), workers)?;
            }
            writer.flush().context("flushing output")?;
        }
    }
    Ok(())
}
