// CLI configuration
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use spc2wav::utils::encoding::scan_uint;
use spc2wav::JobOptions;

/// spc2wav - render SPC700 sound files to WAV
#[derive(Parser, Debug)]
#[command(name = "spc2wav")]
#[command(about = "Render SNES SPC700 sound files to 16-bit stereo WAV", long_about = None)]
#[command(version)]
#[command(after_help = "\"Accurate\" SNES amplitude = 256\nDefault amplitude = 384")]
pub struct Config {
    /// Filter gain in 1/256 units
    #[arg(long, value_name = "AMPLITUDE", value_parser = parse_positive)]
    pub amp: Option<u32>,

    /// Take the gain from the amplification stored in the SPC file
    #[arg(long)]
    pub use_amp_tag: bool,

    /// Embed the SPC metadata as an ID3 chunk
    #[arg(long)]
    pub id3: bool,

    /// Fade length in seconds (overrides the file's)
    #[arg(long, value_name = "SECONDS", value_parser = parse_positive)]
    pub fade: Option<u32>,

    /// Total length in seconds, fade included (overrides the file's)
    #[arg(long, value_name = "SECONDS", value_parser = parse_positive)]
    pub length: Option<u32>,

    /// Status report format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Quiet mode (suppress the status report)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (show debug messages)
    #[arg(short, long)]
    pub verbose: bool,

    /// SPC file to render
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// WAV file to write (default: INPUT with a .wav extension)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

/// Status report format
#[derive(Debug, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object
    Json,
}

impl Config {
    pub fn job_options(&self) -> JobOptions {
        JobOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            amp: self.amp,
            use_amp_tag: self.use_amp_tag,
            embed_tag: self.id3,
            fade_secs: self.fade,
            length_secs: self.length,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

/// Leading decimal digits of `s`; zero or no digits is rejected
fn parse_positive(s: &str) -> Result<u32, String> {
    match scan_uint(s) {
        0 => Err(format!("'{}' is not a positive integer", s)),
        n => Ok(n),
    }
}
