// Status output and logging for the CLI

use serde::Serialize;
use std::io::{self, Write};

use spc2wav::id3::{Id3v2Tag, TagBuffer};
use spc2wav::utils::time::frames_to_time;
use spc2wav::{Job, SpcMetadata, DEFAULT_AMP};

use super::config::OutputFormat;

/// What is about to be rendered, as shown to the user
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub input: String,
    pub output: String,
    pub gain: u32,
    pub default_gain: bool,
    pub length: String,
    pub play_length: String,
    pub fade_length: String,
    pub title: String,
    pub game: String,
    pub artist: String,
    pub dumper: String,
    pub comment: String,
    pub publisher: String,
    pub year: Option<i32>,
    pub dumped: Option<String>,
    pub amp: f64,
    pub id3_frames: Vec<String>,
}

impl StatusReport {
    pub fn new(job: &Job, meta: &SpcMetadata, tag: &TagBuffer) -> Self {
        let settings = &job.settings;
        StatusReport {
            input: job.input.display().to_string(),
            output: job.output.display().to_string(),
            gain: settings.gain,
            default_gain: settings.gain == DEFAULT_AMP,
            length: frames_to_time(settings.total_frames),
            play_length: frames_to_time(job.play_frames()),
            fade_length: frames_to_time(settings.fade_frames),
            title: meta.song.clone(),
            game: meta.game.clone(),
            artist: meta.artist.clone(),
            dumper: meta.dumper.clone(),
            comment: meta.comment.clone(),
            publisher: meta.publisher.clone(),
            year: meta.year,
            dumped: meta.dumped.map(|d| d.format("%Y-%m-%d").to_string()),
            amp: meta.amp as f64 / 65536.0,
            id3_frames: Id3v2Tag::parse(tag.as_bytes())
                .map(|t| t.frame_ids())
                .unwrap_or_default(),
        }
    }
}

/// Format and output status messages
pub struct Reporter {
    format: OutputFormat,
    quiet: bool,
}

impl Reporter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output the status report
    pub fn report(&self, status: &StatusReport, writer: &mut impl Write) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        match self.format {
            OutputFormat::Pretty => self.output_pretty(status, writer),
            OutputFormat::Json => {
                let json = serde_json::to_string(status).map_err(io::Error::other)?;
                writeln!(writer, "{}", json)
            }
        }
    }

    fn output_pretty(&self, s: &StatusReport, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer, "Decoding {} to {}", s.input, s.output)?;
        writeln!(
            writer,
            "Applying gain: 0x{:04x} ({})",
            s.gain,
            if s.default_gain { "default" } else { "custom" }
        )?;
        writeln!(writer, "Length: {}", s.length)?;
        writeln!(writer, "  Play length: {}", s.play_length)?;
        writeln!(writer, "  Fade length: {}", s.fade_length)?;
        writeln!(writer, "Title: {}", s.title)?;
        writeln!(writer, "Game: {}", s.game)?;
        writeln!(writer, "Artist: {}", s.artist)?;
        writeln!(writer, "Dumper: {}", s.dumper)?;
        writeln!(writer, "Comment: {}", s.comment)?;
        writeln!(writer, "Publisher: {}", s.publisher)?;
        match s.year {
            Some(year) => writeln!(writer, "Year: {}", year)?,
            None => writeln!(writer, "Year: unknown")?,
        }
        if let Some(dumped) = &s.dumped {
            writeln!(writer, "Dumped: {}", dumped)?;
        }
        writeln!(writer, "Amp (from SPC): {:.6}", s.amp)?;
        if !s.id3_frames.is_empty() {
            writeln!(writer, "ID3 frames: {}", s.id3_frames.join(", "))?;
        }
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            eprintln!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }
}

/// Install the stderr logger; later calls only adjust the level
pub fn init_logger(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
    log::set_max_level(level);
}
