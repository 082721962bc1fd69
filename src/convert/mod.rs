// Conversion job: resolve settings, assemble the tag, render to disk

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::emulator::{PostFilter, SpcEmulator};
use crate::error::{ConvertError, Result};
use crate::id3::frames::{frame_ids, DUMPER_DESCRIPTION};
use crate::id3::{Id3v2Builder, TagBuffer};
use crate::id666::SpcMetadata;
use crate::render::wav::wav_header;
use crate::render::{self, RenderSettings, RenderSummary};
use crate::{DEFAULT_AMP, SAMPLE_RATE};

/// User choices that shape a job, before metadata is consulted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Explicit gain; `DEFAULT_AMP` when unset
    pub amp: Option<u32>,
    /// Take the gain from the file's amplification field
    pub use_amp_tag: bool,
    pub embed_tag: bool,
    pub fade_secs: Option<u32>,
    pub length_secs: Option<u32>,
}

/// A fully resolved conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub settings: RenderSettings,
    pub embed_tag: bool,
}

impl Job {
    /// Combine options with the file's metadata. Explicit lengths win over
    /// the metadata, and the amp tag wins over `--amp`.
    pub fn resolve(options: &JobOptions, meta: &SpcMetadata) -> Self {
        let gain = if options.use_amp_tag {
            meta.amp_gain()
        } else {
            options.amp.unwrap_or(DEFAULT_AMP)
        };

        let total_frames = match options.length_secs {
            Some(secs) => secs as u64 * SAMPLE_RATE as u64,
            None => meta.total_frames(),
        };
        let fade_frames = match options.fade_secs {
            Some(secs) => secs as u64 * SAMPLE_RATE as u64,
            None => meta.fade_frames(),
        };

        Job {
            input: options.input.clone(),
            output: options
                .output
                .clone()
                .unwrap_or_else(|| default_output(&options.input)),
            settings: RenderSettings {
                total_frames,
                fade_frames,
                gain,
            },
            embed_tag: options.embed_tag,
        }
    }

    /// Frames played before the fade begins
    pub fn play_frames(&self) -> u64 {
        self.settings
            .total_frames
            .saturating_sub(self.settings.fade_frames)
    }
}

/// Fail early when the stream cannot be described by a RIFF header.
///
/// The length is blamed on the command line when `--length` set it and on
/// the file's metadata otherwise.
pub fn check_stream_size(job: &Job, options: &JobOptions, tag_len: usize) -> Result<()> {
    match wav_header(job.settings.total_frames, tag_len) {
        Ok(_) => Ok(()),
        Err(ConvertError::StreamTooLong(msg)) if options.length_secs.is_some() => {
            Err(ConvertError::Argument(format!("--length: {}", msg)))
        }
        Err(e) => Err(e),
    }
}

/// `input` with its extension replaced by `.wav` (appended if it has none)
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("wav")
}

/// Read the whole input file
pub fn load_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| ConvertError::InputFile {
        path: path.display().to_string(),
        source,
    })
}

/// Reset `buf` to a tag holding the metadata fields when `embed` is set.
///
/// Empty fields are skipped; with `embed` unset, or nothing to write, the
/// buffer holds only the preamble and no chunk is emitted for it.
pub fn build_tag(buf: &mut TagBuffer, meta: &SpcMetadata, embed: bool) -> Result<()> {
    let mut builder = Id3v2Builder::init(buf)?;
    if !embed {
        return Ok(());
    }

    if !meta.song.is_empty() {
        builder.add_text(frame_ids::TITLE, &meta.song)?;
    }
    if !meta.game.is_empty() {
        builder.add_text(frame_ids::ALBUM, &meta.game)?;
    }
    if !meta.dumper.is_empty() {
        builder.add_private(DUMPER_DESCRIPTION, &meta.dumper)?;
    }
    if !meta.comment.is_empty() {
        builder.add_comment(&meta.comment)?;
    }
    if !meta.artist.is_empty() {
        builder.add_text(frame_ids::ARTIST, &meta.artist)?;
    }
    if !meta.publisher.is_empty() {
        builder.add_text(frame_ids::PUBLISHER, &meta.publisher)?;
    }
    if let Some(year) = meta.year {
        builder.add_text(frame_ids::YEAR, &year.to_string())?;
    }

    log::debug!("tag assembled: {} bytes", builder.len());
    Ok(())
}

/// Create the output file and render the job into it
pub fn run_job<E, F>(
    job: &Job,
    tag: &TagBuffer,
    emulator: &mut E,
    filter: &mut F,
) -> Result<RenderSummary>
where
    E: SpcEmulator + ?Sized,
    F: PostFilter + ?Sized,
{
    let file = File::create(&job.output)?;
    let mut writer = BufWriter::new(file);
    render::render(emulator, filter, &mut writer, &job.settings, tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id3::Id3v2Tag;

    fn meta() -> SpcMetadata {
        SpcMetadata {
            song: "Terra".to_string(),
            game: "Final Fantasy III".to_string(),
            dumper: "Datschge".to_string(),
            comment: "Opening".to_string(),
            artist: "Nobuo Uematsu".to_string(),
            publisher: "Square".to_string(),
            year: Some(1994),
            ..SpcMetadata::default()
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let options = JobOptions {
            input: PathBuf::from("music/terra.spc"),
            ..JobOptions::default()
        };
        let m = meta();
        let job = Job::resolve(&options, &m);

        assert_eq!(job.output, PathBuf::from("music/terra.wav"));
        assert_eq!(job.settings.gain, DEFAULT_AMP);
        assert_eq!(job.settings.total_frames, m.total_frames());
        assert_eq!(job.settings.fade_frames, m.fade_frames());
        assert_eq!(job.play_frames(), 180 * 32_000);
        assert!(!job.embed_tag);
    }

    #[test]
    fn test_resolve_overrides() {
        let options = JobOptions {
            input: PathBuf::from("terra.spc"),
            output: Some(PathBuf::from("out.wav")),
            amp: Some(256),
            use_amp_tag: false,
            embed_tag: true,
            fade_secs: Some(2),
            length_secs: Some(30),
        };
        let job = Job::resolve(&options, &meta());
        assert_eq!(job.output, PathBuf::from("out.wav"));
        assert_eq!(job.settings.gain, 256);
        assert_eq!(job.settings.total_frames, 30 * 32_000);
        assert_eq!(job.settings.fade_frames, 2 * 32_000);
        assert!(job.embed_tag);
    }

    #[test]
    fn test_amp_tag_beats_explicit_amp() {
        let options = JobOptions {
            input: PathBuf::from("a.spc"),
            amp: Some(500),
            use_amp_tag: true,
            ..JobOptions::default()
        };
        let m = SpcMetadata {
            amp: 0x20000,
            ..SpcMetadata::default()
        };
        assert_eq!(Job::resolve(&options, &m).settings.gain, 0x200);
    }

    #[test]
    fn test_default_output_without_extension() {
        assert_eq!(default_output(Path::new("track")), PathBuf::from("track.wav"));
        assert_eq!(default_output(Path::new("a.b.spc")), PathBuf::from("a.b.wav"));
    }

    #[test]
    fn test_build_tag_order() {
        let mut buf = TagBuffer::new().unwrap();
        build_tag(&mut buf, &meta(), true).unwrap();
        let tag = Id3v2Tag::parse(buf.as_bytes()).unwrap();
        assert_eq!(
            tag.frame_ids(),
            vec!["TIT2", "TALB", "TXXX", "COMM", "TPE1", "TPUB", "TDRC"]
        );
        assert_eq!(tag.frames[2].data, b"\x03spc_dumper\x00Datschge\x00");
        assert_eq!(tag.header.size as usize, buf.len() - 10);
    }

    #[test]
    fn test_build_tag_skips_empty_fields() {
        let mut buf = TagBuffer::new().unwrap();
        let m = SpcMetadata {
            song: "Only".to_string(),
            ..SpcMetadata::default()
        };
        build_tag(&mut buf, &m, true).unwrap();
        let tag = Id3v2Tag::parse(buf.as_bytes()).unwrap();
        assert_eq!(tag.frame_ids(), vec!["TIT2"]);
    }

    #[test]
    fn test_build_tag_disabled() {
        let mut buf = TagBuffer::new().unwrap();
        build_tag(&mut buf, &meta(), false).unwrap();
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_oversized_metadata_length_is_input_error() {
        let options = JobOptions {
            input: PathBuf::from("long.spc"),
            ..JobOptions::default()
        };
        let m = SpcMetadata {
            total_len: 2 * (u32::MAX as u64),
            ..SpcMetadata::default()
        };
        let job = Job::resolve(&options, &m);
        let err = check_stream_size(&job, &options, 10).unwrap_err();
        assert!(matches!(err, ConvertError::StreamTooLong(_)));
        assert_eq!(err.kind(), crate::error::ErrorKind::Input);
    }

    #[test]
    fn test_oversized_length_option_is_argument_error() {
        let options = JobOptions {
            input: PathBuf::from("long.spc"),
            length_secs: Some(u32::MAX),
            ..JobOptions::default()
        };
        let job = Job::resolve(&options, &meta());
        let err = check_stream_size(&job, &options, 10).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Argument);
    }

    #[test]
    fn test_normal_length_fits() {
        let options = JobOptions::default();
        let job = Job::resolve(&options, &meta());
        assert!(check_stream_size(&job, &options, 200).is_ok());
    }

    #[test]
    fn test_load_input_missing() {
        let err = load_input(Path::new("/nonexistent/dir/file.spc")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Input);
    }
}
