// End-to-end rendering through the public API

use std::io::Cursor;

use spc2wav::emulator::{PostFilter, SpcEmulator};
use spc2wav::id3::frames::frame_ids;
use spc2wav::id3::{Id3v2Builder, Id3v2Tag, TagBuffer};
use spc2wav::render::{render, RenderSettings};
use spc2wav::{build_tag, run_job, ConvertError, Job, SpcMetadata, CHUNK_FRAMES};

/// Emits a fixed sample pair, counting the frames requested
struct Constant {
    left: i16,
    right: i16,
    requested: Vec<usize>,
    echo_cleared: bool,
}

impl Constant {
    fn new(left: i16, right: i16) -> Self {
        Constant {
            left,
            right,
            requested: Vec::new(),
            echo_cleared: false,
        }
    }
}

impl SpcEmulator for Constant {
    fn play(&mut self, out: &mut [i16]) -> spc2wav::Result<()> {
        self.requested.push(out.len() / 2);
        for frame in out.chunks_exact_mut(2) {
            frame[0] = self.left;
            frame[1] = self.right;
        }
        Ok(())
    }

    fn clear_echo(&mut self) {
        self.echo_cleared = true;
    }
}

/// Leaves samples untouched, recording the gain it was given
#[derive(Default)]
struct Bypass {
    gain: Option<u32>,
    cleared: bool,
}

impl PostFilter for Bypass {
    fn clear(&mut self) {
        self.cleared = true;
    }

    fn set_gain(&mut self, gain: u32) {
        self.gain = Some(gain);
    }

    fn run(&mut self, _io: &mut [i16]) {}
}

/// Fails on the second chunk
struct Failing {
    calls: usize,
}

impl SpcEmulator for Failing {
    fn play(&mut self, out: &mut [i16]) -> spc2wav::Result<()> {
        self.calls += 1;
        if self.calls > 1 {
            return Err(ConvertError::Emulator("cpu stalled".to_string()));
        }
        out.fill(1);
        Ok(())
    }

    fn clear_echo(&mut self) {}
}

fn empty_tag() -> TagBuffer {
    let mut tag = TagBuffer::new().unwrap();
    Id3v2Builder::init(&mut tag).unwrap();
    tag
}

fn frames(wav: &[u8]) -> Vec<(i16, i16)> {
    wav[44..]
        .chunks_exact(4)
        .map(|b| {
            (
                i16::from_le_bytes([b[0], b[1]]),
                i16::from_le_bytes([b[2], b[3]]),
            )
        })
        .collect()
}

#[test]
fn test_fade_out_end_to_end() {
    let mut emulator = Constant::new(100, -100);
    let mut filter = Bypass::default();
    let settings = RenderSettings {
        total_frames: 10,
        fade_frames: 5,
        gain: 0x180,
    };
    let tag = empty_tag();

    let mut out = Vec::new();
    let summary = render(&mut emulator, &mut filter, &mut out, &settings, &tag).unwrap();

    assert_eq!(summary.frames, 10);
    assert_eq!(summary.bytes, 44 + 40);
    assert!(!summary.tag_written);
    assert_eq!(out.len(), 44 + 40);
    assert_eq!(u32::from_le_bytes(out[4..8].try_into().unwrap()), 40 + 36);

    assert!(emulator.echo_cleared);
    assert!(filter.cleared);
    assert_eq!(filter.gain, Some(0x180));

    let rendered = frames(&out);
    for (i, &frame) in rendered.iter().enumerate().take(5) {
        assert_eq!(frame, (100, -100), "frame {}", i);
    }
    let mut last = 100;
    for (i, &(l, r)) in rendered.iter().enumerate().skip(5) {
        let expected = (100.0 * ((10 - i) as f64 / 5.0)) as i16;
        assert_eq!((l, r), (expected, -expected), "frame {}", i);
        assert!(l <= last);
        last = l;
    }
    assert_eq!(rendered[9], (20, -20));
}

#[test]
fn test_chunks_never_exceed_remaining() {
    let total = CHUNK_FRAMES as u64 * 2 + 100;
    let mut emulator = Constant::new(1, 1);
    let mut filter = Bypass::default();
    let settings = RenderSettings {
        total_frames: total,
        fade_frames: 0,
        gain: 0x100,
    };

    let mut out = Vec::new();
    render(&mut emulator, &mut filter, &mut out, &settings, &empty_tag()).unwrap();

    assert_eq!(emulator.requested, vec![CHUNK_FRAMES, CHUNK_FRAMES, 100]);
    assert_eq!(out.len() as u64, 44 + total * 4);
    assert!(frames(&out).iter().all(|&f| f == (1, 1)));
}

#[test]
fn test_fade_longer_than_stream() {
    let mut emulator = Constant::new(1000, 1000);
    let mut filter = Bypass::default();
    let settings = RenderSettings {
        total_frames: 4,
        fade_frames: 8,
        gain: 0x100,
    };

    let mut out = Vec::new();
    render(&mut emulator, &mut filter, &mut out, &settings, &empty_tag()).unwrap();
    let left: Vec<i16> = frames(&out).iter().map(|f| f.0).collect();
    assert_eq!(left, vec![500, 375, 250, 125]);
}

#[test]
fn test_tag_chunk_appended() {
    let mut tag = TagBuffer::new().unwrap();
    let mut builder = Id3v2Builder::init(&mut tag).unwrap();
    builder.add_text(frame_ids::TITLE, "Hello").unwrap();

    let mut emulator = Constant::new(0, 0);
    let mut filter = Bypass::default();
    let settings = RenderSettings {
        total_frames: 1000,
        fade_frames: 0,
        gain: 0x100,
    };

    let mut out = Vec::new();
    let summary = render(&mut emulator, &mut filter, &mut out, &settings, &tag).unwrap();
    assert!(summary.tag_written);
    assert_eq!(out.len(), 44 + 4000 + 8 + 27);
    assert_eq!(summary.bytes, out.len() as u64);
    assert_eq!(u32::from_le_bytes(out[4..8].try_into().unwrap()), 4036 + 35);

    let footer = &out[44 + 4000..];
    assert_eq!(&footer[..4], b"ID3 ");
    assert_eq!(u32::from_le_bytes(footer[4..8].try_into().unwrap()), 27);
    let parsed = Id3v2Tag::parse(&footer[8..]).unwrap();
    assert_eq!(parsed.frame_ids(), vec!["TIT2"]);
}

#[test]
fn test_emulator_error_leaves_partial_output() {
    let mut emulator = Failing { calls: 0 };
    let mut filter = Bypass::default();
    let settings = RenderSettings {
        total_frames: CHUNK_FRAMES as u64 * 3,
        fade_frames: 0,
        gain: 0x100,
    };

    let mut out = Vec::new();
    let err = render(&mut emulator, &mut filter, &mut out, &settings, &empty_tag()).unwrap_err();
    assert!(matches!(err, ConvertError::Emulator(_)));
    assert_eq!(out.len(), 44 + CHUNK_FRAMES * 4);
}

#[test]
fn test_short_write_is_fatal() {
    let mut emulator = Constant::new(5, 5);
    let mut filter = Bypass::default();
    let settings = RenderSettings {
        total_frames: 100,
        fade_frames: 0,
        gain: 0x100,
    };

    let mut sink = vec![0u8; 100];
    let mut cursor = Cursor::new(&mut sink[..]);
    let err = render(&mut emulator, &mut filter, &mut cursor, &settings, &empty_tag()).unwrap_err();
    assert_eq!(err.kind(), spc2wav::ErrorKind::Io);
}

#[test]
fn test_run_job_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let meta = SpcMetadata {
        song: "Terra".to_string(),
        dumper: "Datschge".to_string(),
        year: Some(1994),
        play_len: 64_000,
        fade: 0,
        total_len: 64_000,
        ..SpcMetadata::default()
    };
    let job = Job {
        input: dir.path().join("terra.spc"),
        output: dir.path().join("terra.wav"),
        settings: RenderSettings {
            total_frames: meta.total_frames(),
            fade_frames: meta.fade_frames(),
            gain: 0x100,
        },
        embed_tag: true,
    };

    let mut tag = TagBuffer::new().unwrap();
    build_tag(&mut tag, &meta, job.embed_tag).unwrap();

    let mut emulator = Constant::new(-7, 7);
    let mut filter = Bypass::default();
    let summary = run_job(&job, &tag, &mut emulator, &mut filter).unwrap();

    let wav = std::fs::read(&job.output).unwrap();
    assert_eq!(wav.len() as u64, summary.bytes);
    assert_eq!(summary.frames, 32_000);
    assert_eq!(frames(&wav[..44 + 4 * 32_000])[31_999], (-7, 7));

    let footer = &wav[44 + 4 * 32_000..];
    let parsed = Id3v2Tag::parse(&footer[8..]).unwrap();
    assert_eq!(parsed.frame_ids(), vec!["TIT2", "TXXX", "TDRC"]);
}

#[test]
fn test_run_job_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let job = Job {
        input: dir.path().join("a.spc"),
        output: dir.path().join("missing").join("a.wav"),
        settings: RenderSettings {
            total_frames: 10,
            fade_frames: 0,
            gain: 0x100,
        },
        embed_tag: false,
    };
    let mut emulator = Constant::new(0, 0);
    let mut filter = Bypass::default();
    let err = run_job(&job, &empty_tag(), &mut emulator, &mut filter).unwrap_err();
    assert_eq!(err.kind(), spc2wav::ErrorKind::Io);
}
