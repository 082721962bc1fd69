//! spc2wav - render SNES SPC700 sound files to WAV
//!
//! The output is a canonical 16-bit stereo 32 kHz RIFF/WAVE file. The last
//! `fade` frames ramp linearly to silence, and the file's ID666 metadata can
//! be carried along as an ID3v2.4 tag in a trailing `"ID3 "` chunk.
//!
//! The tag is assembled before rendering starts because the RIFF header,
//! written first, includes its size. Rendering then streams fixed-size
//! chunks from an [`emulator::SpcEmulator`] through the post filter, the
//! fade envelope and the sample packer into the output.

pub mod convert;
pub mod emulator;
pub mod error;
pub mod id3;
pub mod id666;
pub mod render;
pub mod utils;

pub use convert::{build_tag, run_job, Job, JobOptions};
pub use emulator::{PostFilter, SpcEmulator, SpcFilter};
pub use error::{ConvertError, ErrorKind, Result};
pub use id3::TagBuffer;
pub use id666::SpcMetadata;
pub use render::{render, RenderSettings, RenderSummary};

/// Output sample rate of the SPC700 DSP
pub const SAMPLE_RATE: u32 = 32_000;

pub const CHANNELS: usize = 2;

pub const BYTES_PER_SAMPLE: usize = 2;

pub const BYTES_PER_FRAME: usize = CHANNELS * BYTES_PER_SAMPLE;

/// Frames rendered per loop iteration
pub const CHUNK_FRAMES: usize = 4096;

/// Filter gain used unless overridden (0x100 is unity)
pub const DEFAULT_AMP: u32 = 0x180;
