// Streaming render loop: emulate, filter, fade, pack, write
pub mod fade;
pub mod pack;
pub mod wav;

use std::io::Write;

use crate::emulator::{PostFilter, SpcEmulator};
use crate::error::{ConvertError, Result};
use crate::id3::TagBuffer;
use crate::{BYTES_PER_FRAME, CHANNELS, CHUNK_FRAMES};

pub use fade::fade_frames;
pub use pack::pack_frames;
pub use wav::{write_footer, write_header, WAV_HEADER_SIZE};

/// What to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    pub total_frames: u64,
    pub fade_frames: u64,
    /// Filter gain in 1/256 units
    pub gain: u32,
}

/// Progress of a render; finished once `frames_remaining` reaches zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub frames_remaining: u64,
    pub fade_frames: u64,
}

impl RenderState {
    pub fn new(total_frames: u64, fade_frames: u64) -> Self {
        RenderState {
            frames_remaining: total_frames,
            fade_frames,
        }
    }

    /// Frames in the next chunk, `None` when done
    pub fn next_chunk(&self) -> Option<usize> {
        if self.is_done() {
            None
        } else {
            Some(self.frames_remaining.min(CHUNK_FRAMES as u64) as usize)
        }
    }

    pub fn advance(&mut self, frames: usize) {
        self.frames_remaining -= frames as u64;
    }

    pub fn is_done(&self) -> bool {
        self.frames_remaining == 0
    }
}

/// Outcome of a completed render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub frames: u64,
    pub bytes: u64,
    pub tag_written: bool,
}

/// Reset emulator and filter state and apply the gain
pub fn prime<E, F>(emulator: &mut E, filter: &mut F, gain: u32)
where
    E: SpcEmulator + ?Sized,
    F: PostFilter + ?Sized,
{
    emulator.clear_echo();
    filter.clear();
    filter.set_gain(gain);
}

/// Render a complete WAV stream into `writer`.
///
/// The header is written first using the final size of `tag`, so the tag
/// must be fully built before this is called. A failed write leaves
/// whatever was already written in place.
pub fn render<E, F, W>(
    emulator: &mut E,
    filter: &mut F,
    writer: &mut W,
    settings: &RenderSettings,
    tag: &TagBuffer,
) -> Result<RenderSummary>
where
    E: SpcEmulator + ?Sized,
    F: PostFilter + ?Sized,
    W: Write,
{
    let mut pcm: Vec<i16> = alloc_zeroed(CHUNK_FRAMES * CHANNELS, "sample buffer")?;
    let mut packed: Vec<u8> = alloc_zeroed(CHUNK_FRAMES * BYTES_PER_FRAME, "pack buffer")?;

    prime(emulator, filter, settings.gain);
    write_header(writer, settings.total_frames, tag.len())?;
    let mut bytes = WAV_HEADER_SIZE as u64;

    log::debug!(
        "rendering {} frames, fade {} frames, gain 0x{:04x}",
        settings.total_frames,
        settings.fade_frames,
        settings.gain
    );

    let mut state = RenderState::new(settings.total_frames, settings.fade_frames);
    while let Some(count) = state.next_chunk() {
        let samples = &mut pcm[..count * CHANNELS];
        emulator.play(samples)?;
        filter.run(samples);
        fade_frames(samples, state.frames_remaining, state.fade_frames, count);

        let out = &mut packed[..count * BYTES_PER_FRAME];
        pack_frames(out, samples, count);
        writer.write_all(out)?;

        bytes += out.len() as u64;
        state.advance(count);
        log::trace!("{} frames remaining", state.frames_remaining);
    }

    let tag_written = write_footer(writer, tag)?;
    if tag_written {
        bytes += wav::tag_chunk_size(tag.len()) as u64;
    } else {
        log::debug!("tag has no frames, skipping ID3 chunk");
    }
    writer.flush()?;

    Ok(RenderSummary {
        frames: settings.total_frames,
        bytes,
        tag_written,
    })
}

/// Allocate a zero-filled buffer once, reporting exhaustion instead of
/// aborting
fn alloc_zeroed<T: Clone + Default>(len: usize, what: &'static str) -> Result<Vec<T>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| ConvertError::Allocation(what))?;
    buf.resize(len, T::default());
    Ok(buf)
}
