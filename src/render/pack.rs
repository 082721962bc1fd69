// Sample packing for the RIFF data chunk

use crate::utils::io::pack_i16_le;
use crate::{BYTES_PER_FRAME, BYTES_PER_SAMPLE, CHANNELS};

/// Pack `frame_count` interleaved frames from `samples` into little-endian
/// bytes in `dest`. `dest` must hold at least `frame_count * 4` bytes.
pub fn pack_frames(dest: &mut [u8], samples: &[i16], frame_count: usize) {
    let frames = samples.chunks_exact(CHANNELS).take(frame_count);
    for (out, frame) in dest.chunks_exact_mut(BYTES_PER_FRAME).zip(frames) {
        pack_i16_le(&mut out[0..], frame[0]);
        pack_i16_le(&mut out[BYTES_PER_SAMPLE..], frame[1]);
    }
}
