// RIFF/WAVE container: 44-byte header up front, optional "ID3 " chunk after
// the sample data.

use std::io::Write;

use crate::error::{ConvertError, Result};
use crate::id3::{Id3v2Header, TagBuffer};
use crate::utils::io::{pack_u16_le, pack_u32_le};
use crate::{BYTES_PER_FRAME, BYTES_PER_SAMPLE, CHANNELS, SAMPLE_RATE};

pub const WAV_HEADER_SIZE: usize = 44;

/// Size of a chunk header: 4-byte id plus 4-byte length
const CHUNK_HEADER_SIZE: usize = 8;

/// Bytes the trailing tag chunk adds to the file, 0 when nothing is written
pub fn tag_chunk_size(tag_len: usize) -> usize {
    if tag_len > Id3v2Header::HEADER_SIZE {
        tag_len + CHUNK_HEADER_SIZE
    } else {
        0
    }
}

/// Size of the data chunk for `total_frames` stereo 16-bit frames
pub fn data_size(total_frames: u64) -> Result<u32> {
    total_frames
        .checked_mul(BYTES_PER_FRAME as u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            ConvertError::StreamTooLong(format!(
                "{} frames do not fit in a RIFF data chunk",
                total_frames
            ))
        })
}

/// Build the canonical 44-byte header
pub fn wav_header(total_frames: u64, tag_len: usize) -> Result<[u8; WAV_HEADER_SIZE]> {
    let data_size = data_size(total_frames)?;
    let riff_size: u32 = (data_size as u64 + WAV_HEADER_SIZE as u64 - CHUNK_HEADER_SIZE as u64
        + tag_chunk_size(tag_len) as u64)
        .try_into()
        .map_err(|_| ConvertError::StreamTooLong("RIFF size exceeds 4 GiB".to_string()))?;

    let channels = CHANNELS as u16;
    let block_align = (CHANNELS * BYTES_PER_SAMPLE) as u16;
    let mut h = [0u8; WAV_HEADER_SIZE];

    // RIFF header
    h[0..4].copy_from_slice(b"RIFF");
    pack_u32_le(&mut h[4..], riff_size);
    h[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    h[12..16].copy_from_slice(b"fmt ");
    pack_u32_le(&mut h[16..], 16); // sub-chunk size
    pack_u16_le(&mut h[20..], 1); // audio format (PCM)
    pack_u16_le(&mut h[22..], channels);
    pack_u32_le(&mut h[24..], SAMPLE_RATE);
    pack_u32_le(&mut h[28..], SAMPLE_RATE * block_align as u32);
    pack_u16_le(&mut h[32..], block_align);
    pack_u16_le(&mut h[34..], (BYTES_PER_SAMPLE * 8) as u16);

    // data sub-chunk
    h[36..40].copy_from_slice(b"data");
    pack_u32_le(&mut h[40..], data_size);

    Ok(h)
}

/// Write the header for `total_frames` frames and a tag of `tag_len` bytes
pub fn write_header<W: Write>(writer: &mut W, total_frames: u64, tag_len: usize) -> Result<()> {
    writer.write_all(&wav_header(total_frames, tag_len)?)?;
    Ok(())
}

/// Append the "ID3 " chunk. Returns `false` without writing anything when
/// the tag holds no frames.
pub fn write_footer<W: Write>(writer: &mut W, tag: &TagBuffer) -> Result<bool> {
    if tag.len() <= Id3v2Header::HEADER_SIZE {
        return Ok(false);
    }

    let mut head = [0u8; CHUNK_HEADER_SIZE];
    head[0..4].copy_from_slice(b"ID3 ");
    pack_u32_le(&mut head[4..], tag.len() as u32);

    writer.write_all(&head)?;
    writer.write_all(tag.as_bytes())?;
    Ok(true)
}
