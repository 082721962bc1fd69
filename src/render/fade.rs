// Linear fade-out over the last frames of the stream

/// Attenuate the frames of `chunk` that fall inside the fade window.
///
/// `chunk` holds `frame_count` interleaved stereo frames, and
/// `frames_remaining` counts the frames left in the stream including this
/// chunk. Callers never pass a chunk longer than what remains. The ramp
/// reaches `1 / fade_frames` on the final frame of the stream.
pub fn fade_frames(chunk: &mut [i16], frames_remaining: u64, fade_frames: u64, frame_count: usize) {
    let count = frame_count as u64;
    debug_assert!(count <= frames_remaining);

    if fade_frames == 0 || frames_remaining - count > fade_frames {
        return;
    }

    // `start` is the first frame of this chunk inside the window, `end` the
    // chunk-relative offset where the window closes
    let (start, end) = if frames_remaining > fade_frames {
        let start = frames_remaining - fade_frames;
        (start, fade_frames + start)
    } else {
        (0, frames_remaining)
    };

    let window = fade_frames as f64;
    for i in start..count {
        let gain = (end - i) as f64 / window;
        let frame = &mut chunk[i as usize * 2..i as usize * 2 + 2];
        frame[0] = (frame[0] as f64 * gain) as i16;
        frame[1] = (frame[1] as f64 * gain) as i16;
    }
}
