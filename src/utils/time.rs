// Frame count formatting for status output

use crate::SAMPLE_RATE;

/// Format a frame count at 32 kHz as `MM:SS.mmm`.
///
/// Minutes are not wrapped, so very long streams print as e.g. `125:00.000`.
pub fn frames_to_time(frames: u64) -> String {
    let millis = frames / (SAMPLE_RATE as u64 / 1000);
    let mill = millis % 1000;
    let secs = millis / 1000;
    format!("{:02}:{:02}.{:03}", secs / 60, secs % 60, mill)
}
