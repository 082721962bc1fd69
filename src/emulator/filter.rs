// Output filter applied to raw SPC700 samples
//
// Applies gain and a gentle bass roll-off that removes DC, saturating to
// 16 bits. State is kept per channel across calls.

use super::PostFilter;

/// Gain value giving unity amplitude
pub const GAIN_UNIT: u32 = 0x100;

const GAIN_BITS: u32 = 8;

/// Bass roll-off strength: shift applied to the running sum each sample
const BASS_SHIFT: u32 = 8;

#[derive(Debug, Default, Clone, Copy)]
struct Channel {
    p1: i32,
    pp1: i32,
    sum: i32,
}

#[derive(Debug)]
pub struct SpcFilter {
    gain: i32,
    channels: [Channel; 2],
}

impl Default for SpcFilter {
    fn default() -> Self {
        SpcFilter {
            gain: GAIN_UNIT as i32,
            channels: [Channel::default(); 2],
        }
    }
}

impl SpcFilter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostFilter for SpcFilter {
    fn clear(&mut self) {
        self.channels = [Channel::default(); 2];
    }

    fn set_gain(&mut self, gain: u32) {
        self.gain = gain.min(i32::MAX as u32) as i32;
    }

    fn run(&mut self, io: &mut [i16]) {
        let gain = self.gain;

        for (offset, chan) in self.channels.iter_mut().enumerate() {
            let Channel { mut p1, mut pp1, mut sum } = *chan;

            for sample in io.iter_mut().skip(offset).step_by(2) {
                let f = (*sample as i32).wrapping_add(p1);
                p1 = *sample as i32 * 3;
                let delta = f.wrapping_sub(pp1);
                pp1 = f;

                let mut s = sum >> (GAIN_BITS + 2);
                sum = sum
                    .wrapping_add(delta.wrapping_mul(gain))
                    .wrapping_sub(sum >> BASS_SHIFT);

                if s as i16 as i32 != s {
                    s = (s >> 31) ^ 0x7FFF;
                }
                *sample = s as i16;
            }

            *chan = Channel { p1, pp1, sum };
        }
    }
}
