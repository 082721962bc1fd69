// SPC700 emulation seam
//
// The render loop drives an emulator through `SpcEmulator` and post-processes
// its output through `PostFilter`. The filter is implemented here; the CPU
// and DSP core is supplied by the embedding application.

pub mod filter;

pub use filter::SpcFilter;

use crate::error::{ConvertError, Result};
use crate::id666::{SPC_MIN_SIZE, SPC_SIGNATURE};

/// Source of raw 32 kHz stereo samples
pub trait SpcEmulator {
    /// Fill `out` with interleaved left/right samples; `out.len()` is even
    fn play(&mut self, out: &mut [i16]) -> Result<()>;

    /// Clear the echo buffer so rendering starts from silence
    fn clear_echo(&mut self);
}

/// In-place processing of rendered samples
pub trait PostFilter {
    fn clear(&mut self);

    /// Gain in 1/256 units
    fn set_gain(&mut self, gain: u32);

    fn run(&mut self, io: &mut [i16]);
}

impl<T: SpcEmulator + ?Sized> SpcEmulator for Box<T> {
    fn play(&mut self, out: &mut [i16]) -> Result<()> {
        (**self).play(out)
    }

    fn clear_echo(&mut self) {
        (**self).clear_echo()
    }
}

/// Check that `rom` is a loadable SPC image
pub fn validate_image(rom: &[u8]) -> Result<()> {
    if !rom.starts_with(SPC_SIGNATURE) {
        return Err(ConvertError::Emulator("not an SPC file".to_string()));
    }
    if rom.len() < SPC_MIN_SIZE {
        return Err(ConvertError::Emulator("SPC image is truncated".to_string()));
    }
    Ok(())
}

/// Load `rom` into the emulator core linked into this build.
///
/// The crate carries no SPC700 core of its own. Applications that embed one
/// call `convert::run_job` with it directly.
pub fn open(rom: &[u8]) -> Result<Box<dyn SpcEmulator>> {
    validate_image(rom)?;
    Err(ConvertError::Emulator(
        "no SPC700 emulator core is linked into this build".to_string(),
    ))
}
