//! Microphone capture for voice messages
//!
//! `Microphone` separates stopping a take from releasing the device: the
//! session keeps the device held through the upload and calls `release` on
//! every exit path out of the voice flow.

pub mod capture;
#[cfg(feature = "audio-io")]
pub mod input;
pub mod wav;

pub use capture::{AudioBlob, AudioCapture};
#[cfg(feature = "audio-io")]
pub use input::CpalMicrophone;

use crate::{NatterError, Result};

/// A microphone with an explicit acquire / stop / release lifecycle
pub trait Microphone: Send {
    /// Acquire the device and begin buffering samples
    fn start_capture(&mut self) -> Result<()>;

    /// Stop buffering and hand back the take; the device stays held
    /// until `release` is called
    fn stop_capture(&mut self) -> Result<AudioCapture>;

    /// Stop all device activity and drop the handle; idempotent
    fn release(&mut self);
}

/// Microphone for hosts without audio capture; every take fails
///
/// Keeps the text flow usable when no capture backend is compiled in or
/// no device is expected to exist.
#[derive(Debug, Default)]
pub struct UnavailableMicrophone;

impl UnavailableMicrophone {
    pub fn new() -> Self {
        Self
    }
}

impl Microphone for UnavailableMicrophone {
    fn start_capture(&mut self) -> Result<()> {
        Err(NatterError::AudioDeviceError(
            "No microphone available".to_string(),
        ))
    }

    fn stop_capture(&mut self) -> Result<AudioCapture> {
        Err(NatterError::AudioDeviceError(
            "No microphone available".to_string(),
        ))
    }

    fn release(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_microphone_rejects_capture() {
        let mut mic = UnavailableMicrophone::new();
        assert!(matches!(
            mic.start_capture(),
            Err(NatterError::AudioDeviceError(_))
        ));
        assert!(mic.stop_capture().is_err());
        // release is a no-op either way
        mic.release();
        mic.release();
    }
}
