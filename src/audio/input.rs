//! Microphone backed by the default cpal input device
//!
//! cpal streams are not `Send`, so the device and stream live on a worker
//! thread; `CpalMicrophone` is a channel-backed handle the session can own.
//! Stopping a take leaves the stream open (device still held); `release`
//! tears it down.

use crate::audio::capture::AudioCapture;
use crate::audio::wav::{downmix_to_mono, encode_wav};
use crate::audio::Microphone;
use crate::{NatterError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

enum CaptureCommand {
    Start,
    Stop,
    Release,
    Shutdown,
}

enum CaptureReply {
    Started(Result<()>),
    Stopped(Result<(Vec<f32>, u32)>),
}

pub struct CpalMicrophone {
    command_tx: Sender<CaptureCommand>,
    reply_rx: Receiver<CaptureReply>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CpalMicrophone {
    /// Spawn the capture worker. The device itself is opened lazily on the
    /// first `start_capture`, so construction cannot fail.
    pub fn new() -> Self {
        let (command_tx, command_rx) = bounded(4);
        let (reply_tx, reply_rx) = bounded(4);
        let worker = thread::spawn(move || run_capture_worker(command_rx, reply_tx));

        Self {
            command_tx,
            reply_rx,
            worker: Some(worker),
        }
    }

    fn send(&self, command: CaptureCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| NatterError::ChannelError("capture worker is gone".to_string()))
    }

    fn recv(&self) -> Result<CaptureReply> {
        self.reply_rx
            .recv()
            .map_err(|_| NatterError::ChannelError("capture worker is gone".to_string()))
    }
}

impl Default for CpalMicrophone {
    fn default() -> Self {
        Self::new()
    }
}

impl Microphone for CpalMicrophone {
    fn start_capture(&mut self) -> Result<()> {
        self.send(CaptureCommand::Start)?;
        match self.recv()? {
            CaptureReply::Started(result) => result,
            CaptureReply::Stopped(_) => Err(NatterError::ChannelError(
                "unexpected capture reply".to_string(),
            )),
        }
    }

    fn stop_capture(&mut self) -> Result<AudioCapture> {
        self.send(CaptureCommand::Stop)?;
        let (samples, sample_rate) = match self.recv()? {
            CaptureReply::Stopped(result) => result?,
            CaptureReply::Started(_) => {
                return Err(NatterError::ChannelError(
                    "unexpected capture reply".to_string(),
                ))
            }
        };

        let bytes = encode_wav(&samples, sample_rate, 1)?;
        let mut capture = AudioCapture::new("audio/wav");
        capture.push_chunk(bytes);
        Ok(capture)
    }

    fn release(&mut self) {
        let _ = self.command_tx.send(CaptureCommand::Release);
    }
}

impl Drop for CpalMicrophone {
    fn drop(&mut self) {
        let _ = self.command_tx.send(CaptureCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// One open device stream with its sample buffer
struct ActiveCapture {
    _stream: cpal::Stream,
    buffer: Arc<Mutex<Vec<f32>>>,
    capturing: Arc<Mutex<bool>>,
    sample_rate: u32,
}

impl ActiveCapture {
    fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| NatterError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config: cpal::StreamConfig = device
            .default_input_config()
            .map_err(|e| {
                NatterError::AudioDeviceError(format!("Failed to get input config: {}", e))
            })?
            .into();

        let channels = config.channels as usize;
        let sample_rate = config.sample_rate.0;
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let capturing = Arc::new(Mutex::new(true));

        let callback_buffer = Arc::clone(&buffer);
        let callback_capturing = Arc::clone(&capturing);

        let err_fn = |err| {
            error!("Audio input stream error: {}", err);
        };

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !*callback_capturing.lock() {
                        return;
                    }
                    let mono = downmix_to_mono(data, channels);
                    callback_buffer.lock().extend_from_slice(&mono);
                },
                err_fn,
                None,
            )
            .map_err(|e| {
                NatterError::AudioDeviceError(format!("Failed to build input stream: {}", e))
            })?;

        stream.play().map_err(|e| {
            NatterError::AudioDeviceError(format!("Failed to start input stream: {}", e))
        })?;

        info!("Started audio capture at {} Hz", sample_rate);

        Ok(Self {
            _stream: stream,
            buffer,
            capturing,
            sample_rate,
        })
    }

    /// Stop buffering and take the samples. The stream stays open so the
    /// device remains held until the take is released.
    fn stop(&self) -> (Vec<f32>, u32) {
        *self.capturing.lock() = false;
        let samples = std::mem::take(&mut *self.buffer.lock());
        (samples, self.sample_rate)
    }
}

fn run_capture_worker(command_rx: Receiver<CaptureCommand>, reply_tx: Sender<CaptureReply>) {
    let mut active: Option<ActiveCapture> = None;

    while let Ok(command) = command_rx.recv() {
        match command {
            CaptureCommand::Start => {
                if active.is_some() {
                    warn!("Capture already running");
                    let _ = reply_tx.send(CaptureReply::Started(Ok(())));
                    continue;
                }
                match ActiveCapture::open() {
                    Ok(capture) => {
                        active = Some(capture);
                        let _ = reply_tx.send(CaptureReply::Started(Ok(())));
                    }
                    Err(e) => {
                        let _ = reply_tx.send(CaptureReply::Started(Err(e)));
                    }
                }
            }
            CaptureCommand::Stop => {
                let result = match active.as_ref() {
                    Some(capture) => Ok(capture.stop()),
                    None => Err(NatterError::AudioDeviceError(
                        "No capture in progress".to_string(),
                    )),
                };
                let _ = reply_tx.send(CaptureReply::Stopped(result));
            }
            CaptureCommand::Release => {
                if active.take().is_some() {
                    info!("Released audio input device");
                }
            }
            CaptureCommand::Shutdown => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These exercise the worker protocol; opening a real device is skipped
    // in environments without one.

    #[test]
    fn test_stop_without_start_reports_device_error() {
        let mut mic = CpalMicrophone::new();
        match mic.stop_capture() {
            Err(NatterError::AudioDeviceError(msg)) => {
                assert!(msg.contains("No capture in progress"));
            }
            other => panic!("expected device error, got {:?}", other),
        }
    }

    #[test]
    fn test_release_without_start_is_harmless() {
        let mut mic = CpalMicrophone::new();
        mic.release();
        mic.release();
    }

    #[test]
    fn test_capture_round_trip_when_device_present() {
        let mut mic = CpalMicrophone::new();
        if mic.start_capture().is_ok() {
            std::thread::sleep(std::time::Duration::from_millis(50));
            let capture = mic.stop_capture().unwrap();
            assert_eq!(capture.mime_type(), "audio/wav");
            mic.release();
        }
    }
}
