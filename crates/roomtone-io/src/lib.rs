//! Roomtone I/O - reading and writing recordings.
//!
//! The analysis engine operates on plain `&[f32]` buffers; this crate gets
//! finished recordings into and out of that shape. Only WAV is supported:
//! room-measurement recordings are short, local, and lossless by design.

pub mod wav;

pub use wav::{read_wav_info, read_wav_mono, write_wav_mono, WavFormat, WavInfo};

use thiserror::Error;

/// Errors from reading or writing audio files.
#[derive(Debug, Error)]
pub enum IoError {
    /// The WAV codec rejected the file.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// Integer PCM with a bit depth this crate does not decode.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    /// The file header declares zero channels.
    #[error("file has no audio channels")]
    NoChannels,
}

/// Result alias for I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;
