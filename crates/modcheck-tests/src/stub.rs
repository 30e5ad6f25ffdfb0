//! A deterministic stand-in for the module player.
//!
//! Each input byte becomes one stereo frame of a 48 kHz 16-bit WAV written
//! to `<input>.wav`. Inputs starting with a directive change the behavior
//! so tests can provoke every failure path of the runner.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;

/// Output sample rate, matching the player's render format.
pub const SAMPLE_RATE: u32 = 48_000;

/// Exit code used for [`Directive::Fail`].
pub const FAIL_EXIT_CODE: u8 = 7;

/// What the stub does with an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `!fail`: print to stderr and exit with [`FAIL_EXIT_CODE`] without writing.
    Fail,
    /// `!nowav`: exit 0 without writing anything.
    NoOutput,
    /// `!hang`: sleep far longer than any test timeout.
    Hang,
    /// `!raw:<bytes>`: write `<bytes>` verbatim as the output.
    Raw(Vec<u8>),
    /// Anything else: render the input as a WAV.
    Render,
}

impl Directive {
    /// Classify an input by its leading bytes.
    pub fn of(data: &[u8]) -> Self {
        if data.starts_with(b"!fail") {
            Directive::Fail
        } else if data.starts_with(b"!nowav") {
            Directive::NoOutput
        } else if data.starts_with(b"!hang") {
            Directive::Hang
        } else if let Some(rest) = data.strip_prefix(b"!raw:") {
            Directive::Raw(rest.to_vec())
        } else {
            Directive::Render
        }
    }
}

/// The output format the stub writes.
pub fn wav_spec() -> WavSpec {
    WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Render `data` to WAV bytes: one frame per input byte, both channels equal.
pub fn render_wav(data: &[u8]) -> Result<Vec<u8>, hound::Error> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, wav_spec())?;
        for &byte in data {
            let sample = (byte as i16 - 128) << 8;
            writer.write_sample(sample)?;
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Bytes the stub writes for `data`, or `None` when it writes nothing.
pub fn expected_output(data: &[u8]) -> Option<Vec<u8>> {
    match Directive::of(data) {
        Directive::Raw(bytes) => Some(bytes),
        Directive::Render => render_wav(data).ok(),
        Directive::Fail | Directive::NoOutput | Directive::Hang => None,
    }
}
