//! Size and timing statistics for a compress or decompress call.
//!
//! Every file-level operation returns a `CompressionStats` so the front end
//! can show sizes, ratio and elapsed time. Only the codec call itself is
//! timed; file reads and writes are not included.

use std::fmt;
use std::time::{Duration, Instant};

use crate::compressor::Algorithm;

/// Outcome of one compress or decompress call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionStats {
    /// Codec that produced or consumed the archive
    pub algorithm: Algorithm,

    /// UTF-8 byte length of the text
    pub original_size: usize,

    /// Byte length of the archive, header included
    pub compressed_size: usize,

    /// Time spent in encode/decode
    pub elapsed: Duration,
}

impl CompressionStats {
    pub fn new(
        algorithm: Algorithm,
        original_size: usize,
        compressed_size: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            algorithm,
            original_size,
            compressed_size,
            elapsed,
        }
    }

    /// Compute compression ratio (compressed / original).
    ///
    /// Returns 0.0 if the original is empty.
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            self.compressed_size as f64 / self.original_size as f64
        }
    }

    /// Space saved as a percentage of the original; negative when the
    /// archive is larger than the text.
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            (1.0 - self.ratio()) * 100.0
        }
    }

    /// Compute throughput over the original text in bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.original_size as f64 / secs
        }
    }

    /// Export stats as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "algorithm={}\n\
             original_bytes={}\n\
             compressed_bytes={}\n\
             ratio={:.4}\n\
             elapsed_us={}\n",
            self.algorithm,
            self.original_size,
            self.compressed_size,
            self.ratio(),
            self.elapsed.as_micros(),
        )
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} bytes (ratio {:.2}) in {:.3} ms",
            self.algorithm,
            self.original_size,
            self.compressed_size,
            self.ratio(),
            self.elapsed.as_secs_f64() * 1000.0,
        )
    }
}

/// Wall-clock timer.
///
/// Runs from construction until `stop`; `elapsed` reads the running time or
/// the frozen time once stopped.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
    end: Option<Instant>,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            end: None,
        }
    }

    /// Freeze the timer and return the elapsed time. Later calls keep the
    /// first stop time.
    pub fn stop(&mut self) -> Duration {
        let end = *self.end.get_or_insert_with(Instant::now);
        end.duration_since(self.start)
    }

    /// Get elapsed time (or current running time if not stopped).
    pub fn elapsed(&self) -> Duration {
        match self.end {
            Some(end) => end.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    /// Run `f` and return its output with the time it took.
    pub fn time<T>(f: impl FnOnce() -> T) -> (T, Duration) {
        let mut timer = Self::start();
        let output = f();
        (output, timer.stop())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}
