#![allow(clippy::module_name_repetitions)]

//! # Overview
//!
//! Streaming Zstandard writer over any [`std::io::Write`] sink. The
//! [`Writer`] accepts incremental input, stages it in a fixed-size buffer,
//! and drives the zstd engine whenever the stage fills, forwarding each round
//! of compressed output to the sink. It tracks the number of compressed bytes
//! produced, allowing bandwidth accounting without buffering the payload.
//!
//! # Examples
//!
//! Compress data incrementally and finalise the frame:
//!
//! ```
//! use std::io::Write;
//! use zstream::{CompressionLevel, Writer};
//!
//! # fn main() -> std::io::Result<()> {
//! let mut writer = Writer::new(Vec::new());
//! for chunk in b"incremental payload".chunks(5) {
//!     writer.write_all(chunk)?;
//! }
//! writer.finish()?;
//! assert!(writer.bytes_written() > 0);
//! # Ok(())
//! # }
//! ```

use std::io::{self, Write};
use std::mem;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::engine::{self, CStream, StreamProgress};
use crate::level::CompressionLevel;
use crate::stage::{InputStage, OutputStage};

/// Error raised while driving the compression stream.
///
/// Values of this type travel inside the [`std::io::Error`] returned by the
/// writer's operations; the original [`std::io::ErrorKind`] of a sink failure
/// is preserved on the wrapping error.
#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    /// The sink rejected compressed output.
    ///
    /// Forwarding is at-most-once: if the sink accepted part of the payload
    /// before failing, the unforwarded remainder is dropped, not retried.
    #[error("cannot forward compressed data to the sink")]
    Forward(#[source] io::Error),

    /// The stream was already finalised with [`Writer::finish`].
    #[error("compressed stream is already finished; reset the writer to start a new one")]
    Finished,
}

impl From<WriterError> for io::Error {
    fn from(err: WriterError) -> Self {
        let kind = match &err {
            WriterError::Forward(source) => source.kind(),
            WriterError::Finished => io::ErrorKind::Other,
        };
        Self::new(kind, err)
    }
}

/// Streaming Zstandard compressor writing to an underlying sink.
///
/// All buffers and the engine state are allocated once at construction and
/// reused for the writer's whole lifetime, including across [`Writer::reset`].
/// Dropping the writer releases them; it does **not** finalise the stream, so
/// an abandoned writer leaves a truncated frame at the sink. Call
/// [`Writer::finish`] to emit a complete, independently decodable frame. The
/// sink itself is never closed or flushed by this type.
///
/// A `Writer` is single-owner state: every operation takes `&mut self`, and
/// there is no internal synchronisation.
pub struct Writer<W: Write> {
    sink: W,
    level: CompressionLevel,
    stream: CStream,
    input: InputStage,
    output: OutputStage,
    total_out: u64,
    finished: bool,
}

impl<W: Write> Writer<W> {
    /// Creates a writer compressing at [`CompressionLevel::Default`].
    pub fn new(sink: W) -> Self {
        Self::with_level(sink, CompressionLevel::Default)
    }

    /// Creates a writer compressing at the given level.
    ///
    /// Stage buffers use the engine-recommended stream sizes. Panics if the
    /// engine fails to initialise; levels are validated by construction, so
    /// that failure is an environment bug rather than bad input.
    pub fn with_level(sink: W, level: CompressionLevel) -> Self {
        Self {
            sink,
            level,
            stream: CStream::new(level),
            input: InputStage::with_capacity(engine::recommended_input_size()),
            output: OutputStage::with_capacity(engine::recommended_output_size()),
            total_out: 0,
            finished: false,
        }
    }

    /// Reinitialises the writer for a fresh stream writing to `sink`,
    /// returning the previous sink.
    ///
    /// The compression level is kept; buffers are reused without
    /// reallocating. Any staged or engine-internal data from the previous
    /// stream is discarded silently — callers must [`Writer::finish`] (or
    /// deliberately abandon) the old stream first.
    #[cfg_attr(feature = "tracing", instrument(skip(self, sink), name = "reset_stream"))]
    pub fn reset(&mut self, sink: W) -> W {
        self.stream.reinit(self.level);
        self.input.clear();
        self.output.clear();
        self.total_out = 0;
        self.finished = false;
        mem::replace(&mut self.sink, sink)
    }

    /// Finalises the compressed stream, writing the frame epilogue to the
    /// sink.
    ///
    /// The sink is left open. After a successful finish the writer rejects
    /// further writes until [`Writer::reset`]; calling `finish` again is a
    /// no-op. A sink error leaves the stream unfinished.
    #[cfg_attr(
        feature = "tracing",
        instrument(skip(self), fields(compressed_bytes = self.total_out), name = "finish_stream")
    )]
    pub fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.flush()?;
        loop {
            let (progress, produced) = {
                let mut output = self.output.engine_output();
                let progress = self.stream.end_stream(&mut output);
                (progress, output.pos())
            };
            self.output.record(produced);
            self.forward()?;
            if progress == StreamProgress::Drained {
                self.finished = true;
                return Ok(());
            }
        }
    }

    /// Returns the number of compressed bytes successfully forwarded to the
    /// sink so far. Reset to zero by [`Writer::reset`].
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.total_out
    }

    /// Returns the compression level the writer was constructed with.
    #[must_use]
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Provides immutable access to the underlying sink.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Provides mutable access to the underlying sink.
    #[must_use]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consumes the writer and returns the sink.
    ///
    /// Does not finalise the stream; call [`Writer::finish`] first if the
    /// sink should hold a complete frame.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Runs one compression round and forwards whatever it produced.
    ///
    /// The engine consumes staged input from its cursor and fills the output
    /// stage from offset zero; either side may be partial. The input stage is
    /// compacted unconditionally, even when the engine reports an error, so
    /// the cursor invariants hold up to the moment the error escalates.
    fn drain(&mut self) -> io::Result<()> {
        let (consumed, produced, result) = {
            let mut input = self.input.engine_input();
            let mut output = self.output.engine_output();
            let result = self.stream.compress(&mut output, &mut input);
            (input.pos, output.pos(), result)
        };
        self.input.compact(consumed);
        self.output.record(produced);
        if let Err(code) = result {
            engine::fatal("compress_stream", code);
        }
        self.forward()
    }

    /// Hands the output stage to the sink in a single `write_all` call.
    ///
    /// The stage cursor is reset whether or not the sink accepted the bytes;
    /// on failure the unforwarded remainder is lost (at-most-once
    /// forwarding).
    fn forward(&mut self) -> io::Result<()> {
        if self.output.is_empty() {
            return Ok(());
        }
        let pending = self.output.filled_slice();
        let result = self.sink.write_all(pending);
        let forwarded = pending.len() as u64;
        self.output.clear();
        match result {
            Ok(()) => {
                self.total_out += forwarded;
                Ok(())
            }
            Err(source) => Err(WriterError::Forward(source).into()),
        }
    }
}

impl<W: Write> Write for Writer<W> {
    /// Stages `buf` for compression, draining to the sink as needed.
    ///
    /// All-or-nothing: on success the whole slice has been staged and
    /// `buf.len()` is returned; on error nothing useful can be said about
    /// partial progress and no partial count is reported. An exact fit into
    /// the remaining stage space does not trigger a drain.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished {
            return Err(WriterError::Finished.into());
        }
        if buf.is_empty() {
            return Ok(0);
        }
        let mut remaining = buf;
        loop {
            let taken = self.input.stage(remaining);
            remaining = &remaining[taken..];
            if remaining.is_empty() {
                return Ok(buf.len());
            }
            self.drain()?;
        }
    }

    /// Forwards everything written so far to the sink.
    ///
    /// Drains the input stage, then repeatedly asks the engine for its
    /// internal carry-over until it reports empty. The stream is not
    /// finalised and the writer stays usable. The guarantee stops at "handed
    /// to the sink": the sink's own `flush` is not called. On an
    /// already-finished writer this is a no-op.
    #[cfg_attr(feature = "tracing", instrument(skip(self), name = "flush_stream"))]
    fn flush(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        while !self.input.is_empty() {
            self.drain()?;
        }
        loop {
            let (progress, produced) = {
                let mut output = self.output.engine_output();
                let progress = self.stream.flush_pending(&mut output);
                (progress, output.pos())
            };
            self.output.record(produced);
            self.forward()?;
            if progress == StreamProgress::Drained {
                return Ok(());
            }
        }
    }
}

/// Compresses `input` into a new [`Vec`] as a single finished frame.
pub fn compress_to_vec(input: &[u8], level: CompressionLevel) -> io::Result<Vec<u8>> {
    let mut writer = Writer::with_level(Vec::new(), level);
    writer.write_all(input)?;
    writer.finish()?;
    Ok(writer.into_inner())
}
