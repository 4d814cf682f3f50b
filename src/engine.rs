//! Thin wrapper around the raw zstd streaming interface.
//!
//! All engine state lives in a [`CStream`], which owns exactly one
//! `ZSTD_CStream` for the lifetime of its writer. The engine is driven with
//! the classic three-call protocol: `compress_stream` to consume staged
//! input, `flush_stream` to drain internally buffered output, and
//! `end_stream` to emit the frame epilogue. Engine errors indicate broken
//! buffer bookkeeping on our side, never bad caller input, so they escalate
//! as panics instead of `Result` values.

use std::sync::LazyLock;

use zstd::zstd_safe::{self, CCtx, CParameter, InBuffer, OutBuffer, ResetDirective};

use crate::level::CompressionLevel;

static STREAM_IN_SIZE: LazyLock<usize> = LazyLock::new(|| CCtx::in_size());
static STREAM_OUT_SIZE: LazyLock<usize> = LazyLock::new(|| CCtx::out_size());

/// Returns the input stage capacity recommended by the zstd engine.
///
/// Queried from the engine once per process and cached.
#[must_use]
pub fn recommended_input_size() -> usize {
    *STREAM_IN_SIZE
}

/// Returns the output stage capacity recommended by the zstd engine.
///
/// Queried from the engine once per process and cached.
#[must_use]
pub fn recommended_output_size() -> usize {
    *STREAM_OUT_SIZE
}

/// Outcome of a drain-style engine call with no new input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum StreamProgress {
    /// The engine still holds data; call again after forwarding the output.
    Pending,
    /// The engine has emitted everything it was asked to.
    Drained,
}

/// Owned compression stream state.
///
/// Created once per writer and reinitialised in place on reset; the
/// underlying `ZSTD_CStream` is freed exactly once when this value drops.
pub(crate) struct CStream {
    cctx: CCtx<'static>,
}

impl CStream {
    /// Creates engine state initialised for `level`.
    pub(crate) fn new(level: CompressionLevel) -> Self {
        let mut cctx = CCtx::create();
        if let Err(code) = cctx.set_parameter(CParameter::CompressionLevel(level.as_zstd())) {
            fatal("set_parameter", code);
        }
        Self { cctx }
    }

    /// Reinitialises the stream for `level`, discarding any in-flight frame.
    pub(crate) fn reinit(&mut self, level: CompressionLevel) {
        if let Err(code) = self.cctx.reset(ResetDirective::SessionOnly) {
            fatal("reset", code);
        }
        if let Err(code) = self.cctx.set_parameter(CParameter::CompressionLevel(level.as_zstd())) {
            fatal("set_parameter", code);
        }
    }

    /// Runs one compression round, consuming from `input` and producing into
    /// `output`. Either buffer may be only partially processed.
    ///
    /// Returns the raw engine result so the caller can restore its cursor
    /// invariants before escalating an error via [`fatal`].
    pub(crate) fn compress(
        &mut self,
        output: &mut OutBuffer<'_, [u8]>,
        input: &mut InBuffer<'_>,
    ) -> zstd_safe::SafeResult {
        self.cctx.compress_stream(output, input)
    }

    /// Asks the engine to emit internally buffered data without new input.
    pub(crate) fn flush_pending(&mut self, output: &mut OutBuffer<'_, [u8]>) -> StreamProgress {
        match self.cctx.flush_stream(output) {
            Ok(0) => StreamProgress::Drained,
            Ok(_) => StreamProgress::Pending,
            Err(code) => fatal("flush_stream", code),
        }
    }

    /// Writes the frame epilogue, possibly across several calls.
    pub(crate) fn end_stream(&mut self, output: &mut OutBuffer<'_, [u8]>) -> StreamProgress {
        match self.cctx.end_stream(output) {
            Ok(0) => StreamProgress::Drained,
            Ok(_) => StreamProgress::Pending,
            Err(code) => fatal("end_stream", code),
        }
    }
}

/// Escalates an engine-reported error.
///
/// Every call site hands the engine structurally valid buffers, so an error
/// here means this crate corrupted its own cursors. Retrying would operate
/// on poisoned stream state.
pub(crate) fn fatal(op: &str, code: zstd_safe::ErrorCode) -> ! {
    panic!(
        "BUG: zstd {op} failed: {}",
        zstd_safe::get_error_name(code)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommended_sizes_are_nonzero_and_stable() {
        let in_size = recommended_input_size();
        let out_size = recommended_output_size();
        assert!(in_size > 0);
        assert!(out_size > 0);
        assert_eq!(in_size, recommended_input_size());
        assert_eq!(out_size, recommended_output_size());
    }

    #[test]
    fn end_stream_without_input_produces_an_empty_frame() {
        let mut stream = CStream::new(CompressionLevel::Default);
        let mut buf = vec![0u8; recommended_output_size()];
        let mut output = OutBuffer::around(&mut buf[..]);
        assert_eq!(stream.end_stream(&mut output), StreamProgress::Drained);
        assert!(output.pos() > 0, "empty frame still carries framing bytes");
    }

    #[test]
    fn reinit_discards_previous_frame_state() {
        let mut stream = CStream::new(CompressionLevel::Fast);
        let payload = b"state that must not leak";
        let mut out = vec![0u8; recommended_output_size()];

        let mut output = OutBuffer::around(&mut out[..]);
        let mut input = InBuffer::around(payload);
        stream
            .compress(&mut output, &mut input)
            .expect("compress valid buffers");

        stream.reinit(CompressionLevel::Fast);
        let mut output = OutBuffer::around(&mut out[..]);
        assert_eq!(stream.end_stream(&mut output), StreamProgress::Drained);
        let produced = output.pos();
        let frame = zstd::decode_all(&out[..produced]).expect("valid frame");
        assert!(frame.is_empty(), "reinitialised stream starts empty");
    }
}
