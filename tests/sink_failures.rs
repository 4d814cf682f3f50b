//! Sink-failure propagation tests.
//!
//! The sink's write call is the one failure class a caller sees under normal
//! operation (disk full, closed pipe). These tests verify that such errors
//! propagate from `write`/`flush`/`finish` with their original
//! [`std::io::ErrorKind`], that nothing is forwarded past the failure point,
//! and that forwarding is at-most-once (no retry of lost bytes).

use std::io::{self, Write};

use zstream::{Writer, WriterError};

/// Sink that accepts a fixed number of write calls and then fails.
struct FailingSink {
    data: Vec<u8>,
    writes_remaining: usize,
}

impl FailingSink {
    fn failing_after(writes: usize) -> Self {
        Self {
            data: Vec::new(),
            writes_remaining: writes,
        }
    }
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.writes_remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        self.writes_remaining -= 1;
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn assert_forward_error(err: &io::Error) {
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe, "sink kind preserved");
    let inner = err.get_ref().expect("wrapped writer error");
    assert!(matches!(
        inner.downcast_ref::<WriterError>(),
        Some(WriterError::Forward(_))
    ));
}

#[test]
fn flush_surfaces_sink_failure() {
    let mut writer = Writer::new(FailingSink::failing_after(0));
    writer.write_all(b"payload").expect("staging needs no sink");
    let err = writer.flush().expect_err("sink rejects the forward");
    assert_forward_error(&err);
    assert!(writer.get_ref().data.is_empty());
    assert_eq!(writer.bytes_written(), 0);
}

#[test]
fn finish_surfaces_sink_failure_and_leaves_stream_unfinished() {
    let mut writer = Writer::new(FailingSink::failing_after(0));
    writer.write_all(b"payload").expect("staging needs no sink");
    let err = writer.finish().expect_err("sink rejects the epilogue");
    assert_forward_error(&err);

    // The stream never finished, so the writer still accepts input.
    writer
        .write_all(b"more")
        .expect("unfinished stream stays writable");
}

#[test]
fn large_write_surfaces_sink_failure() {
    let payload: Vec<u8> = b"compressible ".repeat(200_000);
    let mut writer = Writer::new(FailingSink::failing_after(0));
    let err = writer
        .write_all(&payload)
        .expect_err("draining a large write hits the sink");
    assert_forward_error(&err);
}

#[test]
fn nothing_is_forwarded_past_the_failure_point() {
    let mut writer = Writer::new(FailingSink::failing_after(1));
    writer.write_all(b"first flush worth of data").expect("stage");
    writer.flush().expect("first forward is accepted");

    let accepted = writer.get_ref().data.len();
    assert!(accepted > 0);
    assert_eq!(writer.bytes_written() as usize, accepted);

    writer.write_all(b"second flush worth of data").expect("stage");
    let err = writer.flush().expect_err("second forward fails");
    assert_forward_error(&err);

    // Sink contents are exactly the bytes accepted before the failure, and
    // the accounting did not count the lost forward.
    assert_eq!(writer.get_ref().data.len(), accepted);
    assert_eq!(writer.bytes_written() as usize, accepted);
}
