#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `zstream` exposes a streaming Zstandard compressor behind the standard
//! [`std::io::Write`] interface. Callers push bytes into a [`Writer`], which
//! stages them in a fixed-size input buffer, drives the raw zstd streaming
//! API block by block, and forwards the compressed output to an underlying
//! sink. The sink can be any `Write` implementation; it is never closed or
//! flushed by this crate.
//!
//! # Design
//!
//! The crate is deliberately thin: the zstd engine is reached through the
//! [`zstd`](https://docs.rs/zstd) crate's `zstd_safe` layer, and everything
//! else is buffer bookkeeping. Two stage buffers, sized to the engine's
//! recommended stream sizes, are allocated once per [`Writer`] and reused for
//! its whole lifetime, including across [`Writer::reset`]. A drain cycle
//! feeds staged input to the engine, compacts the input buffer, and hands
//! whatever the engine produced to the sink in one `write_all` call.
//!
//! # Invariants
//!
//! - Bytes reach the sink in exactly the order they were written, with
//!   nothing lost or duplicated, regardless of how writes are chunked.
//! - [`Writer::flush`] empties both stage buffers and the engine's internal
//!   carry-over without finalising the stream; the writer stays usable.
//! - [`Writer::finish`] emits the frame epilogue; afterwards only
//!   [`Writer::reset`] makes the writer accept data again.
//! - The stage buffers are never reallocated and never shared.
//!
//! # Errors
//!
//! Sink write failures are the one error class callers see under normal
//! operation. They surface as [`std::io::Error`] values wrapping a
//! [`WriterError`], with the sink's original [`std::io::ErrorKind`]
//! preserved. Errors reported by the zstd engine itself indicate a
//! bookkeeping defect in this crate and escalate as panics; they are never
//! returned for the caller to retry.
//!
//! # Examples
//!
//! ```
//! use std::io::Write;
//! use zstream::{CompressionLevel, Writer};
//!
//! # fn main() -> std::io::Result<()> {
//! let mut writer = Writer::with_level(Vec::new(), CompressionLevel::Default);
//! writer.write_all(b"streaming example payload")?;
//! writer.finish()?;
//! let compressed = writer.into_inner();
//! assert!(!compressed.is_empty());
//! # Ok(())
//! # }
//! ```

mod engine;
pub mod level;
mod stage;
pub mod writer;

pub use engine::{recommended_input_size, recommended_output_size};
pub use level::{CompressionLevel, CompressionLevelError};
pub use writer::{Writer, WriterError, compress_to_vec};
