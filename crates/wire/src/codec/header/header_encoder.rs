//! Encoder serializing a [`WireResponseHead`] into raw bytes.
//!
//! Unlike a server that derives framing from the body, the head is written exactly as
//! it was built: the status line for its version, then every header in order with
//! the spelling it was given. Deciding between `Content-Length` and
//! `Transfer-Encoding` is the job of whoever built the head.

use crate::protocol::{SendError, WireResponseHead};

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 4 * 1024;

#[derive(Debug)]
pub struct HeaderEncoder;

impl Encoder<&WireResponseHead> for HeaderEncoder {
    type Error = SendError;

    /// Encodes the status line and headers into `dst`.
    ///
    /// # Errors
    ///
    /// Returns error if a header name or value contains CR or LF, which would let it
    /// smuggle extra lines into the message.
    fn encode(&mut self, head: &WireResponseHead, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);

        let status = head.status();
        write!(FastWrite(dst), "{} {} {}\r\n", head.version(), status.as_str(), status.canonical_reason().unwrap_or(""))?;

        for (name, value) in head.headers().iter() {
            if has_line_break(name) || has_line_break(value) {
                return Err(SendError::invalid_header(format!("line break in header {name:?}")));
            }
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

fn has_line_break(s: &str) -> bool {
    s.bytes().any(|b| b == b'\r' || b == b'\n')
}

/// Writer appending to a `BytesMut` we already reserved space in.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
