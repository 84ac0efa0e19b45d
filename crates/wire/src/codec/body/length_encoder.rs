use crate::protocol::{PayloadItem, SendError};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    length: u64,
    eof: bool,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { length, eof: false }
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for LengthEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            PayloadItem::Chunk(bytes) => {
                if !bytes.has_remaining() {
                    return Ok(());
                }
                let remaining = bytes.remaining() as u64;
                if remaining > self.length {
                    warn!(declared_left = self.length, chunk = remaining, "body longer than declared content-length");
                    return Err(SendError::invalid_body("body exceeds declared content-length"));
                }
                dst.put(bytes);
                self.length -= remaining;
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                if self.length != 0 {
                    warn!(missing = self.length, "body shorter than declared content-length");
                    return Err(SendError::invalid_body("body ends before declared content-length"));
                }
                Ok(())
            }
        }
    }
}
