use bytes::Bytes;

use crate::protocol::ParseError;

/// Frame opcodes as defined by RFC 6455 section 5.2.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OpCode {
    Continuation,
    Text,
    Binary,
    Close,
    Ping,
    Pong,
}

impl OpCode {
    pub fn is_control(self) -> bool {
        matches!(self, OpCode::Close | OpCode::Ping | OpCode::Pong)
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self {
        match opcode {
            OpCode::Continuation => 0x0,
            OpCode::Text => 0x1,
            OpCode::Binary => 0x2,
            OpCode::Close => 0x8,
            OpCode::Ping => 0x9,
            OpCode::Pong => 0xA,
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x0 => Ok(OpCode::Continuation),
            0x1 => Ok(OpCode::Text),
            0x2 => Ok(OpCode::Binary),
            0x8 => Ok(OpCode::Close),
            0x9 => Ok(OpCode::Ping),
            0xA => Ok(OpCode::Pong),
            other => Err(ParseError::invalid_frame(format!("reserved opcode {other:#x}"))),
        }
    }
}

/// A single WebSocket frame as the transport's frame codec sees it, already unmasked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireFrame {
    fin: bool,
    rsv: u8,
    opcode: OpCode,
    payload: Bytes,
}

impl WireFrame {
    pub fn new(fin: bool, rsv: u8, opcode: OpCode, payload: impl Into<Bytes>) -> Self {
        Self { fin, rsv: rsv & 0b111, opcode, payload: payload.into() }
    }

    pub fn text(fin: bool, payload: impl Into<Bytes>) -> Self {
        Self::new(fin, 0, OpCode::Text, payload)
    }

    pub fn binary(fin: bool, payload: impl Into<Bytes>) -> Self {
        Self::new(fin, 0, OpCode::Binary, payload)
    }

    pub fn continuation(fin: bool, payload: impl Into<Bytes>) -> Self {
        Self::new(fin, 0, OpCode::Continuation, payload)
    }

    pub fn ping(payload: impl Into<Bytes>) -> Self {
        Self::new(true, 0, OpCode::Ping, payload)
    }

    pub fn pong(payload: impl Into<Bytes>) -> Self {
        Self::new(true, 0, OpCode::Pong, payload)
    }

    pub fn close(payload: impl Into<Bytes>) -> Self {
        Self::new(true, 0, OpCode::Close, payload)
    }

    /// A close frame carrying a status code and a reason, per RFC 6455 section 5.5.1.
    pub fn close_with(code: u16, reason: &str) -> Self {
        let mut payload = Vec::with_capacity(2 + reason.len());
        payload.extend_from_slice(&code.to_be_bytes());
        payload.extend_from_slice(reason.as_bytes());
        Self::close(payload)
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        self.fin
    }

    /// The three extension bits, `RSV1` as the most significant.
    #[inline]
    pub fn rsv(&self) -> u8 {
        self.rsv
    }

    #[inline]
    pub fn opcode(&self) -> OpCode {
        self.opcode
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// The status code of a close frame, if it carries one.
    pub fn close_code(&self) -> Option<u16> {
        if self.opcode != OpCode::Close || self.payload.len() < 2 {
            return None;
        }
        Some(u16::from_be_bytes([self.payload[0], self.payload[1]]))
    }
}
