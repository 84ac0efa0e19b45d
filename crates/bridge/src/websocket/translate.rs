use crate::model::WsFrame;
use micro_wire::websocket::{OpCode, WireFrame};

/// Wire frame to framework frame. Extension bits are not carried over.
pub fn to_framework(frame: WireFrame) -> WsFrame {
    let is_final = frame.is_final();
    match frame.opcode() {
        OpCode::Text => WsFrame::Text { payload: frame.into_payload(), is_final },
        OpCode::Binary => WsFrame::Binary { payload: frame.into_payload(), is_final },
        OpCode::Continuation => WsFrame::Continuation { payload: frame.into_payload(), is_final },
        OpCode::Ping => WsFrame::Ping(frame.into_payload()),
        OpCode::Pong => WsFrame::Pong(frame.into_payload()),
        OpCode::Close => WsFrame::Close(frame.into_payload()),
    }
}

/// Framework frame to wire frame. Control frames always go out final.
pub fn to_wire(frame: WsFrame) -> WireFrame {
    match frame {
        WsFrame::Text { payload, is_final } => WireFrame::text(is_final, payload),
        WsFrame::Binary { payload, is_final } => WireFrame::binary(is_final, payload),
        WsFrame::Continuation { payload, is_final } => WireFrame::continuation(is_final, payload),
        WsFrame::Ping(payload) => WireFrame::ping(payload),
        WsFrame::Pong(payload) => WireFrame::pong(payload),
        WsFrame::Close(payload) => WireFrame::close(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn data_frames_survive_the_round_trip() {
        for fin in [true, false] {
            for frame in [
                WireFrame::text(fin, "héllo"),
                WireFrame::binary(fin, vec![0_u8, 159, 146, 150]),
                WireFrame::continuation(fin, Bytes::new()),
            ] {
                assert_eq!(to_wire(to_framework(frame.clone())), frame);
            }
        }
    }

    #[test]
    fn close_is_close_whatever_the_flags() {
        let odd = WireFrame::new(false, 0b101, OpCode::Close, WireFrame::close_with(1000, "bye").into_payload());
        let frame = to_framework(odd);
        assert!(frame.is_close());

        let back = to_wire(frame);
        assert!(back.is_final());
        assert_eq!(back.rsv(), 0);
        assert_eq!(back.close_code(), Some(1000));
    }

    #[test]
    fn control_frames_keep_their_payload() {
        assert_eq!(to_framework(WireFrame::ping("p")), WsFrame::Ping(Bytes::from_static(b"p")));
        assert_eq!(to_wire(WsFrame::Pong(Bytes::from_static(b"p"))), WireFrame::pong("p"));
    }
}
