use crate::codec::ResponseEncoder;
use crate::protocol::{Message, PayloadItem, SendError, WireBody, WireResponse, WireResponseHead};
use bytes::{Bytes, BytesMut};
use http_body_util::BodyExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::{error, trace};

/// Writes wire responses to an async writer.
///
/// A buffered body goes out together with its head in one write. A streamed body is
/// pulled one frame at a time and flushed as it arrives, so a slow body producer
/// never makes the writer hold more than one frame.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, 8 * 1024)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder: ResponseEncoder::new() }
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub async fn write_response(&mut self, response: WireResponse) -> Result<(), SendError> {
        let (head, body) = response.into_parts();

        match body {
            WireBody::Full(bytes) => {
                self.encoder.encode_full(&head, &bytes, &mut self.buffer)?;
                self.flush().await
            }
            WireBody::Streamed(mut body) => {
                self.write(Message::<_, Bytes>::Header(head))?;
                self.flush().await?;

                loop {
                    match body.frame().await {
                        Some(Ok(frame)) => match frame.into_data() {
                            Ok(bytes) => {
                                self.write(Message::Payload(PayloadItem::Chunk(bytes)))?;
                                self.flush().await?;
                            }
                            Err(_trailers) => trace!("drop trailers of streamed response"),
                        },
                        Some(Err(e)) => {
                            error!(cause = %e, "resolve response body error");
                            return Err(e);
                        }
                        None => {
                            self.write(Message::Payload(PayloadItem::<Bytes>::Eof))?;
                            return self.flush().await;
                        }
                    }
                }
            }
        }
    }

    #[inline]
    fn write(&mut self, item: Message<WireResponseHead, Bytes>) -> Result<(), SendError> {
        self.encoder.encode(item, &mut self.buffer)
    }

    async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.as_ref()).await?;
        self.buffer.clear();
        Ok(self.writer.flush().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ResponseBody, WireVersion};
    use futures::stream;
    use http::StatusCode;
    use http_body::Frame;
    use http_body_util::StreamBody;

    fn streamed(chunks: Vec<&'static str>) -> ResponseBody {
        let frames = chunks.into_iter().map(|c| Ok::<_, SendError>(Frame::data(Bytes::from_static(c.as_bytes()))));
        StreamBody::new(stream::iter(frames)).boxed_unsync()
    }

    #[tokio::test]
    async fn writes_streamed_body_with_declared_framing() {
        let mut head = WireResponseHead::new(WireVersion::HTTP_11, StatusCode::OK);
        head.headers_mut().add("Transfer-Encoding", "chunked");
        let response = WireResponse::new(head, WireBody::Streamed(streamed(vec!["hello", " world"])));

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_response(response).await.unwrap();

        let written = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(written, "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n");
    }

    #[tokio::test]
    async fn writes_full_body_in_one_go() {
        let mut head = WireResponseHead::new(WireVersion::HTTP_10, StatusCode::NO_CONTENT);
        head.headers_mut().add("Connection", "close");
        let response = WireResponse::new(head, WireBody::empty());

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_response(response).await.unwrap();

        let written = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(written, "HTTP/1.0 204 No Content\r\nConnection: close\r\n\r\n");
    }

    #[tokio::test]
    async fn body_error_aborts_the_write() {
        let frames = vec![Ok(Frame::data(Bytes::from_static(b"a"))), Err(SendError::invalid_body("boom"))];
        let body = StreamBody::new(stream::iter(frames)).boxed_unsync();
        let response = WireResponse::new(WireResponseHead::new(WireVersion::HTTP_11, StatusCode::OK), WireBody::Streamed(body));

        let mut writer = ResponseWriter::new(Vec::new());
        assert!(writer.write_response(response).await.is_err());
    }
}
