//! Newline-delimited text framing for C-Gate connections.
//!
//! Both C-Gate ports speak a line-oriented text protocol. The decoder
//! reassembles complete lines from arbitrary read chunks, keeping any
//! partial tail buffered until the rest arrives.

use std::io;

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, Encoder, Framed};
use tracing::debug;

/// Codec for C-Gate's line-oriented text protocol.
///
/// Lines are split on `\n` with a trailing `\r` stripped. The encoder
/// appends the terminating `\n`.
#[derive(Debug, Default)]
pub struct LineCodec;

impl Decoder for LineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, io::Error> {
        let newline = match src.iter().position(|&byte| byte == b'\n') {
            Some(position) => position,
            None => return Ok(None),
        };

        let line = src.split_to(newline + 1);
        let text = String::from_utf8_lossy(&line[..newline]);
        let text = text.strip_suffix('\r').unwrap_or(&text);
        Ok(Some(text.to_string()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, io::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                if !src.is_empty() {
                    debug!(bytes = src.len(), "Discarding unterminated line at EOF");
                    src.clear();
                }
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), io::Error> {
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

/// A framed line-oriented C-Gate connection.
pub type LineConnection<S> = Framed<S, LineCodec>;

/// Create a new framed connection from a byte stream.
pub fn new_line_connection<S: AsyncRead + AsyncWrite>(stream: S) -> LineConnection<S> {
    Framed::new(stream, LineCodec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(codec: &mut LineCodec, buffer: &mut BytesMut) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = codec.decode(buffer).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_decode_single_line() {
        let mut codec = LineCodec;
        let mut buffer = BytesMut::from(&b"200 OK\n"[..]);
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some("200 OK".to_string()));
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
    }

    #[test]
    fn test_decode_strips_carriage_return() {
        let mut codec = LineCodec;
        let mut buffer = BytesMut::from(&b"300 //HOME/254/56/4: level=128\r\n"[..]);
        assert_eq!(
            codec.decode(&mut buffer).unwrap(),
            Some("300 //HOME/254/56/4: level=128".to_string())
        );
    }

    #[test]
    fn test_decode_keeps_partial_tail() {
        let mut codec = LineCodec;
        let mut buffer = BytesMut::from(&b"300-//HOME/254"[..]);
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);

        buffer.put_slice(b"/56/4: level=255\n343-");
        assert_eq!(
            codec.decode(&mut buffer).unwrap(),
            Some("300-//HOME/254/56/4: level=255".to_string())
        );
        assert_eq!(codec.decode(&mut buffer).unwrap(), None);
        assert_eq!(&buffer[..], b"343-");
    }

    #[test]
    fn test_decode_chunk_boundary_invariance() {
        let input = b"300 first\r\n347-second\n344 third\n";
        let mut codec = LineCodec;
        let mut buffer = BytesMut::new();
        let mut lines = Vec::new();
        for byte in input {
            buffer.put_u8(*byte);
            lines.extend(decode_all(&mut codec, &mut buffer));
        }
        assert_eq!(lines, vec!["300 first", "347-second", "344 third"]);
    }

    #[test]
    fn test_decode_empty_lines() {
        let mut codec = LineCodec;
        let mut buffer = BytesMut::from(&b"\n\r\n"[..]);
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(String::new()));
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(String::new()));
    }

    #[test]
    fn test_decode_eof_discards_tail() {
        let mut codec = LineCodec;
        let mut buffer = BytesMut::from(&b"300 done\nleftover"[..]);
        assert_eq!(codec.decode_eof(&mut buffer).unwrap(), Some("300 done".to_string()));
        assert_eq!(codec.decode_eof(&mut buffer).unwrap(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_encode_appends_newline() {
        let mut codec = LineCodec;
        let mut buffer = BytesMut::new();
        codec.encode("EVENT ON".to_string(), &mut buffer).unwrap();
        codec.encode("TREEXML 254".to_string(), &mut buffer).unwrap();
        assert_eq!(&buffer[..], b"EVENT ON\nTREEXML 254\n");
    }
}
