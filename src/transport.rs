//! Transport boundary
//!
//! The engine never opens sockets. A caller hands in an already-connected
//! duplex byte stream (typically a `TcpStream`, optionally TLS-wrapped) and
//! the negotiator, frame reader and session operate on it through the
//! [`Transport`] trait. Read timeouts belong to the underlying stream; a
//! timed-out read surfaces as [`TN3270Error::Timeout`] rather than a framing
//! error.

use std::io::{Read, Write};

use crate::error::{TN3270Error, TN3270Result};

/// A duplex byte stream the session owns for its lifetime.
///
/// Blanket-implemented for anything that is `Read + Write`, so `TcpStream`,
/// TLS streams and in-memory test doubles all qualify.
pub trait Transport: Read + Write {}

impl<T: Read + Write> Transport for T {}

/// Read exactly one byte, treating EOF as a terminated record error.
pub(crate) fn read_byte<T: Transport + ?Sized>(transport: &mut T) -> TN3270Result<u8> {
    let mut buf = [0u8; 1];
    let n = transport.read(&mut buf)?;
    if n == 0 {
        return Err(TN3270Error::RecordNotTerminated);
    }
    Ok(buf[0])
}

/// Validates that the next bytes read from a transport exactly match an
/// expected sequence.
///
/// Used throughout negotiation, where the TN3270E handshake is a fixed
/// script: any wrong length or wrong content fails fast with both the
/// expected and actual bytes in hex.
pub struct ByteExpector<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
}

impl<'a, T: Transport + ?Sized> ByteExpector<'a, T> {
    pub fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }

    /// Read `expected.len()` bytes and compare them to `expected`.
    ///
    /// A short read (EOF mid-sequence) reports the bytes that did arrive.
    pub fn expect(&mut self, expected: &[u8]) -> TN3270Result<()> {
        let mut actual = vec![0u8; expected.len()];
        let mut filled = 0;
        while filled < actual.len() {
            let n = self.transport.read(&mut actual[filled..])?;
            if n == 0 {
                actual.truncate(filled);
                return Err(TN3270Error::Negotiation {
                    expected: expected.to_vec(),
                    actual,
                });
            }
            filled += n;
        }
        if actual != expected {
            return Err(TN3270Error::Negotiation {
                expected: expected.to_vec(),
                actual,
            });
        }
        Ok(())
    }

    /// Read one byte.
    pub fn next_byte(&mut self) -> TN3270Result<u8> {
        read_byte(self.transport)
    }

    /// Read bytes until `terminator` is seen; the terminator is consumed but
    /// not included in the returned buffer.
    pub fn read_until(&mut self, terminator: u8) -> TN3270Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let byte = read_byte(self.transport)?;
            if byte == terminator {
                return Ok(out);
            }
            out.push(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_expect_matching_bytes() {
        let mut stream = Cursor::new(vec![0xFF, 0xFD, 0x28]);
        let mut expector = ByteExpector::new(&mut stream);
        assert!(expector.expect(&[0xFF, 0xFD, 0x28]).is_ok());
    }

    #[test]
    fn test_expect_mismatch_reports_both() {
        let mut stream = Cursor::new(vec![0xFF, 0xFB, 0x18]);
        let mut expector = ByteExpector::new(&mut stream);
        match expector.expect(&[0xFF, 0xFD, 0x28]) {
            Err(TN3270Error::Negotiation { expected, actual }) => {
                assert_eq!(expected, vec![0xFF, 0xFD, 0x28]);
                assert_eq!(actual, vec![0xFF, 0xFB, 0x18]);
            }
            other => panic!("expected negotiation error, got {other:?}"),
        }
    }

    #[test]
    fn test_expect_short_read() {
        let mut stream = Cursor::new(vec![0xFF]);
        let mut expector = ByteExpector::new(&mut stream);
        match expector.expect(&[0xFF, 0xFD, 0x28]) {
            Err(TN3270Error::Negotiation { actual, .. }) => {
                assert_eq!(actual, vec![0xFF]);
            }
            other => panic!("expected negotiation error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_until_consumes_terminator() {
        let mut stream = Cursor::new(vec![b'L', b'U', b'1', 0xFF, 0xF0]);
        let mut expector = ByteExpector::new(&mut stream);
        assert_eq!(expector.read_until(0xFF).unwrap(), b"LU1");
        assert_eq!(expector.next_byte().unwrap(), 0xF0);
    }
}
