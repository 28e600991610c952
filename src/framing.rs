//! TN3270E record framing
//!
//! Once negotiation completes, the telnet stream carries 3270 records as raw
//! bytes with IAC-doubling: a literal `0xFF` is transmitted as `IAC IAC`, and
//! each record ends with `IAC EOR`. Reading is byte-by-byte and stateless
//! across records; only the transport's read position carries over.

use log::trace;

use crate::error::{TN3270Error, TN3270Result};
use crate::transport::{read_byte, Transport};

/// Interpret As Command.
pub const IAC: u8 = 0xFF;
/// End Of Record marker byte (follows IAC).
pub const EOR_MARK: u8 = 0xEF;

/// Read one IAC-escaped, EOR-terminated record into a contiguous buffer.
///
/// The `IAC EOR` terminator is consumed but not included in the returned
/// buffer. `IAC IAC` un-escapes to a single literal `0xFF`. An IAC followed
/// by anything else is a framing error, as is EOF before the terminator
/// (bounded by the transport's own EOF/timeout, so a missing terminator can
/// never hang indefinitely).
pub fn read_record<T: Transport + ?Sized>(transport: &mut T) -> TN3270Result<Vec<u8>> {
    let mut record = Vec::new();
    loop {
        let byte = read_byte(transport)?;
        if byte != IAC {
            record.push(byte);
            continue;
        }
        match read_byte(transport)? {
            IAC => record.push(IAC),
            EOR_MARK => {
                trace!("record received: {} bytes", record.len());
                return Ok(record);
            }
            other => return Err(TN3270Error::InvalidIacEscape(other)),
        }
    }
}

/// Write one record: IAC-double any literal `0xFF` bytes in the payload and
/// append the `IAC EOR` terminator.
pub fn write_record<T: Transport + ?Sized>(transport: &mut T, payload: &[u8]) -> TN3270Result<()> {
    let mut wire = Vec::with_capacity(payload.len() + 2);
    for &byte in payload {
        wire.push(byte);
        if byte == IAC {
            wire.push(IAC);
        }
    }
    wire.push(IAC);
    wire.push(EOR_MARK);
    transport.write_all(&wire)?;
    transport.flush()?;
    trace!("record sent: {} bytes", payload.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_plain_record() {
        let mut stream = Cursor::new(vec![0x01, 0x02, 0x03, IAC, EOR_MARK]);
        assert_eq!(read_record(&mut stream).unwrap(), vec![0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_doubled_iac_unescapes() {
        let mut stream = Cursor::new(vec![0x01, IAC, IAC, 0x02, IAC, EOR_MARK]);
        assert_eq!(read_record(&mut stream).unwrap(), vec![0x01, 0xFF, 0x02]);
    }

    #[test]
    fn test_missing_terminator_fails() {
        let mut stream = Cursor::new(vec![0x01, 0x02]);
        assert!(matches!(
            read_record(&mut stream),
            Err(TN3270Error::RecordNotTerminated)
        ));
    }

    #[test]
    fn test_stray_iac_escape_fails() {
        let mut stream = Cursor::new(vec![0x01, IAC, 0x42]);
        assert!(matches!(
            read_record(&mut stream),
            Err(TN3270Error::InvalidIacEscape(0x42))
        ));
    }

    #[test]
    fn test_empty_record() {
        let mut stream = Cursor::new(vec![IAC, EOR_MARK]);
        assert_eq!(read_record(&mut stream).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_write_record_escapes_and_terminates() {
        let mut stream = Cursor::new(Vec::new());
        write_record(&mut stream, &[0x01, 0xFF, 0x02]).unwrap();
        assert_eq!(
            stream.into_inner(),
            vec![0x01, IAC, IAC, 0x02, IAC, EOR_MARK]
        );
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let mut stream = Cursor::new(Vec::new());
        write_record(&mut stream, &[0x00, 0xFF, 0x7D, 0xFF]).unwrap();
        let mut reader = Cursor::new(stream.into_inner());
        assert_eq!(read_record(&mut reader).unwrap(), vec![0x00, 0xFF, 0x7D, 0xFF]);
    }
}
