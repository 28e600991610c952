//! Error types for TN3270R operations
//!
//! Every protocol failure is surfaced with enough context (offending bytes in
//! hex, expected vs. actual sequences) to diagnose a live-host mismatch. None
//! of these errors are retried internally: a negotiation or decode failure is
//! terminal for the session and the caller decides whether to reconnect.

use std::io;
use thiserror::Error;

use crate::datastream::codes::CommandCode;

/// Render a byte sequence as space-separated hex, e.g. `0xFF 0xFD 0x28`.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Top-level error type for TN3270R operations
#[derive(Debug, Error)]
pub enum TN3270Error {
    /// Exact-byte mismatch during the TN3270E handshake
    #[error("negotiation failed: expected [{}], received [{}]", to_hex(expected), to_hex(actual))]
    Negotiation {
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    /// The host returned a device type we never offered
    #[error("host assigned device type {received:?}, not one of the offered types {offered:?}")]
    DeviceTypeRejected {
        offered: Vec<String>,
        received: String,
    },

    /// The transport reached EOF before an IAC EOR terminator was seen
    #[error("record did not terminate: EOF before IAC EOR")]
    RecordNotTerminated,

    /// IAC inside a record was followed by a byte that is neither IAC nor EOR
    #[error("invalid IAC escape inside record: IAC followed by 0x{0:02X}")]
    InvalidIacEscape(u8),

    /// The frame buffer ended in the middle of a header, order or structured field
    #[error("record truncated at offset {at}: {needed} more byte(s) required for {context}")]
    Truncated {
        at: usize,
        needed: usize,
        context: &'static str,
    },

    /// Transport read timed out (distinct from a framing error)
    #[error("transport read timed out")]
    Timeout,

    /// TN3270E header carried a data type this engine does not decode
    #[error("unsupported TN3270E data type 0x{0:02X}: only 3270-DATA is decoded")]
    UnsupportedDataType(u8),

    /// Command byte not in the 3270 command set at all
    #[error("unrecognised command code 0x{0:02X}")]
    UnrecognisedCommandCode(u8),

    /// Command byte is a known 3270 command this engine does not implement
    #[error("unsupported command code {0}")]
    UnsupportedCommandCode(CommandCode),

    /// Order opcode in 0x00..=0x3F but not in the known order set
    #[error("unrecognised order 0x{0:02X}")]
    UnrecognisedOrder(u8),

    /// Order decoded successfully but the screen cannot apply it
    #[error("unsupported order {order}: {reason}")]
    UnsupportedOrder {
        order: &'static str,
        reason: String,
    },

    /// Structured field id byte not in the decoded set
    #[error("unsupported structured field 0x{0:02X}")]
    UnsupportedStructuredField(u8),

    /// A decoded buffer address fell outside the live screen
    #[error("buffer address {address} out of range for screen of {screen_size} positions")]
    AddressOutOfRange {
        address: usize,
        screen_size: usize,
    },

    /// Underlying transport failure
    #[error("transport error: {0}")]
    Io(io::Error),
}

// Timed-out reads surface as the distinct Timeout kind so callers can tell a
// slow host apart from a protocol framing problem.
impl From<io::Error> for TN3270Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TN3270Error::Timeout,
            _ => TN3270Error::Io(err),
        }
    }
}

/// Result type alias for TN3270R operations
pub type TN3270Result<T> = Result<T, TN3270Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rendering() {
        assert_eq!(to_hex(&[0xFF, 0xFD, 0x28]), "0xFF 0xFD 0x28");
        assert_eq!(to_hex(&[]), "");
    }

    #[test]
    fn test_negotiation_error_names_both_sequences() {
        let err = TN3270Error::Negotiation {
            expected: vec![0xFF, 0xFD, 0x28],
            actual: vec![0xFF, 0xFB, 0x18],
        };
        let msg = err.to_string();
        assert!(msg.contains("0xFF 0xFD 0x28"));
        assert!(msg.contains("0xFF 0xFB 0x18"));
    }

    #[test]
    fn test_timeout_mapped_from_io() {
        let io_err = io::Error::new(io::ErrorKind::TimedOut, "read timed out");
        let err = TN3270Error::from(io_err);
        assert!(matches!(err, TN3270Error::Timeout));

        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err = TN3270Error::from(io_err);
        assert!(matches!(err, TN3270Error::Io(_)));
    }
}
