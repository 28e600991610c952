//! TN3270E option negotiation
//!
//! Implements the client side of the TN3270E handshake (RFC 2355, subset):
//! the host asks `DO TN3270E`, the client answers `WILL`, then the two sides
//! exchange DEVICE-TYPE and FUNCTIONS subnegotiations. The handshake is a
//! fixed script, so each inbound step is validated byte-for-byte with a
//! [`ByteExpector`]; any deviation fails with the expected and received
//! sequences in hex.
//!
//! Negotiation is all-or-nothing. A failure leaves the transport in an
//! undefined protocol state and the caller must close it; there are no
//! partial or retry semantics.

use log::debug;

use crate::config::SessionConfig;
use crate::error::{TN3270Error, TN3270Result};
use crate::framing::IAC;
use crate::transport::{ByteExpector, Transport};

/// Telnet command bytes (RFC 854).
pub const DONT: u8 = 0xFE;
pub const DO: u8 = 0xFD;
pub const WONT: u8 = 0xFC;
pub const WILL: u8 = 0xFB;
pub const SB: u8 = 0xFA;
pub const SE: u8 = 0xF0;

/// The TN3270E telnet option (RFC 2355).
pub const OPT_TN3270E: u8 = 0x28;

/// TN3270E subnegotiation operation codes (RFC 2355 section 8).
pub const OP_ASSOCIATE: u8 = 0x00;
pub const OP_CONNECT: u8 = 0x01;
pub const OP_DEVICE_TYPE: u8 = 0x02;
pub const OP_FUNCTIONS: u8 = 0x03;
pub const OP_IS: u8 = 0x04;
pub const OP_REASON: u8 = 0x05;
pub const OP_REJECT: u8 = 0x06;
pub const OP_REQUEST: u8 = 0x07;
pub const OP_SEND: u8 = 0x08;

/// Outcome of a successful handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedSession {
    /// The device type the host assigned (always one of the offered types).
    pub device_type: String,
    /// LU name the host connected us to. Kept for diagnostics only.
    pub lu_name: String,
}

/// Drives the TN3270E handshake over a caller-supplied transport.
#[derive(Debug, Clone)]
pub struct TelnetNegotiator {
    terminal_types: Vec<String>,
}

impl TelnetNegotiator {
    /// Create a negotiator offering the given terminal types. The first entry
    /// is sent in the DEVICE-TYPE REQUEST, so the list must not be empty.
    pub fn new(terminal_types: Vec<String>) -> Self {
        debug_assert!(!terminal_types.is_empty());
        Self { terminal_types }
    }

    /// Create a negotiator from a session configuration.
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.terminal_types.clone())
    }

    /// Perform the full handshake. On success the transport carries framed
    /// 3270 records from this point on.
    pub fn negotiate<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
    ) -> TN3270Result<NegotiatedSession> {
        // Host opens with IAC DO TN3270E; we answer IAC WILL TN3270E.
        ByteExpector::new(transport).expect(&[IAC, DO, OPT_TN3270E])?;
        transport.write_all(&[IAC, WILL, OPT_TN3270E])?;
        transport.flush()?;
        debug!("TN3270E option accepted");

        // Host asks us to send our device type.
        ByteExpector::new(transport).expect(&[
            IAC,
            SB,
            OPT_TN3270E,
            OP_SEND,
            OP_DEVICE_TYPE,
            IAC,
            SE,
        ])?;
        let requested = &self.terminal_types[0];
        let mut request = vec![IAC, SB, OPT_TN3270E, OP_DEVICE_TYPE, OP_REQUEST];
        request.extend_from_slice(requested.as_bytes());
        request.extend_from_slice(&[IAC, SE]);
        transport.write_all(&request)?;
        transport.flush()?;
        debug!("requested device type {requested}");

        // Host replies DEVICE-TYPE IS <type> CONNECT <lu-name>.
        let mut expector = ByteExpector::new(transport);
        expector.expect(&[IAC, SB, OPT_TN3270E, OP_DEVICE_TYPE, OP_IS])?;
        let device_type_bytes = expector.read_until(OP_CONNECT)?;
        let device_type = String::from_utf8_lossy(&device_type_bytes).into_owned();
        if !self.terminal_types.iter().any(|t| t == &device_type) {
            return Err(TN3270Error::DeviceTypeRejected {
                offered: self.terminal_types.clone(),
                received: device_type,
            });
        }
        let lu_bytes = expector.read_until(IAC)?;
        let lu_name = String::from_utf8_lossy(&lu_bytes).into_owned();
        expector.expect(&[SE])?;
        debug!("host assigned device type {device_type}, LU {lu_name}");

        // Request no TN3270E functions; the host must confirm the empty set.
        transport.write_all(&[IAC, SB, OPT_TN3270E, OP_FUNCTIONS, OP_REQUEST, IAC, SE])?;
        transport.flush()?;
        ByteExpector::new(transport).expect(&[
            IAC,
            SB,
            OPT_TN3270E,
            OP_FUNCTIONS,
            OP_IS,
            IAC,
            SE,
        ])?;
        debug!("negotiation complete");

        Ok(NegotiatedSession {
            device_type,
            lu_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read, Write};

    /// Test double: reads come from a fixed host script, writes are captured.
    struct ScriptedTransport {
        input: io::Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<u8>) -> Self {
            Self {
                input: io::Cursor::new(script),
                output: Vec::new(),
            }
        }
    }

    impl Read for ScriptedTransport {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for ScriptedTransport {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn host_script(device_type: &str, lu: &str) -> Vec<u8> {
        let mut script = vec![IAC, DO, OPT_TN3270E];
        script.extend_from_slice(&[IAC, SB, OPT_TN3270E, OP_SEND, OP_DEVICE_TYPE, IAC, SE]);
        script.extend_from_slice(&[IAC, SB, OPT_TN3270E, OP_DEVICE_TYPE, OP_IS]);
        script.extend_from_slice(device_type.as_bytes());
        script.push(OP_CONNECT);
        script.extend_from_slice(lu.as_bytes());
        script.extend_from_slice(&[IAC, SE]);
        script.extend_from_slice(&[IAC, SB, OPT_TN3270E, OP_FUNCTIONS, OP_IS, IAC, SE]);
        script
    }

    #[test]
    fn test_successful_handshake() {
        let mut transport = ScriptedTransport::new(host_script("IBM-3278-2-E", "LU01"));
        let negotiator = TelnetNegotiator::from_config(&SessionConfig::default());

        let session = negotiator.negotiate(&mut transport).unwrap();
        assert_eq!(session.device_type, "IBM-3278-2-E");
        assert_eq!(session.lu_name, "LU01");

        // Client side of the script, in order.
        let mut expected = vec![IAC, WILL, OPT_TN3270E];
        expected.extend_from_slice(&[IAC, SB, OPT_TN3270E, OP_DEVICE_TYPE, OP_REQUEST]);
        expected.extend_from_slice(b"IBM-3278-2-E");
        expected.extend_from_slice(&[IAC, SE]);
        expected.extend_from_slice(&[IAC, SB, OPT_TN3270E, OP_FUNCTIONS, OP_REQUEST, IAC, SE]);
        assert_eq!(transport.output, expected);
    }

    #[test]
    fn test_secondary_device_type_accepted() {
        let mut transport = ScriptedTransport::new(host_script("IBM-3278-2", "LU02"));
        let negotiator = TelnetNegotiator::from_config(&SessionConfig::default());
        let session = negotiator.negotiate(&mut transport).unwrap();
        assert_eq!(session.device_type, "IBM-3278-2");
    }

    #[test]
    fn test_wrong_opening_bytes() {
        // Host offers plain terminal-type negotiation instead of TN3270E.
        let mut transport = ScriptedTransport::new(vec![IAC, DO, 0x18]);
        let negotiator = TelnetNegotiator::from_config(&SessionConfig::default());
        match negotiator.negotiate(&mut transport) {
            Err(TN3270Error::Negotiation { expected, actual }) => {
                assert_eq!(expected, vec![IAC, DO, OPT_TN3270E]);
                assert_eq!(actual, vec![IAC, DO, 0x18]);
            }
            other => panic!("expected negotiation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_device_type_send() {
        let mut script = vec![IAC, DO, OPT_TN3270E];
        // Host sends a FUNCTIONS subnegotiation where DEVICE-TYPE SEND belongs.
        script.extend_from_slice(&[IAC, SB, OPT_TN3270E, OP_FUNCTIONS, OP_IS, IAC, SE]);
        let mut transport = ScriptedTransport::new(script);
        let negotiator = TelnetNegotiator::from_config(&SessionConfig::default());
        let err = negotiator.negotiate(&mut transport).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("0x08 0x02"), "message should name expected bytes: {msg}");
        assert!(msg.contains("0x03 0x04"), "message should name received bytes: {msg}");
    }

    #[test]
    fn test_unoffered_device_type_rejected() {
        let mut transport = ScriptedTransport::new(host_script("IBM-3279-4", "LU01"));
        let negotiator = TelnetNegotiator::from_config(&SessionConfig::default());
        match negotiator.negotiate(&mut transport) {
            Err(TN3270Error::DeviceTypeRejected { received, .. }) => {
                assert_eq!(received, "IBM-3279-4");
            }
            other => panic!("expected device type rejection, got {other:?}"),
        }
    }
}
