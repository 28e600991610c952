//! tn3270r: an IBM 3270 / TN3270E terminal-emulation engine
//!
//! The crate negotiates a TN3270E session over a caller-supplied byte
//! stream, decodes the binary 3270 data stream the host sends, and maintains
//! an addressable screen buffer that automation callers can query for text,
//! cursor position and field attributes.
//!
//! Data flow: bytes in -> [`telnet_negotiation::TelnetNegotiator`] (once, at
//! connect) -> [`framing::read_record`] (per inbound message) ->
//! [`datastream::DatastreamDecoder`] -> decoded orders ->
//! [`screen::Screen::process_orders`] -> query surface (`print_screen`,
//! `print_fields`, cursor and attribute lookups). [`session::TerminalSession`]
//! wires the whole pipeline together for one connection.

/// Session configuration: terminal types, geometry, code page.
pub mod config;

/// 3270 data stream handling: constants, address codec, order model, decoder.
pub mod datastream;

/// EBCDIC code page translation.
pub mod ebcdic;

/// Error taxonomy for negotiation, framing, decode and apply failures.
pub mod error;

/// IAC-escaped, EOR-terminated record framing.
pub mod framing;

/// The screen buffer model: the field partition and its query surface.
pub mod screen;

/// One terminal session: negotiate, read, decode, apply.
pub mod session;

/// TN3270E option negotiation.
pub mod telnet_negotiation;

/// The transport boundary this engine runs over.
pub mod transport;

pub use config::SessionConfig;
pub use datastream::{DataStreamMessage, DatastreamDecoder, Order};
pub use error::{TN3270Error, TN3270Result};
pub use screen::Screen;
pub use session::TerminalSession;
pub use telnet_negotiation::TelnetNegotiator;
pub use transport::Transport;
