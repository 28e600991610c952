//! Terminal session
//!
//! Ties the pieces together for one host connection: negotiate once, then
//! read framed records in a loop, decode each, and apply it to the owned
//! screen. The session also tracks the device-level state the WCC drives:
//! keyboard lock and the alarm latch.
//!
//! Sessions are strictly sequential. One session owns one transport and one
//! screen; driving many terminals means one session per thread with nothing
//! shared.

use log::{debug, info};

use crate::config::SessionConfig;
use crate::datastream::codes::{
    AID_STRUCTURED_FIELD, QR_SUMMARY, QR_USABLE_AREA,
};
use crate::datastream::decoder::{DataStreamMessage, DatastreamDecoder};
use crate::datastream::order::{ReadPartitionType, StructuredField};
use crate::datastream::CommandCode;
use crate::error::TN3270Result;
use crate::framing::{read_record, write_record};
use crate::screen::Screen;
use crate::telnet_negotiation::{NegotiatedSession, TelnetNegotiator};
use crate::transport::Transport;

/// One 3270 terminal session over an already-connected transport.
pub struct TerminalSession<T: Transport> {
    transport: T,
    screen: Screen,
    decoder: DatastreamDecoder,
    config: SessionConfig,
    negotiated: Option<NegotiatedSession>,
    keyboard_locked: bool,
    alarm: bool,
}

impl<T: Transport> TerminalSession<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let screen = Screen::from_config(&config);
        let decoder = DatastreamDecoder::new(config.code_page);
        Self {
            transport,
            screen,
            decoder,
            config,
            negotiated: None,
            keyboard_locked: true,
            alarm: false,
        }
    }

    /// Run the TN3270E handshake. Must complete before any record is read;
    /// a failure leaves the transport unusable and the caller should drop
    /// the session.
    pub fn negotiate(&mut self) -> TN3270Result<()> {
        let negotiator = TelnetNegotiator::from_config(&self.config);
        let negotiated = negotiator.negotiate(&mut self.transport)?;
        info!(
            "session negotiated: device type {}, LU {}",
            negotiated.device_type, negotiated.lu_name
        );
        self.negotiated = Some(negotiated);
        Ok(())
    }

    /// The device type the host assigned, once negotiated.
    pub fn device_type(&self) -> Option<&str> {
        self.negotiated.as_ref().map(|n| n.device_type.as_str())
    }

    /// Read, decode and apply the next inbound record.
    pub fn process_next_message(&mut self) -> TN3270Result<()> {
        let record = read_record(&mut self.transport)?;
        let message = self.decoder.decode(&record)?;
        self.apply(message)
    }

    fn apply(&mut self, message: DataStreamMessage) -> TN3270Result<()> {
        match message {
            DataStreamMessage::Write {
                command,
                wcc,
                orders,
            } => {
                if command == CommandCode::EraseWrite {
                    self.screen.erase();
                }
                self.screen.process_orders(&orders)?;
                // A write locks the keyboard unless the WCC restores it.
                self.keyboard_locked = !wcc.restore_keyboard;
                if wcc.alarm {
                    self.alarm = true;
                }
                debug!(
                    "{command} applied, keyboard {}",
                    if self.keyboard_locked { "locked" } else { "restored" }
                );
                Ok(())
            }
            DataStreamMessage::StructuredFields(fields) => {
                for field in fields {
                    let StructuredField::ReadPartition {
                        partition_id,
                        request,
                    } = field;
                    debug!("read partition 0x{partition_id:02X}: {request:?}");
                    match request {
                        ReadPartitionType::Query | ReadPartitionType::QueryList { .. } => {
                            self.send_query_reply()?;
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Answer a Read Partition Query with the minimal capability set: a
    /// summary naming the replies present, and the usable area geometry.
    fn send_query_reply(&mut self) -> TN3270Result<()> {
        let mut payload = vec![0x00, 0x00, 0x00, 0x00, 0x00, AID_STRUCTURED_FIELD];
        // Summary: the QCODEs present in this reply.
        push_query_reply(&mut payload, QR_SUMMARY, &[QR_SUMMARY, QR_USABLE_AREA]);
        // Usable Area: 12/14-bit addressing, width and height in cells.
        let columns = self.config.columns as u16;
        let rows = self.config.rows as u16;
        let mut usable_area = vec![0x01, 0x00];
        usable_area.extend_from_slice(&columns.to_be_bytes());
        usable_area.extend_from_slice(&rows.to_be_bytes());
        push_query_reply(&mut payload, QR_USABLE_AREA, &usable_area);
        write_record(&mut self.transport, &payload)?;
        debug!("query reply sent");
        Ok(())
    }

    /// Whether the host currently holds the keyboard locked.
    pub fn keyboard_locked(&self) -> bool {
        self.keyboard_locked
    }

    /// Whether the alarm has sounded since the last check. Reading clears
    /// the latch.
    pub fn take_alarm(&mut self) -> bool {
        std::mem::take(&mut self.alarm)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// End the session, dropping the transport but keeping the screen so
    /// its last rendered state stays inspectable.
    pub fn into_screen(self) -> Screen {
        self.screen
    }
}

/// Append one Query Reply structured field: big-endian length (including the
/// length bytes), the 0x81 reply id, the QCODE, then the body.
fn push_query_reply(payload: &mut Vec<u8>, qcode: u8, body: &[u8]) {
    let length = (body.len() + 4) as u16;
    payload.extend_from_slice(&length.to_be_bytes());
    payload.push(0x81);
    payload.push(qcode);
    payload.extend_from_slice(body);
}
