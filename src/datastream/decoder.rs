//! 3270 write data stream decoder
//!
//! Consumes one complete framed record (TN3270E header, command byte, WCC,
//! orders and text) and produces a [`DataStreamMessage`]. Decoding is pure:
//! it never touches the screen buffer and never does range checks that
//! depend on screen geometry, so a decoded message can be inspected or
//! replayed independently of any session.

use log::{debug, trace};

use crate::datastream::address::decode_buffer_address;
use crate::datastream::codes::{
    CommandCode, WriteControlCharacter, DT_3270_DATA, ORDER_EUA, ORDER_GE, ORDER_IC, ORDER_MAX,
    ORDER_MF, ORDER_PT, ORDER_RA, ORDER_SA, ORDER_SBA, ORDER_SF, ORDER_SFE, RP_QUERY,
    RP_QUERY_LIST, SF_READ_PARTITION, TN3270E_HEADER_LEN, XA_3270, XA_FOREGROUND, XA_HIGHLIGHTING,
};
use crate::datastream::order::{
    Colour, FieldAttributes, Highlight, Order, ReadPartitionType, StructuredField,
};
use crate::ebcdic::{ebcdic_to_unicode, CodePage};
use crate::error::{TN3270Error, TN3270Result};

/// One fully decoded inbound 3270 record.
#[derive(Debug, Clone, PartialEq)]
pub enum DataStreamMessage {
    /// Write or Erase Write: a WCC followed by orders and text.
    Write {
        command: CommandCode,
        wcc: WriteControlCharacter,
        orders: Vec<Order>,
    },
    /// Write Structured Field: one or more structured fields.
    StructuredFields(Vec<StructuredField>),
}

/// Bounded reader over a record, tracking position for error reporting.
struct RecordCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, count: usize, context: &'static str) -> TN3270Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(TN3270Error::Truncated {
                at: self.pos,
                needed: count - self.remaining(),
                context,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn take_byte(&mut self, context: &'static str) -> TN3270Result<u8> {
        Ok(self.take(1, context)?[0])
    }

    fn take_address(&mut self, context: &'static str) -> TN3270Result<u16> {
        let bytes = self.take(2, context)?;
        Ok(decode_buffer_address(bytes[0], bytes[1]))
    }
}

/// Decoder for inbound 3270 records.
///
/// Holds only the code page; one decoder can serve a whole session.
#[derive(Debug, Clone, Copy)]
pub struct DatastreamDecoder {
    code_page: CodePage,
}

impl DatastreamDecoder {
    pub fn new(code_page: CodePage) -> Self {
        Self { code_page }
    }

    /// Decode one record as received from the frame reader (header included,
    /// IAC escaping already removed).
    pub fn decode(&self, record: &[u8]) -> TN3270Result<DataStreamMessage> {
        let mut cursor = RecordCursor::new(record);
        let header = cursor.take(TN3270E_HEADER_LEN, "TN3270E header")?;
        if header[0] != DT_3270_DATA {
            return Err(TN3270Error::UnsupportedDataType(header[0]));
        }

        let command_byte = cursor.take_byte("command code")?;
        let command = CommandCode::from_u8(command_byte)
            .ok_or(TN3270Error::UnrecognisedCommandCode(command_byte))?;
        if !command.is_supported() {
            return Err(TN3270Error::UnsupportedCommandCode(command));
        }
        debug!("decoding {command}, {} payload bytes", cursor.remaining());

        match command {
            CommandCode::WriteStructuredField => {
                let fields = self.decode_structured_fields(&mut cursor)?;
                Ok(DataStreamMessage::StructuredFields(fields))
            }
            _ => {
                let wcc = WriteControlCharacter::from_u8(cursor.take_byte("WCC")?);
                let orders = self.decode_orders(&mut cursor)?;
                Ok(DataStreamMessage::Write {
                    command,
                    wcc,
                    orders,
                })
            }
        }
    }

    /// Decode the order/text stream that follows a WCC. Consecutive display
    /// bytes collapse into a single Text order.
    fn decode_orders(&self, cursor: &mut RecordCursor<'_>) -> TN3270Result<Vec<Order>> {
        let mut orders = Vec::new();
        let mut text = String::new();

        while cursor.remaining() > 0 {
            let byte = cursor.take_byte("order or text")?;
            if byte > ORDER_MAX {
                text.push(ebcdic_to_unicode(byte, self.code_page));
                continue;
            }
            if !text.is_empty() {
                orders.push(Order::Text(std::mem::take(&mut text)));
            }
            let order = self.decode_order(byte, cursor)?;
            trace!("decoded {order:?}");
            orders.push(order);
        }
        if !text.is_empty() {
            orders.push(Order::Text(text));
        }
        Ok(orders)
    }

    fn decode_order(&self, opcode: u8, cursor: &mut RecordCursor<'_>) -> TN3270Result<Order> {
        match opcode {
            ORDER_SBA => Ok(Order::SetBufferAddress(cursor.take_address("SBA address")?)),
            ORDER_SF => Ok(Order::StartField(FieldAttributes::from_u8(
                cursor.take_byte("SF attribute")?,
            ))),
            ORDER_SFE => self.decode_start_field_extended(cursor),
            ORDER_IC => Ok(Order::InsertCursor),
            ORDER_RA => {
                let address = cursor.take_address("RA stop address")?;
                let ch_byte = cursor.take_byte("RA character")?;
                Ok(Order::RepeatToAddress {
                    address,
                    ch: ebcdic_to_unicode(ch_byte, self.code_page),
                })
            }
            ORDER_EUA => Ok(Order::EraseUnprotectedToAddress(
                cursor.take_address("EUA stop address")?,
            )),
            // Orders the 3270 architecture defines but this engine does not
            // implement; named so the failure reads better than a raw byte.
            ORDER_PT => Err(unimplemented_order("PT")),
            ORDER_GE => Err(unimplemented_order("GE")),
            ORDER_SA => Err(unimplemented_order("SA")),
            ORDER_MF => Err(unimplemented_order("MF")),
            other => Err(TN3270Error::UnrecognisedOrder(other)),
        }
    }

    /// SFE: a pair count, then (type, value) attribute pairs. The 3270 base
    /// attribute pair carries the same byte SF does; colour and highlighting
    /// pairs map through their value tables; unknown pair types are skipped.
    fn decode_start_field_extended(&self, cursor: &mut RecordCursor<'_>) -> TN3270Result<Order> {
        let pair_count = cursor.take_byte("SFE pair count")? as usize;
        let mut attributes = FieldAttributes::default();
        let mut colour = None;
        let mut highlight = None;
        for _ in 0..pair_count {
            let pair = cursor.take(2, "SFE attribute pair")?;
            match pair[0] {
                XA_3270 => attributes = FieldAttributes::from_u8(pair[1]),
                XA_FOREGROUND => colour = Colour::from_u8(pair[1]),
                XA_HIGHLIGHTING => highlight = Highlight::from_u8(pair[1]),
                other => trace!("ignoring SFE attribute type 0x{other:02X}"),
            }
        }
        Ok(Order::StartFieldExtended {
            attributes,
            colour,
            highlight,
        })
    }

    /// Decode the structured fields of a WSF command. Each field is a
    /// two-byte big-endian length (zero means "to end of record"), an id
    /// byte, and the field body.
    fn decode_structured_fields(
        &self,
        cursor: &mut RecordCursor<'_>,
    ) -> TN3270Result<Vec<StructuredField>> {
        let mut fields = Vec::new();
        while cursor.remaining() > 0 {
            let len_bytes = cursor.take(2, "structured field length")?;
            let declared = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
            let body_len = if declared == 0 {
                cursor.remaining()
            } else {
                // The declared length includes the two length bytes.
                declared.checked_sub(2).ok_or(TN3270Error::Truncated {
                    at: cursor.pos,
                    needed: 2,
                    context: "structured field length",
                })?
            };
            let mut body = RecordCursor::new(cursor.take(body_len, "structured field body")?);
            let id = body.take_byte("structured field id")?;
            match id {
                SF_READ_PARTITION => fields.push(self.decode_read_partition(&mut body)?),
                other => return Err(TN3270Error::UnsupportedStructuredField(other)),
            }
        }
        Ok(fields)
    }

    fn decode_read_partition(&self, body: &mut RecordCursor<'_>) -> TN3270Result<StructuredField> {
        let partition_id = body.take_byte("Read Partition partition id")?;
        let request_type = body.take_byte("Read Partition type")?;
        let request = match request_type {
            RP_QUERY => ReadPartitionType::Query,
            RP_QUERY_LIST => ReadPartitionType::QueryList {
                request_type: body.take_byte("Query List request type")?,
                qcodes: body.take(body.remaining(), "Query List QCODEs")?.to_vec(),
            },
            other => return Err(TN3270Error::UnsupportedStructuredField(other)),
        };
        Ok(StructuredField::ReadPartition {
            partition_id,
            request,
        })
    }
}

fn unimplemented_order(name: &'static str) -> TN3270Error {
    TN3270Error::UnsupportedOrder {
        order: name,
        reason: "order not implemented by this engine".to_string(),
    }
}
