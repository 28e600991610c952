//! TN3270 protocol constants and codes
//!
//! Command codes, order codes, WCC bits and structured-field ids as specified
//! in RFC 2355 and the IBM 3270 Data Stream Programmer's Reference
//! (GA23-0059). Both standard (non-SNA) and SNA command encodings are
//! recognised.

use std::fmt;

/// TN3270E message header data types (RFC 2355 section 8).
///
/// Only 3270-DATA is decoded by this engine; the remaining values are defined
/// so an unsupported message can be reported by name.
pub const DT_3270_DATA: u8 = 0x00;
pub const DT_SCS_DATA: u8 = 0x01;
pub const DT_RESPONSE: u8 = 0x02;
pub const DT_BIND_IMAGE: u8 = 0x03;
pub const DT_UNBIND: u8 = 0x04;
pub const DT_NVT_DATA: u8 = 0x05;
pub const DT_REQUEST: u8 = 0x06;
pub const DT_SSCP_LU_DATA: u8 = 0x07;
pub const DT_PRINT_EOJ: u8 = 0x08;

/// Length of the TN3270E message header: data-type, request-flag,
/// response-flag and a two-byte sequence number.
pub const TN3270E_HEADER_LEN: usize = 5;

// 3270 command codes, standard (non-SNA) encodings.
pub const CMD_WRITE: u8 = 0x01;
pub const CMD_READ_BUFFER: u8 = 0x02;
pub const CMD_ERASE_WRITE: u8 = 0x05;
pub const CMD_READ_MODIFIED: u8 = 0x06;
pub const CMD_ERASE_WRITE_ALTERNATE: u8 = 0x0D;
pub const CMD_READ_MODIFIED_ALL: u8 = 0x0E;
pub const CMD_ERASE_ALL_UNPROTECTED: u8 = 0x0F;
pub const CMD_WRITE_STRUCTURED_FIELD: u8 = 0x11;

// SNA command encodings.
pub const CMD_WRITE_SNA: u8 = 0xF1;
pub const CMD_READ_BUFFER_SNA: u8 = 0xF2;
pub const CMD_ERASE_WRITE_SNA: u8 = 0xF5;
pub const CMD_READ_MODIFIED_SNA: u8 = 0xF6;
pub const CMD_ERASE_WRITE_ALTERNATE_SNA: u8 = 0x7E;
pub const CMD_READ_MODIFIED_ALL_SNA: u8 = 0x6E;
pub const CMD_ERASE_ALL_UNPROTECTED_SNA: u8 = 0x6F;
pub const CMD_WRITE_STRUCTURED_FIELD_SNA: u8 = 0xF3;

/// 3270 order codes. Order opcodes occupy byte values 0x00-0x3F; everything
/// above is EBCDIC display text.
pub const ORDER_PT: u8 = 0x05;
pub const ORDER_GE: u8 = 0x08;
pub const ORDER_SBA: u8 = 0x11;
pub const ORDER_EUA: u8 = 0x12;
pub const ORDER_IC: u8 = 0x13;
pub const ORDER_SF: u8 = 0x1D;
pub const ORDER_SA: u8 = 0x28;
pub const ORDER_SFE: u8 = 0x29;
pub const ORDER_MF: u8 = 0x2C;
pub const ORDER_RA: u8 = 0x3C;

/// Last byte value that is an order opcode rather than EBCDIC text.
pub const ORDER_MAX: u8 = 0x3F;

// Write Control Character bits.
pub const WCC_RESET: u8 = 0x40;
pub const WCC_ALARM: u8 = 0x04;
pub const WCC_RESTORE: u8 = 0x02;
pub const WCC_RESET_MDT: u8 = 0x01;

// Field attribute byte bits (SF order operand).
pub const ATTR_PROTECTED: u8 = 0x20;
pub const ATTR_NUMERIC: u8 = 0x10;
pub const ATTR_DISPLAY: u8 = 0x0C;
pub const ATTR_MDT: u8 = 0x01;

pub const DISPLAY_NORMAL: u8 = 0x00;
pub const DISPLAY_INTENSIFIED: u8 = 0x08;
pub const DISPLAY_HIDDEN: u8 = 0x0C;

// Extended attribute types (SFE order pairs).
pub const XA_3270: u8 = 0xC0;
pub const XA_HIGHLIGHTING: u8 = 0x41;
pub const XA_FOREGROUND: u8 = 0x42;

// Structured field ids.
pub const SF_READ_PARTITION: u8 = 0x01;

// Read Partition types.
pub const RP_QUERY: u8 = 0x02;
pub const RP_QUERY_LIST: u8 = 0x03;

// Query Reply ids used in the minimal reply this engine generates.
pub const QR_SUMMARY: u8 = 0x80;
pub const QR_USABLE_AREA: u8 = 0x81;

/// AID byte identifying a Query Reply structured-field message.
pub const AID_STRUCTURED_FIELD: u8 = 0x88;

/// 3270 command codes
///
/// The enum is the full command set; [`CommandCode::is_supported`] separates
/// the commands this engine implements (Write, Erase Write, Write Structured
/// Field) from those it recognises but rejects. Bytes outside this set are a
/// different failure kind entirely (`UnrecognisedCommandCode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCode {
    Write,
    EraseWrite,
    EraseWriteAlternate,
    ReadBuffer,
    ReadModified,
    ReadModifiedAll,
    EraseAllUnprotected,
    WriteStructuredField,
}

impl CommandCode {
    /// Convert a command byte to a CommandCode, accepting both standard and
    /// SNA encodings. Returns None for bytes outside the 3270 command set.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            CMD_WRITE | CMD_WRITE_SNA => Some(Self::Write),
            CMD_ERASE_WRITE | CMD_ERASE_WRITE_SNA => Some(Self::EraseWrite),
            CMD_ERASE_WRITE_ALTERNATE | CMD_ERASE_WRITE_ALTERNATE_SNA => {
                Some(Self::EraseWriteAlternate)
            }
            CMD_READ_BUFFER | CMD_READ_BUFFER_SNA => Some(Self::ReadBuffer),
            CMD_READ_MODIFIED | CMD_READ_MODIFIED_SNA => Some(Self::ReadModified),
            CMD_READ_MODIFIED_ALL | CMD_READ_MODIFIED_ALL_SNA => Some(Self::ReadModifiedAll),
            CMD_ERASE_ALL_UNPROTECTED | CMD_ERASE_ALL_UNPROTECTED_SNA => {
                Some(Self::EraseAllUnprotected)
            }
            CMD_WRITE_STRUCTURED_FIELD | CMD_WRITE_STRUCTURED_FIELD_SNA => {
                Some(Self::WriteStructuredField)
            }
            _ => None,
        }
    }

    /// Standard (non-SNA) byte encoding of this command.
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Write => CMD_WRITE,
            Self::EraseWrite => CMD_ERASE_WRITE,
            Self::EraseWriteAlternate => CMD_ERASE_WRITE_ALTERNATE,
            Self::ReadBuffer => CMD_READ_BUFFER,
            Self::ReadModified => CMD_READ_MODIFIED,
            Self::ReadModifiedAll => CMD_READ_MODIFIED_ALL,
            Self::EraseAllUnprotected => CMD_ERASE_ALL_UNPROTECTED,
            Self::WriteStructuredField => CMD_WRITE_STRUCTURED_FIELD,
        }
    }

    /// Whether this engine implements the command.
    pub fn is_supported(self) -> bool {
        matches!(
            self,
            Self::Write | Self::EraseWrite | Self::WriteStructuredField
        )
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Write => "WRITE",
            Self::EraseWrite => "ERASE_WRITE",
            Self::EraseWriteAlternate => "ERASE_WRITE_ALTERNATE",
            Self::ReadBuffer => "READ_BUFFER",
            Self::ReadModified => "READ_MODIFIED",
            Self::ReadModifiedAll => "READ_MODIFIED_ALL",
            Self::EraseAllUnprotected => "ERASE_ALL_UNPROTECTED",
            Self::WriteStructuredField => "WRITE_STRUCTURED_FIELD",
        };
        write!(f, "{name} (0x{:02X})", self.to_u8())
    }
}

/// Write Control Character
///
/// The bitfield accompanying a Write/Erase Write command, controlling
/// device-level reset, alarm and keyboard behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteControlCharacter {
    pub reset: bool,
    pub alarm: bool,
    pub restore_keyboard: bool,
    pub reset_mdt: bool,
}

impl WriteControlCharacter {
    /// Parse a WCC byte.
    pub fn from_u8(byte: u8) -> Self {
        Self {
            reset: (byte & WCC_RESET) != 0,
            alarm: (byte & WCC_ALARM) != 0,
            restore_keyboard: (byte & WCC_RESTORE) != 0,
            reset_mdt: (byte & WCC_RESET_MDT) != 0,
        }
    }

    /// Encode back to a byte.
    pub fn to_u8(self) -> u8 {
        let mut byte = 0u8;
        if self.reset {
            byte |= WCC_RESET;
        }
        if self.alarm {
            byte |= WCC_ALARM;
        }
        if self.restore_keyboard {
            byte |= WCC_RESTORE;
        }
        if self.reset_mdt {
            byte |= WCC_RESET_MDT;
        }
        byte
    }
}
