//! Decoded order and structured-field model
//!
//! The decoder turns the raw byte stream into these types; the screen buffer
//! consumes them without ever looking back at wire bytes. Text runs between
//! orders are already translated out of EBCDIC by the time they appear here.

use crate::datastream::codes::{
    ATTR_DISPLAY, ATTR_MDT, ATTR_NUMERIC, ATTR_PROTECTED, DISPLAY_HIDDEN, DISPLAY_INTENSIFIED,
};

/// Field colour from an SFE foreground attribute (GA23-0059 colour codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    Neutral,
    Blue,
    Red,
    Pink,
    Green,
    Turquoise,
    Yellow,
    White,
}

impl Colour {
    /// Map a colour attribute value. 0x00 means "device default" and decodes
    /// to None, as do values outside the colour range.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0xF0 => Some(Self::Neutral),
            0xF1 => Some(Self::Blue),
            0xF2 => Some(Self::Red),
            0xF3 => Some(Self::Pink),
            0xF4 => Some(Self::Green),
            0xF5 => Some(Self::Turquoise),
            0xF6 => Some(Self::Yellow),
            0xF7 => Some(Self::White),
            _ => None,
        }
    }
}

/// Field highlighting from an SFE highlighting attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    Blink,
    Reverse,
    Underscore,
}

impl Highlight {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0xF0 => Some(Self::Normal),
            0xF1 => Some(Self::Blink),
            0xF2 => Some(Self::Reverse),
            0xF4 => Some(Self::Underscore),
            _ => None,
        }
    }
}

/// The basic 3270 field attribute byte carried by SF and SFE orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldAttributes {
    pub protected: bool,
    pub numeric: bool,
    pub intensified: bool,
    pub hidden: bool,
    pub modified: bool,
}

impl FieldAttributes {
    pub fn from_u8(byte: u8) -> Self {
        let display = byte & ATTR_DISPLAY;
        Self {
            protected: (byte & ATTR_PROTECTED) != 0,
            numeric: (byte & ATTR_NUMERIC) != 0,
            intensified: display == DISPLAY_INTENSIFIED,
            hidden: display == DISPLAY_HIDDEN,
            modified: (byte & ATTR_MDT) != 0,
        }
    }
}

/// One decoded element of a 3270 write data stream.
///
/// Display text is accumulated: a run of consecutive EBCDIC text bytes
/// becomes a single `Text` order, never one order per byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    /// SBA: move the working buffer address.
    SetBufferAddress(u16),
    /// SF: begin a field with basic attributes at the working address.
    StartField(FieldAttributes),
    /// SFE: begin a field with basic plus extended attributes. Unknown
    /// attribute types are dropped during decode.
    StartFieldExtended {
        attributes: FieldAttributes,
        colour: Option<Colour>,
        highlight: Option<Highlight>,
    },
    /// IC: place the cursor at the working address.
    InsertCursor,
    /// RA: fill from the working address up to (excluding) the target with
    /// one character.
    RepeatToAddress { address: u16, ch: char },
    /// EUA: erase unprotected positions up to the target address.
    EraseUnprotectedToAddress(u16),
    /// A run of display characters, already translated from EBCDIC.
    Text(String),
}

/// The Read Partition request variants this engine understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadPartitionType {
    /// Query: the host asks for the full capability set.
    Query,
    /// Query List: the host names the QCODEs it is interested in.
    QueryList { request_type: u8, qcodes: Vec<u8> },
}

/// A structured field carried by a Write Structured Field command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredField {
    ReadPartition {
        partition_id: u8,
        request: ReadPartitionType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_attributes_bits() {
        let attrs = FieldAttributes::from_u8(0x20 | 0x08);
        assert!(attrs.protected);
        assert!(attrs.intensified);
        assert!(!attrs.hidden);
        assert!(!attrs.numeric);
        assert!(!attrs.modified);
    }

    #[test]
    fn test_hidden_display_is_both_bits() {
        let attrs = FieldAttributes::from_u8(0x0C);
        assert!(attrs.hidden);
        // Intensified is the 0x08-only encoding; 0x0C means hidden.
        assert!(!attrs.intensified);
    }

    #[test]
    fn test_colour_codes() {
        assert_eq!(Colour::from_u8(0xF2), Some(Colour::Red));
        assert_eq!(Colour::from_u8(0x00), None);
        assert_eq!(Colour::from_u8(0xF8), None);
    }

    #[test]
    fn test_highlight_codes() {
        assert_eq!(Highlight::from_u8(0xF2), Some(Highlight::Reverse));
        assert_eq!(Highlight::from_u8(0xF3), None);
    }
}
