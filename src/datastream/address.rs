//! Buffer address encoding
//!
//! 3270 buffer addresses travel as two bytes in one of two formats. The
//! 12-bit format maps each 6-bit half through a graphic character table
//! (GA23-0059 appendix B) so both bytes land in printable EBCDIC ranges; it
//! covers screens up to 4096 positions. The 14-bit format is a plain binary
//! split used for larger screens. The format is self-describing: if the top
//! two bits of the first byte are both zero, the address is 14-bit.

use crate::error::{TN3270Error, TN3270Result};

/// 6-bit value to graphic byte, for the 12-bit address format.
const ADDRESS_TABLE: [u8; 64] = [
    0x40, 0xC1, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, // 0-7
    0xC8, 0xC9, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, // 8-15
    0x50, 0xD1, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, // 16-23
    0xD8, 0xD9, 0x5A, 0x5B, 0x5C, 0x5D, 0x5E, 0x5F, // 24-31
    0x60, 0x61, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6, 0xE7, // 32-39
    0xE8, 0xE9, 0x6A, 0x6B, 0x6C, 0x6D, 0x6E, 0x6F, // 40-47
    0xF0, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, // 48-55
    0xF8, 0xF9, 0x7A, 0x7B, 0x7C, 0x7D, 0x7E, 0x7F, // 56-63
];

/// Decode a two-byte buffer address in either format.
///
/// The 12-bit format keeps only the low 6 bits of each byte, so the graphic
/// table never has to be inverted on decode.
pub fn decode_buffer_address(b1: u8, b2: u8) -> u16 {
    if b1 & 0xC0 == 0 {
        // 14-bit: six high bits then eight low bits.
        ((b1 as u16 & 0x3F) << 8) | b2 as u16
    } else {
        // 12-bit: six bits from each byte.
        ((b1 as u16 & 0x3F) << 6) | (b2 as u16 & 0x3F)
    }
}

/// Encode a buffer address in the 12-bit graphic format.
///
/// Only valid for addresses below 4096; larger screens must use
/// [`encode_buffer_address_14bit`].
pub fn encode_buffer_address_12bit(address: u16) -> (u8, u8) {
    let high = ADDRESS_TABLE[(address >> 6) as usize & 0x3F];
    let low = ADDRESS_TABLE[address as usize & 0x3F];
    (high, low)
}

/// Encode a buffer address in the 14-bit binary format. The first byte has
/// its top two bits clear, which is what distinguishes the format on decode.
pub fn encode_buffer_address_14bit(address: u16) -> (u8, u8) {
    (((address >> 8) & 0x3F) as u8, (address & 0xFF) as u8)
}

/// Validate a decoded address against the screen size.
pub fn check_address(address: u16, screen_size: usize) -> TN3270Result<u16> {
    if (address as usize) < screen_size {
        Ok(address)
    } else {
        Err(TN3270Error::AddressOutOfRange {
            address: address as usize,
            screen_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decode_12bit() {
        // Row 1 column 1 of a model 2 screen is address 80: 80 = 1<<6 | 16,
        // graphic bytes 0xC1 0x50.
        assert_eq!(decode_buffer_address(0xC1, 0x50), 80);
        assert_eq!(decode_buffer_address(0x40, 0x40), 0);
    }

    #[test]
    fn test_decode_14bit() {
        assert_eq!(decode_buffer_address(0x00, 0x00), 0);
        assert_eq!(decode_buffer_address(0x07, 0x80), 0x0780);
        assert_eq!(decode_buffer_address(0x3F, 0xFF), 0x3FFF);
    }

    #[test]
    fn test_check_address_bounds() {
        assert_eq!(check_address(1919, 1920).unwrap(), 1919);
        assert!(matches!(
            check_address(1920, 1920),
            Err(TN3270Error::AddressOutOfRange {
                address: 1920,
                screen_size: 1920,
            })
        ));
    }

    proptest! {
        #[test]
        fn prop_12bit_roundtrip(address in 0u16..4096) {
            let (b1, b2) = encode_buffer_address_12bit(address);
            // Graphic bytes always have at least one of the top two bits set,
            // so they never collide with the 14-bit format.
            prop_assert!(b1 & 0xC0 != 0);
            prop_assert_eq!(decode_buffer_address(b1, b2), address);
        }

        #[test]
        fn prop_14bit_roundtrip(address in 0u16..0x4000) {
            let (b1, b2) = encode_buffer_address_14bit(address);
            prop_assert_eq!(b1 & 0xC0, 0);
            prop_assert_eq!(decode_buffer_address(b1, b2), address);
        }
    }
}
