//! EBCDIC code-page translation
//!
//! The 3270 data stream carries display text as EBCDIC bytes (values
//! `0x40..=0xFF`; `0x00..=0x3F` are order opcodes). This module translates
//! between EBCDIC and Unicode for a configured code page. The engine treats
//! the tables as a black-box codec: decoding never fails, every byte maps to
//! some character.
//!
//! Only CP037 (EBCDIC US/Canada) ships today; the enum leaves room for the
//! other national code pages without touching call sites.

use serde::{Deserialize, Serialize};

/// EBCDIC space, the fill byte for blank screen positions.
pub const EBCDIC_SPACE: u8 = 0x40;

/// Supported EBCDIC code pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CodePage {
    /// Code page 037, EBCDIC US/Canada. The default for US-hosted systems.
    #[default]
    Cp037,
}

/// CP037 EBCDIC to Unicode translation table
///
/// Maps all 256 EBCDIC code points to their Unicode equivalents, per the
/// IBM Code Page 37 specification.
const CP037_TO_UNICODE: [char; 256] = [
    // 0x00-0x0F: Control characters
    '\x00', '\x01', '\x02', '\x03', '\u{009C}', '\t', '\u{0086}', '\x7F',
    '\u{0097}', '\u{008D}', '\u{008E}', '\x0B', '\x0C', '\r', '\x0E', '\x0F',
    // 0x10-0x1F: Control characters
    '\x10', '\x11', '\x12', '\x13', '\u{009D}', '\u{0085}', '\x08', '\u{0087}',
    '\x18', '\x19', '\u{0092}', '\u{008F}', '\x1C', '\x1D', '\x1E', '\x1F',
    // 0x20-0x2F: Control characters and special
    '\u{0080}', '\u{0081}', '\u{0082}', '\u{0083}', '\u{0084}', '\n', '\x17', '\x1B',
    '\u{0088}', '\u{0089}', '\u{008A}', '\u{008B}', '\u{008C}', '\x05', '\x06', '\x07',
    // 0x30-0x3F: Control characters
    '\u{0090}', '\u{0091}', '\x16', '\u{0093}', '\u{0094}', '\u{0095}', '\u{0096}', '\x04',
    '\u{0098}', '\u{0099}', '\u{009A}', '\u{009B}', '\x14', '\x15', '\u{009E}', '\x1A',
    // 0x40-0x4F: Space and special characters
    ' ', '\u{00A0}', '\u{00E2}', '\u{00E4}', '\u{00E0}', '\u{00E1}', '\u{00E3}', '\u{00E5}',
    '\u{00E7}', '\u{00F1}', '\u{00A2}', '.', '<', '(', '+', '|',
    // 0x50-0x5F: Ampersand and special characters
    '&', '\u{00E9}', '\u{00EA}', '\u{00EB}', '\u{00E8}', '\u{00ED}', '\u{00EE}', '\u{00EF}',
    '\u{00EC}', '\u{00DF}', '!', '$', '*', ')', ';', '\u{00AC}',
    // 0x60-0x6F: Dash and special characters
    '-', '/', '\u{00C2}', '\u{00C4}', '\u{00C0}', '\u{00C1}', '\u{00C3}', '\u{00C5}',
    '\u{00C7}', '\u{00D1}', '\u{00A6}', ',', '%', '_', '>', '?',
    // 0x70-0x7F: Special characters and quotes
    '\u{00F8}', '\u{00C9}', '\u{00CA}', '\u{00CB}', '\u{00C8}', '\u{00CD}', '\u{00CE}', '\u{00CF}',
    '\u{00CC}', '`', ':', '#', '@', '\'', '=', '"',
    // 0x80-0x8F: Special character and lowercase a-i
    '\u{00D8}', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
    'h', 'i', '\u{00AB}', '\u{00BB}', '\u{00F0}', '\u{00FD}', '\u{00FE}', '\u{00B1}',
    // 0x90-0x9F: Degree symbol and lowercase j-r
    '\u{00B0}', 'j', 'k', 'l', 'm', 'n', 'o', 'p',
    'q', 'r', '\u{00AA}', '\u{00BA}', '\u{00E6}', '\u{00B8}', '\u{00C6}', '\u{00A4}',
    // 0xA0-0xAF: Micro sign and lowercase s-z
    '\u{00B5}', '~', 's', 't', 'u', 'v', 'w', 'x',
    'y', 'z', '\u{00A1}', '\u{00BF}', '\u{00D0}', '\u{00DD}', '\u{00DE}', '\u{00AE}',
    // 0xB0-0xBF: Caret and special characters
    '^', '\u{00A3}', '\u{00A5}', '\u{00B7}', '\u{00A9}', '\u{00A7}', '\u{00B6}', '\u{00BC}',
    '\u{00BD}', '\u{00BE}', '[', ']', '\u{00AF}', '\u{00A8}', '\u{00B4}', '\u{00D7}',
    // 0xC0-0xCF: Left brace and uppercase A-I
    '{', 'A', 'B', 'C', 'D', 'E', 'F', 'G',
    'H', 'I', '\u{00AD}', '\u{00F4}', '\u{00F6}', '\u{00F2}', '\u{00F3}', '\u{00F5}',
    // 0xD0-0xDF: Right brace and uppercase J-R
    '}', 'J', 'K', 'L', 'M', 'N', 'O', 'P',
    'Q', 'R', '\u{00B9}', '\u{00FB}', '\u{00FC}', '\u{00F9}', '\u{00FA}', '\u{00FF}',
    // 0xE0-0xEF: Backslash and uppercase S-Z
    '\\', '\u{00F7}', 'S', 'T', 'U', 'V', 'W', 'X',
    'Y', 'Z', '\u{00B2}', '\u{00D4}', '\u{00D6}', '\u{00D2}', '\u{00D3}', '\u{00D5}',
    // 0xF0-0xFF: Digits 0-9 and special characters
    '0', '1', '2', '3', '4', '5', '6', '7',
    '8', '9', '\u{00B3}', '\u{00DB}', '\u{00DC}', '\u{00D9}', '\u{00DA}', '\u{009F}',
];

/// Decode one EBCDIC byte to a Unicode character.
pub fn ebcdic_to_unicode(byte: u8, code_page: CodePage) -> char {
    match code_page {
        CodePage::Cp037 => CP037_TO_UNICODE[byte as usize],
    }
}

/// Encode a Unicode character to an EBCDIC byte.
///
/// Characters with no mapping in the code page encode as EBCDIC space.
pub fn unicode_to_ebcdic(ch: char, code_page: CodePage) -> u8 {
    let table = match code_page {
        CodePage::Cp037 => &CP037_TO_UNICODE,
    };
    table
        .iter()
        .position(|&c| c == ch)
        .map_or(EBCDIC_SPACE, |i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_digits() {
        assert_eq!(ebcdic_to_unicode(0xC1, CodePage::Cp037), 'A');
        assert_eq!(ebcdic_to_unicode(0x81, CodePage::Cp037), 'a');
        assert_eq!(ebcdic_to_unicode(0xF0, CodePage::Cp037), '0');
        assert_eq!(ebcdic_to_unicode(EBCDIC_SPACE, CodePage::Cp037), ' ');
    }

    #[test]
    fn test_encode_roundtrip() {
        for ch in "Hello, WORLD 0123456789".chars() {
            let byte = unicode_to_ebcdic(ch, CodePage::Cp037);
            assert_eq!(ebcdic_to_unicode(byte, CodePage::Cp037), ch);
        }
    }

    #[test]
    fn test_unmapped_char_encodes_as_space() {
        assert_eq!(unicode_to_ebcdic('\u{30A2}', CodePage::Cp037), EBCDIC_SPACE);
    }
}
