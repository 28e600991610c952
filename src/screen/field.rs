//! Screen fields
//!
//! The screen buffer is a flat list of fields that together cover every
//! buffer position exactly once. A field is a contiguous run of positions
//! with one kind of content: a one-cell field attribute, a repeated
//! character, or literal text.

use crate::datastream::order::{Colour, FieldAttributes, Highlight};

/// The attribute cell that begins a formatted field. On screen it renders as
/// a blank; its attributes govern every position after it up to the next
/// attribute cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StartOfField {
    pub attributes: FieldAttributes,
    pub colour: Option<Colour>,
    pub highlight: Option<Highlight>,
}

/// What a run of buffer positions holds.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldContent {
    /// A field attribute cell. Always exactly one position wide.
    StartOfField(StartOfField),
    /// Every position in the run holds the same character.
    Chars(char),
    /// One character per position, in order.
    Text(String),
}

/// A contiguous run of buffer positions, `start..=end`, and its content.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub start: usize,
    pub end: usize,
    pub content: FieldContent,
}

impl Field {
    pub fn start_of_field(address: usize, sof: StartOfField) -> Self {
        Self {
            start: address,
            end: address,
            content: FieldContent::StartOfField(sof),
        }
    }

    pub fn chars(start: usize, end: usize, ch: char) -> Self {
        Self {
            start,
            end,
            content: FieldContent::Chars(ch),
        }
    }

    pub fn text(start: usize, text: String) -> Self {
        let end = start + text.chars().count() - 1;
        Self {
            start,
            end,
            content: FieldContent::Text(text),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn contains(&self, address: usize) -> bool {
        self.start <= address && address <= self.end
    }

    /// The character shown at one position of this field.
    pub fn char_at(&self, address: usize) -> char {
        debug_assert!(self.contains(address));
        match &self.content {
            FieldContent::StartOfField(_) => ' ',
            FieldContent::Chars(ch) => *ch,
            FieldContent::Text(text) => text
                .chars()
                .nth(address - self.start)
                .unwrap_or(' '),
        }
    }

    /// The portion of this field falling inside `start..=end`. Both bounds
    /// must lie within the field. A StartOfField is one cell, so slicing it
    /// is always the identity.
    pub fn slice(&self, start: usize, end: usize) -> Self {
        debug_assert!(self.start <= start && end <= self.end && start <= end);
        match &self.content {
            FieldContent::StartOfField(sof) => Self::start_of_field(start, *sof),
            FieldContent::Chars(ch) => Self::chars(start, end, *ch),
            FieldContent::Text(text) => {
                let kept: String = text
                    .chars()
                    .skip(start - self.start)
                    .take(end - start + 1)
                    .collect();
                Self::text(start, kept)
            }
        }
    }

    /// The characters this field contributes to the rendered screen, one per
    /// position. An attribute cell renders as a blank.
    pub fn render(&self) -> String {
        match &self.content {
            FieldContent::StartOfField(_) => " ".to_string(),
            FieldContent::Chars(ch) => std::iter::repeat(*ch).take(self.len()).collect(),
            FieldContent::Text(text) => text.clone(),
        }
    }

    /// Render for field-level assertions and diagnostics:
    /// `StartOfField(n)`, `Chars(c,a-b)` or `Text(run,a-b)`.
    pub fn describe(&self) -> String {
        match &self.content {
            FieldContent::StartOfField(_) => format!("StartOfField({})", self.start),
            FieldContent::Chars(ch) => format!("Chars({},{}-{})", ch, self.start, self.end),
            FieldContent::Text(text) => format!("Text({},{}-{})", text, self.start, self.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_extent() {
        let field = Field::text(5, "Hello".to_string());
        assert_eq!(field.start, 5);
        assert_eq!(field.end, 9);
        assert_eq!(field.len(), 5);
        assert_eq!(field.char_at(6), 'e');
    }

    #[test]
    fn test_slice_text() {
        let field = Field::text(10, "abcdef".to_string());
        let middle = field.slice(12, 14);
        assert_eq!(middle, Field::text(12, "cde".to_string()));
    }

    #[test]
    fn test_slice_chars() {
        let field = Field::chars(0, 79, ' ');
        assert_eq!(field.slice(40, 79), Field::chars(40, 79, ' '));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            Field::text(1, "Hello".to_string()).describe(),
            "Text(Hello,1-5)"
        );
        assert_eq!(Field::chars(7, 9, 'X').describe(), "Chars(X,7-9)");
        assert_eq!(
            Field::start_of_field(0, StartOfField::default()).describe(),
            "StartOfField(0)"
        );
    }
}
