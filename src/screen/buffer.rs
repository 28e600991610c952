//! The screen buffer state machine
//!
//! A [`Screen`] holds the sorted field list and replays decoded order
//! batches against it. The partition invariant is the heart of the model:
//! at every observable instant the field list covers `[0, screen_size - 1]`
//! exactly once, sorted by start, with no gaps and no overlaps. Every public
//! mutation either preserves it or fails without touching the live state.

use log::{debug, trace};

use crate::config::SessionConfig;
use crate::datastream::order::{Colour, Highlight, Order};
use crate::error::{TN3270Error, TN3270Result};
use crate::screen::field::{Field, FieldContent, StartOfField};

/// The mutable terminal document: a partition of the linear buffer address
/// space into fields, plus the cursor.
#[derive(Debug, Clone)]
pub struct Screen {
    rows: usize,
    columns: usize,
    fields: Vec<Field>,
    /// The externally visible cursor, moved only by Insert Cursor orders.
    cursor: usize,
}

impl Screen {
    /// A new screen is a single blank Chars field covering every position.
    pub fn new(rows: usize, columns: usize) -> Self {
        let mut screen = Self {
            rows,
            columns,
            fields: Vec::new(),
            cursor: 0,
        };
        screen.erase();
        screen
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.rows, config.columns)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of buffer positions.
    pub fn screen_size(&self) -> usize {
        self.rows * self.columns
    }

    /// The visible cursor as a linear buffer address.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The visible cursor as (row, column), both 0-based.
    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor / self.columns, self.cursor % self.columns)
    }

    /// The current field list, sorted by start.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Reset to one full-screen blank field. The screen object survives; a
    /// session erases on Erase Write rather than rebuilding.
    pub fn erase(&mut self) {
        self.fields = vec![Field::chars(0, self.screen_size() - 1, ' ')];
        self.cursor = 0;
    }

    /// Replay one decoded order batch.
    ///
    /// Orders apply to a scratch copy which replaces the live state only if
    /// every order succeeds, so a failed batch never leaves the screen
    /// half-updated.
    pub fn process_orders(&mut self, orders: &[Order]) -> TN3270Result<()> {
        let mut scratch = self.clone();
        scratch.apply_orders(orders)?;
        scratch.coalesce();
        debug!(
            "applied {} orders, {} fields, cursor {}",
            orders.len(),
            scratch.fields.len(),
            scratch.cursor
        );
        *self = scratch;
        Ok(())
    }

    fn apply_orders(&mut self, orders: &[Order]) -> TN3270Result<()> {
        let size = self.screen_size();
        let mut working: usize = 0;
        for order in orders {
            trace!("applying {order:?} at {working}");
            match order {
                Order::SetBufferAddress(address) => {
                    working = self.checked_address(*address as usize)?;
                }
                Order::StartField(attributes) => {
                    self.checked_address(working)?;
                    self.insert_field(Field::start_of_field(
                        working,
                        StartOfField {
                            attributes: *attributes,
                            colour: None,
                            highlight: None,
                        },
                    ));
                    working += 1;
                }
                Order::StartFieldExtended {
                    attributes,
                    colour,
                    highlight,
                } => {
                    self.checked_address(working)?;
                    self.insert_field(Field::start_of_field(
                        working,
                        StartOfField {
                            attributes: *attributes,
                            colour: *colour,
                            highlight: *highlight,
                        },
                    ));
                    working += 1;
                }
                Order::Text(run) => {
                    let len = run.chars().count();
                    self.checked_address(working + len - 1)?;
                    self.insert_field(Field::text(working, run.clone()));
                    working += len;
                }
                Order::RepeatToAddress { address, ch } => {
                    let target = *address as usize;
                    if target <= working {
                        return Err(TN3270Error::UnsupportedOrder {
                            order: "RA",
                            reason: format!(
                                "wrap-around repeat, stop address {target} is at or before \
                                 the working cursor {working}"
                            ),
                        });
                    }
                    // The stop address is exclusive, so it may equal the
                    // screen size but the filled cells must all be in range.
                    if target > size {
                        return Err(TN3270Error::AddressOutOfRange {
                            address: target,
                            screen_size: size,
                        });
                    }
                    self.insert_field(Field::chars(working, target - 1, *ch));
                    working = target;
                }
                Order::InsertCursor => {
                    self.cursor = working;
                }
                Order::EraseUnprotectedToAddress(_) => {
                    return Err(TN3270Error::UnsupportedOrder {
                        order: "EUA",
                        reason: "selective erase is not implemented by this engine".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn checked_address(&self, address: usize) -> TN3270Result<usize> {
        if address < self.screen_size() {
            Ok(address)
        } else {
            Err(TN3270Error::AddressOutOfRange {
                address,
                screen_size: self.screen_size(),
            })
        }
    }

    /// Insert a field, splitting whatever it overlaps so the partition
    /// invariant holds afterwards. The caller guarantees the new field lies
    /// within the buffer.
    fn insert_field(&mut self, new_field: Field) {
        let (new_start, new_end) = (new_field.start, new_field.end);
        let mut rebuilt = Vec::with_capacity(self.fields.len() + 2);
        let mut pending = Some(new_field);
        for field in self.fields.drain(..) {
            if field.end < new_start {
                rebuilt.push(field);
                continue;
            }
            if field.start > new_end {
                if let Some(nf) = pending.take() {
                    rebuilt.push(nf);
                }
                rebuilt.push(field);
                continue;
            }
            // Overlap: keep whatever sticks out on either side.
            if field.start < new_start {
                rebuilt.push(field.slice(field.start, new_start - 1));
            }
            if let Some(nf) = pending.take() {
                rebuilt.push(nf);
            }
            if field.end > new_end {
                rebuilt.push(field.slice(new_end + 1, field.end));
            }
        }
        if let Some(nf) = pending {
            rebuilt.push(nf);
        }
        self.fields = rebuilt;
    }

    /// Merge adjacent Chars/Text fields. Same-character Chars pairs stay
    /// Chars; any other Chars/Text pairing becomes a Text concatenation.
    /// After a merge the scan stays put so the merged field is re-checked
    /// against its new neighbour.
    fn coalesce(&mut self) {
        let mut i = 0;
        while i + 1 < self.fields.len() {
            let mergeable = matches!(
                (&self.fields[i].content, &self.fields[i + 1].content),
                (
                    FieldContent::Chars(_) | FieldContent::Text(_),
                    FieldContent::Chars(_) | FieldContent::Text(_),
                )
            );
            if !mergeable {
                i += 1;
                continue;
            }
            let right = self.fields.remove(i + 1);
            let left = &mut self.fields[i];
            match (&left.content, &right.content) {
                (FieldContent::Chars(a), FieldContent::Chars(b)) if a == b => {
                    left.end = right.end;
                }
                _ => {
                    let mut text = left.render();
                    text.push_str(&right.render());
                    left.end = right.end;
                    left.content = FieldContent::Text(text);
                }
            }
        }
    }

    /// The field covering a buffer position.
    pub fn field_at(&self, address: usize) -> Option<&Field> {
        if address >= self.screen_size() {
            return None;
        }
        // Partition invariant: the last field starting at or before the
        // address covers it.
        let idx = self.fields.partition_point(|f| f.start <= address);
        self.fields.get(idx.wrapping_sub(1))
    }

    /// The nearest start-of-field marker at or before a position. Positions
    /// before the first marker have no governing attributes.
    fn governing_start_of_field(&self, address: usize) -> Option<&StartOfField> {
        self.fields.iter().rev().find_map(|field| {
            if field.start > address {
                return None;
            }
            match &field.content {
                FieldContent::StartOfField(sof) => Some(sof),
                _ => None,
            }
        })
    }

    /// Colour at a position, from the governing start-of-field. A field
    /// begun with a plain (non-extended) Start Field has no colour.
    pub fn colour_at(&self, address: usize) -> Option<Colour> {
        if address >= self.screen_size() {
            return None;
        }
        self.governing_start_of_field(address)?.colour
    }

    /// Highlighting at a position, from the governing start-of-field.
    pub fn highlight_at(&self, address: usize) -> Option<Highlight> {
        if address >= self.screen_size() {
            return None;
        }
        self.governing_start_of_field(address)?.highlight
    }

    /// Whether a position accepts typed input: not an attribute cell, and
    /// its governing start-of-field (if any) is unprotected. A screen with
    /// no fields at all is unformatted and fully typeable.
    pub fn is_typeable(&self, address: usize) -> bool {
        let Some(field) = self.field_at(address) else {
            return false;
        };
        if matches!(field.content, FieldContent::StartOfField(_)) {
            return false;
        }
        match self.governing_start_of_field(address) {
            Some(sof) => !sof.attributes.protected,
            None => true,
        }
    }

    /// The character rendered at a position.
    pub fn char_at(&self, address: usize) -> Option<char> {
        self.field_at(address).map(|field| field.char_at(address))
    }

    /// Render the whole buffer as `rows` lines of `columns` characters.
    pub fn print_screen(&self) -> String {
        let flat: String = self.fields.iter().map(Field::render).collect();
        let chars: Vec<char> = flat.chars().collect();
        chars
            .chunks(self.columns)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One line per field, the primary assertion surface for tests and
    /// diagnostics.
    pub fn print_fields(&self) -> String {
        self.fields
            .iter()
            .map(Field::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[cfg(test)]
    pub(crate) fn assert_partition_invariant(&self) {
        assert!(!self.fields.is_empty(), "field list must never be empty");
        assert_eq!(self.fields[0].start, 0);
        assert_eq!(self.fields[self.fields.len() - 1].end, self.screen_size() - 1);
        for pair in self.fields.windows(2) {
            assert_eq!(
                pair[0].end + 1,
                pair[1].start,
                "gap or overlap between {} and {}",
                pair[0].describe(),
                pair[1].describe()
            );
        }
    }
}
