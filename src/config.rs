//! Session configuration
//!
//! Carries the knobs a caller sets before negotiating: which terminal types
//! to offer the host, the screen geometry, and the EBCDIC code page. The
//! struct serializes with serde so automation harnesses can keep terminal
//! profiles as JSON.

use serde::{Deserialize, Serialize};

use crate::ebcdic::CodePage;

/// Configuration for one terminal session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Terminal types this client is willing to be assigned. The first entry
    /// is sent in the DEVICE-TYPE REQUEST; the host's reply must match one of
    /// them or negotiation fails.
    pub terminal_types: Vec<String>,

    /// Screen rows. Model 2 is 24.
    pub rows: usize,

    /// Screen columns. Model 2 is 80.
    pub columns: usize,

    /// EBCDIC code page for display text.
    pub code_page: CodePage,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            terminal_types: vec!["IBM-3278-2-E".to_string(), "IBM-3278-2".to_string()],
            rows: 24,
            columns: 80,
            code_page: CodePage::Cp037,
        }
    }
}

impl SessionConfig {
    /// Load a configuration from a JSON document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Total number of buffer positions.
    pub fn screen_size(&self) -> usize {
        self.rows * self.columns
    }
}
