//! X12 terminator definitions
//!
//! The interchange header carries the repetition separator in ISA11 and the
//! component separator in ISA16; the element separator is implied by ISA
//! position 4 and the segment terminator follows ISA16.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default X12 terminators
pub const DEFAULT_SEGMENT_TERMINATOR: char = '~';
pub const DEFAULT_ELEMENT_SEPARATOR: char = '*';
pub const DEFAULT_SUBELEMENT_SEPARATOR: char = ':';
pub const DEFAULT_REPETITION_SEPARATOR: char = '^';
pub const DEFAULT_LINE_END: &str = "\n";

/// Terminators used when serializing segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Terminators {
    /// Segment terminator (default '~')
    pub segment: char,
    /// Data element separator (default '*')
    pub element: char,
    /// Component element separator (default ':')
    pub subelement: char,
    /// Repetition separator (default '^')
    pub repetition: char,
    /// Written after each segment terminator (default "\n")
    pub line_end: String,
}

impl Default for Terminators {
    fn default() -> Self {
        Self {
            segment: DEFAULT_SEGMENT_TERMINATOR,
            element: DEFAULT_ELEMENT_SEPARATOR,
            subelement: DEFAULT_SUBELEMENT_SEPARATOR,
            repetition: DEFAULT_REPETITION_SEPARATOR,
            line_end: DEFAULT_LINE_END.to_string(),
        }
    }
}

impl Terminators {
    /// Check that the four delimiters are distinct and usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] when two delimiters collide or one of them is
    /// alphanumeric or whitespace.
    pub fn validate(&self) -> Result<()> {
        let delimiters = [
            ("segment", self.segment),
            ("element", self.element),
            ("subelement", self.subelement),
            ("repetition", self.repetition),
        ];

        for (i, (name, ch)) in delimiters.iter().enumerate() {
            if ch.is_alphanumeric() || ch.is_whitespace() {
                return Err(Error::Syntax(format!(
                    "{name} terminator {ch:?} must not be alphanumeric or whitespace"
                )));
            }
            if let Some((other, _)) = delimiters[i + 1..].iter().find(|(_, c)| c == ch) {
                return Err(Error::Syntax(format!(
                    "{name} and {other} terminators are both {ch:?}"
                )));
            }
        }

        if !self.line_end.chars().all(|c| c == '\r' || c == '\n') {
            return Err(Error::Syntax(format!(
                "line end {:?} may only contain CR and LF",
                self.line_end
            )));
        }

        Ok(())
    }

    /// Check if a character is a delimiter (cannot appear in element data)
    pub fn is_special(&self, ch: char) -> bool {
        ch == self.segment || ch == self.element || ch == self.subelement || ch == self.repetition
    }
}
