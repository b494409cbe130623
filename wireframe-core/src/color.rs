//! Hex colors for the canvas background.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{DiagramError, DiagramResult};

/// An opaque RGB color, normalized to lowercase `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse `#rgb` or `#rrggbb`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::InvalidColor`] for anything else.
    pub fn parse(value: &str) -> DiagramResult<Self> {
        let invalid = || DiagramError::InvalidColor(value.to_string());

        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let normalized = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };

        Ok(Self(format!("#{}", normalized.to_ascii_lowercase())))
    }

    /// White.
    #[must_use]
    pub fn white() -> Self {
        Self("#ffffff".to_string())
    }

    /// The normalized `#rrggbb` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = DiagramError;

    fn try_from(value: String) -> DiagramResult<Self> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}
