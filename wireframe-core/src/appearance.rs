//! Style values attached to shapes.
//!
//! A shape's appearance is an open map from key to JSON value. Which keys are
//! meaningful for a shape is decided by its renderer plugin's default
//! appearance, looked up through [`AppearanceLookup`].

use std::collections::BTreeMap;

/// Style values keyed by appearance key.
pub type Appearance = BTreeMap<String, serde_json::Value>;

/// Well-known appearance keys understood by the built-in shapes.
pub mod keys {
    /// Fill color of the shape body.
    pub const BACKGROUND_COLOR: &str = "BACKGROUND_COLOR";
    /// Text and icon color.
    pub const FOREGROUND_COLOR: &str = "FOREGROUND_COLOR";
    /// Border color.
    pub const STROKE_COLOR: &str = "STROKE_COLOR";
    /// Border width in pixels.
    pub const STROKE_THICKNESS: &str = "STROKE_THICKNESS";
    /// Text content.
    pub const TEXT: &str = "TEXT";
    /// Horizontal text alignment: `left`, `center` or `right`.
    pub const TEXT_ALIGNMENT: &str = "TEXT_ALIGNMENT";
    /// Font size in pixels.
    pub const FONT_SIZE: &str = "FONT_SIZE";
    /// Font family name.
    pub const FONT_FAMILY: &str = "FONT_FAMILY";
    /// Icon glyph name.
    pub const ICON: &str = "ICON";
}

/// Resolves the default appearance declared for a renderer.
///
/// The returned map's key set is the authoritative list of style keys the
/// renderer understands.
pub trait AppearanceLookup {
    /// Default appearance of `renderer`, or `None` if it is not registered.
    fn default_appearance(&self, renderer: &str) -> Option<Appearance>;
}

impl<F> AppearanceLookup for F
where
    F: Fn(&str) -> Option<Appearance>,
{
    fn default_appearance(&self, renderer: &str) -> Option<Appearance> {
        self(renderer)
    }
}
