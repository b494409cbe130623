//! Descriptors of editable shape properties.
//!
//! Rendering never reads these; they tell a property panel which appearance
//! keys a shape exposes and how to edit them.

use serde::{Deserialize, Serialize};

/// An editable property of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Configurable {
    /// Pick one of a fixed list of options.
    Selection {
        /// Appearance key.
        name: String,
        /// Display label.
        label: String,
        /// Allowed values.
        options: Vec<String>,
    },
    /// Numeric value chosen with a slider.
    Slider {
        /// Appearance key.
        name: String,
        /// Display label.
        label: String,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// Numeric value typed in a field.
    Number {
        /// Appearance key.
        name: String,
        /// Display label.
        label: String,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// Color value.
    Color {
        /// Appearance key.
        name: String,
        /// Display label.
        label: String,
    },
    /// Free text.
    Text {
        /// Appearance key.
        name: String,
        /// Display label.
        label: String,
    },
    /// On/off switch.
    Toggle {
        /// Appearance key.
        name: String,
        /// Display label.
        label: String,
    },
}

impl Configurable {
    /// The appearance key this property edits.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Selection { name, .. }
            | Self::Slider { name, .. }
            | Self::Number { name, .. }
            | Self::Color { name, .. }
            | Self::Text { name, .. }
            | Self::Toggle { name, .. } => name,
        }
    }

    /// The display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Selection { label, .. }
            | Self::Slider { label, .. }
            | Self::Number { label, .. }
            | Self::Color { label, .. }
            | Self::Text { label, .. }
            | Self::Toggle { label, .. } => label,
        }
    }

    /// Whether `value` is acceptable for this property.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        match self {
            Self::Selection { options, .. } => value
                .as_str()
                .is_some_and(|v| options.iter().any(|o| o == v)),
            Self::Slider { min, max, .. } | Self::Number { min, max, .. } => value
                .as_f64()
                .is_some_and(|v| (*min..=*max).contains(&(v as f32))),
            Self::Color { .. } => value
                .as_str()
                .is_some_and(|v| wireframe_core::Color::parse(v).is_ok()),
            Self::Text { .. } => value.is_string(),
            Self::Toggle { .. } => value.is_boolean(),
        }
    }
}

/// Builds [`Configurable`] descriptors for shape plugins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurableFactory;

impl ConfigurableFactory {
    /// See [`Configurable::Selection`].
    #[must_use]
    pub fn selection(&self, name: &str, label: &str, options: &[&str]) -> Configurable {
        Configurable::Selection {
            name: name.to_string(),
            label: label.to_string(),
            options: options.iter().map(ToString::to_string).collect(),
        }
    }

    /// See [`Configurable::Slider`].
    #[must_use]
    pub fn slider(&self, name: &str, label: &str, min: f32, max: f32) -> Configurable {
        Configurable::Slider {
            name: name.to_string(),
            label: label.to_string(),
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// See [`Configurable::Number`].
    #[must_use]
    pub fn number(&self, name: &str, label: &str, min: f32, max: f32) -> Configurable {
        Configurable::Number {
            name: name.to_string(),
            label: label.to_string(),
            min: min.min(max),
            max: max.max(min),
        }
    }

    /// See [`Configurable::Color`].
    #[must_use]
    pub fn color(&self, name: &str, label: &str) -> Configurable {
        Configurable::Color {
            name: name.to_string(),
            label: label.to_string(),
        }
    }

    /// See [`Configurable::Text`].
    #[must_use]
    pub fn text(&self, name: &str, label: &str) -> Configurable {
        Configurable::Text {
            name: name.to_string(),
            label: label.to_string(),
        }
    }

    /// See [`Configurable::Toggle`].
    #[must_use]
    pub fn toggle(&self, name: &str, label: &str) -> Configurable {
        Configurable::Toggle {
            name: name.to_string(),
            label: label.to_string(),
        }
    }
}
