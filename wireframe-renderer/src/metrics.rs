//! Text measurement.
//!
//! [`TextMetrics`] measures with the horizontal glyph advances of a real font
//! face when one is loaded. The same face is handed to the rasterizer, so
//! measured and drawn text agree. Without a face, widths come from
//! per-character advance ratios, which keeps layout deterministic on machines
//! without fonts.

use std::fmt;
use std::sync::Arc;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use ttf_parser::Face;

/// Advance of an average glyph as a fraction of the font size, used when no
/// face is loaded or a glyph is missing.
const FALLBACK_WIDTH_RATIO: f32 = 0.56;

/// Default line height as a multiple of the font size.
const DEFAULT_LINE_HEIGHT_RATIO: f32 = 1.2;

/// Measured size of a block of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSize {
    /// Width of the widest line.
    pub width: f32,
    /// Height of all lines.
    pub height: f32,
}

/// A parsed font face with its raw data.
pub struct FontFace {
    family: String,
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl FontFace {
    /// Load the first installed face matching a CSS-style family list such as
    /// `"Inter, sans-serif"`.
    #[must_use]
    pub fn system(families: &str) -> Option<Self> {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), families, "Loaded system fonts");

        let names: Vec<&str> = families
            .split(',')
            .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|part| !part.is_empty())
            .collect();
        let mut query: Vec<Family<'_>> = names.iter().map(|name| generic_family(name)).collect();
        if query.is_empty() {
            query.push(Family::SansSerif);
        }

        let id = db.query(&Query {
            families: &query,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })?;
        let family = db.face(id)?.families.first()?.0.clone();

        db.with_face_data(id, |data, index| Self::parse(family, data.to_vec(), index))
            .flatten()
    }

    /// Load the first face in a font file.
    #[must_use]
    pub fn from_data(data: Vec<u8>) -> Option<Self> {
        let mut db = Database::new();
        db.load_font_data(data);

        let info = db.faces().next()?;
        let family = info.families.first()?.0.clone();
        db.with_face_data(info.id, |data, index| Self::parse(family, data.to_vec(), index))
            .flatten()
    }

    fn parse(family: String, data: Vec<u8>, index: u32) -> Option<Self> {
        let (units_per_em, ascii_advances) = {
            let face = Face::parse(&data, index).ok()?;
            let mut advances = [0u16; 128];
            for (byte, advance) in (0u8..128).zip(advances.iter_mut()) {
                if let Some(glyph) = face.glyph_index(char::from(byte)) {
                    *advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                }
            }
            (face.units_per_em().max(1), advances)
        };

        Some(Self {
            family,
            data: Arc::new(data),
            index,
            units_per_em,
            ascii_advances,
        })
    }

    /// Family name of the face.
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font file data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    fn line_width(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / f32::from(self.units_per_em);
        let fallback = font_size * FALLBACK_WIDTH_RATIO;
        let face = if text.is_ascii() {
            None
        } else {
            Face::parse(self.data.as_slice(), self.index).ok()
        };

        let advance = |c: char| -> Option<u16> {
            match u8::try_from(c) {
                Ok(byte) if byte.is_ascii() => Some(self.ascii_advances[usize::from(byte)]),
                _ => {
                    let face = face.as_ref()?;
                    face.glyph_hor_advance(face.glyph_index(c)?)
                }
            }
        };

        text.chars()
            .map(|c| {
                advance(c)
                    .filter(|units| *units > 0)
                    .map_or(fallback, |units| f32::from(units) * scale)
            })
            .sum()
    }
}

fn generic_family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => Family::Serif,
        "sans-serif" | "system-ui" | "inherit" => Family::SansSerif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        _ => Family::Name(name),
    }
}

/// Text measurement shared by constraints, the surface and export.
#[derive(Debug, Clone)]
pub struct TextMetrics {
    font: Option<Arc<FontFace>>,
    line_height_ratio: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            font: None,
            line_height_ratio: DEFAULT_LINE_HEIGHT_RATIO,
        }
    }
}

impl TextMetrics {
    /// Metrics measuring with `font`.
    #[must_use]
    pub fn with_font(font: FontFace) -> Self {
        Self {
            font: Some(Arc::new(font)),
            ..Self::default()
        }
    }

    /// Metrics measuring with the installed face matching `families`.
    #[must_use]
    pub fn system(families: &str) -> Option<Self> {
        FontFace::system(families).map(Self::with_font)
    }

    /// The measuring face, if any.
    #[must_use]
    pub fn font(&self) -> Option<&FontFace> {
        self.font.as_deref()
    }

    /// Line height for a font size.
    #[must_use]
    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_ratio
    }

    /// Width of a single line, or `None` if `font_size` is not a positive number.
    #[must_use]
    pub fn measure_width(&self, text: &str, font_size: f32) -> Option<f32> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return None;
        }

        let width = match &self.font {
            Some(font) => font.line_width(text, font_size),
            None => text.chars().map(approximate_advance).sum::<f32>() * font_size,
        };
        Some(width.max(0.0))
    }

    /// Size of a possibly multi-line block of text.
    ///
    /// `line_height` is a multiple of the font size; non-positive values use
    /// the default ratio. Returns `None` when measurement is impossible.
    #[must_use]
    pub fn measure(&self, text: &str, font_size: f32, line_height: f32) -> Option<TextSize> {
        let ratio = if line_height.is_finite() && line_height > 0.0 {
            line_height
        } else {
            self.line_height_ratio
        };

        let mut width = 0.0f32;
        let mut lines = 0usize;
        for line in text.lines() {
            width = width.max(self.measure_width(line, font_size)?);
            lines += 1;
        }
        if lines == 0 {
            self.measure_width("", font_size)?;
            lines = 1;
        }

        #[allow(clippy::cast_precision_loss)]
        let height = lines as f32 * font_size * ratio;
        Some(TextSize { width, height })
    }
}

fn approximate_advance(c: char) -> f32 {
    let base = FALLBACK_WIDTH_RATIO;
    match c {
        'i' | 'j' | 'l' | '!' | '|' | '.' | ',' | ':' | ';' | '\'' => base * 0.5,
        ' ' | 'f' | 'r' | 't' | '(' | ')' | '[' | ']' => base * 0.65,
        'm' | 'w' | 'M' | 'W' | '@' => base * 1.6,
        c if c.is_uppercase() => base * 1.2,
        c if !c.is_ascii() => base * 1.8,
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_font_size_fails() {
        let metrics = TextMetrics::default();
        assert!(metrics.measure_width("abc", 0.0).is_none());
        assert!(metrics.measure("abc", f32::NAN, 1.2).is_none());
        assert!(metrics.measure("", -4.0, 1.2).is_none());
    }

    #[test]
    fn test_wide_glyphs_are_wider() {
        let metrics = TextMetrics::default();
        let narrow = metrics.measure_width("iiii", 10.0).expect("width");
        let wide = metrics.measure_width("mmmm", 10.0).expect("width");
        assert!(wide > narrow);
    }

    #[test]
    fn test_multiline_uses_widest_line() {
        let metrics = TextMetrics::default();
        let size = metrics.measure("ab\nabcd", 10.0, 1.5).expect("size");
        let widest = metrics.measure_width("abcd", 10.0).expect("width");

        assert!((size.width - widest).abs() < f32::EPSILON);
        assert!((size.height - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let size = TextMetrics::default().measure("", 10.0, 1.0).expect("size");
        assert!(size.width.abs() < f32::EPSILON);
        assert!((size.height - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_data_that_is_not_a_font_is_rejected() {
        assert!(FontFace::from_data(b"not a font".to_vec()).is_none());
    }

    #[test]
    fn test_font_face_measures_glyph_advances() {
        // Machines without installed fonts only exercise the fallback above.
        let Some(metrics) = TextMetrics::system("sans-serif") else {
            return;
        };
        let font = metrics.font().expect("font");
        assert!(!font.family().is_empty());

        let a = metrics.measure_width("a", 20.0).expect("width");
        let b = metrics.measure_width("b", 20.0).expect("width");
        let ab = metrics.measure_width("ab", 20.0).expect("width");
        assert!(a > 0.0);
        assert!((ab - (a + b)).abs() < 1e-3);

        let double = metrics.measure_width("a", 40.0).expect("width");
        assert!((double - 2.0 * a).abs() < 1e-3);

        let reloaded = FontFace::from_data(font.data().to_vec()).expect("reload");
        assert_eq!(reloaded.family(), font.family());
    }
}
