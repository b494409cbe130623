use std::sync::Arc;

use serde_json::json;
use wireframe_core::appearance::keys;
use wireframe_core::{Appearance, Vec2};

use super::{draw_text, DEFAULT_FONT_FAMILY};
use crate::configurable::{Configurable, ConfigurableFactory};
use crate::constraint::{Constraint, ConstraintFactory};
use crate::plugin::{RenderContext, ShapePlugin};

const PADDING: f32 = 4.0;
const LINE_HEIGHT: f32 = 1.2;

/// Free text without a frame, sized to its content.
#[derive(Debug, Clone, Copy, Default)]
pub struct Label;

impl ShapePlugin for Label {
    fn identifier(&self) -> &str {
        "Label"
    }

    fn default_appearance(&self) -> Appearance {
        Appearance::from([
            (keys::FOREGROUND_COLOR.to_string(), json!("#000000")),
            (keys::TEXT.to_string(), json!("Label")),
            (keys::TEXT_ALIGNMENT.to_string(), json!("left")),
            (keys::FONT_SIZE.to_string(), json!(14)),
            (keys::FONT_FAMILY.to_string(), json!(DEFAULT_FONT_FAMILY)),
        ])
    }

    fn default_size(&self) -> Vec2 {
        Vec2::new(46.0, 30.0)
    }

    fn constraint(&self, factory: &ConstraintFactory) -> Option<Arc<dyn Constraint>> {
        Some(factory.text_size(PADDING, PADDING, LINE_HEIGHT, true, 0.0))
    }

    fn configurables(&self, factory: &ConfigurableFactory) -> Vec<Configurable> {
        vec![
            factory.color(keys::FOREGROUND_COLOR, "Text Color"),
            factory.text(keys::TEXT, "Text"),
            factory.number(keys::FONT_SIZE, "Font Size", 6.0, 72.0),
            factory.selection(keys::TEXT_ALIGNMENT, "Alignment", &["left", "center", "right"]),
        ]
    }

    fn render(&self, ctx: &mut RenderContext<'_>) {
        let rect = ctx.rect();
        draw_text(ctx, rect.deflate(PADDING, PADDING));
    }
}
