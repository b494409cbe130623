use std::sync::Arc;

use serde_json::json;
use wireframe_core::appearance::keys;
use wireframe_core::{Appearance, Vec2};

use super::{draw_text, DEFAULT_FONT_FAMILY};
use crate::configurable::{Configurable, ConfigurableFactory};
use crate::constraint::{Constraint, ConstraintFactory};
use crate::plugin::{RenderContext, ShapePlugin};

const CORNER_RADIUS: f32 = 4.0;
const TEXT_PADDING: f32 = 8.0;

/// Rounded push button whose height follows its font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct Button;

impl ShapePlugin for Button {
    fn identifier(&self) -> &str {
        "Button"
    }

    fn default_appearance(&self) -> Appearance {
        Appearance::from([
            (keys::BACKGROUND_COLOR.to_string(), json!("#f0f0f0")),
            (keys::FOREGROUND_COLOR.to_string(), json!("#000000")),
            (keys::STROKE_COLOR.to_string(), json!("#333333")),
            (keys::STROKE_THICKNESS.to_string(), json!(1)),
            (keys::TEXT.to_string(), json!("Button")),
            (keys::TEXT_ALIGNMENT.to_string(), json!("center")),
            (keys::FONT_SIZE.to_string(), json!(14)),
            (keys::FONT_FAMILY.to_string(), json!(DEFAULT_FONT_FAMILY)),
        ])
    }

    fn default_size(&self) -> Vec2 {
        Vec2::new(100.0, 30.0)
    }

    fn constraint(&self, factory: &ConstraintFactory) -> Option<Arc<dyn Constraint>> {
        Some(factory.text_height(TEXT_PADDING))
    }

    fn configurables(&self, factory: &ConfigurableFactory) -> Vec<Configurable> {
        vec![
            factory.color(keys::BACKGROUND_COLOR, "Background"),
            factory.color(keys::FOREGROUND_COLOR, "Text Color"),
            factory.text(keys::TEXT, "Text"),
            factory.number(keys::FONT_SIZE, "Font Size", 6.0, 72.0),
        ]
    }

    fn render(&self, ctx: &mut RenderContext<'_>) {
        let rect = ctx.rect();
        let fill = ctx.color_value(keys::BACKGROUND_COLOR, "#f0f0f0");
        let stroke = ctx.color_value(keys::STROKE_COLOR, "#333333");
        let thickness = ctx.f32_value(keys::STROKE_THICKNESS, 1.0);

        ctx.rectangle(rect, CORNER_RADIUS)
            .fill(&fill)
            .stroke(&stroke, thickness);

        draw_text(ctx, rect.deflate(TEXT_PADDING, 0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Control;
    use crate::surface::Surface;

    #[test]
    fn test_default_shape_height_follows_font() {
        let shape = Control::new(Button)
            .create_default_shape(&Surface::new(100.0, 100.0))
            .into_shape("b", Vec2::new(50.0, 50.0));

        // 14 * 1.2 + 2 * 8, floored
        assert_eq!(shape.transform.size(), Vec2::new(100.0, 32.0));
    }
}
