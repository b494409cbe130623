use std::sync::Arc;

use serde_json::json;
use wireframe_core::appearance::keys;
use wireframe_core::{Appearance, Vec2};

use crate::configurable::{Configurable, ConfigurableFactory};
use crate::constraint::{Constraint, ConstraintFactory};
use crate::plugin::{RenderContext, ShapePlugin};
use crate::surface::TextAlignment;

const ICON_FONT: &str = "FontAwesome";

/// Single glyph from an icon font, always square.
#[derive(Debug, Clone, Copy, Default)]
pub struct Icon;

impl ShapePlugin for Icon {
    fn identifier(&self) -> &str {
        "Icon"
    }

    fn default_appearance(&self) -> Appearance {
        Appearance::from([
            (keys::FOREGROUND_COLOR.to_string(), json!("#333333")),
            (keys::ICON.to_string(), json!("\u{f005}")),
            (keys::FONT_FAMILY.to_string(), json!(ICON_FONT)),
        ])
    }

    fn default_size(&self) -> Vec2 {
        Vec2::new(40.0, 40.0)
    }

    fn constraint(&self, factory: &ConstraintFactory) -> Option<Arc<dyn Constraint>> {
        Some(factory.min_size())
    }

    fn configurables(&self, factory: &ConfigurableFactory) -> Vec<Configurable> {
        vec![
            factory.color(keys::FOREGROUND_COLOR, "Color"),
            factory.text(keys::ICON, "Icon"),
        ]
    }

    fn render(&self, ctx: &mut RenderContext<'_>) {
        let rect = ctx.rect();
        let glyph = ctx.str_value(keys::ICON, "").to_string();
        if glyph.is_empty() {
            return;
        }

        let color = ctx.color_value(keys::FOREGROUND_COLOR, "#333333");
        let family = ctx.str_value(keys::FONT_FAMILY, ICON_FONT).to_string();
        let font_size = rect.width.min(rect.height);

        ctx.text(rect, &glyph, font_size, &family, TextAlignment::Center)
            .fill(&color);
    }
}
