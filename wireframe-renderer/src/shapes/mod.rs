//! Built-in shape plugins.

mod button;
mod icon;
mod label;
mod rectangle;

pub use button::Button;
pub use icon::Icon;
pub use label::Label;
pub use rectangle::Rectangle;

use wireframe_core::appearance::keys;
use wireframe_core::Rect2;

use crate::constraint::DEFAULT_FONT_SIZE;
use crate::plugin::RenderContext;
use crate::registry::RendererService;
use crate::surface::TextAlignment;

/// Default font family for built-in shapes.
pub const DEFAULT_FONT_FAMILY: &str = "inherit";

/// Register every built-in shape.
pub fn register_default_shapes(registry: &mut RendererService) -> &mut RendererService {
    registry
        .add(Rectangle)
        .add(Button)
        .add(Label)
        .add(Icon)
}

/// Draw the shape's `TEXT` inside `bounds` using its font and color keys.
/// Empty text draws nothing.
fn draw_text(ctx: &mut RenderContext<'_>, bounds: Rect2) {
    let content = ctx.str_value(keys::TEXT, "").to_string();
    if content.is_empty() {
        return;
    }

    let font_size = ctx.f32_value(keys::FONT_SIZE, DEFAULT_FONT_SIZE);
    let font_family = ctx.str_value(keys::FONT_FAMILY, DEFAULT_FONT_FAMILY).to_string();
    let alignment = TextAlignment::parse(ctx.str_value(keys::TEXT_ALIGNMENT, "center"));
    let color = ctx.color_value(keys::FOREGROUND_COLOR, "#000000");

    ctx.text(bounds, &content, font_size, &font_family, alignment)
        .fill(&color);
}
