//! Page export.
//!
//! Renders each diagram of a document onto its own fresh surface, one page at
//! a time, and serializes the page as a standalone SVG document. With the
//! `export` feature, pages can also be rasterized to PNG through
//! resvg/tiny-skia. The rasterizer draws text with the face the page surfaces
//! measured with.

use wireframe_core::{flatten, Color, Diagram, DiagramId, EditorState, Vec2};

use crate::control::RenderOptions;
use crate::error::{RenderError, RenderResult};
use crate::metrics::TextMetrics;
use crate::registry::RendererService;
use crate::surface::{NodeKind, Placement, Surface};

/// Configuration for page export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Page size in pixels.
    pub page_size: Vec2,
    /// Page background color.
    pub background: Color,
    /// Offset of the page content group; the default half pixel keeps
    /// one-pixel strokes crisp.
    pub offset: Vec2,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_size: Vec2::new(1000.0, 1000.0),
            background: Color::white(),
            offset: Vec2::new(0.5, 0.5),
        }
    }
}

impl ExportConfig {
    /// Use the editor's canvas size and color.
    #[must_use]
    pub fn from_editor(state: &EditorState) -> Self {
        Self {
            page_size: state.size(),
            background: state.color().clone(),
            ..Self::default()
        }
    }

    /// Replace the page size.
    #[must_use]
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_size = Vec2::new(width, height);
        self
    }

    fn validate(&self) -> RenderResult<()> {
        let Vec2 { x, y } = self.page_size;
        if x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0 {
            Ok(())
        } else {
            Err(RenderError::InvalidPageSize(format!("{x}x{y}")))
        }
    }
}

/// One exported page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPage {
    /// Zero-based page number.
    pub index: usize,
    /// Diagram drawn on this page.
    pub diagram_id: DiagramId,
    /// Diagram title, if any.
    pub title: Option<String>,
    /// Standalone SVG document.
    pub svg: String,
    /// Shapes drawn.
    pub drawn: usize,
    /// Shapes skipped because their renderer is not registered.
    pub skipped_unregistered: usize,
}

/// Renders diagrams to pages.
#[derive(Debug, Clone, Default)]
pub struct PageExporter {
    config: ExportConfig,
    metrics: TextMetrics,
}

impl PageExporter {
    /// Create an exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            metrics: TextMetrics::default(),
        }
    }

    /// Measure and rasterize text with `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Render every diagram as one page, in order.
    ///
    /// Pages are rendered strictly one after another; each page starts from an
    /// empty surface.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidPageSize`] before rendering anything if the
    /// page size is not positive.
    pub fn render_pages<'d, I>(&self, diagrams: I, registry: &RendererService) -> RenderResult<Vec<ExportedPage>>
    where
        I: IntoIterator<Item = &'d Diagram>,
    {
        self.config.validate()?;

        let pages: Vec<ExportedPage> = diagrams
            .into_iter()
            .enumerate()
            .map(|(index, diagram)| self.draw_page(index, diagram, registry))
            .collect();

        tracing::debug!(pages = pages.len(), "Exported pages");
        Ok(pages)
    }

    /// Render a single diagram as page `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidPageSize`] if the page size is not positive.
    pub fn render_page(&self, index: usize, diagram: &Diagram, registry: &RendererService) -> RenderResult<ExportedPage> {
        self.config.validate()?;
        Ok(self.draw_page(index, diagram, registry))
    }

    fn draw_page(&self, index: usize, diagram: &Diagram, registry: &RendererService) -> ExportedPage {
        let size = self.config.page_size;
        let mut surface = Surface::with_metrics(size.x, size.y, self.metrics.clone());
        let root = surface.root();

        let page = surface.create(NodeKind::Group);
        if let Some(node) = surface.node_mut(page) {
            node.set_placement(Placement {
                translate: self.config.offset,
                ..Placement::default()
            });
        }
        surface.append(root, page);

        let mut drawn = 0;
        let mut skipped_unregistered = 0;

        for shape in flatten(diagram) {
            match registry.get(&shape.renderer) {
                Some(control) => {
                    control
                        .set_context(&mut surface, page)
                        .render(&shape, None, RenderOptions::default());
                    drawn += 1;
                }
                None => {
                    tracing::warn!(item = %shape.id, renderer = %shape.renderer, page = index, "Unknown renderer, skipping shape");
                    skipped_unregistered += 1;
                }
            }
        }

        ExportedPage {
            index,
            diagram_id: diagram.id().clone(),
            title: diagram.title().map(ToString::to_string),
            svg: surface.to_svg_document(Some(self.config.background.as_str())),
            drawn,
            skipped_unregistered,
        }
    }

    /// Rasterize a page to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if the SVG cannot be parsed or encoded.
    #[cfg(feature = "export")]
    pub fn to_png(&self, page: &ExportedPage) -> RenderResult<Vec<u8>> {
        rasterize_svg(&page.svg, &self.metrics)?
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }
}

/// Rasterize an SVG string to a tiny-skia Pixmap.
///
/// Text falls back to installed fonts; the measuring face, if any, is loaded
/// too and becomes the default family.
#[cfg(feature = "export")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rasterize_svg(svg_string: &str, metrics: &TextMetrics) -> RenderResult<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    if let Some(font) = metrics.font() {
        opt.fontdb_mut().load_font_data(font.data().to_vec());
        opt.font_family = font.family().to_string();
    }

    let tree = usvg::Tree::from_str(svg_string, &opt)
        .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

    let px_w = tree.size().width().ceil() as u32;
    let px_h = tree.size().height().ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(pixmap)
}
