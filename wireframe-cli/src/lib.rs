//! # Wireframe CLI
//!
//! Exports every diagram of a Wireframe JSON document as one page file.
//!
//! ## Usage
//!
//! ```bash
//! wireframe document.json --out-dir pages
//! ```
//!
//! ## With edits applied first:
//!
//! ```bash
//! wireframe document.json --actions edits.json --width 800 --height 600
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved export settings
//! - `render_document` - Applies edits and renders pages in memory
//! - `run` - Reads the input and writes one file per page

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use wireframe_core::{Action, EditorState};
use wireframe_renderer::{
    register_default_shapes, ExportConfig, ExportedPage, PageExporter, RendererService, TextMetrics,
};

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Standalone SVG documents.
    #[default]
    Svg,
    /// PNG images (requires the `png` feature).
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Command-line arguments for wireframe.
#[derive(Debug, Clone, Parser)]
#[command(name = "wireframe")]
#[command(about = "Export Wireframe diagrams as pages")]
#[command(version)]
pub struct CliArgs {
    /// Editor document in JSON
    pub input: PathBuf,

    /// JSON array of edit actions applied before export
    #[arg(long)]
    pub actions: Option<PathBuf>,

    /// Page width in pixels (default: document canvas width)
    #[arg(long, env = "WIREFRAME_PAGE_WIDTH")]
    pub width: Option<f32>,

    /// Page height in pixels (default: document canvas height)
    #[arg(long, env = "WIREFRAME_PAGE_HEIGHT")]
    pub height: Option<f32>,

    /// Directory the pages are written to
    #[arg(long, env = "WIREFRAME_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
    pub format: OutputFormat,

    /// Font family list used to measure and draw text
    #[arg(long, env = "WIREFRAME_FONT", default_value = "sans-serif")]
    pub font: String,
}

/// Resolved export settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Editor document.
    pub input: PathBuf,
    /// Optional action log.
    pub actions: Option<PathBuf>,
    /// Page width override.
    pub width: Option<f32>,
    /// Page height override.
    pub height: Option<f32>,
    /// Output directory.
    pub out_dir: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Font family list for text.
    pub font: String,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            input: args.input,
            actions: args.actions,
            width: args.width,
            height: args.height,
            out_dir: args.out_dir,
            format: args.format,
            font: args.font,
        }
    }
}

impl CliConfig {
    /// Page export settings for `state`, honoring size overrides.
    #[must_use]
    pub fn export_config(&self, state: &EditorState) -> ExportConfig {
        let canvas = state.size();
        ExportConfig::from_editor(state).with_page_size(
            self.width.unwrap_or(canvas.x),
            self.height.unwrap_or(canvas.y),
        )
    }

    /// Text metrics for the configured font, or approximate metrics if no
    /// installed face matches.
    #[must_use]
    pub fn text_metrics(&self) -> TextMetrics {
        match TextMetrics::system(&self.font) {
            Some(metrics) => {
                if let Some(font) = metrics.font() {
                    tracing::info!(family = font.family(), "Measuring text with installed font");
                }
                metrics
            }
            None => {
                tracing::warn!(font = %self.font, "No installed font found, using approximate text metrics");
                TextMetrics::default()
            }
        }
    }
}

/// A rendered page ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    /// File name, e.g. `page-1.svg`.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Registry with every built-in shape.
#[must_use]
pub fn default_registry() -> RendererService {
    let mut registry = RendererService::new();
    register_default_shapes(&mut registry);
    registry
}

/// Apply `actions` to `state` in order.
///
/// # Errors
///
/// Returns an error naming the first action that fails.
pub fn apply_actions(
    state: EditorState,
    actions: &[Action],
    registry: &RendererService,
) -> anyhow::Result<EditorState> {
    actions
        .iter()
        .enumerate()
        .try_fold(state, |state, (i, action)| {
            state
                .apply(action, registry)
                .with_context(|| format!("action #{i} ({}) failed", action.kind()))
        })
}

/// Render every diagram of `state` as one output file, measuring text with
/// `metrics`.
///
/// # Errors
///
/// Returns an error if the page size is invalid or the format is unavailable.
pub fn render_document(
    state: &EditorState,
    config: &CliConfig,
    registry: &RendererService,
    metrics: TextMetrics,
) -> anyhow::Result<Vec<OutputFile>> {
    let exporter = PageExporter::new(config.export_config(state)).with_metrics(metrics);
    let pages = exporter.render_pages(state.ordered_diagrams(), registry)?;

    pages
        .into_iter()
        .map(|page| -> anyhow::Result<OutputFile> {
            if page.skipped_unregistered > 0 {
                tracing::warn!(
                    page = page.index + 1,
                    skipped = page.skipped_unregistered,
                    "Page has shapes with unknown renderers"
                );
            }

            let name = format!("page-{}.{}", page.index + 1, config.format.extension());
            let bytes = match config.format {
                OutputFormat::Svg => page.svg.into_bytes(),
                OutputFormat::Png => encode_png(&exporter, &page)?,
            };
            Ok(OutputFile { name, bytes })
        })
        .collect()
}

#[cfg(feature = "png")]
fn encode_png(exporter: &PageExporter, page: &ExportedPage) -> anyhow::Result<Vec<u8>> {
    Ok(exporter.to_png(page)?)
}

#[cfg(not(feature = "png"))]
fn encode_png(_exporter: &PageExporter, _page: &ExportedPage) -> anyhow::Result<Vec<u8>> {
    anyhow::bail!("PNG output requires the `png` feature")
}

/// Read the input, render it and write one file per page into `out_dir`.
///
/// # Errors
///
/// Returns an error if reading, parsing, rendering or writing fails.
pub fn run(config: &CliConfig) -> anyhow::Result<Vec<PathBuf>> {
    let json = fs::read_to_string(&config.input)
        .with_context(|| format!("failed to read {}", config.input.display()))?;
    let state = EditorState::from_json(&json)
        .with_context(|| format!("failed to parse {}", config.input.display()))?;

    let registry = default_registry();

    let state = match &config.actions {
        Some(path) => {
            let actions = read_actions(path)?;
            tracing::info!(count = actions.len(), "Applying actions");
            apply_actions(state, &actions, &registry)?
        }
        None => state,
    };

    let files = render_document(&state, config, &registry, config.text_metrics())?;

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed to create {}", config.out_dir.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = config.out_dir.join(&file.name);
        fs::write(&path, &file.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn read_actions(path: &Path) -> anyhow::Result<Vec<Action>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("failed to parse {}", path.display()))
}
