//! Presentation context: where results, errors and status phrases go.
//!
//! The controller owns one [`PresentationContext`]; nothing here is global.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use console::style;
use oracle_render::ViewModel;
use serde::Serialize;

use crate::narration::Narrator;
use crate::page::{render_page, PageOptions, PageState};

// ============================================================================
// Status
// ============================================================================

/// Progress of the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Processing,
    Done,
    Failed,
}

impl Status {
    /// Short phrase shown to the user.
    pub fn phrase(self) -> &'static str {
        match self {
            Status::Processing => "Processando análise...",
            Status::Done => "Análise concluída",
            Status::Failed => "Erro na análise",
        }
    }
}

/// Receives status phrases.
pub trait StatusChannel: Send {
    fn set_status(&mut self, status: Status);
}

/// Styled status line on stderr.
#[derive(Debug, Default)]
pub struct ConsoleStatus;

impl StatusChannel for ConsoleStatus {
    fn set_status(&mut self, status: Status) {
        let line = match status {
            Status::Processing => style(format!("◉ {}", status.phrase())).cyan(),
            Status::Done => style(format!("✔ {}", status.phrase())).green(),
            Status::Failed => style(format!("✘ {}", status.phrase())).red(),
        };
        let _ = console::Term::stderr().write_line(&line.to_string());
    }
}

/// Status phrases as log events.
#[derive(Debug, Default)]
pub struct TracingStatus;

impl StatusChannel for TracingStatus {
    fn set_status(&mut self, status: Status) {
        tracing::info!(status = ?status, "{}", status.phrase());
    }
}

/// Keeps every status it receives, for inspection by the owner.
#[derive(Debug, Clone, Default)]
pub struct RecordingStatus {
    history: Arc<Mutex<Vec<Status>>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Status> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Status> {
        self.history().last().copied()
    }
}

impl StatusChannel for RecordingStatus {
    fn set_status(&mut self, status: Status) {
        if let Ok(mut history) = self.history.lock() {
            history.push(status);
        }
    }
}

// ============================================================================
// Display surfaces
// ============================================================================

/// Owner of a results container and an error container.
///
/// Showing one hides the other. Error messages arrive already escaped.
pub trait DisplaySurface: Send {
    /// Empty the results container before a new query.
    fn clear(&mut self) -> std::io::Result<()>;

    fn show_results(&mut self, view: &ViewModel) -> std::io::Result<()>;

    fn show_error(&mut self, escaped_message: &str) -> std::io::Result<()>;
}

/// Output encoding for stream surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text for terminals
    #[default]
    Text,
    /// Results-container markup
    Html,
    /// Serialized view model
    Json,
}

/// Writes results to a stream (usually stdout), errors to stderr.
pub struct StreamSurface<W: Write + Send> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write + Send> StreamSurface<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl StreamSurface<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(std::io::stdout(), format)
    }
}

impl<W: Write + Send> DisplaySurface for StreamSurface<W> {
    fn clear(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn show_results(&mut self, view: &ViewModel) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => write!(self.writer, "{}", view.to_plain_text())?,
            OutputFormat::Html => writeln!(self.writer, "{}", view.to_html())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.writer, view)?;
                writeln!(self.writer)?;
            }
        }
        self.writer.flush()
    }

    fn show_error(&mut self, escaped_message: &str) -> std::io::Result<()> {
        let message = oracle_render::html_to_text(escaped_message);
        match self.format {
            OutputFormat::Json => {
                let body = serde_json::json!({ "error": message });
                serde_json::to_writer_pretty(&mut self.writer, &body)?;
                writeln!(self.writer)?;
                self.writer.flush()
            }
            OutputFormat::Text | OutputFormat::Html => console::Term::stderr()
                .write_line(&format!("{} {}", style("ERRO:").red().bold(), message)),
        }
    }
}

/// Rewrites a standalone HTML page on every update.
pub struct HtmlPageSurface {
    path: PathBuf,
    options: PageOptions,
}

impl HtmlPageSurface {
    pub fn new(path: impl Into<PathBuf>, options: PageOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn write(&self, state: PageState<'_>) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, render_page(state, &self.options))?;
        tracing::debug!(path = %self.path.display(), "Page written");
        Ok(())
    }
}

impl DisplaySurface for HtmlPageSurface {
    fn clear(&mut self) -> std::io::Result<()> {
        self.write(PageState::Empty)
    }

    fn show_results(&mut self, view: &ViewModel) -> std::io::Result<()> {
        self.write(PageState::Results(view))
    }

    fn show_error(&mut self, escaped_message: &str) -> std::io::Result<()> {
        self.write(PageState::Error(escaped_message))
    }
}

/// Snapshot of an in-memory surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceState {
    pub results_html: String,
    pub error_html: String,
    pub results_visible: bool,
    pub error_visible: bool,
    /// Last view shown, if any.
    pub view: Option<ViewModel>,
}

/// In-memory surface; clones share the same containers.
#[derive(Debug, Clone, Default)]
pub struct CaptureSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl CaptureSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfaceState {
        self.state.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut SurfaceState)) -> std::io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| std::io::Error::other("surface lock poisoned"))?;
        f(&mut state);
        Ok(())
    }
}

impl DisplaySurface for CaptureSurface {
    fn clear(&mut self) -> std::io::Result<()> {
        self.update(|s| {
            s.results_html.clear();
            s.view = None;
        })
    }

    fn show_results(&mut self, view: &ViewModel) -> std::io::Result<()> {
        self.update(|s| {
            s.results_html = view.to_html();
            s.view = Some(view.clone());
            s.results_visible = true;
            s.error_visible = false;
        })
    }

    fn show_error(&mut self, escaped_message: &str) -> std::io::Result<()> {
        self.update(|s| {
            s.error_html = format!("<strong>ERRO:</strong> {escaped_message}");
            s.error_visible = true;
            s.results_visible = false;
        })
    }
}

// ============================================================================
// Context
// ============================================================================

/// Everything the controller writes to, injected by the caller.
pub struct PresentationContext {
    pub surface: Box<dyn DisplaySurface>,
    pub status: Box<dyn StatusChannel>,
    pub narrator: Option<Arc<dyn Narrator>>,
}

impl PresentationContext {
    pub fn new(surface: impl DisplaySurface + 'static, status: impl StatusChannel + 'static) -> Self {
        Self {
            surface: Box::new(surface),
            status: Box::new(status),
            narrator: None,
        }
    }

    pub fn with_narrator(mut self, narrator: Arc<dyn Narrator>) -> Self {
        self.narrator = Some(narrator);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_render::render;
    use serde_json::json;

    fn sample_view() -> ViewModel {
        render(&json!({
            "layers": [{"historical_layer": {"cultural_background": "Ancient Near East"}}]
        }))
    }

    #[test]
    fn capture_surface_toggles_visibility() {
        let mut surface = CaptureSurface::new();
        let handle = surface.clone();

        surface.show_error("boom &amp; bust").unwrap();
        let state = handle.snapshot();
        assert!(state.error_visible);
        assert!(!state.results_visible);
        assert_eq!(state.error_html, "<strong>ERRO:</strong> boom &amp; bust");

        surface.show_results(&sample_view()).unwrap();
        let state = handle.snapshot();
        assert!(state.results_visible);
        assert!(!state.error_visible);
        assert!(state.results_html.contains("Análise Histórica"));

        surface.clear().unwrap();
        assert!(handle.snapshot().results_html.is_empty());
    }

    #[test]
    fn stream_surface_text() {
        let mut surface = StreamSurface::new(Vec::new(), OutputFormat::Text);
        surface.show_results(&sample_view()).unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(
            out,
            format!("Análise Histórica\n{}\nCultural Background: Ancient Near East\n", "─".repeat(17))
        );
    }

    #[test]
    fn stream_surface_json() {
        let mut surface = StreamSurface::new(Vec::new(), OutputFormat::Json);
        surface.show_results(&sample_view()).unwrap();
        let out: serde_json::Value = serde_json::from_slice(&surface.into_inner()).unwrap();
        assert_eq!(out["sections"][0]["kind"], "layer");
        assert_eq!(out["sections"][0]["title"], "Análise Histórica");
    }

    #[test]
    fn stream_surface_json_error() {
        let mut surface = StreamSurface::new(Vec::new(), OutputFormat::Json);
        surface.show_error("a &lt; b").unwrap();
        let out: serde_json::Value = serde_json::from_slice(&surface.into_inner()).unwrap();
        assert_eq!(out["error"], "a < b");
    }

    #[test]
    fn html_page_surface_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("oracle.html");
        let mut surface = HtmlPageSurface::new(&path, PageOptions::default());

        surface.show_results(&sample_view()).unwrap();
        let page = std::fs::read_to_string(&path).unwrap();
        assert!(page.contains("Cultural Background"));
        assert!(page.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn recording_status_keeps_history() {
        let mut status = RecordingStatus::new();
        let handle = status.clone();
        status.set_status(Status::Processing);
        status.set_status(Status::Failed);
        assert_eq!(handle.history(), vec![Status::Processing, Status::Failed]);
        assert_eq!(handle.last(), Some(Status::Failed));
    }

    #[test]
    fn status_phrases() {
        assert_eq!(Status::Processing.phrase(), "Processando análise...");
        assert_eq!(Status::Done.phrase(), "Análise concluída");
        assert_eq!(Status::Failed.phrase(), "Erro na análise");
    }
}
