//! oracle-client - query controller, presentation surfaces and the HTTP
//! client for the Oracle Bíblico analysis service.
//!
//! A [`QueryController`] takes a question, calls an [`AnalysisBackend`],
//! renders the response with `oracle-render` and shows the outcome on the
//! [`PresentationContext`] it was given.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod client;
pub mod controller;
pub mod error;
pub mod narration;
pub mod page;
pub mod presentation;

pub use client::{AnalysisBackend, AnalyzeRequest, ClientConfig, HealthResponse, OracleClient};
pub use controller::QueryController;
pub use error::QueryError;
pub use narration::{create_narrator, Narrator, SpeechNarrator, TranscriptNarrator};
pub use page::{render_page, PageOptions, PageState};
pub use presentation::{
    CaptureSurface, ConsoleStatus, DisplaySurface, HtmlPageSurface, OutputFormat,
    PresentationContext, RecordingStatus, Status, StatusChannel, StreamSurface, SurfaceState,
    TracingStatus,
};
