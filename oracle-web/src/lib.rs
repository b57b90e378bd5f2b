//! oracle-web - single-page presentation server for Oracle Bíblico.
//!
//! Serves the query page and proxies `POST /api/view` through a
//! [`QueryController`](oracle_client::QueryController), returning the
//! rendered sections instead of the raw analysis response.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod error;
pub mod routes;

pub use error::WebError;
pub use routes::{build_router, AppState, ViewRequest, ViewResponse};
