pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod ingest;
pub mod render;
pub mod report;
pub mod schema;
pub mod server;
pub mod session;
// cmd and reports are binary modules of main.rs.

pub use error::{ReportError, ReportResult};
pub use session::ReportSession;
