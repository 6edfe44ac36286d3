//! serveiq-dashboard: browser dashboard for the Serve IQ query service.
//!
//! Each page load mounts a [`session::Dashboard`], which fetches the latest
//! records once from `GET /api/data` and renders them as a three-column grid
//! of tiles with a detail modal per record.

pub mod client;
pub mod error;
pub mod render;
pub mod server;
pub mod session;
pub mod view;

pub use client::{ApiClient, RecordSource};
pub use error::ClientError;
pub use render::Renderer;
pub use session::{ClickTarget, Dashboard, LoadState};
