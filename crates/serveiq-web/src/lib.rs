//! serveiq-web: Query Service for the Serve IQ dashboard.
//! Read-only JSON API over stored inference results:
//!   - `GET /api/data`        latest 20 records, newest first
//!   - `GET /api/data/count`  number of stored records
//!   - `GET /api/data/{id}`   single record
//!   - `GET /health`          startup handshake state

pub mod router;
pub mod handlers;
pub mod state;
