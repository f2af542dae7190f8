//! Aria HTTP server: the `/ask`, `/feedback` and `/health` endpoints.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
