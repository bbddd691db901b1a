pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod upload;

pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
