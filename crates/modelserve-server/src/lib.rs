//! modelserve Server
//!
//! HTTP boundary for the prediction dispatcher.
//!
//! Routes:
//! - `POST /predict/:model_name` with `{"features": [...]}`
//! - `GET /models` lists the loaded models
//! - `GET /health`, `GET /metrics`
//! - `GET /` serves a static landing page

pub mod cli;
pub mod config;
pub mod error;
pub mod landing;
pub mod routes;
pub mod state;

pub use cli::Cli;
pub use config::ServerConfig;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
