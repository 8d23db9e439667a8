pub mod analytics;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod locations;
pub mod mailer;
pub mod patch;
pub mod state;
pub mod users;
pub mod validation;

pub use app::build_app;
pub use error::{AppError, AppResult};
pub use state::AppState;
