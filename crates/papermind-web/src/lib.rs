pub mod dto;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use server::{app_config, run_server_with_config, WebConfig};
pub use state::AppState;
