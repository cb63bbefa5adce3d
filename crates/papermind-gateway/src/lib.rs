pub mod handlers;
pub mod server;
pub mod state;

pub use server::{app_config, run_server_with_config, GatewayConfig};
pub use state::AppState;
