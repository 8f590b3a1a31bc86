pub mod client;
pub mod config;
pub mod models;
pub mod registry;
pub mod relay;
pub mod responses;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
