pub mod errors;
pub mod service;

pub use errors::RelayError;
