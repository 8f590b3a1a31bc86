pub mod client;
pub mod errors;
#[cfg(test)]
pub mod mock_identity;
pub mod service;
