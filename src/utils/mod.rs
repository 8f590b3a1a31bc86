pub mod jwt;
pub mod logging;
pub mod redact;
