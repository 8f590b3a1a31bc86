pub mod claims;
pub mod login;
pub mod logout;
pub mod session;

pub use login::{handle_login, handle_me};
pub use logout::handle_logout;

/// Cookie carrying the identity provider's access token.
pub const SESSION_COOKIE: &str = "auth_token";
