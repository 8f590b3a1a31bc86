pub mod identity;
pub mod webhook_forwarder;
