pub mod config;
pub mod credentials;
pub mod http_client;
pub mod validators;
