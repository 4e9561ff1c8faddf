pub mod api_client;
pub mod auth;
pub mod token;
