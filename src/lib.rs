//! Edge authentication gate for the investment portal.
//!
//! Every request is classified against a public allow-list; protected requests
//! go through the token gate, which validates the access-token cookie against
//! the remote auth API, refreshes it once when needed, and otherwise redirects
//! to the login page.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
