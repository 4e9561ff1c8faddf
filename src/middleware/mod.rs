/*
 * Responsibility
 * - Public interface of the middleware layers (re-export)
 * - auth::gate::apply(...), http::apply(...)
 */
pub mod auth;
pub mod http;
