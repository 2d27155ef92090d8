/*
 * Responsibility
 * - public surface of the middleware layer
 * - auth (access gate) + cross-cutting HTTP layers
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
