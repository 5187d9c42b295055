/// Middleware modules for the API server
///
/// - Security headers on every response

pub mod security;
