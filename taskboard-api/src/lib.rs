//! # Taskboard API Server Library
//!
//! Core of the taskboard server: a JSON API for users, categories and
//! tasks, and the HTML pages built on top of it.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Extractors that reject with `ApiError`
//! - `middleware`: Security headers
//! - `routes`: JSON route handlers
//! - `views`: Server-rendered pages

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod views;
