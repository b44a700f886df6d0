//! Greenbasket server library.
//!
//! A mock grocery-delivery backend: JSON-file-backed catalog, bearer-token
//! auth, and a cart-to-order flow, all speaking the uniform
//! `{success, message?, data?, count?, error?}` envelope.
//!
//! The binary in `main.rs` wires this up with file storage, CORS, tracing,
//! and rate limiting; integration tests drive [`routes::router`] directly
//! over an in-memory store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
