//! Dona Oferta Server - library crate.
//!
//! Exposes the server's modules so the CLI (and integration tooling) can
//! reuse the configuration, repositories and domain models. The binary in
//! `main.rs` wires these together into the running service.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
