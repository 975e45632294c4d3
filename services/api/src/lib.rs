//! services/api/src/lib.rs
//!
//! Library surface of the bookstore API service, consumed by the `api` and
//! `openapi` binaries and by the test suite.

pub mod adapters;
pub mod config;
pub mod error;
pub mod service;
pub mod web;
