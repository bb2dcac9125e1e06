//! Payroll Generation Engine
//!
//! This crate computes attendance-based payroll for a pay cycle and exposes
//! the results through an HTTP API: preview and generation of payroll
//! records, cycle lifecycle management, manual adjustments, payments, CSV
//! export, and a token-authenticated user API.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
