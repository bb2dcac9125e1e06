//! Payroll template loading and management.
//!
//! This module provides functionality to load named payroll rule templates
//! from YAML files so that payroll runs can reference a template by name
//! instead of embedding a full rule set in every request.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::TemplateLoader;
//!
//! let templates = TemplateLoader::load("./config/templates").unwrap();
//! let rules = templates.get("standard").unwrap();
//! println!("Loaded template: {}", rules.name);
//! ```

mod loader;

pub use loader::TemplateLoader;
