//! Template loading functionality.
//!
//! This module provides the [`TemplateLoader`] type for loading payroll
//! rule templates from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::RuleSet;

/// Loads and provides access to named payroll templates.
///
/// The `TemplateLoader` reads every `*.yaml` file in a directory and
/// indexes the resulting rule sets by their `name` field (falling back to
/// the file stem when the field is empty).
///
/// # Directory Structure
///
/// ```text
/// config/templates/
/// ├── standard.yaml       # Default monthly rules
/// └── factory-floor.yaml  # Overtime-heavy hourly workforce
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::TemplateLoader;
///
/// let loader = TemplateLoader::load("./config/templates").unwrap();
/// let rules = loader.get("standard").unwrap();
/// println!("Payment day: {}", rules.payment_day);
/// ```
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    templates: HashMap<String, RuleSet>,
}

impl TemplateLoader {
    /// Loads every template from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the templates directory (e.g., "./config/templates")
    ///
    /// # Returns
    ///
    /// Returns a `TemplateLoader` on success, or an error if:
    /// - The directory does not exist
    /// - Any YAML file in it fails to parse
    ///
    /// An empty directory loads successfully; runs then either embed
    /// inline rules or fall back to the built-in defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        if !path.exists() {
            return Err(EngineError::ConfigNotFound { path: path_str });
        }

        let entries = fs::read_dir(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let mut templates = HashMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: path_str.clone(),
            })?;

            let file_path = entry.path();
            if !file_path.extension().is_some_and(|ext| ext == "yaml") {
                continue;
            }

            let mut rules = Self::load_yaml(&file_path)?;
            if rules.name.is_empty() {
                if let Some(stem) = file_path.file_stem().and_then(|s| s.to_str()) {
                    rules.name = stem.to_string();
                }
            }
            templates.insert(rules.name.clone(), rules);
        }

        Ok(Self { templates })
    }

    /// Builds a loader directly from rule sets, without touching the
    /// filesystem. Intended for tests.
    pub fn from_templates(rule_sets: impl IntoIterator<Item = RuleSet>) -> Self {
        let templates = rule_sets
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect();
        Self { templates }
    }

    /// Loads and parses a single template file.
    fn load_yaml(path: &Path) -> EngineResult<RuleSet> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Gets a template by name.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::TemplateLoader;
    ///
    /// let loader = TemplateLoader::load("./config/templates")?;
    /// let rules = loader.get("standard")?;
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn get(&self, name: &str) -> EngineResult<&RuleSet> {
        self.templates
            .get(name)
            .ok_or_else(|| EngineError::TemplateNotFound {
                name: name.to_string(),
            })
    }

    /// Lists the loaded templates, sorted by name.
    pub fn list(&self) -> Vec<&RuleSet> {
        let mut templates: Vec<&RuleSet> = self.templates.values().collect();
        templates.sort_by(|a, b| a.name.cmp(&b.name));
        templates
    }

    /// Returns the number of loaded templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true when no templates are loaded.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
