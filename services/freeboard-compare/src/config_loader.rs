//! YAML configuration loading.
//!
//! Supports environment variable substitution using ${VAR} syntax:
//!
//! ```yaml
//! paths:
//!   mesh_file: ${SEAICE_DATA:-/data}/mesh_files/mpassi.IcoswISC30E3r5.20231120.nc
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::PipelineConfig;

/// Load, expand, parse and validate a pipeline configuration file.
pub fn load_pipeline_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read pipeline config from {:?}", path.as_ref()))?;

    let mut config = parse_pipeline_config(&content)
        .with_context(|| format!("Failed to parse pipeline config from {:?}", path.as_ref()))?;

    config.apply_env_overrides()?;
    config.validate()?;

    Ok(config)
}

/// Parse configuration text after environment substitution.
pub fn parse_pipeline_config(content: &str) -> Result<PipelineConfig> {
    let expanded = expand_env_vars(content)?;
    let config: PipelineConfig =
        serde_yaml::from_str(&expanded).context("Invalid pipeline config YAML")?;
    Ok(config)
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in YAML content
/// Supports ${VAR} and ${VAR:-default} syntax
pub fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_expr = String::new();
            let mut depth = 1;

            while depth > 0 {
                match chars.next() {
                    Some('{') => {
                        depth += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        depth -= 1;
                        if depth > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            result.push_str(&resolve_var_expr(&var_expr)?);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    match expr.split_once(":-") {
        Some((name, default)) => match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        },
        None => std::env::var(expr.trim())
            .with_context(|| format!("Environment variable {} not set", expr)),
    }
}
