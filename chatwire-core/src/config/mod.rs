//! Configuration module for chatwire
//!
//! Request defaults can be kept in a YAML or JSON file. `${VAR}` references
//! are replaced with environment variables before parsing, and the parsed
//! defaults are range-checked before they are returned.

mod env;
mod error;
mod schema;

pub use env::interpolate_env_vars;
pub use error::{ConfigError, ConfigResult};
pub use schema::ConversationDefaults;

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::validation::Validate;

/// Load conversation defaults from a YAML file
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> ConfigResult<ConversationDefaults> {
    let path = path.as_ref();
    let interpolated = read_interpolated(path)?;

    let defaults: ConversationDefaults =
        serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: e.to_string(),
        })?;

    defaults.validate()?;
    debug!(path = %path.display(), model = %defaults.model, "loaded conversation defaults");
    Ok(defaults)
}

/// Load conversation defaults from a JSON file
pub fn load_from_json<P: AsRef<Path>>(path: P) -> ConfigResult<ConversationDefaults> {
    let path = path.as_ref();
    let interpolated = read_interpolated(path)?;

    let defaults: ConversationDefaults =
        serde_json::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
            path: path.to_string_lossy().to_string(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: e.to_string(),
        })?;

    defaults.validate()?;
    debug!(path = %path.display(), model = %defaults.model, "loaded conversation defaults");
    Ok(defaults)
}

fn read_interpolated(path: &Path) -> ConfigResult<String> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    interpolate_env_vars(&content)
}
