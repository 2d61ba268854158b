// src/utils/config.rs
use crate::utils::error::AppError;

/// Characters of context kept on each side of a match when building its snippet.
pub const DEFAULT_SNIPPET_RADIUS: usize = 60;

const SNIPPET_RADIUS_ENV: &str = "SNIPPET_RADIUS";

/// Tunables for pointer resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    pub snippet_radius: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { snippet_radius: DEFAULT_SNIPPET_RADIUS }
    }
}

impl ResolverConfig {
    /// Reads `SNIPPET_RADIUS` from the environment, falling back to the default.
    pub fn from_env() -> Self {
        let raw = std::env::var(SNIPPET_RADIUS_ENV).ok();
        Self::from_env_value(raw.as_deref())
    }

    fn from_env_value(raw: Option<&str>) -> Self {
        match raw {
            None => Self::default(),
            Some(value) => match value.trim().parse::<usize>() {
                Ok(snippet_radius) => {
                    tracing::debug!("Using {}={} from environment", SNIPPET_RADIUS_ENV, snippet_radius);
                    Self { snippet_radius }
                }
                Err(e) => {
                    tracing::warn!(
                        "Ignoring invalid {}='{}' ({}), using default {}",
                        SNIPPET_RADIUS_ENV, value, e, DEFAULT_SNIPPET_RADIUS
                    );
                    Self::default()
                }
            },
        }
    }

    /// Applies a command-line override on top of the environment-derived value.
    pub fn with_snippet_radius(mut self, radius: Option<usize>) -> Self {
        if let Some(radius) = radius {
            self.snippet_radius = radius;
        }
        self
    }
}

/// Parses the JSON pointer payload, which must be an array of strings.
pub fn parse_pointers_json(payload: &str) -> Result<Vec<String>, AppError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| AppError::Config(format!("Invalid pointers JSON: {}", e)))?;

    let items = value.as_array().ok_or_else(|| {
        AppError::Config("Invalid pointers JSON: pointers must be a JSON array of strings".to_string())
    })?;

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                AppError::Config(format!(
                    "Invalid pointers JSON: expected a string, found {}",
                    item
                ))
            })
        })
        .collect()
}

/// Combines repeated `--pointer` flags with an optional JSON payload, flags first.
pub fn collect_pointers(flags: &[String], json: Option<&str>) -> Result<Vec<String>, AppError> {
    let mut pointers = flags.to_vec();
    if let Some(payload) = json {
        pointers.extend(parse_pointers_json(payload)?);
    }
    Ok(pointers)
}
