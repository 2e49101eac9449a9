//! Where the todo service lives.

/// Base resource URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/todos";

/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "TODO_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `TODO_API_BASE_URL`, falling back to the default when it is
    /// unset or blank.
    pub fn from_env() -> Self {
        Self::from_var(std::env::var(BASE_URL_ENV).ok())
    }

    /// `from_env` without touching the process environment.
    pub fn from_var(value: Option<String>) -> Self {
        match value {
            Some(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
