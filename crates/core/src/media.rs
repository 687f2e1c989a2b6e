use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("media path is empty")]
    EmptyPath,
    #[error("unsupported media path: {0}")]
    Unsupported(String),
}

const SCRIPT_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:text"];

/// Whether `url` would run script when loaded or followed. The scheme match
/// ignores case and any embedded whitespace or control characters.
pub fn is_script_url(url: &str) -> bool {
    let head: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    SCRIPT_SCHEMES.iter().any(|scheme| head.starts_with(scheme))
}

/// Turns a stored media path or URL into a fully-qualified asset URL.
/// Bucket layout is the implementor's concern.
pub trait MediaResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Result<String, MediaError>;
}

/// Passes absolute URLs through and joins relative paths onto a base URL.
#[derive(Debug, Clone)]
pub struct BaseUrlMediaResolver {
    base_url: String,
}

impl BaseUrlMediaResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for BaseUrlMediaResolver {
    fn default() -> Self {
        Self::new("/media")
    }
}

impl MediaResolver for BaseUrlMediaResolver {
    fn resolve(&self, path: &str) -> Result<String, MediaError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(MediaError::EmptyPath);
        }
        if is_script_url(path) {
            return Err(MediaError::Unsupported(path.to_string()));
        }
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
            return Ok(path.to_string());
        }
        Ok(format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }
}
