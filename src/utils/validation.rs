//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for plain (unquoted) SQL identifiers
static SQL_IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Validate a SQL identifier that is spliced into query text
pub fn validate_sql_identifier(name: &str) -> bool {
    !name.is_empty() && name.len() <= 63 && SQL_IDENTIFIER_REGEX.is_match(name)
}

/// Validate a webhook URL (absolute http or https)
pub fn validate_webhook_url(url: &str) -> bool {
    match reqwest::Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}
