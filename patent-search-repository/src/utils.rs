//! Utility functions for the patent search repository.

use crate::errors::ProvisioningError;

/// Characters OpenSearch refuses in index names.
const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#', ' ', ':'];

/// Maximum index name length in bytes.
const MAX_INDEX_NAME_BYTES: usize = 255;

/// Validate an index name against the cluster's naming rules.
///
/// Runs before any request is issued, so an invalid name never reaches the
/// delete step of a provisioning run.
///
/// # Example
///
/// ```
/// use patent_search_repository::validate_index_name;
///
/// assert!(validate_index_name("patents").is_ok());
/// assert!(validate_index_name("Patents").is_err());
/// ```
pub fn validate_index_name(name: &str) -> Result<(), ProvisioningError> {
    if name.is_empty() {
        return Err(ProvisioningError::validation("index name must not be empty"));
    }

    if name == "." || name == ".." {
        return Err(ProvisioningError::validation(format!(
            "index name '{}' is reserved",
            name
        )));
    }

    if name.len() > MAX_INDEX_NAME_BYTES {
        return Err(ProvisioningError::validation(format!(
            "index name is longer than {} bytes",
            MAX_INDEX_NAME_BYTES
        )));
    }

    if name.starts_with(['-', '_', '+']) {
        return Err(ProvisioningError::validation(format!(
            "index name '{}' must not start with '-', '_' or '+'",
            name
        )));
    }

    if name.chars().any(|c| c.is_uppercase()) {
        return Err(ProvisioningError::validation(format!(
            "index name '{}' must be lowercase",
            name
        )));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_INDEX_CHARS.contains(c)) {
        return Err(ProvisioningError::validation(format!(
            "index name '{}' contains invalid character '{}'",
            name, c
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_index_names() {
        for name in ["patents", "papers", "patents-v2", "patents_2024", ".hidden", "a"] {
            assert!(validate_index_name(name).is_ok(), "expected '{}' to be valid", name);
        }
    }

    #[test]
    fn test_invalid_index_names() {
        let test_cases = vec![
            ("", "empty"),
            (".", "dot"),
            ("..", "double dot"),
            ("Patents", "uppercase"),
            ("-patents", "leading dash"),
            ("_patents", "leading underscore"),
            ("+patents", "leading plus"),
            ("pat ents", "space"),
            ("pat/ents", "slash"),
            ("pat\\ents", "backslash"),
            ("pat*ents", "star"),
            ("pat?ents", "question mark"),
            ("pat\"ents", "quote"),
            ("pat<ents", "less than"),
            ("pat>ents", "greater than"),
            ("pat|ents", "pipe"),
            ("pat,ents", "comma"),
            ("pat#ents", "hash"),
            ("pat:ents", "colon"),
        ];

        for (name, description) in test_cases {
            let result = validate_index_name(name);
            assert!(
                matches!(result, Err(ProvisioningError::ValidationError(_))),
                "Expected ValidationError for '{}' ({})",
                name,
                description
            );
        }
    }

    #[test]
    fn test_index_name_too_long() {
        let name = "a".repeat(256);
        assert!(validate_index_name(&name).is_err());
        assert!(validate_index_name(&"a".repeat(255)).is_ok());
    }
}
