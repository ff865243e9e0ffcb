use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{required_text, Record};
use crate::AppError;

/// Derive the banner key from its display name.
///
/// Lowercases, drops everything except ASCII letters, digits, whitespace and
/// `_`, then joins the remaining words with `_`. Names that differ only in case
/// or punctuation map to the same key, which is what makes them duplicates.
/// Applying it to a derived key returns the key unchanged.
pub fn derive_banner_key(name: &str) -> Result<String, AppError> {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();
    let key = cleaned
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if key.is_empty() {
        return Err(AppError::InvalidInput(
            "Banner name must contain at least one letter or digit".to_string(),
        ));
    }
    Ok(key)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Banner {
    /// Derived from `name` by [`derive_banner_key`]
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub image_storage_path: String,
    pub active: bool,
    pub file_name: String,
    pub content_type: String,
    pub file_size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Banner {
    const KIND: &'static str = "Banner";

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BannerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl BannerInput {
    /// Validated display name and derived key.
    pub fn name_and_key(&self) -> Result<(String, String), AppError> {
        let name = required_text("Banner name", &self.name)?;
        let key = derive_banner_key(&name)?;
        Ok((name, key))
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BannerUpdate {
    #[serde(default)]
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_and_case_collapse_to_same_key() {
        assert_eq!(derive_banner_key("Q1 Promo!").unwrap(), "q1_promo");
        assert_eq!(derive_banner_key("q1 promo").unwrap(), "q1_promo");
    }

    #[test]
    fn test_underscore_is_a_word_separator() {
        assert_eq!(derive_banner_key("a_b").unwrap(), "a_b");
        assert_eq!(derive_banner_key("A b").unwrap(), "a_b");
        assert_eq!(derive_banner_key("a__b_").unwrap(), "a_b");
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let once = derive_banner_key("  Summer   Sale 2024 ").unwrap();
        assert_eq!(once, "summer_sale_2024");
        assert_eq!(derive_banner_key(&once).unwrap(), once);
    }

    #[test]
    fn test_symbol_only_name_rejected() {
        assert!(derive_banner_key("!!!").is_err());
        assert!(derive_banner_key("__").is_err());
        assert!(BannerInput::default().name_and_key().is_err());
    }
}
