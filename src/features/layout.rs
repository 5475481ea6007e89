//! Feature layout - centralized feature schema definition
//!
//! The column set and order here is the whole input contract of the
//! classifier. Both the trainer and the serving path read from this table;
//! the scaler artifact carries a stamp of it so a stale artifact is caught
//! at load time instead of silently misaligning columns.
//!
//! Rules:
//! 1. Add a feature -> increment `FEATURE_VERSION`
//! 2. Change order -> increment `FEATURE_VERSION`
//! 3. Remove a feature -> increment `FEATURE_VERSION`

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

/// Current feature layout version.
pub const FEATURE_VERSION: u8 = 1;

/// Feature names in the exact order they appear in the vector.
///
/// This is the single source of truth for the feature layout. Columns that
/// cannot be derived from the URL string alone (page structure, WHOIS,
/// reputation) are emitted as constants by the extractor but keep their
/// column so the classifier input stays fixed-width.
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Length & composition ===
    "length_url",
    "length_hostname",
    "ip",
    "nb_dots",
    "nb_hyphens",
    "nb_at",
    "nb_qm",
    "nb_and",
    "nb_or",
    "nb_eq",
    "nb_underscore",
    "nb_tilde",
    "nb_percent",
    "nb_slash",
    "nb_star",
    "nb_colon",
    "nb_comma",
    "nb_semicolumn",
    "nb_dollar",
    "nb_space",
    // === Structural flags ===
    "nb_www",
    "nb_com",
    "nb_dslash",
    "http_in_path",
    "https_token",
    // === Ratios ===
    "ratio_digits_url",
    "ratio_digits_host",
    // === Host shape ===
    "punycode",
    "port",
    "tld_in_path",
    "tld_in_subdomain",
    "abnormal_subdomain",
    "nb_subdomains",
    "prefix_suffix",
    "random_domain",
    "shortening_service",
    "path_extension",
    "nb_redirection",
    "nb_external_redirection",
    // === Word statistics ===
    "length_words_raw",
    "char_repeat",
    "shortest_words_raw",
    "shortest_word_host",
    "shortest_word_path",
    "longest_words_raw",
    "longest_word_host",
    "longest_word_path",
    "avg_words_raw",
    "avg_word_host",
    "avg_word_path",
    // === Keyword hints ===
    "phish_hints",
    "domain_in_brand",
    "brand_in_subdomain",
    "brand_in_path",
    "suspecious_tld",
    "statistical_report",
    // === Page content ===
    "nb_hyperlinks",
    "ratio_intHyperlinks",
    "ratio_extHyperlinks",
    "ratio_nullHyperlinks",
    "nb_extCSS",
    "ratio_intRedirection",
    "ratio_extRedirection",
    "ratio_intErrors",
    "ratio_extErrors",
    "login_form",
    "external_favicon",
    "links_in_tags",
    "submit_email",
    "ratio_intMedia",
    "ratio_extMedia",
    "sfh",
    "iframe",
    "popup_window",
    "safe_anchor",
    "onmouseover",
    "right_clic",
    "empty_title",
    "domain_in_title",
    "domain_with_copyright",
    // === Domain reputation ===
    "whois_registered_domain",
    "domain_registration_length",
    "domain_age",
    "web_traffic",
    "dns_record",
    "google_index",
    "page_rank",
];

/// Total number of features. Must match `FEATURE_LAYOUT.len()`.
pub const FEATURE_COUNT: usize = 87;

/// Compute the CRC32 hash of the feature layout.
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get the layout hash.
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

/// Error when a persisted artifact was produced against a different layout.
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version, self.expected_hash, self.actual_version, self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that a stored layout stamp matches the compiled layout.
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if version != FEATURE_VERSION || hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: version,
            actual_hash: hash,
        });
    }

    Ok(())
}

/// Complete layout information for artifact stamping and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Get feature index by name (O(n) but features are few).
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index.
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 87);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_feature_names_unique() {
        let unique: HashSet<_> = FEATURE_LAYOUT.iter().collect();
        assert_eq!(unique.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        let hash1 = compute_layout_hash();
        let hash2 = compute_layout_hash();
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_layout_hash_non_zero() {
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout_success() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
    }

    #[test]
    fn test_validate_layout_version_mismatch() {
        assert!(validate_layout(FEATURE_VERSION + 1, layout_hash()).is_err());
    }

    #[test]
    fn test_validate_layout_hash_mismatch() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash() ^ 1).is_err());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("length_url"), Some(0));
        assert_eq!(feature_index("ratio_digits_url"), Some(25));
        assert_eq!(feature_index("page_rank"), Some(86));
        assert_eq!(feature_index("nonexistent"), None);
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(0), Some("length_url"));
        assert_eq!(feature_name(86), Some("page_rank"));
        assert_eq!(feature_name(100), None);
    }

    #[test]
    fn test_index_name_round_trip() {
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            assert_eq!(feature_index(name), Some(i));
            assert_eq!(feature_name(i), Some(*name));
        }
    }
}
