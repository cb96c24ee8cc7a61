//! Settings for query construction.
//!
//! Settings are plain serde structs loaded from TOML. Every section and field
//! has a default, so an empty document yields [`QuerySettings::default`].
//!
//! ```toml
//! [identity]
//! composite_exclusion = "no_matching_tuple"
//! deduplicate_keys = true
//!
//! [paging]
//! default_page_size = 50
//! max_page_size = 500
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::exception::{QueryError, QueryResult};

/// How identity exclusion is expressed for composite-key entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeExclusion {
	/// OR of per-instance groups, each an AND of `key <> value`.
	///
	/// A row passes when, for at least one excluded instance, every key
	/// differs. This is the long-standing structure and stays the default.
	#[default]
	AnyFieldDiffers,
	/// AND of per-instance groups, each an OR of `key <> value`.
	///
	/// A row passes only when it matches none of the excluded tuples.
	NoMatchingTuple,
}

/// Settings for identity-condition building.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
	/// Exclusion structure for composite keys.
	pub composite_exclusion: CompositeExclusion,
	/// Drop repeated key tuples before building identity conditions.
	pub deduplicate_keys: bool,
}

/// Page size bounds applied by [`PagingFilter::with_settings`](crate::PagingFilter::with_settings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingSettings {
	/// Page size used when a request does not name one.
	pub default_page_size: usize,
	/// Upper bound on any requested page size.
	pub max_page_size: usize,
}

impl Default for PagingSettings {
	fn default() -> Self {
		Self {
			default_page_size: 20,
			max_page_size: 1000,
		}
	}
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
	/// `[identity]` section.
	pub identity: IdentitySettings,
	/// `[paging]` section.
	pub paging: PagingSettings,
}

impl QuerySettings {
	/// Parses and validates settings from a TOML document.
	pub fn from_toml_str(source: &str) -> QueryResult<Self> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates a TOML settings file.
	pub fn from_file(path: impl AsRef<Path>) -> QueryResult<Self> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path)?;
		tracing::debug!(path = %path.display(), "loading query settings");
		Self::from_toml_str(&source)
	}

	/// Opts into the logically exact composite exclusion.
	pub fn with_composite_exclusion(mut self, strategy: CompositeExclusion) -> Self {
		self.identity.composite_exclusion = strategy;
		self
	}

	/// Enables or disables key deduplication.
	pub fn with_deduplicated_keys(mut self, deduplicate: bool) -> Self {
		self.identity.deduplicate_keys = deduplicate;
		self
	}

	/// Checks cross-field constraints that serde cannot express.
	pub fn validate(&self) -> QueryResult<()> {
		let paging = &self.paging;
		if paging.default_page_size == 0 || paging.max_page_size == 0 {
			return Err(QueryError::Settings(
				"page sizes must be greater than zero".to_string(),
			));
		}
		if paging.default_page_size > paging.max_page_size {
			return Err(QueryError::Settings(format!(
				"default_page_size ({}) exceeds max_page_size ({})",
				paging.default_page_size, paging.max_page_size
			)));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_empty_document_is_default() {
		let settings = QuerySettings::from_toml_str("").unwrap();
		assert_eq!(settings, QuerySettings::default());
		assert_eq!(
			settings.identity.composite_exclusion,
			CompositeExclusion::AnyFieldDiffers
		);
		assert!(!settings.identity.deduplicate_keys);
	}

	#[rstest]
	fn test_parses_identity_section() {
		let settings = QuerySettings::from_toml_str(
			r#"
[identity]
composite_exclusion = "no_matching_tuple"
deduplicate_keys = true
"#,
		)
		.unwrap();
		assert_eq!(
			settings.identity.composite_exclusion,
			CompositeExclusion::NoMatchingTuple
		);
		assert!(settings.identity.deduplicate_keys);
		assert_eq!(settings.paging, PagingSettings::default());
	}

	#[rstest]
	#[case("[paging]\ndefault_page_size = 0\n")]
	#[case("[paging]\ndefault_page_size = 50\nmax_page_size = 10\n")]
	fn test_rejects_invalid_paging(#[case] source: &str) {
		let error = QuerySettings::from_toml_str(source).unwrap_err();
		assert!(matches!(error, QueryError::Settings(_)));
	}

	#[rstest]
	fn test_rejects_unknown_strategy() {
		let error =
			QuerySettings::from_toml_str("[identity]\ncomposite_exclusion = \"maybe\"\n")
				.unwrap_err();
		assert!(matches!(error, QueryError::Toml(_)));
	}

	#[rstest]
	fn test_builder_helpers() {
		let settings = QuerySettings::default()
			.with_composite_exclusion(CompositeExclusion::NoMatchingTuple)
			.with_deduplicated_keys(true);
		assert_eq!(
			settings.identity.composite_exclusion,
			CompositeExclusion::NoMatchingTuple
		);
		assert!(settings.identity.deduplicate_keys);
	}
}
