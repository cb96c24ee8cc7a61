//! Paging request carried by a query.
//!
//! The query layer does not interpret paging; it only stores it so the
//! downstream translator can apply `LIMIT`/`OFFSET` (or its equivalent).

use serde::{Deserialize, Serialize};

use crate::settings::PagingSettings;

/// Page-number based paging request (1-indexed pages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingFilter {
	/// Current page number (1-indexed)
	pub page: usize,
	/// Items per page
	pub page_size: usize,
}

impl PagingFilter {
	/// Creates a paging filter. Page `0` is treated as page `1`.
	///
	/// # Examples
	///
	/// ```
	/// use quarry_core::PagingFilter;
	///
	/// let paging = PagingFilter::new(3, 25);
	/// assert_eq!(paging.offset(), 50);
	/// ```
	pub fn new(page: usize, page_size: usize) -> Self {
		Self {
			page: page.max(1),
			page_size,
		}
	}

	/// Creates a filter for `page`, clamping `page_size` into the configured
	/// bounds. A `page_size` of `0` selects the configured default.
	pub fn with_settings(page: usize, page_size: usize, settings: &PagingSettings) -> Self {
		let size = if page_size == 0 {
			settings.default_page_size
		} else {
			page_size.min(settings.max_page_size)
		};
		Self::new(page, size)
	}

	/// Number of items skipped before this page. Saturates at `usize::MAX`.
	pub fn offset(&self) -> usize {
		(self.page.max(1) - 1).saturating_mul(self.page_size)
	}

	/// Maximum number of items on this page.
	pub fn limit(&self) -> usize {
		self.page_size
	}
}

impl Default for PagingFilter {
	fn default() -> Self {
		let settings = PagingSettings::default();
		Self::new(1, settings.default_page_size)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(1, 10, 0)]
	#[case(2, 10, 10)]
	#[case(5, 20, 80)]
	#[case(0, 10, 0)]
	#[case(usize::MAX / 2, 20, usize::MAX)]
	#[case(usize::MAX, usize::MAX, usize::MAX)]
	fn test_offset(#[case] page: usize, #[case] size: usize, #[case] expected: usize) {
		assert_eq!(PagingFilter::new(page, size).offset(), expected);
	}

	#[rstest]
	fn test_with_settings_clamps_and_defaults() {
		let settings = PagingSettings {
			default_page_size: 15,
			max_page_size: 100,
		};
		assert_eq!(PagingFilter::with_settings(1, 0, &settings).limit(), 15);
		assert_eq!(PagingFilter::with_settings(1, 500, &settings).limit(), 100);
		assert_eq!(PagingFilter::with_settings(2, 40, &settings).limit(), 40);
	}

	#[rstest]
	fn test_huge_page_offset_saturates() {
		let paging = PagingFilter::with_settings(usize::MAX / 2, 20, &PagingSettings::default());
		assert_eq!(paging.offset(), usize::MAX);
		assert_eq!(paging.limit(), 20);
	}
}
