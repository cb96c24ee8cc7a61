//! Shared value, error, paging and settings types.
//!
//! # Examples
//!
//! ```rust
//! use quarry::core::{FieldValue, PagingFilter, QuerySettings};
//!
//! let settings = QuerySettings::default();
//! let paging = PagingFilter::with_settings(1, 0, &settings.paging);
//! assert_eq!(paging.page_size, settings.paging.default_page_size);
//! assert_eq!(FieldValue::from("x").to_string(), "'x'");
//! ```

pub use quarry_core::*;
