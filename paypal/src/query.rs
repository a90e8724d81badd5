//! Query-string encoding for list endpoints.
//!
//! [`QueryParameters`] covers the filter and pagination keys PayPal's list
//! endpoints share. Only keys that are set are emitted. Caller-supplied
//! custom pairs are merged last and win over a built-in key of the same name.
//! Output is sorted by key, so equal parameters always encode identically.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};

use crate::date::format_iso8601;

/// Sort direction of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Oldest or smallest first.
    Ascending,
    /// Newest or largest first.
    Descending,
}

impl SortOrder {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter and pagination options for GET list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    /// `count`: maximum number of items.
    pub count: Option<u32>,
    /// `start_time`: lower bound on creation time.
    pub start_time: Option<DateTime<Utc>>,
    /// `end_time`: upper bound on creation time.
    pub end_time: Option<DateTime<Utc>>,
    /// `start_id`: resource id to start after.
    pub start_id: Option<String>,
    /// `start_index`: offset of the first item.
    pub start_index: Option<u32>,
    /// Page to fetch; sent as `next_page_token`.
    pub page: Option<u32>,
    /// `page_size`: items per page.
    pub page_size: Option<u32>,
    /// `total_count_required`: ask PayPal to include totals.
    pub total_count_required: Option<bool>,
    /// `sort_by`: field to sort on.
    pub sort_by: Option<String>,
    /// `sort_order`: direction.
    pub sort_order: Option<SortOrder>,
    /// Arbitrary extra pairs, e.g. `status` or `disputed_transaction_id`.
    pub custom: BTreeMap<String, String>,
}

impl QueryParameters {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `count`.
    #[must_use]
    pub const fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the creation-time window.
    #[must_use]
    pub const fn with_time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Sets the page to fetch.
    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Requests totals in the response.
    #[must_use]
    pub const fn with_total_count(mut self) -> Self {
        self.total_count_required = Some(true);
        self
    }

    /// Sets the sort field and direction.
    #[must_use]
    pub fn with_sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    /// Sets the sort direction only.
    #[must_use]
    pub const fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Adds a custom pair, overriding any built-in key of the same name.
    #[must_use]
    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    /// Returns every pair that will be sent, custom values applied.
    #[must_use]
    pub fn pairs(&self) -> BTreeMap<String, String> {
        let mut pairs = BTreeMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.insert(key.to_owned(), value);
            }
        };
        put("count", self.count.map(|v| v.to_string()));
        put("start_time", self.start_time.as_ref().map(format_iso8601));
        put("end_time", self.end_time.as_ref().map(format_iso8601));
        put("start_id", self.start_id.clone());
        put("start_index", self.start_index.map(|v| v.to_string()));
        put("next_page_token", self.page.map(|v| v.to_string()));
        put("page_size", self.page_size.map(|v| v.to_string()));
        put(
            "total_count_required",
            self.total_count_required.map(|v| v.to_string()),
        );
        put("sort_by", self.sort_by.clone());
        put("sort_order", self.sort_order.map(|v| v.as_str().to_owned()));
        pairs.extend(self.custom.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }

    /// Returns `true` if no pair would be emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Encodes as `key=value` pairs joined by `&`, form-urlencoded.
    #[must_use]
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

impl Display for QueryParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encode_emits_only_set_keys() {
        let params = QueryParameters::new()
            .with_page(0)
            .with_page_size(25)
            .with_sort_order(SortOrder::Ascending);
        let encoded = params.encode();
        let mut pairs: Vec<&str> = encoded.split('&').collect();
        pairs.sort_unstable();
        assert_eq!(
            pairs,
            ["next_page_token=0", "page_size=25", "sort_order=ascending"]
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = QueryParameters::new().with_count(3).with_total_count();
        let b = QueryParameters::new().with_total_count().with_count(3);
        assert_eq!(a.encode(), b.encode());
        assert_eq!(a.encode(), "count=3&total_count_required=true");
    }

    #[test]
    fn test_custom_values_win() {
        let params = QueryParameters::new()
            .with_page_size(10)
            .with_custom("page_size", "50")
            .with_custom("status", "OPEN");
        assert_eq!(params.encode(), "page_size=50&status=OPEN");
    }

    #[test]
    fn test_dates_render_iso8601() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let params = QueryParameters::new().with_time_range(start, end);
        let pairs = params.pairs();
        assert_eq!(pairs["start_time"], "2024-01-01T00:00:00Z");
        assert_eq!(pairs["end_time"], "2024-01-31T23:59:59Z");
        assert_eq!(
            params.encode(),
            "end_time=2024-01-31T23%3A59%3A59Z&start_time=2024-01-01T00%3A00%3A00Z"
        );
    }

    #[test]
    fn test_empty() {
        assert!(QueryParameters::new().is_empty());
        assert_eq!(QueryParameters::new().encode(), "");
    }
}
