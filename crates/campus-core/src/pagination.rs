//! Page-based pagination for list endpoints.
//!
//! List handlers accept a [`PagingQuery`] from the query string and normalize it
//! into a [`PagingRequest`] with [`PagingQuery::into_request`]. After the listing
//! runs, [`PageMeta::from_total`] derives the metadata block from the total count.
//!
//! # Query parameters
//!
//! - `page`: 1-indexed page number (default: 1)
//! - `limit`: items per page (default: [`DEFAULT_LIMIT`], capped at [`MAX_LIMIT`])
//! - `sort`: JSON array of `{ "field": ..., "direction": 1 | -1 }` entries
//!
//! Values below 1 are raised to 1. Non-numeric values and malformed sort entries
//! are rejected with 422 "invalid query".
//!
//! # Example JSON Response
//!
//! ```json
//! {
//!   "students": [...],
//!   "meta": {
//!     "total_records": 25,
//!     "page_total_records": 10,
//!     "current_page": 2,
//!     "total_pages": 3,
//!     "has_previous": true,
//!     "has_next": true,
//!     "first_page": 1,
//!     "last_page": 3
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;

/// Items per page when the caller does not send `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page size a caller can request.
pub const MAX_LIMIT: i64 = 100;

/// Field every listing is ordered by unless told otherwise.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Asc),
            -1 => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn default_order() -> Vec<Self> {
        vec![Self {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Asc,
        }]
    }
}

/// Raw paging parameters as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PagingQuery {
    /// Page number (1-indexed)
    #[param(example = "1")]
    pub page: Option<String>,
    /// Items per page
    #[param(example = "10")]
    pub limit: Option<String>,
    /// JSON sort specification, e.g. `[{"field":"createdAt","direction":1}]`
    pub sort: Option<String>,
}

/// Normalized paging request handed to the listing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingRequest {
    pub page: i64,
    pub limit: i64,
    pub sort: Vec<SortKey>,
}

impl Default for PagingRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            sort: SortKey::default_order(),
        }
    }
}

impl PagingRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
            sort: SortKey::default_order(),
        }
    }

    /// Number of rows to skip for this page. Saturates for pages past `i64::MAX` rows.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).max(0).saturating_mul(self.limit)
    }
}

#[derive(Deserialize)]
struct RawSortEntry {
    field: Option<String>,
    direction: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSort {
    Many(Vec<RawSortEntry>),
    One(RawSortEntry),
}

fn invalid_query() -> AppError {
    AppError::unprocessable("invalid query")
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_positive(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match present(raw) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(|n| Some(n.max(1)))
            .map_err(|_| invalid_query()),
    }
}

fn parse_sort(raw: &str) -> Result<Vec<SortKey>, AppError> {
    let entries = match serde_json::from_str::<RawSort>(raw).map_err(|_| invalid_query())? {
        RawSort::Many(entries) => entries,
        RawSort::One(entry) => vec![entry],
    };

    entries
        .into_iter()
        .map(|entry| {
            let field = entry
                .field
                .filter(|f| !f.trim().is_empty())
                .ok_or_else(invalid_query)?;
            let direction = entry
                .direction
                .and_then(SortDirection::from_code)
                .ok_or_else(invalid_query)?;
            Ok(SortKey { field, direction })
        })
        .collect()
}

impl PagingQuery {
    /// Normalizes the query into a [`PagingRequest`], using `default_limit` when
    /// the caller sent no `limit`.
    pub fn into_request(self, default_limit: i64) -> Result<PagingRequest, AppError> {
        let page = parse_positive(self.page.as_deref())?.unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref())?
            .unwrap_or(default_limit)
            .clamp(1, MAX_LIMIT);

        if let Some(raw) = present(self.sort.as_deref()) {
            // Validated but not applied: listings keep the default ordering.
            parse_sort(raw)?;
        }

        Ok(PagingRequest {
            page,
            limit,
            sort: SortKey::default_order(),
        })
    }
}

/// Metadata block returned next to every paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub total_records: i64,
    pub page_total_records: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
    pub first_page: i64,
    pub last_page: i64,
}

impl PageMeta {
    pub fn from_total(total: i64, request: &PagingRequest) -> Self {
        let total = total.max(0);
        let limit = request.limit.max(1);
        let computed_pages = (total + limit - 1) / limit;
        let total_pages = computed_pages.max(1);

        Self {
            total_records: total,
            page_total_records: (total - request.offset()).clamp(0, limit),
            current_page: request.page,
            total_pages,
            has_previous: request.page > 1,
            has_next: request.page < computed_pages,
            first_page: 1,
            last_page: total_pages,
        }
    }
}

/// One page of rows plus its metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn query(page: Option<&str>, limit: Option<&str>, sort: Option<&str>) -> PagingQuery {
        PagingQuery {
            page: page.map(String::from),
            limit: limit.map(String::from),
            sort: sort.map(String::from),
        }
    }

    #[test]
    fn test_defaults_when_absent() {
        let req = PagingQuery::default().into_request(DEFAULT_LIMIT).unwrap();
        assert_eq!(req, PagingRequest::default());
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_endpoint_default_limit() {
        let req = PagingQuery::default().into_request(50).unwrap();
        assert_eq!(req.limit, 50);
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let req = query(Some(""), Some("  "), Some("")).into_request(10).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);
    }

    #[test]
    fn test_values_below_one_are_raised() {
        let req = query(Some("0"), Some("-5"), None).into_request(10).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);
    }

    #[test]
    fn test_limit_is_capped() {
        let req = query(None, Some("5000"), None).into_request(10).unwrap();
        assert_eq!(req.limit, MAX_LIMIT);
    }

    #[test]
    fn test_offset() {
        let req = query(Some("3"), Some("20"), None).into_request(10).unwrap();
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn test_non_numeric_page_rejected() {
        let err = query(Some("two"), None, None).into_request(10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
    }

    #[test]
    fn test_valid_sort_falls_back_to_default() {
        let req = query(None, None, Some(r#"[{"field":"name","direction":-1}]"#))
            .into_request(10)
            .unwrap();
        assert_eq!(req.sort, SortKey::default_order());
    }

    #[test]
    fn test_single_object_sort_accepted() {
        let req = query(None, None, Some(r#"{"field":"createdAt","direction":1}"#)).into_request(10);
        assert!(req.is_ok());
    }

    #[test]
    fn test_sort_missing_direction_rejected() {
        let err = query(None, None, Some(r#"[{"field":"name"}]"#))
            .into_request(10)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
    }

    #[test]
    fn test_sort_missing_field_rejected() {
        let err = query(
            None,
            None,
            Some(r#"[{"field":"name","direction":1},{"direction":-1}]"#),
        )
        .into_request(10)
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
    }

    #[test]
    fn test_sort_bad_direction_rejected() {
        let err = query(None, None, Some(r#"[{"field":"name","direction":2}]"#))
            .into_request(10)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
    }

    #[test]
    fn test_sort_not_json_rejected() {
        let err = query(None, None, Some("name:asc")).into_request(10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
    }

    #[test]
    fn test_meta_empty_collection() {
        let meta = PageMeta::from_total(0, &PagingRequest::new(1, 10));
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.page_total_records, 0);
        assert!(!meta.has_previous);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_meta_middle_page() {
        let meta = PageMeta::from_total(25, &PagingRequest::new(2, 10));
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.page_total_records, 10);
        assert!(meta.has_previous);
        assert!(meta.has_next);
    }

    #[test]
    fn test_meta_last_partial_page() {
        let meta = PageMeta::from_total(25, &PagingRequest::new(3, 10));
        assert_eq!(meta.page_total_records, 5);
        assert!(!meta.has_next);
        assert_eq!(meta.last_page, 3);
    }

    #[test]
    fn test_meta_fifteen_records_second_page() {
        let meta = PageMeta::from_total(15, &PagingRequest::new(2, 10));
        assert_eq!(meta.page_total_records, 5);
        assert!(!meta.has_next);
        assert_eq!(meta.first_page, 1);
    }

    #[test]
    fn test_meta_page_past_end() {
        let meta = PageMeta::from_total(15, &PagingRequest::new(9, 10));
        assert_eq!(meta.page_total_records, 0);
        assert!(meta.has_previous);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_largest_page_saturates_offset() {
        let req = query(Some("9223372036854775807"), Some("10"), None)
            .into_request(DEFAULT_LIMIT)
            .unwrap();
        assert_eq!(req.page, i64::MAX);
        assert_eq!(req.offset(), i64::MAX);

        let meta = PageMeta::from_total(15, &req);
        assert_eq!(meta.page_total_records, 0);
        assert_eq!(meta.current_page, i64::MAX);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_page_map_keeps_meta() {
        let page = Page {
            items: vec![1, 2, 3],
            meta: PageMeta::from_total(3, &PagingRequest::default()),
        };
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.meta.total_records, 3);
    }
}
