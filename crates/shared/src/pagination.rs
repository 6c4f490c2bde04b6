//! Offset-based pagination utilities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Page used when the client does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: i64 = 10;

/// Upper bound for the page size.
pub const MAX_LIMIT: i64 = 100;

/// Column used for ordering when the client does not ask for one.
pub const DEFAULT_ORDER_BY: &str = "created_at";

/// Error type for pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("sort_by must be one of: asc, desc")]
    InvalidSortDirection(String),
    #[error("order_by must be one of: {allowed}")]
    UnknownColumn { column: String, allowed: String },
}

/// Sort direction for ordered listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(PaginationError::InvalidSortDirection(s.to_string())),
        }
    }
}

/// Normalized listing parameters.
///
/// `page` and `limit` are always at least 1. `order_by` is not checked here
/// because the set of sortable columns depends on the resource; call
/// [`PaginationRequest::ensure_sortable`] before handing it to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationRequest {
    pub page: i64,
    pub limit: i64,
    pub order_by: String,
    pub sort_by: SortDirection,
    pub search: String,
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            order_by: DEFAULT_ORDER_BY.to_string(),
            sort_by: SortDirection::Desc,
            search: String::new(),
        }
    }
}

impl PaginationRequest {
    /// Builds a request from raw query values, filling defaults.
    ///
    /// Page is raised to 1 and limit is clamped to `1..=max_limit`.
    pub fn from_query(
        page: Option<i64>,
        limit: Option<i64>,
        order_by: Option<&str>,
        sort_by: Option<&str>,
        search: Option<&str>,
        max_limit: i64,
    ) -> Result<Self, PaginationError> {
        let sort_by = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => SortDirection::Desc,
        };

        let order_by = order_by
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ORDER_BY)
            .to_string();

        Ok(Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, max_limit.max(1)),
            order_by,
            sort_by,
            search: search.map(str::trim).unwrap_or_default().to_string(),
        })
    }

    /// Number of rows to skip for the current page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Checks `order_by` against the columns a resource allows sorting on.
    pub fn ensure_sortable(&self, allowed: &[&str]) -> Result<(), PaginationError> {
        if allowed.contains(&self.order_by.as_str()) {
            Ok(())
        } else {
            Err(PaginationError::UnknownColumn {
                column: self.order_by.clone(),
                allowed: allowed.join(", "),
            })
        }
    }

    /// Builds the response metadata for a page with `total_data` matches overall.
    pub fn to_response(&self, total_data: i64) -> PaginationResponse {
        PaginationResponse {
            page: self.page,
            limit: self.limit,
            order_by: self.order_by.clone(),
            sort_by: self.sort_by,
            search: self.search.clone(),
            total_data,
            total_page: total_pages(total_data, self.limit),
        }
    }
}

/// Pagination metadata returned next to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationResponse {
    pub page: i64,
    pub limit: i64,
    pub order_by: String,
    pub sort_by: SortDirection,
    pub search: String,
    pub total_data: i64,
    pub total_page: i64,
}

/// `ceil(total / limit)`, zero when there is nothing to page through.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Escapes `%`, `_` and `\` so the term matches literally inside a LIKE pattern.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
