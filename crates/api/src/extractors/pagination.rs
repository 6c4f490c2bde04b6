//! Listing query extractor.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use shared::pagination::PaginationRequest;

use crate::app::AppState;
use crate::error::{ApiError, PARSE_FAILURE_MESSAGE};

/// Raw listing parameters as they appear in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub order_by: Option<String>,
    pub sort_by: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    /// Fills defaults and clamps `limit` to `1..=max_limit`.
    pub fn into_request(self, max_limit: i64) -> Result<PaginationRequest, ApiError> {
        PaginationRequest::from_query(
            self.page,
            self.limit,
            self.order_by.as_deref(),
            self.sort_by.as_deref(),
            self.search.as_deref(),
            max_limit,
        )
        .map_err(ApiError::from)
    }
}

/// Normalized pagination request for list endpoints.
#[derive(Debug, Clone)]
pub struct Pagination(pub PaginationRequest);

#[async_trait]
impl FromRequestParts<AppState> for Pagination {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListParams>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected query string");
                ApiError::BadRequest(PARSE_FAILURE_MESSAGE.to_string())
            })?;

        params
            .into_request(state.config.limits.max_page_size)
            .map(Pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::pagination::SortDirection;

    #[test]
    fn test_defaults() {
        let request = ListParams::default().into_request(100).unwrap();
        assert_eq!(request, PaginationRequest::default());
    }

    #[test]
    fn test_limit_clamped_to_configured_maximum() {
        let params = ListParams {
            limit: Some(500),
            page: Some(0),
            ..Default::default()
        };
        let request = params.into_request(50).unwrap();
        assert_eq!(request.limit, 50);
        assert_eq!(request.page, 1);
    }

    #[test]
    fn test_sort_direction_parsed() {
        let params = ListParams {
            sort_by: Some("ASC".to_string()),
            ..Default::default()
        };
        assert_eq!(params.into_request(100).unwrap().sort_by, SortDirection::Asc);
    }

    #[test]
    fn test_unknown_sort_direction_is_validation_error() {
        let params = ListParams {
            sort_by: Some("sideways".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            params.into_request(100),
            Err(ApiError::Validation(_))
        ));
    }
}
