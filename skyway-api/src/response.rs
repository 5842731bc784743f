use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use skyway_store::Page;

/// The envelope every endpoint returns:
/// `{ success, data?, message, pagination? }` on success; errors are
/// rendered by `AppError` with the same shape plus an `error` object.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: Page, total: i64) -> Self {
        Self {
            page: page.page,
            per_page: page.per_page,
            total,
            total_pages: (total + page.per_page - 1) / page.per_page,
        }
    }
}

pub fn ok<T: Serialize>(data: T, message: &str) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        message: message.to_string(),
        pagination: None,
    })
}

pub fn created<T: Serialize>(data: T, message: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(data, message))
}

pub fn paginated<T: Serialize>(
    data: T,
    page: Page,
    total: i64,
    message: &str,
) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        message: message.to_string(),
        pagination: Some(Pagination::new(page, total)),
    })
}

/// Common `?page=&per_page=` query parameters.
#[derive(Debug, Default, serde::Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub fn to_page(&self) -> Page {
        Page::new(self.page.unwrap_or(1), self.per_page.unwrap_or(20))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_up_partial_pages() {
        let p = Pagination::new(Page::new(1, 20), 41);
        assert_eq!(p.total_pages, 3);
    }

    #[test]
    fn pagination_of_empty_set() {
        let p = Pagination::new(Page::new(1, 20), 0);
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn page_query_defaults() {
        let q = PageQuery::default();
        let page = q.to_page();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 20);
    }
}
