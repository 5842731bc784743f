pub mod airplane_repo;
pub mod airport_repo;
pub mod app_config;
pub mod baggage_repo;
pub mod booking_repo;
pub mod client_repo;
pub mod database;
pub mod flight_repo;
pub mod payment_repo;
pub mod seat_repo;

pub use database::DbClient;

use skyway_domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("stored data is inconsistent: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        // Only reachable when a stored enum no longer parses.
        StoreError::Corrupt(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.is_unique_violation()
    )
}

/// LIMIT/OFFSET pagination, 1-based pages.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_out_of_range_input() {
        let p = Page::new(0, 500);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 100);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_skips_prior_pages() {
        assert_eq!(Page::new(3, 20).offset(), 40);
    }
}
