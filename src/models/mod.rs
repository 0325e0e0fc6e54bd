pub mod portfolio;
pub mod providers;
pub mod reviews;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Slice an already-filtered result set to the requested page.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let skip = (self.page() - 1).saturating_mul(self.limit());
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::PaginationQuery;

    #[test]
    fn defaults_and_bounds() {
        let q = PaginationQuery { page: None, limit: None };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 20);

        let q = PaginationQuery { page: Some(0), limit: Some(500) };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 100);
    }

    #[test]
    fn apply_returns_requested_page() {
        let q = PaginationQuery { page: Some(2), limit: Some(2) };
        assert_eq!(q.apply(vec![1, 2, 3, 4, 5]), vec![3, 4]);

        let q = PaginationQuery { page: Some(4), limit: Some(2) };
        assert!(q.apply(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn huge_page_numbers_yield_an_empty_page() {
        let q = PaginationQuery { page: Some(u64::MAX), limit: Some(100) };
        assert!(q.apply(vec![1, 2, 3]).is_empty());

        let q = PaginationQuery { page: Some(u64::MAX / 2), limit: None };
        assert!(q.apply(vec![1, 2, 3]).is_empty());
    }
}
