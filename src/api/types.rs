use serde::Serialize;

/// Pagination envelope shared by the list and search routes.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub total: u64,
    pub data: Vec<T>,
    pub page: u64,
    pub pages: u64,
}

impl<T> Paginated<T> {
    /// Derive `page`/`pages` from the request window:
    /// `page = floor(skip / limit) + 1`, `pages = ceil(total / limit)`.
    /// A window of `limit <= 0` carries no records and reports one page;
    /// `page` saturates instead of overflowing when `skip` sits at the
    /// integer ceiling.
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, skip: u64, limit: i64) -> Self {
        let (page, pages) = match u64::try_from(limit) {
            Ok(n) if n > 0 => ((skip / n).saturating_add(1), total.div_ceil(n)),
            _ => (1, 1),
        };

        Self {
            total,
            data,
            page,
            pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Reply shape of the database status probe.
#[derive(Debug, Serialize)]
pub struct DbStatus {
    pub status: String,
    pub database_url: String,
    pub anime_count: u64,
    pub api_key_count: u64,
    pub active_api_key_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_math() {
        let page = Paginated::new(vec![1], 2, 0, 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 2);
    }

    #[test]
    fn test_skip_lands_on_later_page() {
        let page = Paginated::new(vec![0; 5], 25, 20, 10);
        assert_eq!(page.page, 3);
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn test_page_never_exceeds_pages_within_range() {
        // skip inside the data set keeps page <= pages
        for skip in 0..25 {
            let page: Paginated<i32> = Paginated::new(Vec::new(), 25, skip, 10);
            assert!(page.page <= page.pages, "skip={skip}");
        }
    }

    #[test]
    fn test_zero_limit_degenerates_to_one_page() {
        let page: Paginated<i32> = Paginated::new(Vec::new(), 42, 0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 1);
        assert!(page.data.is_empty());
    }

    #[test]
    fn test_negative_limit_degenerates_to_one_page() {
        let page: Paginated<i32> = Paginated::new(Vec::new(), 42, 7, -3);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 1);
    }

    #[test]
    fn test_huge_skip_saturates_page() {
        let page: Paginated<i32> = Paginated::new(Vec::new(), 0, u64::MAX, 1);
        assert_eq!(page.page, u64::MAX);
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn test_empty_store_reports_zero_pages() {
        let page: Paginated<i32> = Paginated::new(Vec::new(), 0, 0, 10);
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn test_partial_last_page_rounds_up() {
        let page: Paginated<i32> = Paginated::new(Vec::new(), 11, 0, 10);
        assert_eq!(page.pages, 2);
    }
}
