use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Page/size request resolved against the configured limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero based page index.
    pub page: usize,
    pub size: usize,
}

impl Pagination {
    pub fn new(page: Option<usize>, size: Option<usize>, max_size: usize) -> Self {
        let size = size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(max_size.max(1));
        Self {
            page: page.unwrap_or(0),
            size,
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

/// Paginated search response `{ content, totalPages, totalElements, page, size }`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_pages: usize,
    pub total_elements: usize,
    pub page: usize,
    pub size: usize,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: usize, pagination: Pagination) -> Self {
        let total_pages = if pagination.size == 0 {
            0
        } else {
            total_elements.div_ceil(pagination.size)
        };

        Self {
            content,
            total_pages,
            total_elements,
            page: pagination.page,
            size: pagination.size,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            page: self.page,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_caps_size() {
        assert_eq!(
            Pagination::new(None, None, 100),
            Pagination {
                page: 0,
                size: DEFAULT_PAGE_SIZE
            }
        );
        assert_eq!(Pagination::new(Some(2), Some(500), 100).size, 100);
        assert_eq!(Pagination::new(Some(2), Some(0), 100).size, DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::new(Some(3), Some(10), 100).offset(), 30);
    }

    #[test]
    fn page_counts_partial_last_page() {
        let page = Page::new(vec![1, 2], 21, Pagination::new(Some(2), Some(10), 100));
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 21);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn page_serializes_camel_case() {
        let page = Page::new(vec!["a"], 1, Pagination::new(None, Some(5), 100));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["content"][0], "a");
    }

    #[test]
    fn empty_result_has_no_pages() {
        let page: Page<i32> = Page::new(vec![], 0, Pagination::new(None, None, 100));
        assert_eq!(page.total_pages, 0);
    }
}
