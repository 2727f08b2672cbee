// src/pipeline/paginator.rs
use serde::Serialize;

/// One page of a ranked list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually shown.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// The requested page was out of range and page 1 is shown instead.
    pub page_reset: bool,
}

/// `max(1, ceil(count / page_size))`.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slice `items` into the requested page. A page past the end (or page 0)
/// resets to page 1 rather than coming back empty.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let page_reset = page == 0 || page > total_pages;
    let page = if page_reset { 1 } else { page };

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());

    Page {
        items: items.get(start..end).unwrap_or_default().to_vec(),
        page,
        total_pages,
        total_items: items.len(),
        page_reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_items_two_pages() {
        let items: Vec<usize> = (0..10).collect();
        let first = paginate(&items, 6, 1);
        let second = paginate(&items, 6, 2);
        assert_eq!(first.items.len(), 6);
        assert_eq!(second.items, vec![6, 7, 8, 9]);
        assert_eq!(first.total_pages, 2);
        assert_eq!(second.total_items, 10);
        assert!(!second.page_reset);
    }

    #[test]
    fn test_pages_cover_every_item_once() {
        for count in 0..40usize {
            for page_size in 1..9usize {
                let items: Vec<usize> = (0..count).collect();
                let pages = total_pages(count, page_size);
                let mut seen = Vec::new();
                for page in 1..=pages {
                    let slice = paginate(&items, page_size, page);
                    assert!(slice.items.len() <= page_size);
                    if page < pages {
                        assert_eq!(slice.items.len(), page_size);
                    }
                    seen.extend(slice.items);
                }
                assert_eq!(seen, items);
            }
        }
    }

    #[test]
    fn test_out_of_range_page_resets() {
        let items: Vec<usize> = (0..3).collect();
        let page = paginate(&items, 6, 4);
        assert!(page.page_reset);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, items);

        let empty: Vec<usize> = Vec::new();
        let page = paginate(&empty, 6, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.page_reset);
    }
}
