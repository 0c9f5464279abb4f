use crate::error::VcError;
use serde::Serialize;
use std::ops::RangeInclusive;

/// Number of page links shown around the current page.
pub const PAGE_WINDOW: usize = 5;

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Page numbers to offer for navigation; `None` when there is at most one page.
    pub fn window(&self) -> Option<RangeInclusive<usize>> {
        page_window(self.page, self.total_pages)
    }
}

/// Cuts `items` into pages of `per_page` and returns page `page` (1-based).
///
/// A page past the end is empty rather than an error.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Result<Page<T>, VcError> {
    if page == 0 {
        return Err(VcError::InvalidQuery("page numbers start at 1".to_string()));
    }
    if per_page == 0 {
        return Err(VcError::InvalidQuery(
            "per_page must be greater than 0".to_string(),
        ));
    }

    let total_count = items.len();
    let total_pages = total_count.div_ceil(per_page);
    let offset = (page - 1).saturating_mul(per_page);
    let items = items.into_iter().skip(offset).take(per_page).collect();

    Ok(Page {
        items,
        page,
        per_page,
        total_count,
        total_pages,
    })
}

/// A window of at most [`PAGE_WINDOW`] page numbers centred on `current` where possible.
pub fn page_window(current: usize, total_pages: usize) -> Option<RangeInclusive<usize>> {
    if total_pages <= 1 {
        return None;
    }
    let current = current.clamp(1, total_pages);
    let mut start = current.saturating_sub(PAGE_WINDOW / 2).max(1);
    let end = start.saturating_add(PAGE_WINDOW - 1).min(total_pages);
    if end + 1 - start < PAGE_WINDOW {
        start = (end + 1).saturating_sub(PAGE_WINDOW).max(1);
    }
    Some(start..=end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_split_evenly_with_remainder() {
        let items: Vec<u32> = (1..=23).collect();
        let page = paginate(items.clone(), 3, 10).unwrap();
        assert_eq!(page.items, vec![21, 22, 23]);
        assert_eq!(page.total_count, 23);
        assert_eq!(page.total_pages, 3);

        let past_end = paginate(items, 4, 10).unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total_pages, 3);
    }

    #[test]
    fn empty_input_has_no_pages() {
        let page = paginate(Vec::<u32>::new(), 1, 50).unwrap();
        assert_eq!(page.total_pages, 0);
        assert!(page.window().is_none());
    }

    #[test]
    fn zero_page_or_page_size_is_rejected() {
        assert!(matches!(paginate(vec![1], 0, 10), Err(VcError::InvalidQuery(_))));
        assert!(matches!(paginate(vec![1], 1, 0), Err(VcError::InvalidQuery(_))));
    }

    #[test]
    fn window_centres_on_current_page() {
        assert_eq!(page_window(6, 20), Some(4..=8));
    }

    #[test]
    fn window_is_clamped_at_both_ends() {
        assert_eq!(page_window(1, 20), Some(1..=5));
        assert_eq!(page_window(19, 20), Some(16..=20));
        assert_eq!(page_window(2, 3), Some(1..=3));
        assert_eq!(page_window(1, 1), None);
    }

    #[test]
    fn page_far_past_the_end_is_empty_and_windows_the_last_pages() {
        let page = paginate((1..=6).collect::<Vec<u32>>(), usize::MAX, 2).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.window(), Some(1..=3));
        assert_eq!(page_window(usize::MAX, 20), Some(16..=20));
    }
}
