//! Pagination of transaction lists

use serde::Serialize;

/// Rows shown per page of recent transactions
pub const DEFAULT_PER_PAGE: usize = 10;

/// One page of a list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually returned
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Cut `items` into the requested 1-based page.
///
/// There is always at least one page; page 0 reads as page 1 and pages past
/// the end clamp to the last page. A `per_page` of 0 uses the default.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = if per_page == 0 { DEFAULT_PER_PAGE } else { per_page };
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);

    Page {
        items: items[start.min(total_items)..end].to_vec(),
        page,
        per_page,
        total_items,
        total_pages,
    }
}
