//! Paged listing of raw rows.

use tally_core::{TransactionRow, TransactionSet};

/// Rows shown in the dashboard preview
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    /// 1-based page number actually served
    pub number: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub page_size: usize,
    pub items: &'a [T],
}

impl<T> Page<'_, T> {
    /// 1-based index of the first item on this page in the full listing
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.number - 1) * self.page_size + 1
        }
    }
}

/// Slice `items` into pages of `page_size`.
///
/// `page` is 1-based; 0 reads as 1 and anything past the end is clamped to
/// the last page. A `page_size` of 0 is treated as 1.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_rows = items.len();
    let total_pages = total_rows.div_ceil(page_size).max(1);
    let number = page.clamp(1, total_pages);

    let start = (number - 1) * page_size;
    let end = (start + page_size).min(total_rows);

    Page {
        number,
        total_pages,
        total_rows,
        page_size,
        items: &items[start.min(total_rows)..end],
    }
}

/// First rows of the set, in file order.
pub fn preview(set: &TransactionSet) -> &[TransactionRow] {
    let rows = set.rows();
    &rows[..rows.len().min(PREVIEW_ROWS)]
}
