use serde::Serialize;

/// One page of an in-memory result set with navigation metadata.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Paginator<T> {
    pub items: Vec<T>,
    pub first: u32,
    pub before: u32,
    pub current: u32,
    pub last: u32,
    pub next: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub limit: u32,
}

impl<T> Paginator<T> {
    /// Slice `rows` to page `page` of `limit` items. A page past the end is empty but
    /// keeps the requested `current`.
    pub fn paginate(rows: Vec<T>, page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let page = page.max(1);
        let total_items = rows.len();
        let total_pages = u32::try_from(total_items.div_ceil(limit as usize)).unwrap_or(u32::MAX);

        let start = (page as usize - 1).saturating_mul(limit as usize);
        let items: Vec<T> = rows.into_iter().skip(start).take(limit as usize).collect();

        Paginator {
            items,
            first: 1,
            before: if page > 1 { page - 1 } else { 1 },
            current: page,
            last: total_pages,
            next: if page < total_pages { page + 1 } else { total_pages },
            total_pages,
            total_items,
            limit,
        }
    }
}
