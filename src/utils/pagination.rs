//! Pagination helpers
//!
//! All list endpoints share the same query shape and response envelope:
//! `{page, limit}` → `{items, pagination: {page, totalPages, total}}`.

use serde::{Deserialize, Serialize};

/// Hard cap so a single request cannot pull the whole table
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Default page size
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// List query parameters (`?page=1&limit=20`)
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Normalized (page, limit): page ≥ 1, limit in [1, MAX_PAGE_LIMIT]
    pub fn normalize(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        (page, limit)
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

/// Paginated list response body
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Slice a fully-materialized result set into one page.
///
/// 内存存储下结果集已在手，直接切片即可。
pub fn paginate<T>(mut items: Vec<T>, page: u32, limit: u32) -> Paginated<T> {
    let total = items.len() as u64;
    let total_pages = ((total + limit as u64 - 1) / limit as u64).max(1) as u32;
    // usize 运算：page 来自客户端，u32 乘法会溢出
    let start = (page.max(1) as usize - 1) * limit as usize;
    let items = if start >= items.len() {
        Vec::new()
    } else {
        let end = (start + limit as usize).min(items.len());
        items.drain(start..end).collect()
    };
    Paginated {
        items,
        pagination: Pagination {
            page,
            total_pages,
            total,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_page_and_limit() {
        let q = PageQuery {
            page: Some(0),
            limit: Some(500),
        };
        assert_eq!(q.normalize(), (1, MAX_PAGE_LIMIT));
    }

    #[test]
    fn paginate_slices_and_counts() {
        let page = paginate((0..45).collect::<Vec<_>>(), 3, 20);
        assert_eq!(page.items, (40..45).collect::<Vec<_>>());
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total, 45);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let page = paginate(vec![1, 2, 3], 5, 20);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 3);
    }

    #[test]
    fn paginate_with_a_huge_page_number_is_empty() {
        let page = paginate(vec![1, 2, 3], u32::MAX, MAX_PAGE_LIMIT);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 3);
    }
}
