//! Limit/page pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// Pagination parameters shared across all list endpoints.
///
/// - `limit`: 1–100, default 6
/// - `page`: ≥ 1, default 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    6
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Build from optional query values, falling back to defaults.
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or_else(default_page),
            limit: limit.unwrap_or_else(default_limit),
        }
        .clamped()
    }

    /// Clamp `limit` to the valid range 1–100 and `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, 100),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of results in the `{count, next, previous, results}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap `results` and derive `next`/`previous` links from the request path.
    ///
    /// `query` is the raw query string of the current request; every pair is
    /// kept except `page`, which is replaced.
    pub fn new(
        results: Vec<T>,
        count: u64,
        request: PageRequest,
        path: &str,
        query: Option<&str>,
    ) -> Self {
        let shown = request.offset() + results.len() as u64;
        let next = (shown < count).then(|| page_link(path, query, request.page + 1));
        let previous = (request.page > 1).then(|| page_link(path, query, request.page - 1));
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

fn page_link(path: &str, query: Option<&str>, page: u32) -> String {
    let mut pairs: Vec<&str> = query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("page"))
        .collect();
    let page_pair = format!("page={page}");
    pairs.push(&page_pair);
    format!("{path}?{}", pairs.join("&"))
}
