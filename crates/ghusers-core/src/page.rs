use serde::Deserialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A 1-indexed page window over a normalized username list.
///
/// No invariant is enforced on the values: non-positive sizes and
/// out-of-range pages simply produce short or empty slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl PageRequest {
    #[must_use]
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// Slices `items` to the window described by `request`.
///
/// `skip = (page - 1) * page_size` and `take = page_size`. A negative skip is
/// clamped to zero, so `page = 0` returns the same window as `page = 1`. A
/// non-positive `page_size` always yields an empty result.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Vec<T> {
    if request.page_size <= 0 {
        return Vec::new();
    }

    let skip = request
        .page
        .saturating_sub(1)
        .saturating_mul(request.page_size)
        .max(0);
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let take = usize::try_from(request.page_size).unwrap_or(usize::MAX);

    items.iter().skip(skip).take(take).cloned().collect()
}
