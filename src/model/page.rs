/// One page of a list endpoint plus whatever position metadata the server sent.
///
/// The metadata is carried exactly as decoded, out-of-range values included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub current_page: Option<i64>,
    pub last_page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            current_page: None,
            last_page: None,
            per_page: None,
            total: None,
        }
    }

    /// True only when both positions are known and more pages follow.
    pub fn has_more(&self) -> bool {
        match (self.current_page, self.last_page) {
            (Some(current), Some(last)) => current < last,
            _ => false,
        }
    }

    pub fn next_page(&self) -> Option<i64> {
        if self.has_more() {
            self.current_page.map(|p| p + 1)
        } else {
            None
        }
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
