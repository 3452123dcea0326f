//! Offset pagination for catalog listings.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// One page of a `limit`/`offset` listing.
///
/// `limit` is non-zero by construction. Callers doing infinite scroll keep
/// the last request and call [`PageRequest::next`]; overlapping pages are not
/// deduplicated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of records to return.
    pub limit: NonZeroU32,
    /// Number of records to skip.
    pub offset: u32,
}

impl PageRequest {
    /// Default page size used by listings.
    pub const DEFAULT_LIMIT: NonZeroU32 = NonZeroU32::MIN.saturating_add(9);

    /// Create a page request.
    #[must_use]
    pub const fn new(limit: NonZeroU32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// The first page with the given size.
    #[must_use]
    pub const fn first(limit: NonZeroU32) -> Self {
        Self { limit, offset: 0 }
    }

    /// The page directly after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit.get()),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(Self::DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page() {
        let page = PageRequest::default();
        assert_eq!(page.limit.get(), 10);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_next_advances_by_limit() {
        let page = PageRequest::default().next().next();
        assert_eq!(page.offset, 20);
        assert_eq!(page.limit.get(), 10);
    }

    #[test]
    fn test_next_saturates() {
        let page = PageRequest::new(NonZeroU32::MAX, u32::MAX - 1).next();
        assert_eq!(page.offset, u32::MAX);
    }
}
