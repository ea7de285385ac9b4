//! This module defines the common functionality for paging statement data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The page size to use when a request omits one or supplies one
    /// outside the allowed range.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_page_size: 200,
        }
    }
}

impl PaginationConfig {
    /// Resolve the requested page number.
    ///
    /// Non-positive values silently fall back to the default page rather
    /// than erroring. This is fixed policy, not an oversight.
    pub fn resolve_page(&self, requested: Option<i64>) -> u64 {
        match requested {
            Some(page) if page > 0 => page as u64,
            _ => self.default_page,
        }
    }

    /// Resolve the requested page size.
    ///
    /// Values outside `[1, max_page_size]` silently fall back to the
    /// default size rather than erroring. This is fixed policy, not an
    /// oversight.
    pub fn resolve_page_size(&self, requested: Option<i64>) -> u64 {
        match requested {
            Some(size) if size > 0 && (size as u64) <= self.max_page_size => size as u64,
            _ => self.default_page_size,
        }
    }
}

/// The row offset of `page` given `page_size`, with page numbers starting
/// at 1.
pub fn offset(page: u64, page_size: u64) -> u64 {
    (page - 1) * page_size
}

#[cfg(test)]
mod tests {
    use crate::pagination::{PaginationConfig, offset};

    #[test]
    fn resolves_valid_page_and_size() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve_page(Some(3)), 3);
        assert_eq!(config.resolve_page_size(Some(50)), 50);
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve_page(None), 1);
        assert_eq!(config.resolve_page_size(None), 20);
    }

    #[test]
    fn zero_page_size_falls_back_to_default() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve_page_size(Some(0)), 20);
    }

    #[test]
    fn oversized_page_size_falls_back_to_default() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve_page_size(Some(500)), 20);
    }

    #[test]
    fn page_size_boundaries_are_inclusive() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve_page_size(Some(1)), 1);
        assert_eq!(config.resolve_page_size(Some(200)), 200);
    }

    #[test]
    fn negative_page_falls_back_to_default() {
        let config = PaginationConfig::default();

        assert_eq!(config.resolve_page(Some(-2)), 1);
    }

    #[test]
    fn offset_skips_prior_pages() {
        assert_eq!(offset(1, 20), 0);
        assert_eq!(offset(3, 20), 40);
    }
}
