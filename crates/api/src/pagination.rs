//! Shared pagination query parameters.

use pulse_common::AppResult;
use serde::Deserialize;
use validator::Validate;

/// Limit/offset pagination, bounded to pages of at most 100 rows.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: u64,

    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Pagination {
    /// Validate the bounds, returning the parameters on success.
    pub fn checked(self) -> AppResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = Pagination::default();
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_limit_bounds() {
        assert!(Pagination { limit: 0, offset: 0 }.checked().is_err());
        assert!(Pagination { limit: 101, offset: 0 }.checked().is_err());
        assert!(Pagination { limit: 100, offset: 0 }.checked().is_ok());
        assert!(Pagination { limit: 1, offset: 9999 }.checked().is_ok());
    }
}
