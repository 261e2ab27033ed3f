use crate::shared::errors::DomainError;
use crate::shared::pagination::{PaginationParams, MAX_PAGE_LIMIT};

/// Resolve optional page/limit into bounded pagination.
///
/// Missing values fall back to page 1 / limit 10. Out-of-range values are
/// rejected rather than clamped.
pub fn validate_pagination(
    page: Option<u64>,
    limit: Option<u64>,
) -> Result<PaginationParams, DomainError> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(10);

    if page < 1 {
        return Err(DomainError::Validation("page must be >= 1".into()));
    }
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(DomainError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }

    Ok(PaginationParams { page, limit })
}

/// Trim an optional free-text field, mapping whitespace-only input to `None`.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = validate_pagination(None, None).unwrap();
        assert_eq!(p, PaginationParams { page: 1, limit: 10 });
    }

    #[test]
    fn pagination_rejects_zero_page() {
        assert!(validate_pagination(Some(0), None).is_err());
    }

    #[test]
    fn pagination_limit_bounds() {
        assert!(validate_pagination(None, Some(0)).is_err());
        assert!(validate_pagination(None, Some(101)).is_err());
        assert_eq!(validate_pagination(None, Some(100)).unwrap().limit, 100);
        assert_eq!(validate_pagination(None, Some(1)).unwrap().limit, 1);
    }

    #[test]
    fn trim_optional_drops_blank() {
        assert_eq!(trim_optional(Some("  hi ")), Some("hi".to_string()));
        assert_eq!(trim_optional(Some("   ")), None);
        assert_eq!(trim_optional(None), None);
    }
}
