//! Free-text and status filters attached to a list

const ALL: &str = "ALL";

/// Status filter; `All` is never sent to the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    /// Parse a UI value; blank or `"ALL"` (any case) means no filter
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL) {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub search: Option<String>,
    pub status: StatusFilter,
}

impl ListFilters {
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Filter parameters that are actually applied, in `(key, value)` form.
    /// Blank search and `All` status are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                pairs.push(("search", search.to_string()));
            }
        }
        if let StatusFilter::Only(ref status) = self.status {
            pairs.push(("status", status.clone()));
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_applies_nothing() {
        assert!(ListFilters::default().is_empty());
    }

    #[test]
    fn test_blank_search_and_all_status_omitted() {
        let filters = ListFilters::default()
            .with_search("   ")
            .with_status(StatusFilter::parse("all"));
        assert!(filters.query_pairs().is_empty());
    }

    #[test]
    fn test_search_is_trimmed() {
        let filters = ListFilters::default()
            .with_search("  quito ")
            .with_status(StatusFilter::parse("ACT"));
        assert_eq!(
            filters.query_pairs(),
            vec![("search", "quito".to_string()), ("status", "ACT".to_string())]
        );
    }
}
