use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::models::DocumentFilter;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid column name: {0}")]
    InvalidColumn(String),
}

/// Conjunction of column equality conditions.
///
/// Renders to PostgREST query parameters (`column=eq.value`) for the remote
/// store, and evaluates directly against JSON rows for the in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: Vec<(String, String)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self {
            conditions: vec![("id".to_string(), id.to_string())],
        }
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Result<Self, FilterError> {
        if !is_valid_column(column) {
            return Err(FilterError::InvalidColumn(column.to_string()));
        }
        self.conditions.push((column.to_string(), value.into()));
        Ok(self)
    }

    /// Add a condition only when `value` is present and non-empty.
    pub fn eq_opt(self, column: &str, value: Option<&str>) -> Result<Self, FilterError> {
        match value {
            Some(v) if !v.is_empty() => self.eq(column, v),
            _ => Ok(self),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// PostgREST query pairs, always selecting every column.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.conditions.len() + 1);
        pairs.push(("select".to_string(), "*".to_string()));
        for (column, value) in &self.conditions {
            pairs.push((column.clone(), format!("eq.{}", value)));
        }
        pairs
    }

    /// Whether a JSON row satisfies every condition.
    pub fn matches(&self, row: &Value) -> bool {
        self.conditions.iter().all(|(column, expected)| match row.get(column) {
            Some(Value::String(s)) => s == expected,
            Some(Value::Number(n)) => n.to_string() == *expected,
            Some(Value::Bool(b)) => b.to_string() == *expected,
            _ => false,
        })
    }
}

impl TryFrom<&DocumentFilter> for Filter {
    type Error = FilterError;

    fn try_from(filter: &DocumentFilter) -> Result<Self, Self::Error> {
        Filter::new()
            .eq_opt("type", filter.doc_type.as_deref())?
            .eq_opt("committee", filter.committee.as_deref())?
            .eq_opt("country", filter.country.as_deref())
    }
}

fn is_valid_column(column: &str) -> bool {
    !column.is_empty()
        && column.len() <= 63
        && column.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !column.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_filter_to_query() {
        let filter = Filter::try_from(&DocumentFilter {
            doc_type: Some("resolution".to_string()),
            committee: None,
            country: Some("Côte d'Ivoire".to_string()),
        })
        .unwrap();

        assert_eq!(
            filter.to_query(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("type".to_string(), "eq.resolution".to_string()),
                ("country".to_string(), "eq.Côte d'Ivoire".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let filter = Filter::try_from(&DocumentFilter {
            doc_type: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_rejects_unsafe_column_names() {
        assert!(Filter::new().eq("email", "a@x.com").is_ok());
        assert!(Filter::new().eq("email;drop", "x").is_err());
        assert!(Filter::new().eq("", "x").is_err());
        assert!(Filter::new().eq("1col", "x").is_err());
    }

    #[test]
    fn test_matches_rows() {
        let row = json!({ "type": "speech", "committee": "GA1", "country": "Chile" });

        let hit = Filter::new().eq("type", "speech").unwrap().eq("country", "Chile").unwrap();
        let miss = Filter::new().eq("committee", "GA3").unwrap();
        let missing_column = Filter::new().eq("topic", "x").unwrap();

        assert!(hit.matches(&row));
        assert!(!miss.matches(&row));
        assert!(!missing_column.matches(&row));
        assert!(Filter::new().matches(&row));
    }
}
