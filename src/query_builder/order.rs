use crate::error::{PfModelError, PfModelResult};
use crate::keys::KeyShape;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of an ORDER BY term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Ascending,
    #[serde(rename = "DESC", alias = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortOrder {
    type Err = PfModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Ascending),
            "DESC" => Ok(SortOrder::Descending),
            other => Err(PfModelError::InvalidArgument(format!(
                "sort order \"{other}\" is neither ASC nor DESC"
            ))),
        }
    }
}

/// Build ` ORDER BY ...` from caller text such as `"name, version_sort DESC"`.
///
/// Each term must name a key column of `shape` (or `version_sort`),
/// optionally followed by a direction. Blank input yields an empty clause.
pub fn order_clause(shape: KeyShape, order_by: &str) -> PfModelResult<String> {
    order_clause_with_default(shape, order_by, None)
}

/// Like [`order_clause`], giving `default` to every term without its own
/// direction. Explicit directions are kept.
pub fn order_clause_with_default(
    shape: KeyShape,
    order_by: &str,
    default: Option<SortOrder>,
) -> PfModelResult<String> {
    if order_by.trim().is_empty() {
        return Ok(String::new());
    }

    let mut terms = Vec::new();
    for term in order_by.split(',') {
        let mut words = term.split_whitespace();
        let column = words.next().ok_or_else(|| {
            PfModelError::InvalidArgument(format!("empty term in order clause \"{order_by}\""))
        })?;
        if !shape.is_orderable(column) {
            return Err(PfModelError::InvalidArgument(format!(
                "\"{column}\" is not an orderable column of a {shape} entity"
            )));
        }
        let direction = words.next().map(SortOrder::from_str).transpose()?.or(default);
        if words.next().is_some() {
            return Err(PfModelError::InvalidArgument(format!(
                "malformed order term \"{}\"",
                term.trim()
            )));
        }
        terms.push(match direction {
            Some(direction) => format!("{column} {direction}"),
            None => column.to_string(),
        });
    }

    Ok(format!(" ORDER BY {}", terms.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_clause_accepts_key_columns() {
        assert_eq!(
            order_clause(KeyShape::Timestamp, "time_stamp desc, name").unwrap(),
            " ORDER BY time_stamp DESC, name"
        );
        assert_eq!(order_clause(KeyShape::Concept, "   ").unwrap(), "");
    }

    #[test]
    fn test_order_clause_rejects_unknown_columns() {
        assert!(order_clause(KeyShape::Concept, "body").is_err());
        assert!(order_clause(KeyShape::Concept, "name; DROP TABLE x").is_err());
        assert!(order_clause(KeyShape::Concept, "name ASC extra").is_err());
        assert!(order_clause(KeyShape::Concept, "name,").is_err());
        assert!(order_clause(KeyShape::Concept, "name sideways").is_err());
    }

    #[test]
    fn test_default_direction_applies_to_bare_terms() {
        assert_eq!(
            order_clause_with_default(KeyShape::Timestamp, "name, time_stamp", Some(SortOrder::Descending)).unwrap(),
            " ORDER BY name DESC, time_stamp DESC"
        );
        assert_eq!(
            order_clause_with_default(KeyShape::Timestamp, "time_stamp DESC, name", Some(SortOrder::Ascending))
                .unwrap(),
            " ORDER BY time_stamp DESC, name ASC"
        );
        assert_eq!(
            order_clause_with_default(KeyShape::Concept, " ", Some(SortOrder::Ascending)).unwrap(),
            ""
        );
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Descending);
        assert_eq!(SortOrder::default(), SortOrder::Ascending);
        let parsed: SortOrder = serde_json::from_str("\"DESC\"").unwrap();
        assert_eq!(parsed, SortOrder::Descending);
    }
}
