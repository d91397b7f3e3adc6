use super::BindValue;
use crate::constants::query::{PLACEHOLDER_PREFIX, TABLE_TOKEN};
use crate::error::{PfModelError, PfModelResult};
use crate::persistence::EntityName;
use std::collections::{BTreeMap, HashMap};

/// Query text containing the table token, not yet bound to an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    text: String,
}

impl QueryTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Append a clause fragment
    pub fn push(mut self, fragment: &str) -> Self {
        self.text.push_str(fragment);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Substitute the table token with the registered entity name
    pub fn render(&self, entity: &EntityName) -> NamedQuery {
        NamedQuery::new(self.text.replace(TABLE_TOKEN, entity.as_str()))
    }
}

/// A rendered query with named placeholders and their bound values
#[derive(Debug, Clone, PartialEq)]
pub struct NamedQuery {
    sql: String,
    parameters: BTreeMap<String, BindValue>,
    max_results: Option<usize>,
}

impl NamedQuery {
    fn new(sql: String) -> Self {
        Self {
            sql,
            parameters: BTreeMap::new(),
            max_results: None,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &BTreeMap<String, BindValue> {
        &self.parameters
    }

    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    pub fn set_parameter(&mut self, name: &str, value: impl Into<BindValue>) -> &mut Self {
        self.parameters.insert(name.to_string(), value.into());
        self
    }

    /// Limit the number of rows returned; zero means unlimited
    pub fn set_max_results(&mut self, max_results: usize) -> &mut Self {
        self.max_results = (max_results > 0).then_some(max_results);
        self
    }

    /// Translate `:name` placeholders into `$n` positional parameters.
    ///
    /// A name used more than once maps to the same position. Quoted literals
    /// are copied untouched. Every placeholder must have a bound value.
    pub fn to_positional(&self) -> PfModelResult<(String, Vec<BindValue>)> {
        let mut sql = String::with_capacity(self.sql.len() + 16);
        let mut values = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut chars = self.sql.chars().peekable();
        let mut in_literal = false;

        while let Some(c) = chars.next() {
            if c == '\'' {
                in_literal = !in_literal;
                sql.push(c);
                continue;
            }
            if in_literal || c != PLACEHOLDER_PREFIX {
                sql.push(c);
                continue;
            }
            // `::` is a cast, not a placeholder
            if chars.peek() == Some(&PLACEHOLDER_PREFIX) {
                sql.push(c);
                sql.push(PLACEHOLDER_PREFIX);
                chars.next();
                continue;
            }
            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                sql.push(c);
                continue;
            }

            let position = match positions.get(&name) {
                Some(position) => *position,
                None => {
                    let value = self.parameters.get(&name).ok_or_else(|| {
                        PfModelError::InvalidArgument(format!(
                            "query parameter \"{name}\" has not been set in \"{}\"",
                            self.sql
                        ))
                    })?;
                    values.push(value.clone());
                    positions.insert(name, values.len());
                    values.len()
                }
            };
            sql.push('$');
            sql.push_str(&position.to_string());
        }

        if let Some(limit) = self.max_results {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok((sql, values))
    }
}
