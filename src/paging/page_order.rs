use super::error::PagingError;
use super::types::{SortDirection, SortField, SortOrder};

pub struct PageOrder;

impl PageOrder {
    /// Parse one `sort` query value: `prop[,prop...][,asc|desc]`.
    ///
    /// The trailing direction applies to every property in the value.
    pub fn parse(value: &str) -> Result<Vec<SortOrder>, PagingError> {
        let mut tokens: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        let direction = match tokens.last().and_then(|t| SortDirection::parse(t)) {
            Some(dir) => {
                tokens.pop();
                dir
            }
            None => SortDirection::Asc,
        };

        if tokens.is_empty() {
            return Err(PagingError::MissingProperty(value.to_string()));
        }

        tokens
            .into_iter()
            .map(|name| {
                SortField::parse(name)
                    .map(|field| SortOrder { field, direction })
                    .ok_or_else(|| PagingError::UnknownProperty(name.to_string()))
            })
            .collect()
    }

    /// `ORDER BY` clause with `id` appended as a stable tiebreaker.
    pub fn generate(orders: &[SortOrder]) -> String {
        let mut parts: Vec<String> = orders
            .iter()
            .map(|o| format!("\"{}\" {}", o.field.column(), o.direction.to_sql()))
            .collect();
        if !orders.iter().any(|o| o.field == SortField::Id) {
            parts.push("\"id\" ASC".to_string());
        }
        format!("ORDER BY {}", parts.join(", "))
    }
}
