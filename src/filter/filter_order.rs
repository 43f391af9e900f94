use super::error::FilterError;
use super::filter::validate_identifier;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse `"created_date desc, name"` into order terms. Direction defaults to ascending.
    pub fn validate_and_parse(order: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in order.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                validate_identifier(col).map_err(FilterError::InvalidColumn)?;
                let sort = match it.next() {
                    None => SortDirection::Asc,
                    Some(dir) if dir.eq_ignore_ascii_case("asc") => SortDirection::Asc,
                    Some(dir) if dir.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                    Some(dir) => {
                        return Err(FilterError::InvalidOperatorData(format!("Unknown sort direction: {}", dir)))
                    }
                };
                out.push(FilterOrderInfo { column: col.to_string(), sort });
            }
        }
        Ok(out)
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}
