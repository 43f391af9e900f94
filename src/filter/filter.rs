use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterData, FilterOrderInfo, FilterWhereInfo, SqlResult};

pub struct Filter {
    table_name: String,
    conditions: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        validate_identifier(&table_name).map_err(FilterError::InvalidTableName)?;
        Ok(Self {
            table_name,
            conditions: vec![],
            order_data: vec![],
            limit: None,
            offset: None,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        self.conditions = data.conditions;
        if let Some(order) = data.order { self.order(&order)?; }
        if let Some(limit) = data.limit { self.limit(limit, data.offset)?; }
        Ok(self)
    }

    pub fn where_info(&mut self, condition: FilterWhereInfo) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    pub fn order(&mut self, order_spec: &str) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(order_spec)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        if let Some(off) = offset {
            if off < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); }
        }
        self.limit = Some(limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0)?;
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = self.build_limit_clause();

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0)?;
        let query = format!("SELECT COUNT(*) as count FROM \"{}\" WHERE {}", self.table_name, where_clause);
        Ok(SqlResult { query, params })
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            _ => String::new(),
        }
    }
}

/// Table and column names are interpolated into SQL, so only plain identifiers pass.
pub(crate) fn validate_identifier(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return Err(format!("Invalid identifier: {:?}", name)),
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(format!("Invalid identifier: {:?}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::SqlParam;

    #[test]
    fn builds_select_with_where_order_and_limit() {
        let mut filter = Filter::new("projects").unwrap();
        filter
            .where_info(FilterWhereInfo::eq("name", SqlParam::Text("Apollo".into())))
            .order("start_date desc")
            .unwrap()
            .limit(10, Some(20))
            .unwrap();

        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"projects\" WHERE \"name\" = $1 ORDER BY \"start_date\" DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec![SqlParam::Text("Apollo".into())]);
    }

    #[test]
    fn count_sql_shares_where_clause() {
        let mut filter = Filter::new("resources").unwrap();
        filter.where_info(FilterWhereInfo::eq("email", SqlParam::Text("a@b.co".into())));
        let sql = filter.to_count_sql().unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) as count FROM \"resources\" WHERE \"email\" = $1");
    }

    #[test]
    fn rejects_bad_identifiers_and_limits() {
        assert!(Filter::new("users; --").is_err());
        assert!(Filter::new("").is_err());
        let mut filter = Filter::new("users").unwrap();
        assert!(filter.limit(-1, None).is_err());
        assert!(filter.limit(5, Some(-2)).is_err());
    }
}
