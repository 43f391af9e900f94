use super::error::FilterError;
use super::filter::validate_identifier;
use super::types::{FilterOp, FilterValue, FilterWhereInfo, SqlParam};

pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render `conditions` joined with AND. Parameters are numbered from
    /// `starting_param_index + 1`.
    pub fn generate(
        conditions: &[FilterWhereInfo],
        starting_param_index: usize,
    ) -> Result<(String, Vec<SqlParam>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let clause = filter_where.build(conditions)?;
        Ok((clause, filter_where.param_values))
    }

    fn build(&mut self, conditions: &[FilterWhereInfo]) -> Result<String, FilterError> {
        let mut sql_conditions = Vec::with_capacity(conditions.len());
        for condition in conditions {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }
        Ok(if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") })
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        validate_identifier(&condition.column).map_err(FilterError::InvalidColumn)?;
        let quoted_column = format!("\"{}\"", condition.column);

        match (condition.operator, &condition.data) {
            (FilterOp::Eq, FilterValue::Param(value)) => {
                Ok(format!("{} = {}", quoted_column, self.param(value.clone())))
            }
            (FilterOp::Ne, FilterValue::Param(value)) => {
                Ok(format!("{} <> {}", quoted_column, self.param(value.clone())))
            }
            (FilterOp::In, FilterValue::List(values)) => {
                if values.is_empty() {
                    return Ok("1=0".to_string());
                }
                let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
            }
            (FilterOp::Find, FilterValue::Subquery(sub)) => {
                validate_identifier(&sub.table).map_err(FilterError::InvalidTableName)?;
                validate_identifier(&sub.select_column).map_err(FilterError::InvalidColumn)?;
                // Nested conditions continue the outer parameter numbering
                let mut nested = FilterWhere::new(self.param_index);
                let nested_sql = nested.build(&sub.conditions)?;
                self.param_index = nested.param_index;
                self.param_values.extend(nested.param_values);
                Ok(format!(
                    "{} IN (SELECT \"{}\" FROM \"{}\" WHERE {})",
                    quoted_column, sub.select_column, sub.table, nested_sql
                ))
            }
            (FilterOp::Null, FilterValue::Flag(true)) => Ok(format!("{} IS NULL", quoted_column)),
            (FilterOp::Null, FilterValue::Flag(false)) => Ok(format!("{} IS NOT NULL", quoted_column)),
            (op, data) => Err(FilterError::InvalidOperatorData(format!(
                "{:?} cannot be applied to {:?}",
                op, data
            ))),
        }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
