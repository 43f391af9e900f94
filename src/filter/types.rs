use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `$eq`
    Eq,
    /// `$ne`
    Ne,
    /// `$in`
    In,
    /// `$find`: column value is produced by a subquery on another table
    Find,
    /// `$null`
    Null,
}

/// A value bound to a positional `$n` parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
    Uuid(Uuid),
    Date(NaiveDate),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Param(SqlParam),
    List(Vec<SqlParam>),
    Subquery(Box<SubFilter>),
    Flag(bool),
}

/// `SELECT "<select_column>" FROM "<table>" WHERE <conditions>`
#[derive(Debug, Clone, PartialEq)]
pub struct SubFilter {
    pub table: String,
    pub select_column: String,
    pub conditions: Vec<FilterWhereInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: FilterValue,
}

impl FilterWhereInfo {
    pub fn eq(column: impl Into<String>, value: SqlParam) -> Self {
        Self { column: column.into(), operator: FilterOp::Eq, data: FilterValue::Param(value) }
    }

    pub fn ne(column: impl Into<String>, value: SqlParam) -> Self {
        Self { column: column.into(), operator: FilterOp::Ne, data: FilterValue::Param(value) }
    }

    pub fn in_list(column: impl Into<String>, values: Vec<SqlParam>) -> Self {
        Self { column: column.into(), operator: FilterOp::In, data: FilterValue::List(values) }
    }

    pub fn find(column: impl Into<String>, sub: SubFilter) -> Self {
        Self { column: column.into(), operator: FilterOp::Find, data: FilterValue::Subquery(Box::new(sub)) }
    }

    pub fn is_null(column: impl Into<String>, null: bool) -> Self {
        Self { column: column.into(), operator: FilterOp::Null, data: FilterValue::Flag(null) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Everything a repository read can be narrowed by.
#[derive(Debug, Clone, Default)]
pub struct FilterData {
    pub conditions: Vec<FilterWhereInfo>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FilterData {
    pub fn conditions(conditions: Vec<FilterWhereInfo>) -> Self {
        Self { conditions, ..Default::default() }
    }
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

impl From<Uuid> for SqlParam {
    fn from(value: Uuid) -> Self {
        SqlParam::Uuid(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        SqlParam::Int(value.into())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}
