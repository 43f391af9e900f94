//! Generic attribute search over the scheduler entities.
//!
//! Query-string criteria such as `?firstName=Urist&owner.email=a@b.co` are
//! resolved against a static field table declared by each entity. The
//! resulting [`SearchQuery`] renders to parameterised SQL for the database
//! store and can also be evaluated directly against loaded aggregates.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::filter::{FilterWhereInfo, SqlParam, SubFilter};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("Attribute {key} does not exist on entity {entity}")]
    UnknownAttribute { key: String, entity: &'static str },

    #[error("Too many search criteria: {given} given, at most {max} allowed")]
    TooManyCriteria { given: usize, max: usize },

    /// The value can never equal a stored value of that attribute.
    #[error("Value {value:?} is not valid for attribute {key}")]
    UnmatchableValue { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Uuid,
    Date,
    Integer,
}

impl FieldKind {
    pub fn parse(&self, raw: &str) -> Option<SqlParam> {
        match self {
            FieldKind::Text => Some(SqlParam::Text(raw.to_string())),
            FieldKind::Uuid => Uuid::parse_str(raw.trim()).ok().map(SqlParam::Uuid),
            FieldKind::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok().map(SqlParam::Date),
            FieldKind::Integer => raw.trim().parse::<i64>().ok().map(SqlParam::Int),
        }
    }
}

/// One searchable attribute: `key` as it appears in the API, `column` in the table.
#[derive(Debug, PartialEq, Eq)]
pub struct SearchField {
    pub key: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

/// A many-to-one link whose target attributes can be searched as `<key>.<field>`.
#[derive(Debug, PartialEq, Eq)]
pub struct Relation {
    pub key: &'static str,
    pub column: &'static str,
    pub entity: &'static str,
    pub table: &'static str,
    pub fields: &'static [SearchField],
}

/// Attribute lookup on a loaded value, keyed by [`SearchField::key`].
pub trait FieldValues {
    fn field_value(&self, key: &str) -> Option<SqlParam>;
}

pub trait Searchable: FieldValues {
    const ENTITY: &'static str;
    const TABLE: &'static str;

    fn fields() -> &'static [SearchField];

    fn relations() -> &'static [Relation] {
        &[]
    }

    /// The loaded target of relation `key`, if it is set.
    fn related(&self, _key: &str) -> Option<&dyn FieldValues> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub relation: Option<&'static Relation>,
    pub field: &'static SearchField,
    pub value: SqlParam,
}

impl Criterion {
    fn to_filter(&self) -> FilterWhereInfo {
        let condition = FilterWhereInfo::eq(self.field.column, self.value.clone());
        match self.relation {
            None => condition,
            Some(relation) => FilterWhereInfo::find(
                relation.column,
                SubFilter {
                    table: relation.table.to_string(),
                    select_column: "id".to_string(),
                    conditions: vec![condition],
                },
            ),
        }
    }
}

/// Conjunction of equality criteria against one entity type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchQuery {
    pub criteria: Vec<Criterion>,
}

impl SearchQuery {
    pub fn to_filter(&self) -> Vec<FilterWhereInfo> {
        self.criteria.iter().map(Criterion::to_filter).collect()
    }

    pub fn matches<T: Searchable>(&self, entity: &T) -> bool {
        self.criteria.iter().all(|criterion| {
            let target: Option<&dyn FieldValues> = match criterion.relation {
                None => Some(entity as &dyn FieldValues),
                Some(relation) => entity.related(relation.key),
            };
            target
                .and_then(|t| t.field_value(criterion.field.key))
                .map_or(false, |v| v == criterion.value)
        })
    }
}

/// Stateless builder of [`SearchQuery`] values.
#[derive(Debug, Clone, Copy)]
pub struct EntitySearcher {
    max_criteria: usize,
}

impl EntitySearcher {
    pub fn new(max_criteria: usize) -> Self {
        Self { max_criteria }
    }

    pub fn search<T: Searchable>(&self, criteria: &HashMap<String, String>) -> Result<SearchQuery, SearchError> {
        if criteria.len() > self.max_criteria {
            return Err(SearchError::TooManyCriteria { given: criteria.len(), max: self.max_criteria });
        }

        // Sorted so the generated SQL is stable for identical requests
        let sorted: BTreeMap<&String, &String> = criteria.iter().collect();
        let mut query = SearchQuery::default();

        for (key, value) in sorted {
            let (relation, field) = Self::resolve::<T>(key)?;
            let parsed = field.kind.parse(value).ok_or_else(|| SearchError::UnmatchableValue {
                key: key.clone(),
                value: value.clone(),
            })?;
            query.criteria.push(Criterion { relation, field, value: parsed });
        }

        Ok(query)
    }

    fn resolve<T: Searchable>(key: &str) -> Result<(Option<&'static Relation>, &'static SearchField), SearchError> {
        let unknown = || SearchError::UnknownAttribute { key: key.to_string(), entity: T::ENTITY };

        match key.split_once('.') {
            None => T::fields()
                .iter()
                .find(|f| f.key == key)
                .map(|f| (None, f))
                .ok_or_else(unknown),
            Some((relation_key, field_key)) => {
                let relation = T::relations().iter().find(|r| r.key == relation_key).ok_or_else(unknown)?;
                let field = relation.fields.iter().find(|f| f.key == field_key).ok_or_else(unknown)?;
                Ok((Some(relation), field))
            }
        }
    }
}
