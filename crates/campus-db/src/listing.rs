//! Paginated listing queries.
//!
//! A [`ListQuery`] describes only the filter stages of a listing: the projected
//! columns, the joined relation, and a set of bound equality filters. From that one
//! description it builds two independent statements:
//!
//! - [`ListQuery::page_query`] appends ordering, `LIMIT` and `OFFSET` for one page;
//! - [`ListQuery::count_query`] wraps the same filters in `SELECT COUNT(*)`.
//!
//! The count never sees the paging clauses, so the total is the same for every
//! page window.
//!
//! ```ignore
//! let page = ListQuery::new(EXAM_COLUMNS, "exams e")
//!     .sortable(&[("createdAt", "e.created_at"), ("name", "e.name")])
//!     .filter_eq("e.session", session)
//!     .fetch_page::<Exam>(&db, &paging)
//!     .await?;
//! ```

use campus_core::pagination::{Page, PageMeta, PagingRequest, SortKey};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, postgres::PgRow};
use uuid::Uuid;

/// A value bound into a filter predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Uuid(Uuid),
    Text(String),
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone)]
struct Filter {
    column: &'static str,
    value: FilterValue,
}

#[derive(Debug, Clone)]
pub struct ListQuery {
    select: &'static str,
    from: &'static str,
    filters: Vec<Filter>,
    sort_columns: &'static [(&'static str, &'static str)],
}

impl ListQuery {
    /// `select` is the projection, `from` the relation including any joins.
    pub fn new(select: &'static str, from: &'static str) -> Self {
        Self {
            select,
            from,
            filters: Vec::new(),
            sort_columns: &[],
        }
    }

    /// Maps public sort field names to SQL columns. Only mapped fields can be
    /// ordered by; the first entry is the fallback order.
    #[must_use]
    pub fn sortable(mut self, columns: &'static [(&'static str, &'static str)]) -> Self {
        self.sort_columns = columns;
        self
    }

    #[must_use]
    pub fn filter_eq(mut self, column: &'static str, value: impl Into<FilterValue>) -> Self {
        self.filters.push(Filter {
            column,
            value: value.into(),
        });
        self
    }

    fn push_filters(&self, builder: &mut QueryBuilder<'static, Postgres>) {
        for (index, filter) in self.filters.iter().enumerate() {
            builder.push(if index == 0 { " WHERE " } else { " AND " });
            builder.push(filter.column);
            builder.push(" = ");
            match &filter.value {
                FilterValue::Uuid(id) => builder.push_bind(*id),
                FilterValue::Text(text) => builder.push_bind(text.clone()),
            };
        }
    }

    fn order_by(&self, sort: &[SortKey]) -> Option<String> {
        let mut clauses: Vec<String> = sort
            .iter()
            .filter_map(|key| {
                self.sort_columns
                    .iter()
                    .find(|(field, _)| *field == key.field)
                    .map(|(_, column)| format!("{} {}", column, key.direction.as_sql()))
            })
            .collect();

        if clauses.is_empty() {
            let (_, column) = self.sort_columns.first()?;
            clauses.push(format!("{column} ASC"));
        }

        Some(clauses.join(", "))
    }

    /// Statement returning one page of rows.
    pub fn page_query(&self, paging: &PagingRequest) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT ");
        builder.push(self.select);
        builder.push(" FROM ");
        builder.push(self.from);
        self.push_filters(&mut builder);

        if let Some(order) = self.order_by(&paging.sort) {
            builder.push(" ORDER BY ");
            builder.push(order);
        }

        builder.push(" LIMIT ");
        builder.push_bind(paging.limit);
        builder.push(" OFFSET ");
        builder.push_bind(paging.offset());
        builder
    }

    /// Statement counting every row the filters match.
    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM ");
        builder.push(self.from);
        self.push_filters(&mut builder);
        builder
    }

    /// Total number of matching rows; 0 when nothing matches.
    pub async fn count(&self, db: &PgPool) -> Result<i64, sqlx::Error> {
        let mut builder = self.count_query();
        let total: i64 = builder.build_query_scalar().fetch_one(db).await?;
        Ok(total)
    }

    /// Runs the page and count statements and assembles the page metadata.
    pub async fn fetch_page<T>(&self, db: &PgPool, paging: &PagingRequest) -> Result<Page<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut builder = self.page_query(paging);
        let items = builder.build_query_as::<T>().fetch_all(db).await?;
        let total = self.count(db).await?;

        tracing::debug!(
            total,
            page = paging.page,
            limit = paging.limit,
            returned = items.len(),
            "Listing fetched"
        );

        Ok(Page {
            items,
            meta: PageMeta::from_total(total, paging),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::pagination::SortDirection;

    const COLUMNS: &[(&str, &str)] = &[("createdAt", "e.created_at"), ("name", "e.name")];

    fn exams() -> ListQuery {
        ListQuery::new("e.id, e.name, e.session", "exams e").sortable(COLUMNS)
    }

    #[test]
    fn test_page_query_appends_paging_clauses() {
        let query = exams().filter_eq("e.session", "2023-2024");
        let builder = query.page_query(&PagingRequest::new(2, 10));
        assert_eq!(
            builder.sql(),
            "SELECT e.id, e.name, e.session FROM exams e WHERE e.session = $1 \
             ORDER BY e.created_at ASC LIMIT $2 OFFSET $3"
        );
    }

    #[test]
    fn test_count_query_has_no_paging_clauses() {
        let query = exams().filter_eq("e.session", "2023-2024");
        let builder = query.count_query();
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM exams e WHERE e.session = $1"
        );
    }

    #[test]
    fn test_count_query_independent_of_page_window() {
        let query = exams().filter_eq("e.name", "MIDTERM");
        let before = query.count_query().sql().to_string();
        let _ = query.page_query(&PagingRequest::new(7, 3));
        let _ = query.page_query(&PagingRequest::new(1, 100));
        assert_eq!(query.count_query().sql(), before);
    }

    #[test]
    fn test_multiple_filters_joined_with_and() {
        let id = Uuid::new_v4();
        let query = ListQuery::new("s.id", "subjects s")
            .filter_eq("s.class_id", id)
            .filter_eq("s.name", "PHYSICS");
        assert_eq!(
            query.count_query().sql(),
            "SELECT COUNT(*) FROM subjects s WHERE s.class_id = $1 AND s.name = $2"
        );
    }

    #[test]
    fn test_unknown_sort_field_uses_fallback() {
        let paging = PagingRequest {
            sort: vec![SortKey {
                field: "password".to_string(),
                direction: SortDirection::Desc,
            }],
            ..PagingRequest::default()
        };
        let sql = exams().page_query(&paging).sql().to_string();
        assert!(sql.contains("ORDER BY e.created_at ASC"));
        assert!(!sql.contains("password"));
    }

    #[test]
    fn test_mapped_sort_fields_in_order() {
        let paging = PagingRequest {
            sort: vec![
                SortKey {
                    field: "name".to_string(),
                    direction: SortDirection::Desc,
                },
                SortKey {
                    field: "createdAt".to_string(),
                    direction: SortDirection::Asc,
                },
            ],
            ..PagingRequest::default()
        };
        let sql = exams().page_query(&paging).sql().to_string();
        assert!(sql.contains("ORDER BY e.name DESC, e.created_at ASC"));
    }

    #[test]
    fn test_no_sortable_columns_skips_order_by() {
        let query = ListQuery::new("d.id", "departments d");
        let sql = query.page_query(&PagingRequest::default()).sql().to_string();
        assert_eq!(sql, "SELECT d.id FROM departments d LIMIT $1 OFFSET $2");
    }
}
