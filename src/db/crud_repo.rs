// src/db/crud_repo.rs

use std::marker::PhantomData;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use sqlx::{postgres::PgRow, Executor, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::{
    error::AppError,
    pagination::{contains_pattern, ListQuery, Page},
    validation::FieldChecks,
};

// =============================================================================
//  DESCRIÇÃO DE UM RECURSO
// =============================================================================

/// Como um filtro estruturado da query string vira `WHERE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Igualdade de texto.
    Text,
    /// Igualdade com cast para um tipo enum do Postgres (ex.: `booking_status`),
    /// aceitando só os valores listados.
    Enum(&'static str, &'static [&'static str]),
    Id,
    Flag,
    /// `ILIKE` sem curingas do usuário (ex.: e-mail parcial).
    Contains,
}

#[derive(Debug, Clone, Copy)]
pub struct Filter {
    /// Nome do parâmetro na URL (camelCase).
    pub param: &'static str,
    pub column: &'static str,
    pub kind: FilterKind,
}

impl Filter {
    pub const fn new(param: &'static str, column: &'static str, kind: FilterKind) -> Self {
        Self { param, column, kind }
    }
}

/// Tudo o que o gateway genérico precisa saber sobre uma tabela.
///
/// Nomes de tabela/coluna são constantes do código, nunca entrada do
/// usuário; valores sempre vão como parâmetros.
pub trait Resource: for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    /// Nome usado nas mensagens ("Region not found").
    const LABEL: &'static str;
    const SEARCH_COLUMNS: &'static [&'static str] = &[];
    const FILTERS: &'static [Filter] = &[];
    /// SQL cru de ordenação padrão.
    const DEFAULT_ORDER: &'static str = r#""order" ASC, created_at DESC"#;
    /// constraint única → campo da API.
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] = &[];

    fn id(&self) -> Uuid;
}

// =============================================================================
//  CHANGESET
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Int(Option<i32>),
    Money(Option<Decimal>),
    Bool(Option<bool>),
    Id(Option<Uuid>),
    Date(Option<NaiveDate>),
    Json(Option<Value>),
    /// Valor textual de um enum do Postgres: (nome do tipo, valor).
    Enum(&'static str, String),
}

impl FieldValue {
    fn push_bind(self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            FieldValue::Text(v) => qb.push_bind(v),
            FieldValue::Int(v) => qb.push_bind(v),
            FieldValue::Money(v) => qb.push_bind(v),
            FieldValue::Bool(v) => qb.push_bind(v),
            FieldValue::Id(v) => qb.push_bind(v),
            FieldValue::Date(v) => qb.push_bind(v),
            FieldValue::Json(v) => qb.push_bind(v),
            FieldValue::Enum(type_name, v) => qb.push_bind(v).push("::").push(type_name),
        };
    }
}

macro_rules! field_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self { FieldValue::$variant(Some(v)) }
            }
            impl From<Option<$ty>> for FieldValue {
                fn from(v: Option<$ty>) -> Self { FieldValue::$variant(v) }
            }
        )*
    };
}

field_value_from! {
    String => Text,
    i32 => Int,
    Decimal => Money,
    bool => Bool,
    Uuid => Id,
    NaiveDate => Date,
    Value => Json,
}

/// Lista ordenada de colunas alteradas. Em updates, só o que está aqui muda.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    fields: Vec<(&'static str, FieldValue)>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a coluna (substitui se já existir).
    pub fn set(&mut self, column: &'static str, value: impl Into<FieldValue>) -> &mut Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
        self
    }

    /// Só define se o valor veio no payload.
    pub fn patch<T: Into<FieldValue>>(&mut self, column: &'static str, value: Option<T>) -> &mut Self {
        if let Some(v) = value {
            self.set(column, v);
        }
        self
    }

    /// Texto opcional em update: ausente não mexe, vazio limpa (NULL).
    pub fn patch_text(&mut self, column: &'static str, value: Option<String>) -> &mut Self {
        if let Some(v) = value {
            let v = v.trim().to_string();
            self.set(column, if v.is_empty() { None } else { Some(v) });
        }
        self
    }

    pub fn set_enum(&mut self, column: &'static str, type_name: &'static str, value: &str) -> &mut Self {
        self.set(column, FieldValue::Enum(type_name, value.to_string()))
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(c, _)| *c == column).map(|(_, v)| v)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        match self.get(column) {
            Some(FieldValue::Text(Some(s))) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(c, _)| *c)
    }
}

fn push_ident(qb: &mut QueryBuilder<'_, Postgres>, ident: &str) {
    qb.push('"').push(ident).push('"');
}

// =============================================================================
//  REPOSITÓRIO GENÉRICO
// =============================================================================

pub struct CrudRepository<R> {
    pool: PgPool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for CrudRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> CrudRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ---
    // Leitura (usa a pool principal)
    // ---

    pub async fn list(&self, query: &ListQuery) -> Result<Page<R>, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        push_ident(&mut count, R::TABLE);
        push_where::<R>(&mut count, query)?;
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        push_ident(&mut select, R::TABLE);
        push_where::<R>(&mut select, query)?;
        select.push(" ORDER BY ").push(R::DEFAULT_ORDER);
        select.push(" LIMIT ").push_bind(query.page_size);
        select.push(" OFFSET ").push_bind(query.offset());

        let items = select.build_query_as::<R>().fetch_all(&self.pool).await?;
        Ok(Page::new(items, total, query))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<R>, AppError> {
        self.find_by_column("id", FieldValue::Id(Some(id))).await
    }

    pub async fn get(&self, id: Uuid) -> Result<R, AppError> {
        self.find_by_id(id).await?.ok_or(AppError::NotFound(R::LABEL))
    }

    pub async fn find_by_column(&self, column: &'static str, value: FieldValue) -> Result<Option<R>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        push_ident(&mut qb, R::TABLE);
        qb.push(" WHERE ");
        push_ident(&mut qb, column);
        qb.push(" = ");
        value.push_bind(&mut qb);

        Ok(qb.build_query_as::<R>().fetch_optional(&self.pool).await?)
    }

    // ---
    // Escrita (aceita qualquer executor, para rodar dentro de transações)
    // ---

    pub async fn insert<'e, E>(&self, executor: E, changeset: Changeset) -> Result<R, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = insert_sql(R::TABLE, changeset);
        qb.build_query_as::<R>()
            .fetch_one(executor)
            .await
            .map_err(map_write_error::<R>)
    }

    /// Update parcial. Changeset vazio só toca `updated_at`.
    pub async fn update<'e, E>(&self, executor: E, id: Uuid, changeset: Changeset) -> Result<R, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = update_sql(R::TABLE, id, changeset);
        qb.build_query_as::<R>()
            .fetch_optional(executor)
            .await
            .map_err(map_write_error::<R>)?
            .ok_or(AppError::NotFound(R::LABEL))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        push_ident(&mut qb, R::TABLE);
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(executor)
            .await
            .map_err(map_write_error::<R>)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(R::LABEL));
        }
        Ok(())
    }
}

fn insert_sql(table: &str, changeset: Changeset) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
    push_ident(&mut qb, table);

    if changeset.is_empty() {
        qb.push(" DEFAULT VALUES RETURNING *");
        return qb;
    }

    qb.push(" (");
    for (i, column) in changeset.columns().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        push_ident(&mut qb, column);
    }
    qb.push(") VALUES (");
    for (i, (_, value)) in changeset.fields.into_iter().enumerate() {
        if i > 0 {
            qb.push(", ");
        }
        value.push_bind(&mut qb);
    }
    qb.push(") RETURNING *");
    qb
}

fn update_sql(table: &str, id: Uuid, changeset: Changeset) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE ");
    push_ident(&mut qb, table);
    qb.push(" SET ");
    for (column, value) in changeset.fields {
        push_ident(&mut qb, column);
        qb.push(" = ");
        value.push_bind(&mut qb);
        qb.push(", ");
    }
    qb.push("updated_at = NOW() WHERE id = ").push_bind(id);
    qb.push(" RETURNING *");
    qb
}

/// Acrescenta `WHERE` com busca livre e filtros estruturados conhecidos.
/// Filtros que o recurso não declara são ignorados.
fn push_where<R: Resource>(qb: &mut QueryBuilder<'_, Postgres>, query: &ListQuery) -> Result<(), AppError> {
    let mut checks = FieldChecks::new();
    let mut first = true;
    let mut and = |qb: &mut QueryBuilder<'_, Postgres>| {
        qb.push(if first { " WHERE " } else { " AND " });
        first = false;
    };

    if let Some(term) = &query.search {
        if !R::SEARCH_COLUMNS.is_empty() {
            and(qb);
            let pattern = contains_pattern(term);
            qb.push("(");
            for (i, column) in R::SEARCH_COLUMNS.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                push_ident(qb, column);
                qb.push(" ILIKE ").push_bind(pattern.clone());
            }
            qb.push(")");
        }
    }

    for filter in R::FILTERS {
        let Some(raw) = query.filters.get(filter.param) else {
            continue;
        };
        let raw = raw.trim();

        let value = match filter.kind {
            FilterKind::Text => FieldValue::Text(Some(raw.to_string())),
            FilterKind::Enum(type_name, values) => match values.iter().find(|v| v.eq_ignore_ascii_case(raw)) {
                Some(value) => FieldValue::Enum(type_name, value.to_string()),
                None => {
                    checks.invalid(
                        filter.param,
                        "invalid_enum",
                        format!("{} must be one of: {}", filter.param, values.join(", ")),
                    );
                    continue;
                }
            },
            FilterKind::Contains => FieldValue::Text(Some(contains_pattern(raw))),
            FilterKind::Id => match raw.parse::<Uuid>() {
                Ok(id) => FieldValue::Id(Some(id)),
                Err(_) => {
                    checks.invalid(filter.param, "invalid_id", format!("{} must be a UUID", filter.param));
                    continue;
                }
            },
            FilterKind::Flag => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => FieldValue::Bool(Some(true)),
                "false" | "0" | "off" | "no" => FieldValue::Bool(Some(false)),
                _ => {
                    checks.invalid(filter.param, "invalid_boolean", format!("{} must be true or false", filter.param));
                    continue;
                }
            },
        };

        and(qb);
        push_ident(qb, filter.column);
        qb.push(if filter.kind == FilterKind::Contains { " ILIKE " } else { " = " });
        value.push_bind(qb);
    }

    checks.finish()
}

/// Converte violações de constraint em erros do domínio.
pub fn map_write_error<R: Resource>(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            let fields: Vec<String> = R::UNIQUE_CONSTRAINTS
                .iter()
                .filter(|(name, _)| *name == constraint)
                .map(|(_, field)| field.to_string())
                .collect();
            return AppError::Conflict {
                fields: if fields.is_empty() {
                    vec![constraint.to_string()]
                } else {
                    fields
                },
            };
        }
        if db_err.is_foreign_key_violation() {
            return AppError::ReferencedRecord(db_err.constraint().unwrap_or_default().to_string());
        }
    }
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Debug, Serialize, FromRow)]
    struct Widget {
        id: Uuid,
        name: String,
        created_at: DateTime<Utc>,
    }

    impl Resource for Widget {
        const TABLE: &'static str = "widgets";
        const LABEL: &'static str = "Widget";
        const SEARCH_COLUMNS: &'static [&'static str] = &["name", "slug"];
        const FILTERS: &'static [Filter] = &[
            Filter::new("status", "status", FilterKind::Enum("widget_status", &["active", "archived"])),
            Filter::new("featured", "featured", FilterKind::Flag),
            Filter::new("ownerId", "owner_id", FilterKind::Id),
        ];

        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn where_sql(query: &ListQuery) -> Result<String, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM widgets");
        push_where::<Widget>(&mut qb, query)?;
        Ok(qb.sql().to_string())
    }

    #[test]
    fn insert_binds_every_column() {
        let mut cs = Changeset::new();
        cs.set("name", "Sapa".to_string()).set("order", 1).set_enum("status", "tour_status", "active");
        let qb = insert_sql("widgets", cs);
        assert_eq!(
            qb.sql(),
            r#"INSERT INTO "widgets" ("name", "order", "status") VALUES ($1, $2, $3::tour_status) RETURNING *"#
        );
    }

    #[test]
    fn update_only_touches_given_columns() {
        let mut cs = Changeset::new();
        cs.patch("order", Some(4)).patch::<String>("name", None);
        let qb = update_sql("widgets", Uuid::nil(), cs);
        assert_eq!(
            qb.sql(),
            r#"UPDATE "widgets" SET "order" = $1, updated_at = NOW() WHERE id = $2 RETURNING *"#
        );
    }

    #[test]
    fn empty_update_still_bumps_timestamp() {
        let qb = update_sql("widgets", Uuid::nil(), Changeset::new());
        assert_eq!(qb.sql(), r#"UPDATE "widgets" SET updated_at = NOW() WHERE id = $1 RETURNING *"#);
    }

    #[test]
    fn search_and_filters_are_parameterised() {
        let query = ListQuery {
            search: Some("x'; DROP TABLE widgets; --".into()),
            ..ListQuery::default()
        }
        .with_filter("status", "active")
        .with_filter("featured", "true")
        .with_filter("unknown", "ignored");

        let sql = where_sql(&query).unwrap();
        assert_eq!(
            sql,
            r#"SELECT * FROM widgets WHERE ("name" ILIKE $1 OR "slug" ILIKE $2) AND "status" = $3::widget_status AND "featured" = $4"#
        );
        assert!(!sql.contains("DROP"));
    }

    #[test]
    fn malformed_filters_are_validation_errors() {
        let query = ListQuery::default()
            .with_filter("ownerId", "not-a-uuid")
            .with_filter("featured", "maybe")
            .with_filter("status", "bogus");
        let Err(AppError::ValidationError(errors)) = where_sql(&query) else {
            panic!("expected validation error");
        };
        let fields = errors.field_errors();
        assert!(fields.contains_key("ownerId"));
        assert!(fields.contains_key("featured"));
        assert_eq!(fields["status"][0].code, "invalid_enum");
    }

    #[test]
    fn enum_filter_binds_the_canonical_value() {
        let query = ListQuery::default().with_filter("status", " ACTIVE ");
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM widgets");
        push_where::<Widget>(&mut qb, &query).unwrap();
        assert_eq!(qb.sql(), r#"SELECT * FROM widgets WHERE "status" = $1::widget_status"#);
    }

    #[test]
    fn changeset_set_replaces_existing_column() {
        let mut cs = Changeset::new();
        cs.set("slug", "a".to_string()).set("slug", "b".to_string());
        assert_eq!(cs.text("slug"), Some("b"));
        assert_eq!(cs.columns().count(), 1);
    }

    #[test]
    fn patch_text_clears_blank_values() {
        let mut cs = Changeset::new();
        cs.patch_text("alt", Some("  ".into())).patch_text("caption", None);
        assert_eq!(cs.get("alt"), Some(&FieldValue::Text(None)));
        assert!(!cs.contains("caption"));
    }
}
