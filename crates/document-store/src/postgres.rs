use std::str::FromStr;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Document, DocumentId, Filter, IncrementOutcome, Result, Sort, StoreError, store::DocumentStore,
};

/// PostgreSQL-backed document store.
///
/// Every collection shares a single `documents` table; bodies live in a JSONB
/// column and `seq` preserves insertion order.
#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Creates a new PostgreSQL document store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and verifies the server answers.
    ///
    /// `database` overrides the database named in `url` when given.
    pub async fn connect(url: &str, database: Option<&str>, max_connections: u32) -> Result<Self> {
        let mut options = PgConnectOptions::from_str(url)?;
        if let Some(database) = database {
            options = options.database(database);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.ping().await?;
        Ok(store)
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_document(row: PgRow) -> Result<Document> {
        let id = DocumentId::from_uuid(row.try_get::<Uuid, _>("id")?);
        match row.try_get::<Value, _>("body")? {
            Value::Object(body) => Ok(Document::new(id, body)),
            other => Err(StoreError::Decode {
                collection: row.try_get("collection")?,
                id,
                reason: format!("body is not a JSON object: {other}"),
            }),
        }
    }
}

/// Escapes LIKE wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, body))]
    async fn insert(&self, collection: &str, body: Map<String, Value>) -> Result<Document> {
        let id = DocumentId::new();
        let body = Value::Object(body);

        let row = sqlx::query(
            r#"
            INSERT INTO documents (id, collection, body)
            VALUES ($1, $2, $3)
            RETURNING id, collection, body
            "#,
        )
        .bind(id.as_uuid())
        .bind(collection)
        .bind(&body)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_document(row)
    }

    #[tracing::instrument(skip(self))]
    async fn find(&self, collection: &str, filter: &Filter, sort: Sort) -> Result<Vec<Document>> {
        let mut sql = String::from("SELECT id, collection, body FROM documents WHERE collection = $1");
        let mut param_count = 1;

        if let Filter::ContainsAny { .. } = filter {
            sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM unnest(${}::text[]) AS f(name) WHERE body ->> f.name ILIKE ${} ESCAPE '\\')",
                param_count + 1,
                param_count + 2
            ));
            param_count += 2;
        }

        match sort {
            Sort::Insertion => sql.push_str(" ORDER BY seq ASC"),
            Sort::NewestFirst(_) => {
                param_count += 1;
                sql.push_str(&format!(
                    " ORDER BY (body ->> ${param_count})::timestamptz DESC NULLS LAST, seq DESC"
                ));
            }
        }

        let mut query = sqlx::query(&sql).bind(collection);
        if let Filter::ContainsAny { fields, term } = filter {
            query = query.bind(fields.clone()).bind(like_pattern(term));
        }
        if let Sort::NewestFirst(field) = sort {
            query = query.bind(field);
        }

        let rows = query.fetch_all(&self.pool).await?;
        tracing::debug!(rows = rows.len(), "find finished");
        rows.into_iter().map(Self::row_to_document).collect()
    }

    async fn find_by_id(&self, collection: &str, id: DocumentId) -> Result<Option<Document>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, collection, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }

    async fn set_field(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
        value: Value,
    ) -> Result<Option<Document>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_set(body, ARRAY[$3]::text[], $4::jsonb, true)
            WHERE collection = $1 AND id = $2
            RETURNING id, collection, body
            "#,
        )
        .bind(collection)
        .bind(id.as_uuid())
        .bind(field)
        .bind(&value)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_document).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn increment_field(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
        delta: i64,
        floor: i64,
    ) -> Result<IncrementOutcome> {
        // Single statement: the row lock taken by UPDATE serializes concurrent callers
        let row: Option<PgRow> = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_set(
                body,
                ARRAY[$3]::text[],
                to_jsonb(COALESCE((body ->> $3)::bigint, 0) + $4),
                true
            )
            WHERE collection = $1
              AND id = $2
              AND COALESCE((body ->> $3)::bigint, 0) + $4 >= $5
            RETURNING id, collection, body
            "#,
        )
        .bind(collection)
        .bind(id.as_uuid())
        .bind(field)
        .bind(delta)
        .bind(floor)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            metrics::counter!("store_conditional_updates_total", "outcome" => "applied")
                .increment(1);
            return Ok(IncrementOutcome::Applied(Self::row_to_document(row)?));
        }

        let current: Option<Option<i64>> = sqlx::query_scalar(
            r#"
            SELECT (body ->> $3)::bigint
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id.as_uuid())
        .bind(field)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match current {
            Some(current) => {
                metrics::counter!("store_conditional_updates_total", "outcome" => "rejected")
                    .increment(1);
                IncrementOutcome::Rejected {
                    current: current.unwrap_or(0),
                }
            }
            None => IncrementOutcome::NotFound,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn clear(&self, collection: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection)
            .execute(&self.pool)
            .await?;
        tracing::info!(removed = result.rows_affected(), "collection cleared");
        Ok(result.rows_affected())
    }
}
