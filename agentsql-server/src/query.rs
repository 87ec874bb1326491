//! Query executors: static statement passthrough and vector search.
//!
//! Both paths run one statement inside one transaction and fold every
//! failure (connect, execute, decode) into a `SqlFailure` descriptor; this
//! is the only recovered error class in the service.

use agentsql_core::{ResultSet, SqlFailure};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pgvector::Vector;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Column, PgPool, Postgres, Row, TypeInfo};

/// In-database embedding model applied to the search phrase.
pub const EMBEDDING_MODEL: &str = "textembedding-gecko@003";

/// Nearest-neighbor rows returned by the vector search.
pub const SEARCH_LIMIT: i64 = 5;

/// Execute a SQL statement supplied verbatim by the platform.
///
/// No validation or allow-listing happens here; the platform is the trusted
/// author of the statement.
pub async fn run_statement(pool: &PgPool, sql: &str) -> Result<ResultSet, SqlFailure> {
    tracing::info!(%sql, "running SQL statement");
    execute(pool, sqlx::query(sql)).await
}

/// Rank `investments` rows by embedding distance to the phrase.
///
/// The phrase is bound as `$1`, never interpolated into the statement text.
pub async fn vector_search(pool: &PgPool, phrase: &str) -> Result<ResultSet, SqlFailure> {
    tracing::info!(%phrase, "vector search phrase");
    tracing::debug!(sql = %rendered_sql(phrase), "vector search statement");
    let sql = search_template("$1", "$2");
    execute(pool, sqlx::query(&sql).bind(phrase).bind(SEARCH_LIMIT)).await
}

/// Human-readable form of the vector search with the phrase inline.
/// Logging only; the executed statement always carries placeholders.
pub fn rendered_sql(phrase: &str) -> String {
    let quoted = format!("'{}'", phrase.replace('\'', "''"));
    search_template(&quoted, &SEARCH_LIMIT.to_string())
}

fn search_template(phrase_expr: &str, limit_expr: &str) -> String {
    format!(
        "SELECT ticker, etf, rating, overview, analysis, \
         analysis_embedding <=> google_ml.embedding('{EMBEDDING_MODEL}', {phrase_expr})::vector AS distance \
         FROM investments ORDER BY distance LIMIT {limit_expr}"
    )
}

/// Run one statement in one transaction and decode the rows.
async fn execute(
    pool: &PgPool,
    query: Query<'_, Postgres, PgArguments>,
) -> Result<ResultSet, SqlFailure> {
    let outcome: Result<ResultSet, sqlx::Error> = async {
        let mut tx = pool.begin().await?;
        let rows = query.fetch_all(&mut *tx).await?;
        tx.commit().await?;
        decode_rows(&rows)
    }
    .await;

    outcome.map_err(|e| {
        tracing::warn!(error = %e, "SQL execution failed");
        SqlFailure::new(e.to_string())
    })
}

fn decode_rows(rows: &[PgRow]) -> Result<ResultSet, sqlx::Error> {
    let Some(first) = rows.first() else {
        // DML without RETURNING, or an empty SELECT.
        return Ok(ResultSet::default());
    };

    let columns: Vec<String> = first
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let mut decoded = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells = Vec::with_capacity(columns.len());
        for (idx, column) in row.columns().iter().enumerate() {
            cells.push(decode_cell(row, idx, column.type_info().name())?);
        }
        decoded.push(cells);
    }

    Ok(ResultSet {
        columns,
        rows: decoded,
    })
}

/// Decode one cell to display text, keyed on the Postgres type name.
/// NULL always renders as the empty string.
fn decode_cell(row: &PgRow, idx: usize, type_name: &str) -> Result<String, sqlx::Error> {
    fn text<T: ToString>(value: Option<T>) -> String {
        value.map(|v| v.to_string()).unwrap_or_default()
    }

    Ok(match type_name {
        "BOOL" => text(row.try_get::<Option<bool>, _>(idx)?),
        "INT2" => text(row.try_get::<Option<i16>, _>(idx)?),
        "INT4" => text(row.try_get::<Option<i32>, _>(idx)?),
        "INT8" => text(row.try_get::<Option<i64>, _>(idx)?),
        "FLOAT4" => text(row.try_get::<Option<f32>, _>(idx)?),
        "FLOAT8" => text(row.try_get::<Option<f64>, _>(idx)?),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            text(row.try_get::<Option<String>, _>(idx)?)
        }
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|v| v.to_rfc3339())
            .unwrap_or_default(),
        "TIMESTAMP" => text(row.try_get::<Option<NaiveDateTime>, _>(idx)?),
        "DATE" => text(row.try_get::<Option<NaiveDate>, _>(idx)?),
        "UUID" => text(row.try_get::<Option<uuid::Uuid>, _>(idx)?),
        "JSON" | "JSONB" => row
            .try_get::<Option<serde_json::Value>, _>(idx)?
            .map(|v| v.to_string())
            .unwrap_or_default(),
        "VECTOR" | "vector" => row
            .try_get::<Option<Vector>, _>(idx)?
            .map(format_vector)
            .unwrap_or_default(),
        // Exotic types (NUMERIC and friends): raw text decode. Operators are
        // expected to cast in SQL when this is not good enough.
        _ => text(row.try_get_unchecked::<Option<String>, _>(idx)?),
    })
}

fn format_vector(v: Vector) -> String {
    let parts: Vec<String> = v.to_vec().iter().map(|f| f.to_string()).collect();
    format!("[{}]", parts.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_sql_embeds_phrase_verbatim() {
        let sql = rendered_sql("green energy");
        assert!(sql.contains("google_ml.embedding('textembedding-gecko@003', 'green energy')"));
        assert!(sql.contains("ORDER BY distance"));
        assert!(sql.contains("LIMIT 5"));
        assert!(sql.contains("FROM investments"));
    }

    #[test]
    fn rendered_sql_doubles_embedded_quotes() {
        let sql = rendered_sql("o'brien's fund");
        assert!(sql.contains("'o''brien''s fund'"));
    }

    #[test]
    fn executed_statement_uses_placeholders() {
        let sql = search_template("$1", "$2");
        assert!(sql.contains("google_ml.embedding('textembedding-gecko@003', $1)"));
        assert!(sql.contains("LIMIT $2"));
        assert!(!sql.contains("green energy"));
    }

    #[test]
    fn format_vector_is_bracketed_csv() {
        let v = Vector::from(vec![0.5, 1.0, -2.0]);
        assert_eq!(format_vector(v), "[0.5,1,-2]");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn run_statement_decodes_mixed_types() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");

        let result = run_statement(
            &pool,
            "SELECT 'GRN'::text AS ticker, 5::int4 AS rating, 0.25::float8 AS distance, \
             true AS held, NULL::text AS note",
        )
        .await
        .expect("statement failed");

        assert_eq!(
            result.columns,
            vec!["ticker", "rating", "distance", "held", "note"]
        );
        assert_eq!(
            result.rows,
            vec![vec![
                "GRN".to_string(),
                "5".to_string(),
                "0.25".to_string(),
                "true".to_string(),
                String::new()
            ]]
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn run_statement_with_no_rows_is_empty() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");

        let result = run_statement(&pool, "SELECT 1 WHERE false")
            .await
            .expect("statement failed");
        assert_eq!(result.row_count(), 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn bad_sql_becomes_failure_descriptor() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");

        let failure = run_statement(&pool, "SELECT * FROM no_such_table")
            .await
            .expect_err("expected failure");
        assert_eq!(failure.message, "SQL Query Failed.");
        assert!(failure.details.contains("no_such_table"));
    }
}
