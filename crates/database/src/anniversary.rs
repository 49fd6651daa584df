//! Anniversary records for the dashboard widget.

use chrono::NaiveDate;
use honors_core::{Anniversary, AnniversaryKind};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::AnniversaryRow;
use crate::validation::validate_name;

/// Create a new anniversary.
pub async fn create_anniversary(
    pool: &SqlitePool,
    name: &str,
    date: NaiveDate,
    kind: AnniversaryKind,
) -> Result<Anniversary> {
    validate_name("name", name)?;

    let id = sqlx::query(
        r#"
        INSERT INTO anniversaries (name, date, kind)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(name.trim())
    .bind(date.format("%Y-%m-%d").to_string())
    .bind(kind.as_str())
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(Anniversary {
        id,
        name: name.trim().to_string(),
        date,
        kind,
    })
}

/// List all anniversaries ordered by month and day.
pub async fn list_anniversaries(pool: &SqlitePool) -> Result<Vec<Anniversary>> {
    let rows = sqlx::query_as::<_, AnniversaryRow>(
        r#"
        SELECT id, name, date, kind
        FROM anniversaries
        ORDER BY substr(date, 6), name
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Anniversary::try_from).collect()
}

/// Delete an anniversary by ID.
pub async fn delete_anniversary(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM anniversaries
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Anniversary",
            id: id.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_anniversary_crud() {
        let db = Database::in_memory().await.unwrap();
        create_anniversary(db.pool(), "Cohen", date("1990-06-10"), AnniversaryKind::Wedding)
            .await
            .unwrap();
        let bnai = create_anniversary(db.pool(), "Levi", date("2012-03-01"), AnniversaryKind::Bnai)
            .await
            .unwrap();

        let all = list_anniversaries(db.pool()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Levi", "Cohen"]);
        assert_eq!(all[0].kind, AnniversaryKind::Bnai);

        delete_anniversary(db.pool(), bnai.id).await.unwrap();
        assert_eq!(list_anniversaries(db.pool()).await.unwrap().len(), 1);
        assert!(matches!(
            delete_anniversary(db.pool(), bnai.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_corrupt_row_is_reported() {
        let db = Database::in_memory().await.unwrap();
        sqlx::query("INSERT INTO anniversaries (name, date, kind) VALUES ('X', '06/10/1990', 'wedding')")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            list_anniversaries(db.pool()).await,
            Err(DatabaseError::Corrupt { .. })
        ));
    }
}
