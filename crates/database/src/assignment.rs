//! Honor assignment storage.
//!
//! Assignments are saved per date as a complete set: a save replaces every
//! row for the date inside one transaction, so repeated or out-of-order
//! saves for the same date always leave exactly one consistent set.

use chrono::NaiveDate;
use honors_core::Assignment;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::AssignmentRow;
use crate::validation::validate_honor_key;

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Assignments saved for a date, in the order they were saved.
pub async fn list_for_date(pool: &SqlitePool, date: NaiveDate) -> Result<Vec<Assignment>> {
    let rows = sqlx::query_as::<_, AssignmentRow>(
        r#"
        SELECT date, honor, position, member_id, updated_at
        FROM honor_assignments
        WHERE date = ?
        ORDER BY position
        "#,
    )
    .bind(date_key(date))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Assignment::from).collect())
}

/// Replace every assignment for `date` with `assignments`.
///
/// Honors missing from `assignments` are removed; a `None` member keeps the
/// honor listed but open.
pub async fn replace_for_date(
    pool: &SqlitePool,
    date: NaiveDate,
    assignments: &[Assignment],
) -> Result<()> {
    for assignment in assignments {
        validate_honor_key(&assignment.honor)?;
    }
    Assignment::ensure_unique(assignments).map_err(|e| DatabaseError::Invalid(e.to_string()))?;

    let key = date_key(date);
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM honor_assignments
        WHERE date = ?
        "#,
    )
    .bind(&key)
    .execute(&mut *tx)
    .await?;

    for (position, assignment) in assignments.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO honor_assignments (date, honor, position, member_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&key)
        .bind(&assignment.honor)
        .bind(position as i64)
        .bind(assignment.member_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_foreign_key_violation() {
                    return DatabaseError::NotFound {
                        entity: "Member",
                        id: assignment
                            .member_id
                            .map(|id| id.to_string())
                            .unwrap_or_default(),
                    };
                }
            }
            DatabaseError::Sqlx(e)
        })?;
    }

    tx.commit().await?;

    tracing::info!(date = %key, honors = assignments.len(), "Replaced honor assignments");
    Ok(())
}

/// Dates in `[from, to]` that have at least one assigned member.
pub async fn assigned_dates(
    pool: &SqlitePool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT date, COUNT(member_id) as assigned
        FROM honor_assignments
        WHERE date BETWEEN ? AND ?
        GROUP BY date
        HAVING assigned > 0
        ORDER BY date
        "#,
    )
    .bind(date_key(from))
    .bind(date_key(to))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
