//! Member CRUD and search.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Member;
use crate::validation::{validate_email, validate_name};

/// Create a new member.
pub async fn create_member(
    pool: &SqlitePool,
    first_name: &str,
    last_name: &str,
    email: Option<&str>,
) -> Result<Member> {
    validate_name("first name", first_name)?;
    validate_name("last name", last_name)?;
    if let Some(email) = email {
        validate_email(email)?;
    }

    let id = sqlx::query(
        r#"
        INSERT INTO members (first_name, last_name, email)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(first_name.trim())
    .bind(last_name.trim())
    .bind(email.map(str::trim))
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_member(pool, id).await
}

/// Get a member by ID.
pub async fn get_member(pool: &SqlitePool, id: i64) -> Result<Member> {
    sqlx::query_as::<_, Member>(
        r#"
        SELECT id, first_name, last_name, email, created_at
        FROM members
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Member",
        id: id.to_string(),
    })
}

/// Search members by name or email, ordered by last then first name.
///
/// With no query every member is a match; at most `limit` are returned.
pub async fn search_members(
    pool: &SqlitePool,
    query: Option<&str>,
    limit: u32,
) -> Result<Vec<Member>> {
    let pattern = format!("%{}%", escape_like(query.unwrap_or("").trim()));

    let members = sqlx::query_as::<_, Member>(
        r#"
        SELECT id, first_name, last_name, email, created_at
        FROM members
        WHERE first_name LIKE ?1 ESCAPE '\'
           OR last_name LIKE ?1 ESCAPE '\'
           OR (first_name || ' ' || last_name) LIKE ?1 ESCAPE '\'
           OR COALESCE(email, '') LIKE ?1 ESCAPE '\'
        ORDER BY last_name, first_name
        LIMIT ?2
        "#,
    )
    .bind(pattern)
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

/// Escape `LIKE` wildcards so they match literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Delete a member by ID. Their assignments become open honors.
pub async fn delete_member(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM members
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Member",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count total members.
pub async fn count_members(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM members
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assignment, Database};
    use honors_core::Assignment;

    #[tokio::test]
    async fn test_member_crud() {
        let db = Database::in_memory().await.unwrap();

        let sarah = create_member(db.pool(), "Sarah", "Levi", Some("sarah@shul.org"))
            .await
            .unwrap();
        let fetched = get_member(db.pool(), sarah.id).await.unwrap();
        assert_eq!(fetched.first_name, "Sarah");
        assert_eq!(fetched.email.as_deref(), Some("sarah@shul.org"));
        assert_eq!(count_members(db.pool()).await.unwrap(), 1);

        delete_member(db.pool(), sarah.id).await.unwrap();
        assert!(matches!(
            get_member(db.pool(), sarah.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_member_validates() {
        let db = Database::in_memory().await.unwrap();
        assert!(matches!(
            create_member(db.pool(), "", "Levi", None).await,
            Err(DatabaseError::Invalid(_))
        ));
        assert!(matches!(
            create_member(db.pool(), "Sarah", "Levi", Some("not-an-email")).await,
            Err(DatabaseError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_search_orders_and_limits() {
        let db = Database::in_memory().await.unwrap();
        create_member(db.pool(), "Sarah", "Levi", None).await.unwrap();
        create_member(db.pool(), "David", "Cohen", None).await.unwrap();
        create_member(db.pool(), "Miriam", "Cohen", None).await.unwrap();

        let all = search_members(db.pool(), None, 10).await.unwrap();
        let names: Vec<String> = all
            .iter()
            .map(|m| format!("{} {}", m.first_name, m.last_name))
            .collect();
        assert_eq!(names, vec!["David Cohen", "Miriam Cohen", "Sarah Levi"]);

        assert_eq!(search_members(db.pool(), None, 2).await.unwrap().len(), 2);

        let cohens = search_members(db.pool(), Some("cohen"), 10).await.unwrap();
        assert_eq!(cohens.len(), 2);

        let full = search_members(db.pool(), Some("Sarah Levi"), 10).await.unwrap();
        assert_eq!(full.len(), 1);
    }

    #[tokio::test]
    async fn test_search_wildcards_match_literally() {
        let db = Database::in_memory().await.unwrap();
        create_member(db.pool(), "Sarah", "Levi", None).await.unwrap();
        create_member(db.pool(), "Ann_Marie", "Katz", None).await.unwrap();
        create_member(db.pool(), "Dov", "100% Cohen", None).await.unwrap();

        let underscore = search_members(db.pool(), Some("_"), 10).await.unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].first_name, "Ann_Marie");

        let percent = search_members(db.pool(), Some("%"), 10).await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].first_name, "Dov");

        assert!(search_members(db.pool(), Some("\\"), 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_member_opens_their_honors() {
        let db = Database::in_memory().await.unwrap();
        let sarah = create_member(db.pool(), "Sarah", "Levi", None).await.unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
        assignment::replace_for_date(db.pool(), date, &[Assignment::new("1", Some(sarah.id))])
            .await
            .unwrap();

        delete_member(db.pool(), sarah.id).await.unwrap();

        let loaded = assignment::list_for_date(db.pool(), date).await.unwrap();
        assert_eq!(loaded, vec![Assignment::new("1", None)]);
    }
}
