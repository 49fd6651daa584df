//! Organization settings.

use honors_core::ReadingCycleConfig;
use sqlx::SqlitePool;

use crate::models::Setting;
use crate::Result;

/// Settings key for the triennial reading cycle flag.
pub const TRIENNIAL_KEY: &str = "reading_cycle.triennial";

/// Create or update a setting.
pub async fn upsert_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a setting by key.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<Setting>> {
    let record = sqlx::query_as::<_, Setting>(
        r#"
        SELECT key, value, updated_at
        FROM settings
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// The reading cycle setting, or `default_triennial` when it was never set.
pub async fn reading_cycle(pool: &SqlitePool, default_triennial: bool) -> Result<ReadingCycleConfig> {
    let triennial = match get_setting(pool, TRIENNIAL_KEY).await? {
        Some(setting) => parse_flag(&setting.value),
        None => default_triennial,
    };
    Ok(ReadingCycleConfig { triennial })
}

/// Store the reading cycle setting.
pub async fn set_reading_cycle(pool: &SqlitePool, config: ReadingCycleConfig) -> Result<()> {
    let value = if config.triennial { "1" } else { "0" };
    upsert_setting(pool, TRIENNIAL_KEY, value).await
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}
