use chrono::{NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::domain::roster_logic::RosterError;
use crate::domain::roster_model::StaffId;

/// 操作ログの書き込み先（Audit Sink）
///
/// fire-and-forget の契約: ここでの失敗は呼び出し元の操作を
/// 巻き戻してはならない。呼び出し側はログに書いて握りつぶす
pub struct AuditRepository {
    pool: SqlitePool,
}

#[derive(Debug, FromRow)]
pub struct ActionLog {
    pub id: i64,
    pub actor_id: StaffId,
    pub description: String,
    pub created_at: NaiveDateTime,
}

impl AuditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, actor_id: StaffId, description: &str) -> Result<(), RosterError> {
        sqlx::query("INSERT INTO action_logs (actor_id, description, created_at) VALUES (?1, ?2, ?3)")
            .bind(actor_id)
            .bind(description)
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))?;
        Ok(())
    }

    /// デバッグ・点検用の直近ログ
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<ActionLog>, RosterError> {
        sqlx::query_as(
            "SELECT id, actor_id, description, created_at
             FROM action_logs ORDER BY id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))
    }
}
