use chrono::{NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::domain::roster_logic::{check_transition, RosterError};
use crate::domain::roster_model::{Roster, RosterId, RosterStatus, StaffId};

pub struct RosterRepository {
    pool: SqlitePool,
}

// =====================
// DB読み込み用ヘルパー構造体
// =====================

#[derive(FromRow)]
struct RosterRow {
    id: i64,
    month: i64,
    year: i64,
    title: String,
    status: String,
    created_by: i64,
    created_at: NaiveDateTime,
    published_at: Option<NaiveDateTime>,
}

impl RosterRow {
    fn into_domain(self) -> Result<Roster, RosterError> {
        // 未知のステータス文字列は黙ってフォールバックせずエラーにする
        let status = RosterStatus::from_db(&self.status)
            .ok_or_else(|| RosterError::Db(format!("unknown roster status: {}", self.status)))?;

        Ok(Roster {
            id: Some(self.id),
            month: self.month as u32,
            year: self.year as i32,
            title: self.title,
            status,
            created_by: self.created_by,
            created_at: self.created_at,
            published_at: self.published_at,
        })
    }
}

impl RosterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 新規ロスターを作成する（初期状態 = PreferenceOpen）
    /// 同一 (month, year) のロスターがすでにあれば DuplicatePeriod
    pub async fn create(
        &self,
        month: u32,
        year: i32,
        title: &str,
        created_by: StaffId,
    ) -> Result<RosterId, RosterError> {
        // 1. 月の範囲チェック
        //    0 や 13 を通すと、以降の日付計算（完成ゲート・自動割当）が壊れる
        if !(1..=12).contains(&month) {
            return Err(RosterError::InvalidMonth(month));
        }

        // 2. 重複期間チェック
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM rosters WHERE month = ?1 AND year = ?2")
                .bind(month as i64)
                .bind(year as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RosterError::Db(e.to_string()))?;

        if existing.is_some() {
            return Err(RosterError::DuplicatePeriod { month, year });
        }

        // 3. 挿入
        //    (month, year) には一意制約があるので、事前チェックをすり抜けた
        //    並行作成も UNIQUE 違反として DuplicatePeriod に落ちる
        let id = sqlx::query(
            "INSERT INTO rosters (month, year, title, status, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(month as i64)
        .bind(year as i64)
        .bind(title)
        .bind(RosterStatus::PreferenceOpen.as_str())
        .bind(created_by)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => RosterError::DuplicatePeriod { month, year },
            _ => RosterError::Db(e.to_string()),
        })?
        .last_insert_rowid();

        Ok(id)
    }

    pub async fn find(&self, roster_id: RosterId) -> Result<Roster, RosterError> {
        let row: Option<RosterRow> = sqlx::query_as(
            "SELECT id, month, year, title, status, created_by, created_at, published_at
             FROM rosters WHERE id = ?1",
        )
        .bind(roster_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        match row {
            Some(r) => r.into_domain(),
            None => Err(RosterError::NotFound { what: "勤務表", id: roster_id }),
        }
    }

    /// 管理者の一覧画面用（新しい期間が先）
    pub async fn list(&self) -> Result<Vec<Roster>, RosterError> {
        let rows: Vec<RosterRow> = sqlx::query_as(
            "SELECT id, month, year, title, status, created_by, created_at, published_at
             FROM rosters ORDER BY year DESC, month DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        rows.into_iter().map(RosterRow::into_domain).collect()
    }

    /// 希望受付を締め切る: PreferenceOpen -> Drafting のみ許可
    pub async fn close_preferences(&self, roster_id: RosterId) -> Result<Roster, RosterError> {
        let roster = self.find(roster_id).await?;
        check_transition(roster.status, RosterStatus::Drafting)?;

        sqlx::query("UPDATE rosters SET status = ?1 WHERE id = ?2")
            .bind(RosterStatus::Drafting.as_str())
            .bind(roster_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))?;

        self.find(roster_id).await
    }

    /// 公開状態にする: Drafting -> Published のみ許可
    /// 完成ゲートのチェックは呼び出し側（application層）の責務
    pub async fn mark_published(&self, roster_id: RosterId) -> Result<Roster, RosterError> {
        let roster = self.find(roster_id).await?;
        check_transition(roster.status, RosterStatus::Published)?;

        sqlx::query("UPDATE rosters SET status = ?1, published_at = ?2 WHERE id = ?3")
            .bind(RosterStatus::Published.as_str())
            .bind(Utc::now().naive_utc())
            .bind(roster_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))?;

        self.find(roster_id).await
    }

    /// ロスターを削除する。公開済みは削除不可
    /// ON DELETE CASCADE により、割当と希望も全削除される
    pub async fn delete(&self, roster_id: RosterId) -> Result<(), RosterError> {
        let roster = self.find(roster_id).await?;
        if roster.status == RosterStatus::Published {
            return Err(RosterError::CannotDeletePublished);
        }

        sqlx::query("DELETE FROM rosters WHERE id = ?1")
            .bind(roster_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))?;
        Ok(())
    }
}
