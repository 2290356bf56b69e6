use chrono::{Datelike, NaiveDate};
use sqlx::{FromRow, SqlitePool};

use crate::domain::preference_model::{PreferenceRequest, PreferenceStatus};
use crate::domain::roster_logic::RosterError;
use crate::domain::roster_model::{PreferenceId, RosterId, RosterStatus, ShiftTypeId, StaffId};

/// 希望受付（Preference Intake）の永続化
pub struct PreferenceRepository {
    pool: SqlitePool,
}

// =====================
// DB読み込み用ヘルパー構造体
// =====================

#[derive(FromRow)]
struct PreferenceRow {
    id: i64,
    roster_id: i64,
    staff_id: i64,
    duty_date: NaiveDate,
    shift_type_id: i64,
    reason: Option<String>,
    status: String,
    decided_by: Option<i64>,
}

impl PreferenceRow {
    fn into_domain(self) -> Result<PreferenceRequest, RosterError> {
        let status = PreferenceStatus::from_db(&self.status)
            .ok_or_else(|| RosterError::Db(format!("unknown preference status: {}", self.status)))?;

        Ok(PreferenceRequest {
            id: Some(self.id),
            roster_id: self.roster_id,
            staff_id: self.staff_id,
            duty_date: self.duty_date,
            shift_type_id: self.shift_type_id,
            reason: self.reason,
            status,
            decided_by: self.decided_by,
        })
    }
}

impl PreferenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// スタッフが希望を提出する
    ///
    /// ロスターは日付の年月から引き当てる。受付中 (PreferenceOpen) でなければ
    /// PreferencesClosed で拒否する
    pub async fn submit(
        &self,
        staff_id: StaffId,
        duty_date: NaiveDate,
        shift_type_id: ShiftTypeId,
        reason: Option<&str>,
    ) -> Result<PreferenceId, RosterError> {
        // 1. 日付 -> ロスターの引き当て
        let roster: Option<(i64, String)> =
            sqlx::query_as("SELECT id, status FROM rosters WHERE month = ?1 AND year = ?2")
                .bind(duty_date.month() as i64)
                .bind(duty_date.year() as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RosterError::Db(e.to_string()))?;

        let (roster_id, status) = roster.ok_or(RosterError::NotFound {
            what: "対象月の勤務表",
            id: 0,
        })?;

        // 2. 受付状態チェック
        let status = RosterStatus::from_db(&status)
            .ok_or_else(|| RosterError::Db(format!("unknown roster status: {}", status)))?;
        if status != RosterStatus::PreferenceOpen {
            return Err(RosterError::PreferencesClosed);
        }

        // 3. シフト種別の存在チェック
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM shift_types WHERE id = ?1")
            .bind(shift_type_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))?;
        if exists.is_none() {
            return Err(RosterError::UnknownShiftType(shift_type_id.to_string()));
        }

        // 4. Pending として挿入
        let id = sqlx::query(
            "INSERT INTO preference_requests
                 (roster_id, staff_id, duty_date, shift_type_id, reason, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(roster_id)
        .bind(staff_id)
        .bind(duty_date)
        .bind(shift_type_id)
        .bind(reason)
        .bind(PreferenceStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?
        .last_insert_rowid();

        Ok(id)
    }

    pub async fn find(&self, preference_id: PreferenceId) -> Result<PreferenceRequest, RosterError> {
        let row: Option<PreferenceRow> = sqlx::query_as(
            "SELECT id, roster_id, staff_id, duty_date, shift_type_id, reason, status, decided_by
             FROM preference_requests WHERE id = ?1",
        )
        .bind(preference_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        match row {
            Some(r) => r.into_domain(),
            None => Err(RosterError::NotFound { what: "シフト希望", id: preference_id }),
        }
    }

    /// 審査待ちの希望を提出順（id昇順）で返す
    /// ページングが決定的になるよう順序は安定させる
    pub async fn list_pending(
        &self,
        roster_id: RosterId,
    ) -> Result<Vec<PreferenceRequest>, RosterError> {
        let rows: Vec<PreferenceRow> = sqlx::query_as(
            "SELECT id, roster_id, staff_id, duty_date, shift_type_id, reason, status, decided_by
             FROM preference_requests
             WHERE roster_id = ?1 AND status = ?2
             ORDER BY id ASC",
        )
        .bind(roster_id)
        .bind(PreferenceStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        rows.into_iter().map(PreferenceRow::into_domain).collect()
    }

    /// Pending の行だけを審査済みに更新する
    ///
    /// WHERE status = 'Pending' を条件に入れることで、並行した二重審査でも
    /// 勝者は1人だけになる。0行更新なら AlreadyDecided
    pub async fn mark_decided(
        &self,
        preference_id: PreferenceId,
        decision: PreferenceStatus,
        approver_id: StaffId,
    ) -> Result<(), RosterError> {
        let result = sqlx::query(
            "UPDATE preference_requests
             SET status = ?1, decided_by = ?2
             WHERE id = ?3 AND status = ?4",
        )
        .bind(decision.as_str())
        .bind(approver_id)
        .bind(preference_id)
        .bind(PreferenceStatus::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RosterError::AlreadyDecided);
        }
        Ok(())
    }
}
