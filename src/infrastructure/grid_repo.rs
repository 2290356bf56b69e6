use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};

use crate::domain::grid_model::ShiftAssignment;
use crate::domain::roster_logic::RosterError;
use crate::domain::roster_model::{RosterId, ShiftTypeId, StaffId, WardId};

/// シフトグリッドストア
/// ロスター状態の最小単位 (staff, date) -> 割当 を持つ
pub struct GridRepository {
    pool: SqlitePool,
}

// =====================
// DB読み込み用ヘルパー構造体
// =====================

#[derive(FromRow)]
struct AssignmentRow {
    id: i64,
    roster_id: i64,
    staff_id: i64,
    duty_date: NaiveDate,
    shift_type_id: i64,
    ward_id: Option<i64>,
    shift_code: String,
    color_hex: String,
}

impl AssignmentRow {
    fn into_domain(self) -> ShiftAssignment {
        ShiftAssignment {
            id: Some(self.id),
            roster_id: self.roster_id,
            staff_id: self.staff_id,
            duty_date: self.duty_date,
            shift_type_id: self.shift_type_id,
            ward_id: self.ward_id,
            shift_code: self.shift_code,
            color_hex: self.color_hex,
        }
    }
}

// シフト種別の検証に必要な列だけ読む
#[derive(FromRow)]
struct ShiftTypeRow {
    code: String,
    color_hex: String,
    is_working: bool,
}

impl GridRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 複合キーで UPSERT する。既存の割当は無条件に上書き（last-writer-wins）
    ///
    /// - 未知のシフト種別は UnknownShiftType
    /// - 勤務シフトには ward_id が必須 (WardRequired)
    /// - 非勤務コード (OFF 等) では ward_id を NULL に正規化する
    pub async fn set_assignment(
        &self,
        roster_id: RosterId,
        staff_id: StaffId,
        duty_date: NaiveDate,
        shift_type_id: ShiftTypeId,
        ward_id: Option<WardId>,
    ) -> Result<ShiftAssignment, RosterError> {
        // 1. シフト種別をカタログから引く
        let shift_type: Option<ShiftTypeRow> =
            sqlx::query_as("SELECT code, color_hex, is_working FROM shift_types WHERE id = ?1")
                .bind(shift_type_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RosterError::Db(e.to_string()))?;

        let shift_type = shift_type
            .ok_or_else(|| RosterError::UnknownShiftType(shift_type_id.to_string()))?;

        // 2. 病棟ルールの適用
        let ward_id = if shift_type.is_working {
            match ward_id {
                Some(w) => Some(w),
                None => return Err(RosterError::WardRequired),
            }
        } else {
            // OFF などでは病棟の意味が無いので NULL に揃える
            None
        };

        // 3. UPSERT（複合キーの一意性はここで保証される）
        sqlx::query(
            "INSERT INTO shift_assignments
                 (roster_id, staff_id, duty_date, shift_type_id, ward_id, shift_code, color_hex)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (roster_id, staff_id, duty_date) DO UPDATE SET
                 shift_type_id = excluded.shift_type_id,
                 ward_id       = excluded.ward_id,
                 shift_code    = excluded.shift_code,
                 color_hex     = excluded.color_hex",
        )
        .bind(roster_id)
        .bind(staff_id)
        .bind(duty_date)
        .bind(shift_type_id)
        .bind(ward_id)
        .bind(&shift_type.code)
        .bind(&shift_type.color_hex)
        .execute(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        // 4. 書き込んだセルを返す
        self.get_assignment(roster_id, staff_id, duty_date)
            .await?
            .ok_or_else(|| RosterError::Db("upsert succeeded but row not found".to_string()))
    }

    pub async fn get_assignment(
        &self,
        roster_id: RosterId,
        staff_id: StaffId,
        duty_date: NaiveDate,
    ) -> Result<Option<ShiftAssignment>, RosterError> {
        let row: Option<AssignmentRow> = sqlx::query_as(
            "SELECT id, roster_id, staff_id, duty_date, shift_type_id, ward_id, shift_code, color_hex
             FROM shift_assignments
             WHERE roster_id = ?1 AND staff_id = ?2 AND duty_date = ?3",
        )
        .bind(roster_id)
        .bind(staff_id)
        .bind(duty_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        Ok(row.map(AssignmentRow::into_domain))
    }

    /// セルを空に戻す（明示的な OFF の割当とは別物）
    /// 戻り値は削除された行数 (0 = もともと空)
    pub async fn clear_assignment(
        &self,
        roster_id: RosterId,
        staff_id: StaffId,
        duty_date: NaiveDate,
    ) -> Result<u64, RosterError> {
        let result = sqlx::query(
            "DELETE FROM shift_assignments
             WHERE roster_id = ?1 AND staff_id = ?2 AND duty_date = ?3",
        )
        .bind(roster_id)
        .bind(staff_id)
        .bind(duty_date)
        .execute(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// ロスター全体のスナップショット
    /// 完成チェックと自動割当はこの1回の取得に対して計算する
    pub async fn list_for_roster(
        &self,
        roster_id: RosterId,
    ) -> Result<Vec<ShiftAssignment>, RosterError> {
        let rows: Vec<AssignmentRow> = sqlx::query_as(
            "SELECT id, roster_id, staff_id, duty_date, shift_type_id, ward_id, shift_code, color_hex
             FROM shift_assignments
             WHERE roster_id = ?1
             ORDER BY duty_date ASC, staff_id ASC",
        )
        .bind(roster_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        Ok(rows.into_iter().map(AssignmentRow::into_domain).collect())
    }
}
