use sqlx::SqlitePool;

use crate::domain::catalog_model::{ShiftType, Staff, Ward};
use crate::domain::roster_logic::RosterError;
use crate::domain::roster_model::{ShiftTypeId, StaffId, WardId};

/// 外部コラボレータ（シフト種別・病棟・スタッフ名簿）のルックアップ/CRUD
/// コアはここを読み取り中心で使う
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =================================================================
    // 1. Shift Types (シフト種別)
    // =================================================================

    pub async fn create_shift_type(
        &self,
        code: &str,
        color_hex: &str,
        is_working: bool,
    ) -> Result<ShiftTypeId, RosterError> {
        let id = sqlx::query(
            "INSERT INTO shift_types (code, color_hex, is_working) VALUES (?1, ?2, ?3)",
        )
        .bind(code)
        .bind(color_hex)
        .bind(is_working)
        .execute(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?
        .last_insert_rowid();
        Ok(id)
    }

    pub async fn list_shift_types(&self) -> Result<Vec<ShiftType>, RosterError> {
        sqlx::query_as("SELECT id, code, color_hex, is_working FROM shift_types ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))
    }

    pub async fn find_shift_type(&self, id: ShiftTypeId) -> Result<ShiftType, RosterError> {
        let row: Option<ShiftType> =
            sqlx::query_as("SELECT id, code, color_hex, is_working FROM shift_types WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RosterError::Db(e.to_string()))?;

        row.ok_or_else(|| RosterError::UnknownShiftType(id.to_string()))
    }

    /// 自動割当が "AM" / "PM" をコードで引くのに使う
    pub async fn find_shift_type_by_code(&self, code: &str) -> Result<ShiftType, RosterError> {
        let row: Option<ShiftType> = sqlx::query_as(
            "SELECT id, code, color_hex, is_working FROM shift_types WHERE code = ?1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        row.ok_or_else(|| RosterError::UnknownShiftType(code.to_string()))
    }

    // =================================================================
    // 2. Wards (病棟)
    // =================================================================

    pub async fn create_ward(
        &self,
        name: &str,
        comments: Option<&str>,
    ) -> Result<WardId, RosterError> {
        let id = sqlx::query("INSERT INTO wards (name, comments) VALUES (?1, ?2)")
            .bind(name)
            .bind(comments)
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))?
            .last_insert_rowid();
        Ok(id)
    }

    pub async fn list_wards(&self) -> Result<Vec<Ward>, RosterError> {
        sqlx::query_as("SELECT id, name, comments FROM wards ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))
    }

    // =================================================================
    // 3. Staff Directory (スタッフ名簿)
    // =================================================================

    pub async fn create_staff(
        &self,
        full_name: &str,
        role: &str,
        home_ward_id: Option<WardId>,
        service: &str,
    ) -> Result<StaffId, RosterError> {
        let id = sqlx::query(
            "INSERT INTO staff (full_name, role, home_ward_id, service) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(full_name)
        .bind(role)
        .bind(home_ward_id)
        .bind(service)
        .execute(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?
        .last_insert_rowid();
        Ok(id)
    }

    pub async fn find_staff(&self, id: StaffId) -> Result<Staff, RosterError> {
        let row: Option<Staff> = sqlx::query_as(
            "SELECT id, full_name, role, home_ward_id, service, is_active
             FROM staff WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))?;

        row.ok_or(RosterError::NotFound { what: "スタッフ", id })
    }

    /// アクティブなスタッフのみ。完成チェックと自動割当の母集団になる
    pub async fn list_active_staff(&self) -> Result<Vec<Staff>, RosterError> {
        sqlx::query_as(
            "SELECT id, full_name, role, home_ward_id, service, is_active
             FROM staff WHERE is_active = 1 ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RosterError::Db(e.to_string()))
    }

    /// 退職・休職などで母集団から外す（削除はしない）
    pub async fn set_staff_active(&self, id: StaffId, active: bool) -> Result<(), RosterError> {
        sqlx::query("UPDATE staff SET is_active = ?1 WHERE id = ?2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RosterError::Db(e.to_string()))?;
        Ok(())
    }
}
