use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::roster_model::{PreferenceId, StaffId};

/// 一括承認の1件分の失敗
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDecideFailure {
    pub preference_id: PreferenceId,
    // UI がそのまま表示するエラーメッセージ
    pub reason: String,
}

/// 一括承認の結果
/// 1件の失敗で全体を巻き戻さない「部分成功」が契約
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDecideResult {
    pub approved_ids: Vec<PreferenceId>,
    pub failures: Vec<BulkDecideFailure>,
}

impl BulkDecideResult {
    pub fn approved_count(&self) -> usize {
        self.approved_ids.len()
    }
}

/// 未割当セル (フロントエンドのギャップ表示用)
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MissingCell {
    pub staff_id: StaffId,
    pub duty_date: NaiveDate,
}

/// 完成チェックの結果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessReport {
    pub complete: bool,
    pub missing: Vec<MissingCell>,
}
