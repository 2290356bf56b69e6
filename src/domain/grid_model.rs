use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use crate::domain::roster_model::{RosterId, ShiftTypeId, StaffId, WardId};

/// グリッドの1セル = 1スタッフ・1日のシフト割当
/// 複合キー (roster_id, staff_id, duty_date) につき最大1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub roster_id: RosterId,
    pub staff_id: StaffId,
    pub duty_date: NaiveDate,
    pub shift_type_id: ShiftTypeId,
    // OFF などの非勤務コードのときは None（意味のある NULL）
    pub ward_id: Option<WardId>,
    // 表示用の非正規化フィールド
    pub shift_code: String,
    pub color_hex: String,
}
