use serde::{Serialize, Deserialize};
use sqlx::FromRow;

use crate::domain::roster_model::{ShiftTypeId, StaffId, WardId};

//
// 外部コラボレータ側のカタログ行
//

// --- 1. シフト種別 ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShiftType {
    pub id: ShiftTypeId,
    pub code: String,       // 例: "AM", "PM", "OFF", "NNJ"
    pub color_hex: String,
    pub is_working: bool,   // false = 休み・休暇コード
}

// --- 2. 病棟 ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ward {
    pub id: WardId,
    pub name: String,
    pub comments: Option<String>,
}

// --- 3. スタッフ ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: StaffId,
    pub full_name: String,
    pub role: String,
    // 所属病棟。自動割当と希望承認のデフォルトに使う
    pub home_ward_id: Option<WardId>,
    // 表示グルーピング用のラベル（スケジューリングには使わない）
    pub service: String,
    pub is_active: bool,
}
