use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use crate::domain::roster_model::{PreferenceId, RosterId, ShiftTypeId, StaffId};

/// 希望の審査状態
/// 遷移は一方通行: Pending -> Approved | Denied（再提出なし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreferenceStatus {
    Pending,
    Approved,
    Denied,
}

impl PreferenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceStatus::Pending => "Pending",
            PreferenceStatus::Approved => "Approved",
            PreferenceStatus::Denied => "Denied",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "Pending" => Some(PreferenceStatus::Pending),
            "Approved" => Some(PreferenceStatus::Approved),
            "Denied" => Some(PreferenceStatus::Denied),
            _ => None,
        }
    }
}

/// スタッフ提出のシフト希望
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PreferenceId>,

    pub roster_id: RosterId,
    pub staff_id: StaffId,
    pub duty_date: NaiveDate,
    pub shift_type_id: ShiftTypeId,
    pub reason: Option<String>,
    pub status: PreferenceStatus,
    pub decided_by: Option<StaffId>,
}
