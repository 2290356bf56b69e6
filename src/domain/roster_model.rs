use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};

// ID の型エイリアス
pub type RosterId = i64;
pub type StaffId = i64;
pub type ShiftTypeId = i64;
pub type WardId = i64;
pub type PreferenceId = i64;

/// ロスターのライフサイクル状態
/// 遷移は前進のみ: PreferenceOpen -> Drafting -> Published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterStatus {
    PreferenceOpen,
    Drafting,
    Published,
}

impl RosterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterStatus::PreferenceOpen => "PreferenceOpen",
            RosterStatus::Drafting => "Drafting",
            RosterStatus::Published => "Published",
        }
    }

    /// DB の TEXT カラムから復元する。未知の値は None
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "PreferenceOpen" => Some(RosterStatus::PreferenceOpen),
            "Drafting" => Some(RosterStatus::Drafting),
            "Published" => Some(RosterStatus::Published),
            _ => None,
        }
    }
}

impl std::fmt::Display for RosterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 月次ロスター（メイン構造体）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    // 新規作成時はNone、読み込み時はSomeになります。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RosterId>,

    pub month: u32, // 1-12
    pub year: i32,
    pub title: String,
    pub status: RosterStatus,
    pub created_by: StaffId,
    pub created_at: NaiveDateTime,
    pub published_at: Option<NaiveDateTime>,
}
