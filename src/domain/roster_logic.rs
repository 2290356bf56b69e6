use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::catalog_model::Staff;
use crate::domain::grid_model::ShiftAssignment;
use crate::domain::roster_model::{RosterStatus, StaffId};

/// コア操作の失敗種別
/// すべて回復可能なユーザー向けエラー。UI側はメッセージをそのまま表示する
#[derive(Debug, Error, PartialEq)]
pub enum RosterError {
    #[error("不正な状態遷移です: {from} から {to} へは移行できません")]
    InvalidTransition { from: RosterStatus, to: RosterStatus },

    #[error("勤務表が未完成のため公開できません（未割当セルが残っています）")]
    IncompleteRoster,

    #[error("公開済みの勤務表は削除できません")]
    CannotDeletePublished,

    #[error("{year}年{month}月の勤務表はすでに存在します")]
    DuplicatePeriod { month: u32, year: i32 },

    #[error("月の指定が不正です: {0}（1〜12で指定してください）")]
    InvalidMonth(u32),

    #[error("この勤務表の希望受付は締め切られています")]
    PreferencesClosed,

    #[error("この希望はすでに審査済みです")]
    AlreadyDecided,

    #[error("未知のシフト種別です: {0}")]
    UnknownShiftType(String),

    #[error("勤務シフトには病棟の指定が必要です")]
    WardRequired,

    #[error("{what} が見つかりません (id: {id})")]
    NotFound { what: &'static str, id: i64 },

    #[error("データベースエラー: {0}")]
    Db(String),
}

/// 状態遷移テーブル
/// 前進のみ許可する。巻き戻し（未公開化など）は定義しない
pub fn check_transition(from: RosterStatus, to: RosterStatus) -> Result<(), RosterError> {
    match (from, to) {
        (RosterStatus::PreferenceOpen, RosterStatus::Drafting) => Ok(()),
        (RosterStatus::Drafting, RosterStatus::Published) => Ok(()),
        _ => Err(RosterError::InvalidTransition { from, to }),
    }
}

/// 未割当セル (staff, day) を列挙する
///
/// スナップショット全体から使い捨てのキー集合を作り、
/// セルごとのDB往復はしない（O(スタッフ数 × 日数) のルックアップ）
pub fn missing_cells(
    staff_list: &[Staff],
    days: &[NaiveDate],
    snapshot: &[ShiftAssignment],
) -> Vec<(StaffId, NaiveDate)> {
    let filled: HashSet<(StaffId, NaiveDate)> = snapshot
        .iter()
        .map(|a| (a.staff_id, a.duty_date))
        .collect();

    let mut missing = Vec::new();
    for staff in staff_list {
        for day in days {
            if !filled.contains(&(staff.id, *day)) {
                missing.push((staff.id, *day));
            }
        }
    }
    missing
}

/// 完成ゲート: 全アクティブスタッフ × 全日 が埋まっているか
pub fn is_grid_complete(
    staff_list: &[Staff],
    days: &[NaiveDate],
    snapshot: &[ShiftAssignment],
) -> bool {
    missing_cells(staff_list, days, snapshot).is_empty()
}
