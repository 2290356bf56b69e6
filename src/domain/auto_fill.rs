use std::collections::HashSet;

use chrono::NaiveDate;
use rand::Rng;

use crate::domain::catalog_model::{ShiftType, Staff, Ward};
use crate::domain::roster_logic::RosterError;
use crate::domain::roster_model::{ShiftTypeId, StaffId, WardId};

/// 自動割当が書き込む予定の1セル
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    pub staff_id: StaffId,
    pub duty_date: NaiveDate,
    pub shift_type_id: ShiftTypeId,
    pub ward_id: WardId,
}

/// AM確率の重み。セルごとに独立な乱数で 70% AM / 30% PM
const AM_PROBABILITY: f64 = 0.7;

/// 未割当セルの穴埋め計画を立てる純粋関数
///
/// - すでに埋まっているセル（希望承認済みを含む）には絶対に触れない
/// - シフトは重み付きコイン投げ（AM 70% / PM 30%）。週・月の偏りは補正しない
/// - 病棟は所属病棟、なければフォールバックリストから擬似ランダムに選ぶ
///
/// 公平性・連勤・休息の制約は持たない。カバレッジ（全セル非空）だけを保証する
pub fn plan_fill<R: Rng>(
    staff_list: &[Staff],
    days: &[NaiveDate],
    filled: &HashSet<(StaffId, NaiveDate)>,
    am: &ShiftType,
    pm: &ShiftType,
    fallback_wards: &[Ward],
    rng: &mut R,
) -> Result<Vec<PlannedCell>, RosterError> {
    let mut planned = Vec::new();

    for day in days {
        for staff in staff_list {
            // 1. 既存の割当はスキップ（上書きしない）
            if filled.contains(&(staff.id, *day)) {
                continue;
            }

            // 2. シフト種別を重み付きコイン投げで選ぶ
            let shift = if rng.gen_bool(AM_PROBABILITY) { am } else { pm };

            // 3. 病棟を決める: 所属病棟 > フォールバック
            let ward_id = match staff.home_ward_id {
                Some(w) => w,
                None => {
                    if fallback_wards.is_empty() {
                        // 所属なしスタッフがいるのに病棟カタログが空
                        return Err(RosterError::WardRequired);
                    }
                    fallback_wards[rng.gen_range(0..fallback_wards.len())].id
                }
            };

            planned.push(PlannedCell {
                staff_id: staff.id,
                duty_date: *day,
                shift_type_id: shift.id,
                ward_id,
            });
        }
    }

    Ok(planned)
}
