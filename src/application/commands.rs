use std::collections::HashSet;

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::application::dto::{BulkDecideFailure, BulkDecideResult, CompletenessReport, MissingCell};
use crate::application::time::month_dates;
use crate::domain::auto_fill::plan_fill;
use crate::domain::grid_model::ShiftAssignment;
use crate::domain::preference_model::{PreferenceRequest, PreferenceStatus};
use crate::domain::roster_logic::{check_transition, is_grid_complete, missing_cells, RosterError};
use crate::domain::roster_model::{
    PreferenceId, Roster, RosterId, RosterStatus, ShiftTypeId, StaffId, WardId,
};
use crate::AppServices;

/// 操作ログを書く。失敗しても主操作は巻き戻さない（ログして握りつぶす）
async fn audit(services: &AppServices, actor_id: StaffId, description: String) {
    if let Err(e) = services.audit.record(actor_id, &description).await {
        log::warn!("操作ログの書き込みに失敗しました: {}", e);
    }
}

// =================================================================
// 1. Roster Lifecycle (ロスターのライフサイクル)
// =================================================================

pub async fn create_roster(
    month: u32,
    year: i32,
    title: String,
    actor_id: StaffId,
    services: &AppServices,
) -> Result<RosterId, String> {
    let id = services
        .roster
        .create(month, year, &title, actor_id)
        .await
        .map_err(|e| e.to_string())?;

    audit(services, actor_id, format!("勤務表『{}』を作成 (id: {})", title, id)).await;
    Ok(id)
}

pub async fn get_roster(roster_id: RosterId, services: &AppServices) -> Result<Roster, String> {
    services.roster.find(roster_id).await.map_err(|e| e.to_string())
}

pub async fn list_rosters(services: &AppServices) -> Result<Vec<Roster>, String> {
    services.roster.list().await.map_err(|e| e.to_string())
}

/// 希望受付を締め切って下書き (Drafting) に進める
/// 以降、この勤務表への希望提出は PreferencesClosed で弾かれる
pub async fn close_preferences(
    roster_id: RosterId,
    actor_id: StaffId,
    services: &AppServices,
) -> Result<Roster, String> {
    let roster = services
        .roster
        .close_preferences(roster_id)
        .await
        .map_err(|e| e.to_string())?;

    audit(services, actor_id, format!("勤務表 (id: {}) の希望受付を締切", roster_id)).await;
    Ok(roster)
}

/// 勤務表を公開する
/// Drafting であること + 完成ゲートの両方を通過する必要がある
pub async fn publish_roster(
    roster_id: RosterId,
    actor_id: StaffId,
    services: &AppServices,
) -> Result<Roster, String> {
    let roster = services.roster.find(roster_id).await.map_err(|e| e.to_string())?;

    // 1. 状態の事前チェック（完成チェックより先）
    check_transition(roster.status, RosterStatus::Published).map_err(|e| e.to_string())?;

    // 2. 完成ゲート: 全アクティブスタッフ × 全日 が埋まっているか
    let staff_list = services.catalog.list_active_staff().await.map_err(|e| e.to_string())?;
    let days = month_dates(roster.year, roster.month);
    let snapshot = services.grid.list_for_roster(roster_id).await.map_err(|e| e.to_string())?;

    if !is_grid_complete(&staff_list, &days, &snapshot) {
        return Err(RosterError::IncompleteRoster.to_string());
    }

    // 3. 公開
    let published = services
        .roster
        .mark_published(roster_id)
        .await
        .map_err(|e| e.to_string())?;

    audit(services, actor_id, format!("勤務表 (id: {}) を公開", roster_id)).await;
    Ok(published)
}

/// 勤務表の削除。公開済みは不可。割当と希望はカスケードで消える
pub async fn delete_roster(
    roster_id: RosterId,
    actor_id: StaffId,
    services: &AppServices,
) -> Result<(), String> {
    services.roster.delete(roster_id).await.map_err(|e| e.to_string())?;

    audit(services, actor_id, format!("勤務表 (id: {}) を削除", roster_id)).await;
    Ok(())
}

// =================================================================
// 2. Shift Grid (グリッドの直接編集)
// =================================================================

pub async fn set_assignment(
    roster_id: RosterId,
    staff_id: StaffId,
    duty_date: NaiveDate,
    shift_type_id: ShiftTypeId,
    ward_id: Option<WardId>,
    actor_id: StaffId,
    services: &AppServices,
) -> Result<ShiftAssignment, String> {
    let assignment = services
        .grid
        .set_assignment(roster_id, staff_id, duty_date, shift_type_id, ward_id)
        .await
        .map_err(|e| e.to_string())?;

    audit(
        services,
        actor_id,
        format!("セル更新: staff {} / {} -> {}", staff_id, duty_date, assignment.shift_code),
    )
    .await;
    Ok(assignment)
}

pub async fn get_assignment(
    roster_id: RosterId,
    staff_id: StaffId,
    duty_date: NaiveDate,
    services: &AppServices,
) -> Result<Option<ShiftAssignment>, String> {
    services
        .grid
        .get_assignment(roster_id, staff_id, duty_date)
        .await
        .map_err(|e| e.to_string())
}

pub async fn clear_assignment(
    roster_id: RosterId,
    staff_id: StaffId,
    duty_date: NaiveDate,
    actor_id: StaffId,
    services: &AppServices,
) -> Result<u64, String> {
    let deleted = services
        .grid
        .clear_assignment(roster_id, staff_id, duty_date)
        .await
        .map_err(|e| e.to_string())?;

    audit(services, actor_id, format!("セル削除: staff {} / {}", staff_id, duty_date)).await;
    Ok(deleted)
}

pub async fn list_for_roster(
    roster_id: RosterId,
    services: &AppServices,
) -> Result<Vec<ShiftAssignment>, String> {
    services.grid.list_for_roster(roster_id).await.map_err(|e| e.to_string())
}

// =================================================================
// 3. Preference Intake & Approval (希望の提出と審査)
// =================================================================

pub async fn submit_preference(
    staff_id: StaffId,
    duty_date: NaiveDate,
    shift_type_id: ShiftTypeId,
    reason: Option<String>,
    services: &AppServices,
) -> Result<PreferenceId, String> {
    services
        .preference
        .submit(staff_id, duty_date, shift_type_id, reason.as_deref())
        .await
        .map_err(|e| e.to_string())
}

pub async fn list_pending(
    roster_id: RosterId,
    services: &AppServices,
) -> Result<Vec<PreferenceRequest>, String> {
    services.preference.list_pending(roster_id).await.map_err(|e| e.to_string())
}

/// 審査の本体。decide_bulk からも1件ずつ呼ばれる
async fn decide_inner(
    preference_id: PreferenceId,
    approve: bool,
    approver_id: StaffId,
    services: &AppServices,
) -> Result<(), RosterError> {
    let pref = services.preference.find(preference_id).await?;
    if pref.status != PreferenceStatus::Pending {
        return Err(RosterError::AlreadyDecided);
    }

    if !approve {
        // 却下: グリッドには何も書かない
        return services
            .preference
            .mark_decided(preference_id, PreferenceStatus::Denied, approver_id)
            .await;
    }

    // 1. 病棟を解決する
    //    勤務シフト -> 所属病棟（なければカタログ先頭の病棟にフォールバック）
    //    非勤務コード -> NULL
    let shift_type = services.catalog.find_shift_type(pref.shift_type_id).await?;
    let ward_id = if shift_type.is_working {
        let staff = services.catalog.find_staff(pref.staff_id).await?;
        match staff.home_ward_id {
            Some(w) => Some(w),
            None => {
                let wards = services.catalog.list_wards().await?;
                Some(wards.first().ok_or(RosterError::WardRequired)?.id)
            }
        }
    } else {
        None
    };

    // 2. グリッドへ書き込む
    //    管理者が手動で入れたセルでも無条件に上書きする（既存仕様を維持）
    services
        .grid
        .set_assignment(pref.roster_id, pref.staff_id, pref.duty_date, pref.shift_type_id, ward_id)
        .await?;

    // 3. 希望を Approved にする
    services
        .preference
        .mark_decided(preference_id, PreferenceStatus::Approved, approver_id)
        .await
}

pub async fn decide_preference(
    preference_id: PreferenceId,
    approve: bool,
    approver_id: StaffId,
    services: &AppServices,
) -> Result<(), String> {
    decide_inner(preference_id, approve, approver_id, services)
        .await
        .map_err(|e| e.to_string())?;

    let verdict = if approve { "承認" } else { "却下" };
    audit(services, approver_id, format!("シフト希望 (id: {}) を{}", preference_id, verdict)).await;
    Ok(())
}

/// 一括承認。1件の失敗（AlreadyDecided 等）で他を止めない部分成功が契約
pub async fn decide_bulk(
    preference_ids: Vec<PreferenceId>,
    approver_id: StaffId,
    services: &AppServices,
) -> Result<BulkDecideResult, String> {
    let mut approved_ids = Vec::new();
    let mut failures = Vec::new();

    for preference_id in preference_ids {
        match decide_inner(preference_id, true, approver_id, services).await {
            Ok(()) => approved_ids.push(preference_id),
            Err(e) => failures.push(BulkDecideFailure {
                preference_id,
                reason: e.to_string(),
            }),
        }
    }

    audit(
        services,
        approver_id,
        format!("一括承認: 成功 {} 件 / 失敗 {} 件", approved_ids.len(), failures.len()),
    )
    .await;

    Ok(BulkDecideResult { approved_ids, failures })
}

// =================================================================
// 4. Auto-Fill & Completeness (自動割当と完成ゲート)
// =================================================================

/// 未割当セルをヒューリスティックで埋める
///
/// 既存の割当（希望承認済みを含む）には触れない。seed を渡すと再現可能になる
/// （テスト用。None なら OS エントロピーから初期化）
pub async fn auto_fill(
    roster_id: RosterId,
    actor_id: StaffId,
    seed: Option<u64>,
    services: &AppServices,
) -> Result<Vec<ShiftAssignment>, String> {
    let roster = services.roster.find(roster_id).await.map_err(|e| e.to_string())?;

    // 1. 計画に必要な材料を揃える
    let staff_list = services.catalog.list_active_staff().await.map_err(|e| e.to_string())?;
    let am = services.catalog.find_shift_type_by_code("AM").await.map_err(|e| e.to_string())?;
    let pm = services.catalog.find_shift_type_by_code("PM").await.map_err(|e| e.to_string())?;
    let wards = services.catalog.list_wards().await.map_err(|e| e.to_string())?;
    let days = month_dates(roster.year, roster.month);

    // 2. スナップショットから使い捨ての既存キー集合を作る
    let snapshot = services.grid.list_for_roster(roster_id).await.map_err(|e| e.to_string())?;
    let filled: HashSet<_> = snapshot.iter().map(|a| (a.staff_id, a.duty_date)).collect();

    // 3. 純粋関数で穴埋め計画を立てる
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let planned = plan_fill(&staff_list, &days, &filled, &am, &pm, &wards, &mut rng)
        .map_err(|e| e.to_string())?;

    // 4. グリッドへ書き込む
    let mut created = Vec::with_capacity(planned.len());
    for cell in planned {
        let assignment = services
            .grid
            .set_assignment(roster_id, cell.staff_id, cell.duty_date, cell.shift_type_id, Some(cell.ward_id))
            .await
            .map_err(|e| e.to_string())?;
        created.push(assignment);
    }

    audit(services, actor_id, format!("自動割当: {} セルを補完 (勤務表 id: {})", created.len(), roster_id)).await;
    Ok(created)
}

/// 完成ゲートの照会。publish の事前確認やギャップ表示に使う
pub async fn is_complete(
    roster_id: RosterId,
    services: &AppServices,
) -> Result<CompletenessReport, String> {
    let roster = services.roster.find(roster_id).await.map_err(|e| e.to_string())?;
    let staff_list = services.catalog.list_active_staff().await.map_err(|e| e.to_string())?;
    let days = month_dates(roster.year, roster.month);
    let snapshot = services.grid.list_for_roster(roster_id).await.map_err(|e| e.to_string())?;

    let missing: Vec<MissingCell> = missing_cells(&staff_list, &days, &snapshot)
        .into_iter()
        .map(|(staff_id, duty_date)| MissingCell { staff_id, duty_date })
        .collect();

    Ok(CompletenessReport { complete: missing.is_empty(), missing })
}
