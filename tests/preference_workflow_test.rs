#[cfg(test)]
mod preference_workflow_tests {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    use chrono::NaiveDate;
    use roster_manager_lib::{
        application::commands::*,
        domain::preference_model::PreferenceStatus,
        AppServices,
    };

    async fn setup_test_db() -> SqlitePool {
        // RUST_LOG を指定したときだけ操作ログの警告などが見える
        let _ = env_logger::builder().is_test(true).try_init();

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create memory pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    async fn setup_test_services() -> AppServices {
        let pool = setup_test_db().await;
        AppServices::new(pool)
    }

    struct Seeded {
        roster_id: i64,
        staff_with_home: i64,   // 所属病棟 = home_ward
        staff_without_home: i64,
        home_ward: i64,
        am_id: i64,
        pm_id: i64,
        off_id: i64,
    }

    /// カタログ + 受付中 (PreferenceOpen) の2026年3月ロスター
    async fn seed(services: &AppServices) -> Seeded {
        let am_id = services.catalog.create_shift_type("AM", "#4caf50", true).await.unwrap();
        let pm_id = services.catalog.create_shift_type("PM", "#2196f3", true).await.unwrap();
        let off_id = services.catalog.create_shift_type("OFF", "#9e9e9e", false).await.unwrap();

        // フォールバック先と区別できるよう、所属病棟は先頭以外にする
        let _fallback = services.catalog.create_ward("外科病棟", None).await.unwrap();
        let home_ward = services.catalog.create_ward("内科病棟", None).await.unwrap();

        let staff_with_home =
            services.catalog.create_staff("田中", "nurse", Some(home_ward), "内科").await.unwrap();
        let staff_without_home =
            services.catalog.create_staff("鈴木", "nurse", None, "").await.unwrap();

        let roster_id = create_roster(3, 2026, "2026年3月 勤務表".to_string(), 1, services)
            .await
            .unwrap();

        Seeded { roster_id, staff_with_home, staff_without_home, home_ward, am_id, pm_id, off_id }
    }

    #[tokio::test]
    async fn test_submit_rejected_after_close() {
        let services = setup_test_services().await;
        let s = seed(&services).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();

        // 受付中は提出できる
        submit_preference(s.staff_with_home, day, s.am_id, None, &services).await.unwrap();

        // 締切後は PreferencesClosed
        close_preferences(s.roster_id, 1, &services).await.unwrap();
        let r = submit_preference(s.staff_with_home, day, s.am_id, None, &services).await;
        assert!(r.unwrap_err().contains("締め切られています"));

        // ロスターが存在しない月も弾かれる
        let other_month = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let r = submit_preference(s.staff_with_home, other_month, s.am_id, None, &services).await;
        assert!(r.unwrap_err().contains("見つかりません"));
    }

    #[tokio::test]
    async fn test_pending_listed_in_submission_order() {
        let services = setup_test_services().await;
        let s = seed(&services).await;

        let d1 = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();

        let p1 = submit_preference(s.staff_with_home, d3, s.am_id, None, &services).await.unwrap();
        let p2 = submit_preference(s.staff_without_home, d1, s.pm_id, None, &services).await.unwrap();
        let p3 = submit_preference(s.staff_with_home, d2, s.off_id, Some("通院のため".to_string()), &services)
            .await
            .unwrap();

        // 日付順ではなく提出順で返る
        let pending = list_pending(s.roster_id, &services).await.unwrap();
        let ids: Vec<i64> = pending.iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, vec![p1, p2, p3]);
        assert_eq!(pending[2].reason.as_deref(), Some("通院のため"));
    }

    #[tokio::test]
    async fn test_approval_resolves_ward_from_home() {
        let services = setup_test_services().await;
        let s = seed(&services).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();

        // 勤務シフト (PM) の希望 -> 承認でグリッドに所属病棟付きで書かれる
        let p = submit_preference(s.staff_with_home, day, s.pm_id, None, &services).await.unwrap();
        decide_preference(p, true, 99, &services).await.unwrap();

        let cell = get_assignment(s.roster_id, s.staff_with_home, day, &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cell.shift_type_id, s.pm_id);
        assert_eq!(cell.shift_code, "PM");
        assert_eq!(cell.ward_id, Some(s.home_ward));

        // 希望側も Approved になっている
        let pref = services.preference.find(p).await.unwrap();
        assert_eq!(pref.status, PreferenceStatus::Approved);
        assert_eq!(pref.decided_by, Some(99));
    }

    #[tokio::test]
    async fn test_approval_of_off_keeps_ward_null() {
        let services = setup_test_services().await;
        let s = seed(&services).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();

        // 所属病棟があっても OFF なら ward は NULL
        let p = submit_preference(s.staff_with_home, day, s.off_id, None, &services).await.unwrap();
        decide_preference(p, true, 99, &services).await.unwrap();

        let cell = get_assignment(s.roster_id, s.staff_with_home, day, &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cell.shift_code, "OFF");
        assert_eq!(cell.ward_id, None);
    }

    #[tokio::test]
    async fn test_approval_overwrites_manual_edit() {
        let services = setup_test_services().await;
        let s = seed(&services).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        let p = submit_preference(s.staff_with_home, day, s.pm_id, None, &services).await.unwrap();

        // 管理者が先に手で AM を入れておく
        set_assignment(s.roster_id, s.staff_with_home, day, s.am_id, Some(s.home_ward), 1, &services)
            .await
            .unwrap();

        // 承認すると警告なしで上書きされる（既存仕様）
        decide_preference(p, true, 99, &services).await.unwrap();
        let cell = get_assignment(s.roster_id, s.staff_with_home, day, &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cell.shift_code, "PM");
    }

    #[tokio::test]
    async fn test_double_decision_is_rejected() {
        let services = setup_test_services().await;
        let s = seed(&services).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();

        let p = submit_preference(s.staff_with_home, day, s.pm_id, None, &services).await.unwrap();
        decide_preference(p, true, 99, &services).await.unwrap();
        let first_cell = get_assignment(s.roster_id, s.staff_with_home, day, &services)
            .await
            .unwrap()
            .unwrap();

        // 2回目は AlreadyDecided（却下に変えようとしても同じ）
        let r = decide_preference(p, false, 99, &services).await;
        assert!(r.unwrap_err().contains("すでに審査済み"));

        // 1回目の承認で書かれたセルは変わらない
        let cell = get_assignment(s.roster_id, s.staff_with_home, day, &services)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cell, first_cell);
    }

    #[tokio::test]
    async fn test_bulk_decide_is_partial_success() {
        let services = setup_test_services().await;
        let s = seed(&services).await;

        let d1 = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();

        let p1 = submit_preference(s.staff_with_home, d1, s.am_id, None, &services).await.unwrap();
        let p2 = submit_preference(s.staff_with_home, d2, s.pm_id, None, &services).await.unwrap();
        let p3 = submit_preference(s.staff_without_home, d3, s.pm_id, None, &services).await.unwrap();

        // p2 だけ先に承認済みにしておく
        decide_preference(p2, true, 99, &services).await.unwrap();

        // 一括承認: p2 の失敗は p1, p3 を止めない
        let result = decide_bulk(vec![p1, p2, p3], 99, &services).await.unwrap();
        assert_eq!(result.approved_count(), 2);
        assert_eq!(result.approved_ids, vec![p1, p3]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].preference_id, p2);
        assert!(result.failures[0].reason.contains("すでに審査済み"));

        // p1, p3 のセルは書かれている
        assert!(get_assignment(s.roster_id, s.staff_with_home, d1, &services).await.unwrap().is_some());
        let p3_cell = get_assignment(s.roster_id, s.staff_without_home, d3, &services)
            .await
            .unwrap()
            .unwrap();
        // 所属なしスタッフはカタログ先頭の病棟にフォールバック
        assert_eq!(p3_cell.ward_id, Some(1));
    }
}
