use chrono::NaiveDate;

/// 指定された年・月の日数を計算する
/// ※ month: 1 (1月) 〜 12 (12月)
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // 1. その月の1日を取得
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("Invalid date provided (month should be 1-12)");

    // 2. 翌月の1日を取得して差分を取る
    // month が 12 の場合は翌年の1月
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };

    next_month_first
        .signed_duration_since(first_day)
        .num_days() as u32
}

/// その月の全日付（1日〜月末）を列挙する
/// グリッドの完成チェックと自動割当が走査する軸になる
pub fn month_dates(year: i32, month: u32) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .map(|day| {
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap() /* safe unwrap: day は日数内 */
        })
        .collect()
}
