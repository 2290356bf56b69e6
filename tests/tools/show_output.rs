use roster_manager_lib::domain::grid_model::ShiftAssignment;

pub fn show_grid_debug_data(assignments: &[ShiftAssignment]) {
    println!("\n=======================================================");
    println!("🗓️ [DEBUG] グリッド内容 (計 {} セル)", assignments.len());
    println!("=======================================================");

    let mut current_date = None;
    for a in assignments {
        if current_date != Some(a.duty_date) {
            println!("📅 {} ------------------------------------------", a.duty_date);
            current_date = Some(a.duty_date);
        }

        let ward_str = match a.ward_id {
            Some(w) => format!("病棟 {}", w),
            None => "(病棟なし)".to_string(),
        };
        println!("   staff {:>3} : {:<4} | {}", a.staff_id, a.shift_code, ward_str);
    }
    println!("=======================================================\n");
}
