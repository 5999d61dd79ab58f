use chrono::NaiveDate;

/// Format kilograms to at most two decimals, trimming trailing zeros
pub fn format_kg(kg: f64) -> String {
    let fixed = format!("{:.2}", kg);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} kg", trimmed)
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "never".to_string(),
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(current: f64, target: f64, width: usize) -> String {
    if target <= 0.0 {
        return "█".repeat(width);
    }
    let ratio = (current / target).clamp(0.0, 1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}
