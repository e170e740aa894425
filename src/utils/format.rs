use unicode_width::UnicodeWidthStr;

/// Format pages as a decimal string, trimming trailing zeros
pub fn format_pages(pages: f64) -> String {
    if pages == pages.floor() {
        format!("{}", pages as i64)
    } else {
        format!("{:.1}", pages)
    }
}

/// Read a page count typed by the user. Anything that is not a number
/// counts as 0.
pub fn parse_pages(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: f64, total: f64, width: usize) -> String {
    if total <= 0.0 {
        return "░".repeat(width);
    }
    let ratio = (filled / total).clamp(0.0, 1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

pub fn format_khatma_count(count: u32) -> String {
    match count {
        0 => "no khatmas yet".to_string(),
        1 => "1 khatma".to_string(),
        n => format!("{} khatmas", n),
    }
}

/// Pad `s` with spaces to `width` terminal columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(used)))
}
