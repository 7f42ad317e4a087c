use serde::Serialize;

// Sizes are UTF-8 encoded byte lengths, not character counts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatsReport {
    pub original_bytes: usize,
    pub processed_bytes: usize,
    pub compression_ratio_percent: i64,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_lines: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_lines: Option<usize>,
}

impl StatsReport {
    pub fn compute(original: &str, processed: &str, elapsed_ms: u64) -> Self {
        let original_bytes = original.len();
        let processed_bytes = processed.len();
        let compression_ratio_percent = if original_bytes == 0 {
            0
        } else {
            ((1.0 - processed_bytes as f64 / original_bytes as f64) * 100.0).round() as i64
        };

        Self {
            original_bytes,
            processed_bytes,
            compression_ratio_percent,
            elapsed_ms,
            original_lines: None,
            processed_lines: None,
        }
    }

    // Line-count variant used for JavaScript input.
    pub fn compute_with_lines(original: &str, processed: &str, elapsed_ms: u64) -> Self {
        let mut report = Self::compute(original, processed, elapsed_ms);
        report.original_lines = Some(count_lines(original));
        report.processed_lines = Some(count_lines(processed));
        report
    }
}

fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}

pub fn format_bytes(bytes: usize) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", rendered, UNITS[exponent])
}
