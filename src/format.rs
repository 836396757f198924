//! Pure formatting helpers for the panel display strings.

use chrono::{Local, LocalResult, TimeZone};

use crate::types::item::ItemState;

/// Unit suffixes for file sizes, one per 1024-step.
pub const SIZE_UNITS: [&str; 9] = ["bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

const SECONDS_PER_DAY: i64 = 86_400;

/// Renders a byte count with one decimal place and a unit suffix.
/// Negative input is clamped to zero.
pub fn file_size(bytes: i64) -> String {
    let mut size = if bytes < 0 { 0.0 } else { bytes as f64 };
    let mut unit = 0;

    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, SIZE_UNITS[unit])
}

/// Progress percentage, 0–100 with one decimal place.
/// Returns 0.0 when the total is unknown (zero or negative).
pub fn percentage(bytes_received: u64, total_bytes: i64) -> f64 {
    if total_bytes <= 0 {
        return 0.0;
    }
    let ratio = bytes_received as f64 / total_bytes as f64;
    ((ratio * 100.0).clamp(0.0, 100.0) * 10.0).round() / 10.0
}

/// Whole seconds until the estimated completion time, rounded.
/// None when the host gave no estimate.
pub fn remaining_seconds(estimated_end_ms: Option<i64>, now_ms: i64) -> Option<i64> {
    estimated_end_ms.map(|end| ((end - now_ms) as f64 / 1000.0).round() as i64)
}

/// Human-readable remaining time, e.g. "- 3m remaining".
///
/// Empty for paused/complete/failed items, for unknown estimates, and for
/// anything at one second or less.
pub fn remaining_time(state: ItemState, remaining: Option<i64>) -> String {
    if matches!(
        state,
        ItemState::Paused | ItemState::Complete | ItemState::Failed
    ) {
        return String::new();
    }

    let secs = match remaining {
        Some(secs) if secs > 1 => secs,
        _ => return String::new(),
    };

    if secs > SECONDS_PER_DAY {
        return "Over a day remaining".to_string();
    }

    let (count, unit) = if secs >= 3600 {
        (secs / 3600, "h")
    } else if secs >= 60 {
        (secs / 60, "m")
    } else {
        (secs, "s")
    };

    format!("- {}{} remaining", count, unit)
}

/// Human-readable transfer speed predicted from the remaining time.
///
/// Paused/complete/failed items get their fixed label; an unknown estimate
/// reads "Calculating" and a zero estimate "Finishing".
pub fn transfer_speed(
    state: ItemState,
    remaining: Option<i64>,
    bytes_received: u64,
    total_bytes: i64,
) -> String {
    match state {
        ItemState::Paused => return "Paused".to_string(),
        ItemState::Complete => return "Completed".to_string(),
        ItemState::Failed => return "Failed".to_string(),
        _ => {}
    }

    let secs = match remaining {
        Some(secs) => secs,
        None => return "Calculating".to_string(),
    };
    if secs <= 0 {
        return "Finishing".to_string();
    }

    let left = (total_bytes.max(0) as u64).saturating_sub(bytes_received);
    let bps = (left as f64 / secs as f64).round();

    // Unit selection happens on the raw rate, not its rounded value, so
    // half a GB/s reads "512 MB/s" rather than inflating to "1 GB/s".
    if bps >= 1_073_741_824.0 {
        return format!("{} GB/s", (bps / 1_073_741_824.0).round() as i64);
    }
    if bps >= 1_048_576.0 {
        return format!("{} MB/s", (bps / 1_048_576.0).round() as i64);
    }
    let kb = (bps / 1024.0).round() as i64;
    if kb > 0 {
        return format!("{} KB/s", kb);
    }
    "< 1 KB/s".to_string()
}

/// Local date and time of the start timestamp, or "Unknown" for the
/// epoch-zero sentinel.
pub fn date_time(start_time_ms: i64) -> String {
    if start_time_ms == 0 {
        return "Unknown".to_string();
    }
    match Local.timestamp_millis_opt(start_time_ms) {
        LocalResult::Single(dt) => format!("{} {}", dt.format("%x"), dt.format("%X")),
        _ => "Unknown".to_string(),
    }
}
