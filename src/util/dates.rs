use chrono::{DateTime, Local, Utc};

pub fn local_date_yyyy_mm_dd() -> String {
    let now: DateTime<Local> = Local::now();
    now.format("%Y-%m-%d").to_string()
}

pub fn format_short_date(dt: DateTime<Utc>) -> String {
    dt.format("%d-%b-%y").to_string()
}

/// Elapsed-time display for leaderboard rows, e.g. "45.0s" or "2m 05s".
pub fn format_seconds(seconds: f64) -> String {
    if seconds < 60.0 {
        format!("{seconds:.1}s")
    } else {
        let minutes = (seconds / 60.0) as u64;
        let rest = seconds - (minutes * 60) as f64;
        format!("{minutes}m {rest:02.0}s")
    }
}
