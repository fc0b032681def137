//! Time display helpers shared by render surfaces

/// Format seconds as `m:ss`
///
/// Non-finite or negative input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Elapsed fraction of a track in `[0, 1]`
///
/// Returns `None` until the duration is known.
pub fn progress_fraction(elapsed: f64, duration: Option<f64>) -> Option<f64> {
    let duration = duration.filter(|d| d.is_finite() && *d > 0.0)?;
    Some((elapsed / duration).clamp(0.0, 1.0))
}
