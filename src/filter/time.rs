//! Time-value formatting for FFmpeg duration literals

/// Convert seconds to an FFmpeg microsecond literal, e.g. `250000us`.
///
/// Magnitudes below one microsecond are floating point residue from the
/// trim arithmetic and collapse to `0us`. This also covers `-0.0`.
pub fn stringify_trim(seconds: f64) -> String {
    let micros = seconds * 1_000_000.0;
    if micros.abs() < 1.0 {
        return "0us".to_string();
    }
    // f64's Display never switches to exponent notation
    format!("{}us", micros)
}
