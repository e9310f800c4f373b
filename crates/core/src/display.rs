//! Display formatting helpers for catalog entries.

/// Format a byte count as a human-readable size string.
///
/// Returns `"Unknown"` for zero, since external catalogs report a size
/// of 0 when the true size was never recorded. Otherwise picks the
/// largest unit that keeps the value >= 1 and prints at most one
/// decimal place, trimming a trailing `.0`.
///
/// `format_file_size(1024)` is `"1 KB"`, `format_file_size(1536)` is
/// `"1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "Unknown".to_string();
    }

    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 10.0).round() / 10.0;
    if (rounded - rounded.trunc()).abs() < f64::EPSILON {
        format!("{} {}", rounded.trunc() as u64, UNITS[unit])
    } else {
        format!("{rounded:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_unknown() {
        assert_eq!(format_file_size(0), "Unknown");
    }

    #[test]
    fn exact_kilobyte() {
        assert_eq!(format_file_size(1024), "1 KB");
    }

    #[test]
    fn sub_kilobyte_stays_in_bytes() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1), "1 B");
    }

    #[test]
    fn fractional_sizes_keep_one_decimal() {
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024 + 512 * 1024), "1.5 MB");
    }

    #[test]
    fn large_checkpoint_in_gigabytes() {
        // 6.5 GB, a typical SDXL checkpoint
        let bytes = (6.5 * 1024.0 * 1024.0 * 1024.0) as u64;
        assert_eq!(format_file_size(bytes), "6.5 GB");
    }

    #[test]
    fn trailing_point_zero_trimmed() {
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
    }
}
