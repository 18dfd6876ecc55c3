/// Convert a byte count to the largest binary unit with one decimal place.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

    let mut size = bytes as f64;
    let mut index = 0;
    while size >= 1024.0 && index < UNITS.len() - 1 {
        size /= 1024.0;
        index += 1;
    }
    format!("{size:.1}{}", UNITS[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_below_one_kib() {
        assert_eq!(format_bytes(0), "0.0B");
        assert_eq!(format_bytes(512), "512.0B");
    }

    #[test]
    fn exact_binary_boundaries() {
        assert_eq!(format_bytes(1024), "1.0KiB");
        assert_eq!(format_bytes(4096), "4.0KiB");
        assert_eq!(format_bytes(16384), "16.0KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.0MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.0GiB");
    }

    #[test]
    fn fractional_sizes_round_to_one_decimal() {
        assert_eq!(format_bytes(1536), "1.5KiB");
        assert_eq!(format_bytes(2_621_440), "2.5MiB");
    }

    #[test]
    fn huge_sizes_stay_in_largest_unit() {
        assert_eq!(format_bytes(u64::MAX), "16.0EiB");
    }
}
