//! Property-based tests for the file size formatter.

use proptest::prelude::*;

use downbar::format::{file_size, SIZE_UNITS};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    // Every rendering is "<value> <unit>" with a known unit and a value
    // that stayed below the next 1024-step (allowing the 1023.95..1024
    // rounding edge of the one-decimal display).
    #[test]
    fn size_always_renders_a_known_unit(bytes in any::<i64>()) {
        let rendered = file_size(bytes);
        let (value, unit) = rendered.split_once(' ').unwrap();
        prop_assert!(SIZE_UNITS.contains(&unit), "unknown unit in {rendered}");
        let value: f64 = value.parse().unwrap();
        prop_assert!(value >= 0.0);
        prop_assert!(value <= 1024.0);
    }

    #[test]
    fn size_of_exact_kilobyte_multiples(kb in 1i64..1024) {
        prop_assert_eq!(file_size(kb * 1024), format!("{}.0 KB", kb));
    }

    #[test]
    fn size_below_one_kilobyte_renders_bytes(bytes in 0i64..1024) {
        prop_assert_eq!(file_size(bytes), format!("{}.0 bytes", bytes));
    }

    #[test]
    fn negative_sizes_clamp_to_zero(bytes in i64::MIN..0) {
        prop_assert_eq!(file_size(bytes), "0.0 bytes");
    }
}
