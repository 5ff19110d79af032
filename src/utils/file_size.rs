pub struct FileSizeUtils;

impl FileSizeUtils {
    /// Formats a byte count with at most two decimals, dropping trailing zeros.
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
        let mut value = size as f64;
        let mut unit_index = 0;

        while value >= 1024.0 && unit_index < UNITS.len() - 1 {
            value /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            return format!("{} {}", size, UNITS[0]);
        }

        format!("{} {}", Self::format_decimal(value), UNITS[unit_index])
    }

    /// At most two decimals, trailing zeros dropped.
    pub fn format_decimal(value: f64) -> String {
        let rounded = format!("{:.2}", value);
        rounded
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
