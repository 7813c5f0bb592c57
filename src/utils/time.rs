/// This is the standard way of displaying a duration in focuslog: `47s`,
/// `3m 20s`, `2h 5m`.
pub fn format_seconds(secs: i64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::format_seconds;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "0s");
        assert_eq!(format_seconds(47), "47s");
        assert_eq!(format_seconds(60), "1m 0s");
        assert_eq!(format_seconds(200), "3m 20s");
        assert_eq!(format_seconds(7500), "2h 5m");
    }
}
