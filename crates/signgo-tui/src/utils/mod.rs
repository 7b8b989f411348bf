//! Utility functions for the TUI

use signgo_core::NOT_AVAILABLE;

/// Truncate a string with ellipsis, counting characters
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// The text, or "N/A" when blank
pub fn or_not_available(s: &str) -> &str {
    if s.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Mandaue", 10), "Mandaue");
        assert_eq!(truncate("Cagayan de Oro Port", 10), "Cagayan...");
        assert_eq!(truncate("Parañaque", 3), "Par");
        assert_eq!(truncate("Parañaque City", 8), "Parañ...");
    }

    #[test]
    fn test_or_not_available() {
        assert_eq!(or_not_available("  "), "N/A");
        assert_eq!(or_not_available("Juan Dela Cruz"), "Juan Dela Cruz");
    }
}
