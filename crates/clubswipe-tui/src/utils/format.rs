/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Truncate, then left-align into exactly `width` columns.
pub fn pad_to(s: &str, width: usize) -> String {
    format!("{:<width$}", truncate(s, width), width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("Hello", 2), "He");
        // Multi-byte names don't split a character
        assert_eq!(truncate("Zoë Ångström", 6), "Zoë...");
    }

    #[test]
    fn test_pad_to() {
        assert_eq!(pad_to("Bob", 5), "Bob  ");
        assert_eq!(pad_to("Bartholomew", 8), "Barth...");
    }
}
