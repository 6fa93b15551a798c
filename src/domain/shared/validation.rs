use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"))
}

/// Single local part, single `@`, dotted domain, no whitespace
pub fn is_valid_email(address: &str) -> bool {
    email_pattern().is_match(address)
}
