//! National identity card numbers (`12345-1234567-1`).

use regex::Regex;
use std::sync::LazyLock;

/// 13 digits, optionally grouped 5-7-1 with dashes.
#[allow(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static ID_CARD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d{5}-\d{7}-\d|\d{13})$").unwrap());

/// Digits only, so `35202-1234567-1` and `3520212345671` compare equal.
pub fn canonical_id_card(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_valid_id_card(raw: &str) -> bool {
    ID_CARD_REGEX.is_match(raw.trim())
}
