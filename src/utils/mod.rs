//! Utility functions.
//!
//! Collection of helper functions used across the bot.

/// Format a username for display.
///
/// If the user has a username, returns @username.
/// Otherwise, returns the first name.
pub fn format_username(username: Option<&str>, first_name: &str) -> String {
    match username {
        Some(u) => format!("@{}", u),
        None => first_name.to_string(),
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build an HTML mention link for a user.
pub fn user_mention(user_id: u64, name: &str) -> String {
    format!("<a href=\"tg://user?id={}\">{}</a>", user_id, html_escape(name))
}

/// Count words of `text` that contain a flagged stem.
pub fn count_bad_words(text: &str) -> u64 {
    let lowered = text.to_lowercase();
    lowered
        .split_whitespace()
        .filter(|word| crate::texts::BAD_WORDS.iter().any(|stem| word.contains(stem)))
        .count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_username() {
        assert_eq!(format_username(Some("rudecat"), "Rude"), "@rudecat");
        assert_eq!(format_username(None, "Rude"), "Rude");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_user_mention_escapes_name() {
        let mention = user_mention(42, "<evil>");
        assert_eq!(mention, "<a href=\"tg://user?id=42\">&lt;evil&gt;</a>");
    }

    #[test]
    fn test_count_bad_words_matches_stems() {
        assert_eq!(count_bad_words("Сука, знову білд впав"), 1);
        assert_eq!(count_bad_words("все добре, дякую"), 0);
    }
}
