//! Text helpers applied to retrieved chunks before they are rendered.

/// Marker appended by [`truncate`] when text is shortened.
pub const TRUNCATION_MARKER: &str = "...";

/// Collapse every run of whitespace (including newlines) into a single space
/// and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Shorten `text` to at most `limit` characters without splitting a word.
///
/// Text of `limit` characters or fewer is returned unchanged. Otherwise the
/// text is cut at `limit` characters; if the cut falls inside a word, it backs
/// off to the last whitespace before the cut. Trailing whitespace is trimmed
/// and [`TRUNCATION_MARKER`] is appended. When no whitespace precedes the cut,
/// exactly `limit` characters are kept.
///
/// ```rust
/// use healthbot_rag::truncate;
///
/// assert_eq!(truncate("rest and plenty of fluids", 12), "rest and...");
/// assert_eq!(truncate("hydration", 4), "hydr...");
/// assert_eq!(truncate("short", 50), "short");
/// ```
pub fn truncate(text: &str, limit: usize) -> String {
    let Some((cut, next)) = text.char_indices().nth(limit) else {
        return text.to_string();
    };

    let head = &text[..cut];
    let kept = if next.is_whitespace() {
        head
    } else {
        match head.rfind(char::is_whitespace) {
            Some(pos) => &head[..pos],
            None => head,
        }
    };

    format!("{}{TRUNCATION_MARKER}", kept.trim_end())
}

/// Return the first sentence of `text` (everything before the first `.`),
/// terminated with a period.
pub fn first_sentence(text: &str) -> String {
    let sentence = text.split('.').next().unwrap_or_default().trim_end();
    format!("{sentence}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_newlines_and_runs_of_spaces() {
        assert_eq!(normalize_whitespace("  Flu \n\n is\tcommon  "), "Flu is common");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn truncate_backs_off_to_word_boundary() {
        assert_eq!(truncate("antibiotics treat bacterial infections", 22), "antibiotics treat...");
    }

    #[test]
    fn truncate_keeps_whole_word_when_cut_lands_on_space() {
        assert_eq!(truncate("antibiotics treat bacterial", 17), "antibiotics treat...");
    }

    #[test]
    fn truncate_without_whitespace_cuts_exactly() {
        assert_eq!(truncate("pneumonoultramicroscopic", 6), "pneumo...");
    }

    #[test]
    fn truncate_drops_a_partial_first_word_after_leading_whitespace() {
        assert_eq!(truncate(" abcdef", 4), "...");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate("ééé ééé", 5), "ééé...");
    }

    #[test]
    fn first_sentence_appends_period() {
        let text = "Asthma narrows airways. It is chronic.";
        assert_eq!(first_sentence(text), "Asthma narrows airways.");
        assert_eq!(first_sentence("No period here"), "No period here.");
    }
}
