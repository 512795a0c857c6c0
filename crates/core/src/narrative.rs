//! Auto-bullet formatting for the two free-text narrative fields of a case.

/// Bullet glyph (with its trailing space) prefixed to narrative lines.
pub const BULLET: &str = "• ";

/// Normalises a narrative so every non-empty line is a bullet point.
///
/// Each line is trimmed. A non-empty line that does not already start with [`BULLET`] gets one
/// prepended; empty lines are kept as empty lines. Applying the rule twice gives the same
/// result as applying it once.
pub fn normalise_narrative(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                String::new()
            } else if trimmed.starts_with(BULLET) {
                trimmed.to_string()
            } else {
                format!("{}{}", BULLET, trimmed)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_stays_empty() {
        assert_eq!(normalise_narrative(""), "");
    }

    #[test]
    fn test_blank_lines_are_preserved() {
        assert_eq!(normalise_narrative("a\n\nb"), "• a\n\n• b");
    }

    #[test]
    fn test_lines_are_trimmed_before_bulleting() {
        assert_eq!(
            normalise_narrative("  extubated 0900  \n\tMAP > 65 "),
            "• extubated 0900\n• MAP > 65"
        );
    }

    #[test]
    fn test_already_bulleted_lines_pass_through() {
        assert_eq!(normalise_narrative("• done\nnext"), "• done\n• next");
    }

    #[test]
    fn test_whitespace_only_lines_become_empty() {
        assert_eq!(normalise_narrative("a\n   \nb"), "• a\n\n• b");
    }

    #[test]
    fn test_crlf_line_endings_are_trimmed() {
        assert_eq!(normalise_narrative("a\r\nb"), "• a\n• b");
    }

    #[test]
    fn test_bare_bullet_glyph_is_bulleted_once() {
        // "•" without its trailing space is not a bullet prefix, but trimming "• " yields "•".
        let once = normalise_narrative("• ");
        assert_eq!(once, "• •");
        assert_eq!(normalise_narrative(&once), once);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "\n",
            "a",
            "a\n\nb",
            "  • x\n  y  \n\n\n",
            "•no space",
            "• ",
            "\r\n•\r\n  • • nested",
            "lactate 2.1 -> 1.4\nfamily updated",
        ];
        for input in inputs {
            let once = normalise_narrative(input);
            assert_eq!(normalise_narrative(&once), once, "input: {:?}", input);
        }
    }
}
