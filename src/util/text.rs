use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis string used for truncation
const ELLIPSIS: &str = "...";
/// Display width of the ellipsis (3 columns for ASCII "...")
const ELLIPSIS_WIDTH: usize = 3;

/// Calculates the display width of a string in terminal columns.
///
/// CJK characters and most emoji count as two columns, combining marks as zero.
///
/// ```
/// use briefing::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates a string to fit within a maximum display width.
///
/// If truncation is necessary, appends "..." to indicate text was cut off.
/// Returns `Cow::Borrowed` when the string already fits.
///
/// Widths of 3 or less have no room for "char + ellipsis", so as many whole
/// characters as fit are returned without one.
///
/// ```
/// use briefing::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };
    let cut = byte_end_within(s, budget);

    if max_width <= ELLIPSIS_WIDTH {
        Cow::Owned(s[..cut].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
    }
}

/// Byte offset of the longest prefix of `s` that fits in `width` columns.
fn byte_end_within(s: &str, width: usize) -> usize {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return idx;
        }
        used += w;
    }
    s.len()
}

/// Shorten a summary to at most `max_chars` characters for the collapsed view.
///
/// Cuts at the last word boundary inside the limit when there is one, and
/// appends "...". The flag is `true` when anything was removed.
pub fn summary_preview(text: &str, max_chars: usize) -> (Cow<'_, str>, bool) {
    let text = text.trim();
    let cut = match text.char_indices().nth(max_chars) {
        Some((idx, _)) => idx,
        None => return (Cow::Borrowed(text), false),
    };

    let head = &text[..cut];
    let head = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => head[..space].trim_end(),
        _ => head,
    };
    (Cow::Owned(format!("{}{}", head, ELLIPSIS)), true)
}

fn is_stripped_control(c: char) -> bool {
    c == '\u{7f}' || (c.is_ascii_control() && !matches!(c, '\t' | '\n' | '\r'))
}

/// Strip terminal control characters and ANSI escape sequences from text.
///
/// Article titles and summaries come from the backend, which scraped them from
/// arbitrary pages, so they are cleaned before reaching the terminal.
///
/// Strips:
/// - ASCII control chars other than tab, newline and carriage return, plus DEL
/// - ANSI CSI sequences: `\x1b[` ... (final byte 0x40-0x7E)
/// - ANSI OSC sequences: `\x1b]` ... (until BEL or ST `\x1b\\`)
/// - Bare ESC
///
/// Returns `Cow::Borrowed` when the input has nothing to strip.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_stripped_control(c) {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_truncation() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert!(matches!(truncate_to_width("Short", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_cjk_truncation() {
        // Each CJK char is 2 columns
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本...");
        assert_eq!(truncate_to_width("日本", 10), "日本");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日...");
    }

    #[test]
    fn test_edge_case_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("日本", 1), "");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("日本", 3), "日");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_exact_fit() {
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_summary_preview_short_text_untouched() {
        let (text, truncated) = summary_preview("  A short summary. ", 200);
        assert_eq!(text, "A short summary.");
        assert!(!truncated);
    }

    #[test]
    fn test_summary_preview_cuts_at_word_boundary() {
        let (text, truncated) = summary_preview("The quick brown fox jumps", 12);
        assert_eq!(text, "The quick...");
        assert!(truncated);
    }

    #[test]
    fn test_summary_preview_exact_length() {
        let (text, truncated) = summary_preview("abcdef", 6);
        assert_eq!(text, "abcdef");
        assert!(!truncated);
    }

    #[test]
    fn test_summary_preview_single_long_word() {
        let (text, truncated) = summary_preview("Supercalifragilistic", 5);
        assert_eq!(text, "Super...");
        assert!(truncated);
    }

    #[test]
    fn test_summary_preview_counts_chars_not_bytes() {
        let (text, truncated) = summary_preview("日本語のテキスト", 3);
        assert_eq!(text, "日本語...");
        assert!(truncated);
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "Hello, world!\nline2\ttabbed\r\n";
        let result = strip_control_chars(input);
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, input);
    }

    #[test]
    fn test_strip_control_chars_removes_controls() {
        let input = "he\x00ll\x07o\x08 w\x0bor\x0cld\x01!\x7f";
        assert_eq!(strip_control_chars(input), "hello world!");
    }

    #[test]
    fn test_strip_ansi_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed text\x1b[0m"), "Red text");
        assert_eq!(strip_control_chars("before\x1b[2Aafter"), "beforeafter");
        assert_eq!(strip_control_chars("before\x1bafter"), "beforeafter");
    }

    #[test]
    fn test_strip_osc_terminators() {
        assert_eq!(
            strip_control_chars("\x1b]0;malicious title\x07safe text"),
            "safe text"
        );
        assert_eq!(
            strip_control_chars("\x1b]0;malicious title\x1b\\safe text"),
            "safe text"
        );
    }

    #[test]
    fn test_strip_unicode_preserved() {
        let input = "日本語 \x1b[31m赤い\x1b[0m テキスト";
        assert_eq!(strip_control_chars(input), "日本語 赤い テキスト");
    }
}
