use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal cells, ignoring ANSI escape sequences.
pub fn display_width(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }

    let stripped = strip_ansi_escapes::strip(text.as_bytes());
    String::from_utf8_lossy(&stripped).width()
}
