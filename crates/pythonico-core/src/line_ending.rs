//! Line ending helpers.
//!
//! The buffer stores text using LF (`'\n'`) newlines only. Files using CRLF (`"\r\n"`) or lone
//! CR (`'\r'`) are normalized on load, and documents are always written back with LF.

/// The newline sequence found in a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
    /// Classic Mac-style lone CR (`'\r'`).
    Cr,
}

impl LineEnding {
    /// Detect the dominant line ending from a source text.
    ///
    /// Policy: any CRLF makes the text [`LineEnding::Crlf`]; otherwise any lone CR makes it
    /// [`LineEnding::Cr`]; otherwise [`LineEnding::Lf`].
    pub fn detect_in_text(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::Crlf
        } else if text.contains('\r') {
            Self::Cr
        } else {
            Self::Lf
        }
    }

    /// Human readable label, as shown in logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Lf => "LF",
            Self::Crlf => "CRLF",
            Self::Cr => "CR",
        }
    }
}

/// Convert CRLF and lone CR line breaks to LF.
///
/// Text without any `'\r'` is copied through unchanged.
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(LineEnding::detect_in_text("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect_in_text("a\r\nb\n"), LineEnding::Crlf);
        assert_eq!(LineEnding::detect_in_text("a\rb"), LineEnding::Cr);
        assert_eq!(LineEnding::detect_in_text(""), LineEnding::Lf);
    }

    #[test]
    fn test_normalize_mixed() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(normalize_line_endings("\r\r\n"), "\n\n");
        assert_eq!(normalize_line_endings("plain"), "plain");
    }
}
