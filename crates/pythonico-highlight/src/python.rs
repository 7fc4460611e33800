//! Python rule set and palette.

use pythonico_core::StyleId;

/// Reserved words highlighted as keywords.
pub const PYTHON_KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Style ids used by the Python rule set.
///
/// These are only identifiers; [`python_style`] maps them to colors.
pub const PYTHON_STYLE_KEYWORD: StyleId = 0x0300_0001;
/// String literal style id.
pub const PYTHON_STYLE_STRING: StyleId = 0x0300_0002;
/// Comment style id.
pub const PYTHON_STYLE_COMMENT: StyleId = 0x0300_0003;

/// Style ids assigned to each Python rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonStyles {
    /// Reserved words.
    pub keyword: StyleId,
    /// Single- and double-quoted strings.
    pub string: StyleId,
    /// `#` line comments.
    pub comment: StyleId,
}

impl Default for PythonStyles {
    fn default() -> Self {
        Self {
            keyword: PYTHON_STYLE_KEYWORD,
            string: PYTHON_STYLE_STRING,
            comment: PYTHON_STYLE_COMMENT,
        }
    }
}

/// Rule patterns in priority order: keywords, `"..."`, `'...'`, `#...`.
pub(crate) fn rule_patterns(styles: PythonStyles) -> Vec<(String, StyleId)> {
    vec![
        (
            format!(r"\b(?:{})\b", PYTHON_KEYWORDS.join("|")),
            styles.keyword,
        ),
        (r#""[^"\n]*""#.to_string(), styles.string),
        (r"'[^'\n]*'".to_string(), styles.string),
        (r"#[^\n]*".to_string(), styles.comment),
    ]
}

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

/// Concrete formatting for a style id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Foreground color.
    pub foreground: Rgb,
    /// Bold weight.
    pub bold: bool,
}

/// The highlight color contract for the default Python style ids.
pub fn python_style(style_id: StyleId) -> Option<TextStyle> {
    match style_id {
        PYTHON_STYLE_KEYWORD => Some(TextStyle {
            foreground: Rgb::from_hex(0x0000FF),
            bold: true,
        }),
        PYTHON_STYLE_STRING => Some(TextStyle {
            foreground: Rgb::from_hex(0xBDB76B),
            bold: false,
        }),
        PYTHON_STYLE_COMMENT => Some(TextStyle {
            foreground: Rgb::from_hex(0xD8BFD8),
            bold: false,
        }),
        _ => None,
    }
}
