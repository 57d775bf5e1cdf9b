//! Normalization applied to a raw value before it is parsed.
//!
//! Steps, in order:
//! 1. Lowercase (when `force_lowercase`).
//! 2. Trim the cut set from both ends: latin whitespace when `trim_space`,
//!    `\r` and `\n` when `trim_line_endings`.
//! 3. While both boundary characters are quotes (`'`, `"` or `` ` ``, not
//!    necessarily the same), strip one from each end and trim again.

use crate::options::ReadOptions;

/// Latin whitespace: tab, LF, VT, FF, CR, space, NEL, NBSP.
const SPACE_CHARS: [char; 8] = [
    '\t', '\n', '\u{0B}', '\u{0C}', '\r', ' ', '\u{85}', '\u{A0}',
];

const QUOTE_CHARS: [char; 3] = ['\'', '"', '`'];

fn is_quote(c: char) -> bool {
    QUOTE_CHARS.contains(&c)
}

/// Normalize a raw value according to `options`.
pub fn normalize(raw: &str, options: &ReadOptions) -> String {
    let value = if options.force_lowercase {
        raw.to_lowercase()
    } else {
        raw.to_string()
    };

    let cut = |c: char| {
        (options.trim_space && SPACE_CHARS.contains(&c))
            || (options.trim_line_endings && (c == '\r' || c == '\n'))
    };

    let mut trimmed = value.trim_matches(&cut);
    if options.trim_quotes {
        loop {
            let mut chars = trimmed.chars();
            match (chars.next(), chars.next_back()) {
                (Some(first), Some(last)) if is_quote(first) && is_quote(last) => {
                    trimmed = chars.as_str().trim_matches(&cut);
                }
                _ => break,
            }
        }
    }

    trimmed.to_string()
}
