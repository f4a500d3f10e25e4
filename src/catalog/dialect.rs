//! Translation of catalog patterns into `regex` crate syntax.
//!
//! Catalog patterns are written for RE2, where the Perl classes `\d`, `\s`,
//! `\w` and the word boundary `\b` are ASCII-only. The `regex` crate widens
//! them to Unicode, so they are rewritten to explicit ASCII sets here while
//! the rest of the pattern keeps Unicode semantics (`.` still matches one
//! UTF-8 character).
//!
//! Later `version` marker groups are renamed so patterns with the marker on
//! several alternatives still compile.

/// Prefix given to every `version` marker group after the first.
pub const DUPLICATE_MARKER_PREFIX: &str = "version__alt";

const MARKERS: [&str; 2] = ["(?P<version>", "(?<version>"];

/// Rewrite `pattern` into `regex` crate syntax.
pub fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut markers = 0usize;
    let mut in_class = false;
    let mut class_start = false;
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if !in_class {
            if let Some(marker) = MARKERS.iter().find(|m| rest.starts_with(**m)) {
                markers += 1;
                if markers == 1 {
                    out.push_str(marker);
                } else {
                    out.push_str(&format!("(?P<{DUPLICATE_MARKER_PREFIX}{markers}>"));
                }
                rest = &rest[marker.len()..];
                continue;
            }
        }

        match c {
            '\\' => {
                let mut escaped = rest[1..].chars();
                match escaped.next() {
                    Some(class) => {
                        out.push_str(&perl_class(class, in_class));
                        rest = &rest[1 + class.len_utf8()..];
                    }
                    None => {
                        out.push('\\');
                        rest = "";
                    }
                }
                class_start = false;
                continue;
            }
            '[' if in_class && rest.starts_with("[:") => {
                // POSIX class such as `[:alpha:]`, copied through.
                let end = rest.find(":]").map(|i| i + 2).unwrap_or(rest.len());
                out.push_str(&rest[..end]);
                rest = &rest[end..];
                class_start = false;
                continue;
            }
            '[' if !in_class => {
                in_class = true;
                class_start = true;
                out.push('[');
                rest = &rest[1..];
                if let Some(stripped) = rest.strip_prefix('^') {
                    out.push('^');
                    rest = stripped;
                }
                continue;
            }
            ']' if in_class && !class_start => {
                in_class = false;
            }
            _ => {}
        }

        class_start = false;
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// ASCII rendition of an escaped character, or the escape unchanged.
fn perl_class(class: char, in_class: bool) -> String {
    let replacement = match (class, in_class) {
        ('d', false) => "[0-9]",
        ('D', false) => "[^0-9]",
        ('s', false) => r"[\t\n\f\r ]",
        ('S', false) => r"[^\t\n\f\r ]",
        ('w', false) => "[0-9A-Za-z_]",
        ('W', false) => "[^0-9A-Za-z_]",
        ('b', false) => r"(?-u:\b)",
        ('B', false) => r"(?-u:\B)",
        ('d', true) => "0-9",
        ('D', true) => "[:^digit:]",
        ('s', true) => r"\t\n\f\r ",
        ('S', true) => "[:^space:]",
        ('w', true) => "0-9A-Za-z_",
        ('W', true) => "[:^word:]",
        _ => return format!("\\{class}"),
    };
    replacement.to_string()
}
