use std::fmt;

use derive_more::Deref;
use serde::Serialize;

/// A lowercase, hyphen-separated name safe for file names and package names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Serialize)]
pub struct Slug(String);

/// A PascalCase name that is a valid JavaScript identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Serialize)]
pub struct Identifier(String);

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Slug used when a name has no transliterable content.
pub const FALLBACK_SLUG: &str = "prototype";

/// Identifier used when a name has no transliterable content.
pub const FALLBACK_IDENTIFIER: &str = "Prototype";

/// Names a generated component must not take: they are bound by the
/// component's own imports.
const RESERVED_IDENTIFIERS: &[&str] = &["React"];

/// The longest slug [`slugify()`] produces, in bytes. Keeps package names
/// under npm's limit and export file names under common file system limits.
pub const MAX_SLUG_LEN: usize = 200;

/// Calls `f` with each ASCII byte of the transliteration of `string`.
/// Whitespace, control characters, and characters with no transliteration
/// are reported as `-`.
fn transliterate<F: FnMut(u8)>(string: &str, mut f: F) {
    for ch in string.chars() {
        let ascii = match ch.is_whitespace() || ch.is_control() {
            true => "-",
            false => deunicode::deunicode_char(ch).unwrap_or("-"),
        };

        ascii.bytes().for_each(&mut f);
    }
}

/// Convert spaces to hyphens. Transliterate non-ASCII characters, then remove
/// characters that aren't alphanumerics, underscores, or hyphens. Convert to
/// lowercase. Also strip leading and trailing separators, including leading
/// underscores. Slugs longer than [`MAX_SLUG_LEN`] are cut back to a word
/// boundary. Falls back to [`FALLBACK_SLUG`] when nothing remains.
pub fn slugify(string: &str) -> Slug {
    let mut output = String::with_capacity(string.len());

    let mut need_dash = false;
    transliterate(string, |b| match b {
        b'_' if output.is_empty() => {}
        b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => {
            if need_dash {
                output.push('-');
                need_dash = false;
            }

            output.push(b.to_ascii_lowercase() as char);
        }
        _ => need_dash = !output.is_empty(),
    });

    if output.len() > MAX_SLUG_LEN {
        let cut = match output.as_bytes()[MAX_SLUG_LEN] {
            b'-' => MAX_SLUG_LEN,
            _ => output[..MAX_SLUG_LEN].rfind('-').unwrap_or(MAX_SLUG_LEN),
        };

        output.truncate(cut);
    }

    if output.is_empty() {
        output.push_str(FALLBACK_SLUG);
    }

    Slug(output)
}

/// Converts `string` to a PascalCase identifier: characters are
/// transliterated, every run of non-alphanumerics starts a new word, and the
/// first letter of each word is upper-cased.
///
/// An identifier that would start with a digit is prefixed with `Site`; one
/// that collides with a name the component imports gets a `Site` suffix.
///
/// ```
/// use sitesmith::util::identifier;
///
/// assert_eq!(&*identifier("Acme Co"), "AcmeCo");
/// assert_eq!(&*identifier("café-bar & grill"), "CafeBarGrill");
/// assert_eq!(&*identifier("24/7 Plumbing"), "Site247Plumbing");
/// assert_eq!(&*identifier("!!!"), "Prototype");
/// ```
pub fn identifier(string: &str) -> Identifier {
    let mut output = String::with_capacity(string.len());

    let mut word_start = true;
    transliterate(string, |b| match b {
        b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' if word_start => {
            output.push(b.to_ascii_uppercase() as char);
            word_start = false;
        }
        b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => output.push(b as char),
        _ => word_start = true,
    });

    if output.is_empty() {
        output.push_str(FALLBACK_IDENTIFIER);
    } else if output.starts_with(|c: char| c.is_ascii_digit()) {
        output.insert_str(0, "Site");
    }

    if RESERVED_IDENTIFIERS.contains(&output.as_str()) {
        output.push_str("Site");
    }

    Identifier(output)
}
