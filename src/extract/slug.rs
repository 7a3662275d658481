use deunicode::deunicode;

/// Converts a title into a file-name friendly ASCII slug
///
/// Transliterates to ASCII, lowercases, and collapses every run of
/// non-alphanumeric characters (apostrophes included) into a single `-`.
/// Leading and trailing separators are trimmed.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(slugify("My Cool App"), "my-cool-app");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(slugify("  Hello,   World!! "), "hello-world");
        assert_eq!(slugify("a -- b"), "a-b");
    }

    #[test]
    fn test_apostrophes_separate_words() {
        assert_eq!(slugify("Alice's Tool"), "alice-s-tool");
        assert_eq!(slugify("Bob\u{2019}s Bot"), "bob-s-bot");
    }

    #[test]
    fn test_non_ascii_is_transliterated() {
        assert_eq!(slugify("Café Über"), "cafe-uber");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn test_path_characters_removed() {
        assert_eq!(slugify("software/foo/updates"), "software-foo-updates");
    }

    #[test]
    fn test_only_symbols_is_empty() {
        assert_eq!(slugify("!!! ???"), "");
    }
}
