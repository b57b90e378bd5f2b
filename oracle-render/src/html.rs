//! HTML escaping and plain-text extraction.

/// Escape HTML special characters.
///
/// Covers the five characters that matter both in element content and in
/// quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reverse `escape_html`. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

/// Convert renderer markup back to readable plain text.
///
/// Line breaks become newlines, tags are dropped, entities are decoded and
/// blank lines removed. Only markup produced by this crate is expected: text
/// content is always escaped, so every raw `<` starts one of our tags.
pub fn html_to_text(html: &str) -> String {
    let with_breaks = html.replace("<br>", "\n");

    let mut stripped = String::with_capacity(with_breaks.len());
    let mut in_tag = false;
    for ch in with_breaks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    unescape_html(&stripped)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode escaped preformatted text, keeping indentation and blank lines.
pub fn html_to_text_preformatted(html: &str) -> String {
    unescape_html(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_html("Gênesis 1:1"), "Gênesis 1:1");
    }

    #[test]
    fn text_extraction_handles_breaks_and_entities() {
        let html = "<strong>Core Concepts:</strong> covenant, messiah<br><strong>Note:</strong> a &lt; b &amp;&amp; c<br>";
        assert_eq!(
            html_to_text(html),
            "Core Concepts: covenant, messiah\nNote: a < b && c"
        );
    }

    #[test]
    fn text_extraction_does_not_double_decode() {
        assert_eq!(html_to_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn extraction_of_escaped_text_restores_original() {
        let original = "if x < 3 && y > \"2\" then 'ok'";
        assert_eq!(html_to_text(&escape_html(original)), original);
    }
}
