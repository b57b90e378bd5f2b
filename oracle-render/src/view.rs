//! View model handed to display surfaces.

use serde::Serialize;

use crate::html::html_to_text;

/// What produced a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Layer,
    Synthesis,
    Fallback,
}

/// One titled block of rendered output. Both fields are escaped markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: String,
    pub kind: SectionKind,
}

impl Section {
    /// Title as plain text.
    pub fn plain_title(&self) -> String {
        html_to_text(&self.title)
    }

    /// Body as plain text, one line per labeled entry.
    pub fn plain_text(&self) -> String {
        html_to_text(&self.body)
    }
}

/// Ordered sections ready for display. Never empty when built by `render`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ViewModel {
    pub sections: Vec<Section>,
}

impl ViewModel {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Whether the response was shown as a raw dump.
    pub fn is_fallback(&self) -> bool {
        self.sections
            .iter()
            .any(|section| section.kind == SectionKind::Fallback)
    }

    /// Markup for the results container.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"result-item\">");
        for section in &self.sections {
            html.push_str("<div class=\"result-label\">");
            html.push_str(&section.title);
            html.push_str("</div>");
            match section.kind {
                SectionKind::Fallback => {
                    html.push_str("<div class=\"result-value\"><pre class=\"result-raw\">");
                    html.push_str(&section.body);
                    html.push_str("</pre></div>");
                }
                SectionKind::Layer | SectionKind::Synthesis => {
                    html.push_str("<div class=\"result-value\">");
                    html.push_str(&section.body);
                    html.push_str("</div>");
                }
            }
        }
        html.push_str("</div>");
        html
    }

    /// Plain-text rendering for terminals: title, underline, body.
    pub fn to_plain_text(&self) -> String {
        self.sections
            .iter()
            .map(|section| {
                let title = section.plain_title();
                let rule = "─".repeat(title.chars().count());
                let body = match section.kind {
                    // Keep the indentation of the raw dump.
                    SectionKind::Fallback => crate::html::html_to_text_preformatted(&section.body),
                    _ => section.plain_text(),
                };
                format!("{title}\n{rule}\n{body}\n")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a ViewModel {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
