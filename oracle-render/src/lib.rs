//! oracle-render - the response-rendering contract of Oracle Bíblico.
//!
//! [`render`] turns whatever JSON the analysis service returned into a
//! [`ViewModel`]: an ordered list of titled, escaped sections that can be
//! inserted into a page verbatim.
//!
//! Resolution rules:
//!
//! 1. Layers come from the first non-empty source among
//!    `analysis.analysis_layers`, `analysis.layers`, `layers`,
//!    `analysis_layers`, then known flat fields on the response or on
//!    `analysis` (see [`ResponseShape`]).
//! 2. A non-empty synthesis mapping (`analysis.synthesis` or `synthesis`) is
//!    appended as the last section.
//! 3. When neither produced anything, one fallback section carries the
//!    pretty-printed response.
//!
//! Rendering is pure and infallible.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod content;
pub mod html;
pub mod shape;
pub mod titles;
pub mod view;

use serde_json::Value;

pub use content::{format_content, Content, Scalar};
pub use html::{escape_html, html_to_text};
pub use shape::{find_synthesis, Layer, ResponseShape};
pub use titles::{prettify_key, title_for, FALLBACK_TITLE, SYNTHESIS_TITLE};
pub use view::{Section, SectionKind, ViewModel};

/// Render an analysis response into a view model.
pub fn render(response: &Value) -> ViewModel {
    let shape = ResponseShape::detect(response);
    let synthesis = find_synthesis(response);

    // A flat `integrated_synthesis` field duplicates the synthesis mapping.
    let skip_flat_synthesis =
        synthesis.is_some() && matches!(shape, ResponseShape::FlatFields { .. });

    let mut sections: Vec<Section> = shape
        .layers()
        .into_iter()
        .filter(|layer| {
            let duplicate = skip_flat_synthesis && layer.key == "integrated_synthesis";
            if duplicate {
                tracing::debug!("Flat integrated_synthesis superseded by synthesis mapping");
            }
            !duplicate
        })
        .map(|layer| Section {
            title: escape_html(&title_for(layer.key)),
            body: format_content(layer.content),
            kind: SectionKind::Layer,
        })
        .collect();

    if let Some(synthesis) = synthesis {
        let content = Content::Mapping(
            synthesis
                .iter()
                .map(|(k, v)| (k.clone(), Content::from(v)))
                .collect(),
        );
        sections.push(Section {
            title: escape_html(SYNTHESIS_TITLE),
            body: content.to_html(),
            kind: SectionKind::Synthesis,
        });
    }

    if sections.is_empty() {
        tracing::debug!("No recognised layers in response, rendering raw dump");
        sections.push(fallback_section(response));
    } else {
        tracing::debug!(sections = sections.len(), "Rendered analysis response");
    }

    ViewModel { sections }
}

/// Render a raw response body. Text that is not JSON is dumped as-is.
pub fn render_text(body: &str) -> ViewModel {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => render(&value),
        Err(_) => ViewModel {
            sections: vec![Section {
                title: escape_html(FALLBACK_TITLE),
                body: escape_html(body),
                kind: SectionKind::Fallback,
            }],
        },
    }
}

fn fallback_section(response: &Value) -> Section {
    let dump = serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string());
    Section {
        title: escape_html(FALLBACK_TITLE),
        body: escape_html(&dump),
        kind: SectionKind::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pipeline_shape_renders_every_layer() {
        let response = json!({
            "status": "success",
            "query": "Profecia sobre cometa na biblia",
            "analysis": {
                "query": "Profecia sobre cometa na biblia",
                "analysis_layers": [
                    {"language_layer": {"original_languages": ["Hebrew", "Greek", "Aramaic"]}},
                    {"numerical_layer": {"gematria_values": {"sample": 26}}},
                    {"historical_layer": {"chronological_context": "Second Temple Period"}},
                    {"theological_layer": {"doctrinal_themes": "Salvation history"}}
                ],
                "synthesis": {"integrated_synthesis": {"depth_assessment": "Comprehensive"}}
            },
            "layers": [],
            "synthesis": {}
        });

        let view = render(&response);
        let titles: Vec<&str> = view.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Análise Linguística",
                "Análise Numérica",
                "Análise Histórica",
                "Análise Teológica",
                "Síntese Integrada"
            ]
        );
        assert_eq!(
            view.sections[0].body,
            "<strong>Original Languages:</strong> Hebrew, Greek, Aramaic<br>"
        );
        assert_eq!(
            view.sections[1].body,
            "<strong>Gematria Values:</strong> {&quot;sample&quot;:26}<br>"
        );
        assert_eq!(
            view.sections[4].plain_text(),
            "Depth Assessment: Comprehensive"
        );
    }

    #[test]
    fn render_text_handles_non_json() {
        let view = render_text("<html>502 Bad Gateway</html>");
        assert!(view.is_fallback());
        assert_eq!(view.sections[0].body, "&lt;html&gt;502 Bad Gateway&lt;/html&gt;");
    }

    #[test]
    fn fallback_dump_is_indented() {
        let view = render(&json!({"unexpected": {"nested": true}}));
        assert_eq!(view.len(), 1);
        assert_eq!(
            view.sections[0].body,
            "{\n  &quot;unexpected&quot;: {\n    &quot;nested&quot;: true\n  }\n}"
        );
    }

    #[test]
    fn single_key_synthesis_entry_keeps_its_label() {
        let view = render(&json!({"synthesis": {"key_one": {"x": 1}}}));
        assert_eq!(view.len(), 1);
        assert_eq!(view.sections[0].kind, SectionKind::Synthesis);
        assert_eq!(
            view.sections[0].body,
            "<strong>Key One:</strong> {&quot;x&quot;:1}<br>"
        );
    }

    #[test]
    fn flat_integrated_synthesis_yields_to_synthesis_mapping() {
        let view = render(&json!({
            "integrated_synthesis": "flat",
            "linguistic_analysis": "t",
            "synthesis": {"a": "b"}
        }));
        let titles: Vec<&str> = view.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Análise Linguística", "Síntese Integrada"]);
        assert_eq!(view.sections[1].kind, SectionKind::Synthesis);
        assert_eq!(view.sections[1].body, "<strong>A:</strong> b<br>");
    }

    #[test]
    fn flat_integrated_synthesis_alone_is_a_layer() {
        let view = render(&json!({"integrated_synthesis": "flat"}));
        assert_eq!(view.len(), 1);
        assert_eq!(view.sections[0].title, "Síntese Integrada");
        assert_eq!(view.sections[0].kind, SectionKind::Layer);
        assert_eq!(view.sections[0].body, "flat");
    }

    #[test]
    fn malformed_layers_array_shadows_flat_fields() {
        let view = render(&json!({"layers": ["oops"], "linguistic_analysis": "texto"}));
        assert!(view.is_fallback());
        assert_eq!(view.len(), 1);
    }
}
