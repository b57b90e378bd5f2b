//! Contract tests for response rendering.

use oracle_render::{
    format_content, render, SectionKind, FALLBACK_TITLE, SYNTHESIS_TITLE,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn assert_single_fallback(response: &Value) {
    let view = render(response);
    assert_eq!(view.len(), 1, "expected one section for {response}");
    assert_eq!(view.sections[0].title, FALLBACK_TITLE);
    assert_eq!(view.sections[0].kind, SectionKind::Fallback);
}

#[test]
fn empty_object_and_null_fall_back() {
    assert_single_fallback(&json!({}));
    assert_single_fallback(&Value::Null);
    assert_eq!(render(&Value::Null).sections[0].body, "null");
}

#[test]
fn primitives_fall_back_to_their_dump() {
    assert_single_fallback(&json!(42));
    assert_single_fallback(&json!("só texto"));
    assert_single_fallback(&json!([1, 2, 3]));
    assert_eq!(render(&json!("a<b")).sections[0].body, "&quot;a&lt;b&quot;");
}

#[test]
fn empty_layers_and_synthesis_are_not_data() {
    assert_single_fallback(&json!({"layers": [], "synthesis": {}}));
    assert_single_fallback(&json!({
        "analysis": {"analysis_layers": [], "layers": [], "synthesis": {}},
        "analysis_layers": []
    }));
}

#[test]
fn layer_then_synthesis() {
    let view = render(&json!({
        "layers": [{"historical_layer": "text A"}],
        "synthesis": {"key_one": "v1"}
    }));

    assert_eq!(view.len(), 2);
    assert_eq!(view.sections[0].title, "Análise Histórica");
    assert_eq!(view.sections[0].body, "text A");
    assert_eq!(view.sections[0].kind, SectionKind::Layer);

    assert_eq!(view.sections[1].title, SYNTHESIS_TITLE);
    assert_eq!(view.sections[1].kind, SectionKind::Synthesis);
    assert!(view.sections[1].plain_text().contains("Key One: v1"));
    assert_eq!(view.sections[1].body, "<strong>Key One:</strong> v1<br>");
}

#[test]
fn synthesis_alone_is_enough() {
    let view = render(&json!({"synthesis": {"cross_layer_connections": "Validated patterns"}}));
    assert_eq!(view.len(), 1);
    assert_eq!(view.sections[0].kind, SectionKind::Synthesis);
}

#[test]
fn nested_layers_take_precedence() {
    let view = render(&json!({
        "layers": [{"top_level_layer": "ignored"}],
        "analysis": {"analysis_layers": [{"theological_layer": "nested wins"}]}
    }));
    assert_eq!(view.len(), 1);
    assert_eq!(view.sections[0].title, "Análise Teológica");
    assert_eq!(view.sections[0].body, "nested wins");
}

#[test]
fn layer_order_follows_payload() {
    let view = render(&json!({
        "layers": [
            {"theological_layer": "1"},
            {"zeta_layer": "2"},
            {"language_layer": "3"}
        ]
    }));
    let titles: Vec<&str> = view.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Análise Teológica", "Zeta Layer", "Análise Linguística"]);
}

#[test]
fn flat_response_uses_known_fields() {
    let view = render(&json!({
        "linguistic_analysis": "Raiz hebraica <dabar>",
        "gematria_analysis": "26",
        "unrelated": "not shown",
        "complete_conclusion": "Fim"
    }));
    let titles: Vec<&str> = view.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Análise Linguística",
            "Gematria com Valores Hebraicos",
            "Conclusão Completa da Análise"
        ]
    );
    assert_eq!(view.sections[0].body, "Raiz hebraica &lt;dabar&gt;");
}

#[test]
fn unknown_layer_key_gets_generic_title() {
    let view = render(&json!({"layers": [{"foo_bar_layer": "x"}]}));
    assert_eq!(view.sections[0].title, "Foo Bar Layer");
}

#[test]
fn unknown_layer_key_is_escaped_in_title() {
    let view = render(&json!({"layers": [{"<img src=x>_layer": "x"}]}));
    assert_eq!(view.sections[0].title, "&lt;img Src=x&gt; Layer");
}

#[test]
fn multi_key_entry_renders_first_key_only() {
    // Multi-key layer entries are not a documented shape; first key wins.
    let view = render(&json!({
        "layers": [{"historical_layer": "kept", "theological_layer": "dropped"}]
    }));
    assert_eq!(view.len(), 1);
    assert_eq!(view.sections[0].body, "kept");
}

#[test]
fn mapping_format_matches_contract() {
    let html = format_content(&json!({"a": [1, 2], "b": {"x": 1}}));
    let lines: Vec<&str> = html.split("<br>").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "<strong>A:</strong> 1, 2");
    assert_eq!(lines[1], "<strong>B:</strong> {&quot;x&quot;:1}");
}

#[test]
fn html_output_is_never_empty() {
    for response in [json!(null), json!({}), json!({"layers": [{}]}), json!(false)] {
        let view = render(&response);
        assert!(!view.is_empty());
        assert!(view.to_html().contains("result-label"));
    }
}

proptest! {
    #[test]
    fn formatted_text_has_no_raw_markup(s in ".*[<>&\"'].*") {
        let html = format_content(&Value::String(s));
        prop_assert!(!html.contains('<'));
        prop_assert!(!html.contains('>'));
        prop_assert!(!html.contains('"'));
        prop_assert!(!html.contains('\''));
        for (idx, _) in html.match_indices('&') {
            let rest = &html[idx..];
            prop_assert!(
                rest.starts_with("&amp;")
                    || rest.starts_with("&lt;")
                    || rest.starts_with("&gt;")
                    || rest.starts_with("&quot;")
                    || rest.starts_with("&#039;")
            );
        }
    }

    #[test]
    fn arbitrary_keys_never_break_out_of_labels(key in "[a-z<>&_\"' ]{1,16}", value in ".{0,16}") {
        let mut map = serde_json::Map::new();
        map.insert(key, Value::String(value));
        let html = format_content(&Value::Object(map));
        let without_tags = html.replace("<strong>", "").replace("</strong>", "").replace("<br>", "");
        prop_assert!(!without_tags.contains('<'));
        prop_assert!(!without_tags.contains('>'));
    }

    #[test]
    fn render_never_returns_an_empty_view(n in any::<i64>(), s in ".{0,8}") {
        let view = render(&json!({"layers": [n], "synthesis": s}));
        prop_assert!(!view.is_empty());
    }
}
