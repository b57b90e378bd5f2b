//! Display titles for layer identifiers.

/// Title of the section that carries the integrated synthesis.
pub const SYNTHESIS_TITLE: &str = "Síntese Integrada";

/// Title of the raw-dump section shown when no known shape was found.
pub const FALLBACK_TITLE: &str = "Resposta do Oráculo (formato não reconhecido)";

/// Known layer identifiers, in both the layered (`*_layer`) and the flat
/// (`*_analysis`) vocabularies the analysis service has used.
const KNOWN_TITLES: &[(&str, &str)] = &[
    ("language_layer", "Análise Linguística"),
    ("linguistic_layer", "Análise Linguística"),
    ("linguistic_analysis", "Análise Linguística"),
    ("hebrew_greek_analysis", "Hebraico/Grego Antigos"),
    ("numerical_layer", "Análise Numérica"),
    ("numeric_analysis", "Análise Numérica"),
    ("numerical_analysis", "Análise Numérica"),
    ("gematria_layer", "Gematria com Valores Hebraicos"),
    ("gematria_analysis", "Gematria com Valores Hebraicos"),
    ("historical_layer", "Análise Histórica"),
    ("historical_analysis", "Análise Histórica"),
    ("archaeological_layer", "Contexto Arqueológico"),
    ("archaeological_context", "Contexto Arqueológico"),
    ("theological_layer", "Análise Teológica"),
    ("theological_analysis", "Análise Teológica"),
    ("divine_concepts", "Conceitos Divinos"),
    ("divine_concepts_layer", "Conceitos Divinos"),
    ("synthesis", SYNTHESIS_TITLE),
    ("integrated_synthesis", SYNTHESIS_TITLE),
    ("complete_conclusion", "Conclusão Completa da Análise"),
];

/// Look up the curated title for a layer identifier.
pub fn known_title(key: &str) -> Option<&'static str> {
    let normalized = key.trim().to_ascii_lowercase();
    KNOWN_TITLES
        .iter()
        .find(|(id, _)| *id == normalized)
        .map(|(_, title)| *title)
}

/// Generic key transform: separators become spaces, each word capitalised.
///
/// `foo_bar_layer` → `Foo Bar Layer`, `key-one` → `Key One`. The result is
/// NOT escaped.
pub fn prettify_key(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve the (unescaped) display title for a layer identifier.
pub fn title_for(key: &str) -> String {
    if let Some(title) = known_title(key) {
        return title.to_string();
    }
    let pretty = prettify_key(key);
    if pretty.is_empty() {
        key.to_string()
    } else {
        pretty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("language_layer", "Análise Linguística" ; "layered linguistic")]
    #[test_case("linguistic_analysis", "Análise Linguística" ; "flat linguistic")]
    #[test_case("numerical_layer", "Análise Numérica" ; "layered numerical")]
    #[test_case("gematria_analysis", "Gematria com Valores Hebraicos" ; "gematria")]
    #[test_case("historical_layer", "Análise Histórica" ; "historical")]
    #[test_case("archaeological_context", "Contexto Arqueológico" ; "archaeological")]
    #[test_case("theological_layer", "Análise Teológica" ; "theological")]
    #[test_case("divine_concepts", "Conceitos Divinos" ; "divine concepts")]
    #[test_case("integrated_synthesis", SYNTHESIS_TITLE ; "synthesis")]
    #[test_case("Historical_Layer", "Análise Histórica" ; "case insensitive")]
    fn known_identifiers(key: &str, expected: &str) {
        assert_eq!(title_for(key), expected);
    }

    #[test_case("foo_bar_layer", "Foo Bar Layer" ; "underscores")]
    #[test_case("key-one", "Key One" ; "dashes")]
    #[test_case("already Spaced  words", "Already Spaced Words" ; "collapses whitespace")]
    #[test_case("évangile_selon_jean", "Évangile Selon Jean" ; "non ascii initial")]
    #[test_case("__x__", "X" ; "leading and trailing separators")]
    fn generic_transform(key: &str, expected: &str) {
        assert_eq!(title_for(key), expected);
    }

    #[test]
    fn separator_only_key_keeps_raw_form() {
        assert_eq!(title_for("___"), "___");
        assert_eq!(prettify_key("___"), "");
    }
}
