use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::error::EngineError;

pub const MIN_TEXT_LEN: usize = 10;
pub const MAX_TEXT_LEN: usize = 10_000;
pub const MAX_KEYWORDS: usize = 10;

/// PT-BR stopwords, plus filler terms too generic to route on.
const STOPWORDS: &[&str] = &[
    "o", "a", "os", "as", "um", "uma", "uns", "umas", "de", "da", "do", "das", "dos",
    "em", "na", "no", "nas", "nos", "por", "para", "com", "sem", "sob", "sobre",
    "que", "se", "não", "mais", "muito", "como", "quando", "onde", "quem",
    "foi", "ser", "são", "está", "estão", "tem", "têm", "ter", "pode", "podem",
    "este", "esta", "esse", "essa", "isso", "isto", "aqui", "ali", "lá",
    "e", "ou", "mas", "porém", "porque", "pois", "já", "ainda", "também",
    "vai", "vão", "será", "seria", "governo", "brasileiro", "brasil",
];

static SCRIPT_RE: OnceLock<Regex> = OnceLock::new();
static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn script_re() -> &'static Regex {
    SCRIPT_RE.get_or_init(|| Regex::new(r"(?is)<script\b.*?</script>").expect("static regex"))
}

fn tag_re() -> &'static Regex {
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"))
}

/// Strip script blocks first so their contents never reach the prompt,
/// then drop any remaining markup.
pub fn sanitize_text(text: &str) -> String {
    let no_scripts = script_re().replace_all(text, "");
    let no_tags = tag_re().replace_all(&no_scripts, "");
    no_tags.trim().to_string()
}

/// Validate a submitted claim and return the sanitized form used
/// everywhere downstream, including prompt interpolation.
pub fn validate_claim(text: &str) -> Result<String, EngineError> {
    let trimmed = text.trim();
    let len = trimmed.chars().count();
    if len < MIN_TEXT_LEN {
        return Err(EngineError::TextTooShort(MIN_TEXT_LEN));
    }
    if len > MAX_TEXT_LEN {
        return Err(EngineError::TextTooLong(MAX_TEXT_LEN));
    }
    Ok(sanitize_text(trimmed))
}

/// Extract the routing keywords of a claim: lowercase, punctuation
/// stripped, stopwords and short tokens dropped, deduplicated, longest
/// first. Longer tokens tend to be the specific ones, which is what the
/// source router needs; this is a heuristic, not relevance ranking.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let stopwords: HashSet<&str> = STOPWORDS.iter().copied().collect();
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();

    let mut seen = HashSet::new();
    let mut words: Vec<String> = cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() > 3 && !stopwords.contains(w))
        .filter(|w| seen.insert(w.to_string()))
        .map(|w| w.to_string())
        .collect();

    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    words.truncate(MAX_KEYWORDS);
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_drop_stopwords_and_short_tokens() {
        let kws = extract_keywords("O Banco Central vai taxar o PIX em 2025");
        assert!(kws.contains(&"banco".to_string()));
        assert!(kws.contains(&"central".to_string()));
        assert!(kws.contains(&"taxar".to_string()));
        // stopwords and tokens of three or fewer characters are dropped
        assert!(!kws.contains(&"vai".to_string()));
        assert!(!kws.contains(&"pix".to_string()));
        assert!(!kws.contains(&"em".to_string()));
    }

    #[test]
    fn keywords_are_longest_first_and_capped() {
        let kws = extract_keywords(
            "vacinação medicamento tratamento saúde anvisa doença pandemia \
             inflação desemprego eleição apuração urna voto imposto",
        );
        assert_eq!(kws.len(), MAX_KEYWORDS);
        for pair in kws.windows(2) {
            assert!(pair[0].chars().count() >= pair[1].chars().count());
        }
    }

    #[test]
    fn keywords_are_deduplicated() {
        let kws = extract_keywords("vacina vacina vacina eficaz");
        assert_eq!(
            kws.iter().filter(|k| k.as_str() == "vacina").count(),
            1
        );
    }

    #[test]
    fn accented_tokens_survive_extraction() {
        let kws = extract_keywords("A taxação será anunciada amanhã");
        assert!(kws.contains(&"taxação".to_string()));
    }

    #[test]
    fn sanitize_strips_script_blocks_and_tags() {
        let dirty = "Alerta <script>fetch('http://evil')</script> <b>urgente</b> no país";
        assert_eq!(sanitize_text(dirty), "Alerta  urgente no país");
    }

    #[test]
    fn validate_rejects_out_of_range_lengths() {
        assert!(matches!(
            validate_claim("curto"),
            Err(EngineError::TextTooShort(_))
        ));
        let huge = "a".repeat(MAX_TEXT_LEN + 1);
        assert!(matches!(
            validate_claim(&huge),
            Err(EngineError::TextTooLong(_))
        ));
        assert!(validate_claim("O PIX será taxado em 2025").is_ok());
    }
}
