use strsim::levenshtein;
use url::{Host, Url};

use crate::core::error::EngineError;

/// Official domains and the marker terms abused by lookalike sites.
const OFFICIAL_BRANDS: &[(&str, &[&str])] = &[
    ("gov.br", &["governo", "federal", "brasil", "gov"]),
    ("bb.com.br", &["banco", "brasil", "bb"]),
    ("caixa.gov.br", &["caixa", "cef", "economica"]),
    ("itau.com.br", &["itau", "itaú"]),
    ("bradesco.com.br", &["bradesco"]),
    ("santander.com.br", &["santander"]),
    ("nubank.com.br", &["nubank", "nu"]),
    ("mercadolivre.com.br", &["mercado", "livre", "ml"]),
    ("amazon.com.br", &["amazon", "amazônia"]),
    ("correios.com.br", &["correios", "correio"]),
    ("receita.fazenda.gov.br", &["receita", "federal", "imposto"]),
    ("bcb.gov.br", &["banco", "central", "bacen", "bcb"]),
    ("inss.gov.br", &["inss", "previdencia", "aposentadoria"]),
    ("detran", &["detran", "transito", "cnh", "multa"]),
];

/// Scam vocabulary (PT-BR) matched against the full lowercased URL.
const SCAM_KEYWORDS: &[&str] = &[
    "resgate", "urgente", "pix", "ganhe", "gratis", "grátis", "premio", "prêmio",
    "dinheiro", "valores", "bloqueado", "liberado", "imediato", "agora", "confirme",
    "atualize", "cadastro", "suspensa", "cancelada", "verificar", "atualizar",
    "bonus", "bônus", "promoção", "promocao", "sorteio", "ganhador", "vencedor",
    "saque", "transferencia", "transferência", "cliqueaqui", "acesse", "confirmar",
    "cpf", "rg", "senha", "cartao", "cartão", "credito", "crédito", "debito", "débito",
];

pub const SUSPICIOUS_TLDS: &[&str] = &[
    ".site", ".online", ".top", ".xyz", ".click", ".link", ".buzz", ".tk", ".ml",
    ".ga", ".cf", ".gq",
];

const URL_SHORTENERS: &[&str] = &[
    "bit.ly", "tinyurl.com", "goo.gl", "t.co", "ow.ly", "is.gd", "buff.ly",
    "adf.ly", "shorte.st", "cutt.ly",
];

/// Domains that superficially claim a government or banking identity.
const OFFICIAL_CLAIM_TOKENS: &[&str] =
    &["gov", "banco", "caixa", "federal", "receita", "inss", "detran"];

/// A domain that borrows a known brand's markers without being that brand.
#[derive(Debug, Clone)]
pub struct BrandMatch {
    pub official_domain: String,
    pub matched_terms: Vec<String>,
}

/// Structured signals derived from one input URL. Computed per request,
/// never persisted.
#[derive(Debug, Clone)]
pub struct UrlSignals {
    pub domain: String,
    pub full_url: String,
    pub is_https: bool,
    pub subdomain_depth: usize,
    pub matched_scam_keywords: Vec<String>,
    pub matched_suspicious_tlds: Vec<String>,
    pub is_shortener: bool,
    pub is_ip_literal: bool,
    pub has_obfuscation_chars: bool,
    pub brand_match: Option<BrandMatch>,
}

impl UrlSignals {
    pub fn has_suspicious_tld(&self) -> bool {
        !self.matched_suspicious_tlds.is_empty()
    }

    pub fn claims_official(&self) -> bool {
        OFFICIAL_CLAIM_TOKENS.iter().any(|t| self.domain.contains(t))
    }
}

/// Run every lexical pass over the URL and collect the union of signals.
/// Passes are independent; nothing short-circuits, the scorer needs all of
/// them. Schemeless input is normalized with an `https://` prefix first.
pub fn extract_url_signals(raw: &str) -> Result<UrlSignals, EngineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidUrl);
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let parsed = Url::parse(&candidate).map_err(|_| EngineError::InvalidUrl)?;
    let host = parsed.host_str().ok_or(EngineError::InvalidUrl)?;

    let domain = host
        .strip_prefix("www.")
        .unwrap_or(host)
        .to_lowercase();
    let full_url = parsed.as_str().to_lowercase();

    let matched_scam_keywords: Vec<String> = SCAM_KEYWORDS
        .iter()
        .filter(|kw| full_url.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();

    let matched_suspicious_tlds: Vec<String> = SUSPICIOUS_TLDS
        .iter()
        .filter(|tld| domain.ends_with(*tld))
        .map(|tld| tld.to_string())
        .collect();

    let is_shortener = URL_SHORTENERS.iter().any(|s| domain.contains(s));
    let is_ip_literal = matches!(parsed.host(), Some(Host::Ipv4(_)));
    let has_obfuscation_chars =
        domain.contains("--") || domain.contains("__") || full_url.contains('@');

    let has_suspicious_tld = !matched_suspicious_tlds.is_empty();
    let brand_match = detect_brand_squatting(&domain, has_suspicious_tld);

    Ok(UrlSignals {
        subdomain_depth: domain.split('.').count().saturating_sub(2),
        domain,
        full_url,
        is_https: parsed.scheme() == "https",
        matched_scam_keywords,
        matched_suspicious_tlds,
        is_shortener,
        is_ip_literal,
        has_obfuscation_chars,
        brand_match,
    })
}

/// Pick the brand whose marker terms best cover the domain (ties keep the
/// earlier table entry), then require an impersonation tell before flagging.
fn detect_brand_squatting(domain: &str, has_suspicious_tld: bool) -> Option<BrandMatch> {
    let sld = domain.split('.').next().unwrap_or(domain);
    let mut best: Option<BrandMatch> = None;
    let mut best_hits = 0usize;

    for (official, terms) in OFFICIAL_BRANDS {
        if domain.ends_with(official) {
            continue;
        }
        let mut matched: Vec<String> = terms
            .iter()
            .filter(|t| domain.contains(*t))
            .map(|t| t.to_string())
            .collect();
        if let Some(variant) = label_variant(sld, official) {
            if !matched.contains(&variant) {
                matched.push(variant);
            }
        }
        if matched.len() > best_hits {
            best_hits = matched.len();
            best = Some(BrandMatch {
                official_domain: official.to_string(),
                matched_terms: matched,
            });
        }
    }

    let candidate = best?;
    let impersonating = domain.contains('-')
        || domain.contains("oficial")
        || domain.contains("online")
        || domain.contains("br")
        || has_suspicious_tld;
    impersonating.then_some(candidate)
}

/// One-edit variants of the brand's registrable label ("nubanck", "bradesc0")
/// count as a marker hit even though no term is a literal substring.
fn label_variant(domain_sld: &str, official: &str) -> Option<String> {
    let label = official.split('.').next().unwrap_or(official);
    if label.len() < 4 {
        return None;
    }
    domain_sld
        .split(|c: char| !c.is_ascii_alphanumeric())
        .find(|tok| tok.len() >= 4 && *tok != label && levenshtein(tok, label) == 1)
        .map(|tok| tok.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_domain_has_no_signals() {
        let sig = extract_url_signals("https://github.com").unwrap();
        assert_eq!(sig.domain, "github.com");
        assert!(sig.is_https);
        assert_eq!(sig.subdomain_depth, 0);
        assert!(sig.matched_scam_keywords.is_empty());
        assert!(!sig.has_suspicious_tld());
        assert!(!sig.is_shortener);
        assert!(!sig.is_ip_literal);
        assert!(!sig.has_obfuscation_chars);
        assert!(sig.brand_match.is_none());
    }

    #[test]
    fn schemeless_input_is_normalized_to_https() {
        let sig = extract_url_signals("example.com/path").unwrap();
        assert!(sig.is_https);
        assert_eq!(sig.domain, "example.com");
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(matches!(
            extract_url_signals("http://"),
            Err(EngineError::InvalidUrl)
        ));
        assert!(matches!(extract_url_signals("   "), Err(EngineError::InvalidUrl)));
    }

    #[test]
    fn scam_domain_collects_every_pass() {
        let sig = extract_url_signals("http://banco-brasil-resgate.site/confirme").unwrap();
        assert!(!sig.is_https);
        assert!(sig.matched_scam_keywords.contains(&"resgate".to_string()));
        assert!(sig.matched_scam_keywords.contains(&"confirme".to_string()));
        assert_eq!(sig.matched_suspicious_tlds, vec![".site".to_string()]);
        assert!(sig.claims_official());
        let brand = sig.brand_match.expect("brand match");
        assert_eq!(brand.official_domain, "bb.com.br");
    }

    #[test]
    fn brand_selection_prefers_widest_term_coverage() {
        // "banco" alone also matches bcb.gov.br, but bb.com.br covers two terms
        let sig = extract_url_signals("https://banco-brasil-oficial.com").unwrap();
        let brand = sig.brand_match.expect("brand match");
        assert_eq!(brand.official_domain, "bb.com.br");
        assert_eq!(brand.matched_terms.len(), 2);
    }

    #[test]
    fn official_domain_is_not_squatting_itself() {
        let sig = extract_url_signals("https://www.bb.com.br").unwrap();
        assert!(sig.brand_match.is_none());
    }

    #[test]
    fn one_edit_label_variant_is_flagged() {
        let sig = extract_url_signals("https://nubanck-oficial.com").unwrap();
        let brand = sig.brand_match.expect("brand match");
        assert_eq!(brand.official_domain, "nubank.com.br");
    }

    #[test]
    fn ip_literal_and_obfuscation_are_detected() {
        let sig = extract_url_signals("http://192.168.10.20/login").unwrap();
        assert!(sig.is_ip_literal);

        let sig = extract_url_signals("https://secure--payment.example.com").unwrap();
        assert!(sig.has_obfuscation_chars);
    }

    #[test]
    fn shortener_host_is_detected() {
        let sig = extract_url_signals("https://bit.ly/abc").unwrap();
        assert!(sig.is_shortener);
    }

    #[test]
    fn subdomain_depth_counts_extra_labels() {
        let sig = extract_url_signals("https://a.b.c.example.com").unwrap();
        assert_eq!(sig.subdomain_depth, 3);
    }
}
