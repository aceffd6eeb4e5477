use crate::core::types::{LinkStatus, LinkVerdict};
use crate::extract::url::{UrlSignals, SUSPICIOUS_TLDS};

// Additive penalties, applied in a fixed order before the override stage.
const PENALTY_NO_HTTPS: i32 = 50;
const PENALTY_SHORTENER: i32 = 30;
const PENALTY_SUSPICIOUS_TLD: i32 = 30;
const PENALTY_PER_KEYWORD: i32 = 15;
const PENALTY_KEYWORD_CAP: i32 = 60;
const PENALTY_BRAND_SQUATTING: i32 = 40;
const PENALTY_IP_LITERAL: i32 = 35;
const PENALTY_EXCESS_SUBDOMAINS: i32 = 15;
const PENALTY_OBFUSCATION: i32 = 20;

const THRESHOLD_DANGER: i32 = 30;
const THRESHOLD_WARNING: i32 = 60;

/// Narrative attached to a verdict when a fraud pattern is recognized.
#[derive(Debug, Clone)]
struct Narrative {
    scam_type: String,
    modus_operandi: String,
}

/// Keyword buckets, tested in priority order; the first bucket with a hit
/// names the scam.
struct KeywordBucket {
    terms: &'static [&'static str],
    scam_type: &'static str,
    modus_operandi: &'static str,
    confirmed_issue: &'static str,
}

const KEYWORD_BUCKETS: &[KeywordBucket] = &[
    KeywordBucket {
        terms: &["resgate", "valores", "saque", "bloqueado", "liberado"],
        scam_type: "Golpe do Falso Resgate",
        modus_operandi: "Criminosos alegam que você tem valores a receber para roubar seus \
                         dados bancários e CPF. Órgãos oficiais NUNCA solicitam dados por links.",
        confirmed_issue: "GOLPE CONFIRMADO: Combinação de extensão suspeita com palavras \
                          típicas de fraude de resgate de valores",
    },
    KeywordBucket {
        terms: &["pix", "transferencia", "transferência"],
        scam_type: "Golpe do PIX",
        modus_operandi: "Sites falsos que prometem transferências ou cadastro de chaves PIX \
                         para roubar credenciais bancárias.",
        confirmed_issue: "GOLPE CONFIRMADO: Link de PIX em domínio suspeito",
    },
    KeywordBucket {
        terms: &["premio", "prêmio", "ganhe", "sorteio", "ganhador"],
        scam_type: "Golpe de Promoção/Sorteio Falso",
        modus_operandi: "Promessas de prêmios inexistentes para coletar dados pessoais ou \
                         instalar malware no dispositivo.",
        confirmed_issue: "GOLPE CONFIRMADO: Promoção falsa em domínio suspeito",
    },
    KeywordBucket {
        terms: &["atualize", "confirme", "verificar", "suspensa"],
        scam_type: "Phishing de Atualização Cadastral",
        modus_operandi: "E-mails e sites falsos que imitam bancos ou empresas pedindo para \
                         \"atualizar cadastro\" e roubam senhas.",
        confirmed_issue: "GOLPE CONFIRMADO: Phishing em domínio não oficial",
    },
];

/// Score a URL from its lexical signals.
///
/// Three stages: additive penalties from 100, then override rules that can
/// only force the score to zero, then narrative selection by priority.
/// The score never leaves `[0, 100]`.
pub fn score_url(signals: &UrlSignals) -> LinkVerdict {
    let mut score: i32 = 100;
    let mut issues: Vec<String> = Vec::new();
    let mut recommendations: Vec<String> = Vec::new();

    if !signals.is_https {
        score -= PENALTY_NO_HTTPS;
        issues.push(
            "CONEXÃO NÃO SEGURA: Este site não usa HTTPS, seus dados podem ser interceptados"
                .to_string(),
        );
        recommendations
            .push("NUNCA insira dados pessoais ou bancários em sites sem HTTPS".to_string());
    }

    if signals.is_shortener {
        score -= PENALTY_SHORTENER;
        issues.push(
            "URL ENCURTADA: O destino real está oculto. Encurtadores são frequentemente \
             usados para esconder links maliciosos"
                .to_string(),
        );
        recommendations.push(
            "Use serviços como CheckShortURL para revelar o destino antes de clicar".to_string(),
        );
    }

    if signals.has_suspicious_tld() {
        score -= PENALTY_SUSPICIOUS_TLD;
        issues.push(format!(
            "EXTENSÃO SUSPEITA: Domínios {} são frequentemente usados em golpes",
            SUSPICIOUS_TLDS.join(", ")
        ));
    }

    if !signals.matched_scam_keywords.is_empty() {
        let penalty = (signals.matched_scam_keywords.len() as i32 * PENALTY_PER_KEYWORD)
            .min(PENALTY_KEYWORD_CAP);
        score -= penalty;
        issues.push(format!(
            "PALAVRAS DE ALERTA: \"{}\" são comuns em golpes de phishing",
            signals.matched_scam_keywords.join("\", \"")
        ));
    }

    if let Some(brand) = &signals.brand_match {
        score -= PENALTY_BRAND_SQUATTING;
        issues.push(format!(
            "BRAND SQUATTING: Este domínio tenta imitar \"{official}\". O site oficial é {official}",
            official = brand.official_domain
        ));
    }

    if signals.is_ip_literal {
        score -= PENALTY_IP_LITERAL;
        issues.push(
            "URL COM IP NUMÉRICO: Sites legítimos usam nomes de domínio, não endereços IP"
                .to_string(),
        );
    }

    if signals.subdomain_depth > 2 {
        score -= PENALTY_EXCESS_SUBDOMAINS;
        issues.push(
            "MUITOS SUBDOMÍNIOS: Estrutura de URL complexa, comum em sites de phishing"
                .to_string(),
        );
    }

    if signals.has_obfuscation_chars {
        score -= PENALTY_OBFUSCATION;
        issues.push(
            "CARACTERES SUSPEITOS: Uso de caracteres incomuns para ofuscar o verdadeiro destino"
                .to_string(),
        );
    }

    score = score.clamp(0, 100);
    score = apply_overrides(signals, score, &mut issues);

    let narrative = select_narrative(signals);
    let is_brand_squatting = signals.brand_match.is_some();

    let status = if score == 0 || is_brand_squatting {
        LinkStatus::Scam
    } else if score < THRESHOLD_DANGER {
        LinkStatus::Danger
    } else if score < THRESHOLD_WARNING {
        LinkStatus::Warning
    } else {
        LinkStatus::Safe
    };

    // The shortener advisory already tells the caller what to do; generic
    // caution only when something else was found too.
    let only_shortener_issue = signals.is_shortener && issues.len() == 1;
    if !issues.is_empty() && !only_shortener_issue {
        recommendations.push(
            "Não clique em links recebidos por mensagem ou e-mail sem verificar".to_string(),
        );
        recommendations.push(
            "Acesse sites oficiais digitando o endereço diretamente no navegador".to_string(),
        );
        recommendations.push(
            "Em caso de dúvida, entre em contato com a empresa pelos canais oficiais".to_string(),
        );
    }
    if matches!(status, LinkStatus::Scam | LinkStatus::Danger) {
        recommendations.insert(0, "NÃO ACESSE ESTE LINK. Risco elevado de fraude.".to_string());
    }

    LinkVerdict {
        status,
        score: score as u8,
        domain: signals.domain.clone(),
        issues,
        recommendations,
        scam_type: narrative.as_ref().map(|n| n.scam_type.clone()),
        modus_operandi: narrative.map(|n| n.modus_operandi),
        ai_analysis: None,
        is_brand_squatting,
        is_url_shortener: signals.is_shortener,
        targeted_brand: signals
            .brand_match
            .as_ref()
            .map(|b| b.official_domain.clone()),
    }
}

/// Override stage. Each rule is a pure predicate over the signals and may
/// only lower the score to zero; a firing rule prepends its confirmation
/// so it outranks the advisory issues.
fn apply_overrides(signals: &UrlSignals, mut score: i32, issues: &mut Vec<String>) -> i32 {
    let mut confirmed: Vec<String> = Vec::new();

    // keyword bucket + suspicious TLD
    if signals.has_suspicious_tld() {
        if let Some(bucket) = matched_bucket(signals) {
            score = 0;
            confirmed.push(bucket.confirmed_issue.to_string());
        }
    }

    // suspicious TLD + two or more distinct scam keywords
    if signals.has_suspicious_tld() && signals.matched_scam_keywords.len() >= 2 && score > 0 {
        score = 0;
        confirmed.push("GOLPE CONFIRMADO: Múltiplos indicadores de fraude detectados".to_string());
    }

    // claims a government/bank identity on a throwaway TLD
    if signals.claims_official() && signals.has_suspicious_tld() {
        score = 0;
        confirmed.push(
            "GOLPE CONFIRMADO: Sites governamentais e bancários NUNCA usam extensões como \
             .site, .online, .xyz"
                .to_string(),
        );
    }

    for issue in confirmed {
        issues.insert(0, issue);
    }
    score
}

fn matched_bucket(signals: &UrlSignals) -> Option<&'static KeywordBucket> {
    KEYWORD_BUCKETS.iter().find(|bucket| {
        bucket
            .terms
            .iter()
            .any(|t| signals.matched_scam_keywords.iter().any(|k| k == t))
    })
}

/// First applicable rule in priority order names the scam: a fake
/// government site outranks brand squatting, which outranks the keyword
/// buckets, which outrank the generic multi-indicator narrative.
fn select_narrative(signals: &UrlSignals) -> Option<Narrative> {
    fake_government_narrative(signals)
        .or_else(|| brand_squatting_narrative(signals))
        .or_else(|| keyword_bucket_narrative(signals))
        .or_else(|| generic_fraud_narrative(signals))
}

fn fake_government_narrative(signals: &UrlSignals) -> Option<Narrative> {
    (signals.claims_official() && signals.has_suspicious_tld()).then(|| Narrative {
        scam_type: "Golpe de Falso Órgão Governamental".to_string(),
        modus_operandi: "Criminosos criam sites falsos imitando órgãos públicos (Gov.br, \
                         Receita Federal, INSS) para roubar dados. Sites oficiais sempre \
                         terminam em .gov.br"
            .to_string(),
    })
}

fn brand_squatting_narrative(signals: &UrlSignals) -> Option<Narrative> {
    signals.brand_match.as_ref().map(|brand| Narrative {
        scam_type: "Brand Squatting / Clone de Site Oficial".to_string(),
        modus_operandi: format!(
            "Este link tenta se passar pelo site oficial \"{}\" para enganar vítimas. \
             SEMPRE acesse sites oficiais digitando o endereço diretamente no navegador.",
            brand.official_domain
        ),
    })
}

fn keyword_bucket_narrative(signals: &UrlSignals) -> Option<Narrative> {
    matched_bucket(signals).map(|bucket| Narrative {
        scam_type: bucket.scam_type.to_string(),
        modus_operandi: bucket.modus_operandi.to_string(),
    })
}

fn generic_fraud_narrative(signals: &UrlSignals) -> Option<Narrative> {
    (signals.has_suspicious_tld() && signals.matched_scam_keywords.len() >= 2).then(|| Narrative {
        scam_type: "Fraude Digital".to_string(),
        modus_operandi: "Este link combina múltiplos indicadores de golpe: extensão suspeita \
                         e palavras-chave típicas de fraude."
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::url::extract_url_signals;

    fn verdict_for(url: &str) -> LinkVerdict {
        score_url(&extract_url_signals(url).expect("valid url"))
    }

    #[test]
    fn clean_https_domain_is_safe_with_full_score() {
        let v = verdict_for("https://github.com");
        assert_eq!(v.score, 100);
        assert_eq!(v.status, LinkStatus::Safe);
        assert!(v.issues.is_empty());
        assert!(v.recommendations.is_empty());
        assert!(v.scam_type.is_none());
    }

    #[test]
    fn confirmed_scam_combination_forces_zero() {
        let v = verdict_for("http://banco-brasil-resgate.site/confirme");
        assert_eq!(v.score, 0);
        assert_eq!(v.status, LinkStatus::Scam);
        assert!(v.is_brand_squatting);
        assert_eq!(v.targeted_brand.as_deref(), Some("bb.com.br"));
        assert!(v.issues[0].starts_with("GOLPE CONFIRMADO"));
        // fake-government narrative outranks brand squatting here
        assert_eq!(
            v.scam_type.as_deref(),
            Some("Golpe de Falso Órgão Governamental")
        );
        assert_eq!(v.recommendations[0], "NÃO ACESSE ESTE LINK. Risco elevado de fraude.");
    }

    #[test]
    fn https_penalty_is_applied_exactly_once() {
        let v = verdict_for("http://example.com");
        assert_eq!(v.score, 50);
        assert_eq!(v.status, LinkStatus::Warning);
        assert_eq!(
            v.issues
                .iter()
                .filter(|i| i.starts_with("CONEXÃO NÃO SEGURA"))
                .count(),
            1
        );
    }

    #[test]
    fn suspicious_tld_with_bucket_keyword_is_confirmed() {
        // "pix" in the path, throwaway TLD, no brand involved
        let v = verdict_for("https://cadastrodechave.xyz/pix");
        assert_eq!(v.score, 0);
        assert_eq!(v.status, LinkStatus::Scam);
        assert!(v.issues[0].starts_with("GOLPE CONFIRMADO"));
        assert_eq!(v.scam_type.as_deref(), Some("Golpe do PIX"));
    }

    #[test]
    fn two_generic_keywords_on_suspicious_tld_are_confirmed() {
        // "dinheiro" and "urgente" belong to no bucket
        let v = verdict_for("https://consulta.top/dinheiro-urgente");
        assert_eq!(v.score, 0);
        assert_eq!(v.status, LinkStatus::Scam);
        assert_eq!(v.scam_type.as_deref(), Some("Fraude Digital"));
        assert!(v.issues[0].starts_with("GOLPE CONFIRMADO"));
    }

    #[test]
    fn brand_squatting_alone_is_scam_even_with_positive_score() {
        let v = verdict_for("https://nubank-oficial.com");
        assert!(v.is_brand_squatting);
        assert_eq!(v.status, LinkStatus::Scam);
        assert!(v.score > 0);
        assert_eq!(
            v.scam_type.as_deref(),
            Some("Brand Squatting / Clone de Site Oficial")
        );
        assert_eq!(v.targeted_brand.as_deref(), Some("nubank.com.br"));
    }

    #[test]
    fn shortener_only_issue_skips_generic_recommendations() {
        let v = verdict_for("https://bit.ly/abc");
        assert!(v.is_url_shortener);
        assert_eq!(v.issues.len(), 1);
        assert_eq!(
            v.recommendations,
            vec!["Use serviços como CheckShortURL para revelar o destino antes de clicar"
                .to_string()]
        );
    }

    #[test]
    fn score_is_clamped_to_lower_bound() {
        // http + ip literal stack with keyword penalties; never below zero
        let v = verdict_for("http://192.168.0.1/pix-resgate-premio-urgente");
        assert_eq!(v.score, 0);
        assert_eq!(v.status, LinkStatus::Scam);
    }

    #[test]
    fn status_thresholds_follow_the_canonical_table() {
        // -50 https, -15 subdomains => 35: warning band
        let v = verdict_for("http://a.b.c.example.com");
        assert_eq!(v.score, 35);
        assert_eq!(v.status, LinkStatus::Warning);

        // -50 https, -35 ip literal => 15: danger band
        let v = verdict_for("http://10.0.0.1/login");
        assert_eq!(v.score, 15);
        assert_eq!(v.status, LinkStatus::Danger);
        assert_eq!(v.recommendations[0], "NÃO ACESSE ESTE LINK. Risco elevado de fraude.");
    }
}
