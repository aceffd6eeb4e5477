use std::collections::HashSet;

use url::form_urlencoded;

use crate::core::types::{SourceReference, SourceType};

pub const MAX_SOURCES: usize = 5;
const MAX_FALLBACK_CHECKERS: usize = 2;
const MAX_QUERY_KEYWORDS: usize = 4;

/// One curated topic: keyword set plus the authoritative references for it.
struct TopicMapping {
    keywords: &'static [&'static str],
    sources: Vec<SourceReference>,
}

fn source(
    source_type: SourceType,
    name: &str,
    description: &str,
    url: &str,
    relevance: &str,
) -> SourceReference {
    SourceReference {
        source_type,
        name: name.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        relevance: relevance.to_string(),
    }
}

fn topic_mappings() -> Vec<TopicMapping> {
    vec![
        TopicMapping {
            keywords: &["pix", "banco central", "bcb", "transferência", "pagamento instantâneo", "chave pix"],
            sources: vec![
                source(
                    SourceType::Government,
                    "Banco Central do Brasil - PIX",
                    "Portal oficial do PIX com regras, comunicados e tire-dúvidas",
                    "https://www.bcb.gov.br/estabilidadefinanceira/pix",
                    "Fonte oficial sobre funcionamento e regulamentação do PIX",
                ),
                source(
                    SourceType::Government,
                    "BC - Perguntas Frequentes sobre PIX",
                    "FAQ oficial do Banco Central sobre o sistema de pagamentos",
                    "https://www.bcb.gov.br/estabilidadefinanceira/perguntasfrequentespix",
                    "Esclarece boatos comuns sobre taxas e cobranças",
                ),
            ],
        },
        TopicMapping {
            keywords: &["imposto", "taxa", "tributo", "receita federal", "tributação", "taxação", "declaração"],
            sources: vec![
                source(
                    SourceType::Government,
                    "Receita Federal do Brasil",
                    "Portal oficial da Receita Federal com legislação tributária",
                    "https://www.gov.br/receitafederal/pt-br",
                    "Fonte oficial sobre impostos federais e obrigações tributárias",
                ),
                source(
                    SourceType::Government,
                    "Portal da Legislação - Planalto",
                    "Acesso às leis e decretos do governo federal",
                    "https://www.planalto.gov.br/legislacao",
                    "Textos legais oficiais sobre tributação",
                ),
            ],
        },
        TopicMapping {
            keywords: &["vacina", "vacinação", "covid", "saúde", "medicamento", "anvisa", "tratamento", "doença", "vírus", "pandemia"],
            sources: vec![
                source(
                    SourceType::Government,
                    "Ministério da Saúde",
                    "Portal oficial com informações sobre campanhas de vacinação",
                    "https://www.gov.br/saude/pt-br",
                    "Comunicados oficiais sobre políticas de saúde pública",
                ),
                source(
                    SourceType::Government,
                    "ANVISA - Agência Nacional de Vigilância Sanitária",
                    "Informações sobre aprovação de medicamentos e vacinas",
                    "https://www.gov.br/anvisa/pt-br",
                    "Autoridade regulatória sobre medicamentos no Brasil",
                ),
                source(
                    SourceType::Academic,
                    "Fiocruz - Fundação Oswaldo Cruz",
                    "Pesquisas e informações científicas sobre saúde",
                    "https://portal.fiocruz.br/",
                    "Instituição científica de referência em saúde pública",
                ),
            ],
        },
        TopicMapping {
            keywords: &["benefício", "bolsa família", "auxílio", "caixa", "saque", "bpc", "inss", "aposentadoria", "pensão"],
            sources: vec![
                source(
                    SourceType::Government,
                    "Ministério do Desenvolvimento Social",
                    "Informações oficiais sobre programas sociais",
                    "https://www.gov.br/mds/pt-br",
                    "Fonte oficial sobre Bolsa Família e outros benefícios",
                ),
                source(
                    SourceType::Government,
                    "INSS - Instituto Nacional do Seguro Social",
                    "Portal de serviços previdenciários",
                    "https://www.gov.br/inss/pt-br",
                    "Informações sobre aposentadorias, pensões e benefícios do INSS",
                ),
                source(
                    SourceType::Government,
                    "Caixa Econômica Federal",
                    "Informações sobre saques e pagamentos de benefícios",
                    "https://www.caixa.gov.br/",
                    "Banco responsável pelo pagamento de benefícios sociais",
                ),
            ],
        },
        TopicMapping {
            keywords: &["eleição", "voto", "urna", "candidato", "tse", "fraude eleitoral", "apuração", "resultado"],
            sources: vec![
                source(
                    SourceType::Government,
                    "Tribunal Superior Eleitoral (TSE)",
                    "Portal oficial com dados eleitorais e resultados",
                    "https://www.tse.jus.br/",
                    "Autoridade máxima sobre processo eleitoral brasileiro",
                ),
                source(
                    SourceType::Government,
                    "TSE - Fato ou Boato",
                    "Seção de checagem de desinformação eleitoral",
                    "https://www.justicaeleitoral.jus.br/fato-ou-boato/",
                    "Combate a fake news sobre eleições",
                ),
            ],
        },
        TopicMapping {
            keywords: &["inflação", "ipca", "dólar", "economia", "ibge", "pib", "desemprego", "juros", "selic"],
            sources: vec![
                source(
                    SourceType::Government,
                    "IBGE - Instituto Brasileiro de Geografia e Estatística",
                    "Dados oficiais sobre inflação, emprego e economia",
                    "https://www.ibge.gov.br/",
                    "Fonte primária de estatísticas econômicas do Brasil",
                ),
                source(
                    SourceType::Government,
                    "Banco Central - Indicadores Econômicos",
                    "Taxa Selic, câmbio e outros indicadores",
                    "https://www.bcb.gov.br/estatisticas",
                    "Dados oficiais sobre política monetária",
                ),
            ],
        },
        TopicMapping {
            keywords: &["amazônia", "desmatamento", "clima", "aquecimento", "ibama", "queimada", "floresta"],
            sources: vec![
                source(
                    SourceType::Government,
                    "IBAMA",
                    "Instituto Brasileiro do Meio Ambiente",
                    "https://www.gov.br/ibama/pt-br",
                    "Fiscalização ambiental e dados sobre desmatamento",
                ),
                source(
                    SourceType::Academic,
                    "INPE - Instituto Nacional de Pesquisas Espaciais",
                    "Monitoramento de desmatamento e queimadas",
                    "https://www.gov.br/inpe/pt-br",
                    "Dados científicos sobre mudanças na cobertura florestal",
                ),
            ],
        },
    ]
}

fn fact_checkers() -> Vec<SourceReference> {
    vec![
        source(
            SourceType::Factchecker,
            "Aos Fatos",
            "Agência de checagem signatária do IFCN",
            "https://www.aosfatos.org/",
            "Verificações rigorosas com metodologia transparente",
        ),
        source(
            SourceType::Factchecker,
            "Agência Lupa",
            "Primeira agência de fact-checking do Brasil",
            "https://lupa.uol.com.br/",
            "Pioneira em checagem de fatos no país",
        ),
        source(
            SourceType::Factchecker,
            "G1 Fato ou Fake",
            "Núcleo de checagem do portal G1",
            "https://g1.globo.com/fato-ou-fake/",
            "Checagem vinculada ao maior portal de notícias do Brasil",
        ),
        source(
            SourceType::Factchecker,
            "Estadão Verifica",
            "Núcleo de verificação do jornal O Estado de S. Paulo",
            "https://www.estadao.com.br/estadao-verifica/",
            "Checagem de veículo tradicional da imprensa",
        ),
    ]
}

/// Map extracted keywords to curated references.
///
/// Every firing topic contributes its sources in declaration order,
/// deduplicated by URL, then up to two fact-checkers are appended and the
/// whole set is capped. Fact-checker URLs are rewritten into
/// domain-scoped search queries: this router never emits an article URL
/// it cannot guarantee exists.
pub fn route_sources(keywords: &[String]) -> Vec<SourceReference> {
    let mut out: Vec<SourceReference> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for mapping in topic_mappings() {
        let fired = mapping.keywords.iter().any(|mk| {
            keywords
                .iter()
                .any(|k| k.contains(mk) || mk.contains(k.as_str()))
        });
        if !fired {
            continue;
        }
        for src in mapping.sources {
            if seen.insert(src.url.clone()) {
                out.push(src);
            }
        }
    }

    for checker in fact_checkers().into_iter().take(MAX_FALLBACK_CHECKERS) {
        if seen.insert(checker.url.clone()) {
            out.push(checker);
        }
    }

    out.truncate(MAX_SOURCES);

    for src in out.iter_mut() {
        if src.source_type == SourceType::Factchecker {
            src.url = search_link(&src.name, keywords);
        }
    }
    out
}

/// Build a search-engine query scoped to a fact-checker's own domain.
/// Indirection by design: a search link always resolves, a guessed
/// article URL may not.
pub fn search_link(checker_name: &str, keywords: &[String]) -> String {
    let joined = keywords
        .iter()
        .take(MAX_QUERY_KEYWORDS)
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let query: String = form_urlencoded::byte_serialize(joined.as_bytes()).collect();

    let name = checker_name.to_lowercase();
    if name.contains("aos fatos") {
        format!("https://www.google.com/search?q=site:aosfatos.org+{query}")
    } else if name.contains("lupa") {
        format!("https://www.google.com/search?q=site:lupa.uol.com.br+{query}")
    } else if name.contains("g1") {
        format!("https://www.google.com/search?q=site:g1.globo.com+fato+ou+fake+{query}")
    } else if name.contains("estadão") || name.contains("estadao") {
        format!("https://www.google.com/search?q=site:estadao.com.br+verifica+{query}")
    } else {
        format!("https://www.google.com/search?q={query}+verificação")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn pix_keywords_route_to_central_bank_sources() {
        let sources = route_sources(&kw(&["banco", "central", "taxar"]));
        assert!(sources
            .iter()
            .any(|s| s.url == "https://www.bcb.gov.br/estabilidadefinanceira/pix"));
        assert!(sources.len() <= MAX_SOURCES);
    }

    #[test]
    fn result_set_is_capped_and_unique() {
        // health + benefits fire five topic sources before the checkers
        let sources = route_sources(&kw(&["vacina", "auxílio", "inss"]));
        assert_eq!(sources.len(), MAX_SOURCES);
        let mut urls: Vec<&str> = sources.iter().map(|s| s.url.as_str()).collect();
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), MAX_SOURCES);
    }

    #[test]
    fn unmatched_keywords_fall_back_to_checker_search_links() {
        let sources = route_sources(&kw(&["unicórnio", "voador"]));
        assert_eq!(sources.len(), 2);
        for s in &sources {
            assert_eq!(s.source_type, SourceType::Factchecker);
            assert!(s.url.starts_with("https://www.google.com/search?q=site:"));
        }
    }

    #[test]
    fn checker_urls_are_scoped_queries_not_articles() {
        let sources = route_sources(&kw(&["taxação", "imposto"]));
        for s in sources.iter().filter(|s| s.source_type == SourceType::Factchecker) {
            assert!(s.url.contains("google.com/search"));
        }
    }

    #[test]
    fn search_link_encodes_top_keywords_only() {
        let link = search_link("Aos Fatos", &kw(&["um", "dois", "três", "quatro", "cinco"]));
        assert!(link.starts_with("https://www.google.com/search?q=site:aosfatos.org+"));
        assert!(link.contains("quatro"));
        assert!(!link.contains("cinco"));
    }

    #[test]
    fn matching_is_bidirectional_substring() {
        // extracted "taxação" matches mapping keyword "taxa" by containment
        let sources = route_sources(&kw(&["taxação"]));
        assert!(sources
            .iter()
            .any(|s| s.url == "https://www.gov.br/receitafederal/pt-br"));
    }
}
