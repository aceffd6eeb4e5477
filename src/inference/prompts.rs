use crate::core::types::SourceReference;

/// System prompt for claim verification. The curated sources are
/// interpolated by name and description only; the model is told in
/// uppercase not to invent URLs because every link the caller returns
/// comes from the router, never from the completion.
pub fn verification_system_prompt(sources: &[SourceReference]) -> String {
    let source_list = if sources.is_empty() {
        "- Agências de checagem brasileiras (Aos Fatos, Agência Lupa)".to_string()
    } else {
        sources
            .iter()
            .map(|s| format!("- {}: {}", s.name, s.description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Você é um verificador de fatos especializado em desinformação no Brasil. \
Analise a afirmação do usuário e classifique-a.\n\n\
Fontes de referência relevantes para este tema:\n{source_list}\n\n\
REGRAS:\n\
1. NUNCA invente URLs, links ou endereços de artigos. Os links são fornecidos \
pelo sistema, não por você.\n\
2. Cite as fontes acima apenas pelo nome.\n\
3. Se não houver evidência suficiente, classifique como needs_verification.\n\
4. Responda APENAS com um objeto JSON, sem texto antes ou depois, no formato:\n\
{{\n\
  \"classification\": \"verified\" | \"fake\" | \"needs_verification\",\n\
  \"confidence\": 0.0 a 1.0,\n\
  \"headline\": \"resumo curto do veredito\",\n\
  \"analysis\": \"análise detalhada em português\",\n\
  \"fact_correction\": \"a informação correta, se a afirmação for falsa\",\n\
  \"key_points\": [\"ponto 1\", \"ponto 2\"],\n\
  \"limitations\": \"limitações desta verificação\"\n\
}}"
    )
}

pub fn verification_user_prompt(claim: &str, keywords: &[String]) -> String {
    format!(
        "Afirmação a verificar: \"{claim}\"\n\n\
Palavras-chave identificadas: {}\n\n\
Classifique esta afirmação seguindo o formato JSON especificado.",
        keywords.join(", ")
    )
}

/// System prompt for the optional second opinion on an already-scored
/// link. Plain prose, no JSON contract.
pub fn link_system_prompt() -> &'static str {
    "Você é um especialista em segurança digital e golpes online no Brasil. \
Analise o link fornecido e explique em até 3 frases, em português, quais \
riscos ele apresenta ao usuário comum. Seja direto e não invente fatos \
sobre o site."
}

pub fn link_user_prompt(url: &str, issues: &[String]) -> String {
    if issues.is_empty() {
        format!("Link: {url}\n\nNenhum problema foi detectado pela análise heurística.")
    } else {
        format!(
            "Link: {url}\n\nProblemas detectados pela análise heurística:\n{}",
            issues
                .iter()
                .map(|i| format!("- {i}"))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SourceType;

    #[test]
    fn system_prompt_embeds_source_names_not_urls() {
        let sources = vec![SourceReference {
            source_type: SourceType::Government,
            name: "Banco Central do Brasil - PIX".to_string(),
            description: "Portal oficial do PIX".to_string(),
            url: "https://www.bcb.gov.br/estabilidadefinanceira/pix".to_string(),
            relevance: "Fonte oficial".to_string(),
        }];
        let prompt = verification_system_prompt(&sources);
        assert!(prompt.contains("Banco Central do Brasil - PIX"));
        assert!(!prompt.contains("bcb.gov.br"));
        assert!(prompt.contains("NUNCA invente URLs"));
    }

    #[test]
    fn empty_source_list_still_names_checkers() {
        let prompt = verification_system_prompt(&[]);
        assert!(prompt.contains("Aos Fatos"));
    }

    #[test]
    fn user_prompt_carries_claim_and_keywords() {
        let prompt = verification_user_prompt(
            "O PIX será taxado",
            &["taxado".to_string(), "banco".to_string()],
        );
        assert!(prompt.contains("O PIX será taxado"));
        assert!(prompt.contains("taxado, banco"));
    }
}
