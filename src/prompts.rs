// Prompt builders for the suggestion and research requests

use crate::models::{ProjectDetails, Suggestion};

/// System prompt constraining the suggestion model to a strict JSON shape.
pub fn suggestion_system_prompt() -> String {
    "You are an AI domain name generator. Analyze the provided project details and generate \
     a list of domain name suggestions.\n\
     Return the result as a valid JSON object that conforms to this structure: \
     { \"suggestions\": [{ \"domainName\": \"string\", \"confidenceScore\": number (0-1), \
     \"explanation\": \"string\" }] }.\n\
     Do not include any text, markdown, or formatting outside of the single JSON object."
        .to_string()
}

/// User prompt carrying the submitted project details.
pub fn suggestion_user_prompt(details: &ProjectDetails) -> String {
    format!(
        "Project Name: {}\n\
         Business Niche: {}\n\
         Target Audience: {}\n\
         Keywords: {}\n\
         Preferred TLDs: {}\n\n\
         Consider market trends, branding potential, memorability, and audience relevance \
         when generating suggestions.\n\
         Return the top 3-5 domain suggestions.",
        details.project_name,
        details.business_niche,
        details.target_audience,
        details.keywords,
        details.preferred_tlds
    )
}

/// Free-text research brief for the deep-dive market analysis task.
pub fn research_prompt(suggestion: &Suggestion, details: &ProjectDetails) -> String {
    format!(
        "Perform a comprehensive market and trend analysis for the domain name \"{domain}\".\n\
         The user is considering this for a project with the following details:\n\
         - Project/Business Name: {name}\n\
         - Niche/Project Type: {niche}\n\
         - Target Audience/Location: {audience}\n\
         - Keywords: {keywords}\n\n\
         Your research must be deep and cover the following areas, using your web search \
         capabilities (Google, Google Trends, social media, etc.):\n\
         1. **Market Viability:** Is there a demand for businesses or projects in this niche? \
         What is the competition like?\n\
         2. **Trend Analysis:** Using Google Trends and social media analysis, what are the \
         current and projected trends related to the niche and keywords? Is interest growing, \
         stable, or declining?\n\
         3. **Branding & Memorability:** How strong is \"{domain}\" from a branding \
         perspective? Is it memorable, easy to spell, and unique?\n\
         4. **Audience Resonance:** Does the domain name resonate with the target audience? \
         What is the sentiment around similar names or concepts on social media?\n\
         5. **SEO Potential:** Analyze the SEO potential. Are the keywords in the domain \
         valuable for search ranking?\n\
         6. **Social Media Availability:** Check for the availability of handles matching or \
         similar to the domain name on major platforms (Twitter/X, Instagram, Facebook).\n\n\
         Provide a structured, detailed report with clear headings for each section. Conclude \
         with a final recommendation (e.g., Highly Recommended, Recommended, Consider \
         Alternatives) and a summary of why.",
        domain = suggestion.domain_name,
        name = details.project_name,
        niche = details.business_niche,
        audience = details.target_audience,
        keywords = details.keywords,
    )
}

/// Prompt for the synchronous single-shot analysis variant.
pub fn sync_analysis_prompt(suggestion: &Suggestion, details: &ProjectDetails) -> String {
    format!(
        "Write a concise market analysis report for the domain name \"{domain}\", proposed \
         for the project \"{name}\" ({niche}, targeting {audience}). Cover branding strength, \
         audience fit, and SEO potential of the embedded keywords ({keywords}). Use markdown \
         headings, **bold** emphasis, and `* ` bullet lists. End with a one-line \
         recommendation.",
        domain = suggestion.domain_name,
        name = details.project_name,
        niche = details.business_niche,
        audience = details.target_audience,
        keywords = details.keywords,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserType;

    fn fixtures() -> (Suggestion, ProjectDetails) {
        (
            Suggestion {
                domain_name: "fernweh.travel".to_string(),
                confidence_score: 0.9,
                explanation: "evocative".to_string(),
            },
            ProjectDetails {
                user_type: UserType::Business,
                project_name: "Fernweh Travel".to_string(),
                business_niche: "boutique travel".to_string(),
                target_audience: "young professionals".to_string(),
                keywords: "wander, journey".to_string(),
                preferred_tlds: ".travel".to_string(),
            },
        )
    }

    #[test]
    fn test_research_prompt_embeds_domain_and_details() {
        let (suggestion, details) = fixtures();
        let prompt = research_prompt(&suggestion, &details);
        assert!(prompt.contains("fernweh.travel"));
        assert!(prompt.contains("Fernweh Travel"));
        assert!(prompt.contains("Market Viability"));
    }

    #[test]
    fn test_suggestion_prompt_lists_all_fields() {
        let (_, details) = fixtures();
        let prompt = suggestion_user_prompt(&details);
        assert!(prompt.contains("boutique travel"));
        assert!(prompt.contains(".travel"));
    }
}
