use crate::models::PromptFields;

/// Run label for the query formulation call
pub const QUERY_RUN_NAME: &str = "generate_query";

/// Run label for the citation rewrite call
pub const REWRITE_RUN_NAME: &str = "rewrite_sentence";

/// Heading the rewrite directive asks for above the reference list
pub const SOURCES_HEADING: &str = "Sources";

/// Build the directive asking for a search query for a claim
pub fn build_query_prompt(sentence: &str) -> String {
    format!(
        "Generate a concise search query to find a reliable source for the following claim:\n\n{}",
        sentence
    )
}

/// Build the citation rewrite directive
///
/// Any empty input is left empty; the directive tells the completion service
/// to omit the matching part rather than invent it.
pub fn build_rewrite_prompt(fields: &PromptFields<'_>) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are an expert technical writer.\n\n");
    prompt.push_str(
        "Unless you believe otherwise, assume you are to provide a quote and citation to support a claim made in the sentence.\n\n",
    );

    prompt.push_str(
        "1. Rewrite the following input sentence in a formal essay style using the provided quote.\n\n",
    );
    prompt.push_str(
        "2. If the input is a well-structured paragraph, do not completely rewrite it. Instead, insert or replace a section with the quote, transitioning smoothly.\n\n",
    );

    prompt.push_str(
        "3. Include an in-text citation in APA style with the quote in quotation marks \"\".\n",
    );
    prompt.push_str(
        "    - Format: (Author, Year). If the author is mentioned in the sentence, only include the year in parentheses.\n",
    );
    prompt.push_str("    - Do not include direct links in the output paragraph.\n\n");

    prompt.push_str("4. Match the sentence count of the input.\n");
    prompt.push_str(
        "    - If the input is a single sentence, the output should also be a single sentence.\n",
    );
    prompt.push_str(
        "    - If the input is a multi-sentence paragraph, the output should contain the same number of sentences.\n",
    );
    prompt.push_str(
        "    - You may slightly adjust sentence boundaries for flow, but do not add or remove entire sentences.\n",
    );
    prompt.push_str("    - The quote and citation must be integrated within this constraint.\n\n");

    prompt.push_str(&format!("5. In the {} section:\n", SOURCES_HEADING));
    prompt.push_str("    - Include all sources used in your report.\n");
    prompt.push_str(
        "    - Format each source in APA style: AuthorLastName, FirstInitial. (Year). *Title of the webpage or article*. Website Name. URL\n",
    );
    prompt.push_str(
        "    - Separate each source by a newline. Use two spaces at the end of each line to create a newline in Markdown.\n",
    );
    prompt.push_str(
        "    - Example:  Smith, J. (2023). *Understanding AI advancements*. OpenAI Blog. https://openai.com/blog/understanding-ai\n\n",
    );

    prompt.push_str("6. Combine sources to avoid redundancy. For example, this is incorrect:\n");
    prompt.push_str("    [1] https://example.com/article\n");
    prompt.push_str("    [2] https://example.com/article\n\n");
    prompt.push_str("    It should be:\n");
    prompt.push_str("    [1] https://example.com/article\n\n");

    prompt.push_str(
        "7. Inputs to use are below. If any input is missing or empty, omit that part from your response.\n",
    );
    prompt.push_str(&format!("    Sentence: {}\n", fields.sentence));
    prompt.push_str(&format!("    Quote: {}\n", fields.quote));
    prompt.push_str(&format!("    Source Title: {}\n", fields.source_title));
    prompt.push_str(&format!("    Source URL: {}\n", fields.source_url));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(quote: &'a str, title: &'a str, url: &'a str) -> PromptFields<'a> {
        PromptFields {
            sentence: "Water boils at 100 degrees Celsius at sea level.",
            quote,
            source_title: title,
            source_url: url,
        }
    }

    #[test]
    fn test_query_prompt_embeds_claim_verbatim() {
        let prompt = build_query_prompt("The Moon is 384,400 km away.");
        assert!(prompt.contains("concise search query"));
        assert!(prompt.ends_with("The Moon is 384,400 km away."));
    }

    #[test]
    fn test_rewrite_prompt_requires_single_sentence_output() {
        let prompt = build_rewrite_prompt(&fields("q", "t", "u"));
        assert!(prompt.contains(
            "If the input is a single sentence, the output should also be a single sentence."
        ));
        assert!(prompt.contains("do not add or remove entire sentences"));
    }

    #[test]
    fn test_rewrite_prompt_citation_rules() {
        let prompt = build_rewrite_prompt(&fields("q", "t", "u"));
        assert!(prompt.contains("(Author, Year)"));
        assert!(prompt.contains("only include the year"));
        assert!(prompt.contains("Do not include direct links"));
        assert!(prompt.contains("Combine sources to avoid redundancy"));
        assert!(prompt.contains("If any input is missing or empty, omit that part"));
    }

    #[test]
    fn test_rewrite_prompt_embeds_inputs() {
        let prompt = build_rewrite_prompt(&fields(
            "Water boils at 100°C (212°F) at standard pressure (Britannica, 2020).",
            "Boiling point",
            "https://example.org/boiling",
        ));

        assert!(prompt.contains("Sentence: Water boils at 100 degrees Celsius at sea level."));
        assert!(prompt.contains("Quote: Water boils at 100°C (212°F)"));
        assert!(prompt.contains("Source Title: Boiling point\n"));
        assert!(prompt.contains("Source URL: https://example.org/boiling\n"));
    }

    #[test]
    fn test_rewrite_prompt_leaves_missing_inputs_empty() {
        let prompt = build_rewrite_prompt(&fields("", "", ""));
        assert!(prompt.contains("Quote: \n"));
        assert!(prompt.contains("Source Title: \n"));
        assert!(prompt.contains("Source URL: \n"));
        assert!(!prompt.contains("No sources found."));
    }
}
