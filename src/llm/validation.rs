use super::SOURCES_HEADING;

/// Configuration for the rewrite post-condition check
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Warn when the body's sentence count differs from the input's
    pub check_sentence_count: bool,
    /// Warn when the raw source URL appears in the body
    pub check_url_in_body: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_sentence_count: true,
            check_url_in_body: true,
        }
    }
}

/// Result of checking a rewrite
///
/// Only an empty rewrite is an error; everything else is advisory because the
/// completion service owns formatting of its free-text output.
#[derive(Debug, Clone)]
pub struct RewriteCheck {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub input_sentences: usize,
    pub output_sentences: usize,
}

/// Check a rewrite against the input sentence
pub fn check_rewrite(
    sentence: &str,
    enhanced: &str,
    source_url: &str,
    config: &ValidationConfig,
) -> RewriteCheck {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if enhanced.trim().is_empty() {
        errors.push("Rewrite is empty".to_string());
    }

    let body = split_body(enhanced);
    let input_sentences = count_sentences(sentence);
    let output_sentences = count_sentences(body);

    if config.check_sentence_count && errors.is_empty() && input_sentences != output_sentences {
        warnings.push(format!(
            "Sentence count changed: {} in input, {} in rewrite",
            input_sentences, output_sentences
        ));
    }

    if config.check_url_in_body && !source_url.is_empty() && body.contains(source_url) {
        warnings.push(format!("Source URL {} appears in the body text", source_url));
    }

    RewriteCheck {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        input_sentences,
        output_sentences,
    }
}

/// Body text of a rewrite, i.e. everything above the reference list
pub fn split_body(enhanced: &str) -> &str {
    let mut offset = 0;
    for line in enhanced.split_inclusive('\n') {
        if is_reference_heading(line) {
            return enhanced[..offset].trim_end();
        }
        offset += line.len();
    }
    enhanced.trim_end()
}

fn is_reference_heading(line: &str) -> bool {
    let heading = line
        .trim()
        .trim_start_matches('#')
        .trim_matches(|c: char| c == '*' || c == '_' || c == ':' || c.is_whitespace())
        .to_lowercase();

    heading == SOURCES_HEADING.to_lowercase() || heading == "references" || heading == "source"
}

/// Abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "prof", "st", "jr", "sr", "vs", "etc", "e.g", "i.e", "cf", "fig",
    "vol", "approx", "al",
];

/// Count sentences by terminal punctuation.
///
/// A terminator counts when followed by whitespace, a closing quote or
/// bracket, or the end of text, so decimals like "100.5" are not split.
/// A single period after a known abbreviation ("Dr.", "e.g.") or an
/// uppercase initial ("J. Smith") only counts at the end of the text.
pub fn count_sentences(text: &str) -> usize {
    let chars: Vec<char> = text.trim().chars().collect();
    if chars.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut i = 0;
    while i < chars.len() {
        if matches!(chars[i], '.' | '!' | '?') {
            let run_start = i;
            // Collapse runs like "?!" or "..."
            while i + 1 < chars.len() && matches!(chars[i + 1], '.' | '!' | '?') {
                i += 1;
            }
            let mut j = i + 1;
            while j < chars.len() && matches!(chars[j], '"' | '\'' | '”' | '’' | ')' | ']') {
                j += 1;
            }
            let at_end = j >= chars.len();
            let abbreviated =
                run_start == i && chars[i] == '.' && is_abbreviation(&chars[..run_start]);
            if at_end || (chars[j].is_whitespace() && !abbreviated) {
                count += 1;
            }
        }
        i += 1;
    }

    // Trailing fragment without terminal punctuation
    let last = chars
        .iter()
        .rev()
        .find(|c| !matches!(c, '"' | '\'' | '”' | '’' | ')' | ']'));
    if !matches!(last, Some('.' | '!' | '?')) {
        count += 1;
    }

    count
}

/// Whether the word ending just before a period is an abbreviation or initial
fn is_abbreviation(before: &[char]) -> bool {
    let start = before
        .iter()
        .rposition(|c| c.is_whitespace() || matches!(c, '(' | '"' | '“'))
        .map(|p| p + 1)
        .unwrap_or(0);
    let word: String = before[start..].iter().collect();

    let mut letters = word.chars();
    if let (Some(first), None) = (letters.next(), letters.next()) {
        return first.is_uppercase() && first != 'I';
    }
    ABBREVIATIONS.contains(&word.to_lowercase().as_str())
}
