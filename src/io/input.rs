use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Resolve the claim text from a CLI argument or a file (`-` reads stdin)
pub fn read_sentence(sentence: Option<&str>, input: Option<&Path>) -> Result<String> {
    let raw = match (sentence, input) {
        (Some(sentence), None) => sentence.to_string(),
        (None, Some(path)) if path == Path::new("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read claim from stdin")?;
            buf
        }
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?,
        (Some(_), Some(_)) => anyhow::bail!("Pass either a sentence or --input, not both"),
        (None, None) => anyhow::bail!("No claim given: pass a sentence or --input"),
    };

    let sentence = raw.trim();
    if sentence.is_empty() {
        anyhow::bail!("Claim text is empty");
    }
    Ok(sentence.to_string())
}
