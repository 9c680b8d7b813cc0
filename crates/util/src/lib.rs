pub mod http;

use once_cell::sync::Lazy;
use regex::Regex;

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization: )([\w\-\.=:/+ ]+)",
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s&]+)",
        r"(?i)(RC-WSKEY )([\w\-\.=:/+]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("sensitive pattern must compile"))
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for re in SENSITIVE_PATTERNS.iter() {
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}

/// Trim `text` and cap it at `max_len` characters, marking cuts with "...".
pub fn truncate_for_summary(text: &str, max_len: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }

    // Reserve space for the trailing ellipsis.
    let target_len = max_len.saturating_sub(3);
    let truncated: String = trimmed.chars().take(target_len).collect();
    format!("{}...", truncated.trim_end())
}
