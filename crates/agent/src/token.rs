//! Token estimation utilities.
//!
//! Uses a character-based heuristic: ~4 characters per token. This
//! approximation is accurate within ~10% for BPE tokenizers on English
//! text, and the budget is a proxy signal for context pressure, not a
//! billing figure; consistency matters more than provider parity.

/// Estimate the token count for a string.
///
/// Heuristic: 1 token ≈ 4 characters. Rounds up.
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    (text.len() + 3) / 4
}

/// Whether `text` fits within a token budget.
pub fn fits(text: &str, limit: usize) -> bool {
    estimate_tokens(text) <= limit
}
