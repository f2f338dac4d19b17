//! Token ↔ char conversions based on a fixed chars-per-token ratio.

/// Approximate token count of `char_len` chars, rounded up.
pub fn estimate_tokens(char_len: usize, token_to_char_ratio: f64) -> usize {
    (char_len as f64 / token_to_char_ratio).ceil() as usize
}

/// Approximate char width of `tokens` tokens. Never less than 1.
pub fn tokens_to_chars(tokens: usize, token_to_char_ratio: f64) -> usize {
    ((tokens as f64) * token_to_char_ratio).round().max(1.0) as usize
}
