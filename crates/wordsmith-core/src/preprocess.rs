use unicode_normalization::UnicodeNormalization;

/// Turn user input into a store key.
///
/// Trims, lowercases and composes to NFC. Returns `None` when nothing is left.
///
/// Lowercasing runs first because it can yield sequences NFC composes, so the
/// result is always a fixed point: `word_key(key) == Some(key)`.
pub fn word_key(input: &str) -> Option<String> {
    let text = input.trim();

    if text.is_empty() {
        return None;
    }

    let key = text.to_lowercase().nfc().collect::<String>();

    Some(key)
}

/// True when `word` is already in key form.
pub fn is_key(word: &str) -> bool {
    word_key(word).as_deref() == Some(word)
}
