// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profanity masking for chirp bodies.

/// Words replaced by [`MASK`], matched case-insensitively.
pub const DENYLIST: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Replacement for a denylisted word.
pub const MASK: &str = "****";

/// Replace every whole denylisted word in `body` with [`MASK`].
///
/// Words are delimited by single spaces; punctuation stays attached, so
/// `"Sharbert!"` is left alone.
pub fn mask_profanity(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if DENYLIST.iter().any(|bad| word.eq_ignore_ascii_case(bad)) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_denylisted_words() {
        assert_eq!(
            mask_profanity("This is a kerfuffle opinion I need to share with the world"),
            "This is a **** opinion I need to share with the world"
        );
        assert_eq!(mask_profanity("sharbert fornax"), "**** ****");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            mask_profanity("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(mask_profanity("KERFUFFLE Fornax"), "**** ****");
    }

    #[test]
    fn test_whole_words_only() {
        assert_eq!(mask_profanity("kerfuffles"), "kerfuffles");
        assert_eq!(mask_profanity("Sharbert!"), "Sharbert!");
    }

    #[test]
    fn test_idempotent() {
        let once = mask_profanity("a kerfuffle and a fornax");
        assert_eq!(mask_profanity(&once), once);
    }

    #[test]
    fn test_preserves_spacing() {
        assert_eq!(mask_profanity("a  kerfuffle "), "a  **** ");
        assert_eq!(mask_profanity(""), "");
    }
}
