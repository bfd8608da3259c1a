// Guest capability tokens ("hash links").
//
// Holding a hash link is equivalent to being that guest. Tokens are minted once
// per guest and never rotated, so their length is part of every invite link
// already sent out.

use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const HASH_LINK_LEN: usize = 16;

/// Mints a fresh token for a guest: SHA-256 over the name and a random UUID,
/// hex-encoded and truncated to 16 chars (64 bits).
pub fn mint_hash_link(guest_name: &str) -> String {
    derive_hash_link(guest_name, Uuid::new_v4())
}

fn derive_hash_link(guest_name: &str, nonce: Uuid) -> String {
    let digest = Sha256::digest(format!("{guest_name}-{nonce}").as_bytes());
    let mut token = hex::encode(digest);
    token.truncate(HASH_LINK_LEN);
    token
}

// Cheap shape check so obviously bogus tokens never reach storage.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == HASH_LINK_LEN && token.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Public link a guest opens to reach their personalized pages.
pub fn guest_invite_url(base_url: &str, hash_link: &str) -> String {
    format!("{}/guest/{}", base_url.trim_end_matches('/'), hash_link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn minted_token_is_sixteen_lowercase_hex_chars() {
        let token = mint_hash_link("Maria Silva");
        assert_eq!(token.len(), HASH_LINK_LEN);
        assert!(is_well_formed(&token));
    }

    #[test]
    fn when_same_name_is_minted_twice_then_tokens_differ() {
        assert_ne!(mint_hash_link("Maria Silva"), mint_hash_link("Maria Silva"));
    }

    #[test]
    fn when_nonce_is_fixed_then_token_is_the_truncated_digest() {
        let nonce = Uuid::nil();
        let expected = hex::encode(Sha256::digest(
            b"Joao-00000000-0000-0000-0000-000000000000",
        ));
        assert_eq!(derive_hash_link("Joao", nonce), expected[..16]);
    }

    #[test]
    fn one_hundred_thousand_mintings_are_pairwise_distinct() {
        let tokens: HashSet<String> = (0..100_000).map(|_| mint_hash_link("Guest")).collect();
        assert_eq!(tokens.len(), 100_000);
    }

    #[test]
    fn well_formed_rejects_wrong_length_case_and_alphabet() {
        assert!(is_well_formed("0123456789abcdef"));
        assert!(!is_well_formed("0123456789abcde"));
        assert!(!is_well_formed("0123456789abcdef0"));
        assert!(!is_well_formed("0123456789ABCDEF"));
        assert!(!is_well_formed("0123456789abcdeg"));
        assert!(!is_well_formed(""));
    }

    #[test]
    fn invite_url_joins_base_and_token_without_double_slash() {
        assert_eq!(
            guest_invite_url("https://weddingplanner.com.br/", "0123456789abcdef"),
            "https://weddingplanner.com.br/guest/0123456789abcdef"
        );
    }
}
