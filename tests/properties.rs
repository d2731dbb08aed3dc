//! Randomized property tests for the hash string format and verification.

use mcfhash::format::ab64;
use mcfhash::{
    Algorithm, PasswordHash, PasswordHasher, Pbkdf2Content, Pbkdf2Hash, Pbkdf2Hasher, Pbkdf2Params,
    parse, verify,
};
use proptest::prelude::*;

fn any_algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![
        Just(Algorithm::Sha1),
        Just(Algorithm::Sha256),
        Just(Algorithm::Sha384),
        Just(Algorithm::Sha512),
    ]
}

proptest! {
    #[test]
    fn prop_ab64_decode_inverts_encode(bytes in prop::collection::vec(any::<u8>(), 0..=96)) {
        let text = ab64::encode(&bytes);

        prop_assert!(!text.contains('+'));
        prop_assert!(!text.contains('='));
        prop_assert_eq!(ab64::decode(&text).unwrap(), bytes);
    }

    #[test]
    fn prop_content_roundtrip(
        iterations in 1u32..=u32::MAX,
        salt in prop::collection::vec(any::<u8>(), 0..=32),
        key in prop::collection::vec(any::<u8>(), 0..=64),
    ) {
        let content = Pbkdf2Content::new(iterations, salt.clone(), key.clone()).unwrap();
        let parsed = Pbkdf2Content::parse(&content.to_string()).unwrap();

        prop_assert_eq!(parsed.iterations(), iterations);
        prop_assert_eq!(parsed.salt(), salt.as_slice());
        prop_assert_eq!(parsed.derived_key(), key.as_slice());
    }

    #[test]
    fn prop_hash_string_roundtrip(
        algorithm in any_algorithm(),
        iterations in 1u32..=u32::MAX,
        salt in prop::collection::vec(any::<u8>(), 0..=32),
        key in prop::collection::vec(any::<u8>(), 0..=64),
    ) {
        let hash = Pbkdf2Hash::new(algorithm, Pbkdf2Content::new(iterations, salt, key).unwrap());
        let text = hash.to_string();

        prop_assert_eq!(Pbkdf2Hash::parse(&text), Some(hash));
        prop_assert!(parse(&text).is_some());
    }

    #[test]
    fn prop_parse_never_panics(text in "\\PC*") {
        let _ = parse(&text);
        let _ = Pbkdf2Hash::parse(&text);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_hash_verifies_own_password(password in ".{0,32}", algorithm in any_algorithm()) {
        let hasher = Pbkdf2Hasher::new(Pbkdf2Params::new(8, 2, algorithm).unwrap()).unwrap();
        let text = hasher.hash(&password).unwrap().to_string();

        prop_assert!(verify(&password, &text).unwrap());
    }

    #[test]
    fn prop_wrong_password_is_rejected(
        password in ".{0,32}",
        other in ".{0,32}",
        algorithm in any_algorithm(),
    ) {
        prop_assume!(password != other);

        let hasher = Pbkdf2Hasher::new(Pbkdf2Params::new(8, 2, algorithm).unwrap()).unwrap();
        let hash = hasher.hash(&password).unwrap();

        prop_assert!(!hash.verify(&other).unwrap());
    }
}
