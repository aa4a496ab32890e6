//! Property tests for the email construction invariants.
//!
//! Invariants tested:
//! 1. `build` succeeds exactly when `is_valid` holds, and stores the trimmed,
//!    lower-cased input
//! 2. Rebuilding from a stored value yields the same value
//! 3. `local_part + "@" + domain_part` recomposes the stored value
//! 4. Stored values stay within the length bound, whatever lower-casing does
//!
//! Reproducible: set `PROPTEST_SEED` for deterministic runs

use proptest::prelude::*;

use domain::{Email, FailureKind, MAX_EMAIL_LENGTH};

fn fast_config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        max_shrink_iters: 256,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Strategies
// =============================================================================

/// Addresses shaped like `local@domain.tld`, with mixed case, a few
/// non-ASCII letters (including ones that grow when lower-cased) and
/// surrounding whitespace.
fn email_shaped_strategy() -> impl Strategy<Value = String> {
    (
        "[ \t\n]{0,2}",
        "[a-zA-Z0-9._%+\u{130}\u{3a3}\u{df}-]{1,80}",
        "[a-zA-Z0-9.\u{130}-]{1,40}",
        "[a-zA-Z]{2,8}",
        "[ \t\n]{0,2}",
    )
        .prop_map(|(lead, local, domain, tld, trail)| {
            format!("{lead}{local}@{domain}.{tld}{trail}")
        })
}

/// Addresses sitting at the length limit before lower-casing.
fn near_limit_strategy() -> impl Strategy<Value = String> {
    (230_usize..=242, prop::bool::ANY).prop_map(|(n, dotted_i)| {
        let filler = if dotted_i { "\u{130}" } else { "A" };
        format!("{}@example.com", filler.repeat(n))
    })
}

fn any_input_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "\\PC{0,40}",
        email_shaped_strategy(),
        near_limit_strategy(),
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(fast_config())]

    #[test]
    fn prop_build_agrees_with_is_valid(raw in any_input_strategy()) {
        match Email::parse(&raw) {
            Ok(email) => {
                prop_assert!(Email::is_valid(&raw), "built but not valid: {:?}", raw);
                prop_assert_eq!(email.as_str(), raw.trim().to_lowercase());
            }
            Err(err) => {
                prop_assert!(!Email::is_valid(&raw), "valid but not built: {:?}", raw);
                prop_assert_eq!(err.kind(), FailureKind::InvalidFormat);
                prop_assert_eq!(err.input(), raw.as_str());
            }
        }
    }

    #[test]
    fn prop_build_is_idempotent(raw in any_input_strategy()) {
        if let Ok(first) = Email::parse(&raw) {
            let second = Email::parse(first.as_str());
            prop_assert_eq!(second, Ok(first));
        }
    }

    #[test]
    fn prop_parts_recompose_value(raw in email_shaped_strategy()) {
        if let Ok(email) = Email::parse(&raw) {
            prop_assert!(!email.local_part().contains('@'));
            prop_assert_eq!(
                format!("{}@{}", email.local_part(), email.domain_part()),
                email.as_str()
            );
        }
    }

    #[test]
    fn prop_stored_value_within_bounds(raw in any_input_strategy()) {
        if let Ok(email) = Email::parse(&raw) {
            let stored = email.as_str();
            prop_assert!(stored.chars().count() <= MAX_EMAIL_LENGTH);
            prop_assert!(!stored.contains(".."));
            prop_assert!(!stored.chars().any(char::is_whitespace));
        }
    }
}
