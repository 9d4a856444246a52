//! Proptest generators for property-based testing.

use proptest::prelude::*;

use autoprefs::store::Value;

use crate::sample::UserProfile;

/// Generate a preference key.
pub fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.]{0,31}".prop_map(String::from)
}

/// Generate a namespace name that every provider accepts.
pub fn namespace() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a stored scalar of any kind.
pub fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        ".{0,64}".prop_map(Value::String),
        any::<i32>().prop_map(Value::Int),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// Generate a user profile.
pub fn user_profile() -> impl Strategy<Value = UserProfile> {
    (".{0,32}", 0i32..=130, any::<bool>())
        .prop_map(|(name, age, is_premium)| UserProfile::new(name, age, is_premium))
}

/// Generate text that is not valid JSON for any struct.
pub fn malformed_json() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("{".to_string()),
        Just("{\"name\": ".to_string()),
        Just("[1, 2".to_string()),
        "[a-z]{1,12}".prop_map(|s| format!("{{{s}")),
    ]
}
