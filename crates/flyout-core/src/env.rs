#![forbid(unsafe_code)]

//! Environment overrides for configuration structs.
//!
//! Config types expose `from_env_with(|key| ...)` so tests can inject a
//! lookup instead of mutating the process environment. These helpers parse
//! the raw strings; unparseable values are ignored (the default stands).

use std::time::Duration;

/// Parse a float override.
pub fn env_f32<F>(get_env: &F, key: &str) -> Option<f32>
where
    F: Fn(&str) -> Option<String>,
{
    get_env(key)?
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a boolean override (`1/0/true/false/yes/no/on/off`).
pub fn env_bool<F>(get_env: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match get_env(key)?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a duration override given in whole milliseconds.
pub fn env_millis<F>(get_env: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    get_env(key)?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parses_floats() {
        let env = lookup(&[("A", " 12.5 "), ("B", "nan"), ("C", "x")]);
        assert_eq!(env_f32(&env, "A"), Some(12.5));
        assert_eq!(env_f32(&env, "B"), None);
        assert_eq!(env_f32(&env, "C"), None);
        assert_eq!(env_f32(&env, "MISSING"), None);
    }

    #[test]
    fn parses_bools() {
        let env = lookup(&[("A", "TRUE"), ("B", "off"), ("C", "maybe")]);
        assert_eq!(env_bool(&env, "A"), Some(true));
        assert_eq!(env_bool(&env, "B"), Some(false));
        assert_eq!(env_bool(&env, "C"), None);
    }

    #[test]
    fn parses_millis() {
        let env = lookup(&[("A", "250"), ("B", "-3")]);
        assert_eq!(env_millis(&env, "A"), Some(Duration::from_millis(250)));
        assert_eq!(env_millis(&env, "B"), None);
    }
}
