use crate::fields::FieldMap;

/// Tokenizer scan state. No backtracking; the terminal state is the
/// implicit end-of-input flush.
enum Scan {
    /// Between pairs, or extending an unquoted multi-word value.
    Assignment,
    /// Inside a quoted or bracketed multi-token value.
    ComplexValue,
}

/// Parse a CEF extension block into an ordered key/value map.
///
/// Single left-to-right pass over space-split tokens. A token containing
/// `=` starts a new pair (split on the first `=` only — values may contain
/// `=` themselves). A value opening with `"` or `[{` that does not close in
/// the same token accumulates subsequent tokens until one ends with the
/// matching `"` or `}]`. Bare tokens outside a complex run extend the
/// pending value, which keeps unquoted multi-word values intact
/// (`ver=TLSv1.3 TLS_AES_128_GCM_SHA256`).
///
/// Leniency rules: a duplicate key takes the last value; an unterminated
/// quote or bracket run flushes whatever accumulated when input ends; pairs
/// with an empty key or empty value are dropped. None of these raises an
/// error.
pub fn parse_extensions(extension: &str) -> FieldMap {
    let mut map = FieldMap::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut acc = String::new();
    let mut state = Scan::Assignment;

    for token in extension.split(' ') {
        match state {
            Scan::Assignment if token.contains('=') => {
                commit(&mut map, &key, &value);
                let (k, v) = token.split_once('=').unwrap_or((token, ""));
                key = k.to_owned();
                value = v.to_owned();

                if opens_complex(&value) {
                    acc.clear();
                    acc.push_str(&value);
                    state = Scan::ComplexValue;
                }
            }
            Scan::Assignment => {
                // Continuation word of an unquoted value
                value.push(' ');
                value.push_str(token);
            }
            Scan::ComplexValue => {
                acc.push(' ');
                acc.push_str(token);
                if closes_complex(&acc, token) {
                    value = std::mem::take(&mut acc);
                    state = Scan::Assignment;
                }
            }
        }
    }

    // End of input: a still-open complex run flushes as accumulated
    if let Scan::ComplexValue = state {
        value = acc;
    }
    commit(&mut map, &key, &value);

    map
}

/// A value opens a multi-token run when its opening marker is not closed
/// within the same token.
fn opens_complex(value: &str) -> bool {
    (value.starts_with('"') && !value.ends_with('"'))
        || (value.starts_with("[{") && !value.ends_with("}]"))
}

/// The run closes when the latest token carries the marker matching how the
/// accumulated value opened.
fn closes_complex(acc: &str, token: &str) -> bool {
    (acc.starts_with('"') && token.ends_with('"'))
        || (acc.starts_with("[{") && token.ends_with("}]"))
}

fn commit(map: &mut FieldMap, key: &str, value: &str) {
    if !key.is_empty() && !value.is_empty() {
        map.insert(key.to_owned(), strip_quotes(value).to_owned());
    }
}

/// Strip a single pair of surrounding double quotes. A lone leading quote
/// (unterminated run flushed at end of input) is stripped on its own.
fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix('"').unwrap_or(value);
    value.strip_suffix('"').unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_simple_pairs() {
        let map = parse_extensions("a=1 b=2");
        assert_eq!(map.get("a"), Some("1"));
        assert_eq!(map.get("b"), Some("2"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let map = parse_extensions("a=1 a=2");
        assert_eq!(map.get("a"), Some("2"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_quoted_multiword_value() {
        let map = parse_extensions(r#"msg="hello world" x=1"#);
        assert_eq!(map.get("msg"), Some("hello world"));
        assert_eq!(map.get("x"), Some("1"));
    }

    #[test]
    fn test_quoted_single_token_value() {
        let map = parse_extensions(r#"msg="hello" x=1"#);
        assert_eq!(map.get("msg"), Some("hello"));
    }

    #[test]
    fn test_unquoted_multiword_continuation() {
        let map = parse_extensions("ver=TLSv1.3 TLS_AES_128_GCM_SHA256 end=1720396717135");
        assert_eq!(map.get("ver"), Some("TLSv1.3 TLS_AES_128_GCM_SHA256"));
        assert_eq!(map.get("end"), Some("1720396717135"));
    }

    #[test]
    fn test_bracketed_json_run() {
        let map = parse_extensions(r#"cs10=[{"a":"b"}] x=1"#);
        assert_eq!(map.get("cs10"), Some(r#"[{"a":"b"}]"#));
        assert_eq!(map.get("x"), Some("1"));
    }

    #[test]
    fn test_bracketed_json_spanning_tokens() {
        let map = parse_extensions(r#"cs10=[{"k":"v with spaces","n":"m"}] next=1"#);
        assert_eq!(map.get("cs10"), Some(r#"[{"k":"v with spaces","n":"m"}]"#));
        assert_eq!(map.get("next"), Some("1"));
    }

    #[test]
    fn test_value_with_embedded_equals() {
        // Split happens on the first '=' only
        let map = parse_extensions("query=a=b");
        assert_eq!(map.get("query"), Some("a=b"));
    }

    #[test]
    fn test_unterminated_quote_flushes_accumulated() {
        let map = parse_extensions(r#"msg="never closed trailing words"#);
        assert_eq!(map.get("msg"), Some("never closed trailing words"));
    }

    #[test]
    fn test_unterminated_bracket_flushes_accumulated() {
        let map = parse_extensions(r#"cs10=[{"a":"b" x=1"#);
        // x=1 is swallowed by the still-open bracket run
        assert_eq!(map.get("cs10"), Some(r#"[{"a":"b" x=1"#));
        assert!(!map.contains_key("x"));
    }

    #[test]
    fn test_empty_value_is_dropped() {
        let map = parse_extensions("a= b=2");
        assert!(!map.contains_key("a"));
        assert_eq!(map.get("b"), Some("2"));
    }

    #[test]
    fn test_empty_key_is_dropped() {
        let map = parse_extensions("=v a=1");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some("1"));
    }

    #[test]
    fn test_leading_space_tolerated() {
        let map = parse_extensions(" key1=value1 key2=value2");
        assert_eq!(map.get("key1"), Some("value1"));
        assert_eq!(map.get("key2"), Some("value2"));
    }

    #[test]
    fn test_empty_input_yields_empty_map() {
        assert!(parse_extensions("").is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let map = parse_extensions("c=1 a=2 b=3");
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_tokenizer_never_panics(input in "\\PC{0,200}") {
            let _ = parse_extensions(&input);
        }

        #[test]
        fn prop_simple_pairs_round_trip(
            pairs in prop::collection::vec(
                ("[a-zA-Z][a-zA-Z0-9]{0,8}", "[a-zA-Z0-9]{1,8}"),
                1..6,
            )
        ) {
            let extension = pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(" ");
            let map = parse_extensions(&extension);

            for (key, _) in &pairs {
                // Last occurrence of the key wins
                let expected = pairs
                    .iter()
                    .rev()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str());
                prop_assert_eq!(map.get(key), expected);
            }
        }
    }
}
