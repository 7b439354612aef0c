use regex::Regex;
use crate::error::InvalidInputError;

/// Parses a permutation written as integers separated by commas and/or
/// whitespace, optionally enclosed in a single pair of parentheses or
/// brackets, e.g. `4,0,6`, `(2, 0, 1)` or `[1 0 2]`.
pub fn parse_permutation(text: &str) -> Result<Vec<i64>, InvalidInputError> {
    let re_enclosed = Regex::new(r"(?sx)
                                 ^\s*(?:
                                   \((?P<PAREN>.*)\)|
                                   \[(?P<BRACKET>.*)\]|
                                   (?P<BARE>.*)
                                 )\s*$").unwrap();
    let re_separator = Regex::new(r"[,\s]+").unwrap();

    let body = match re_enclosed.captures(text) {
        Some(captures) => {
            captures.name("PAREN")
                .or_else(|| captures.name("BRACKET"))
                .or_else(|| captures.name("BARE"))
                .map_or("", |m| m.as_str())
        },
        None => text,
    };

    re_separator.split(body)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<i64>()
                .map_err(|_| InvalidInputError::MalformedToken{token: token.to_string()})
        })
        .collect()
}

#[test]
fn test_parse_permutation() {
    assert_eq!(parse_permutation(""), Ok(vec![]));
    assert_eq!(parse_permutation("()"), Ok(vec![]));
    assert_eq!(parse_permutation(" [ ] "), Ok(vec![]));
    assert_eq!(parse_permutation("2,0,1"), Ok(vec![2, 0, 1]));
    assert_eq!(parse_permutation("(4, 0, 6, 2, 1, 3, 5)"), Ok(vec![4, 0, 6, 2, 1, 3, 5]));
    assert_eq!(parse_permutation("[1 0 2]"), Ok(vec![1, 0, 2]));
    assert_eq!(parse_permutation("  -3,\t+7\n 12, "), Ok(vec![-3, 7, 12]));
}

#[test]
fn test_parse_permutation_malformed() {
    assert_eq!(parse_permutation("1,x,2"),
               Err(InvalidInputError::MalformedToken{token: "x".to_string()}));
    assert_eq!(parse_permutation("(1,2]"),
               Err(InvalidInputError::MalformedToken{token: "(1".to_string()}));
    assert_eq!(parse_permutation("1;2"),
               Err(InvalidInputError::MalformedToken{token: "1;2".to_string()}));
    assert!(parse_permutation("99999999999999999999").is_err());
}
