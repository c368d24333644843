//! Text heuristics over mined description prose.
//!
//! The man-page descriptions carry structure in conventional English:
//! "Takes one of ...", "range 0...65535", "Defaults to yes.", "This option
//! is mandatory." Each extractor here mines one of those clauses into
//! structured data and returns the description with the consumed clause
//! removed, so the same fact is never emitted both as a constraint and as
//! prose.
//!
//! Every extractor is best-effort: no match means the caller falls through
//! to a more generic inference rule, never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Regex patterns for description mining.
static PATTERNS: LazyLock<HeuristicPatterns> = LazyLock::new(HeuristicPatterns::new);

struct HeuristicPatterns {
    // Enumerations: "Takes one of 'a', 'b' or 'c'."
    enum_intro: Regex,
    quoted_token: Regex,
    or_and_joiner: Regex,
    identifier: Regex,

    // Integer ranges
    range_takes: Regex,
    range_between: Regex,
    range_sentence: Regex,

    // Defaults
    defaults_to: Regex,
    default_is: Regex,
    default_colon: Regex,

    // Mandatory language
    mandatory: Vec<Regex>,

    // Redundant leading clauses
    boolean_clause: Regex,
    ref_clauses: Vec<(&'static str, Regex)>,

    // Description-based type guesses
    boolean_guess: Regex,
    ref_guesses: Vec<(&'static str, Regex)>,

    // Whitespace cleanup
    space_before_dot: Regex,
    whitespace_run: Regex,
}

impl HeuristicPatterns {
    fn new() -> Self {
        // All regexes here are compile-time constants. An expect() failure
        // indicates a programmer error in the pattern, not a runtime
        // condition.
        let compile = |pattern: &str| Regex::new(pattern).expect("static regex must compile");
        Self {
            enum_intro: compile(
                r"(?i)(?:Takes|Accepts|Values?|Defaults?|Supported)\s+(?:a|an|the)?\s*(?:\w+\s+){0,3}?(?:one of|:|are|following)(.*?)(\.|$)",
            ),
            quoted_token: compile(r#"['"]([^'"]+)['"]"#),
            or_and_joiner: compile(r"\s+(?:or|and)\s+"),
            identifier: compile(r"^[a-zA-Z0-9\-\._]+$"),

            range_takes: compile(
                r"(?i)(?:Takes|Accepts|Must\s+be)\s+(?:a|an|the)?\s*(?:integer|number|value)?\s*(?:in\s+the\s+)?range\s+(?:of\s+)?(-?\d+)(?:\.\.\.|\.\.|\u{2026})(-?\d+)\.?",
            ),
            range_between: compile(
                r"(?i)(?:Takes|Accepts|Must\s+be)\s+(?:a|an|the)?\s*(?:integer|number|value)\s*between\s+(-?\d+)\s+and\s+(-?\d+)\.?",
            ),
            range_sentence: compile(
                r"(?i)(?:^|\.\s+)Range\s+(?:of\s+)?(-?\d+)(?:\.\.\.|\.\.|\u{2026})(-?\d+)\.?",
            ),

            defaults_to: compile(r#"(?i)Defaults?\s+to\s+(?:the\s+)?['"]?([^\s"',]+)['"]?"#),
            default_is: compile(r#"(?i)The\s+default\s+is\s+(?:the\s+)?['"]?([^\s"',]+)['"]?"#),
            default_colon: compile(r#"(?i)Default:\s+['"]?([^\s"',]+)['"]?"#),

            mandatory: vec![
                compile(r"(?i)\b(?:is|are)\s+(?:mandatory|compulsory)\b"),
                compile(r"(?i)\bmust\s+be\s+specified\b"),
                compile(r"(?i)\bthis\s+option\s+is\s+required\b"),
                compile(r"(?i)\bsetting\s+is\s+required\b"),
            ],

            boolean_clause: compile(r"(?i)^Takes a boolean\s*(?:argument|value)?\.?"),
            ref_clauses: vec![
                ("ipv4_address", compile(r"(?i)^Takes a\s+IPv4 address\.?")),
                ("ipv6_address", compile(r"(?i)^Takes a\s+IPv6 address\.?")),
                ("ip_address", compile(r"(?i)^Takes a\s+IP address\.?")),
                (
                    "mac_address",
                    compile(r"(?i)^Takes a\s+(?:MAC|hardware) address\.?"),
                ),
                (
                    "filename",
                    compile(r"(?i)^Takes a\s+(?:file system )?path\.?"),
                ),
                (
                    "seconds",
                    compile(r"(?i)^Takes a\s+time (?:span|duration|interval)\.?"),
                ),
                ("bytes", compile(r"(?i)^Takes a\s+(?:size|value) in bytes\.?")),
            ],

            boolean_guess: compile(r"(?i)Takes a boolean"),
            ref_guesses: vec![
                ("ipv4_address", compile(r"(?i)Takes an IPv4 address")),
                ("ipv6_address", compile(r"(?i)Takes an IPv6 address")),
                ("ip_address", compile(r"(?i)Takes an IP address")),
                ("mac_address", compile(r"(?i)Takes a MAC address")),
                ("filename", compile(r"(?i)Takes a path")),
                ("seconds", compile(r"(?i)in seconds")),
                ("bytes", compile(r"(?i)in bytes")),
                ("bytes", compile(r"(?i)suffixes K, M, G")),
            ],

            space_before_dot: compile(r"\s+\."),
            whitespace_run: compile(r"\s+"),
        }
    }
}

/// Folds typographic Unicode down to its ASCII equivalent and drops
/// whatever remains outside ASCII.
///
/// # Examples
///
/// ```
/// use networkd_schema_mining::fold_ascii;
///
/// assert_eq!(fold_ascii("\u{201c}yes\u{201d} \u{2014} or \u{2018}no\u{2019}\u{2026}"),
///            "\"yes\" -- or 'no'...");
/// ```
pub fn fold_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201c}' | '\u{201d}' | '\u{201f}' => out.push('"'),
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' => out.push('-'),
            '\u{2014}' => out.push_str("--"),
            '\u{2026}' => out.push_str("..."),
            '\u{00a0}' => out.push(' '),
            ch if ch.is_ascii() => out.push(ch),
            _ => {}
        }
    }
    out
}

/// ASCII-folds, collapses whitespace runs, and drops stray space before
/// periods.
pub fn clean_whitespace(text: &str) -> String {
    let folded = fold_ascii(text);
    let no_dangling_dots = PATTERNS.space_before_dot.replace_all(&folded, ".");
    PATTERNS
        .whitespace_run
        .replace_all(&no_dangling_dots, " ")
        .trim()
        .to_string()
}

/// Mines an enumeration out of an introductory clause.
///
/// Returns the sorted, deduplicated values and the description with the
/// matched clause removed. Quoted tokens win; otherwise comma/"or"-joined
/// bare words are accepted only if every candidate passes the strict
/// identifier character class — one bad candidate rejects the whole
/// extraction.
///
/// # Examples
///
/// ```
/// use networkd_schema_mining::extract_enum;
///
/// let (values, rest) =
///     extract_enum("Takes one of 'yes', 'no' or 'ipv4'. More prose.").unwrap();
/// assert_eq!(values, vec!["ipv4", "no", "yes"]);
/// assert_eq!(rest, "More prose.");
///
/// assert!(extract_enum("Takes a free-form string.").is_none());
/// ```
pub fn extract_enum(text: &str) -> Option<(Vec<String>, String)> {
    let captures = PATTERNS.enum_intro.captures(text)?;
    let matched = captures.get(0)?;
    let content = captures.get(1)?.as_str();

    let mut values: Vec<String> = PATTERNS
        .quoted_token
        .captures_iter(content)
        .map(|c| c[1].to_string())
        .collect();

    if values.is_empty() {
        let joined = PATTERNS.or_and_joiner.replace_all(content, ",");
        for candidate in joined.split([',', '|']) {
            let candidate = candidate.trim();
            if candidate.is_empty() {
                continue;
            }
            if PATTERNS.identifier.is_match(candidate) {
                values.push(candidate.to_string());
            } else {
                values.clear();
                break;
            }
        }
    }

    if values.is_empty() {
        return None;
    }
    values.sort();
    values.dedup();

    let mut cleaned = String::with_capacity(text.len());
    cleaned.push_str(&text[..matched.start()]);
    cleaned.push_str(&text[matched.end()..]);
    Some((values, clean_whitespace(&cleaned)))
}

/// Mines an inclusive integer range ("range 0...65535", "between 1 and 9").
///
/// Returns `(minimum, maximum, cleaned description)`.
pub fn extract_range(text: &str) -> Option<(i64, i64, String)> {
    for pattern in [&PATTERNS.range_takes, &PATTERNS.range_between] {
        if let Some(captures) = pattern.captures(text) {
            if let Some(result) = range_from(text, &captures, "") {
                return Some(result);
            }
        }
    }
    // Sentence-initial "Range 0...100." keeps the sentence break.
    if let Some(captures) = PATTERNS.range_sentence.captures(text) {
        if let Some(result) = range_from(text, &captures, ".") {
            return Some(result);
        }
    }
    None
}

fn range_from(
    text: &str,
    captures: &regex::Captures<'_>,
    replacement: &str,
) -> Option<(i64, i64, String)> {
    let minimum: i64 = captures.get(1)?.as_str().parse().ok()?;
    let maximum: i64 = captures.get(2)?.as_str().parse().ok()?;
    let matched = captures.get(0)?;

    let mut cleaned = String::with_capacity(text.len());
    cleaned.push_str(&text[..matched.start()]);
    cleaned.push_str(replacement);
    cleaned.push_str(&text[matched.end()..]);
    Some((minimum, maximum, clean_whitespace(&cleaned)))
}

/// Scalar kind used to coerce a mined default literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Boolean,
    Integer,
    Other,
}

/// Mines a "Defaults to X" literal and coerces it to the fragment's type.
///
/// Returns the coerced value and the description with the consumed clause
/// removed. Non-literal defaults ("unset", "empty", "none", "n/a",
/// "ignored") are rejected, as are literals that do not parse as the
/// requested kind; a rejected default leaves the description untouched.
///
/// # Examples
///
/// ```
/// use networkd_schema_mining::{ScalarKind, extract_default};
/// use serde_json::json;
///
/// let (value, rest) =
///     extract_default("Enables the feature. Defaults to yes.", ScalarKind::Boolean).unwrap();
/// assert_eq!(value, json!(true));
/// assert_eq!(rest, "Enables the feature.");
///
/// assert!(extract_default("Defaults to unset.", ScalarKind::Other).is_none());
/// ```
pub fn extract_default(text: &str, kind: ScalarKind) -> Option<(Value, String)> {
    let mut found = None;
    for pattern in [
        &PATTERNS.defaults_to,
        &PATTERNS.default_is,
        &PATTERNS.default_colon,
    ] {
        if let Some(captures) = pattern.captures(text) {
            let candidate = captures[1].trim_end_matches('.').trim();
            if !matches!(
                candidate.to_ascii_lowercase().as_str(),
                "unset" | "empty" | "none" | "n/a" | "ignored"
            ) {
                found = Some((candidate.to_string(), captures.get(0).expect("whole match")));
            }
            break;
        }
    }
    let (literal, matched) = found?;

    let value = match kind {
        ScalarKind::Boolean => match literal.to_ascii_lowercase().as_str() {
            "yes" | "true" | "on" | "enabled" | "1" => Value::Bool(true),
            "no" | "false" | "off" | "disabled" | "0" => Value::Bool(false),
            _ => return None,
        },
        ScalarKind::Integer => Value::Number(literal.parse::<u64>().ok()?.into()),
        ScalarKind::Other => Value::String(literal),
    };

    let mut cleaned = String::with_capacity(text.len());
    cleaned.push_str(&text[..matched.start()]);
    cleaned.push_str(&text[matched.end()..]);
    Some((value, clean_whitespace(&cleaned)))
}

/// Detects mandatory-language anywhere in a description.
///
/// # Examples
///
/// ```
/// use networkd_schema_mining::is_mandatory;
///
/// assert!(is_mandatory("The Name= option is mandatory."));
/// assert!(is_mandatory("A kind must be specified."));
/// assert!(!is_mandatory("Optionally configures a route."));
/// ```
pub fn is_mandatory(text: &str) -> bool {
    PATTERNS.mandatory.iter().any(|p| p.is_match(text))
}

/// Leading clause to strip once a fragment's type is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedundantClause<'a> {
    /// The fragment resolved to a boolean.
    Boolean,
    /// The fragment resolved to the named shared definition.
    Ref(&'a str),
}

/// Strips the type-restating leading clause from a description.
///
/// Boolean fragments lose a leading "Takes a boolean argument."; ref
/// fragments lose the clause matching their definition name ("Takes a
/// path." for `filename`, and so on). Unknown ref names strip nothing.
pub fn strip_redundant_clause(text: &str, clause: RedundantClause<'_>) -> String {
    let stripped = match clause {
        RedundantClause::Boolean => PATTERNS.boolean_clause.replace(text, ""),
        RedundantClause::Ref(name) => {
            match PATTERNS.ref_clauses.iter().find(|(n, _)| *n == name) {
                Some((_, pattern)) => pattern.replace(text, ""),
                None => return clean_whitespace(text),
            }
        }
    };
    clean_whitespace(&stripped)
}

/// Type guessed purely from description wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionGuess {
    /// "Takes a boolean ..."
    Boolean,
    /// A shared definition name.
    Ref(&'static str),
}

/// Guesses a type from description wording ("Takes an IPv4 address", "in
/// seconds", ...). The boolean wording wins over ref wordings.
pub fn guess_type_from_description(text: &str) -> Option<DescriptionGuess> {
    if text.is_empty() {
        return None;
    }
    if PATTERNS.boolean_guess.is_match(text) {
        return Some(DescriptionGuess::Boolean);
    }
    PATTERNS
        .ref_guesses
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(name, _)| DescriptionGuess::Ref(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fold_ascii_table() {
        assert_eq!(fold_ascii("a\u{2013}b\u{2014}c"), "a-b--c");
        assert_eq!(fold_ascii("\u{2018}x\u{2019}"), "'x'");
        assert_eq!(fold_ascii("wait\u{2026}"), "wait...");
        assert_eq!(fold_ascii("non\u{00a0}breaking"), "non breaking");
        // Unmapped non-ASCII is dropped.
        assert_eq!(fold_ascii("caf\u{e9}"), "caf");
    }

    #[test]
    fn test_clean_whitespace() {
        assert_eq!(clean_whitespace("  a   b \n c ."), "a b c.");
        assert_eq!(clean_whitespace(""), "");
    }

    #[test]
    fn test_extract_enum_quoted() {
        let (values, rest) =
            extract_enum("Takes one of 'yes', 'no' or 'both'. Defaults to no.").unwrap();
        assert_eq!(values, vec!["both", "no", "yes"]);
        assert_eq!(rest, "Defaults to no.");
    }

    #[test]
    fn test_extract_enum_bare_identifiers() {
        let (values, _) = extract_enum("Takes one of ipv4, ipv6 or both.").unwrap();
        assert_eq!(values, vec!["both", "ipv4", "ipv6"]);
    }

    #[test]
    fn test_extract_enum_rejects_mixed_candidates() {
        // "a value" fails the identifier class, so nothing is extracted.
        assert!(extract_enum("Takes one of foo, a value or bar.").is_none());
    }

    #[test]
    fn test_extract_enum_deduplicates() {
        let (values, _) = extract_enum("Takes one of 'a', 'b', 'a'.").unwrap();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_extract_range_dotted() {
        let (min, max, rest) =
            extract_range("Takes an integer in the range 0...65535. Further prose.").unwrap();
        assert_eq!((min, max), (0, 65535));
        assert_eq!(rest, "Further prose.");
    }

    #[test]
    fn test_extract_range_between() {
        let (min, max, _) = extract_range("Must be a value between -10 and 10.").unwrap();
        assert_eq!((min, max), (-10, 10));
    }

    #[test]
    fn test_extract_range_sentence_initial() {
        let (min, max, rest) =
            extract_range("Configures the priority. Range 0..63. See above.").unwrap();
        assert_eq!((min, max), (0, 63));
        assert_eq!(rest, "Configures the priority. See above.");
    }

    #[test]
    fn test_extract_range_absent() {
        assert!(extract_range("Takes a free-form description.").is_none());
    }

    #[test]
    fn test_extract_default_boolean() {
        let (value, rest) =
            extract_default("Enables routing. Defaults to yes.", ScalarKind::Boolean).unwrap();
        assert_eq!(value, json!(true));
        assert_eq!(rest, "Enables routing.");

        let (value, _) = extract_default("Defaults to off.", ScalarKind::Boolean).unwrap();
        assert_eq!(value, json!(false));

        // A non-boolean literal for a boolean fragment is dropped.
        assert!(extract_default("Defaults to kernel.", ScalarKind::Boolean).is_none());
    }

    #[test]
    fn test_extract_default_integer_and_string() {
        let (value, rest) =
            extract_default("The default is 1500.", ScalarKind::Integer).unwrap();
        assert_eq!(value, json!(1500));
        assert_eq!(rest, "");

        let (value, _) = extract_default("Default: medium.", ScalarKind::Other).unwrap();
        assert_eq!(value, json!("medium"));
    }

    #[test]
    fn test_extract_default_rejects_non_literals() {
        assert!(extract_default("Defaults to unset.", ScalarKind::Other).is_none());
        assert!(extract_default("Defaults to none.", ScalarKind::Other).is_none());
        assert!(extract_default("No default here.", ScalarKind::Other).is_none());
    }

    #[test]
    fn test_is_mandatory_patterns() {
        assert!(is_mandatory("This option is required."));
        assert!(is_mandatory("The Kind= setting is required."));
        assert!(is_mandatory("These settings are compulsory."));
        assert!(!is_mandatory("May be specified more than once."));
    }

    #[test]
    fn test_strip_boolean_clause() {
        assert_eq!(
            strip_redundant_clause(
                "Takes a boolean argument. When true, enables the feature.",
                RedundantClause::Boolean
            ),
            "When true, enables the feature."
        );
    }

    #[test]
    fn test_strip_ref_clause() {
        assert_eq!(
            strip_redundant_clause("Takes a path. Must be absolute.", RedundantClause::Ref("filename")),
            "Must be absolute."
        );
        // Unknown ref names strip nothing.
        assert_eq!(
            strip_redundant_clause("Takes a path.", RedundantClause::Ref("ip_prefix")),
            "Takes a path."
        );
    }

    #[test]
    fn test_guess_type_from_description() {
        assert_eq!(
            guess_type_from_description("Takes a boolean argument."),
            Some(DescriptionGuess::Boolean)
        );
        assert_eq!(
            guess_type_from_description("Takes an IPv4 address."),
            Some(DescriptionGuess::Ref("ipv4_address"))
        );
        assert_eq!(
            guess_type_from_description("Maximum size in bytes."),
            Some(DescriptionGuess::Ref("bytes"))
        );
        assert_eq!(guess_type_from_description("Free-form text."), None);
    }
}
