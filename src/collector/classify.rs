// src/collector/classify.rs
// =============================================================================
// Decides whether a single reference points outside its page.
//
// The rule is purely textual. Neither side is parsed, resolved or decoded:
// a reference is internal when it starts with the page URL exactly as it was
// typed on the command line, or with one of the relative-path prefixes.
// Everything else is external, including "mailto:"/"tel:" links and empty
// values. Protocol-relative URLs ("//cdn.example.com/x") start with "/" and
// are therefore internal.
// =============================================================================

use std::collections::HashSet;

// Prefixes that mark a reference as relative to the current page
const RELATIVE_PREFIXES: [&str; 4] = ["/", "./", "../", "#"];

/// Returns true when `value` does not point into `base_uri`.
///
/// Comparison is case-sensitive. An empty `base_uri` is a prefix of every
/// string, so it makes every value internal.
pub fn is_external(value: &str, base_uri: &str) -> bool {
    let internal = value.starts_with(base_uri)
        || RELATIVE_PREFIXES
            .iter()
            .any(|prefix| value.starts_with(prefix));

    !internal
}

/// Keeps the external references, deduplicated by exact string equality.
pub fn collect_external<'a, I>(base_uri: &str, references: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    references
        .into_iter()
        .filter(|value| is_external(value, base_uri))
        .map(str::to_string)
        .collect()
}
