// src/collector/links.rs
// =============================================================================
// This module pulls references out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// A page is scanned with three selector passes:
//   a[href]     - hyperlinks
//   [src]       - media and scripts (any element with a src attribute)
//   link[href]  - stylesheets, icons and other imports
//
// Attribute values are taken exactly as written in the page. They are not
// resolved against the page URL, so "/docs" stays "/docs".
//
// Rust concepts:
// - OnceLock: compile the selectors once and share them for the whole run
// - HashSet: the union of the passes, so identical strings count once
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;

use super::classify::collect_external;

/// The attribute a selector pass reads its reference from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Href,
    Src,
}

impl ReferenceKind {
    pub fn attribute(self) -> &'static str {
        match self {
            ReferenceKind::Href => "href",
            ReferenceKind::Src => "src",
        }
    }
}

/// One (selector, attribute) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorPass {
    pub selector: &'static str,
    pub kind: ReferenceKind,
}

/// Every pass run against a page, in the order they are applied
pub const SELECTOR_PASSES: [SelectorPass; 3] = [
    SelectorPass { selector: "a[href]", kind: ReferenceKind::Href },
    SelectorPass { selector: "[src]", kind: ReferenceKind::Src },
    SelectorPass { selector: "link[href]", kind: ReferenceKind::Href },
];

// Compiled form of SELECTOR_PASSES, built on first use
fn compiled_selectors() -> &'static [(SelectorPass, Selector)] {
    static COMPILED: OnceLock<Vec<(SelectorPass, Selector)>> = OnceLock::new();

    COMPILED.get_or_init(|| {
        SELECTOR_PASSES
            .iter()
            .map(|pass| {
                // The selectors are constants, so a parse failure is a bug in
                // this file rather than bad input.
                let selector = Selector::parse(pass.selector)
                    .unwrap_or_else(|e| panic!("invalid selector {:?}: {:?}", pass.selector, e));
                (*pass, selector)
            })
            .collect()
    })
}

/// Raw attribute values for every element matched by `selector`, in
/// document order. Duplicates are kept.
pub fn extract_references<'a>(
    document: &'a Html,
    selector: &'a Selector,
    kind: ReferenceKind,
) -> Vec<&'a str> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr(kind.attribute()))
        .collect()
}

/// Distinct external references of a page, across all selector passes.
///
/// Parameters:
///   html: the page source
///   base_uri: the URL exactly as given on the command line
pub fn external_references(html: &str, base_uri: &str) -> HashSet<String> {
    let document = Html::parse_document(html);
    let mut external = HashSet::new();

    for (pass, selector) in compiled_selectors() {
        let references = extract_references(&document, selector, pass.kind);
        let found = collect_external(base_uri, references);

        tracing::debug!(
            selector = pass.selector,
            external = found.len(),
            "selector pass finished"
        );

        external.extend(found);
    }

    external
}
