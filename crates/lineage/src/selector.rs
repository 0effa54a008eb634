//! Selector language for focusing the lineage graph.
//!
//! A selector is a comma-separated list of terms. Each term names an object
//! and optionally expands to its ancestors (prefix) and descendants (suffix):
//!
//! ```text
//! term             := ancestorPrefix? nodeName descendantSuffix?
//! ancestorPrefix   := digits? '+'
//! descendantSuffix := '+' digits?
//! nodeName         := one or more characters except '+' and ','
//! ```
//!
//! | Selector      | Ancestors | Descendants |
//! |---------------|-----------|-------------|
//! | `orders`      | 0         | 0           |
//! | `2+orders`    | 2         | 0           |
//! | `orders+`     | 0         | all         |
//! | `+orders+3`   | all       | 3           |
//!
//! An empty selector selects the whole graph. Parsing never fails: malformed
//! terms are dropped and names that match no object select nothing, so the
//! selector stays usable while the user is still typing.

use crate::graph::{Graph, NodeId};
use crate::traversal::{ancestors_of, descendants_of};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// How many generations to expand in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generations {
    /// At most this many hops; `Bounded(0)` means no expansion
    Bounded(usize),

    /// Expand until nothing new is reached
    Unbounded,
}

impl Generations {
    /// No expansion.
    pub const NONE: Self = Self::Bounded(0);

    /// Whether nodes at `depth` may be expanded one hop further.
    #[must_use]
    pub fn allows_expansion_from(self, depth: usize) -> bool {
        match self {
            Self::Bounded(limit) => depth < limit,
            Self::Unbounded => true,
        }
    }

    /// Parse the digits of a prefix or suffix; empty means unbounded.
    fn from_digits(digits: &str) -> Self {
        if digits.is_empty() {
            return Self::Unbounded;
        }
        // Anything too large for usize expands everything anyway
        digits.parse().map_or(Self::Unbounded, Self::Bounded)
    }
}

impl Default for Generations {
    fn default() -> Self {
        Self::NONE
    }
}

/// One parsed selector term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorTerm {
    /// Object name the term starts from
    pub node_name: String,

    /// Upstream expansion
    pub ancestor_generations: Generations,

    /// Downstream expansion
    pub descendant_generations: Generations,
}

impl SelectorTerm {
    /// A term selecting only `node_name`.
    pub fn new(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            ancestor_generations: Generations::NONE,
            descendant_generations: Generations::NONE,
        }
    }

    /// Set the upstream expansion.
    #[must_use]
    pub fn with_ancestors(mut self, generations: Generations) -> Self {
        self.ancestor_generations = generations;
        self
    }

    /// Set the downstream expansion.
    #[must_use]
    pub fn with_descendants(mut self, generations: Generations) -> Self {
        self.descendant_generations = generations;
        self
    }

    /// Node ids this term selects in `graph`.
    ///
    /// Empty when the name matches no node.
    #[must_use]
    pub fn select(&self, graph: &Graph) -> HashSet<NodeId> {
        let Some(start) = graph.node_id_for_name(&self.node_name) else {
            trace!(name = %self.node_name, "Selector term matches no object");
            return HashSet::new();
        };

        let mut selected = ancestors_of(graph, start, self.ancestor_generations);
        selected.extend(descendants_of(graph, start, self.descendant_generations));
        selected
    }
}

impl fmt::Display for SelectorTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ancestor_generations {
            Generations::Bounded(0) => {}
            Generations::Bounded(n) => write!(f, "{n}+")?,
            Generations::Unbounded => f.write_str("+")?,
        }
        f.write_str(&self.node_name)?;
        match self.descendant_generations {
            Generations::Bounded(0) => Ok(()),
            Generations::Bounded(n) => write!(f, "+{n}"),
            Generations::Unbounded => f.write_str("+"),
        }
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Empty input: every node
    All,

    /// Union of the nodes each term selects
    Terms(Vec<SelectorTerm>),
}

impl Selector {
    /// Whether this selector selects every node.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Node ids selected in `graph`.
    #[must_use]
    pub fn select(&self, graph: &Graph) -> HashSet<NodeId> {
        match self {
            Self::All => graph.node_ids().map(str::to_owned).collect(),
            Self::Terms(terms) => {
                let mut selected = HashSet::new();
                for term in terms {
                    selected.extend(term.select(graph));
                }
                selected
            }
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse(s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => Ok(()),
            Self::Terms(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{term}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parse a selector string.
///
/// Whitespace-only input is [`Selector::All`].
#[must_use]
pub fn parse(selector: &str) -> Selector {
    if selector.trim().is_empty() {
        return Selector::All;
    }
    Selector::Terms(parse_terms(selector))
}

/// Parse the comma-separated terms of a selector, dropping malformed ones.
#[must_use]
pub fn parse_terms(selector: &str) -> Vec<SelectorTerm> {
    selector.split(',').filter_map(parse_term).collect()
}

/// Parse a single term.
///
/// Returns `None` for blank terms and terms whose name would be empty or
/// contain `+`.
#[must_use]
pub fn parse_term(text: &str) -> Option<SelectorTerm> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (ancestor_generations, rest) = split_prefix(text);
    let (name, descendant_generations) = split_suffix(rest);
    let name = name.trim();

    if name.is_empty() || name.contains('+') {
        trace!(term = text, "Dropping malformed selector term");
        return None;
    }

    Some(SelectorTerm {
        node_name: name.to_string(),
        ancestor_generations,
        descendant_generations,
    })
}

/// Strip `digits? '+'` from the front.
///
/// The prefix only counts when a non-empty name remains, so `12+` reads as
/// node `12` with a descendant suffix.
fn split_prefix(text: &str) -> (Generations, &str) {
    if let Some(plus) = text.find('+') {
        let digits = &text[..plus];
        let rest = &text[plus + 1..];
        if is_digits(digits) && !split_suffix(rest).0.trim().is_empty() {
            return (Generations::from_digits(digits), rest);
        }
    }
    (Generations::NONE, text)
}

/// Strip `'+' digits?` from the back.
fn split_suffix(text: &str) -> (&str, Generations) {
    if let Some(plus) = text.rfind('+') {
        let digits = &text[plus + 1..];
        if is_digits(digits) {
            return (&text[..plus], Generations::from_digits(digits));
        }
    }
    (text, Generations::NONE)
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use super::Generations::{Bounded, Unbounded};

    #[rstest]
    #[case::bare("orders", "orders", Bounded(0), Bounded(0))]
    #[case::bounded_ancestors("2+orders", "orders", Bounded(2), Bounded(0))]
    #[case::unbounded_descendants("orders+", "orders", Bounded(0), Unbounded)]
    #[case::both("+orders+3", "orders", Unbounded, Bounded(3))]
    #[case::unbounded_both("+orders+", "orders", Unbounded, Unbounded)]
    #[case::bounded_both("1+orders+1", "orders", Bounded(1), Bounded(1))]
    #[case::padded("  3+orders  ", "orders", Bounded(3), Bounded(0))]
    #[case::numeric_name("2022", "2022", Bounded(0), Bounded(0))]
    #[case::numeric_name_with_suffix("12+", "12", Bounded(0), Unbounded)]
    #[case::numeric_name_with_prefix("+12", "12", Unbounded, Bounded(0))]
    #[case::explicit_zero("0+orders+0", "orders", Bounded(0), Bounded(0))]
    #[case::name_with_spaces("+daily orders", "daily orders", Unbounded, Bounded(0))]
    #[case::huge_depth("99999999999999999999999+orders", "orders", Unbounded, Bounded(0))]
    fn parses_term(
        #[case] input: &str,
        #[case] name: &str,
        #[case] ancestors: Generations,
        #[case] descendants: Generations,
    ) {
        let term = parse_term(input).expect("term should parse");

        assert_eq!(term.node_name, name);
        assert_eq!(term.ancestor_generations, ancestors);
        assert_eq!(term.descendant_generations, descendants);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    #[case::lone_plus("+")]
    #[case::double_plus("++")]
    #[case::inner_plus("a+b")]
    #[case::plus_runs("+++orders")]
    fn rejects_malformed_term(#[case] input: &str) {
        assert_eq!(parse_term(input), None);
    }

    #[test]
    fn digits_then_plus_alone_reads_as_name() {
        // "3+" is node "3" with unbounded descendants, not an empty name
        assert_eq!(
            parse_term("3+"),
            Some(SelectorTerm::new("3").with_descendants(Unbounded))
        );
    }

    #[test]
    fn empty_selector_selects_all() {
        assert_eq!(parse(""), Selector::All);
        assert_eq!(parse(" \t "), Selector::All);
        assert!(parse("").is_all());
    }

    #[test]
    fn splits_terms_on_commas() {
        let selector = parse("a, +b+");

        assert_eq!(
            selector,
            Selector::Terms(vec![
                SelectorTerm::new("a"),
                SelectorTerm::new("b")
                    .with_ancestors(Unbounded)
                    .with_descendants(Unbounded),
            ])
        );
    }

    #[test]
    fn blank_and_malformed_terms_are_dropped() {
        let terms = parse_terms("a,, ,b+c, d");

        let names: Vec<_> = terms.iter().map(|t| t.node_name.as_str()).collect();
        assert_eq!(names, vec!["a", "d"]);
    }

    #[test]
    fn only_commas_is_not_all() {
        assert_eq!(parse(",,"), Selector::Terms(Vec::new()));
    }

    #[test]
    fn display_is_canonical() {
        let selector = parse(" 2+orders+ ,customers,  +revenue+1");

        assert_eq!(selector.to_string(), "2+orders+, customers, +revenue+1");
        assert_eq!(parse(&selector.to_string()), selector);
    }

    #[test]
    fn from_str_matches_parse() {
        let parsed: Selector = "+m1".parse().unwrap();

        assert_eq!(parsed, parse("+m1"));
    }

    #[test]
    fn expansion_limits() {
        assert!(!Bounded(0).allows_expansion_from(0));
        assert!(Bounded(2).allows_expansion_from(1));
        assert!(!Bounded(2).allows_expansion_from(2));
        assert!(Unbounded.allows_expansion_from(usize::MAX));
        assert_eq!(Generations::default(), Generations::NONE);
    }
}
