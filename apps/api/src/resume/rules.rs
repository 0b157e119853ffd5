//! Ordered pattern rules. Each field that has several alternative layouts
//! declares its alternatives as a slice of named rules; the first rule that
//! produces a value wins.

/// A single named matching rule over a piece of text.
#[derive(Clone, Copy)]
pub struct PatternRule<T> {
    pub name: &'static str,
    pub apply: fn(&str) -> Option<T>,
}

impl<T> PatternRule<T> {
    pub const fn new(name: &'static str, apply: fn(&str) -> Option<T>) -> Self {
        Self { name, apply }
    }
}

/// Runs `rules` in priority order and returns the first match together with
/// the name of the rule that produced it.
pub fn first_matching_rule<T>(rules: &[PatternRule<T>], input: &str) -> Option<(&'static str, T)> {
    rules
        .iter()
        .find_map(|rule| (rule.apply)(input).map(|value| (rule.name, value)))
}

/// Same as [`first_matching_rule`] without the rule name.
pub fn first_match<T>(rules: &[PatternRule<T>], input: &str) -> Option<T> {
    first_matching_rule(rules, input).map(|(_, value)| value)
}
