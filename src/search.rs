//! Relevance-ranked tag search by name.
//!
//! Scores (lower is better), all case-insensitive:
//!
//! ```text
//! exact match                  0
//! prefix match                 1
//! substring at char index i    10 + i
//! in-order subsequence         100 + sum of matched char indexes
//! anything else                excluded
//! ```
//!
//! Ties are broken by lowercase name. A leading `^` (or [`SearchMode::Prefix`])
//! skips scoring and keeps only names starting with the rest of the term.

use crate::tag::Tag;

/// Leading marker that switches a search term to prefix mode.
pub const PREFIX_MARKER: char = '^';

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Score and rank every tag.
    #[default]
    Relevance,
    /// Keep tags whose name starts with the term, in input order.
    Prefix,
}

/// Relevance of `name` for `term`, or `None` if it does not match at all.
pub fn relevance(term: &str, name: &str) -> Option<usize> {
    let term: Vec<char> = term.chars().flat_map(char::to_lowercase).collect();
    score(&term, name)
}

/// Lowercase `name` char by char, remembering which original char each
/// lowercase char came from. Keeps positions stable for chars whose
/// lowercase form is longer (`İ` becomes two chars).
fn fold(name: &str) -> Vec<(char, usize)> {
    name.chars()
        .enumerate()
        .flat_map(|(index, c)| c.to_lowercase().map(move |lower| (lower, index)))
        .collect()
}

/// `term` must already be lowercased.
fn score(term: &[char], name: &str) -> Option<usize> {
    let folded = fold(name);
    let matches_at = |start: usize| {
        folded.len() - start >= term.len()
            && folded[start..start + term.len()]
                .iter()
                .zip(term)
                .all(|(&(c, _), &t)| c == t)
    };

    if folded.len() == term.len() && matches_at(0) {
        return Some(0);
    }
    if matches_at(0) {
        return Some(1);
    }
    if let Some(start) = (1..folded.len()).find(|&start| matches_at(start)) {
        return Some(10 + folded[start].1);
    }
    subsequence_cost(term, &folded).map(|cost| 100 + cost)
}

/// Sum of the original positions in `name` where the chars of `term` were
/// found, in order. `None` unless every char of `term` was consumed.
fn subsequence_cost(term: &[char], folded: &[(char, usize)]) -> Option<usize> {
    let mut pending = term.iter().peekable();
    let mut cost = 0;
    for &(c, index) in folded {
        match pending.peek() {
            Some(&&wanted) if wanted == c => {
                cost += index;
                pending.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    pending.peek().is_none().then_some(cost)
}

/// Search `tags` by name.
///
/// A blank term returns the input unchanged.
pub fn search_tags<'a, I>(term: &str, tags: I, mode: SearchMode) -> Vec<&'a Tag>
where
    I: IntoIterator<Item = &'a Tag>,
{
    let term = term.trim();
    if term.is_empty() {
        return tags.into_iter().collect();
    }
    if let Some(rest) = term.strip_prefix(PREFIX_MARKER) {
        return starting_with(rest.trim_start(), tags);
    }
    match mode {
        SearchMode::Relevance => ranked(term, tags),
        SearchMode::Prefix => starting_with(term, tags),
    }
}

/// Like [`search_tags`] in relevance mode, but a blank term sorts the tags
/// alphabetically (case-insensitive) instead of passing them through.
pub fn ordered_tags<'a, I>(term: &str, tags: I) -> Vec<&'a Tag>
where
    I: IntoIterator<Item = &'a Tag>,
{
    if !term.trim().is_empty() {
        return search_tags(term, tags, SearchMode::Relevance);
    }
    let mut keyed: Vec<(String, &'a Tag)> = tags
        .into_iter()
        .map(|tag| (tag.name().to_lowercase(), tag))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    keyed.into_iter().map(|(_, tag)| tag).collect()
}

fn starting_with<'a, I>(prefix: &str, tags: I) -> Vec<&'a Tag>
where
    I: IntoIterator<Item = &'a Tag>,
{
    let prefix = prefix.to_lowercase();
    tags.into_iter()
        .filter(|tag| tag.name().to_lowercase().starts_with(&prefix))
        .collect()
}

fn ranked<'a, I>(term: &str, tags: I) -> Vec<&'a Tag>
where
    I: IntoIterator<Item = &'a Tag>,
{
    let term: Vec<char> = term.chars().flat_map(char::to_lowercase).collect();
    let mut scored: Vec<(usize, String, &'a Tag)> = tags
        .into_iter()
        .filter_map(|tag| {
            score(&term, tag.name()).map(|s| (s, tag.name().to_lowercase(), tag))
        })
        .collect();
    scored.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(b.2))
    });
    scored.into_iter().map(|(_, _, tag)| tag).collect()
}
