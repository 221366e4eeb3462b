//! Citation pattern matcher
//!
//! Scans document text with every pattern of the table and merges the
//! results in text order. Overlapping spans form a cluster; only the longest
//! span of each cluster is emitted (ties go to the earliest start, then to
//! table order).

use crate::patterns::{default_patterns, CitationPattern};
use crate::ExtractorError;
use lexcheck_domain::RawCitationMatch;
use std::iter::Peekable;

/// Spans shorter than this many characters are never emitted
pub const MIN_CITATION_LEN: usize = 6;

/// Finds citation substrings in text
///
/// # Examples
///
/// ```
/// use lexcheck_extractor::CitationMatcher;
/// use lexcheck_domain::Jurisdiction;
///
/// let matcher = CitationMatcher::new();
/// let text = "Claims under 42 U.S.C. § 1983 and 29 C.F.R. § 1604.11 survive.";
///
/// let found: Vec<_> = matcher.matches(text).map(|m| (m.text, m.jurisdiction)).collect();
/// assert_eq!(
///     found,
///     vec![
///         ("42 U.S.C. § 1983", Jurisdiction::UsCode),
///         ("29 C.F.R. § 1604.11", Jurisdiction::Cfr),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CitationMatcher {
    patterns: Vec<CitationPattern>,
}

impl CitationMatcher {
    /// Create a matcher with the default pattern table
    pub fn new() -> Self {
        Self::with_patterns(default_patterns())
    }

    /// Create a matcher with a custom pattern table
    ///
    /// Table order breaks ties between equally long overlapping matches.
    pub fn with_patterns(patterns: Vec<CitationPattern>) -> Self {
        Self { patterns }
    }

    /// The pattern table
    pub fn patterns(&self) -> &[CitationPattern] {
        &self.patterns
    }

    /// Lazily scan `text` for citations
    ///
    /// Each call starts a fresh scan.
    pub fn matches<'m, 't>(&'m self, text: &'t str) -> CitationMatches<'m, 't> {
        CitationMatches {
            patterns: &self.patterns,
            streams: self
                .patterns
                .iter()
                .map(|p| p.regex().find_iter(text).peekable())
                .collect(),
            pending: None,
        }
    }
}

impl Default for CitationMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the citations of one text, in text order
pub struct CitationMatches<'m, 't> {
    patterns: &'m [CitationPattern],
    streams: Vec<Peekable<regex::Matches<'m, 't>>>,
    pending: Option<RawCitationMatch<'t>>,
}

impl<'t> CitationMatches<'_, 't> {
    /// Next span of any pattern by start offset, short spans skipped
    fn next_candidate(&mut self) -> Option<RawCitationMatch<'t>> {
        loop {
            let mut earliest: Option<(usize, usize)> = None;
            for (index, stream) in self.streams.iter_mut().enumerate() {
                if let Some(m) = stream.peek() {
                    if earliest.is_none_or(|(start, _)| m.start() < start) {
                        earliest = Some((m.start(), index));
                    }
                }
            }

            let (_, index) = earliest?;
            let m = self.streams[index].next()?;
            if m.as_str().chars().count() < MIN_CITATION_LEN {
                continue;
            }

            return Some(RawCitationMatch {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
                jurisdiction: self.patterns[index].jurisdiction(),
                pattern_index: index,
            });
        }
    }
}

impl<'t> Iterator for CitationMatches<'_, 't> {
    type Item = RawCitationMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut best = match self.pending.take() {
            Some(m) => m,
            None => self.next_candidate()?,
        };
        let mut cluster_end = best.end;

        while let Some(candidate) = self.next_candidate() {
            if candidate.start >= cluster_end {
                self.pending = Some(candidate);
                break;
            }
            cluster_end = cluster_end.max(candidate.end);
            if candidate.len() > best.len() {
                best = candidate;
            }
        }

        Some(best)
    }
}

/// Decode document bytes as text
///
/// Fails on invalid UTF-8 and on NUL bytes, which never occur in extracted
/// plain text.
pub fn decode_text(bytes: &[u8]) -> Result<&str, ExtractorError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ExtractorError::InputDecoding(format!("invalid UTF-8 at byte {}", e.valid_up_to()))
    })?;

    if let Some(offset) = text.find('\0') {
        return Err(ExtractorError::InputDecoding(format!(
            "NUL byte at offset {}",
            offset
        )));
    }

    Ok(text)
}

/// Surrounding text of a span with the span emphasised
///
/// Keeps up to `context_chars` characters on each side, cut on character
/// boundaries, formatted as `before **citation** after`.
pub fn excerpt(text: &str, start: usize, end: usize, context_chars: usize) -> String {
    let before_start = if context_chars == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(context_chars - 1)
            .map(|(i, _)| i)
            .unwrap_or(0)
    };
    let after_end = text[end..]
        .char_indices()
        .nth(context_chars)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    let before = text[before_start..start].trim();
    let citation = text[start..end].trim();
    let after = text[end..after_end].trim();

    format!("{} **{}** {}", before, citation, after)
        .trim()
        .to_string()
}
