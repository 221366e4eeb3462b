//! Citation module - raw matches and canonical references

use std::fmt;

/// Jurisdiction label attached to a citation pattern
///
/// Determines which grammar the normalizer applies and which endpoint the
/// verification source consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Jurisdiction {
    /// United States Code (`42 U.S.C. § 1983`)
    UsCode,

    /// Code of Federal Regulations (`29 C.F.R. § 1604.11`)
    Cfr,

    /// Public laws (`Pub. L. No. 88-352`)
    PublicLaw,

    /// United States Statutes at Large (`78 Stat. 241`)
    StatutesAtLarge,

    /// Federal Register (`85 Fed. Reg. 12345`)
    FederalRegister,

    /// State codes (`Cal. Civ. Code § 1714`)
    StateCode,
}

impl Jurisdiction {
    /// All jurisdictions, in default pattern-table order
    pub const ALL: [Jurisdiction; 6] = [
        Jurisdiction::UsCode,
        Jurisdiction::Cfr,
        Jurisdiction::PublicLaw,
        Jurisdiction::StatutesAtLarge,
        Jurisdiction::FederalRegister,
        Jurisdiction::StateCode,
    ];

    /// Get the jurisdiction label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::UsCode => "us_code",
            Jurisdiction::Cfr => "cfr",
            Jurisdiction::PublicLaw => "public_law",
            Jurisdiction::StatutesAtLarge => "statutes_at_large",
            Jurisdiction::FederalRegister => "federal_register",
            Jurisdiction::StateCode => "state_code",
        }
    }

    /// Parse a jurisdiction label (storage layer deserialization)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "us_code" => Some(Jurisdiction::UsCode),
            "cfr" => Some(Jurisdiction::Cfr),
            "public_law" => Some(Jurisdiction::PublicLaw),
            "statutes_at_large" => Some(Jurisdiction::StatutesAtLarge),
            "federal_register" => Some(Jurisdiction::FederalRegister),
            "state_code" => Some(Jurisdiction::StateCode),
            _ => None,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citation substring found in document text
///
/// Produced and consumed within a single extraction pass; borrows the
/// document text it was found in and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCitationMatch<'t> {
    /// Byte offset of the first matched byte
    pub start: usize,

    /// Byte offset one past the last matched byte
    pub end: usize,

    /// The matched substring (`&text[start..end]`)
    pub text: &'t str,

    /// Jurisdiction of the pattern that matched
    pub jurisdiction: Jurisdiction,

    /// Index of the matching pattern in the matcher's table
    pub pattern_index: usize,
}

impl RawCitationMatch<'_> {
    /// Length of the matched span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &RawCitationMatch<'_>) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Normalized citation key, independent of formatting variants
///
/// `"42 U.S.C. §2000e-2"` and `"42 U.S.C.  § 2000e-2"` both normalize to
/// `"42 U.S.C. § 2000e-2"`. Instances are produced by the normalizer in
/// `lexcheck-extractor`; this type only carries the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalReference {
    key: String,
    jurisdiction: Jurisdiction,
}

impl CanonicalReference {
    /// Wrap an already-canonical key
    ///
    /// This is primarily for the normalizer and for storage layer
    /// deserialization; it performs no normalization itself.
    pub fn from_canonical(key: impl Into<String>, jurisdiction: Jurisdiction) -> Self {
        Self {
            key: key.into(),
            jurisdiction,
        }
    }

    /// The canonical key string
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Jurisdiction of the citation
    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    /// Split a `{title} <designator> § {section}` key into title and section
    ///
    /// Only U.S. Code and C.F.R. keys have this shape. Subsection
    /// qualifiers such as `(a)(1)` are dropped from the section.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcheck_domain::{CanonicalReference, Jurisdiction};
    ///
    /// let r = CanonicalReference::from_canonical("42 U.S.C. § 2000e-2(a)", Jurisdiction::UsCode);
    /// assert_eq!(r.title_and_section(), Some(("42", "2000e-2")));
    /// ```
    pub fn title_and_section(&self) -> Option<(&str, &str)> {
        if !matches!(self.jurisdiction, Jurisdiction::UsCode | Jurisdiction::Cfr) {
            return None;
        }
        let (title, _) = self.key.split_once(' ')?;
        let (_, section) = self.key.rsplit_once("§ ")?;
        let section = section.split('(').next().unwrap_or(section).trim();
        if title.is_empty() || section.is_empty() {
            return None;
        }
        Some((title, section))
    }
}

impl fmt::Display for CanonicalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jurisdiction_labels() {
        for jurisdiction in Jurisdiction::ALL {
            assert_eq!(Jurisdiction::parse(jurisdiction.as_str()), Some(jurisdiction));
        }
        assert_eq!(Jurisdiction::parse("US_CODE"), Some(Jurisdiction::UsCode));
        assert_eq!(Jurisdiction::parse("case_law"), None);
    }

    #[test]
    fn test_match_overlap() {
        let a = RawCitationMatch {
            start: 0,
            end: 10,
            text: "0123456789",
            jurisdiction: Jurisdiction::UsCode,
            pattern_index: 0,
        };
        let b = RawCitationMatch { start: 9, end: 12, ..a };
        let c = RawCitationMatch { start: 10, end: 12, ..a };

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c), "Adjacent spans do not overlap");
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_title_and_section_cfr() {
        let r = CanonicalReference::from_canonical("29 C.F.R. § 1604.11", Jurisdiction::Cfr);
        assert_eq!(r.title_and_section(), Some(("29", "1604.11")));
    }

    #[test]
    fn test_title_and_section_not_applicable() {
        let r = CanonicalReference::from_canonical("78 Stat. 241", Jurisdiction::StatutesAtLarge);
        assert_eq!(r.title_and_section(), None);
    }
}
