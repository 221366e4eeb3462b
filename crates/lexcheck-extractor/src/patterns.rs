//! Citation pattern table
//!
//! Each pattern is a regular expression plus the jurisdiction it reports.
//! The default table covers federal codes, session laws, the Federal
//! Register, and the common state code designators.

use crate::ExtractorError;
use lexcheck_domain::Jurisdiction;
use regex::Regex;
use std::sync::LazyLock;

/// Section number: `1983`, `2000e-2`, `1604.11`, `120.05(a)(1)`
pub(crate) const SECTION: &str =
    r"[0-9]+[A-Za-z]*(?:[.\-][0-9]+[A-Za-z]*)*(?:\([A-Za-z0-9]{1,4}\))*";

/// Section symbol variants
pub(crate) const SECTION_SYMBOL: &str = r"(?:§§?|[Ss]ecs?\.|[Ss]ections?)";

/// State designators recognized by the default table
const STATE_PREFIXES: &str = r"(?:Cal|Tex|Fla|Ill|Pa|Ohio|Mich|Ga|Mass|Wash|Va|Colo|Ariz|Minn|Wis|N\.\s?Y|N\.\s?J|N\.\s?C)";

/// A regular expression labelled with the jurisdiction it matches
#[derive(Debug, Clone)]
pub struct CitationPattern {
    jurisdiction: Jurisdiction,
    regex: Regex,
}

impl CitationPattern {
    /// Compile a pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use lexcheck_extractor::CitationPattern;
    /// use lexcheck_domain::Jurisdiction;
    ///
    /// let pattern = CitationPattern::new(Jurisdiction::StateCode, r"Ore\. Rev\. Stat\. § \d+\.\d+").unwrap();
    /// assert_eq!(pattern.jurisdiction(), Jurisdiction::StateCode);
    /// ```
    pub fn new(jurisdiction: Jurisdiction, pattern: &str) -> Result<Self, ExtractorError> {
        let regex = Regex::new(pattern)
            .map_err(|e| ExtractorError::Config(format!("Invalid citation pattern: {}", e)))?;
        Ok(Self {
            jurisdiction,
            regex,
        })
    }

    /// Jurisdiction reported for matches of this pattern
    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    /// The compiled expression
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

static DEFAULT_PATTERNS: LazyLock<Vec<CitationPattern>> = LazyLock::new(|| {
    let table = [
        // 42 U.S.C. § 1983, 42 USC 1983, 42 U.S.C.A. §§ 2000e-2
        (
            Jurisdiction::UsCode,
            format!(
                r"\b\d{{1,3}}\s*U\.?\s?S\.?\s?C\.?(?:\s?A\.?)?\s*(?:{}\s*)?{}",
                SECTION_SYMBOL, SECTION
            ),
        ),
        // 29 C.F.R. § 1604.11, 40 CFR Part 60
        (
            Jurisdiction::Cfr,
            format!(
                r"\b\d{{1,3}}\s*C\.?\s?F\.?\s?R\.?\s*(?:{}\s*|[Pp]arts?\s+)?\d+(?:\.\d+[A-Za-z]*)?(?:\([A-Za-z0-9]{{1,4}}\))*",
                SECTION_SYMBOL
            ),
        ),
        // Pub. L. No. 88-352, Public Law 111-148
        (
            Jurisdiction::PublicLaw,
            r"(?i)\bPub(?:lic)?\.?\s*L(?:aw)?\.?\s*(?:No\.?\s*)?\d{1,3}\s*[-–]\s*\d{1,4}\b".to_string(),
        ),
        // 78 Stat. 241
        (
            Jurisdiction::StatutesAtLarge,
            r"\b\d{1,4}\s+Stat\.?\s+\d{1,5}\b".to_string(),
        ),
        // 85 Fed. Reg. 12345
        (
            Jurisdiction::FederalRegister,
            r"\b\d{1,3}\s+Fed\.?\s*Reg\.?\s+\d{1,6}\b".to_string(),
        ),
        // Cal. Civ. Code § 1714, N.Y. Penal Law § 120.05, Tex. Fam. Code Ann. § 6.001
        (
            Jurisdiction::StateCode,
            format!(
                r"\b{}\.?(?:\s+[A-Z][A-Za-z]*\.?){{0,3}}?\s+(?:Code|Law|Laws|Stat|Stats)\.?(?:\s+Ann\.?)?\s*{}\s*{}",
                STATE_PREFIXES, SECTION_SYMBOL, SECTION
            ),
        ),
    ];

    table
        .into_iter()
        .map(|(jurisdiction, pattern)| {
            CitationPattern::new(jurisdiction, &pattern).expect("built-in citation pattern should compile")
        })
        .collect()
});

/// The default pattern table, in priority order
pub fn default_patterns() -> Vec<CitationPattern> {
    DEFAULT_PATTERNS.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(jurisdiction: Jurisdiction, text: &str) -> Option<String> {
        default_patterns()
            .into_iter()
            .find(|p| p.jurisdiction() == jurisdiction)
            .and_then(|p| p.regex().find(text).map(|m| m.as_str().to_string()))
    }

    #[test]
    fn test_default_table_order() {
        let jurisdictions: Vec<_> = default_patterns().iter().map(|p| p.jurisdiction()).collect();
        assert_eq!(jurisdictions, Jurisdiction::ALL.to_vec());
    }

    #[test]
    fn test_us_code_variants() {
        for (text, expected) in [
            ("see 42 U.S.C. § 1983.", "42 U.S.C. § 1983"),
            ("under 42 USC 1983 and", "42 USC 1983"),
            ("42 U.S.C.A. §§ 2000e-2(a)(1)", "42 U.S.C.A. §§ 2000e-2(a)(1)"),
            ("42 U.S.C. §2000e-2", "42 U.S.C. §2000e-2"),
            ("15 U.S.C. Sec. 78j", "15 U.S.C. Sec. 78j"),
        ] {
            assert_eq!(find(Jurisdiction::UsCode, text).as_deref(), Some(expected), "{}", text);
        }
    }

    #[test]
    fn test_cfr_variants() {
        assert_eq!(
            find(Jurisdiction::Cfr, "29 C.F.R. § 1604.11(a)").as_deref(),
            Some("29 C.F.R. § 1604.11(a)")
        );
        assert_eq!(
            find(Jurisdiction::Cfr, "40 CFR Part 60").as_deref(),
            Some("40 CFR Part 60")
        );
    }

    #[test]
    fn test_session_law_and_register() {
        assert_eq!(
            find(Jurisdiction::PublicLaw, "Pub. L. No. 88-352,").as_deref(),
            Some("Pub. L. No. 88-352")
        );
        assert_eq!(
            find(Jurisdiction::PublicLaw, "Public Law 111-148").as_deref(),
            Some("Public Law 111-148")
        );
        assert_eq!(
            find(Jurisdiction::StatutesAtLarge, "78 Stat. 241").as_deref(),
            Some("78 Stat. 241")
        );
        assert_eq!(
            find(Jurisdiction::FederalRegister, "85 Fed. Reg. 12345").as_deref(),
            Some("85 Fed. Reg. 12345")
        );
    }

    #[test]
    fn test_state_codes() {
        for text in [
            "Cal. Civ. Code § 1714",
            "N.Y. Penal Law § 120.05",
            "Tex. Fam. Code Ann. § 6.001",
            "Fla. Stat. § 768.81",
        ] {
            assert_eq!(find(Jurisdiction::StateCode, text).as_deref(), Some(text));
        }
        assert_eq!(find(Jurisdiction::StateCode, "California law says"), None);
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(CitationPattern::new(Jurisdiction::UsCode, r"(unclosed").is_err());
    }
}
