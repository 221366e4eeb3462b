//! Citation normalization
//!
//! Turns a raw citation substring into its canonical key. The rules:
//!
//! 1. collapse whitespace runs to one space
//! 2. unify section-symbol variants (`§§`, `Sec.`, `Secs.`, `Section(s)`) to `§ `
//! 3. strip trailing punctuation
//! 4. parse the jurisdiction's grammar and rebuild the key in its canonical
//!    spelling
//!
//! The canonical spelling parses under the same grammar, so normalizing a
//! key again returns it unchanged.

use crate::error::NormalizationError;
use crate::patterns::SECTION;
use lexcheck_domain::{CanonicalReference, Jurisdiction};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static SYMBOL_VARIANTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:§§?|\bsecs?\.|\bsections?\b)\s*")
        .expect("section symbol pattern should compile")
});

static US_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?i:([0-9]+)\s*U\.?\s?S\.?\s?C\.?(?:\s?A\.?)?)\s*(?:§\s*)?({})$",
        SECTION
    ))
    .expect("U.S. Code grammar should compile")
});

static CFR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?i:([0-9]+)\s*C\.?\s?F\.?\s?R\.?)\s*(?:§\s*|(?i:parts?)\s+)?([0-9]+(?:\.[0-9]+[A-Za-z]*)?(?:\([A-Za-z0-9]{1,4}\))*)$",
    )
    .expect("C.F.R. grammar should compile")
});

static PUBLIC_LAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)Pub(?:lic)?\.?\s*L(?:aw)?\.?\s*(?:No\.?\s*)?([0-9]+)\s*[-–]\s*([0-9]+)$")
        .expect("public law grammar should compile")
});

static STATUTES_AT_LARGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s*(?i:stat)\.?\s*([0-9]+)$").expect("Statutes at Large grammar should compile")
});

static FEDERAL_REGISTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s*(?i:fed)\.?\s*(?i:reg)\.?\s*([0-9]+)$")
        .expect("Federal Register grammar should compile")
});

static STATE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^([^§]+?)\s*§\s*({})$", SECTION))
        .expect("state code grammar should compile")
});

/// Normalize a raw citation under its jurisdiction's grammar
///
/// # Examples
///
/// ```
/// use lexcheck_extractor::normalize;
/// use lexcheck_domain::Jurisdiction;
///
/// let a = normalize("42 U.S.C. §2000e-2", Jurisdiction::UsCode).unwrap();
/// let b = normalize("42  usc  Section 2000e-2.", Jurisdiction::UsCode).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "42 U.S.C. § 2000e-2");
/// ```
pub fn normalize(
    raw: &str,
    jurisdiction: Jurisdiction,
) -> Result<CanonicalReference, NormalizationError> {
    let cleaned = clean(raw);
    let fail = |reason: &str| NormalizationError {
        raw: raw.to_string(),
        jurisdiction: jurisdiction.as_str().to_string(),
        reason: reason.to_string(),
    };

    let key = match jurisdiction {
        Jurisdiction::UsCode => {
            let caps = US_CODE
                .captures(&cleaned)
                .ok_or_else(|| fail("expected '<title> U.S.C. § <section>'"))?;
            format!("{} U.S.C. § {}", number(&caps, 1, &fail)?, &caps[2])
        }
        Jurisdiction::Cfr => {
            let caps = CFR
                .captures(&cleaned)
                .ok_or_else(|| fail("expected '<title> C.F.R. § <part.section>'"))?;
            format!("{} C.F.R. § {}", number(&caps, 1, &fail)?, &caps[2])
        }
        Jurisdiction::PublicLaw => {
            let caps = PUBLIC_LAW
                .captures(&cleaned)
                .ok_or_else(|| fail("expected 'Pub. L. No. <congress>-<number>'"))?;
            format!(
                "Pub. L. No. {}-{}",
                number(&caps, 1, &fail)?,
                number(&caps, 2, &fail)?
            )
        }
        Jurisdiction::StatutesAtLarge => {
            let caps = STATUTES_AT_LARGE
                .captures(&cleaned)
                .ok_or_else(|| fail("expected '<volume> Stat. <page>'"))?;
            format!("{} Stat. {}", number(&caps, 1, &fail)?, number(&caps, 2, &fail)?)
        }
        Jurisdiction::FederalRegister => {
            let caps = FEDERAL_REGISTER
                .captures(&cleaned)
                .ok_or_else(|| fail("expected '<volume> Fed. Reg. <page>'"))?;
            format!(
                "{} Fed. Reg. {}",
                number(&caps, 1, &fail)?,
                number(&caps, 2, &fail)?
            )
        }
        Jurisdiction::StateCode => {
            let caps = STATE_CODE
                .captures(&cleaned)
                .ok_or_else(|| fail("expected '<code designator> § <section>'"))?;
            let designator = designator(&caps[1]);
            if !designator.chars().any(|c| c.is_alphabetic()) {
                return Err(fail("code designator has no letters"));
            }
            format!("{} § {}", designator, &caps[2])
        }
    };

    Ok(CanonicalReference::from_canonical(key, jurisdiction))
}

/// Whitespace, section symbols, and trailing punctuation
fn clean(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let unified = SYMBOL_VARIANTS.replace_all(&collapsed, "§ ");
    collapse_whitespace(&unified)
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':') || c.is_whitespace())
        .to_string()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase, drop dots, single spaces
fn designator(raw: &str) -> String {
    collapse_whitespace(&raw.replace('.', "").to_uppercase())
}

/// Numeric component without leading zeros
fn number(
    caps: &Captures<'_>,
    group: usize,
    fail: &impl Fn(&str) -> NormalizationError,
) -> Result<u64, NormalizationError> {
    caps[group]
        .parse::<u64>()
        .map_err(|_| fail("number out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str, jurisdiction: Jurisdiction) -> String {
        normalize(raw, jurisdiction).unwrap().as_str().to_string()
    }

    #[test]
    fn test_us_code_forms() {
        for raw in [
            "42 U.S.C. § 2000e-2",
            "42 U.S.C. §2000e-2",
            "42 U.S.C.  §  2000e-2",
            "42 USC 2000e-2",
            "42 u.s.c. Sec. 2000e-2",
            "42 U.S.C.A. §§ 2000e-2.",
            "042 U.S.C. Section 2000e-2",
        ] {
            assert_eq!(key(raw, Jurisdiction::UsCode), "42 U.S.C. § 2000e-2", "{}", raw);
        }
    }

    #[test]
    fn test_subsections_are_kept() {
        assert_eq!(
            key("42 U.S.C. § 1983(a)(1)", Jurisdiction::UsCode),
            "42 U.S.C. § 1983(a)(1)"
        );
    }

    #[test]
    fn test_cfr_forms() {
        assert_eq!(key("29 CFR 1604.11", Jurisdiction::Cfr), "29 C.F.R. § 1604.11");
        assert_eq!(key("29 c.f.r. § 1604.11,", Jurisdiction::Cfr), "29 C.F.R. § 1604.11");
        assert_eq!(key("40 CFR Part 60", Jurisdiction::Cfr), "40 C.F.R. § 60");
    }

    #[test]
    fn test_session_laws_and_register() {
        assert_eq!(key("Public Law 111-148", Jurisdiction::PublicLaw), "Pub. L. No. 111-148");
        assert_eq!(key("Pub. L. 88 - 352", Jurisdiction::PublicLaw), "Pub. L. No. 88-352");
        assert_eq!(key("78 Stat 241", Jurisdiction::StatutesAtLarge), "78 Stat. 241");
        assert_eq!(key("85 Fed.Reg. 12345", Jurisdiction::FederalRegister), "85 Fed. Reg. 12345");
    }

    #[test]
    fn test_state_codes() {
        assert_eq!(key("Cal. Civ. Code § 1714", Jurisdiction::StateCode), "CAL CIV CODE § 1714");
        assert_eq!(key("N.Y. Penal Law § 120.05", Jurisdiction::StateCode), "NY PENAL LAW § 120.05");
        assert_eq!(
            key("Tex. Fam. Code Ann. Sec. 6.001", Jurisdiction::StateCode),
            "TEX FAM CODE ANN § 6.001"
        );
    }

    #[test]
    fn test_grammar_mismatch() {
        let err = normalize("42 U.S.C. § ", Jurisdiction::UsCode).unwrap_err();
        assert_eq!(err.raw, "42 U.S.C. § ");
        assert_eq!(err.jurisdiction, "us_code");

        assert!(normalize("78 Stat. 241", Jurisdiction::UsCode).is_err());
        assert!(normalize("§ 1714", Jurisdiction::StateCode).is_err());
        assert!(normalize("99 § 1714", Jurisdiction::StateCode).is_err());
        assert!(normalize("99999999999999999999 U.S.C. § 1", Jurisdiction::UsCode).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn assert_idempotent(raw: &str, jurisdiction: Jurisdiction) -> Result<(), TestCaseError> {
        if let Ok(first) = normalize(raw, jurisdiction) {
            let second = normalize(first.as_str(), jurisdiction);
            prop_assert_eq!(second, Ok(first));
        }
        Ok(())
    }

    proptest! {
        /// Property: U.S. Code spellings normalize to a fixed point
        #[test]
        fn test_us_code_idempotent(raw in r"[0-9]{1,3}\s{0,2}U\.?S\.?C\.?A?\.?\s{0,2}(§{1,2}|Sec\.|Section)?\s{0,2}[0-9]{1,5}[a-z]?(-[0-9]{1,2})?(\([a-z0-9]\))?[.,]?") {
            assert_idempotent(&raw, Jurisdiction::UsCode)?;
        }

        /// Property: state code designators normalize to a fixed point
        #[test]
        fn test_state_code_idempotent(raw in r"[A-Za-z][A-Za-z. ]{0,20}\s?(§|Sec\.|Section)\s?[0-9]{1,4}(\.[0-9]{1,3})?") {
            assert_idempotent(&raw, Jurisdiction::StateCode)?;
        }

        /// Property: whatever normalizes at all is already canonical afterwards
        #[test]
        fn test_any_text_idempotent(raw in r"\PC{0,40}") {
            for jurisdiction in Jurisdiction::ALL {
                assert_idempotent(&raw, jurisdiction)?;
            }
        }
    }
}
