//! Release pattern compiler
//!
//! A release pattern is a template such as `<YYYY>-R<MINOR>` where each
//! `<NAME>` placeholder stands for a numeric field and everything else is
//! matched literally:
//! - `<YYYY>` exactly four digits
//! - `<YY>` exactly two digits
//! - `<MM>`, `<DD>` one or two digits
//! - `<MAJOR>`, `<MINOR>`, `<PATCH>`, `<BUILD>` any run of digits

use regex::Regex;

use crate::error::VersionError;

/// Typed placeholder inside a release pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Year,
    ShortYear,
    Month,
    Day,
    Major,
    Minor,
    Patch,
    Build,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "YYYY" => Some(Placeholder::Year),
            "YY" => Some(Placeholder::ShortYear),
            "MM" => Some(Placeholder::Month),
            "DD" => Some(Placeholder::Day),
            "MAJOR" => Some(Placeholder::Major),
            "MINOR" => Some(Placeholder::Minor),
            "PATCH" => Some(Placeholder::Patch),
            "BUILD" => Some(Placeholder::Build),
            _ => None,
        }
    }

    fn capture(&self) -> &'static str {
        match self {
            Placeholder::Year => r"(\d{4})",
            Placeholder::ShortYear => r"(\d{2})",
            Placeholder::Month | Placeholder::Day => r"(\d{1,2})",
            Placeholder::Major | Placeholder::Minor | Placeholder::Patch | Placeholder::Build => {
                r"(\d+)"
            }
        }
    }
}

/// A compiled release pattern
#[derive(Debug, Clone)]
pub struct ReleasePattern {
    source: String,
    regex: Regex,
    fields: Vec<Placeholder>,
}

impl ReleasePattern {
    /// Compile a pattern template into an anchored matcher
    pub fn compile(pattern: &str) -> Result<Self, VersionError> {
        let invalid = |reason: String| VersionError::InvalidReleasePattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.trim().is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }

        let mut expr = String::from("^");
        let mut fields = Vec::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('<') {
            expr.push_str(&regex::escape(&rest[..open]));

            let after_open = &rest[open + 1..];
            let close = after_open
                .find('>')
                .ok_or_else(|| invalid(format!("unterminated placeholder at byte {}", open)))?;
            let name = &after_open[..close];
            let placeholder = Placeholder::from_name(name)
                .ok_or_else(|| invalid(format!("unknown placeholder <{}>", name)))?;

            expr.push_str(placeholder.capture());
            fields.push(placeholder);
            rest = &after_open[close + 1..];
        }
        expr.push_str(&regex::escape(rest));
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            fields,
        })
    }

    /// The template this pattern was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn fields(&self) -> &[Placeholder] {
        &self.fields
    }

    /// Numeric fields of `version` in pattern order, or None if it does not match
    pub fn capture(&self, version: &str) -> Option<Vec<u64>> {
        let caps = self.regex.captures(version)?;
        caps.iter()
            .skip(1)
            .map(|m| m.and_then(|m| m.as_str().parse::<u64>().ok()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<YYYY>-R<MINOR>", "2025-R37", Some(vec![2025, 37]))]
    #[case("<YYYY>-R<MINOR>", "2022-R02", Some(vec![2022, 2]))]
    #[case("<YYYY>-R<MINOR>", "25-R37", None)] // year needs four digits
    #[case("<YYYY>-R<MINOR>", "2025-R", None)]
    #[case("<YYYY>-R<MINOR>", "x2025-R37", None)] // anchored at start
    #[case("<YYYY>-R<MINOR>", "2025-R37-hotfix", None)] // anchored at end
    #[case("<MAJOR>.<MINOR>.<PATCH>", "1.33.3", Some(vec![1, 33, 3]))]
    #[case("<MAJOR>.<MINOR>.<PATCH>", "1x33x3", None)] // '.' is literal
    #[case("v<MAJOR>.<MINOR>", "v4.14", Some(vec![4, 14]))]
    #[case("<YY>.<MM>", "24.04", Some(vec![24, 4]))]
    #[case("<YYYY>.<MM>.<DD>", "2025.7.15", Some(vec![2025, 7, 15]))]
    #[case("<MAJOR>.<MINOR>.<PATCH>-eks-<BUILD>", "1.30.4-eks-7", Some(vec![1, 30, 4, 7]))]
    #[case("stable", "stable", Some(vec![]))]
    fn capture_returns_numeric_fields(
        #[case] pattern: &str,
        #[case] version: &str,
        #[case] expected: Option<Vec<u64>>,
    ) {
        let pattern = ReleasePattern::compile(pattern).unwrap();
        assert_eq!(pattern.capture(version), expected);
    }

    #[rstest]
    #[case("")]
    #[case("<YYYY>-R<MINOR")]
    #[case("<YEAR>-R<MINOR>")]
    #[case("<>")]
    fn compile_rejects_invalid_patterns(#[case] pattern: &str) {
        assert!(matches!(
            ReleasePattern::compile(pattern),
            Err(VersionError::InvalidReleasePattern { .. })
        ));
    }

    #[test]
    fn compile_records_placeholders_in_order() {
        let pattern = ReleasePattern::compile("<YYYY>-R<MINOR>").unwrap();

        assert_eq!(pattern.as_str(), "<YYYY>-R<MINOR>");
        assert_eq!(pattern.fields(), &[Placeholder::Year, Placeholder::Minor]);
    }

    #[test]
    fn capture_rejects_overflowing_fields() {
        let pattern = ReleasePattern::compile("<MAJOR>").unwrap();
        assert_eq!(pattern.capture("99999999999999999999999"), None);
    }
}
