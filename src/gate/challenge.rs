use std::fmt;

use crate::crypto::constant_time_eq;

/// Outcome of checking a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// Nothing was submitted.
    Missing,
    Incorrect,
}

/// A single-step challenge guarding the protected page.
///
/// The gate only needs a verdict, so anything from a fixed code to a one-time
/// password check can sit behind this trait.
pub trait Challenge: Send + Sync + 'static {
    fn check(&self, code: &str) -> Verdict;
}

/// Accepts exactly one configured code.
#[derive(Clone)]
pub struct StaticCode(String);

impl StaticCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

impl fmt::Debug for StaticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StaticCode([REDACTED])")
    }
}

impl Challenge for StaticCode {
    fn check(&self, code: &str) -> Verdict {
        if code.is_empty() {
            Verdict::Missing
        } else if constant_time_eq(code.as_bytes(), self.0.as_bytes()) {
            Verdict::Accepted
        } else {
            Verdict::Incorrect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_code_verdicts() {
        let challenge = StaticCode::new("code");
        assert_eq!(challenge.check("code"), Verdict::Accepted);
        assert_eq!(challenge.check(""), Verdict::Missing);
        assert_eq!(challenge.check("cod"), Verdict::Incorrect);
        assert_eq!(challenge.check("CODE"), Verdict::Incorrect);
    }

    #[test]
    fn test_static_code_debug_redacted() {
        assert_eq!(format!("{:?}", StaticCode::new("code")), "StaticCode([REDACTED])");
    }
}
