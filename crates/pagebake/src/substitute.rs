//! Ordered text substitution.
//!
//! A [`RuleSet`] is a list of [`Rule`]s applied left to right. Every rule runs
//! over the whole output of the previous rule, replacing all matches unless it
//! was built with [`Rule::once`]. A rule that matches nothing leaves the text
//! untouched.
//!
//! # Example
//!
//! ```
//! use pagebake::substitute::{Rule, RuleSet};
//!
//! let rules = RuleSet::new()
//!     .with(Rule::literal("$TS$", "1700000000000"))
//!     .with(Rule::regex(r#"("tracesSampleRate"):1"#, "$1:0").unwrap());
//!
//! let out = rules.apply(r#"{"tracesSampleRate":1,"ts":"$TS$"}"#);
//! assert_eq!(out, r#"{"tracesSampleRate":0,"ts":"1700000000000"}"#);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use regex::{Captures, Regex};

use crate::{Error, Result};

/// Replacement computed from a match.
pub type ReplaceFn = Arc<dyn Fn(&Captures<'_>) -> String + Send + Sync>;

/// What a rule looks for.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact substring
    Literal(String),
    /// Regular expression, possibly with capture groups
    Regex(Regex),
}

/// What a rule puts in place of a match.
#[derive(Clone)]
pub enum Replacement {
    /// Fixed text. For regex patterns `$1` and `${name}` expand to captures.
    Literal(String),
    /// Text computed from the match and its captures, inserted verbatim.
    Computed(ReplaceFn),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// One substitution step.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Pattern,
    replacement: Replacement,
    limit: usize,
}

impl Rule {
    /// Replace every occurrence of `needle` with `replacement`, verbatim.
    pub fn literal(needle: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Literal(needle.into()),
            replacement: Replacement::Literal(replacement.into()),
            limit: 0,
        }
    }

    /// Replace every occurrence of `needle` with the output of `f`.
    pub fn literal_with<F>(needle: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            pattern: Pattern::Literal(needle.into()),
            replacement: Replacement::Computed(Arc::new(f)),
            limit: 0,
        }
    }

    /// Replace every match of `pattern`; `replacement` may reference captures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` does not compile.
    pub fn regex(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: Pattern::Regex(compile(pattern)?),
            replacement: Replacement::Literal(replacement.into()),
            limit: 0,
        })
    }

    /// Replace every match of `pattern` with the output of `f`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if `pattern` does not compile.
    pub fn regex_with<F>(pattern: &str, f: F) -> Result<Self>
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Ok(Self {
            pattern: Pattern::Regex(compile(pattern)?),
            replacement: Replacement::Computed(Arc::new(f)),
            limit: 0,
        })
    }

    /// Build a rule from an already compiled regex.
    pub fn from_regex(regex: Regex, replacement: Replacement) -> Self {
        Self {
            pattern: Pattern::Regex(regex),
            replacement,
            limit: 0,
        }
    }

    /// Only replace the first match.
    pub fn once(mut self) -> Self {
        self.limit = 1;
        self
    }

    /// Apply this rule alone.
    pub fn apply<'t>(&self, input: &'t str) -> Cow<'t, str> {
        match (&self.pattern, &self.replacement) {
            (Pattern::Literal(needle), _) if needle.is_empty() => Cow::Borrowed(input),
            (Pattern::Literal(needle), Replacement::Literal(with)) => {
                if !input.contains(needle.as_str()) {
                    return Cow::Borrowed(input);
                }
                if self.limit == 0 {
                    Cow::Owned(input.replace(needle.as_str(), with))
                } else {
                    Cow::Owned(input.replacen(needle.as_str(), with, self.limit))
                }
            }
            (Pattern::Literal(needle), Replacement::Computed(f)) => {
                let re = Regex::new(&regex::escape(needle))
                    .expect("escaped literal is a valid regex");
                re.replacen(input, self.limit, |caps: &Captures<'_>| f(caps))
            }
            (Pattern::Regex(re), Replacement::Literal(with)) => {
                re.replacen(input, self.limit, with.as_str())
            }
            (Pattern::Regex(re), Replacement::Computed(f)) => {
                re.replacen(input, self.limit, |caps: &Captures<'_>| f(caps))
            }
        }
    }
}

/// Ordered list of substitution rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule.
    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a rule in place.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order over `input`.
    pub fn apply(&self, input: &str) -> String {
        apply(input, &self.rules)
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Apply `rules` to `input` in order.
pub fn apply(input: &str, rules: &[Rule]) -> String {
    let mut current = input.to_string();
    for rule in rules {
        if let Cow::Owned(next) = rule.apply(&current) {
            current = next;
        }
    }
    current
}

/// Insert `text` verbatim for every match, ignoring `$` references.
pub fn verbatim(text: impl Into<String>) -> Replacement {
    let text: String = text.into();
    Replacement::Computed(Arc::new(move |_: &Captures<'_>| text.clone()))
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
