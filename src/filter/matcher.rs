use regex::Regex;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A list of name patterns compiled into a single OR-composed regex.
///
/// An empty list never matches anything. It must not be treated as "no
/// restriction": an empty exclude list excludes nothing, and an empty include
/// list includes nothing.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    patterns: Vec<String>,
    regex: Option<Regex>,
}

impl Matcher {
    /// Compile leniently: invalid patterns are logged and skipped.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        let valid: Vec<String> = patterns
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| match Regex::new(p) {
                Ok(_) => true,
                Err(e) => {
                    warn!(pattern = %p, error = %e, "Dropping invalid filter pattern");
                    false
                }
            })
            .map(str::to_string)
            .collect();

        let regex = match join(&valid) {
            Some(Ok(regex)) => Some(regex),
            Some(Err(e)) => {
                warn!(error = %e, "Combined filter pattern failed to compile; matching nothing");
                None
            }
            None => None,
        };

        Self {
            patterns: valid,
            regex,
        }
    }

    /// Compile strictly, failing on the first invalid pattern.
    pub fn try_compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, FilterError> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        for pattern in &patterns {
            Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        }
        let regex = join(&patterns)
            .transpose()
            .map_err(|source| FilterError::InvalidPattern {
                pattern: patterns.join("|"),
                source,
            })?;
        Ok(Self { patterns, regex })
    }

    /// A matcher that matches nothing
    pub fn never() -> Self {
        Self::default()
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(name))
    }

    /// True when no pattern survived compilation
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

fn join(patterns: &[String]) -> Option<Result<Regex, regex::Error>> {
    if patterns.is_empty() {
        return None;
    }
    let combined = patterns
        .iter()
        .map(|p| format!("(?:{})", p))
        .collect::<Vec<_>>()
        .join("|");
    Some(Regex::new(&combined))
}
