//! Hook spec strings (`name` or `name:opt1,opt2`) as accepted on the
//! worker command line.

use std::fmt;
use std::str::FromStr;

use crate::error::HookError;

/// A hook name plus the options to enable it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookSpec {
    /// Registered hook name.
    pub name: String,
    /// Options forwarded to the hook factory.
    pub options: Vec<String>,
}

impl HookSpec {
    /// Creates a spec.
    pub fn new(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

impl FromStr for HookSpec {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = match s.split_once(':') {
            Some((name, rest)) => (name.trim(), Some(rest)),
            None => (s.trim(), None),
        };

        if name.is_empty() {
            return Err(HookError::InvalidSpec {
                spec: s.to_string(),
                reason: "hook name is empty".to_string(),
            });
        }

        let options = rest
            .map(|rest| {
                rest.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self::new(name, options))
    }
}

impl fmt::Display for HookSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.options.is_empty() {
            write!(f, ":{}", self.options.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() {
        let spec: HookSpec = "timing".parse().expect("parse");
        assert_eq!(spec, HookSpec::new("timing", Vec::new()));
        assert_eq!(spec.to_string(), "timing");
    }

    #[test]
    fn test_with_options() {
        let spec: HookSpec = " request_log : level=debug, ,extra ".parse().expect("parse");
        assert_eq!(spec.name, "request_log");
        assert_eq!(spec.options, vec!["level=debug", "extra"]);
        assert_eq!(spec.to_string(), "request_log:level=debug,extra");
    }

    #[test]
    fn test_option_may_contain_colon() {
        let spec: HookSpec = "sink:url=http://localhost:9000".parse().expect("parse");
        assert_eq!(spec.name, "sink");
        assert_eq!(spec.options, vec!["url=http://localhost:9000"]);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(
            "".parse::<HookSpec>(),
            Err(HookError::InvalidSpec { .. })
        ));
        assert!(matches!(
            " :opt".parse::<HookSpec>(),
            Err(HookError::InvalidSpec { .. })
        ));
    }
}
