use std::fmt;

use anyhow::{Result, bail};

/// Selects which AI results take part in the evaluation, by their operation tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum OperationsFilter {
    #[default]
    All,
    /// Every listed tag must be present.
    RequireAll(Vec<String>),
    /// The tag list must equal this list exactly.
    Exact(Vec<String>),
}

impl OperationsFilter {
    pub fn from_args(require: &[String], exact: &[String]) -> Result<Self> {
        match (require.is_empty(), exact.is_empty()) {
            (true, true) => Ok(Self::All),
            (false, true) => Ok(Self::RequireAll(require.to_vec())),
            (true, false) => Ok(Self::Exact(exact.to_vec())),
            (false, false) => bail!("--require-operation and --exact-operations cannot be combined"),
        }
    }

    pub fn matches(&self, operations: &[String]) -> bool {
        match self {
            Self::All => true,
            Self::RequireAll(required) => required
                .iter()
                .all(|tag| operations.iter().any(|operation| operation == tag)),
            Self::Exact(expected) => operations == expected.as_slice(),
        }
    }
}

impl fmt::Display for OperationsFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::RequireAll(required) => write!(f, "require:{}", required.join(",")),
            Self::Exact(expected) => write!(f, "exact:{}", expected.join(",")),
        }
    }
}
