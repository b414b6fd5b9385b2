//! Qualified element names
//!
//! Provides [`QName`], a namespace URI plus local name identifying a node.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Qualified name of a configuration node
///
/// Displayed and parsed in Clark notation: `{namespace}local`, or just
/// `local` when there is no namespace.
///
/// # Examples
/// - `{urn:confmodel:composite:1.0}component`
/// - `property` (no namespace)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QName {
    #[serde(default)]
    namespace: Cow<'static, str>,
    local: Cow<'static, str>,
}

impl QName {
    /// Create name from namespace and local part
    #[inline]
    #[must_use]
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Cow::Owned(namespace.into()),
            local: Cow::Owned(local.into()),
        }
    }

    /// Create name from static strings, usable in constants
    #[inline]
    #[must_use]
    pub const fn from_static(namespace: &'static str, local: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            local: Cow::Borrowed(local),
        }
    }

    /// Create name without namespace
    #[inline]
    #[must_use]
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new(String::new(), local)
    }

    /// Namespace URI (empty if none)
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Local part
    #[inline]
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local
    }
}

impl Display for QName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

impl FromStr for QName {
    type Err = QNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(QNameError::Empty);
        }

        let (namespace, local) = match s.strip_prefix('{') {
            Some(rest) => rest
                .split_once('}')
                .ok_or_else(|| QNameError::UnterminatedNamespace(s.to_string()))?,
            None => ("", s),
        };

        if local.is_empty() {
            return Err(QNameError::Empty);
        }
        if local.contains(|c: char| c.is_whitespace() || matches!(c, '{' | '}' | '<' | '>' | '/')) {
            return Err(QNameError::InvalidLocalName(local.to_string()));
        }

        Ok(Self::new(namespace, local))
    }
}

/// Errors related to qualified names
#[derive(Debug, thiserror::Error)]
pub enum QNameError {
    /// Empty name or empty local part
    #[error("qualified name has an empty local part")]
    Empty,

    /// `{` without matching `}`
    #[error("unterminated namespace in '{0}'")]
    UnterminatedNamespace(String),

    /// Local part contains characters not allowed in element names
    #[error("invalid local name: '{0}'")]
    InvalidLocalName(String),
}
