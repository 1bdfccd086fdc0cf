//! Common types for MailSRS

use serde::{Deserialize, Serialize};

/// Email address split into envelope local-part and domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EmailAddress {
    pub local: String,
    pub domain: String,
}

impl EmailAddress {
    /// Create a new email address
    pub fn new(local: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            domain: domain.into(),
        }
    }

    /// Parse an email address from a string
    ///
    /// Splits on the last `@` so quoted local-parts containing `@` survive.
    pub fn parse(s: &str) -> Option<Self> {
        let (local, domain) = s.rsplit_once('@')?;
        if local.is_empty() || domain.is_empty() {
            return None;
        }
        Some(Self::new(local, domain))
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

impl std::str::FromStr for EmailAddress {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| crate::Error::Validation(format!("Invalid email address: {}", s)))
    }
}

/// Separator written directly after the SRS0/SRS1 tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Separator {
    #[default]
    Equals,
    Hyphen,
    Plus,
}

impl Separator {
    pub fn as_char(self) -> char {
        match self {
            Separator::Equals => '=',
            Separator::Hyphen => '-',
            Separator::Plus => '+',
        }
    }

    /// Whether `c` is accepted after the tag when parsing, regardless of
    /// the configured separator
    pub fn is_accepted(c: u8) -> bool {
        matches!(c, b'=' | b'-' | b'+')
    }
}

impl std::fmt::Display for Separator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Separator {
    type Error = crate::Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '=' => Ok(Separator::Equals),
            '-' => Ok(Separator::Hyphen),
            '+' => Ok(Separator::Plus),
            other => Err(crate::Error::Config(format!(
                "separator must be one of '=', '-', '+', got {:?}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Separator {
    type Error = crate::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Separator::try_from(c),
            _ => Err(crate::Error::Config(format!(
                "separator must be a single character, got {:?}",
                s
            ))),
        }
    }
}
