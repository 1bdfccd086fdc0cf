//! SRS rewrite and reverse engine
//!
//! [`Srs`] holds the immutable rewriting configuration. Every call reads
//! the clock once and keeps no state, so one instance can be shared
//! between threads.

mod reverse;
mod rewrite;

use crate::clock::{Clock, SystemClock};
use crate::signature::Signer;
use mailsrs_common::{Result, Separator, SrsConfig};
use std::sync::Arc;

/// Sender Rewriting Scheme rewriter
#[derive(Clone)]
pub struct Srs {
    signer: Signer,
    separator: Separator,
    max_age: u32,
    clock: Arc<dyn Clock>,
}

impl Srs {
    /// Create a rewriter reading the system clock
    pub fn new(config: SrsConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a rewriter with a custom time source
    pub fn with_clock(config: SrsConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            signer: Signer::new(config.secret.as_bytes())?,
            separator: config.separator,
            max_age: config.max_age,
            clock,
        })
    }

    pub fn separator(&self) -> Separator {
        self.separator
    }

    /// Maximum age of an SRS0 address in days
    pub fn max_age(&self) -> u32 {
        self.max_age
    }
}

impl std::fmt::Debug for Srs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Srs")
            .field("separator", &self.separator)
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use mailsrs_common::Error;

    #[test]
    fn test_new_rejects_empty_secret() {
        let err = Srs::new(SrsConfig::new("")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_new_rejects_zero_max_age() {
        let err = Srs::new(SrsConfig::new("secret").with_max_age(0)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_new_keeps_config() {
        let srs = Srs::new(
            SrsConfig::new("secret")
                .with_separator(Separator::Hyphen)
                .with_max_age(7),
        )
        .unwrap();
        assert_eq!(srs.separator(), Separator::Hyphen);
        assert_eq!(srs.max_age(), 7);
    }

    #[test]
    fn test_debug_hides_secret() {
        let srs = Srs::new(SrsConfig::new("topsecret")).unwrap();
        assert!(!format!("{:?}", srs).contains("topsecret"));
    }

    #[test]
    fn test_srs_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Srs>();
    }
}
