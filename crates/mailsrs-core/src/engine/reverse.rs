//! Bounce-path reversal

use super::Srs;
use crate::grammar::{self, Srs0Address, Srs1Address, SrsKind, SRS0_TAG};
use crate::timestamp;
use mailsrs_common::{EmailAddress, Error, FormatError, Result};
use tracing::{debug, warn};

impl Srs {
    /// Recover `(local, domain)` from a rewritten local-part
    ///
    /// Returns `Ok(None)` when `address` is not an SRS address. An SRS1
    /// address is unwrapped by one layer only: the result is the inner
    /// SRS0 local-part at the guarding forwarder's domain.
    pub fn reverse(&self, address: &str) -> Result<Option<(String, String)>> {
        if !grammar::is_srs(address) {
            return Ok(None);
        }

        match grammar::classify(address) {
            Some(SrsKind::Srs0) => self.reverse_srs0(address).map(Some),
            Some(SrsKind::Srs1) => self.reverse_srs1(address).map(Some),
            None => {
                debug!("Unknown SRS tag in {}", address);
                Err(FormatError::MissingTag.into())
            }
        }
    }

    /// Reverse the local-part of a full address
    ///
    /// The domain the bounce was delivered to is not part of the result.
    pub fn reverse_address(&self, address: &EmailAddress) -> Result<Option<EmailAddress>> {
        Ok(self
            .reverse(&address.local)?
            .map(|(local, domain)| EmailAddress::new(local, domain)))
    }

    /// Reverse until the result is no longer an SRS0/SRS1 address
    ///
    /// Useful when one host performed both hops of a guarded chain.
    pub fn reverse_fully(&self, address: &str) -> Result<Option<(String, String)>> {
        let Some(mut current) = self.reverse(address)? else {
            return Ok(None);
        };

        while grammar::classify(&current.0).is_some() {
            match self.reverse(&current.0)? {
                Some(next) => current = next,
                None => break,
            }
        }

        Ok(Some(current))
    }

    fn reverse_srs0(&self, address: &str) -> Result<(String, String)> {
        let parsed = Srs0Address::parse(address)?;

        if !self.signer.verify(&parsed.signed_parts(), parsed.hash) {
            warn!("Invalid SRS0 signature for domain {}", parsed.domain);
            return Err(Error::InvalidSignature);
        }

        if !timestamp::is_within(parsed.timestamp, self.max_age, self.clock.now()) {
            warn!(
                "Expired SRS0 address for domain {} (timestamp {})",
                parsed.domain, parsed.timestamp
            );
            return Err(Error::Expired);
        }

        debug!("Reversed SRS0 address to {}@{}", parsed.local, parsed.domain);
        Ok((parsed.local.to_string(), parsed.domain.to_string()))
    }

    fn reverse_srs1(&self, address: &str) -> Result<(String, String)> {
        let parsed = Srs1Address::parse(address)?;

        if !self.signer.verify(&parsed.signed_parts(), parsed.hash) {
            warn!("Invalid SRS1 signature for domain {}", parsed.domain);
            return Err(Error::InvalidSignature);
        }

        debug!("Unwrapped SRS1 address guarded by {}", parsed.domain);
        Ok((
            format!("{}{}", SRS0_TAG, parsed.guarded),
            parsed.domain.to_string(),
        ))
    }
}
