//! Forward-path rewriting

use super::Srs;
use crate::grammar::{self, Srs1Address, SrsKind, SRS0_TAG};
use crate::timestamp;
use mailsrs_common::{EmailAddress, Result};
use tracing::debug;

impl Srs {
    /// Rewrite the envelope sender `local@domain` for forwarding
    ///
    /// A plain local-part becomes a fresh SRS0 address. An SRS0 local-part
    /// is wrapped into SRS1 under `domain`. An SRS1 local-part keeps its
    /// own domain and payload and is only re-signed, so `domain` is unused.
    pub fn rewrite(&self, local: &str, domain: &str) -> Result<String> {
        match grammar::classify(local) {
            None => Ok(self.rewrite_plain(local, domain)),
            Some(SrsKind::Srs0) => Ok(self.guard(local, domain)),
            Some(SrsKind::Srs1) => self.resign(local),
        }
    }

    /// Rewrite a full address so it can be sent from `forwarding_domain`
    pub fn rewrite_address(
        &self,
        address: &EmailAddress,
        forwarding_domain: &str,
    ) -> Result<EmailAddress> {
        let local = self.rewrite(&address.local, &address.domain)?;
        Ok(EmailAddress::new(local, forwarding_domain))
    }

    fn rewrite_plain(&self, local: &str, domain: &str) -> String {
        let timestamp = timestamp::encode(self.clock.now());
        let hash = self
            .signer
            .sign(&[timestamp.as_bytes(), domain.as_bytes(), local.as_bytes()]);

        debug!("Rewriting {}@{} as SRS0", local, domain);
        grammar::format_srs0(self.separator, &hash, &timestamp, domain, local)
    }

    fn guard(&self, local: &str, domain: &str) -> String {
        let guarded = &local[SRS0_TAG.len()..];
        let hash = self.signer.sign(&[domain.as_bytes(), guarded.as_bytes()]);

        debug!("Guarding SRS0 address from {} as SRS1", domain);
        grammar::format_srs1(self.separator, &hash, domain, guarded)
    }

    fn resign(&self, local: &str) -> Result<String> {
        let parsed = Srs1Address::parse(local)?;
        let hash = self.signer.sign(&parsed.signed_parts());

        debug!("Re-signing SRS1 address from {}", parsed.domain);
        Ok(grammar::format_srs1(
            self.separator,
            &hash,
            parsed.domain,
            parsed.guarded,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::test_support::{srs, srs_at};
    use chrono::Duration;
    use mailsrs_common::{EmailAddress, Error, FormatError, Separator, SrsConfig};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rewrite_plain_address() {
        let rewritten = srs("secret").rewrite("me", "samcday.com.au").unwrap();
        assert_eq!(rewritten, "SRS0=5840=Z5=samcday.com.au=me");
    }

    #[test]
    fn test_rewrite_uses_configured_separator() {
        let srs = srs_at(
            SrsConfig::new("secret").with_separator(Separator::Plus),
            Duration::zero(),
        );
        let rewritten = srs.rewrite("me", "samcday.com.au").unwrap();
        assert_eq!(rewritten, "SRS0+5840=Z5=samcday.com.au=me");
    }

    #[test]
    fn test_rewrite_guards_srs0() {
        let rewritten = srs("secret")
            .rewrite("SRS0=5840=Z5=samcday.com.au=me", "forwarder.com")
            .unwrap();
        assert_eq!(rewritten, "SRS1=6b42=forwarder.com==5840=Z5=samcday.com.au=me");
    }

    #[test]
    fn test_guard_keeps_inner_separator() {
        let rewritten = srs("secret")
            .rewrite("SRS0+5840=Z5=samcday.com.au=me", "forwarder.com")
            .unwrap();
        assert_eq!(rewritten, "SRS1=5ab9=forwarder.com=+5840=Z5=samcday.com.au=me");
    }

    #[test]
    fn test_rewrite_resigns_srs1() {
        let srs1 = "SRS1=6b42=forwarder.com==5840=Z5=samcday.com.au=me";

        let same_secret = srs("secret").rewrite(srs1, "elsewhere.net").unwrap();
        assert_eq!(same_secret, srs1);

        let other_secret = srs("other").rewrite(srs1, "elsewhere.net").unwrap();
        assert_eq!(other_secret, "SRS1=a98f=forwarder.com==5840=Z5=samcday.com.au=me");
    }

    #[test]
    fn test_rewrite_malformed_srs1() {
        let err = srs("secret").rewrite("SRS1=zz", "forwarder.com").unwrap_err();
        assert_eq!(err, Error::UnrecognizedFormat(FormatError::InvalidHash));
    }

    #[test]
    fn test_rewrite_timestamp_follows_clock() {
        let srs = srs_at(SrsConfig::new("secret"), -Duration::days(21));
        let rewritten = srs.rewrite("me", "samcday.com.au").unwrap();
        assert_eq!(rewritten, "SRS0=16ba=ZI=samcday.com.au=me");
    }

    #[test]
    fn test_rewrite_address() {
        let address = EmailAddress::new("me", "samcday.com.au");
        let rewritten = srs("secret")
            .rewrite_address(&address, "forwarder.com")
            .unwrap();
        assert_eq!(
            rewritten.to_string(),
            "SRS0=5840=Z5=samcday.com.au=me@forwarder.com"
        );
    }
}
