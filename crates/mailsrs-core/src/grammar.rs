//! SRS address grammar
//!
//! ```text
//! SRS0<sep><hash>=<timestamp>=<domain>=<local>
//! SRS1<sep><hash>=<domain>=<guarded>
//! ```
//!
//! `<sep>` is one of `=`, `-` or `+` when parsing. Every later field
//! separator is a literal `=`. Domains never contain `=`; the SRS0 local
//! and the SRS1 guarded payload run to the end of the input and may.

use crate::signature::HASH_LEN;
use crate::timestamp::{base32_value, TIMESTAMP_LEN};
use mailsrs_common::{FormatError, Separator};

pub const SRS_PREFIX: &str = "SRS";
pub const SRS0_TAG: &str = "SRS0";
pub const SRS1_TAG: &str = "SRS1";

const FIELD_SEPARATOR: char = '=';

/// Which SRS format a local-part is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SrsKind {
    /// First hop, carries a timestamp
    Srs0,
    /// Guarded wrapper around an SRS0 payload
    Srs1,
}

/// Whether `local` claims to be an SRS address at all
pub fn is_srs(local: &str) -> bool {
    local.starts_with(SRS_PREFIX)
}

pub fn is_srs0(local: &str) -> bool {
    local.starts_with(SRS0_TAG)
}

pub fn is_srs1(local: &str) -> bool {
    local.starts_with(SRS1_TAG)
}

pub fn classify(local: &str) -> Option<SrsKind> {
    if is_srs0(local) {
        Some(SrsKind::Srs0)
    } else if is_srs1(local) {
        Some(SrsKind::Srs1)
    } else {
        None
    }
}

/// Parsed SRS0 address, borrowing from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Srs0Address<'a> {
    pub hash: &'a str,
    pub timestamp: &'a str,
    pub domain: &'a str,
    pub local: &'a str,
}

impl<'a> Srs0Address<'a> {
    pub fn parse(input: &'a str) -> Result<Self, FormatError> {
        let mut cursor = Cursor::new(input);
        cursor.tag(SRS0_TAG)?;
        cursor.separator()?;
        let hash = cursor.fixed(HASH_LEN, |c| c.is_ascii_hexdigit(), FormatError::InvalidHash)?;
        cursor.delimiter("timestamp")?;
        let timestamp = cursor.fixed(
            TIMESTAMP_LEN,
            |c| base32_value(c).is_some(),
            FormatError::InvalidTimestamp,
        )?;
        cursor.delimiter("domain")?;
        let domain = cursor.field("local")?;
        cursor.delimiter("local")?;
        let local = cursor.rest();

        Ok(Self {
            hash,
            timestamp,
            domain,
            local,
        })
    }

    /// Byte strings covered by the hash, in signing order
    pub fn signed_parts(&self) -> [&'a [u8]; 3] {
        [
            self.timestamp.as_bytes(),
            self.domain.as_bytes(),
            self.local.as_bytes(),
        ]
    }
}

/// Parsed SRS1 address, borrowing from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Srs1Address<'a> {
    pub hash: &'a str,
    pub domain: &'a str,
    /// SRS0 address with its tag stripped, separator included
    pub guarded: &'a str,
}

impl<'a> Srs1Address<'a> {
    pub fn parse(input: &'a str) -> Result<Self, FormatError> {
        let mut cursor = Cursor::new(input);
        cursor.tag(SRS1_TAG)?;
        cursor.separator()?;
        let hash = cursor.fixed(HASH_LEN, |c| c.is_ascii_hexdigit(), FormatError::InvalidHash)?;
        cursor.delimiter("domain")?;
        let domain = cursor.field("guarded")?;
        cursor.delimiter("guarded")?;
        let guarded = cursor.rest();

        Ok(Self {
            hash,
            domain,
            guarded,
        })
    }

    pub fn signed_parts(&self) -> [&'a [u8]; 2] {
        [self.domain.as_bytes(), self.guarded.as_bytes()]
    }
}

pub fn format_srs0(
    separator: Separator,
    hash: &str,
    timestamp: &str,
    domain: &str,
    local: &str,
) -> String {
    let f = FIELD_SEPARATOR;
    format!("{SRS0_TAG}{separator}{hash}{f}{timestamp}{f}{domain}{f}{local}")
}

pub fn format_srs1(separator: Separator, hash: &str, domain: &str, guarded: &str) -> String {
    let f = FIELD_SEPARATOR;
    format!("{SRS1_TAG}{separator}{hash}{f}{domain}{f}{guarded}")
}

/// Forward-only tokenizer over an address
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn tag(&mut self, tag: &str) -> Result<(), FormatError> {
        if !self.rest().starts_with(tag) {
            return Err(FormatError::MissingTag);
        }
        self.pos += tag.len();
        Ok(())
    }

    fn separator(&mut self) -> Result<(), FormatError> {
        match self.rest().as_bytes().first() {
            Some(&c) if Separator::is_accepted(c) => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(FormatError::InvalidSeparator),
        }
    }

    /// Take exactly `len` ASCII bytes that all satisfy `accept`
    fn fixed(
        &mut self,
        len: usize,
        accept: impl Fn(u8) -> bool,
        err: FormatError,
    ) -> Result<&'a str, FormatError> {
        let rest = self.rest();
        match rest.as_bytes().get(..len) {
            Some(bytes) if bytes.iter().all(|&c| accept(c)) => {
                self.pos += len;
                Ok(&rest[..len])
            }
            _ => Err(err),
        }
    }

    /// Consume the `=` that introduces the `next` field
    fn delimiter(&mut self, next: &'static str) -> Result<(), FormatError> {
        if !self.rest().starts_with(FIELD_SEPARATOR) {
            return Err(FormatError::MissingField(next));
        }
        self.pos += FIELD_SEPARATOR.len_utf8();
        Ok(())
    }

    /// Take everything up to the next `=`, which must introduce `next`
    fn field(&mut self, next: &'static str) -> Result<&'a str, FormatError> {
        let rest = self.rest();
        let end = rest
            .find(FIELD_SEPARATOR)
            .ok_or(FormatError::MissingField(next))?;
        self.pos += end;
        Ok(&rest[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GUARDED: &str = "SRS1=6b42=forwarder.com==5840=Z5=samcday.com.au=me";

    #[test]
    fn test_classify() {
        assert_eq!(classify("SRS0=5840=Z5=samcday.com.au=me"), Some(SrsKind::Srs0));
        assert_eq!(classify("SRS1=6b42=forwarder.com==5840"), Some(SrsKind::Srs1));
        assert_eq!(classify("SRS2=abcd"), None);
        assert_eq!(classify("me"), None);
        assert!(is_srs("SRS2=abcd"));
        assert!(!is_srs("srs0=5840=Z5=samcday.com.au=me"));
    }

    #[test]
    fn test_parse_srs0() {
        let parsed = Srs0Address::parse("SRS0=5840=Z5=samcday.com.au=me").unwrap();
        assert_eq!(
            parsed,
            Srs0Address {
                hash: "5840",
                timestamp: "Z5",
                domain: "samcday.com.au",
                local: "me",
            }
        );
    }

    #[test]
    fn test_parse_srs0_alternate_separators() {
        for input in ["SRS0-5840=Z5=samcday.com.au=me", "SRS0+5840=Z5=samcday.com.au=me"] {
            let parsed = Srs0Address::parse(input).unwrap();
            assert_eq!(parsed.hash, "5840");
            assert_eq!(parsed.local, "me");
        }
    }

    #[test]
    fn test_parse_srs0_local_keeps_equals() {
        let parsed = Srs0Address::parse("SRS0=fa40=Z5=example.org=a=b").unwrap();
        assert_eq!(parsed.domain, "example.org");
        assert_eq!(parsed.local, "a=b");
    }

    #[test]
    fn test_parse_srs0_lowercase_timestamp() {
        let parsed = Srs0Address::parse("SRS0=5840=z5=samcday.com.au=me").unwrap();
        assert_eq!(parsed.timestamp, "z5");
    }

    #[test]
    fn test_parse_srs0_errors() {
        assert_eq!(Srs0Address::parse("SRS0=lolwat"), Err(FormatError::InvalidHash));
        assert_eq!(Srs0Address::parse("SRS0"), Err(FormatError::InvalidSeparator));
        assert_eq!(
            Srs0Address::parse("SRS0_5840=Z5=samcday.com.au=me"),
            Err(FormatError::InvalidSeparator)
        );
        assert_eq!(
            Srs0Address::parse("SRS0=58400=Z5=samcday.com.au=me"),
            Err(FormatError::MissingField("timestamp"))
        );
        assert_eq!(
            Srs0Address::parse("SRS0=5840=Z1=samcday.com.au=me"),
            Err(FormatError::InvalidTimestamp)
        );
        assert_eq!(
            Srs0Address::parse("SRS0=5840=Z5=samcday.com.au"),
            Err(FormatError::MissingField("local"))
        );
        assert_eq!(
            Srs0Address::parse("SRS1=5840=Z5=samcday.com.au=me"),
            Err(FormatError::MissingTag)
        );
    }

    #[test]
    fn test_parse_srs0_multibyte_input() {
        assert_eq!(Srs0Address::parse("SRS0=58é=Z5=a=b"), Err(FormatError::InvalidHash));
        let parsed = Srs0Address::parse("SRS0=5840=Z5=bücher.de=jörg").unwrap();
        assert_eq!(parsed.domain, "bücher.de");
        assert_eq!(parsed.local, "jörg");
    }

    #[test]
    fn test_parse_srs1() {
        let parsed = Srs1Address::parse(GUARDED).unwrap();
        assert_eq!(
            parsed,
            Srs1Address {
                hash: "6b42",
                domain: "forwarder.com",
                guarded: "=5840=Z5=samcday.com.au=me",
            }
        );
    }

    #[test]
    fn test_parse_srs1_errors() {
        assert_eq!(Srs1Address::parse("SRS1=zz"), Err(FormatError::InvalidHash));
        assert_eq!(
            Srs1Address::parse("SRS1=6b42=forwarder.com"),
            Err(FormatError::MissingField("guarded"))
        );
        assert_eq!(
            Srs1Address::parse("SRS1=6b42forwarder.com=x"),
            Err(FormatError::MissingField("domain"))
        );
    }

    #[test]
    fn test_format() {
        assert_eq!(
            format_srs0(Separator::Equals, "5840", "Z5", "samcday.com.au", "me"),
            "SRS0=5840=Z5=samcday.com.au=me"
        );
        assert_eq!(
            format_srs1(Separator::Plus, "6b42", "forwarder.com", "=5840=Z5=samcday.com.au=me"),
            "SRS1+6b42=forwarder.com==5840=Z5=samcday.com.au=me"
        );
    }

    #[test]
    fn test_signed_parts() {
        let parsed = Srs1Address::parse(GUARDED).unwrap();
        let parts = parsed.signed_parts();
        assert_eq!(parts[0], b"forwarder.com");
        assert_eq!(parts[1], b"=5840=Z5=samcday.com.au=me");
    }
}
