//! MailSRS Core - Sender Rewriting Scheme
//!
//! Rewrites envelope senders into signed SRS0/SRS1 local-parts when mail is
//! forwarded, and reverses them when a bounce comes back.
//!
//! ```text
//! user@a          --forward via b-->  SRS0=HHHH=TT=a=user@b
//! SRS0...@b       --forward via c-->  SRS1=HHHH=b==HHHH=TT=a=user@c
//! ```

pub mod clock;
pub mod engine;
pub mod grammar;
pub mod signature;
pub mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::Srs;
pub use grammar::{classify, is_srs, is_srs0, is_srs1, Srs0Address, Srs1Address, SrsKind};
pub use signature::{sign, Signer};
