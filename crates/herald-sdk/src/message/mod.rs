//! Message records and their construction
//!
//! - `builder`: assembles unsigned drafts
//! - `ladder`: the Built → Hashed → Signed → Published stages

mod builder;
mod ladder;

pub use builder::{now_seconds, MessageBuilder};
pub use ladder::{
    verification_buffer, BuiltMessage, Envelope, HashedMessage, PublishedMessage, RawConfirmation,
    RawMessage, SignedMessage,
};
