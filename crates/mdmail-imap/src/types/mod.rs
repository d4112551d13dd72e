//! Protocol types shared by the command writer and the response parser.

mod capability;
mod flags;
mod identifiers;
mod mailbox;
mod response_code;
mod status;

pub use capability::Capability;
pub use flags::Flag;
pub use identifiers::{Tag, Uid, UidValidity};
pub use mailbox::Mailbox;
pub use response_code::{AppendUid, ResponseCode};
pub use status::Status;
