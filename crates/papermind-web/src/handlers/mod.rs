pub mod chat;
pub mod conversation;
pub mod documents;
pub mod page;
pub mod snapshots;
pub mod status;
