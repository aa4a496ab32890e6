//! Policy gate implementations backed by local data.

pub mod blocklist;

pub use blocklist::BlocklistGate;
