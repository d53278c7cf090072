//! Group Module
//!
//! Named cache namespaces, their registry and the peer capabilities they use.

mod flight;
mod namespace;
mod peers;
mod registry;

pub use flight::SingleFlight;
pub use namespace::{Group, GroupBuilder, GroupStats, Loader, LoaderFn};
pub use peers::{PeerGetter, PeerPicker};
pub use registry::GroupRegistry;
