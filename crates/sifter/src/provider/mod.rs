//! Search provider catalog.
//!
//! Each provider is a [`ProviderSpec`]: where to send the query, which
//! headers to send, how long to wait, and a [`ResultRule`] describing how its
//! result page is read. Behavior differences between providers live in this
//! table, not in code branches.

mod order;
mod registry;
mod spec;

pub use order::ProviderOrder;
pub use registry::{DEFAULT_FALLBACK_ORDER, DEFAULT_PRIMARY, ProviderRegistry};
pub use spec::{ProviderSpec, ResultRule, UserAgent};
