//! Plugin layer: hook resolution, extension managers, and the registry.
//!
//! Resolution turns a dotted hook string into one validated manager; the
//! registry aggregates managers and gates workflow lookups behind two-phase
//! readiness. The module-host capability is the only piece supplied by the
//! host environment.

pub mod host;
pub mod manager;
pub mod registry;
pub mod resolver;
pub mod workflow;
