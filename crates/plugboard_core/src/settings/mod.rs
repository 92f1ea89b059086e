//! Settings layer: enumerable sources, overridable stores, and the lazily
//! materialized runtime context.

pub mod context;
pub mod defaults;
pub mod source;
pub mod store;
