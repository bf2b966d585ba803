pub mod bindings;
pub mod snapshot;
