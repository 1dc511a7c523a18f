//! Configuration sources, added to the builder in precedence order.

pub(crate) mod environment;
pub(crate) mod global_file;
pub(crate) mod workspace_file;
