//! Text transformations shared by the header and field rewriting commands.

pub mod string_ops;
