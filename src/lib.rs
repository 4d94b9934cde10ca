//! Estante application library: the book catalog modules.

pub mod modules;
