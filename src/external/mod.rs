//! Clients for services outside this crate.

pub mod backend;
