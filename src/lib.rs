//! Treemarks: a bookmark tree engine.
//!
//! JSON document storage, tree mutation, Netscape bookmark import/export,
//! URL-based dedup/merge and dead-link probing. The library backs the
//! `treemarks-rpc` binary and the integration tests.

pub mod app;
pub mod engine;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod store;
pub mod types;
