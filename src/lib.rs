//! # tinykv
//!
//! A minimal in-memory key-value server speaking the Redis request encoding
//! (arrays of bulk strings). It answers PING, ECHO, SET (with an optional
//! millisecond expiry) and GET from a single mutex-guarded key space shared
//! by every connection.

pub mod command;
pub mod config;
pub mod connection;
pub mod error;
pub mod resp;
pub mod server;
pub mod store;
