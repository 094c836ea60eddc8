//! A lightweight mock HTTP server that mimics the apimock control api.
//! Records every request it receives so tests can assert on what a client
//! actually sent over the wire.

mod server;

pub use server::*;
