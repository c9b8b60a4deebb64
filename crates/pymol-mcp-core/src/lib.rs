//! # PyMOL MCP Core Library
//!
//! Exposes a molecular visualization engine to Model Context Protocol clients. Every tool is a
//! thin forwarding layer over the engine's command object; results and failures alike come back
//! as human-readable text, except for rendered images which come back as PNG bytes.
//!
//! ## Layers
//!
//! - **[`engine`]: The Command Object.** The [`engine::Engine`] trait lists the engine commands
//!   the server relies on. Backends (the embedded interpreter, or the recording mock used in
//!   tests) implement it.
//!
//! - **[`session`]: Lifecycle.** Starts the engine once, captures an initialization failure
//!   instead of propagating it, and shuts the engine down exactly once.
//!
//! - **[`tools`], [`prompts`], [`resources`]: The Registries.** What a client can call, which
//!   instruction templates it can request, and which read-only views it can fetch.
//!
//! - **[`mcp`]: The Protocol.** JSON-RPC envelopes, method dispatch and the stdio transport.
//!
//! [`config`] carries the server identity and engine startup parameters shared by all layers.

pub mod config;
pub mod engine;
pub mod mcp;
pub mod prompts;
pub mod resources;
pub mod session;
pub mod tools;
