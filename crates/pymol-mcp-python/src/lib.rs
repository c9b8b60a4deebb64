//! # PyMOL Engine Backend
//!
//! Implements [`pymol_mcp::engine::Engine`] by embedding a CPython interpreter and driving the
//! `pymol.cmd` module through it. All calls take the GIL for their own duration only; the
//! interpreter itself lives for the rest of the process once launched.

mod engine;

pub use engine::PyMolEngine;
