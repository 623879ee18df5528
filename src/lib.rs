//! Collapse runs of consecutive blank lines in text documents.
//!
//! The core is a single pure transform ([`collapse::collapse`]) plus three
//! operations over a host-owned document: preview, apply (which stores a
//! single-slot undo snapshot), and undo. Everything host-specific sits
//! behind the [`engine::DocumentHost`] trait; the CLI binary is one such
//! host, treating a file path as the active document.

pub mod cli;
pub mod collapse;
pub mod config;
pub mod engine;
pub mod history;
pub mod host;
