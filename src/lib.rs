//! `emlShell` is a terminal viewer for single `.eml` messages.
//!
//! This crate provides the message viewer (parsing off the UI thread,
//! presentation, attachment actions), the drop-zone page that feeds it, and
//! the terminal UI built on top of both.

pub mod config;
pub mod error;
pub mod export;
pub mod i18n;
pub mod model;
pub mod page;
pub mod parser;
pub mod tui;
pub mod viewer;
