//! covid-cli
//! =========
//!
//! Command-line interface for the `covid-core` aggregation engine.
//!
//! This crate primarily provides a binary (`covid-cli`). We include a small
//! library target so that docs render an overview page.
//!
//! Basic usage:
//!
//! ```text
//! covid-cli --help
//! covid-cli countries
//! covid-cli country US --pretty
//! covid-cli top --by newConfirmed --limit 10
//! covid-cli --data-dir ./archived_time_series markers
//! ```
//!
//! For programmatic access use the [`covid-core`] crate directly.
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the primary
// deliverable.
