//! # test-namer-rs: Sentinel-Driven Test File Naming
//!
//! Renames Python test modules so that their file names encode the domain
//! metadata declared by the code they exercise. Each module may declare a
//! module-level list (the *sentinel*, `DOMAINS` by default):
//!
//! ```python
//! DOMAINS = ["parser", "imports"]
//! ```
//!
//! Test files are grouped by the slug of their sentinels and numbered within
//! each group, producing names such as `test_parser_imports_0001.py`.
//!
//! - **Direct mode**: a test file's own sentinel decides its name
//! - **Aggregation mode**: sentinels are collected from every module under a
//!   root import prefix that the test file imports, statically, including
//!   relative, wildcard and constant dynamic imports
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       NamerEngine                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  naming            │  resolve             │  sentinel    │
//! │ • ProposalBuilder  │ • SentinelAggregator │ • Extractor  │
//! │ • RenameApplier    │ • ImportResolver     │              │
//! │ • Slug rules       │ • ModuleLocator      │              │
//! ├──────────────────────────────────────────────────────────┤
//! │  lang::python (tree-sitter)  │  core (config, errors, fs) │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use test_namer_rs::{NamerConfig, NamerEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NamerConfig::new("tests").with_aggregation("mypkg", ".");
//!     let engine = NamerEngine::new(config)?;
//!
//!     let proposals = engine.build_proposals()?;
//!     engine.write_dry_run(&proposals, &mut std::io::stdout())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

// Shared infrastructure
pub mod core {
    //! Configuration, errors and filesystem helpers.

    pub mod config;
    pub mod errors;
    pub mod file_utils;
}

// Tree-sitter language support
pub mod lang {
    //! Language parsing and syntax helpers.

    pub mod python;
}

pub mod sentinel {
    //! Sentinel list extraction.

    pub mod extractor;
}

// Import graph resolution
pub mod resolve {
    //! Static import discovery, module location and sentinel aggregation.

    pub mod aggregate;
    pub mod dynamic;
    pub mod imports;
    pub mod module_locator;
}

pub mod naming {
    //! Slugs, proposals, dry-run output and renaming.

    pub mod apply;
    pub mod proposals;
    pub mod report;
    pub mod slug;
}

// Public API and engine interface
pub mod api {
    //! High-level engine interface.

    pub mod engine;
}

// Re-export primary types for convenience
pub use api::engine::NamerEngine;
pub use core::config::NamerConfig;
pub use core::errors::{NamerError, Result};
pub use naming::apply::{apply_renames, RenameApplier, RenameReport};
pub use naming::proposals::{build_proposals, Proposal, ProposalBuilder};
pub use resolve::aggregate::SentinelAggregator;
pub use resolve::imports::ImportResolver;
pub use sentinel::extractor::SentinelExtractor;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
