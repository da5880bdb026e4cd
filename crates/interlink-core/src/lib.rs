//! # Interlink Core
//!
//! The annotation engine: finds known terms in HTML-ish text and wraps
//! them in links to the documents they name.
//!
//! ## Pipeline
//!
//! ```text
//! text ─▶ scan ─▶ annotate ─▶ restore ─▶ decorate ─▶ remove_self_links ─▶ text
//!          │          ▲           ▲
//!          │   CandidateCatalog   │
//!          └── RestorationTable ──┘
//! ```
//!
//! Everything runs synchronously on one document at a time. The
//! [`CandidateCatalog`] is an immutable snapshot that may be shared across
//! threads; [`AnnotationState`] lives for one call.
//!
//! ```rust
//! use interlink_config::{EntityKind, LinkerConfig};
//! use interlink_core::{annotate_document, CandidateCatalog, CandidateKind, DocumentContext, LinkCandidate};
//!
//! let catalog = CandidateCatalog::from_lists(
//!     vec![],
//!     vec![LinkCandidate::new("Rust", "https://example.com/rust/", CandidateKind::Post, None, 0)],
//!     vec![],
//!     vec![],
//! );
//! let context = DocumentContext::single(EntityKind::Post, "1", "https://example.com/hello/");
//! let out = annotate_document("I like Rust.", false, &context, &catalog, &LinkerConfig::default());
//! assert_eq!(out, r#"I like <a title="Rust" href="https://example.com/rust/">Rust</a>."#);
//! ```

pub mod annotate;
pub mod decorate;
pub mod error;
pub mod html;
pub mod pipeline;
pub mod protect;
pub mod provider;
pub mod ranges;
pub mod self_links;
pub mod types;
pub mod urls;

pub use annotate::annotate;
pub use decorate::decorate_external_links;
pub use error::{CatalogError, CatalogResult, ScanError};
pub use pipeline::{annotate_document, process_document, DocumentOutcome, Gate};
pub use protect::{restore, restore_with_zones, scan, ProtectedZone, RestorationTable, ZoneKind};
pub use provider::{custom_keyword_candidates, CandidateCatalogProvider, PermalinkResolver};
pub use ranges::ClaimedRanges;
pub use self_links::remove_self_links;
pub use types::{
    rank_candidates, AnnotationState, CandidateCatalog, CandidateGroup, CandidateKind,
    DocumentContext, GroupKind, LinkCandidate, RankKey,
};
