//! Core state engine for data-center rack walkthrough inspections.
//!
//! The crate is organized around [`session::WalkthroughSession`], the in-memory
//! state container that tracks which racks an operator has added to a
//! walkthrough, which device sections they inspect per rack, the values they
//! record per field, and the tri-state "found issues" answer that gates
//! submission. Everything else supports that engine:
//!
//! - [`schema`]: form schema types and the [`schema::SchemaProvider`] seam
//! - [`value`]: typed field values validated at write time
//! - [`catalog`]: the built-in section catalog and facility directory
//! - [`submit`]: the [`submit::SubmissionSink`] contract and snapshot capture
//! - [`flow`]: walkthrough lifecycle from facility entry to confirmation
//! - [`report`]: read-side inspection, issue, and report records
//! - [`identity`]: operator profiles and the sign-in gateway
//! - [`config`]: TOML configuration for facilities, sections, and operators

pub mod catalog;
pub mod config;
pub mod flow;
pub mod identity;
pub mod report;
pub mod schema;
pub mod session;
pub mod submit;
pub mod value;

pub use catalog::default_provider;
pub use schema::{FieldType, FormField, FormSection, SchemaProvider, SectionCatalog};
pub use session::{RackId, SessionError, ValidationError, WalkthroughAction, WalkthroughSession};
pub use submit::{SubmissionReceipt, SubmissionSink, WalkthroughSnapshot};
pub use value::FieldValue;
