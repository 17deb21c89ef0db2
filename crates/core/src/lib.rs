//! # Report Core
//!
//! Screen state and document logic for the clinic report application.
//!
//! This crate contains:
//! - The session gate (credential checks, token storage, display identity)
//! - The report composer (form fields, rich-text sections, validation)
//! - The printable report view and its PDF export
//!
//! **No transport concerns**: HTTP calls live in `api-client` behind traits, and configuration
//! is resolved by the binary and passed in as [`AppConfig`].

pub mod composer;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod form;
pub mod notifications;
pub mod printable;
pub mod rich_text;
pub mod route;
pub mod session;
pub mod validation;

pub use composer::ReportComposer;
pub use config::AppConfig;
pub use error::{ReportError, ReportResult};
pub use export::{ExportedReport, ReportExporter};
pub use form::{Field, ReportFormData};
pub use notifications::{Notification, NotificationVariant, Notifications};
pub use printable::PrintableView;
pub use route::Route;
pub use session::{FileStorage, Identity, LocalStorage, SessionGate};
pub use validation::ValidationErrors;
