//! Core data models for zborg
//!
//! This module contains the data structures that describe the backup domain:
//! snapshot tiers, labels, archive destinations and retention policies.

pub mod destination;
pub mod label;
pub mod repository;
pub mod retention;
pub mod tier;

pub use destination::{Destination, DestinationKind};
pub use label::Label;
pub use repository::Repository;
pub use retention::RetentionPolicy;
pub use tier::Tier;
