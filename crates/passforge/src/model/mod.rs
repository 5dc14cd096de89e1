//! Pass descriptor data model.
//!
//! The model mirrors the wire format of the descriptor document: top-level
//! attributes on [`Pass`], a single style-exclusive structure carrying the
//! display [`FieldGroup`]s, and the style-specific extras (transit type for
//! boarding passes, NFC payload for store cards).

pub mod field;
pub mod nfc;
pub mod pass;
pub mod structure;

pub use field::{DateTimeStyle, Field, FieldGroup, FieldValue, TextAlignment};
pub use nfc::Nfc;
pub use pass::{Barcode, BarcodeFormat, Pass};
pub use structure::{FieldSet, PassStyle, StyleStructure, TransitType};
