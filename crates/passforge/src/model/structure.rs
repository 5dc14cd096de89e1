//! Style variants and the style-exclusive pass structure.
//!
//! A pass carries at most one style, and the style decides which extras are
//! reachable: only boarding passes have a transit type, only store cards have
//! an NFC payload. [`StyleStructure`] encodes that as a tagged union so a
//! descriptor can never hold two styles at once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::field::FieldGroup;
use crate::model::nfc::Nfc;

/// Pass category. Exactly one style key may be present in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassStyle {
    BoardingPass,
    Coupon,
    EventTicket,
    StoreCard,
    Generic,
}

impl PassStyle {
    /// All styles, in descriptor key order.
    pub const ALL: [PassStyle; 5] = [
        PassStyle::BoardingPass,
        PassStyle::Coupon,
        PassStyle::EventTicket,
        PassStyle::StoreCard,
        PassStyle::Generic,
    ];

    /// The descriptor key for this style.
    pub fn as_str(&self) -> &'static str {
        match self {
            PassStyle::BoardingPass => "boardingPass",
            PassStyle::Coupon => "coupon",
            PassStyle::EventTicket => "eventTicket",
            PassStyle::StoreCard => "storeCard",
            PassStyle::Generic => "generic",
        }
    }
}

impl fmt::Display for PassStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PassStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown pass style \"{s}\"")))
    }
}

/// Transit category of a boarding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitType {
    Air,
    Boat,
    Bus,
    Generic,
    Train,
}

impl TransitType {
    /// All transit types.
    pub const ALL: [TransitType; 5] = [
        TransitType::Air,
        TransitType::Boat,
        TransitType::Bus,
        TransitType::Generic,
        TransitType::Train,
    ];

    /// The wire name of this transit type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitType::Air => "Air",
            TransitType::Boat => "Boat",
            TransitType::Bus => "Bus",
            TransitType::Generic => "Generic",
            TransitType::Train => "Train",
        }
    }
}

impl fmt::Display for TransitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransitType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown transit type \"{s}\"")))
    }
}

/// The five display-field groups a style sub-object can carry.
///
/// Each group is created lazily on first mutable access and persists for the
/// lifetime of the structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    header: Option<FieldGroup>,
    primary: Option<FieldGroup>,
    secondary: Option<FieldGroup>,
    auxiliary: Option<FieldGroup>,
    back: Option<FieldGroup>,
}

macro_rules! field_set_accessors {
    ($($slot:ident: $get:ident, $get_mut:ident;)*) => {
        $(
            /// Read access to the group, `None` until first use.
            pub fn $get(&self) -> Option<&FieldGroup> {
                self.$slot.as_ref()
            }

            /// The group, created empty on first call.
            pub fn $get_mut(&mut self) -> &mut FieldGroup {
                self.$slot.get_or_insert_with(FieldGroup::new)
            }
        )*
    };
}

impl FieldSet {
    field_set_accessors! {
        header: header, header_mut;
        primary: primary, primary_mut;
        secondary: secondary, secondary_mut;
        auxiliary: auxiliary, auxiliary_mut;
        back: back, back_mut;
    }
}

/// Style-exclusive descriptor state.
///
/// One variant per style; replacing the style replaces the whole variant, so
/// stale field groups or extras from a previous style cannot linger.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleStructure {
    BoardingPass {
        fields: FieldSet,
        transit_type: Option<TransitType>,
    },
    Coupon {
        fields: FieldSet,
    },
    EventTicket {
        fields: FieldSet,
    },
    StoreCard {
        fields: FieldSet,
        /// Created empty when the pass enters the store-card style.
        nfc: Nfc,
    },
    Generic {
        fields: FieldSet,
    },
}

impl StyleStructure {
    /// Create the empty structure for a style.
    pub fn new(style: PassStyle) -> Self {
        let fields = FieldSet::default();
        match style {
            PassStyle::BoardingPass => StyleStructure::BoardingPass {
                fields,
                transit_type: None,
            },
            PassStyle::Coupon => StyleStructure::Coupon { fields },
            PassStyle::EventTicket => StyleStructure::EventTicket { fields },
            PassStyle::StoreCard => StyleStructure::StoreCard {
                fields,
                nfc: Nfc::default(),
            },
            PassStyle::Generic => StyleStructure::Generic { fields },
        }
    }

    /// The style this structure belongs to.
    pub fn style(&self) -> PassStyle {
        match self {
            StyleStructure::BoardingPass { .. } => PassStyle::BoardingPass,
            StyleStructure::Coupon { .. } => PassStyle::Coupon,
            StyleStructure::EventTicket { .. } => PassStyle::EventTicket,
            StyleStructure::StoreCard { .. } => PassStyle::StoreCard,
            StyleStructure::Generic { .. } => PassStyle::Generic,
        }
    }

    /// Read access to the field groups.
    pub fn fields(&self) -> &FieldSet {
        match self {
            StyleStructure::BoardingPass { fields, .. }
            | StyleStructure::Coupon { fields }
            | StyleStructure::EventTicket { fields }
            | StyleStructure::StoreCard { fields, .. }
            | StyleStructure::Generic { fields } => fields,
        }
    }

    /// Mutable access to the field groups.
    pub fn fields_mut(&mut self) -> &mut FieldSet {
        match self {
            StyleStructure::BoardingPass { fields, .. }
            | StyleStructure::Coupon { fields }
            | StyleStructure::EventTicket { fields }
            | StyleStructure::StoreCard { fields, .. }
            | StyleStructure::Generic { fields } => fields,
        }
    }
}
