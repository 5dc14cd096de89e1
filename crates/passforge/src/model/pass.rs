//! The pass descriptor: top-level attributes plus the style structure.
//!
//! A [`Pass`] is built up through its public attributes and the style-gated
//! accessors, validated once, and then serialized to the `pass.json`
//! descriptor document by the bundle assembler.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::model::field::FieldGroup;
use crate::model::nfc::Nfc;
use crate::model::structure::{FieldSet, PassStyle, StyleStructure, TransitType};
use crate::Result;

/// Barcode symbology understood by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarcodeFormat {
    #[serde(rename = "PKBarcodeFormatQR")]
    Qr,
    #[serde(rename = "PKBarcodeFormatPDF417")]
    Pdf417,
    #[serde(rename = "PKBarcodeFormatAztec")]
    Aztec,
    #[serde(rename = "PKBarcodeFormatCode128")]
    Code128,
}

/// A scannable barcode shown on the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barcode {
    pub format: BarcodeFormat,
    /// Message encoded in the barcode.
    pub message: String,
    /// Text encoding of the message, almost always ISO-8859-1.
    pub message_encoding: String,
    /// Human-readable text shown near the barcode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

impl Barcode {
    /// Create a barcode with the default ISO-8859-1 message encoding.
    pub fn new(format: BarcodeFormat, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
            message_encoding: "iso-8859-1".to_string(),
            alt_text: None,
        }
    }

    /// Set the human-readable alternative text.
    pub fn alt_text(mut self, text: impl Into<String>) -> Self {
        self.alt_text = Some(text.into());
        self
    }
}

/// Minimum length of `authenticationToken` when a web service is configured.
const MIN_AUTH_TOKEN_LEN: usize = 16;

/// A wallet pass descriptor.
///
/// Top-level attributes are plain public fields; everything style-dependent
/// goes through the accessor methods, which enforce the style preconditions.
///
/// Mandatory attributes (checked by [`Pass::validate`], not at construction):
/// `description`, `organization_name`, `pass_type_identifier`,
/// `serial_number`, `team_identifier`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pass {
    pub description: Option<String>,
    pub organization_name: Option<String>,
    pub pass_type_identifier: Option<String>,
    pub serial_number: Option<String>,
    pub team_identifier: Option<String>,
    /// URL of the web service that serves pass updates. Requires
    /// `authentication_token`.
    pub web_service_url: Option<String>,
    /// Token the device presents to the web service. At least 16 characters.
    pub authentication_token: Option<String>,
    /// Text displayed next to the logo.
    pub logo_text: Option<String>,
    /// Foreground color, as a CSS-style `rgb(r, g, b)` string.
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub label_color: Option<String>,
    /// Date and time when the pass becomes relevant.
    pub relevant_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    /// Marks the pass as void, e.g. a redeemed one-time coupon.
    pub voided: Option<bool>,
    pub barcodes: Vec<Barcode>,
    structure: Option<StyleStructure>,
}

impl Pass {
    /// Create an empty pass with no style.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active style, if any.
    pub fn style(&self) -> Option<PassStyle> {
        self.structure.as_ref().map(|s| s.style())
    }

    /// Set or clear the pass style.
    ///
    /// Setting a style different from the current one replaces the whole
    /// style structure, dropping any field groups and extras the previous
    /// style held. Setting the already-active style keeps everything as is.
    /// Entering the store-card style creates an empty NFC payload as a side
    /// effect. `None` leaves the pass without a style.
    pub fn set_style(&mut self, style: Option<PassStyle>) {
        match style {
            None => self.structure = None,
            Some(style) => {
                if self.style() != Some(style) {
                    self.structure = Some(StyleStructure::new(style));
                }
            }
        }
    }

    /// Read-only access to the style structure.
    pub fn structure(&self) -> Option<&StyleStructure> {
        self.structure.as_ref()
    }

    /// The transit type of a boarding pass.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] unless the style is boarding pass.
    pub fn transit_type(&self) -> Result<Option<TransitType>> {
        match &self.structure {
            Some(StyleStructure::BoardingPass { transit_type, .. }) => Ok(*transit_type),
            _ => Err(self.not_a_boarding_pass()),
        }
    }

    /// Set or clear the transit type.
    ///
    /// On a pass with no style, setting a value first promotes the pass to
    /// the boarding-pass style; clearing is a no-op. On any other style this
    /// fails, including when clearing.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] when the pass has a style other than boarding
    /// pass.
    pub fn set_transit_type(&mut self, value: Option<TransitType>) -> Result<()> {
        if self.structure.is_none() {
            if value.is_none() {
                // Removing the transit type of an empty pass does nothing.
                return Ok(());
            }
            self.set_style(Some(PassStyle::BoardingPass));
        }
        match &mut self.structure {
            Some(StyleStructure::BoardingPass { transit_type, .. }) => {
                *transit_type = value;
                Ok(())
            }
            _ => Err(self.not_a_boarding_pass()),
        }
    }

    fn not_a_boarding_pass(&self) -> Error {
        Error::Precondition(format!(
            "transitType is only allowed in boarding passes, current pass is {}",
            self.style_name()
        ))
    }

    /// The NFC payload of a store card.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] unless the style is store card.
    pub fn nfc(&self) -> Result<&Nfc> {
        match &self.structure {
            Some(StyleStructure::StoreCard { nfc, .. }) => Ok(nfc),
            _ => Err(self.not_a_store_card()),
        }
    }

    /// Mutable access to the NFC payload of a store card.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] unless the style is store card.
    pub fn nfc_mut(&mut self) -> Result<&mut Nfc> {
        if !matches!(self.structure, Some(StyleStructure::StoreCard { .. })) {
            return Err(self.not_a_store_card());
        }
        match &mut self.structure {
            Some(StyleStructure::StoreCard { nfc, .. }) => Ok(nfc),
            _ => unreachable!(),
        }
    }

    fn not_a_store_card(&self) -> Error {
        Error::Precondition(format!(
            "NFC fields are only available for storeCard passes, current is {}",
            self.style_name()
        ))
    }

    fn style_name(&self) -> String {
        match self.style() {
            Some(style) => style.to_string(),
            None => "undefined".to_string(),
        }
    }

    /// The header field group, created empty on first access.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] when the pass has no style.
    pub fn header_fields(&mut self) -> Result<&mut FieldGroup> {
        Ok(self.fields_mut()?.header_mut())
    }

    /// The primary field group, created empty on first access.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] when the pass has no style.
    pub fn primary_fields(&mut self) -> Result<&mut FieldGroup> {
        Ok(self.fields_mut()?.primary_mut())
    }

    /// The secondary field group, created empty on first access.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] when the pass has no style.
    pub fn secondary_fields(&mut self) -> Result<&mut FieldGroup> {
        Ok(self.fields_mut()?.secondary_mut())
    }

    /// The auxiliary field group, created empty on first access.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] when the pass has no style.
    pub fn auxiliary_fields(&mut self) -> Result<&mut FieldGroup> {
        Ok(self.fields_mut()?.auxiliary_mut())
    }

    /// The back field group, created empty on first access.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] when the pass has no style.
    pub fn back_fields(&mut self) -> Result<&mut FieldGroup> {
        Ok(self.fields_mut()?.back_mut())
    }

    fn fields_mut(&mut self) -> Result<&mut FieldSet> {
        match &mut self.structure {
            Some(structure) => Ok(structure.fields_mut()),
            None => Err(Error::Precondition(
                "pass style is undefined, set the pass style before accessing structure fields"
                    .to_string(),
            )),
        }
    }

    /// Check the pass for completeness.
    ///
    /// Fails on the first absent mandatory attribute, then enforces the
    /// `webServiceURL` / `authenticationToken` pairing.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingField`] naming the first absent mandatory attribute
    /// - [`Error::Validation`] when `webServiceURL` is set without a token
    /// - [`Error::TokenTooShort`] when the token is under 16 characters
    /// - [`Error::UnexpectedField`] when a token is set without a URL
    pub fn validate(&self) -> Result<()> {
        let mandatory: [(&str, &Option<String>); 5] = [
            ("description", &self.description),
            ("organizationName", &self.organization_name),
            ("passTypeIdentifier", &self.pass_type_identifier),
            ("serialNumber", &self.serial_number),
            ("teamIdentifier", &self.team_identifier),
        ];
        for (name, value) in mandatory {
            if value.is_none() {
                return Err(Error::MissingField(name.to_string()));
            }
        }

        // authenticationToken and webServiceURL must be either both or none.
        if self.web_service_url.is_some() {
            match &self.authentication_token {
                None => {
                    return Err(Error::Validation(
                        "webServiceURL is present but authenticationToken is missing".to_string(),
                    ))
                }
                Some(token) if token.len() < MIN_AUTH_TOKEN_LEN => {
                    return Err(Error::TokenTooShort(token.len()))
                }
                Some(_) => {}
            }
        } else if self.authentication_token.is_some() {
            return Err(Error::UnexpectedField(
                "authenticationToken is present while webServiceURL is missing".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse a pass from a descriptor JSON document.
    ///
    /// The document may be partial; mandatory attributes are only enforced by
    /// [`Pass::validate`]. Field groups are copied in source order, duplicate
    /// keys collapsing through [`FieldGroup::add`].
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: RawPass = serde_json::from_slice(data)?;
        Self::from_raw(raw)
    }

    /// Serialize the pass to the descriptor JSON document.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn from_raw(raw: RawPass) -> Result<Self> {
        let mut present: Vec<(PassStyle, RawStructure)> = Vec::new();
        let RawPass {
            description,
            organization_name,
            pass_type_identifier,
            serial_number,
            team_identifier,
            web_service_url,
            authentication_token,
            logo_text,
            foreground_color,
            background_color,
            label_color,
            relevant_date,
            expiration_date,
            voided,
            barcodes,
            nfc,
            boarding_pass,
            coupon,
            event_ticket,
            store_card,
            generic,
            ..
        } = raw;

        if let Some(s) = boarding_pass {
            present.push((PassStyle::BoardingPass, s));
        }
        if let Some(s) = coupon {
            present.push((PassStyle::Coupon, s));
        }
        if let Some(s) = event_ticket {
            present.push((PassStyle::EventTicket, s));
        }
        if let Some(s) = store_card {
            present.push((PassStyle::StoreCard, s));
        }
        if let Some(s) = generic {
            present.push((PassStyle::Generic, s));
        }
        if present.len() > 1 {
            return Err(Error::Validation(format!(
                "descriptor contains {} style keys, at most one is allowed",
                present.len()
            )));
        }

        let mut pass = Pass {
            description,
            organization_name,
            pass_type_identifier,
            serial_number,
            team_identifier,
            web_service_url,
            authentication_token,
            logo_text,
            foreground_color,
            background_color,
            label_color,
            relevant_date,
            expiration_date,
            voided,
            barcodes,
            structure: None,
        };

        if let Some((style, raw_structure)) = present.pop() {
            pass.set_style(Some(style));
            if style == PassStyle::BoardingPass {
                if let Some(transit) = raw_structure.transit_type {
                    pass.set_transit_type(Some(transit))?;
                }
            }
            if let Some(nfc) = nfc {
                match pass.nfc_mut() {
                    Ok(slot) => *slot = nfc,
                    Err(_) => warn!("ignoring nfc payload on a {style} pass"),
                }
            }

            // Copy each present source group into the lazily-created
            // destination group, preserving source order.
            let fields = pass.fields_mut()?;
            fn copy_group(source: Option<FieldGroup>, destination: &mut FieldGroup) {
                if let Some(group) = source {
                    for field in &group {
                        destination.add(field.clone());
                    }
                }
            }
            if raw_structure.header_fields.is_some() {
                copy_group(raw_structure.header_fields, fields.header_mut());
            }
            if raw_structure.primary_fields.is_some() {
                copy_group(raw_structure.primary_fields, fields.primary_mut());
            }
            if raw_structure.secondary_fields.is_some() {
                copy_group(raw_structure.secondary_fields, fields.secondary_mut());
            }
            if raw_structure.auxiliary_fields.is_some() {
                copy_group(raw_structure.auxiliary_fields, fields.auxiliary_mut());
            }
            if raw_structure.back_fields.is_some() {
                copy_group(raw_structure.back_fields, fields.back_mut());
            }
        } else if nfc.is_some() {
            warn!("ignoring nfc payload on a pass without a storeCard style");
        }

        Ok(pass)
    }

    fn to_raw(&self) -> RawPass {
        let mut raw = RawPass {
            format_version: Some(1),
            description: self.description.clone(),
            organization_name: self.organization_name.clone(),
            pass_type_identifier: self.pass_type_identifier.clone(),
            serial_number: self.serial_number.clone(),
            team_identifier: self.team_identifier.clone(),
            web_service_url: self.web_service_url.clone(),
            authentication_token: self.authentication_token.clone(),
            logo_text: self.logo_text.clone(),
            foreground_color: self.foreground_color.clone(),
            background_color: self.background_color.clone(),
            label_color: self.label_color.clone(),
            relevant_date: self.relevant_date,
            expiration_date: self.expiration_date,
            voided: self.voided,
            barcodes: self.barcodes.clone(),
            ..RawPass::default()
        };

        if let Some(structure) = &self.structure {
            let mut raw_structure = RawStructure::from_fields(structure.fields());
            match structure {
                StyleStructure::BoardingPass { transit_type, .. } => {
                    raw_structure.transit_type = *transit_type;
                    raw.boarding_pass = Some(raw_structure);
                }
                StyleStructure::Coupon { .. } => raw.coupon = Some(raw_structure),
                StyleStructure::EventTicket { .. } => raw.event_ticket = Some(raw_structure),
                StyleStructure::StoreCard { nfc, .. } => {
                    raw.store_card = Some(raw_structure);
                    if !nfc.is_empty() {
                        raw.nfc = Some(nfc.clone());
                    }
                }
                StyleStructure::Generic { .. } => raw.generic = Some(raw_structure),
            }
        }

        raw
    }
}

impl Serialize for Pass {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Pass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawPass::deserialize(deserializer)?;
        Pass::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

/// Serde mirror of the descriptor wire format.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPass {
    #[serde(skip_serializing_if = "Option::is_none")]
    format_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pass_type_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_identifier: Option<String>,
    #[serde(rename = "webServiceURL", skip_serializing_if = "Option::is_none")]
    web_service_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authentication_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    foreground_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relevant_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    voided: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    barcodes: Vec<Barcode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nfc: Option<Nfc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    boarding_pass: Option<RawStructure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coupon: Option<RawStructure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_ticket: Option<RawStructure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_card: Option<RawStructure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generic: Option<RawStructure>,
}

/// Serde mirror of a style sub-object.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStructure {
    #[serde(skip_serializing_if = "Option::is_none")]
    transit_type: Option<TransitType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_fields: Option<FieldGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_fields: Option<FieldGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secondary_fields: Option<FieldGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auxiliary_fields: Option<FieldGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    back_fields: Option<FieldGroup>,
}

impl RawStructure {
    fn from_fields(fields: &FieldSet) -> Self {
        fn non_empty(group: Option<&FieldGroup>) -> Option<FieldGroup> {
            group.filter(|g| !g.is_empty()).cloned()
        }
        Self {
            transit_type: None,
            header_fields: non_empty(fields.header()),
            primary_fields: non_empty(fields.primary()),
            secondary_fields: non_empty(fields.secondary()),
            auxiliary_fields: non_empty(fields.auxiliary()),
            back_fields: non_empty(fields.back()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::{Field, FieldValue};

    fn complete_pass() -> Pass {
        let mut pass = Pass::new();
        pass.description = Some("Boarding pass".into());
        pass.organization_name = Some("Example Air".into());
        pass.pass_type_identifier = Some("pass.com.example.boarding".into());
        pass.serial_number = Some("SN-001".into());
        pass.team_identifier = Some("TEAM123456".into());
        pass
    }

    #[test]
    fn test_set_style_replaces_previous_style() {
        let mut pass = Pass::new();
        pass.set_style(Some(PassStyle::BoardingPass));
        pass.header_fields().unwrap().add(Field::text("gate", "22"));

        pass.set_style(Some(PassStyle::Coupon));
        assert_eq!(pass.style(), Some(PassStyle::Coupon));
        // Groups from the previous style are gone.
        assert!(pass.header_fields().unwrap().is_empty());
    }

    #[test]
    fn test_set_same_style_is_a_no_op() {
        let mut pass = Pass::new();
        pass.set_style(Some(PassStyle::StoreCard));
        pass.primary_fields()
            .unwrap()
            .add(Field::text("balance", "12.50"));

        pass.set_style(Some(PassStyle::StoreCard));
        assert_eq!(pass.primary_fields().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_style() {
        let mut pass = Pass::new();
        pass.set_style(Some(PassStyle::Generic));
        pass.set_style(None);
        assert_eq!(pass.style(), None);
        assert!(pass.header_fields().is_err());
    }

    #[test]
    fn test_transit_type_requires_boarding_pass() {
        let mut pass = Pass::new();
        pass.set_style(Some(PassStyle::Coupon));

        let err = pass.transit_type().unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
        assert!(err.to_string().contains("coupon"));

        // Clearing on a non-boarding style fails too.
        let err = pass.set_transit_type(None).unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_set_transit_type_promotes_empty_pass() {
        let mut pass = Pass::new();
        pass.set_transit_type(Some(TransitType::Air)).unwrap();
        assert_eq!(pass.style(), Some(PassStyle::BoardingPass));
        assert_eq!(pass.transit_type().unwrap(), Some(TransitType::Air));
    }

    #[test]
    fn test_clear_transit_type_on_empty_pass_is_a_no_op() {
        let mut pass = Pass::new();
        pass.set_transit_type(None).unwrap();
        assert_eq!(pass.style(), None);
    }

    #[test]
    fn test_clear_transit_type_on_boarding_pass() {
        let mut pass = Pass::new();
        pass.set_transit_type(Some(TransitType::Train)).unwrap();
        pass.set_transit_type(None).unwrap();
        assert_eq!(pass.transit_type().unwrap(), None);
        assert_eq!(pass.style(), Some(PassStyle::BoardingPass));
    }

    #[test]
    fn test_nfc_requires_store_card() {
        let mut pass = Pass::new();
        pass.set_style(Some(PassStyle::EventTicket));
        let err = pass.nfc().unwrap_err();
        assert!(matches!(err, Error::Precondition(_)));
    }

    #[test]
    fn test_store_card_gets_empty_nfc_payload() {
        let mut pass = Pass::new();
        pass.set_style(Some(PassStyle::StoreCard));
        assert!(pass.nfc().unwrap().is_empty());

        pass.nfc_mut().unwrap().message = "hello".into();
        assert_eq!(pass.nfc().unwrap().message, "hello");
    }

    #[test]
    fn test_field_groups_require_a_style() {
        let mut pass = Pass::new();
        for accessor in [
            Pass::header_fields,
            Pass::primary_fields,
            Pass::secondary_fields,
            Pass::auxiliary_fields,
            Pass::back_fields,
        ] {
            let err = accessor(&mut pass).unwrap_err();
            assert!(matches!(err, Error::Precondition(_)));
        }
    }

    #[test]
    fn test_validate_names_first_missing_field() {
        let mut pass = complete_pass();
        pass.serial_number = None;
        match pass.validate().unwrap_err() {
            Error::MissingField(name) => assert_eq!(name, "serialNumber"),
            other => panic!("expected MissingField, got {other:?}"),
        }

        // description comes first in the mandatory ordering.
        let mut pass = complete_pass();
        pass.description = None;
        pass.serial_number = None;
        match pass.validate().unwrap_err() {
            Error::MissingField(name) => assert_eq!(name, "description"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_web_service_requires_token() {
        let mut pass = complete_pass();
        pass.web_service_url = Some("https://example.com/passes".into());
        assert!(matches!(
            pass.validate().unwrap_err(),
            Error::Validation(_)
        ));
    }

    #[test]
    fn test_validate_short_token() {
        let mut pass = complete_pass();
        pass.web_service_url = Some("https://x".into());
        pass.authentication_token = Some("short".into());
        match pass.validate().unwrap_err() {
            Error::TokenTooShort(len) => assert_eq!(len, 5),
            other => panic!("expected TokenTooShort, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_token_without_url() {
        let mut pass = complete_pass();
        pass.authentication_token = Some("0123456789abcdef".into());
        assert!(matches!(
            pass.validate().unwrap_err(),
            Error::UnexpectedField(_)
        ));
    }

    #[test]
    fn test_validate_complete_pass() {
        let mut pass = complete_pass();
        pass.web_service_url = Some("https://example.com/passes".into());
        pass.authentication_token = Some("0123456789abcdef".into());
        pass.validate().unwrap();
    }

    #[test]
    fn test_serialized_descriptor_shape() {
        let mut pass = complete_pass();
        pass.set_style(Some(PassStyle::BoardingPass));
        pass.set_transit_type(Some(TransitType::Air)).unwrap();
        pass.primary_fields()
            .unwrap()
            .add(Field::text("origin", "SFO").label("From"))
            .add(Field::text("destination", "JFK").label("To"));
        // An accessed-but-empty group is omitted from the descriptor.
        pass.back_fields().unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&pass.to_json().unwrap()).unwrap();
        assert_eq!(value["formatVersion"], 1);
        assert_eq!(value["boardingPass"]["transitType"], "Air");
        assert_eq!(
            value["boardingPass"]["primaryFields"][0]["key"],
            "origin"
        );
        assert!(value["boardingPass"].get("backFields").is_none());
        assert!(value.get("coupon").is_none());
        assert!(value.get("nfc").is_none());
    }

    #[test]
    fn test_nfc_serializes_at_top_level() {
        let mut pass = complete_pass();
        pass.set_style(Some(PassStyle::StoreCard));
        pass.nfc_mut().unwrap().message = "nfc-message".into();

        let value: serde_json::Value =
            serde_json::from_slice(&pass.to_json().unwrap()).unwrap();
        assert_eq!(value["nfc"]["message"], "nfc-message");
        assert!(value["storeCard"].get("nfc").is_none());
    }

    #[test]
    fn test_descriptor_round_trip_preserves_groups() {
        let mut pass = complete_pass();
        pass.set_style(Some(PassStyle::EventTicket));
        pass.primary_fields()
            .unwrap()
            .add(Field::text("event", "Concert"))
            .add(Field::text("venue", "Main Hall"));
        pass.auxiliary_fields()
            .unwrap()
            .add(Field::new("row", 7i64));
        pass.barcodes
            .push(Barcode::new(BarcodeFormat::Qr, "ticket-001"));

        let restored = Pass::from_json(&pass.to_json().unwrap()).unwrap();
        assert_eq!(restored.style(), Some(PassStyle::EventTicket));

        let fields = restored.structure().unwrap().fields();
        let keys: Vec<&str> = fields
            .primary()
            .unwrap()
            .iter()
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(keys, ["event", "venue"]);
        assert_eq!(
            fields.auxiliary().unwrap().get("row").unwrap().value,
            FieldValue::Number(7.0)
        );
        assert_eq!(restored.barcodes, pass.barcodes);
    }

    #[test]
    fn test_from_json_boarding_pass_with_transit() {
        let pass = Pass::from_json(
            br#"{
                "description": "d",
                "boardingPass": {
                    "transitType": "Bus",
                    "headerFields": [{"key": "gate", "value": "7"}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(pass.style(), Some(PassStyle::BoardingPass));
        assert_eq!(pass.transit_type().unwrap(), Some(TransitType::Bus));
        assert_eq!(
            pass.structure().unwrap().fields().header().unwrap().len(),
            1
        );
    }

    #[test]
    fn test_from_json_store_card_with_nfc() {
        let pass = Pass::from_json(
            br#"{"storeCard": {}, "nfc": {"message": "m", "encryptionPublicKey": "k"}}"#,
        )
        .unwrap();
        assert_eq!(pass.nfc().unwrap().message, "m");
        assert_eq!(
            pass.nfc().unwrap().encryption_public_key.as_deref(),
            Some("k")
        );
    }

    #[test]
    fn test_from_json_rejects_multiple_styles() {
        let err = Pass::from_json(br#"{"coupon": {}, "generic": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_from_json_invalid_transit_type() {
        let err = Pass::from_json(br#"{"boardingPass": {"transitType": "Rocket"}}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_json_duplicate_field_keys_collapse() {
        let pass = Pass::from_json(
            br#"{
                "generic": {
                    "primaryFields": [
                        {"key": "a", "value": "1"},
                        {"key": "b", "value": "2"},
                        {"key": "a", "value": "3"}
                    ]
                }
            }"#,
        )
        .unwrap();
        let group = pass.structure().unwrap().fields().primary().unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.get("a").unwrap().value, FieldValue::Text("3".into()));
    }
}
