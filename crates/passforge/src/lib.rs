//! Wallet pass bundle builder.
//!
//! Builds installable digital-wallet pass bundles: a `pass.json` descriptor,
//! localized string tables, and image variants, packed into a ZIP archive
//! together with a `manifest.json` of per-file digests and a detached
//! signature over that manifest.
//!
//! The descriptor model enforces the closed set of mutually exclusive pass
//! styles (boarding pass, coupon, event ticket, store card, generic) and the
//! field groups each style carries. Signing is pluggable: a local certificate
//! and private key, or a remote signing service.
//!
//! # Example
//!
//! ```no_run
//! use passforge::{Pass, PassBundle, PassImages, PassStyle, Field, SigningConfig};
//!
//! let mut pass = Pass::new();
//! pass.description = Some("Loyalty card".into());
//! pass.organization_name = Some("Example Org".into());
//! pass.pass_type_identifier = Some("pass.com.example.loyalty".into());
//! pass.serial_number = Some("0001".into());
//! pass.team_identifier = Some("TEAM123456".into());
//! pass.set_style(Some(PassStyle::StoreCard));
//! pass.primary_fields()?.add(Field::text("balance", "12.50").label("Balance"));
//!
//! let images = PassImages::load_dir("images")?;
//! let config = SigningConfig::local()
//!     .certificate_pem(std::fs::read("cert.pem")?)
//!     .private_key_pem(std::fs::read("key.pem")?);
//! let bundle = PassBundle::new(&pass, &images).build(&config)?;
//! std::fs::write("card.pkpass", bundle)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bundle;
pub mod error;
pub mod model;
pub mod sign;

pub use bundle::{
    CompressionLevel, ImageDensity, ImageKind, Localizations, Manifest, PassBundle, PassImages,
};
pub use error::Error;
pub use model::{
    Barcode, BarcodeFormat, Field, FieldGroup, FieldValue, Nfc, Pass, PassStyle, TransitType,
};
pub use sign::{LocalSigner, ManifestSigner, RemoteSigner, SigningConfig, SigningStrategy};

pub type Result<T> = std::result::Result<T, Error>;
