//! Manifest signing strategies and configuration.
//!
//! Both strategies are polymorphic over one capability, turning manifest
//! bytes into detached signature bytes, and the strategy is selected once
//! per bundle build from a [`SigningConfig`] constructed at startup.

pub mod local;
pub mod remote;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretVec};

use crate::error::Error;
use crate::Result;

pub use local::LocalSigner;
pub use remote::RemoteSigner;

/// Capability of producing a detached signature over manifest bytes.
pub trait ManifestSigner: std::fmt::Debug {
    /// Sign the exact manifest byte sequence.
    fn sign(&self, manifest: &[u8]) -> Result<Vec<u8>>;
}

/// Which signing strategy a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStrategy {
    /// Sign locally with a configured certificate and private key.
    Local,
    /// Delegate signing to a remote service over HTTP.
    Remote,
}

/// Signing configuration, constructed explicitly at startup and passed into
/// every bundle build.
///
/// # Examples
///
/// ```no_run
/// use passforge::SigningConfig;
///
/// let local = SigningConfig::local()
///     .certificate_pem(std::fs::read("cert.pem")?)
///     .private_key_pem(std::fs::read("key.pem")?);
///
/// let remote = SigningConfig::remote("https://signer.example.com/api/sign-manifest")
///     .headers_spec("authorization=Bearer abc123;x-team=ops");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct SigningConfig {
    strategy: SigningStrategy,
    certificate_pem: Option<Vec<u8>>,
    private_key_pem: Option<SecretVec<u8>>,
    chain_pem: Vec<Vec<u8>>,
    endpoint: Option<String>,
    extra_headers: Vec<(String, String)>,
    timeout: Duration,
}

impl SigningConfig {
    /// Default timeout for the remote signing request.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Configuration for local certificate signing.
    pub fn local() -> Self {
        Self {
            strategy: SigningStrategy::Local,
            certificate_pem: None,
            private_key_pem: None,
            chain_pem: Vec::new(),
            endpoint: None,
            extra_headers: Vec::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Configuration for remote signing against a service endpoint.
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            strategy: SigningStrategy::Remote,
            certificate_pem: None,
            private_key_pem: None,
            chain_pem: Vec::new(),
            endpoint: Some(endpoint.into()),
            extra_headers: Vec::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the PEM-encoded signing certificate (local strategy).
    pub fn certificate_pem(mut self, pem: Vec<u8>) -> Self {
        self.certificate_pem = Some(pem);
        self
    }

    /// Set the PEM-encoded PKCS#8 private key (local strategy).
    ///
    /// The key material is held behind [`secrecy::SecretVec`] so it never
    /// appears in debug output.
    pub fn private_key_pem(mut self, pem: Vec<u8>) -> Self {
        self.private_key_pem = Some(SecretVec::new(pem));
        self
    }

    /// Add a PEM-encoded intermediate certificate to the signature chain
    /// (local strategy). May be called repeatedly.
    pub fn chain_certificate_pem(mut self, pem: Vec<u8>) -> Self {
        self.chain_pem.push(pem);
        self
    }

    /// Add one extra header sent with the remote signing request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Add extra headers from a semicolon-separated `name=value` spec string,
    /// e.g. `"authorization=Bearer abc;x-team=ops"`. Entries without an `=`
    /// are skipped.
    pub fn headers_spec(mut self, spec: &str) -> Self {
        for entry in spec.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once('=') {
                Some((name, value)) => {
                    self.extra_headers
                        .push((name.trim().to_string(), value.trim().to_string()));
                }
                None => log::warn!("skipping malformed header entry \"{entry}\""),
            }
        }
        self
    }

    /// Set the remote request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The selected strategy.
    pub fn strategy(&self) -> SigningStrategy {
        self.strategy
    }

    /// Resolve the configured strategy into a signer.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingCredentials`] naming the certificate or private key
    ///   when the local strategy is missing either, or naming the endpoint
    ///   when the remote strategy has none.
    /// - [`Error::Certificate`] when the local key material does not parse.
    pub fn signer(&self) -> Result<Box<dyn ManifestSigner>> {
        match self.strategy {
            SigningStrategy::Local => {
                let certificate = self
                    .certificate_pem
                    .as_deref()
                    .ok_or_else(|| Error::MissingCredentials("certificate".to_string()))?;
                let private_key = self
                    .private_key_pem
                    .as_ref()
                    .ok_or_else(|| Error::MissingCredentials("private key".to_string()))?;
                Ok(Box::new(LocalSigner::from_pem(
                    certificate,
                    private_key.expose_secret(),
                    &self.chain_pem,
                )?))
            }
            SigningStrategy::Remote => {
                let endpoint = self
                    .endpoint
                    .clone()
                    .ok_or_else(|| Error::MissingCredentials("signing endpoint".to_string()))?;
                Ok(Box::new(RemoteSigner::new(
                    endpoint,
                    &self.extra_headers,
                    self.timeout,
                )?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_config_requires_certificate_first() {
        let err = SigningConfig::local().signer().unwrap_err();
        match err {
            Error::MissingCredentials(what) => assert_eq!(what, "certificate"),
            other => panic!("expected MissingCredentials, got {other:?}"),
        }
    }

    #[test]
    fn test_local_config_names_missing_key() {
        let err = SigningConfig::local()
            .certificate_pem(b"pem".to_vec())
            .signer()
            .unwrap_err();
        match err {
            Error::MissingCredentials(what) => assert_eq!(what, "private key"),
            other => panic!("expected MissingCredentials, got {other:?}"),
        }
    }

    #[test]
    fn test_headers_spec_parsing() {
        let config = SigningConfig::remote("https://example.com/sign")
            .headers_spec(" authorization=Bearer abc ; x-team=ops ;; malformed ");

        assert_eq!(
            config.extra_headers,
            vec![
                ("authorization".to_string(), "Bearer abc".to_string()),
                ("x-team".to_string(), "ops".to_string()),
            ]
        );
    }

    #[test]
    fn test_strategy_flag() {
        assert_eq!(SigningConfig::local().strategy(), SigningStrategy::Local);
        assert_eq!(
            SigningConfig::remote("https://x").strategy(),
            SigningStrategy::Remote
        );
    }
}
