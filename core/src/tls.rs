//! Extracts certificate/key byte pairs from Secret data and resolves a list
//! of `(secretName, hosts)` entries into runway [`Certificate`]s, warning
//! rather than failing on any per-entry problem.

use crate::config::Certificate;

pub const TLS_CERT_KEY: &str = "tls.crt";
pub const TLS_PRIVATE_KEY: &str = "tls.key";

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum TlsError {
    #[error("secret is missing the {TLS_CERT_KEY} entry")]
    MissingCert,
    #[error("secret is missing the {TLS_PRIVATE_KEY} entry")]
    MissingKey,
}

/// Raw Secret data as held by the store, decoupled from any k8s-openapi
/// type so this crate stays cluster-client-free.
#[derive(Clone, Debug, Default)]
pub struct SecretData {
    pub cert: Option<Vec<u8>>,
    pub key: Option<Vec<u8>>,
}

/// Abstraction over "look up a Secret's data by (namespace, name)" so the
/// resource store (which lives in a crate that does depend on `kube`) can
/// be consulted without this crate depending on it.
pub trait SecretLookup {
    fn get_secret(&self, namespace: &str, name: &str) -> Option<SecretData>;
}

pub struct TlsMaterializer;

impl TlsMaterializer {
    /// `SecretToCertPair`: extracts cert/key bytes for the given hosts.
    pub fn secret_to_cert_pair(secret: &SecretData, hosts: Vec<String>) -> Result<Certificate, TlsError> {
        let cert = secret
            .cert
            .as_ref()
            .filter(|c| !c.is_empty())
            .ok_or(TlsError::MissingCert)?;
        let key = secret
            .key
            .as_ref()
            .filter(|k| !k.is_empty())
            .ok_or(TlsError::MissingKey)?;
        Ok(Certificate {
            hosts,
            cert: cert.clone(),
            key: key.clone(),
        })
    }

    /// `ResolveCertPairs`: never fails; missing secrets and extraction
    /// errors both become warnings and are skipped. An empty `secretName`
    /// is silently skipped without a warning.
    pub fn resolve_cert_pairs(
        lookup: &dyn SecretLookup,
        namespace: &str,
        entries: &[(String, Vec<String>)],
    ) -> (Vec<Certificate>, Vec<String>) {
        let mut pairs = Vec::new();
        let mut warnings = Vec::new();
        for (secret_name, hosts) in entries {
            if secret_name.is_empty() {
                continue;
            }
            match lookup.get_secret(namespace, secret_name) {
                None => warnings.push(format!(
                    "secret {namespace}/{secret_name} referenced by TLS config not found"
                )),
                Some(secret) => match Self::secret_to_cert_pair(&secret, hosts.clone()) {
                    Ok(pair) => pairs.push(pair),
                    Err(e) => warnings.push(format!(
                        "secret {namespace}/{secret_name}: {e}"
                    )),
                },
            }
        }
        (pairs, warnings)
    }
}
