//! Key providers.
//!
//! A key provider hands out the keypair used to sign artifacts. Key material
//! arrives as opaque byte buffers: a 32-byte public key and a 64-byte
//! private key.

use std::fmt;

use ledgerline_core::{CoreError, Keypair, PublicKey};
use thiserror::Error;

/// Errors from key providers.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The provider has no key to offer.
    #[error("no key available: {0}")]
    Unavailable(String),

    /// Key material is not valid hex.
    #[error("invalid hex key material: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Key material has the wrong size or does not form a keypair.
    #[error("cannot sign with supplied key material: {0}")]
    Invalid(#[from] CoreError),
}

/// Raw key material as supplied by an external store.
#[derive(Clone)]
pub struct KeyMaterial {
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl KeyMaterial {
    pub fn new(public_key: impl Into<Vec<u8>>, private_key: impl Into<Vec<u8>>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Parse hex-encoded key material.
    pub fn from_hex(public_key: &str, private_key: &str) -> Result<Self, KeyError> {
        Ok(Self::new(hex::decode(public_key)?, hex::decode(private_key)?))
    }

    /// Export a keypair's material.
    pub fn from_keypair(keypair: &Keypair) -> Self {
        Self::new(
            keypair.public_key().as_bytes().to_vec(),
            keypair.private_key_bytes().to_vec(),
        )
    }

    /// Check sizes and build a signing keypair.
    pub fn to_keypair(&self) -> Result<Keypair, KeyError> {
        Ok(Keypair::from_bytes(&self.public_key, &self.private_key)?)
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("public_key", &hex::encode(&self.public_key))
            .field(
                "private_key",
                &format_args!("<{} bytes redacted>", self.private_key.len()),
            )
            .finish()
    }
}

/// Supplies the keypair used for signing.
pub trait KeyProvider: Send + Sync {
    /// The signing keypair.
    fn keypair(&self) -> Result<Keypair, KeyError>;

    /// The public key the provider signs with.
    fn public_key(&self) -> Result<PublicKey, KeyError> {
        Ok(self.keypair()?.public_key())
    }
}

/// A provider holding one keypair in memory.
#[derive(Debug, Clone)]
pub struct StaticKeyProvider {
    keypair: Keypair,
}

impl StaticKeyProvider {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Provider with a freshly generated keypair.
    pub fn generate() -> Self {
        Self::new(Keypair::generate())
    }

    /// Import raw key material, checking sizes.
    pub fn from_material(material: &KeyMaterial) -> Result<Self, KeyError> {
        Ok(Self::new(material.to_keypair()?))
    }

    /// Import hex-encoded key material.
    pub fn from_hex(public_key: &str, private_key: &str) -> Result<Self, KeyError> {
        Self::from_material(&KeyMaterial::from_hex(public_key, private_key)?)
    }
}

impl KeyProvider for StaticKeyProvider {
    fn keypair(&self) -> Result<Keypair, KeyError> {
        Ok(self.keypair.clone())
    }
}

impl<P: KeyProvider + ?Sized> KeyProvider for std::sync::Arc<P> {
    fn keypair(&self) -> Result<Keypair, KeyError> {
        (**self).keypair()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_core::crypto::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};

    #[test]
    fn test_material_roundtrip() {
        let kp = Keypair::from_seed(&[4u8; 32]);
        let material = KeyMaterial::from_keypair(&kp);
        assert_eq!(material.public_key.len(), PUBLIC_KEY_SIZE);
        assert_eq!(material.private_key.len(), PRIVATE_KEY_SIZE);
        let provider = StaticKeyProvider::from_material(&material).unwrap();
        assert_eq!(provider.public_key().unwrap(), kp.public_key());
    }

    #[test]
    fn test_hex_import() {
        let kp = Keypair::from_seed(&[4u8; 32]);
        let provider = StaticKeyProvider::from_hex(
            &kp.public_key().to_hex(),
            &hex::encode(kp.private_key_bytes()),
        )
        .unwrap();
        assert_eq!(provider.keypair().unwrap().public_key(), kp.public_key());
    }

    #[test]
    fn test_wrong_private_size_is_signing_error() {
        let kp = Keypair::from_seed(&[4u8; 32]);
        let material = KeyMaterial::new(kp.public_key().as_bytes().to_vec(), vec![0u8; 63]);
        assert!(matches!(
            material.to_keypair(),
            Err(KeyError::Invalid(CoreError::KeySize { .. }))
        ));
    }

    #[test]
    fn test_bad_hex() {
        assert!(matches!(
            KeyMaterial::from_hex("zz", "00"),
            Err(KeyError::Hex(_))
        ));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let material = KeyMaterial::from_keypair(&Keypair::from_seed(&[4u8; 32]));
        let shown = format!("{:?}", material);
        assert!(shown.contains("redacted"));
        assert!(!shown.contains(&hex::encode(&material.private_key)));
    }
}
