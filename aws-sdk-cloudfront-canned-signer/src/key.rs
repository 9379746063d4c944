/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::SigningError;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use std::fmt;

#[cfg(feature = "rt-tokio")]
use std::path::Path;

/// RSA private key used to sign CloudFront canned policies.
///
/// The key is never mutated after loading. Its `Debug` output only reports the
/// modulus size.
#[derive(Clone)]
pub struct PrivateKey {
    key: Box<RsaPrivateKey>,
}

impl PrivateKey {
    /// Loads a private key from PEM-encoded bytes.
    ///
    /// Supports RSA keys in PKCS#1 (`BEGIN RSA PRIVATE KEY`) or PKCS#8
    /// (`BEGIN PRIVATE KEY`) format.
    pub fn from_pem(bytes: &[u8]) -> Result<Self, SigningError> {
        let pem_str = std::str::from_utf8(bytes).map_err(SigningError::invalid_key)?;

        if pem_str.contains("BEGIN RSA PRIVATE KEY") {
            let key = RsaPrivateKey::from_pkcs1_pem(pem_str).map_err(SigningError::invalid_key)?;
            return Ok(key.into());
        }

        if pem_str.contains("BEGIN PRIVATE KEY") {
            let key = RsaPrivateKey::from_pkcs8_pem(pem_str).map_err(SigningError::invalid_key)?;
            return Ok(key.into());
        }

        Err(SigningError::invalid_key(
            "unsupported key format, expected an RSA key in PKCS#1 or PKCS#8 PEM",
        ))
    }

    /// Loads a private key from a PEM file asynchronously.
    ///
    /// Requires the `rt-tokio` feature.
    #[cfg(feature = "rt-tokio")]
    #[cfg_attr(docsrs, doc(cfg(feature = "rt-tokio")))]
    pub async fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, SigningError> {
        let bytes = tokio::fs::read(path.as_ref())
            .await
            .map_err(SigningError::invalid_key)?;

        Self::from_pem(&bytes)
    }

    /// Returns the public half of this key, as registered with CloudFront.
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.key.to_public_key()
    }

    /// Signs `message` with RSASSA-PKCS1-v1_5 over its SHA-1 digest, blinding
    /// with the operating system's secure random source.
    ///
    /// An unavailable random source is reported as a signing failure.
    pub(crate) fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SigningError> {
        self.sign_with_rng(&mut OsRng, message)
    }

    pub(crate) fn sign_with_rng<R>(
        &self,
        rng: &mut R,
        message: &[u8],
    ) -> Result<Vec<u8>, SigningError>
    where
        R: CryptoRng + RngCore,
    {
        let digest = Sha1::digest(message);
        let mut rng = CheckedRng::new(rng);
        let signature = self
            .key
            .sign_with_rng(&mut rng, Pkcs1v15Sign::new::<Sha1>(), &digest)
            .map_err(SigningError::signing_failure)?;
        match rng.error {
            Some(err) => Err(SigningError::signing_failure(err)),
            None => Ok(signature),
        }
    }
}

/// Routes every draw through `try_fill_bytes` and keeps the first failure
/// instead of panicking. Bytes requested after a failure are zeroed.
struct CheckedRng<'a, R> {
    inner: &'a mut R,
    error: Option<rand::Error>,
}

impl<'a, R: RngCore> CheckedRng<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self { inner, error: None }
    }
}

impl<R: RngCore> RngCore for CheckedRng<'_, R> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if self.error.is_some() {
            dest.fill(0);
            return;
        }
        if let Err(err) = self.inner.try_fill_bytes(dest) {
            dest.fill(0);
            self.error = Some(err);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl<R: CryptoRng> CryptoRng for CheckedRng<'_, R> {}

impl From<RsaPrivateKey> for PrivateKey {
    fn from(key: RsaPrivateKey) -> Self {
        Self { key: Box::new(key) }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bits", &(self.key.size() * 8))
            .finish_non_exhaustive()
    }
}
