/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub(crate) enum ErrorKind {
    InvalidKey,
    InvalidPolicy,
    InvalidUrl,
    InvalidInput,
    SigningFailure,
}

/// Error type for CloudFront canned-policy signing operations
#[derive(Debug)]
pub struct SigningError {
    kind: ErrorKind,
    source: Option<Box<dyn StdError + Send + Sync>>,
    message: Option<Cow<'static, str>>,
}

impl SigningError {
    pub(crate) fn new(
        kind: ErrorKind,
        source: Option<Box<dyn StdError + Send + Sync>>,
        message: Option<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind,
            source,
            message,
        }
    }

    pub(crate) fn invalid_key(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::new(ErrorKind::InvalidKey, Some(source.into()), None)
    }

    pub(crate) fn invalid_policy(
        message: impl Into<Cow<'static, str>>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self::new(
            ErrorKind::InvalidPolicy,
            Some(source.into()),
            Some(message.into()),
        )
    }

    pub(crate) fn invalid_url(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::new(ErrorKind::InvalidUrl, Some(source.into()), None)
    }

    pub(crate) fn invalid_input(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidInput, None, Some(message.into()))
    }

    pub(crate) fn signing_failure(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::new(ErrorKind::SigningFailure, Some(source.into()), None)
    }

    /// Returns true if the private key could not be loaded or used.
    pub fn is_invalid_key(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidKey)
    }

    /// Returns true if the policy document could not be serialized.
    pub fn is_invalid_policy(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidPolicy)
    }

    /// Returns true if the signing identity's base URL could not be parsed.
    pub fn is_invalid_url(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidUrl)
    }

    /// Returns true if a required input was missing or empty.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidInput)
    }

    /// Returns true if the RSA signing operation itself failed.
    pub fn is_signing_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::SigningFailure)
    }
}

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::InvalidKey => write!(f, "invalid private key"),
            ErrorKind::InvalidPolicy => {
                write!(f, "invalid policy")?;
                if let Some(ref msg) = self.message {
                    write!(f, ": {msg}")?;
                }
                Ok(())
            }
            ErrorKind::InvalidUrl => write!(f, "invalid base URL"),
            ErrorKind::InvalidInput => {
                write!(f, "invalid input")?;
                if let Some(ref msg) = self.message {
                    write!(f, ": {msg}")?;
                }
                Ok(())
            }
            ErrorKind::SigningFailure => write!(f, "signing operation failed"),
        }
    }
}

impl StdError for SigningError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}
