/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::encoding::{assemble_cookie, assemble_url, url_safe_base64};
use crate::error::SigningError;
use crate::key::PrivateKey;
use crate::policy::CannedPolicy;
use aws_smithy_async::time::SharedTimeSource;
use aws_smithy_types::DateTime;
use std::fmt;
use std::time::{Duration, SystemTime};

/// Cookie name for the base64 policy value.
pub const COOKIE_POLICY: &str = "CloudFront-Policy";
/// Cookie name for the base64 signature value.
pub const COOKIE_SIGNATURE: &str = "CloudFront-Signature";
/// Cookie name for the key pair ID value.
pub const COOKIE_KEY_PAIR_ID: &str = "CloudFront-Key-Pair-Id";

/// When a signed grant stops being valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expiration {
    /// An absolute instant.
    DateTime(DateTime),
    /// A duration from the signing identity's current time.
    Duration(Duration),
}

impl From<DateTime> for Expiration {
    fn from(time: DateTime) -> Self {
        Expiration::DateTime(time)
    }
}

impl From<SystemTime> for Expiration {
    fn from(time: SystemTime) -> Self {
        Expiration::DateTime(DateTime::from(time))
    }
}

impl From<Duration> for Expiration {
    fn from(duration: Duration) -> Self {
        Expiration::Duration(duration)
    }
}

/// Base URL, key pair ID and private key used to sign CloudFront grants.
///
/// An identity is immutable once built and can be shared across threads;
/// every signing call only reads from it.
#[derive(Debug, Clone)]
pub struct SigningIdentity {
    base_url: String,
    key_pair_id: String,
    private_key: PrivateKey,
    time_source: SharedTimeSource,
}

impl SigningIdentity {
    /// Creates an identity using the system clock for relative expiries.
    pub fn new(
        base_url: impl Into<String>,
        key_pair_id: impl Into<String>,
        private_key: PrivateKey,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            key_pair_id: key_pair_id.into(),
            private_key,
            time_source: SharedTimeSource::default(),
        }
    }

    /// Creates a new builder for constructing a signing identity.
    pub fn builder() -> SigningIdentityBuilder {
        SigningIdentityBuilder::default()
    }

    /// Returns the base URL resources are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the CloudFront key pair ID.
    pub fn key_pair_id(&self) -> &str {
        &self.key_pair_id
    }

    /// Generates signed cookies granting access to `resource` under the base URL.
    ///
    /// The policy resource is the base URL without its trailing slash, a single
    /// `/`, then `resource` without its leading slash.
    pub fn cookie(
        &self,
        resource: &str,
        expires: impl Into<Expiration>,
    ) -> Result<SignedCookies, SigningError> {
        let policy = CannedPolicy::new(self.join(resource), self.resolve(expires.into())?)?;
        let policy_json = policy.to_json();
        tracing::trace!(policy = %policy_json, "built canned policy");

        let signature = sign_policy(policy_json.as_bytes(), self)?;
        let (policy_b64, signature_b64, key_pair_id) = assemble_cookie(
            url_safe_base64(policy_json.as_bytes()),
            url_safe_base64(&signature),
            self.key_pair_id.clone(),
        );

        tracing::debug!(
            key_pair_id = %self.key_pair_id,
            resource = %policy.resource(),
            expires = policy.expires_at(),
            "issued signed cookies"
        );
        Ok(SignedCookies {
            policy: policy_b64,
            signature: signature_b64,
            key_pair_id,
        })
    }

    /// Generates a signed URL for `path` with a canned policy.
    ///
    /// With an empty `query_string` the policy resource is the base URL joined
    /// with `path`. Otherwise the policy resource is `path?query_string`
    /// without the base URL, so `path` must already match what CloudFront
    /// will see in the request.
    pub fn canned_signed_url(
        &self,
        path: &str,
        query_string: &str,
        expires: impl Into<Expiration>,
    ) -> Result<SignedUrl, SigningError> {
        let resource = if query_string.is_empty() {
            self.join(path)
        } else {
            format!("{path}?{query_string}")
        };

        let policy = CannedPolicy::new(resource, self.resolve(expires.into())?)?;
        let policy_json = policy.to_json();
        tracing::trace!(policy = %policy_json, "built canned policy");

        let signature = url_safe_base64(&sign_policy(policy_json.as_bytes(), self)?);
        let url = assemble_url(
            &self.base_url,
            path,
            query_string,
            policy.expires_at(),
            &signature,
            &self.key_pair_id,
        )?;

        tracing::debug!(
            key_pair_id = %self.key_pair_id,
            resource = %policy.resource(),
            expires = policy.expires_at(),
            "issued signed URL"
        );
        Ok(SignedUrl { url })
    }

    fn join(&self, resource: &str) -> String {
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        let resource = resource.strip_prefix('/').unwrap_or(resource);
        format!("{base}/{resource}")
    }

    fn resolve(&self, expiration: Expiration) -> Result<DateTime, SigningError> {
        match expiration {
            Expiration::DateTime(time) => Ok(time),
            Expiration::Duration(duration) => self
                .time_source
                .now()
                .checked_add(duration)
                .map(DateTime::from)
                .ok_or_else(|| SigningError::invalid_input("expiry duration is out of range")),
        }
    }
}

/// Signs raw policy bytes with the identity's private key.
///
/// Returns the RSASSA-PKCS1-v1_5 signature over the SHA-1 digest of `policy`.
pub fn sign_policy(policy: &[u8], identity: &SigningIdentity) -> Result<Vec<u8>, SigningError> {
    identity.private_key.sign(policy)
}

/// Builder for [`SigningIdentity`].
#[derive(Default, Debug)]
pub struct SigningIdentityBuilder {
    base_url: Option<String>,
    key_pair_id: Option<String>,
    private_key: Option<PrivateKey>,
    time_source: Option<SharedTimeSource>,
}

impl SigningIdentityBuilder {
    /// Sets the base URL that resources and signed URLs are built from.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the CloudFront key pair ID.
    pub fn key_pair_id(mut self, id: impl Into<String>) -> Self {
        self.key_pair_id = Some(id.into());
        self
    }

    /// Sets the private key for signing.
    pub fn private_key(mut self, key: PrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    /// Sets the time source used to resolve relative expiries.
    pub fn time_source(mut self, time_source: SharedTimeSource) -> Self {
        self.time_source = Some(time_source);
        self
    }

    /// Builds the signing identity.
    pub fn build(self) -> Result<SigningIdentity, SigningError> {
        let base_url = self
            .base_url
            .ok_or_else(|| SigningError::invalid_input("base_url is required"))?;

        let key_pair_id = self
            .key_pair_id
            .ok_or_else(|| SigningError::invalid_input("key_pair_id is required"))?;
        if key_pair_id.is_empty() {
            return Err(SigningError::invalid_input("key_pair_id must not be empty"));
        }

        let private_key = self
            .private_key
            .ok_or_else(|| SigningError::invalid_input("private_key is required"))?;

        Ok(SigningIdentity {
            base_url,
            key_pair_id,
            private_key,
            time_source: self.time_source.unwrap_or_default(),
        })
    }
}

/// A signed CloudFront URL.
///
/// The caller's query string is kept exactly as it was signed, so the URL is
/// held as text rather than as a parsed [`url::Url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    url: String,
}

impl SignedUrl {
    /// Returns the complete signed URL as a string.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Consumes self and returns the signed URL string.
    pub fn into_string(self) -> String {
        self.url
    }

    /// Parses the signed URL.
    ///
    /// Parsing normalizes the query, so characters such as spaces in a
    /// caller-supplied query string come back percent-encoded.
    pub fn to_url(&self) -> Result<url::Url, SigningError> {
        url::Url::parse(&self.url).map_err(SigningError::invalid_url)
    }
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl AsRef<str> for SignedUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http-1x")]
impl TryFrom<SignedUrl> for http_1x::Request<()> {
    type Error = http_1x::Error;

    fn try_from(signed_url: SignedUrl) -> Result<Self, Self::Error> {
        http_1x::Request::builder()
            .uri(signed_url.url.as_str())
            .body(())
    }
}

#[cfg(feature = "http-1x")]
impl TryFrom<&SignedUrl> for http_1x::Request<()> {
    type Error = http_1x::Error;

    fn try_from(signed_url: &SignedUrl) -> Result<Self, Self::Error> {
        http_1x::Request::builder()
            .uri(signed_url.url.as_str())
            .body(())
    }
}

/// Signed cookies for a CloudFront canned policy.
///
/// All three values must be sent together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCookies {
    policy: String,
    signature: String,
    key_pair_id: String,
}

impl SignedCookies {
    /// Returns the encoded policy, the value of `CloudFront-Policy`.
    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// Returns the encoded signature, the value of `CloudFront-Signature`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Returns the key pair ID, the value of `CloudFront-Key-Pair-Id`.
    pub fn key_pair_id(&self) -> &str {
        &self.key_pair_id
    }

    /// Gets a specific cookie value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Returns an iterator over cookie name-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (COOKIE_POLICY, self.policy.as_str()),
            (COOKIE_SIGNATURE, self.signature.as_str()),
            (COOKIE_KEY_PAIR_ID, self.key_pair_id.as_str()),
        ]
        .into_iter()
    }

    /// Consumes self and returns (policy, signature, key pair ID).
    pub fn into_parts(self) -> (String, String, String) {
        (self.policy, self.signature, self.key_pair_id)
    }
}
