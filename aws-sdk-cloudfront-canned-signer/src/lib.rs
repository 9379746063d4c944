/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_cfg))]
/* End of automatically managed default lints */
//! CloudFront canned-policy signing for URLs and cookies.
//!
//! A [`SigningIdentity`] holds the distribution base URL, the CloudFront key
//! pair ID and the RSA private key. Each signing call builds a canned policy
//! for one resource and expiry, signs it with RSA-SHA1 and encodes the result
//! with CloudFront's base64 alphabet.
//!
//! ```no_run
//! use aws_sdk_cloudfront_canned_signer::{PrivateKey, SigningIdentity};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), aws_sdk_cloudfront_canned_signer::error::SigningError> {
//! let key = PrivateKey::from_pem(&std::fs::read("private_key.pem").unwrap())?;
//! let identity = SigningIdentity::new("https://d111111abcdef8.cloudfront.net", "APKAEXAMPLE", key);
//!
//! let url = identity.canned_signed_url("/videos/intro.mp4", "", Duration::from_secs(3600))?;
//! let cookies = identity.cookie("videos/intro.mp4", Duration::from_secs(3600))?;
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

/// Error types for CloudFront signing operations.
pub mod error;
mod encoding;
mod key;
mod policy;
mod sign;

pub use encoding::{assemble_cookie, assemble_url, url_safe_base64};
pub use key::PrivateKey;
pub use policy::build_policy;
pub use sign::{
    sign_policy, Expiration, SignedCookies, SignedUrl, SigningIdentity, SigningIdentityBuilder,
    COOKIE_KEY_PAIR_ID, COOKIE_POLICY, COOKIE_SIGNATURE,
};

/// Generate signed cookies for `resource` under the identity's base URL
pub fn sign_cookie(
    identity: &SigningIdentity,
    resource: &str,
    expires: impl Into<Expiration>,
) -> Result<SignedCookies, error::SigningError> {
    identity.cookie(resource, expires)
}

/// Sign a CloudFront URL for `path` with a canned policy
pub fn sign_url(
    identity: &SigningIdentity,
    path: &str,
    query_string: &str,
    expires: impl Into<Expiration>,
) -> Result<SignedUrl, error::SigningError> {
    identity.canned_signed_url(path, query_string, expires)
}
