/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::SigningError;
use url::Url;

/// Substitutions CloudFront applies on top of standard padded base64.
///
/// This is not RFC 4648 base64url: `/` becomes `~`, not `_`.
const SUBSTITUTIONS: [(char, char); 3] = [('=', '_'), ('+', '-'), ('/', '~')];

/// Encodes `data` as standard base64, then replaces `=`, `+` and `/` with
/// `_`, `-` and `~` respectively.
pub fn url_safe_base64(data: &[u8]) -> String {
    base64_simd::STANDARD
        .encode_to_string(data)
        .chars()
        .map(substitute)
        .collect()
}

fn substitute(c: char) -> char {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map_or(c, |(_, to)| *to)
}

/// Returns the three signed-cookie values unchanged, in
/// (policy, signature, key pair id) order.
pub fn assemble_cookie(
    policy_b64: String,
    signature_b64: String,
    key_pair_id: String,
) -> (String, String, String) {
    (policy_b64, signature_b64, key_pair_id)
}

/// Builds a canned-policy signed URL.
///
/// The path of `base_url` is replaced by `path`, and any query or fragment on
/// the base is dropped. A non-empty `query_string` is appended verbatim and
/// followed by `&`, then `Expires`, `Signature` and `Key-Pair-Id` are appended
/// in that order. The query is never re-escaped, so it reaches CloudFront
/// exactly as it was passed in.
pub fn assemble_url(
    base_url: &str,
    path: &str,
    query_string: &str,
    expires: i64,
    signature_b64: &str,
    key_pair_id: &str,
) -> Result<String, SigningError> {
    let mut url = Url::parse(base_url).map_err(SigningError::invalid_url)?;
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);

    let mut signed = String::from(url.as_str());
    signed.push('?');
    if !query_string.is_empty() {
        signed.push_str(query_string);
        signed.push('&');
    }
    signed.push_str(&format!(
        "Expires={expires}&Signature={signature_b64}&Key-Pair-Id={key_pair_id}"
    ));
    Ok(signed)
}
