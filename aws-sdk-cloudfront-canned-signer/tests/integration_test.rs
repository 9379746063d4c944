/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_cloudfront_canned_signer::{
    build_policy, sign_cookie, sign_policy, sign_url, url_safe_base64, PrivateKey,
    SigningIdentity,
};
use aws_smithy_types::DateTime;
use rsa::Pkcs1v15Sign;
use sha1::{Digest, Sha1};
use std::sync::Arc;
use std::thread;

const TEST_RSA_KEY: &[u8] = include_bytes!("keys/rsa-pkcs1.pem");

fn identity() -> SigningIdentity {
    let key = PrivateKey::from_pem(TEST_RSA_KEY).unwrap();
    SigningIdentity::new("https://cdn.example.com", "APKAEXAMPLE", key)
}

fn from_cloudfront_base64(encoded: &str) -> Vec<u8> {
    let standard = encoded.replace('_', "=").replace('-', "+").replace('~', "/");
    base64_simd::STANDARD
        .decode_to_vec(standard.as_bytes())
        .unwrap()
}

fn verify(key: &PrivateKey, policy: &[u8], signature: &[u8]) {
    key.to_public_key()
        .verify(Pkcs1v15Sign::new::<Sha1>(), &Sha1::digest(policy), signature)
        .expect("signature verifies against the public key");
}

#[test]
fn test_sign_policy_verifies() {
    let identity = identity();
    let policy = build_policy(
        "https://cdn.example.com/images/1.jpg",
        DateTime::from_secs(1767290400),
    )
    .unwrap();

    let signature = sign_policy(&policy, &identity).unwrap();
    verify(&PrivateKey::from_pem(TEST_RSA_KEY).unwrap(), &policy, &signature);
}

#[test]
fn test_cookie_policy_round_trips() {
    let cookies =
        sign_cookie(&identity(), "images/1.jpg", DateTime::from_secs(1767290400)).unwrap();

    let policy = from_cloudfront_base64(cookies.policy());
    assert_eq!(
        policy,
        build_policy(
            "https://cdn.example.com/images/1.jpg",
            DateTime::from_secs(1767290400)
        )
        .unwrap()
    );
    assert_eq!(url_safe_base64(&policy), cookies.policy());

    verify(
        &PrivateKey::from_pem(TEST_RSA_KEY).unwrap(),
        &policy,
        &from_cloudfront_base64(cookies.signature()),
    );
}

#[test]
fn test_sign_url_query_order() {
    let url = sign_url(
        &identity(),
        "/images/1.jpg",
        "",
        DateTime::from_secs(1767290400),
    )
    .unwrap();

    let (_, query) = url.as_str().split_once('?').unwrap();
    let names: Vec<&str> = query
        .split('&')
        .filter_map(|pair| pair.split('=').next())
        .collect();
    assert_eq!(names, vec!["Expires", "Signature", "Key-Pair-Id"]);
}

#[test]
fn test_identity_is_shared_across_threads() {
    let identity = Arc::new(identity());
    let expected = sign_url(&identity, "/a", "", DateTime::from_secs(1767290400))
        .unwrap()
        .to_string();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let identity = Arc::clone(&identity);
            thread::spawn(move || {
                sign_url(&identity, "/a", "", DateTime::from_secs(1767290400))
                    .unwrap()
                    .to_string()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[cfg(feature = "rt-tokio")]
#[tokio::test]
async fn test_from_pem_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/keys/rsa-pkcs8.pem");
    let from_file = PrivateKey::from_pem_file(path).await.unwrap();
    let from_bytes = PrivateKey::from_pem(TEST_RSA_KEY).unwrap();
    assert_eq!(from_file.to_public_key(), from_bytes.to_public_key());

    let err = PrivateKey::from_pem_file("does/not/exist.pem")
        .await
        .unwrap_err();
    assert!(err.is_invalid_key());
}
