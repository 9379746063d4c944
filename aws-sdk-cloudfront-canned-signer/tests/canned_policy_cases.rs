/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_cloudfront_canned_signer::{
    build_policy, sign_cookie, sign_url, PrivateKey, SigningIdentity,
};
use aws_smithy_types::DateTime;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct TestCase {
    id: String,
    documentation: String,
    input: TestInput,
    expected: TestExpected,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestInput {
    base_url: String,
    key_pair_id: String,
    private_key_file: String,
    resource: Option<String>,
    path: Option<String>,
    query_string: Option<String>,
    expiration_millis: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestExpected {
    policy_json: Option<String>,
    cookies: Option<HashMap<String, String>>,
    url: Option<String>,
    error: Option<bool>,
    error_contains: Option<Vec<String>>,
}

fn load_test_cases() -> Vec<TestCase> {
    let json = include_str!("test-cases.json");
    serde_json::from_str(json).expect("Failed to parse test cases")
}

fn load_identity(input: &TestInput) -> SigningIdentity {
    let key_path = format!(
        "{}/tests/{}",
        env!("CARGO_MANIFEST_DIR"),
        input.private_key_file
    );
    let key_bytes =
        std::fs::read(&key_path).unwrap_or_else(|_| panic!("Failed to read key file: {key_path}"));
    let private_key = PrivateKey::from_pem(&key_bytes)
        .unwrap_or_else(|e| panic!("Failed to parse private key {key_path}: {e}"));

    SigningIdentity::builder()
        .base_url(&input.base_url)
        .key_pair_id(&input.key_pair_id)
        .private_key(private_key)
        .build()
        .expect("valid signing identity")
}

fn policy_resource(input: &TestInput) -> String {
    match (&input.resource, &input.path, input.query_string.as_deref()) {
        (Some(resource), _, _) => format!(
            "{}/{}",
            input.base_url.trim_end_matches('/'),
            resource.trim_start_matches('/')
        ),
        (None, Some(path), Some(query)) if !query.is_empty() => format!("{path}?{query}"),
        (None, Some(path), _) => format!(
            "{}/{}",
            input.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        (None, None, _) => panic!("test case needs a resource or a path"),
    }
}

#[test]
fn test_canned_policy_cases() {
    for test_case in load_test_cases() {
        println!(
            "\nRunning test: {} - {}",
            test_case.id, test_case.documentation
        );

        let input = &test_case.input;
        let identity = load_identity(input);
        let expires = DateTime::from_millis(input.expiration_millis);

        if let Some(expected_json) = &test_case.expected.policy_json {
            let policy = build_policy(&policy_resource(input), expires).unwrap();
            assert_eq!(
                std::str::from_utf8(&policy).unwrap(),
                expected_json,
                "Test {} policy mismatch",
                test_case.id
            );
        }

        let result = if let Some(resource) = &input.resource {
            sign_cookie(&identity, resource, expires).map(|cookies| {
                cookies
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<HashMap<_, _>>()
            })
        } else {
            let path = input.path.as_deref().expect("path for URL test");
            let query = input.query_string.as_deref().unwrap_or_default();
            sign_url(&identity, path, query, expires)
                .map(|url| HashMap::from([("url".to_string(), url.to_string())]))
        };

        if test_case.expected.error == Some(true) {
            let err = result.expect_err(&format!("Test {} expected an error", test_case.id));
            for expected_text in test_case.expected.error_contains.iter().flatten() {
                assert!(
                    err.to_string().contains(expected_text.as_str()),
                    "Test {} error message '{}' does not contain '{}'",
                    test_case.id,
                    err,
                    expected_text
                );
            }
            continue;
        }

        let actual =
            result.unwrap_or_else(|e| panic!("Failed to sign for test {}: {}", test_case.id, e));

        if let Some(expected_cookies) = &test_case.expected.cookies {
            assert_eq!(&actual, expected_cookies, "Test {} cookies", test_case.id);
        }

        if let Some(expected_url) = &test_case.expected.url {
            assert_eq!(
                actual.get("url"),
                Some(expected_url),
                "Test {} URL mismatch",
                test_case.id
            );
        }

        println!("Test {} passed", test_case.id);
    }
}
