/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::SigningError;
use aws_smithy_json::serialize::JsonObjectWriter;
use aws_smithy_types::{DateTime, Number};

/// Builds the canned policy document granting access to `resource` until `expiry`.
///
/// `expiry` is truncated to millisecond precision and then expressed as whole
/// Unix epoch seconds. The returned bytes are exactly what gets signed, and
/// are byte-identical for identical inputs.
pub fn build_policy(resource: &str, expiry: DateTime) -> Result<Vec<u8>, SigningError> {
    Ok(CannedPolicy::new(resource, expiry)?.to_json().into_bytes())
}

/// Truncates `expiry` to milliseconds and returns the whole epoch seconds.
pub(crate) fn epoch_seconds(expiry: DateTime) -> Result<i64, SigningError> {
    let millis = expiry
        .to_millis()
        .map_err(|e| SigningError::invalid_policy("expiry is out of range", e))?;
    Ok(millis.div_euclid(1000))
}

/// A single-statement policy with one `DateLessThan` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CannedPolicy {
    resource: String,
    expires_at: i64,
}

impl CannedPolicy {
    pub(crate) fn new(
        resource: impl Into<String>,
        expiry: DateTime,
    ) -> Result<Self, SigningError> {
        Ok(Self {
            resource: resource.into(),
            expires_at: epoch_seconds(expiry)?,
        })
    }

    pub(crate) fn resource(&self) -> &str {
        &self.resource
    }

    pub(crate) fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Field order and spelling are fixed by CloudFront, which rebuilds this
    /// document from the request and compares signatures over it.
    pub(crate) fn to_json(&self) -> String {
        let mut out = String::new();
        let mut root = JsonObjectWriter::new(&mut out);

        let mut statement_array = root.key("Statement").start_array();
        let mut statement = statement_array.value().start_object();

        statement.key("Resource").string(&self.resource);

        let mut condition = statement.key("Condition").start_object();
        let mut date_less = condition.key("DateLessThan").start_object();
        date_less
            .key("AWS:EpochTime")
            .number(epoch_number(self.expires_at));
        date_less.finish();
        condition.finish();

        statement.finish();
        statement_array.finish();
        root.finish();

        out
    }
}

fn epoch_number(secs: i64) -> Number {
    if secs < 0 {
        Number::NegInt(secs)
    } else {
        Number::PosInt(secs as u64)
    }
}
