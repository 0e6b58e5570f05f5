//! GraphQL request and response envelopes
//!
//! Every operation is a `{query, variables}` POST. The response carries an
//! optional `errors` list and an optional `data` object keyed by the
//! operation's root field. Decoding is two-phase: the envelope first, then
//! the operation's field into its typed shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use bitlum_types::de::null_as_default;

use crate::error::{ClientError, ClientResult};

/// GraphQL request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    /// Query or mutation document, sent as is
    pub query: String,
    /// Query variables; `null` when the operation has none
    pub variables: Value,
}

impl Request {
    /// Build a request, serializing `variables` to JSON
    pub fn new<V: Serialize>(query: impl Into<String>, variables: &V) -> ClientResult<Self> {
        let variables = serde_json::to_value(variables).map_err(ClientError::Encode)?;
        Ok(Self {
            query: query.into(),
            variables,
        })
    }

    /// Build a request for an operation without variables
    pub fn without_variables(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Value::Null,
        }
    }

    /// Serialized request body
    pub fn to_json(&self) -> ClientResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(ClientError::Encode)
    }
}

/// Position in the query document an error refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorLocation {
    #[serde(deserialize_with = "null_as_default")]
    pub line: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub column: i64,
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Single entry of the envelope's `errors` list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseError {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub locations: Vec<ErrorLocation>,
}

impl ResponseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
        }
    }

    pub fn with_location(mut self, line: i64, column: i64) -> Self {
        self.locations.push(ErrorLocation { line, column });
        self
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        match self.locations.as_slice() {
            [] => Ok(()),
            [location] => write!(f, ", location: {}", location),
            locations => {
                f.write_str(", locations: ")?;
                for (i, location) in locations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", location)?;
                }
                Ok(())
            }
        }
    }
}

/// Errors reported by the exchange, summarized into one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeError {
    message: String,
    errors: Vec<ResponseError>,
}

impl ExchangeError {
    /// Summary message, see [`extract_error`]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// All errors as reported by the server
    pub fn errors(&self) -> &[ResponseError] {
        &self.errors
    }
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExchangeError {}

/// Summarize the envelope's `errors` list
///
/// Only the first error is described in full; when there are more, the
/// message is prefixed with their count:
///
/// - `some error`
/// - `some error, location: 123:12`
/// - `some error, locations: 123:12, 567:13`
/// - `2 errors occurred, first one is: some error, location: 123:12`
pub fn extract_error(errors: &[ResponseError]) -> Option<ExchangeError> {
    let first = errors.first()?;

    let message = if errors.len() > 1 {
        format!("{} errors occurred, first one is: {}", errors.len(), first)
    } else {
        first.to_string()
    };

    Some(ExchangeError {
        message,
        errors: errors.to_vec(),
    })
}

/// Generic response envelope; `data` stays raw until an operation picks
/// its field out of it
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    errors: Option<Vec<ResponseError>>,
    data: Option<Map<String, Value>>,
}

/// Decode the operation's `field` from a raw response body
///
/// A populated `errors` list wins over `data`: the call fails with
/// [`ClientError::Exchange`], keeping whatever the server returned for
/// `field` as partial data. An absent or `null` field decodes to
/// `T::default()`.
pub fn decode_field<T>(body: &[u8], field: &str) -> ClientResult<T>
where
    T: DeserializeOwned + Default,
{
    let envelope: Envelope = serde_json::from_slice(body).map_err(ClientError::Decode)?;
    let value = envelope
        .data
        .and_then(|mut data| data.remove(field))
        .filter(|value| !value.is_null());

    if let Some(error) = extract_error(envelope.errors.as_deref().unwrap_or_default()) {
        return Err(ClientError::Exchange {
            error,
            partial: value,
        });
    }

    match value {
        Some(value) => serde_json::from_value(value).map_err(ClientError::Decode),
        None => Ok(T::default()),
    }
}
