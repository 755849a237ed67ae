use super::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InvalidCbor(#[from] cbor::decode::Error),

    #[error("Map contains a duplicate key {0:?}")]
    DuplicateKey(String),

    #[error("Map keys must be text strings, found {0}")]
    NonTextKey(&'static str),

    #[error("Unsupported CBOR item {0}")]
    UnsupportedCborKind(&'static str),

    #[error("Byte string of length {0} is not a GUID")]
    InvalidByteString(usize),

    #[error("Unsupported tag {0}")]
    UnsupportedTag(u64),

    #[error("Invalid content for tag {0}")]
    InvalidTaggedValue(u64),

    #[error("Negative integer -1-{0} does not fit in 64 bits")]
    IntegerOverflow(u64),

    #[error("Nesting exceeds the maximum depth of {0}")]
    MaxRecursion(usize),

    #[error("Additional data found after the root item")]
    AdditionalData,

    #[error("Unsupported additional data value: {0}")]
    UnsupportedAdditionalValue(String),

    #[error("Value {0} does not name a member of {1}")]
    InvalidEnumValue(u64, &'static str),

    #[error("Value cannot be represented on the wire: {0}")]
    UnrepresentableValue(String),

    #[error("Invalid ISO-8601 duration")]
    InvalidDuration,

    #[error("Content type is missing")]
    MissingContentType,

    #[error("Expected content type {expected}, found {found}")]
    InvalidContentType {
        expected: &'static str,
        found: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("{0} containers were left open")]
    UnclosedContainers(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
