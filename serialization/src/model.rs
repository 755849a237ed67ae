use super::*;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::collections::HashMap;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Decodes one wire field into a model object.
pub type FieldDeserializer<T> = Box<dyn Fn(&mut T, &ParseNode) -> Result<(), Error>>;

/// A model's field dispatch table, keyed by wire name.
pub type FieldDeserializers<T> = HashMap<&'static str, FieldDeserializer<T>>;

/// Fields found on the wire that the model does not declare, in wire order.
pub type AdditionalData = IndexMap<String, AdditionalValue>;

/// A model object that can be read from a [`ParseNode`] and written to a
/// [`SerializationWriter`].
pub trait Parsable {
    /// The decode action for every field the model declares.
    ///
    /// Composed-type wrappers build their table from whichever branches are
    /// populated, so the table depends on the instance.
    fn field_deserializers(&self) -> FieldDeserializers<Self>
    where
        Self: Sized;

    fn serialize(&self, writer: &mut SerializationWriter) -> Result<(), Error>;

    /// The bag for undeclared fields, if the model keeps one.
    fn additional_data(&self) -> Option<&AdditionalData> {
        None
    }

    fn additional_data_mut(&mut self) -> Option<&mut AdditionalData> {
        None
    }

    /// `true` for union and intersection wrappers, which are written without a
    /// map of their own.
    fn is_composed_type_wrapper(&self) -> bool {
        false
    }
}

/// Boxes a decode action, fixing its argument types for closure inference.
pub fn field<T, F>(f: F) -> FieldDeserializer<T>
where
    F: Fn(&mut T, &ParseNode) -> Result<(), Error> + 'static,
{
    Box::new(f)
}

/// Lifts a branch's table onto its wrapper. Actions are skipped while the
/// branch is unset.
pub fn project_deserializers<T, U>(
    inner: FieldDeserializers<U>,
    select: fn(&mut T) -> Option<&mut U>,
) -> FieldDeserializers<T>
where
    T: 'static,
    U: 'static,
{
    inner
        .into_iter()
        .map(|(key, f)| {
            let f = field(move |target: &mut T, node: &ParseNode| match select(target) {
                Some(inner) => f(inner, node),
                None => Ok(()),
            });
            (key, f)
        })
        .collect()
}

/// Combines tables; on a duplicate key the earliest table wins.
pub fn merge_deserializers<T>(
    tables: impl IntoIterator<Item = FieldDeserializers<T>>,
) -> FieldDeserializers<T> {
    let mut merged = FieldDeserializers::new();
    for table in tables {
        for (key, f) in table {
            merged.entry(key).or_insert(f);
        }
    }
    merged
}

/// A natively typed value held in an [`AdditionalData`] bag.
#[derive(Clone)]
pub enum AdditionalValue {
    Null,
    Bool(bool),
    Byte(u8),
    Sbyte(i8),
    Int(i32),
    Long(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    String(String),
    Guid(Uuid),
    /// A date-time without an offset; written as UTC.
    DateTime(PrimitiveDateTime),
    DateTimeOffset(OffsetDateTime),
    Duration(Duration),
    Date(Date),
    Time(Time),
    Collection(Vec<AdditionalValue>),
    /// A structure with no declared type, kept as decoded.
    Node(Arc<Node>),
    Object(Arc<dyn Parsable + Send + Sync>),
    /// A host value captured through its serde representation.
    Untyped(serde_json::Value),
}

impl AdditionalValue {
    /// Captures any serde-serializable value, e.g. a map or a tuple.
    pub fn untyped<T>(value: &T) -> Result<Self, Error>
    where
        T: serde::Serialize + ?Sized,
    {
        serde_json::to_value(value)
            .map(Self::Untyped)
            .map_err(|e| Error::UnsupportedAdditionalValue(e.to_string()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AdditionalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Byte(v) => f.debug_tuple("Byte").field(v).finish(),
            Self::Sbyte(v) => f.debug_tuple("Sbyte").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Long(v) => f.debug_tuple("Long").field(v).finish(),
            Self::UInt64(v) => f.debug_tuple("UInt64").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Self::Decimal(v) => f.debug_tuple("Decimal").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Guid(v) => f.debug_tuple("Guid").field(v).finish(),
            Self::DateTime(v) => f.debug_tuple("DateTime").field(v).finish(),
            Self::DateTimeOffset(v) => f.debug_tuple("DateTimeOffset").field(v).finish(),
            Self::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Self::Date(v) => f.debug_tuple("Date").field(v).finish(),
            Self::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Self::Collection(v) => f.debug_tuple("Collection").field(v).finish(),
            Self::Node(v) => f.debug_tuple("Node").field(v).finish(),
            Self::Object(_) => write!(f, "Object(..)"),
            Self::Untyped(v) => f.debug_tuple("Untyped").field(v).finish(),
        }
    }
}

/// Objects compare by identity, everything else by value.
impl PartialEq for AdditionalValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Sbyte(a), Self::Sbyte(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::UInt64(a), Self::UInt64(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Guid(a), Self::Guid(b)) => a == b,
            (Self::DateTime(a), Self::DateTime(b)) => a == b,
            (Self::DateTimeOffset(a), Self::DateTimeOffset(b)) => a == b,
            (Self::Duration(a), Self::Duration(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Collection(a), Self::Collection(b)) => a == b,
            (Self::Node(a), Self::Node(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::Untyped(a), Self::Untyped(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from_for_additional_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for AdditionalValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_additional_value!(
    bool => Bool,
    u8 => Byte,
    i8 => Sbyte,
    i32 => Int,
    i64 => Long,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
    String => String,
    Uuid => Guid,
    PrimitiveDateTime => DateTime,
    OffsetDateTime => DateTimeOffset,
    Duration => Duration,
    Date => Date,
    Time => Time,
);

impl From<&str> for AdditionalValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl<T: Into<AdditionalValue>> From<Vec<T>> for AdditionalValue {
    fn from(value: Vec<T>) -> Self {
        Self::Collection(value.into_iter().map(Into::into).collect())
    }
}
