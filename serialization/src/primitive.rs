use super::*;
use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime, Time};
use uuid::Uuid;

/// A scalar that can appear as an element of a primitive collection.
pub trait PrimitiveValue: Sized {
    fn from_parse_node(node: &ParseNode) -> Option<Self>;

    /// Writes the value with no key, as a collection element.
    fn write_value(&self, writer: &mut SerializationWriter) -> Result<(), Error>;
}

macro_rules! impl_primitive_value {
    ($($ty:ty => $get:ident, $write:ident);* $(;)?) => {
        $(
            impl PrimitiveValue for $ty {
                fn from_parse_node(node: &ParseNode) -> Option<Self> {
                    node.$get()
                }

                fn write_value(&self, writer: &mut SerializationWriter) -> Result<(), Error> {
                    writer.$write("", Some(*self))
                }
            }
        )*
    };
}

impl_primitive_value!(
    bool => get_bool_value, write_bool_value;
    u8 => get_byte_value, write_byte_value;
    i8 => get_sbyte_value, write_sbyte_value;
    i32 => get_int_value, write_int_value;
    i64 => get_long_value, write_long_value;
    f32 => get_float_value, write_float_value;
    f64 => get_double_value, write_double_value;
    Decimal => get_decimal_value, write_decimal_value;
    Uuid => get_guid_value, write_guid_value;
    OffsetDateTime => get_date_time_offset_value, write_date_time_offset_value;
    Duration => get_time_span_value, write_time_span_value;
    Date => get_date_value, write_date_value;
    Time => get_time_value, write_time_value;
);

impl PrimitiveValue for String {
    fn from_parse_node(node: &ParseNode) -> Option<Self> {
        node.get_string_value()
    }

    fn write_value(&self, writer: &mut SerializationWriter) -> Result<(), Error> {
        writer.write_string_value("", Some(self))
    }
}
