use super::*;
use base64::{Engine, engine::general_purpose::STANDARD};
use cbor::encode::{Encoder, ToCbor};
use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime, Time};
use uuid::Uuid;

/// Runs against an object before or after it is written.
pub type ObjectHook = Arc<dyn Fn(&dyn Parsable) + Send + Sync>;

/// Runs once an object's map is open, before its own fields are written.
pub type StartObjectHook =
    Arc<dyn Fn(&dyn Parsable, &mut SerializationWriter) -> Result<(), Error> + Send + Sync>;

struct Frame {
    start: usize,
    items: usize,
    is_map: bool,
}

/// Encodes a payload from a sequence of keyed writes.
///
/// Arrays and maps are opened and closed as objects and collections are
/// written, and each gets a definite-length head once its size is known.
#[derive(Default)]
pub struct SerializationWriter {
    encoder: Encoder,
    frames: Vec<Frame>,
    on_before_object_serialization: Option<ObjectHook>,
    on_after_object_serialization: Option<ObjectHook>,
    on_start_object_serialization: Option<StartObjectHook>,
}

impl SerializationWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_on_before_object_serialization(&mut self, hook: Option<ObjectHook>) {
        self.on_before_object_serialization = hook;
    }

    pub fn set_on_after_object_serialization(&mut self, hook: Option<ObjectHook>) {
        self.on_after_object_serialization = hook;
    }

    pub fn set_on_start_object_serialization(&mut self, hook: Option<StartObjectHook>) {
        self.on_start_object_serialization = hook;
    }

    /// The encoded payload. Fails if a container is still open.
    pub fn get_serialized_content(self) -> Result<Vec<u8>, Error> {
        if !self.frames.is_empty() {
            return Err(Error::UnclosedContainers(self.frames.len()));
        }
        Ok(self.encoder.build())
    }

    fn next_item(&mut self) -> &mut Encoder {
        if let Some(frame) = self.frames.last_mut() {
            frame.items += 1;
        }
        &mut self.encoder
    }

    fn write_key(&mut self, key: &str) {
        if !key.is_empty() {
            self.next_item().emit(key);
        }
    }

    fn start_container(&mut self, is_map: bool) {
        self.next_item();
        self.frames.push(Frame {
            start: self.encoder.offset(),
            items: 0,
            is_map,
        });
    }

    fn end_container(&mut self) {
        if let Some(frame) = self.frames.pop() {
            let count = if frame.is_map {
                frame.items / 2
            } else {
                frame.items
            };
            self.encoder.insert_header(frame.start, frame.is_map, count);
        }
    }

    fn write_scalar<T>(&mut self, key: &str, value: Option<&T>)
    where
        T: ToCbor + ?Sized,
    {
        if let Some(value) = value {
            self.write_key(key);
            self.next_item().emit(value);
        }
    }

    pub fn write_string_value(&mut self, key: &str, value: Option<&str>) -> Result<(), Error> {
        self.write_scalar(key, value);
        Ok(())
    }

    pub fn write_bool_value(&mut self, key: &str, value: Option<bool>) -> Result<(), Error> {
        self.write_scalar(key, value.as_ref());
        Ok(())
    }

    pub fn write_byte_value(&mut self, key: &str, value: Option<u8>) -> Result<(), Error> {
        self.write_scalar(key, value.as_ref());
        Ok(())
    }

    pub fn write_sbyte_value(&mut self, key: &str, value: Option<i8>) -> Result<(), Error> {
        self.write_scalar(key, value.as_ref());
        Ok(())
    }

    pub fn write_int_value(&mut self, key: &str, value: Option<i32>) -> Result<(), Error> {
        self.write_scalar(key, value.as_ref());
        Ok(())
    }

    pub fn write_long_value(&mut self, key: &str, value: Option<i64>) -> Result<(), Error> {
        self.write_scalar(key, value.as_ref());
        Ok(())
    }

    pub fn write_float_value(&mut self, key: &str, value: Option<f32>) -> Result<(), Error> {
        self.write_scalar(key, value.as_ref());
        Ok(())
    }

    pub fn write_double_value(&mut self, key: &str, value: Option<f64>) -> Result<(), Error> {
        self.write_scalar(key, value.as_ref());
        Ok(())
    }

    /// Written as a tag 4 decimal fraction, `[-scale, mantissa]`.
    pub fn write_decimal_value(&mut self, key: &str, value: Option<Decimal>) -> Result<(), Error> {
        if let Some(value) = value {
            self.write_key(key);
            let e = self.next_item();
            e.emit_tag(4);
            e.emit_array_header(Some(2));
            e.emit(&-(value.scale() as i64));
            e.emit_bignum(value.mantissa());
        }
        Ok(())
    }

    /// Written as hyphenated lowercase text.
    pub fn write_guid_value(&mut self, key: &str, value: Option<Uuid>) -> Result<(), Error> {
        self.write_scalar(key, value.map(|g| g.hyphenated().to_string()).as_ref());
        Ok(())
    }

    /// Written as tag 0 RFC 3339 text.
    pub fn write_date_time_offset_value(
        &mut self,
        key: &str,
        value: Option<OffsetDateTime>,
    ) -> Result<(), Error> {
        if let Some(value) = value {
            let text = iso8601::format_date_time_offset(value)?;
            self.write_key(key);
            self.next_item().emit_tagged(&text, 0);
        }
        Ok(())
    }

    pub fn write_time_span_value(&mut self, key: &str, value: Option<Duration>) -> Result<(), Error> {
        self.write_scalar(key, value.map(iso8601::format_duration).as_ref());
        Ok(())
    }

    pub fn write_date_value(&mut self, key: &str, value: Option<Date>) -> Result<(), Error> {
        let text = value.map(iso8601::format_date).transpose()?;
        self.write_scalar(key, text.as_ref());
        Ok(())
    }

    pub fn write_time_value(&mut self, key: &str, value: Option<Time>) -> Result<(), Error> {
        let text = value.map(iso8601::format_time).transpose()?;
        self.write_scalar(key, text.as_ref());
        Ok(())
    }

    /// Written as base64 text.
    pub fn write_byte_array_value(&mut self, key: &str, value: Option<&[u8]>) -> Result<(), Error> {
        self.write_scalar(key, value.map(|v| STANDARD.encode(v)).as_ref());
        Ok(())
    }

    pub fn write_null_value(&mut self, key: &str) -> Result<(), Error> {
        self.write_key(key);
        self.next_item().emit_null();
        Ok(())
    }

    pub fn write_enum_value<T: EnumValue>(&mut self, key: &str, value: Option<T>) -> Result<(), Error> {
        let text = value.map(enum_wire_value).transpose()?;
        self.write_scalar(key, text.as_ref());
        Ok(())
    }

    pub fn write_collection_of_primitive_values<T: PrimitiveValue>(
        &mut self,
        key: &str,
        values: Option<&[T]>,
    ) -> Result<(), Error> {
        let Some(values) = values else {
            return Ok(());
        };
        self.write_key(key);
        self.start_container(false);
        for value in values {
            value.write_value(self)?;
        }
        self.end_container();
        Ok(())
    }

    pub fn write_collection_of_enum_values<T: EnumValue>(
        &mut self,
        key: &str,
        values: Option<&[Option<T>]>,
    ) -> Result<(), Error> {
        let Some(values) = values else {
            return Ok(());
        };
        self.write_key(key);
        self.start_container(false);
        for value in values {
            self.write_enum_value("", *value)?;
        }
        self.end_container();
        Ok(())
    }

    pub fn write_collection_of_object_values<T: Parsable>(
        &mut self,
        key: &str,
        values: Option<&[T]>,
    ) -> Result<(), Error> {
        let Some(values) = values else {
            return Ok(());
        };
        self.write_key(key);
        self.start_container(false);
        for value in values {
            self.write_object("", Some(value), &[])?;
        }
        self.end_container();
        Ok(())
    }

    /// Writes `value` and the fields of `additional_values_to_merge` as one map.
    ///
    /// Composed-type wrappers get no map of their own; they write their
    /// populated branch directly.
    pub fn write_object_value<T: Parsable>(
        &mut self,
        key: &str,
        value: Option<&T>,
        additional_values_to_merge: &[&dyn Parsable],
    ) -> Result<(), Error> {
        self.write_object(
            key,
            value.map(|v| v as &dyn Parsable),
            additional_values_to_merge,
        )
    }

    fn write_object(
        &mut self,
        key: &str,
        value: Option<&dyn Parsable>,
        additional_values_to_merge: &[&dyn Parsable],
    ) -> Result<(), Error> {
        if value.is_none() && additional_values_to_merge.is_empty() {
            return Ok(());
        }
        self.write_key(key);
        let mark = self.encoder.offset();

        let is_composed = value.is_some_and(|v| v.is_composed_type_wrapper())
            || additional_values_to_merge
                .iter()
                .any(|v| v.is_composed_type_wrapper());

        if let Some(value) = value {
            self.before_object(value);
        }
        if !is_composed {
            self.start_container(true);
        }
        if let Some(value) = value {
            self.start_object(value)?;
            value.serialize(self)?;
        }
        for additional in additional_values_to_merge {
            self.before_object(*additional);
            self.start_object(*additional)?;
            additional.serialize(self)?;
            self.after_object(*additional);
        }
        if !is_composed {
            self.end_container();
        } else if !key.is_empty() && self.encoder.offset() == mark {
            // A wrapper with no populated branch still owes its key a value
            self.next_item().emit_null();
        }
        if let Some(value) = value {
            self.after_object(value);
        }
        Ok(())
    }

    fn before_object(&self, value: &dyn Parsable) {
        if let Some(hook) = &self.on_before_object_serialization {
            hook(value);
        }
    }

    fn after_object(&self, value: &dyn Parsable) {
        if let Some(hook) = &self.on_after_object_serialization {
            hook(value);
        }
    }

    fn start_object(&mut self, value: &dyn Parsable) -> Result<(), Error> {
        match self.on_start_object_serialization.clone() {
            Some(hook) => hook(value, self),
            None => Ok(()),
        }
    }

    pub fn write_additional_data(&mut self, additional_data: &AdditionalData) -> Result<(), Error> {
        for (key, value) in additional_data {
            self.write_any_value(key, value)?;
        }
        Ok(())
    }

    /// Writes a natively typed value through its typed writer.
    pub fn write_any_value(&mut self, key: &str, value: &AdditionalValue) -> Result<(), Error> {
        match value {
            AdditionalValue::Null => self.write_null_value(key),
            AdditionalValue::Bool(v) => self.write_bool_value(key, Some(*v)),
            AdditionalValue::Byte(v) => self.write_byte_value(key, Some(*v)),
            AdditionalValue::Sbyte(v) => self.write_sbyte_value(key, Some(*v)),
            AdditionalValue::Int(v) => self.write_int_value(key, Some(*v)),
            AdditionalValue::Long(v) => self.write_long_value(key, Some(*v)),
            AdditionalValue::UInt64(v) => {
                self.write_scalar(key, Some(v));
                Ok(())
            }
            AdditionalValue::Float(v) => self.write_float_value(key, Some(*v)),
            AdditionalValue::Double(v) => self.write_double_value(key, Some(*v)),
            AdditionalValue::Decimal(v) => self.write_decimal_value(key, Some(*v)),
            AdditionalValue::String(v) => self.write_string_value(key, Some(v)),
            AdditionalValue::Guid(v) => self.write_guid_value(key, Some(*v)),
            AdditionalValue::DateTime(v) => {
                self.write_date_time_offset_value(key, Some(v.assume_utc()))
            }
            AdditionalValue::DateTimeOffset(v) => self.write_date_time_offset_value(key, Some(*v)),
            AdditionalValue::Duration(v) => self.write_time_span_value(key, Some(*v)),
            AdditionalValue::Date(v) => self.write_date_value(key, Some(*v)),
            AdditionalValue::Time(v) => self.write_time_value(key, Some(*v)),
            AdditionalValue::Collection(items) => {
                self.write_key(key);
                self.start_container(false);
                for item in items {
                    self.write_any_value("", item)?;
                }
                self.end_container();
                Ok(())
            }
            AdditionalValue::Node(node) => {
                self.write_key(key);
                self.write_node(node)
            }
            AdditionalValue::Object(object) => self.write_object(key, Some(object.as_ref()), &[]),
            AdditionalValue::Untyped(json) => {
                self.write_key(key);
                self.write_json(json);
                Ok(())
            }
        }
    }

    fn write_node(&mut self, node: &Node) -> Result<(), Error> {
        match node {
            Node::Null => self.next_item().emit_null(),
            Node::Bool(v) => self.next_item().emit(v),
            Node::UInt64(v) => self.next_item().emit(v),
            Node::Int64(v) => self.next_item().emit(v),
            Node::Float32(v) => self.next_item().emit(v),
            Node::Float64(v) => self.next_item().emit(v),
            Node::Decimal(v) => return self.write_decimal_value("", Some(*v)),
            Node::Text(s) => self.next_item().emit(s),
            Node::Guid(g) => return self.write_guid_value("", Some(*g)),
            Node::Timestamp {
                text: Some(text), ..
            } => self.next_item().emit_tagged(text, 0),
            Node::Timestamp { value, text: None } => {
                return self.write_date_time_offset_value("", Some(*value));
            }
            Node::Array(items) => {
                self.start_container(false);
                for item in items {
                    self.write_node(item)?;
                }
                self.end_container();
            }
            Node::Map(entries) => {
                self.start_container(true);
                for (key, value) in entries {
                    self.next_item().emit(key);
                    self.write_node(value)?;
                }
                self.end_container();
            }
        }
        Ok(())
    }

    fn write_json(&mut self, value: &serde_json::Value) {
        match value {
            serde_json::Value::Null => self.next_item().emit_null(),
            serde_json::Value::Bool(b) => self.next_item().emit(b),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    self.next_item().emit(&v)
                } else if let Some(v) = n.as_i64() {
                    self.next_item().emit(&v)
                } else if let Some(v) = n.as_f64() {
                    self.next_item().emit(&v)
                } else {
                    self.next_item().emit_null()
                }
            }
            serde_json::Value::String(s) => self.next_item().emit(s),
            serde_json::Value::Array(items) => {
                self.start_container(false);
                for item in items {
                    self.write_json(item);
                }
                self.end_container();
            }
            serde_json::Value::Object(entries) => {
                self.start_container(true);
                for (key, value) in entries {
                    self.next_item().emit(key);
                    self.write_json(value);
                }
                self.end_container();
            }
        }
    }
}
