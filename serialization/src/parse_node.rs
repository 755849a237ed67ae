use super::*;
use base64::{Engine, engine::general_purpose::STANDARD};
use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime, Time};
use uuid::Uuid;

/// Runs against an object before or after its fields are assigned.
pub type AssignHook = Arc<dyn Fn(&mut dyn Parsable) + Send + Sync>;

/// A read-only view of one node of a decoded payload.
#[derive(Clone)]
pub struct ParseNode {
    node: Arc<Node>,
    on_before_assign_field_values: Option<AssignHook>,
    on_after_assign_field_values: Option<AssignHook>,
}

impl std::fmt::Debug for ParseNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseNode")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl ParseNode {
    /// Decodes `data` with the default [`Config`].
    pub fn new(data: &[u8]) -> Result<Self, Error> {
        Self::with_config(data, &Config::default())
    }

    pub fn with_config(data: &[u8], config: &Config) -> Result<Self, Error> {
        builder::parse(data, config).map(Self::from_node)
    }

    pub fn from_node(node: Arc<Node>) -> Self {
        Self {
            node,
            on_before_assign_field_values: None,
            on_after_assign_field_values: None,
        }
    }

    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    pub fn on_before_assign_field_values(&self) -> Option<&AssignHook> {
        self.on_before_assign_field_values.as_ref()
    }

    pub fn set_on_before_assign_field_values(&mut self, hook: Option<AssignHook>) {
        self.on_before_assign_field_values = hook;
    }

    pub fn on_after_assign_field_values(&self) -> Option<&AssignHook> {
        self.on_after_assign_field_values.as_ref()
    }

    pub fn set_on_after_assign_field_values(&mut self, hook: Option<AssignHook>) {
        self.on_after_assign_field_values = hook;
    }

    fn child(&self, node: Arc<Node>) -> Self {
        Self {
            node,
            on_before_assign_field_values: self.on_before_assign_field_values.clone(),
            on_after_assign_field_values: self.on_after_assign_field_values.clone(),
        }
    }

    /// The value under `identifier` when this node is a map.
    pub fn get_child_node(&self, identifier: &str) -> Result<Option<Self>, Error> {
        if identifier.is_empty() {
            return Err(Error::InvalidArgument("identifier cannot be empty"));
        }
        Ok(self.node.get(identifier).map(|n| self.child(n.clone())))
    }

    pub fn get_string_value(&self) -> Option<String> {
        self.node.as_text().map(str::to_owned)
    }

    pub fn get_bool_value(&self) -> Option<bool> {
        match *self.node {
            Node::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn get_byte_value(&self) -> Option<u8> {
        self.get_int_value().and_then(|v| u8::try_from(v).ok())
    }

    pub fn get_sbyte_value(&self) -> Option<i8> {
        self.get_int_value().and_then(|v| i8::try_from(v).ok())
    }

    pub fn get_int_value(&self) -> Option<i32> {
        match *self.node {
            Node::Int64(v) => i32::try_from(v).ok(),
            Node::UInt64(v) => i32::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn get_long_value(&self) -> Option<i64> {
        match *self.node {
            Node::Int64(v) => Some(v),
            Node::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn get_float_value(&self) -> Option<f32> {
        match *self.node {
            Node::Float32(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_double_value(&self) -> Option<f64> {
        match *self.node {
            Node::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_decimal_value(&self) -> Option<Decimal> {
        match *self.node {
            Node::Decimal(v) => Some(v),
            _ => None,
        }
    }

    /// A GUID node, or text holding a GUID.
    pub fn get_guid_value(&self) -> Option<Uuid> {
        match &*self.node {
            Node::Guid(g) => Some(*g),
            Node::Text(s) => Uuid::parse_str(s).ok(),
            _ => None,
        }
    }

    pub fn get_date_time_offset_value(&self) -> Option<OffsetDateTime> {
        match *self.node {
            Node::Timestamp { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn get_time_span_value(&self) -> Option<Duration> {
        self.node.as_text().and_then(iso8601::parse_duration)
    }

    pub fn get_date_value(&self) -> Option<Date> {
        self.node.as_text().and_then(iso8601::parse_date)
    }

    pub fn get_time_value(&self) -> Option<Time> {
        self.node.as_text().and_then(iso8601::parse_time)
    }

    /// Base64 text, decoded.
    pub fn get_byte_array_value(&self) -> Option<Vec<u8>> {
        self.node
            .as_text()
            .filter(|s| !s.is_empty())
            .and_then(|s| STANDARD.decode(s).ok())
    }

    pub fn get_enum_value<T: EnumValue>(&self) -> Option<T> {
        self.node.as_text().and_then(parse_enum)
    }

    fn elements(&self) -> impl Iterator<Item = Self> + '_ {
        self.node.elements().iter().map(|n| self.child(n.clone()))
    }

    pub fn get_collection_of_primitive_values<T: PrimitiveValue>(
        &self,
    ) -> impl Iterator<Item = Option<T>> + '_ {
        self.elements().map(|n| T::from_parse_node(&n))
    }

    pub fn get_collection_of_enum_values<T: EnumValue>(
        &self,
    ) -> impl Iterator<Item = Option<T>> + '_ {
        self.elements().map(|n| n.get_enum_value())
    }

    pub fn get_collection_of_object_values<'a, T, F>(
        &'a self,
        factory: F,
    ) -> impl Iterator<Item = Result<T, Error>> + 'a
    where
        T: Parsable,
        F: Fn(&ParseNode) -> Result<T, Error> + 'a,
    {
        self.elements().map(move |n| n.get_object_value(&factory))
    }

    /// Builds an object with `factory`, then assigns its fields from this node.
    ///
    /// The factory sees the node first, so it can pick a concrete type or a
    /// composed-type branch before any field is assigned.
    pub fn get_object_value<T, F>(&self, factory: F) -> Result<T, Error>
    where
        T: Parsable,
        F: FnOnce(&ParseNode) -> Result<T, Error>,
    {
        let mut item = factory(self)?;
        if let Some(hook) = &self.on_before_assign_field_values {
            hook(&mut item);
        }
        self.assign_field_values(&mut item)?;
        if let Some(hook) = &self.on_after_assign_field_values {
            hook(&mut item);
        }
        Ok(item)
    }

    fn assign_field_values<T: Parsable>(&self, item: &mut T) -> Result<(), Error> {
        let Node::Map(entries) = &*self.node else {
            return Ok(());
        };
        let deserializers = item.field_deserializers();
        for (key, value) in entries {
            if value.is_null() {
                continue;
            }
            if let Some(deserializer) = deserializers.get(key.as_str()) {
                trace!("Found field {key} to deserialize");
                deserializer(item, &self.child(value.clone()))?;
            } else if let Some(additional_data) = item.additional_data_mut() {
                trace!("Found additional field {key} to deserialize");
                additional_data
                    .entry(key.clone())
                    .or_insert_with(|| infer_any_value(value));
            } else {
                trace!("Found additional field {key} but the model does not keep additional data");
            }
        }
        Ok(())
    }

    /// Writes this node's inferred value, unkeyed.
    pub fn write_to(&self, writer: &mut SerializationWriter) -> Result<(), Error> {
        writer.write_any_value("", &infer_any_value(&self.node))
    }
}

/// Infers a native value for a node with no declared type.
///
/// Text is tried as a date-time without offset, then with one, then as a
/// GUID, and otherwise kept as text. Maps are kept as raw nodes.
pub fn infer_any_value(node: &Arc<Node>) -> AdditionalValue {
    match &**node {
        Node::Null => AdditionalValue::Null,
        Node::Bool(b) => AdditionalValue::Bool(*b),
        Node::UInt64(v) => AdditionalValue::UInt64(*v),
        Node::Int64(v) => AdditionalValue::Long(*v),
        Node::Float32(v) => AdditionalValue::Float(*v),
        Node::Float64(v) => AdditionalValue::Double(*v),
        Node::Decimal(v) => AdditionalValue::Decimal(*v),
        Node::Text(s) => infer_text(s),
        Node::Guid(g) => AdditionalValue::Guid(*g),
        Node::Timestamp { value, .. } => AdditionalValue::DateTimeOffset(*value),
        Node::Array(items) => AdditionalValue::Collection(items.iter().map(infer_any_value).collect()),
        Node::Map(_) => AdditionalValue::Node(node.clone()),
    }
}

fn infer_text(s: &str) -> AdditionalValue {
    if let Some(v) = iso8601::parse_date_time(s) {
        AdditionalValue::DateTime(v)
    } else if let Some(v) = iso8601::parse_date_time_offset(s) {
        AdditionalValue::DateTimeOffset(v)
    } else if let Ok(g) = Uuid::parse_str(s) {
        AdditionalValue::Guid(g)
    } else {
        AdditionalValue::String(s.to_owned())
    }
}
