/*!
A typed object model codec over CBOR (RFC 8949).

Payloads are decoded eagerly into an immutable [`Node`] tree, which a
[`ParseNode`] then projects onto model types through their
[`Parsable::field_deserializers`] tables. Unknown fields are type-inferred into
the model's [`AdditionalData`] bag. Encoding runs the other way: models drive
a [`SerializationWriter`] from [`Parsable::serialize`].

```
use modelcbor::{ParseNode, SerializationWriter};

let mut writer = SerializationWriter::new();
writer.write_string_value("", Some("hello")).unwrap();
let data = writer.get_serialized_content().unwrap();

let node = ParseNode::new(&data).unwrap();
assert_eq!(node.get_string_value().as_deref(), Some("hello"));
```
*/

use modelcbor_codec as cbor;
use std::sync::Arc;
use tracing::*;

mod builder;
mod config;
mod enums;
mod error;
mod factory;
mod model;
mod node;
mod parse_node;
mod primitive;
mod writer;

pub mod iso8601;

pub use builder::parse;
pub use config::Config;
pub use enums::{EnumValue, Member, parse_enum, enum_wire_value};
pub use error::Error;
pub use factory::{CBOR_CONTENT_TYPE, CborParseNodeFactory, CborSerializationWriterFactory};
pub use model::{
    AdditionalData, AdditionalValue, FieldDeserializer, FieldDeserializers, Parsable, field,
    merge_deserializers, project_deserializers,
};
pub use node::Node;
pub use parse_node::{AssignHook, ParseNode, infer_any_value};
pub use primitive::PrimitiveValue;
pub use writer::{ObjectHook, SerializationWriter, StartObjectHook};

#[cfg(test)]
mod test_models;




#[cfg(test)]
mod iso8601_tests;


#[cfg(test)]
mod symmetry_tests;
