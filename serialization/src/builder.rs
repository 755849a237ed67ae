use super::*;
use cbor::decode::{Item, Reader};
use indexmap::{IndexMap, map::Entry};
use rust_decimal::Decimal;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

/// Decodes a complete payload into a value tree.
///
/// The payload must hold exactly one item; anything after it is an error.
#[cfg_attr(feature = "instrument", instrument(skip_all))]
pub fn parse(data: &[u8], config: &Config) -> Result<Arc<Node>, Error> {
    let mut reader = Reader::new(data);
    let node = build(&mut reader, config, config.max_recursion)?;
    if !reader.is_empty() {
        return Err(Error::AdditionalData);
    }
    Ok(Arc::new(node))
}

fn build(reader: &mut Reader, config: &Config, depth: usize) -> Result<Node, Error> {
    let item = reader.read_value()?;
    build_item(reader, item, config, depth)
}

fn descend(depth: usize, config: &Config) -> Result<usize, Error> {
    depth
        .checked_sub(1)
        .ok_or(Error::MaxRecursion(config.max_recursion))
}

fn build_item(
    reader: &mut Reader,
    item: Item,
    config: &Config,
    depth: usize,
) -> Result<Node, Error> {
    match item {
        Item::Array(count) => {
            let depth = descend(depth, config)?;
            let mut seq = cbor::Array::new(count)?;
            let mut items = Vec::with_capacity(seq.len().unwrap_or(0).min(reader.remaining()));
            while let Some(node) = seq.try_parse_value(reader, |r| build(r, config, depth))? {
                items.push(Arc::new(node));
            }
            Ok(Node::Array(items))
        }
        Item::Map(count) => {
            let depth = descend(depth, config)?;
            let mut seq = cbor::Map::new(count)?;
            let mut entries = IndexMap::new();
            while let Some(key) = seq.try_parse_value(reader, read_key)? {
                let value = seq.parse_value(reader, |r| build(r, config, depth))?;
                match entries.entry(key) {
                    Entry::Occupied(e) => return Err(Error::DuplicateKey(e.key().clone())),
                    Entry::Vacant(e) => {
                        e.insert(Arc::new(value));
                    }
                }
            }
            Ok(Node::Map(entries))
        }
        Item::False => Ok(Node::Bool(false)),
        Item::True => Ok(Node::Bool(true)),
        Item::Null | Item::Undefined => Ok(Node::Null),
        Item::UnsignedInteger(v) => Ok(Node::UInt64(v)),
        Item::NegativeInteger(n) => cbor::decode::negative_to_i64(n)
            .map(Node::Int64)
            .ok_or(Error::IntegerOverflow(n)),
        Item::Half(f) => Ok(Node::Float32(f.to_f32())),
        Item::Single(f) => Ok(Node::Float32(f)),
        Item::Double(f) => Ok(Node::Float64(f)),
        Item::Text(s) => Ok(text_node(s.into_owned(), config)),
        Item::Bytes(b) => Uuid::from_slice(&b)
            .map(Node::Guid)
            .map_err(|_| Error::InvalidByteString(b.len())),
        Item::Tag(tag) => {
            let depth = descend(depth, config)?;
            build_tagged(reader, tag, config, depth)
        }
        item => Err(Error::UnsupportedCborKind(item.type_name())),
    }
}

fn read_key(reader: &mut Reader) -> Result<String, Error> {
    match reader.read_value()? {
        Item::Text(s) => Ok(s.into_owned()),
        item => Err(Error::NonTextKey(item.type_name())),
    }
}

fn text_node(text: String, config: &Config) -> Node {
    if config.text_timestamps {
        if let Ok(value) = OffsetDateTime::parse(&text, &Rfc3339) {
            return Node::Timestamp {
                value,
                text: Some(text),
            };
        }
    }
    Node::Text(text)
}

fn build_tagged(
    reader: &mut Reader,
    tag: u64,
    config: &Config,
    depth: usize,
) -> Result<Node, Error> {
    match tag {
        0 => match reader.read_value()? {
            Item::Text(s) => OffsetDateTime::parse(&s, &Rfc3339)
                .map(|value| Node::Timestamp {
                    value,
                    text: Some(s.into_owned()),
                })
                .map_err(|_| Error::InvalidTaggedValue(tag)),
            _ => Err(Error::InvalidTaggedValue(tag)),
        },
        1 => {
            let value = match reader.read_value()? {
                Item::UnsignedInteger(v) => i64::try_from(v)
                    .ok()
                    .and_then(|v| OffsetDateTime::from_unix_timestamp(v).ok()),
                Item::NegativeInteger(n) => cbor::decode::negative_to_i64(n)
                    .and_then(|v| OffsetDateTime::from_unix_timestamp(v).ok()),
                Item::Half(f) => epoch_float(f.to_f64()),
                Item::Single(f) => epoch_float(f as f64),
                Item::Double(f) => epoch_float(f),
                _ => None,
            };
            value
                .map(|value| Node::Timestamp { value, text: None })
                .ok_or(Error::InvalidTaggedValue(tag))
        }
        2 | 3 => {
            let value = read_bignum(reader, tag)?;
            Decimal::try_from_i128_with_scale(value, 0)
                .map(Node::Decimal)
                .map_err(|_| Error::InvalidTaggedValue(tag))
        }
        4 => read_decimal_fraction(reader, config, depth).map(Node::Decimal),
        _ => Err(Error::UnsupportedTag(tag)),
    }
}

fn epoch_float(seconds: f64) -> Option<OffsetDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    OffsetDateTime::from_unix_timestamp_nanos((seconds * 1e9).round() as i128).ok()
}

fn read_bignum(reader: &mut Reader, tag: u64) -> Result<i128, Error> {
    let Item::Bytes(bytes) = reader.read_value()? else {
        return Err(Error::InvalidTaggedValue(tag));
    };
    let magnitude = cbor::decode::bignum_magnitude(&bytes)
        .and_then(|m| i128::try_from(m).ok())
        .ok_or(Error::InvalidTaggedValue(tag))?;
    Ok(if tag == 3 { -1 - magnitude } else { magnitude })
}

fn read_integer(reader: &mut Reader, depth: usize, config: &Config) -> Result<i128, Error> {
    match reader.read_value()? {
        Item::UnsignedInteger(v) => Ok(v as i128),
        Item::NegativeInteger(n) => Ok(-1 - n as i128),
        Item::Tag(tag @ (2 | 3)) => {
            descend(depth, config)?;
            read_bignum(reader, tag)
        }
        _ => Err(Error::InvalidTaggedValue(4)),
    }
}

/// Tag 4: `[exponent, mantissa]`, value = mantissa * 10^exponent.
fn read_decimal_fraction(
    reader: &mut Reader,
    config: &Config,
    depth: usize,
) -> Result<Decimal, Error> {
    let Item::Array(count) = reader.read_value()? else {
        return Err(Error::InvalidTaggedValue(4));
    };
    let depth = descend(depth, config)?;
    let mut seq = cbor::Array::new(count)?;
    let exponent = seq.parse_value(reader, |r| read_integer(r, depth, config))?;
    let mantissa = seq.parse_value(reader, |r| read_integer(r, depth, config))?;
    if seq
        .try_parse_value(reader, |r| r.read_value().map_err(Error::from))?
        .is_some()
    {
        return Err(Error::InvalidTaggedValue(4));
    }

    let (mantissa, scale) = if exponent <= 0 {
        let scale = exponent
            .checked_neg()
            .and_then(|e| u32::try_from(e).ok())
            .ok_or(Error::InvalidTaggedValue(4))?;
        (mantissa, scale)
    } else {
        let factor = u32::try_from(exponent)
            .ok()
            .and_then(|e| 10i128.checked_pow(e))
            .and_then(|f| mantissa.checked_mul(f))
            .ok_or(Error::InvalidTaggedValue(4))?;
        (factor, 0)
    };
    Decimal::try_from_i128_with_scale(mantissa, scale).map_err(|_| Error::InvalidTaggedValue(4))
}
