use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded value")]
    NotEnoughData,

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Chunked string contains an invalid chunk")]
    InvalidChunk,

    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),

    #[error("Unexpected break marker")]
    UnexpectedBreak,

    #[error("Map has a key with no value")]
    PartialMap,

    #[error("Length {0} is too large")]
    LengthOverflow(u64),

    #[error(transparent)]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// One CBOR data item head, with string payloads already collected.
///
/// Arrays and maps only carry their element count (`None` when indefinite);
/// the caller reads the elements that follow. A tag is reported on its own,
/// ahead of the item it applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<'a> {
    UnsignedInteger(u64),
    NegativeInteger(u64),
    Bytes(Cow<'a, [u8]>),
    Text(Cow<'a, str>),
    Array(Option<usize>),
    Map(Option<usize>),
    Tag(u64),
    False,
    True,
    Null,
    Undefined,
    Simple(u8),
    Half(half::f16),
    Single(f32),
    Double(f64),
    Break,
}

impl Item<'_> {
    pub fn type_name(&self) -> &'static str {
        match self {
            Item::UnsignedInteger(_) => "Unsigned Integer",
            Item::NegativeInteger(_) => "Negative Integer",
            Item::Bytes(_) => "Byte String",
            Item::Text(_) => "Text String",
            Item::Array(_) => "Array",
            Item::Map(_) => "Map",
            Item::Tag(_) => "Tag",
            Item::False | Item::True => "Boolean",
            Item::Null => "Null",
            Item::Undefined => "Undefined",
            Item::Simple(_) => "Simple Value",
            Item::Half(_) => "Half-precision Float",
            Item::Single(_) => "Single-precision Float",
            Item::Double(_) => "Double-precision Float",
            Item::Break => "Break",
        }
    }
}

/// A forward-only cursor over an encoded buffer.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Returns `true` if the next byte is a break marker, without consuming it.
    pub fn peek_break(&self) -> Result<bool, Error> {
        match self.data.get(self.offset) {
            Some(b) => Ok(*b == 0xFF),
            None => Err(Error::NotEnoughData),
        }
    }

    /// Consumes a break marker if one is next.
    pub fn try_read_break(&mut self) -> Result<bool, Error> {
        if self.peek_break()? {
            self.offset += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(Error::NotEnoughData)?;
        let s = &self.data[self.offset..end];
        self.offset = end;
        Ok(s)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        self.take(N)?
            .try_into()
            .map_err(|_| Error::NotEnoughData)
    }

    fn parse_uint_minor(&mut self, minor: u8) -> Result<u64, Error> {
        match minor {
            val if val < 24 => Ok(val as u64),
            24 => Ok(self.take_array::<1>()?[0] as u64),
            25 => Ok(u16::from_be_bytes(self.take_array()?) as u64),
            26 => Ok(u32::from_be_bytes(self.take_array()?) as u64),
            27 => Ok(u64::from_be_bytes(self.take_array()?)),
            _ => Err(Error::InvalidMinorValue(minor)),
        }
    }

    fn parse_length_minor(&mut self, minor: u8) -> Result<usize, Error> {
        let len = self.parse_uint_minor(minor)?;
        usize::try_from(len).map_err(|_| Error::LengthOverflow(len))
    }

    fn parse_data_minor(&mut self, minor: u8) -> Result<&'a [u8], Error> {
        let len = self.parse_length_minor(minor)?;
        self.take(len)
    }

    fn parse_data_chunked(&mut self, major: u8) -> Result<Vec<u8>, Error> {
        let mut data = Vec::new();
        loop {
            let b = self.take_array::<1>()?[0];
            if b == 0xFF {
                break Ok(data);
            }
            if b >> 5 != major {
                return Err(Error::InvalidChunk);
            }
            let minor = b & 0x1F;
            if minor == 31 {
                return Err(Error::InvalidChunk);
            }
            data.extend_from_slice(self.parse_data_minor(minor)?);
        }
    }

    /// Reads the head of the next data item.
    ///
    /// Definite and indefinite length strings are returned whole; for arrays
    /// and maps the cursor is left on the first element.
    pub fn read_item(&mut self) -> Result<Item<'a>, Error> {
        let b = self.take_array::<1>()?[0];
        match (b >> 5, b & 0x1F) {
            (0, minor) => self.parse_uint_minor(minor).map(Item::UnsignedInteger),
            (1, minor) => self.parse_uint_minor(minor).map(Item::NegativeInteger),
            (2, 31) => {
                /* Indefinite length byte string */
                self.parse_data_chunked(2).map(|v| Item::Bytes(Cow::Owned(v)))
            }
            (2, minor) => {
                /* Known length byte string */
                self.parse_data_minor(minor)
                    .map(|v| Item::Bytes(Cow::Borrowed(v)))
            }
            (3, 31) => {
                /* Indefinite length text string, each chunk must be valid UTF-8 on its own */
                let mut s = String::new();
                loop {
                    let b = self.take_array::<1>()?[0];
                    if b == 0xFF {
                        break Ok(Item::Text(Cow::Owned(s)));
                    }
                    if b >> 5 != 3 || b & 0x1F == 31 {
                        return Err(Error::InvalidChunk);
                    }
                    s.push_str(std::str::from_utf8(self.parse_data_minor(b & 0x1F)?)?);
                }
            }
            (3, minor) => {
                /* Known length text string */
                let t = self.parse_data_minor(minor)?;
                Ok(Item::Text(Cow::Borrowed(std::str::from_utf8(t)?)))
            }
            (4, 31) => Ok(Item::Array(None)),
            (4, minor) => self.parse_length_minor(minor).map(|c| Item::Array(Some(c))),
            (5, 31) => Ok(Item::Map(None)),
            (5, minor) => self.parse_length_minor(minor).map(|c| Item::Map(Some(c))),
            (6, minor) => self.parse_uint_minor(minor).map(Item::Tag),
            (7, 20) => Ok(Item::False),
            (7, 21) => Ok(Item::True),
            (7, 22) => Ok(Item::Null),
            (7, 23) => Ok(Item::Undefined),
            (7, minor @ 0..=19) => Ok(Item::Simple(minor)),
            (7, 24) => {
                let v = self.take_array::<1>()?[0];
                if v < 32 {
                    Err(Error::InvalidSimpleValue(v))
                } else {
                    Ok(Item::Simple(v))
                }
            }
            (7, 25) => Ok(Item::Half(half::f16::from_be_bytes(self.take_array()?))),
            (7, 26) => Ok(Item::Single(f32::from_be_bytes(self.take_array()?))),
            (7, 27) => Ok(Item::Double(f64::from_be_bytes(self.take_array()?))),
            (7, 31) => Ok(Item::Break),
            (_, minor) => Err(Error::InvalidMinorValue(minor)),
        }
    }

    /// Reads the next item and fails if it is a break marker.
    pub fn read_value(&mut self) -> Result<Item<'a>, Error> {
        match self.read_item()? {
            Item::Break => Err(Error::UnexpectedBreak),
            item => Ok(item),
        }
    }
}

/// Interprets big-endian bignum content (RFC 8949, section 3.4.3).
///
/// Leading zero bytes are ignored; `None` if the magnitude does not fit.
pub fn bignum_magnitude(bytes: &[u8]) -> Option<u128> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let bytes = &bytes[start..];
    if bytes.len() > 16 {
        return None;
    }
    Some(bytes.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128))
}

/// Converts a major type 1 argument to its signed value, `-1 - n`.
pub fn negative_to_i64(n: u64) -> Option<i64> {
    i64::try_from(n).ok().map(|n| -1 - n)
}
