use super::*;
use std::borrow::Cow;

/// One named member of an enumeration.
#[derive(Debug, Clone, Copy)]
pub struct Member<T: 'static> {
    /// The member name as declared in the model.
    pub name: &'static str,
    /// Wire name override, used verbatim in both directions.
    pub wire_name: Option<&'static str>,
    pub value: T,
}

impl<T: 'static> Member<T> {
    pub const fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            wire_name: None,
            value,
        }
    }

    pub const fn renamed(name: &'static str, wire_name: &'static str, value: T) -> Self {
        Self {
            name,
            wire_name: Some(wire_name),
            value,
        }
    }

    /// The override if any, else the member name with its first letter lowered.
    pub fn wire_name(&self) -> Cow<'static, str> {
        if let Some(wire_name) = self.wire_name {
            return Cow::Borrowed(wire_name);
        }
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) if first.is_uppercase() => {
                Cow::Owned(first.to_lowercase().chain(chars).collect())
            }
            _ => Cow::Borrowed(self.name),
        }
    }
}

/// An enumeration that can be carried as text on the wire.
///
/// Flags enumerations set [`EnumValue::FLAGS`] and map to and from their bit
/// representation; plain enumerations use a distinct value per member.
pub trait EnumValue: Copy + 'static {
    const FLAGS: bool = false;

    fn members() -> &'static [Member<Self>];

    fn to_bits(self) -> u64;

    fn from_bits(bits: u64) -> Option<Self>;
}

/// Resolves wire text to an enumeration value.
///
/// A wire-name override is matched exactly and replaced with its member name;
/// member names then match case-insensitively. Flags values are split on `,`
/// and unknown parts are ignored.
pub fn parse_enum<T: EnumValue>(raw: &str) -> Option<T> {
    if raw.is_empty() {
        return None;
    }
    let canonical = T::members()
        .iter()
        .find(|m| m.wire_name == Some(raw))
        .map_or(raw, |m| m.name);

    let find = |name: &str| {
        let name = name.trim();
        T::members()
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    };

    if T::FLAGS {
        let bits = canonical
            .split(',')
            .filter_map(find)
            .fold(0, |bits, m| bits | m.value.to_bits());
        T::from_bits(bits)
    } else {
        find(canonical).map(|m| m.value)
    }
}

/// Renders an enumeration value as wire text.
pub fn enum_wire_value<T: EnumValue>(value: T) -> Result<String, Error> {
    let bits = value.to_bits();
    if T::FLAGS {
        let names = T::members()
            .iter()
            .filter(|m| {
                let b = m.value.to_bits();
                if b == 0 { bits == 0 } else { bits & b == b }
            })
            .map(|m| m.wire_name())
            .collect::<Vec<_>>();
        Ok(names.join(","))
    } else {
        T::members()
            .iter()
            .find(|m| m.value.to_bits() == bits)
            .map(|m| m.wire_name().into_owned())
            .ok_or(Error::InvalidEnumValue(bits, std::any::type_name::<T>()))
    }
}
