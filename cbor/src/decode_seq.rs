use super::decode::{Error, Reader};

/// Tracks progress through the elements of an array (`D == 1`) or the
/// key/value pairs of a map (`D == 2`).
#[derive(Debug, Clone)]
pub struct Sequence<const D: usize> {
    count: Option<usize>,
    parsed: usize,
}

pub type Array = Sequence<1>;
pub type Map = Sequence<2>;

impl<const D: usize> Sequence<D> {
    /// `count` is the head's argument: elements for arrays, pairs for maps.
    pub fn new(count: Option<usize>) -> Result<Self, Error> {
        let count = match count {
            Some(c) => Some(
                c.checked_mul(D)
                    .ok_or(Error::LengthOverflow(c as u64))?,
            ),
            None => None,
        };
        Ok(Self { count, parsed: 0 })
    }

    pub fn len(&self) -> Option<usize> {
        self.count.map(|c| c / D)
    }

    pub fn is_empty(&self) -> bool {
        self.count == Some(0)
    }

    pub fn is_definite(&self) -> bool {
        self.count.is_some()
    }

    fn check_for_end(&mut self, reader: &mut Reader) -> Result<bool, Error> {
        if let Some(count) = self.count {
            Ok(self.parsed >= count)
        } else if reader.peek_break()? {
            if self.parsed % D == 1 {
                Err(Error::PartialMap)
            } else {
                reader.try_read_break()?;
                self.count = Some(self.parsed);
                Ok(true)
            }
        } else {
            Ok(false)
        }
    }

    /// Parses the next element with `f`, or returns `None` at the end of the sequence.
    pub fn try_parse_value<'a, T, F, E>(
        &mut self,
        reader: &mut Reader<'a>,
        f: F,
    ) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut Reader<'a>) -> Result<T, E>,
        E: From<Error>,
    {
        if self.check_for_end(reader)? {
            return Ok(None);
        }
        let r = f(reader)?;
        self.parsed += 1;
        Ok(Some(r))
    }

    #[inline]
    pub fn parse_value<'a, T, F, E>(&mut self, reader: &mut Reader<'a>, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Reader<'a>) -> Result<T, E>,
        E: From<Error>,
    {
        match self.try_parse_value(reader, f)? {
            Some(v) => Ok(v),
            None if D == 2 && self.parsed % 2 == 1 => Err(Error::PartialMap.into()),
            None => Err(Error::NotEnoughData.into()),
        }
    }
}
