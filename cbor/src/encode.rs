pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

#[derive(Debug, Default)]
pub struct Encoder {
    data: Vec<u8>,
}

fn uint_head(major: u8, val: u64) -> ([u8; 9], usize) {
    let mut head = [0u8; 9];
    let len = if val < 24 {
        head[0] = (major << 5) | (val as u8);
        1
    } else if val <= u8::MAX as u64 {
        head[0] = (major << 5) | 24u8;
        head[1] = val as u8;
        2
    } else if val <= u16::MAX as u64 {
        head[0] = (major << 5) | 25u8;
        head[1..3].copy_from_slice(&(val as u16).to_be_bytes());
        3
    } else if val <= u32::MAX as u64 {
        head[0] = (major << 5) | 26u8;
        head[1..5].copy_from_slice(&(val as u32).to_be_bytes());
        5
    } else {
        head[0] = (major << 5) | 27u8;
        head[1..9].copy_from_slice(&val.to_be_bytes());
        9
    };
    (head, len)
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    fn emit_uint_minor(&mut self, major: u8, val: u64) {
        let (head, len) = uint_head(major, val);
        self.data.extend_from_slice(&head[..len])
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }

    pub fn emit_tag(&mut self, tag: u64) {
        self.emit_uint_minor(6, tag);
    }

    pub fn emit_tagged<T>(&mut self, value: &T, tag: u64)
    where
        T: ToCbor + ?Sized,
    {
        self.emit_tag(tag);
        self.emit(value)
    }

    pub fn emit_null(&mut self) {
        self.data.push((7 << 5) | 22)
    }

    pub fn emit_break(&mut self) {
        self.data.push(0xFF)
    }

    /// Writes an integer in `i128` range, falling back to a tag 2/3 bignum
    /// when the magnitude does not fit a major type 0/1 argument.
    pub fn emit_bignum(&mut self, value: i128) {
        let (major, magnitude) = if value < 0 {
            (1u8, (-1 - value) as u128)
        } else {
            (0u8, value as u128)
        };
        if let Ok(v) = u64::try_from(magnitude) {
            self.emit_uint_minor(major, v)
        } else {
            let bytes = magnitude.to_be_bytes();
            let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
            self.emit_tag(2 + major as u64);
            bytes[start..].to_cbor(self);
        }
    }

    pub fn emit_array_header(&mut self, count: Option<usize>) {
        match count {
            Some(count) => self.emit_uint_minor(4, count as u64),
            None => self.data.push((4 << 5) | 31),
        }
    }

    pub fn emit_map_header(&mut self, count: Option<usize>) {
        match count {
            Some(count) => self.emit_uint_minor(5, count as u64),
            None => self.data.push((5 << 5) | 31),
        }
    }

    /// Inserts a definite-length container head at `offset`, shifting the
    /// already-written content of the container along.
    ///
    /// Used when the element count is only known once the container closes.
    pub fn insert_header(&mut self, offset: usize, is_map: bool, count: usize) {
        let (head, len) = uint_head(if is_map { 5 } else { 4 }, count as u64);
        self.data.splice(offset..offset, head[..len].iter().copied());
    }

    pub fn emit_array<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Array),
    {
        let mut a = Array::new(self, count);
        f(&mut a);
        a.end()
    }

    pub fn emit_slice<T>(&mut self, values: &[T])
    where
        T: ToCbor,
    {
        self.emit_array(Some(values.len()), |a| {
            for value in values {
                a.emit(value);
            }
        })
    }

    pub fn emit_map<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Map),
    {
        let mut m = Map::new(self, count);
        f(&mut m);
        m.end()
    }
}

pub struct Sequence<'a, const D: usize> {
    encoder: &'a mut Encoder,
    count: Option<usize>,
    idx: usize,
}

pub type Array<'a> = Sequence<'a, 1>;
pub type Map<'a> = Sequence<'a, 2>;

impl<'a, const D: usize> Sequence<'a, D> {
    fn new(encoder: &'a mut Encoder, count: Option<usize>) -> Self {
        if D == 1 {
            encoder.emit_array_header(count);
        } else {
            encoder.emit_map_header(count);
        }
        Self {
            encoder,
            count: count.map(|c| c * D),
            idx: 0,
        }
    }

    fn next_field(&mut self) -> &mut Encoder {
        self.idx += 1;
        match self.count {
            Some(count) if self.idx > count => {
                panic!("Too many items added to definite length sequence")
            }
            _ => {}
        };
        self.encoder
    }

    fn end(self) {
        let Some(count) = self.count else {
            return self.encoder.emit_break();
        };
        if self.idx != count {
            panic!(
                "Definite length sequence is short of items: {}, expected {}",
                self.idx, count
            );
        }
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        self.next_field().emit(value)
    }

    pub fn emit_tagged<T>(&mut self, value: &T, tag: u64)
    where
        T: ToCbor + ?Sized,
    {
        self.next_field().emit_tagged(value, tag)
    }

    pub fn emit_null(&mut self) {
        self.next_field().emit_null()
    }

    pub fn emit_array<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Array),
    {
        self.next_field().emit_array(count, f)
    }

    pub fn emit_map<F>(&mut self, count: Option<usize>, f: F)
    where
        F: FnOnce(&mut Map),
    {
        self.next_field().emit_map(count, f)
    }
}

macro_rules! impl_uint_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_uint_minor(0, *self as u64);
                }
            }
        )*
    };
}

impl_uint_to_cbor!(u8, u16, u32, u64, usize);

fn emit_i64(encoder: &mut Encoder, val: i64) {
    if val >= 0 {
        encoder.emit_uint_minor(0, val as u64);
    } else {
        encoder.emit_uint_minor(1, !(val as u64));
    }
}

macro_rules! impl_int_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    emit_i64(encoder, *self as i64)
                }
            }
        )*
    };
}

impl_int_to_cbor!(i8, i16, i32, i64, isize);

// Floats keep their declared width: the object codec relies on the head to
// tell single from double precision on the way back in.
impl ToCbor for f64 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.data.push((7 << 5) | 27);
        encoder.data.extend(self.to_be_bytes())
    }
}

impl ToCbor for f32 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.data.push((7 << 5) | 26);
        encoder.data.extend(self.to_be_bytes())
    }
}

impl ToCbor for half::f16 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.data.push((7 << 5) | 25);
        encoder.data.extend(self.to_be_bytes())
    }
}

impl ToCbor for bool {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.data.push((7 << 5) | if *self { 21 } else { 20 })
    }
}

impl ToCbor for str {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_uint_minor(3, self.len() as u64);
        encoder.data.extend_from_slice(self.as_bytes())
    }
}

impl ToCbor for String {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_str().to_cbor(encoder)
    }
}

impl ToCbor for [u8] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_uint_minor(2, self.len() as u64);
        encoder.data.extend_from_slice(self)
    }
}

impl<const N: usize> ToCbor for [u8; N] {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_slice().to_cbor(encoder)
    }
}

impl<T> ToCbor for Option<T>
where
    T: ToCbor,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Some(value) => encoder.emit(value),
            None => encoder.emit_null(),
        }
    }
}

pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}

pub fn emit_tagged<T>(value: &T, tag: u64) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::new();
    e.emit_tagged(value, tag);
    e.build()
}

pub fn emit_array<F>(count: Option<usize>, f: F) -> Vec<u8>
where
    F: FnOnce(&mut Array),
{
    let mut e = Encoder::new();
    e.emit_array(count, f);
    e.build()
}

pub fn emit_map<F>(count: Option<usize>, f: F) -> Vec<u8>
where
    F: FnOnce(&mut Map),
{
    let mut e = Encoder::new();
    e.emit_map(count, f);
    e.build()
}
