/*!
Low-level CBOR (RFC 8949) plumbing: a cursor that reads one data item head at
a time from a byte slice, and an encoder that emits shortest-form heads.

Reading covers every major type, including indefinite-length strings and
containers; tags are reported as bare heads for the caller to interpret.
Writing always produces definite-length items, with container heads either
emitted up front or back-patched once the element count is known.
*/

pub mod decode;
pub mod encode;

mod decode_seq;

pub use decode_seq::{Array, Map, Sequence};
