use super::*;
use std::io::Read;

/// The only content type these factories accept.
pub const CBOR_CONTENT_TYPE: &str = "application/cbor";

fn check_content_type(content_type: &str) -> Result<(), Error> {
    if content_type.is_empty() {
        Err(Error::MissingContentType)
    } else if !content_type.eq_ignore_ascii_case(CBOR_CONTENT_TYPE) {
        Err(Error::InvalidContentType {
            expected: CBOR_CONTENT_TYPE,
            found: content_type.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Produces root parse nodes for CBOR payloads.
#[derive(Debug, Clone, Default)]
pub struct CborParseNodeFactory {
    config: Config,
}

impl CborParseNodeFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn valid_content_type(&self) -> &'static str {
        CBOR_CONTENT_TYPE
    }

    /// Reads `content` to its end and decodes it.
    pub fn root_parse_node<R: Read>(
        &self,
        content_type: &str,
        mut content: R,
    ) -> Result<ParseNode, Error> {
        check_content_type(content_type)?;

        let mut data = Vec::new();
        content.read_to_end(&mut data)?;

        debug!("Decoding {} bytes of {content_type}", data.len());
        ParseNode::with_config(&data, &self.config)
    }
}

/// Produces serialization writers for CBOR payloads.
#[derive(Debug, Clone, Default)]
pub struct CborSerializationWriterFactory;

impl CborSerializationWriterFactory {
    pub fn valid_content_type(&self) -> &'static str {
        CBOR_CONTENT_TYPE
    }

    pub fn serialization_writer(&self, content_type: &str) -> Result<SerializationWriter, Error> {
        check_content_type(content_type)?;
        Ok(SerializationWriter::new())
    }
}
