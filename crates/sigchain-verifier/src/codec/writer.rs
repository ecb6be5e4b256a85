//! Record writer producing the canonical (minimal-width) encoding.

use rmp::encode;

use super::RecordLayout;
use crate::domain::CodecError;

pub(crate) struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self {
            buf: Vec::with_capacity(128),
        }
    }

    /// Start a record of the given layout.
    pub(crate) fn open(&mut self, layout: &RecordLayout) -> Result<(), CodecError> {
        self.array_len(layout.fields.len())
    }

    pub(crate) fn array_len(&mut self, len: usize) -> Result<(), CodecError> {
        let len = u32::try_from(len).map_err(encode_error)?;
        encode::write_array_len(&mut self.buf, len)
            .map(|_| ())
            .map_err(encode_error)
    }

    pub(crate) fn uint(&mut self, value: u64) -> Result<(), CodecError> {
        encode::write_uint(&mut self.buf, value)
            .map(|_| ())
            .map_err(encode_error)
    }

    pub(crate) fn bool(&mut self, value: bool) -> Result<(), CodecError> {
        encode::write_bool(&mut self.buf, value).map_err(encode_error)
    }

    pub(crate) fn bin(&mut self, data: &[u8]) -> Result<(), CodecError> {
        encode::write_bin(&mut self.buf, data).map_err(encode_error)
    }

    pub(crate) fn str(&mut self, data: &str) -> Result<(), CodecError> {
        encode::write_str(&mut self.buf, data).map_err(encode_error)
    }

    pub(crate) fn nil(&mut self) -> Result<(), CodecError> {
        encode::write_nil(&mut self.buf).map_err(encode_error)
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

fn encode_error<E: std::fmt::Display>(err: E) -> CodecError {
    CodecError::Encode(err.to_string())
}
