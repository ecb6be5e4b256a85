//! Canonical-order record reader over a byte slice.

use rmp::decode::{self, NumValueReadError, ValueReadError};
use rmp::Marker;

use super::{layout_for, RecordLayout};
use crate::domain::CodecError;

/// Cursor over the field names of an opened record.
pub(crate) struct Fields {
    layout: &'static RecordLayout,
    next: usize,
}

impl Fields {
    /// Name of the next field to read.
    pub(crate) fn next(&mut self) -> &'static str {
        let name = self
            .layout
            .fields
            .get(self.next)
            .copied()
            .unwrap_or(self.layout.record);
        self.next += 1;
        name
    }
}

pub(crate) struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Open an unversioned record, checking its arity.
    pub(crate) fn open(&mut self, layout: &'static RecordLayout) -> Result<Fields, CodecError> {
        let len = self.array_len(layout.record)?;
        if len != layout.arity() {
            return Err(CodecError::ArityMismatch {
                record: layout.record,
                expected: layout.arity(),
                actual: len,
            });
        }
        Ok(Fields { layout, next: 0 })
    }

    /// Open a versioned record: read the version, pick its layout, then
    /// check the arity against that layout. The version field is consumed.
    pub(crate) fn open_versioned(
        &mut self,
        layouts: &'static [RecordLayout],
    ) -> Result<(u64, Fields), CodecError> {
        let record = layouts.first().map_or("record", |layout| layout.record);
        let len = self.array_len(record)?;
        if len == 0 {
            return Err(CodecError::ArityMismatch {
                record,
                expected: layouts.first().map_or(0, |layout| layout.arity()),
                actual: 0,
            });
        }

        let version = self.uint("version")?;
        let layout =
            layout_for(layouts, version).ok_or(CodecError::UnknownVersion { record, version })?;
        if len != layout.arity() {
            return Err(CodecError::ArityMismatch {
                record,
                expected: layout.arity(),
                actual: len,
            });
        }

        let mut fields = Fields { layout, next: 0 };
        fields.next();
        Ok((version, fields))
    }

    pub(crate) fn array_len(&mut self, field: &'static str) -> Result<u32, CodecError> {
        decode::read_array_len(&mut self.buf).map_err(|e| value_error(e, field))
    }

    pub(crate) fn uint(&mut self, field: &'static str) -> Result<u64, CodecError> {
        decode::read_int::<u64, _>(&mut self.buf).map_err(|e| num_error(e, field))
    }

    pub(crate) fn bool(&mut self, field: &'static str) -> Result<bool, CodecError> {
        decode::read_bool(&mut self.buf).map_err(|e| value_error(e, field))
    }

    pub(crate) fn bin(&mut self, field: &'static str) -> Result<&'a [u8], CodecError> {
        let len = decode::read_bin_len(&mut self.buf).map_err(|e| value_error(e, field))?;
        self.take(len as usize)
    }

    pub(crate) fn bin_fixed<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u8; N], CodecError> {
        let bytes = self.bin(field)?;
        bytes.try_into().map_err(|_| CodecError::InvalidLength {
            field,
            expected: N,
            actual: bytes.len(),
        })
    }

    pub(crate) fn str(&mut self, field: &'static str) -> Result<&'a str, CodecError> {
        let len = decode::read_str_len(&mut self.buf).map_err(|e| value_error(e, field))?;
        let bytes = self.take(len as usize)?;
        std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidValue {
            field,
            detail: "invalid utf-8".to_string(),
        })
    }

    /// Consume a nil if one is next.
    pub(crate) fn take_nil(&mut self) -> bool {
        match self.buf.split_first() {
            Some((&first, rest)) if matches!(Marker::from_u8(first), Marker::Null) => {
                self.buf = rest;
                true
            }
            _ => false,
        }
    }

    /// Require that the whole input was consumed.
    pub(crate) fn finish(self) -> Result<(), CodecError> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes(self.buf.len()))
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if self.buf.len() < len {
            return Err(CodecError::TruncatedInput);
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }
}

fn value_error(err: ValueReadError, field: &'static str) -> CodecError {
    match err {
        ValueReadError::InvalidMarkerRead(_) | ValueReadError::InvalidDataRead(_) => {
            CodecError::TruncatedInput
        }
        ValueReadError::TypeMismatch(_) => CodecError::UnexpectedType { field },
    }
}

fn num_error(err: NumValueReadError, field: &'static str) -> CodecError {
    match err {
        NumValueReadError::InvalidMarkerRead(_) | NumValueReadError::InvalidDataRead(_) => {
            CodecError::TruncatedInput
        }
        NumValueReadError::TypeMismatch(_) => CodecError::UnexpectedType { field },
        NumValueReadError::OutOfRange => CodecError::InvalidValue {
            field,
            detail: "integer out of range".to_string(),
        },
    }
}
