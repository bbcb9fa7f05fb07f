//! Binary prototype writer, the inverse of the reader.
//!
//! Used to produce fixtures and by tooling that rewrites records. The writer
//! refuses records that the reader could not reproduce exactly.

use calligraphy_common::BinaryWriter;
use zerocopy::byteorder::little_endian::{U16, U64};

use crate::structs::{FieldHeader, GroupHeader, ListHeader, RecordFlags};
use crate::{Error, FieldGroup, FieldValue, PrototypeRecord, Result};

impl PrototypeRecord {
    /// Encode this record.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new();
        self.write(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Encode this record into an existing writer.
    pub fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        if !self.has_own_data && !self.groups.is_empty() {
            return Err(Error::GroupsWithoutData(self.id));
        }

        let flags = RecordFlags::new(self.parent_ref.is_some(), self.has_own_data, self.is_polymorphic);
        writer.write_struct(&flags);

        if let Some(parent) = self.parent_ref {
            writer.write_u64(parent.get())?;
        }

        if !self.has_own_data {
            return Ok(());
        }

        writer.write_count_u16("field group", self.groups.len())?;
        for group in &self.groups {
            write_group(writer, group)?;
        }

        Ok(())
    }
}

fn write_group(writer: &mut BinaryWriter, group: &FieldGroup) -> Result<()> {
    writer.write_struct(&GroupHeader {
        schema_ref: U64::new(group.schema_ref.get()),
        copy_number: group.copy_number,
    });

    writer.write_count_u16("simple field", group.simple_fields.len())?;
    for field in &group.simple_fields {
        writer.write_struct(&FieldHeader {
            field_id: U64::new(field.field_id.get()),
            kind_tag: field.value.kind().tag(),
        });
        write_value(writer, &field.value)?;
    }

    writer.write_count_u16("list field", group.list_fields.len())?;
    for field in &group.list_fields {
        let element_count = u16::try_from(field.elements.len()).map_err(|_| {
            calligraphy_common::Error::CountOverflow {
                what: "list element",
                count: field.elements.len(),
                max: u16::MAX as usize,
            }
        })?;

        writer.write_struct(&ListHeader {
            field_id: U64::new(field.field_id.get()),
            kind_tag: field.kind.tag(),
            element_count: U16::new(element_count),
        });

        for element in &field.elements {
            if element.kind() != field.kind {
                return Err(Error::ListKindMismatch {
                    field: field.field_id,
                    expected: field.kind,
                    actual: element.kind(),
                });
            }
            write_value(writer, element)?;
        }
    }

    Ok(())
}

fn write_value(writer: &mut BinaryWriter, value: &FieldValue) -> Result<()> {
    match value {
        FieldValue::Bool(v) => writer.write_u64(u64::from(*v))?,
        FieldValue::Float64(v) => writer.write_f64(*v)?,
        FieldValue::Int64(v) => writer.write_i64(*v)?,
        // Nested records are anonymous on the wire; their id is not written.
        FieldValue::Record(record) => record.write(writer)?,
        FieldValue::RawId(_, id) => writer.write_u64(*id)?,
    }
    Ok(())
}
