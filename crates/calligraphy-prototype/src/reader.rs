//! Binary prototype reader.
//!
//! Decodes one record from a [`BinaryReader`], consuming exactly that
//! record's bytes. Layout:
//!
//! ```text
//! header:u8  [parent:u64]  [group_count:u16  group*]
//! group      = schema_ref:u64 copy:u8 simple_count:u16 simple* list_count:u16 list*
//! simple     = field_id:u64 kind:u8 value
//! list       = field_id:u64 kind:u8 count:u16 value*
//! ```
//!
//! Nested records (`R` tag) recurse into the same layout. The reader never
//! consults the blueprint catalog; field ids stay opaque.

use calligraphy_common::{BinaryReader, PrototypeId};

use crate::structs::{FieldHeader, GroupHeader, ListHeader, RecordFlags};
use crate::{
    Error, FieldGroup, FieldKind, FieldValue, ListField, PrototypeRecord, Result, SimpleField,
};

/// Default bound on record nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Smallest encoding of one field: 9-byte header + 8-byte value.
const MIN_FIELD_SIZE: usize = 17;

/// Options controlling the record reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Maximum number of records on the nesting path, the top-level record included.
    pub max_nesting_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl PrototypeRecord {
    /// Parse a single record from bytes with default options.
    ///
    /// Bytes after the record are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use calligraphy_common::PrototypeId;
    /// use calligraphy_prototype::PrototypeRecord;
    ///
    /// // Reference flag set, parent 0x2A, no data.
    /// let mut bytes = vec![0b001];
    /// bytes.extend_from_slice(&0x2Au64.to_le_bytes());
    ///
    /// let record = PrototypeRecord::parse(&bytes, PrototypeId::new(7))?;
    /// assert_eq!(record.parent_id(), Some(PrototypeId::new(0x2A)));
    /// assert!(record.groups.is_empty());
    /// # Ok::<(), calligraphy_prototype::Error>(())
    /// ```
    pub fn parse(data: &[u8], id: PrototypeId) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader, id, &ReaderOptions::default())
    }

    /// Read one record from the reader's current position.
    ///
    /// On success the reader is positioned just past the record. On error the
    /// record is discarded; the reader position is unspecified.
    pub fn read(reader: &mut BinaryReader<'_>, id: PrototypeId, options: &ReaderOptions) -> Result<Self> {
        read_record(reader, id, 1, options)
    }
}

fn read_record(
    reader: &mut BinaryReader<'_>,
    id: PrototypeId,
    depth: usize,
    options: &ReaderOptions,
) -> Result<PrototypeRecord> {
    if depth > options.max_nesting_depth {
        return Err(Error::RecordTooDeep {
            depth,
            limit: options.max_nesting_depth,
        });
    }

    let flags = reader.read_struct::<RecordFlags>()?;

    let parent_ref = if flags.reference_exists() {
        Some(PrototypeId::new(reader.read_u64()?))
    } else {
        None
    };

    let mut record = PrototypeRecord {
        id,
        parent_ref,
        has_own_data: flags.data_exists(),
        is_polymorphic: flags.polymorphic(),
        groups: Vec::new(),
    };

    if !record.has_own_data {
        return Ok(record);
    }

    let group_count = reader.read_u16()? as usize;
    record.groups.reserve(group_count.min(reader.remaining()));

    for _ in 0..group_count {
        record.groups.push(read_group(reader, depth, options)?);
    }

    Ok(record)
}

fn read_group(reader: &mut BinaryReader<'_>, depth: usize, options: &ReaderOptions) -> Result<FieldGroup> {
    let header = reader.read_struct::<GroupHeader>()?;
    let mut group = FieldGroup::new(header.schema_ref.get().into(), header.copy_number);

    let simple_count = reader.read_u16()? as usize;
    group
        .simple_fields
        .reserve(simple_count.min(reader.remaining() / MIN_FIELD_SIZE));

    for _ in 0..simple_count {
        let offset = reader.position();
        let header = reader.read_struct::<FieldHeader>()?;
        let kind = kind_from_tag(header.kind_tag, offset + 8)?;
        let value = read_value(reader, kind, depth, options)?;

        group.simple_fields.push(SimpleField {
            field_id: header.field_id.get().into(),
            value,
        });
    }

    let list_count = reader.read_u16()? as usize;
    group
        .list_fields
        .reserve(list_count.min(reader.remaining() / MIN_FIELD_SIZE));

    for _ in 0..list_count {
        let offset = reader.position();
        let header = reader.read_struct::<ListHeader>()?;
        let kind = kind_from_tag(header.kind_tag, offset + 8)?;

        let element_count = header.element_count.get() as usize;
        let mut elements = Vec::with_capacity(element_count.min(reader.remaining() / 8));
        for _ in 0..element_count {
            elements.push(read_value(reader, kind, depth, options)?);
        }

        group.list_fields.push(ListField {
            field_id: header.field_id.get().into(),
            kind,
            elements,
        });
    }

    Ok(group)
}

#[inline]
fn kind_from_tag(tag: u8, offset: usize) -> Result<FieldKind> {
    FieldKind::from_tag(tag).ok_or(Error::UnknownKindTag { tag, offset })
}

fn read_value(
    reader: &mut BinaryReader<'_>,
    kind: FieldKind,
    depth: usize,
    options: &ReaderOptions,
) -> Result<FieldValue> {
    Ok(match kind {
        FieldKind::Bool => FieldValue::Bool(reader.read_u64()? != 0),
        FieldKind::Float64 => FieldValue::Float64(reader.read_f64()?),
        FieldKind::Int64 => FieldValue::Int64(reader.read_i64()?),
        FieldKind::Record => FieldValue::Record(Box::new(read_record(
            reader,
            PrototypeId::INVALID,
            depth + 1,
            options,
        )?)),
        FieldKind::Ref(table) => FieldValue::RawId(table, reader.read_u64()?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RefKind;
    use calligraphy_common::{BlueprintId, FieldId};

    fn sample_record() -> PrototypeRecord {
        let nested = PrototypeRecord::new(PrototypeId::INVALID)
            .with_parent(PrototypeId::new(0x30))
            .group(FieldGroup::new(BlueprintId::new(0xB2), 0).simple(FieldId::new(1), FieldValue::Bool(true)));

        PrototypeRecord::new(PrototypeId::new(0x10))
            .with_parent(PrototypeId::new(0x20))
            .polymorphic()
            .group(
                FieldGroup::new(BlueprintId::new(0xB1), 0)
                    .simple(FieldId::new(1), FieldValue::Int64(-7))
                    .simple(FieldId::new(2), FieldValue::Float64(2.5))
                    .simple(FieldId::new(3), FieldValue::Record(Box::new(nested)))
                    .list(
                        FieldId::new(4),
                        FieldKind::Ref(RefKind::Asset),
                        vec![FieldValue::RawId(RefKind::Asset, 1), FieldValue::RawId(RefKind::Asset, 2)],
                    ),
            )
            .group(FieldGroup::new(BlueprintId::new(0xB1), 1).list(FieldId::new(5), FieldKind::Int64, vec![]))
    }

    #[test]
    fn test_roundtrip_nested_record() {
        let record = sample_record();
        let bytes = record.to_bytes().unwrap();
        let parsed = PrototypeRecord::parse(&bytes, PrototypeId::new(0x10)).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_reads_exactly_one_record() {
        let mut bytes = sample_record().to_bytes().unwrap();
        let record_len = bytes.len();
        bytes.extend_from_slice(&[0xAA, 0xBB]);

        let mut reader = BinaryReader::new(&bytes);
        PrototypeRecord::read(&mut reader, PrototypeId::new(0x10), &ReaderOptions::default()).unwrap();
        assert_eq!(reader.position(), record_len);
    }

    #[test]
    fn test_no_data_consumes_only_header() {
        // reference + no data, followed by bytes that would be a group count.
        let mut bytes = vec![RecordFlags::REFERENCE_EXISTS];
        bytes.extend_from_slice(&5u64.to_le_bytes());
        bytes.extend_from_slice(&[0x01, 0x00, 0xFF, 0xFF]);

        let mut reader = BinaryReader::new(&bytes);
        let record = PrototypeRecord::read(&mut reader, PrototypeId::new(1), &ReaderOptions::default()).unwrap();
        assert!(!record.has_own_data);
        assert!(record.groups.is_empty());
        assert_eq!(reader.position(), 9);

        // Without a reference, only the header byte is consumed.
        let bytes = [0u8, 0x02, 0x00];
        let mut reader = BinaryReader::new(&bytes);
        let record = PrototypeRecord::read(&mut reader, PrototypeId::new(1), &ReaderOptions::default()).unwrap();
        assert_eq!(record.parent_ref, None);
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_zero_parent_is_root() {
        let mut bytes = vec![RecordFlags::REFERENCE_EXISTS];
        bytes.extend_from_slice(&0u64.to_le_bytes());
        let record = PrototypeRecord::parse(&bytes, PrototypeId::new(1)).unwrap();
        assert_eq!(record.parent_ref, Some(PrototypeId::INVALID));
        assert_eq!(record.parent_id(), None);
    }

    #[test]
    fn test_bool_is_any_nonzero_word() {
        let mut bytes = vec![RecordFlags::DATA_EXISTS, 1, 0];
        bytes.extend_from_slice(&0xB1u64.to_le_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&9u64.to_le_bytes());
        bytes.push(b'B');
        bytes.extend_from_slice(&0x0100u64.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);

        let record = PrototypeRecord::parse(&bytes, PrototypeId::new(1)).unwrap();
        assert_eq!(
            record.groups[0].simple_field(FieldId::new(9)),
            Some(&FieldValue::Bool(true))
        );
    }

    #[test]
    fn test_unknown_kind_tag_is_fatal() {
        let mut bytes = vec![RecordFlags::DATA_EXISTS, 1, 0];
        bytes.extend_from_slice(&0xB1u64.to_le_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&9u64.to_le_bytes());
        bytes.push(b'Z');
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&[0, 0]);

        match PrototypeRecord::parse(&bytes, PrototypeId::new(1)) {
            Err(Error::UnknownKindTag { tag, offset }) => {
                assert_eq!(tag, b'Z');
                assert_eq!(offset, 1 + 2 + 9 + 2 + 8);
            }
            other => panic!("expected unknown tag, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_stream_is_fatal_at_every_cut() {
        let bytes = sample_record().to_bytes().unwrap();
        for cut in 0..bytes.len() {
            let result = PrototypeRecord::parse(&bytes[..cut], PrototypeId::new(0x10));
            assert!(
                matches!(result, Err(Error::Common(calligraphy_common::Error::UnexpectedEof { .. }))),
                "cut at {} produced {:?}",
                cut,
                result
            );
        }
    }

    fn nested_chain(levels: usize) -> PrototypeRecord {
        let mut record = PrototypeRecord::new(PrototypeId::INVALID);
        for _ in 1..levels {
            record = PrototypeRecord::new(PrototypeId::INVALID).group(
                FieldGroup::new(BlueprintId::new(1), 0).simple(FieldId::new(1), FieldValue::Record(Box::new(record))),
            );
        }
        record
    }

    #[test]
    fn test_depth_limit() {
        let options = ReaderOptions::default();

        let at_limit = nested_chain(DEFAULT_MAX_NESTING_DEPTH).to_bytes().unwrap();
        let mut reader = BinaryReader::new(&at_limit);
        assert!(PrototypeRecord::read(&mut reader, PrototypeId::new(1), &options).is_ok());

        let over_limit = nested_chain(DEFAULT_MAX_NESTING_DEPTH + 1).to_bytes().unwrap();
        let mut reader = BinaryReader::new(&over_limit);
        match PrototypeRecord::read(&mut reader, PrototypeId::new(1), &options) {
            Err(Error::RecordTooDeep { depth, limit }) => {
                assert_eq!(depth, DEFAULT_MAX_NESTING_DEPTH + 1);
                assert_eq!(limit, DEFAULT_MAX_NESTING_DEPTH);
            }
            other => panic!("expected depth error, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit_is_configurable() {
        let bytes = nested_chain(3).to_bytes().unwrap();
        let options = ReaderOptions { max_nesting_depth: 2 };
        let mut reader = BinaryReader::new(&bytes);
        assert!(matches!(
            PrototypeRecord::read(&mut reader, PrototypeId::new(1), &options),
            Err(Error::RecordTooDeep { depth: 3, limit: 2 })
        ));
    }

    #[test]
    fn test_roundtrip_lists_of_records_and_floats() {
        let element = |value: i64, scale: f64| {
            FieldValue::Record(Box::new(
                PrototypeRecord::new(PrototypeId::INVALID).group(
                    FieldGroup::new(BlueprintId::new(0xC1), 0)
                        .simple(FieldId::new(1), FieldValue::Int64(value))
                        .list(
                            FieldId::new(2),
                            FieldKind::Float64,
                            vec![FieldValue::Float64(scale), FieldValue::Float64(-scale)],
                        ),
                ),
            ))
        };
        let record = PrototypeRecord::new(PrototypeId::new(0x40)).group(
            FieldGroup::new(BlueprintId::new(0xB1), 0)
                .list(FieldId::new(1), FieldKind::Record, vec![element(1, 0.25), element(2, 8.0)])
                .list(
                    FieldId::new(2),
                    FieldKind::Float64,
                    vec![FieldValue::Float64(1.5), FieldValue::Float64(f64::MAX)],
                ),
        );

        let bytes = record.to_bytes().unwrap();
        let mut reader = BinaryReader::new(&bytes);
        let parsed = PrototypeRecord::read(&mut reader, PrototypeId::new(0x40), &ReaderOptions::default()).unwrap();
        assert_eq!(parsed, record);
        assert!(reader.is_empty());

        let records = parsed.groups[0].list_field(FieldId::new(1)).unwrap();
        assert_eq!(records.kind, FieldKind::Record);
        assert_eq!(records.elements.len(), 2);
    }

    fn nested_list_chain(levels: usize) -> PrototypeRecord {
        let mut record = PrototypeRecord::new(PrototypeId::INVALID);
        for _ in 1..levels {
            record = PrototypeRecord::new(PrototypeId::INVALID).group(FieldGroup::new(BlueprintId::new(1), 0).list(
                FieldId::new(1),
                FieldKind::Record,
                vec![FieldValue::Record(Box::new(record))],
            ));
        }
        record
    }

    #[test]
    fn test_depth_limit_through_list_elements() {
        let options = ReaderOptions::default();

        let at_limit = nested_list_chain(DEFAULT_MAX_NESTING_DEPTH).to_bytes().unwrap();
        assert!(PrototypeRecord::parse(&at_limit, PrototypeId::new(1)).is_ok());

        let over_limit = nested_list_chain(DEFAULT_MAX_NESTING_DEPTH + 6).to_bytes().unwrap();
        let mut reader = BinaryReader::new(&over_limit);
        match PrototypeRecord::read(&mut reader, PrototypeId::new(1), &options) {
            Err(Error::RecordTooDeep { depth, limit }) => {
                assert_eq!(depth, DEFAULT_MAX_NESTING_DEPTH + 1);
                assert_eq!(limit, DEFAULT_MAX_NESTING_DEPTH);
            }
            other => panic!("expected depth error, got {:?}", other),
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn leaf_value() -> impl Strategy<Value = FieldValue> {
            prop_oneof![
                any::<bool>().prop_map(FieldValue::Bool),
                float_value(),
                any::<i64>().prop_map(FieldValue::Int64),
                any::<u64>().prop_map(|id| FieldValue::RawId(RefKind::Asset, id)),
                any::<u64>().prop_map(|id| FieldValue::RawId(RefKind::Prototype, id)),
                any::<u64>().prop_map(|id| FieldValue::RawId(RefKind::Curve, id)),
            ]
        }

        fn float_value() -> impl Strategy<Value = FieldValue> {
            (-1.0e12f64..1.0e12).prop_map(FieldValue::Float64)
        }

        fn list_of(kind: FieldKind, value: BoxedStrategy<FieldValue>) -> BoxedStrategy<Vec<FieldValue>> {
            match kind {
                FieldKind::Bool => prop::collection::vec(any::<bool>().prop_map(FieldValue::Bool), 0..4).boxed(),
                FieldKind::Float64 => prop::collection::vec(float_value(), 0..4).boxed(),
                FieldKind::Int64 => prop::collection::vec(any::<i64>().prop_map(FieldValue::Int64), 0..4).boxed(),
                // Each element is a record wrapping an independently drawn value.
                FieldKind::Record => prop::collection::vec(
                    (any::<u64>(), value).prop_map(|(schema, value)| {
                        FieldValue::Record(Box::new(
                            PrototypeRecord::new(PrototypeId::INVALID)
                                .group(FieldGroup::new(BlueprintId::new(schema), 0).simple(FieldId::new(1), value)),
                        ))
                    }),
                    0..3,
                )
                .boxed(),
                FieldKind::Ref(table) => {
                    prop::collection::vec(any::<u64>().prop_map(move |id| FieldValue::RawId(table, id)), 0..4).boxed()
                }
            }
        }

        fn list_field(value: BoxedStrategy<FieldValue>) -> impl Strategy<Value = ListField> {
            let kind = prop_oneof![
                Just(FieldKind::Bool),
                Just(FieldKind::Float64),
                Just(FieldKind::Int64),
                Just(FieldKind::Record),
                Just(FieldKind::Ref(RefKind::Type)),
                Just(FieldKind::Ref(RefKind::Asset)),
            ];
            (any::<u64>(), kind).prop_flat_map(move |(field, kind)| {
                list_of(kind, value.clone()).prop_map(move |elements| ListField {
                    field_id: FieldId::new(field),
                    kind,
                    elements,
                })
            })
        }

        fn record_with(value: BoxedStrategy<FieldValue>) -> BoxedStrategy<PrototypeRecord> {
            let simple = (any::<u64>(), value.clone()).prop_map(|(field, value)| SimpleField {
                field_id: FieldId::new(field),
                value,
            });
            let group = (
                any::<u64>(),
                any::<u8>(),
                prop::collection::vec(simple, 0..4),
                prop::collection::vec(list_field(value), 0..3),
            )
                .prop_map(|(schema, copy_number, simple_fields, list_fields)| FieldGroup {
                    schema_ref: BlueprintId::new(schema),
                    copy_number,
                    simple_fields,
                    list_fields,
                });
            (
                prop::option::of(any::<u64>()),
                any::<bool>(),
                any::<bool>(),
                prop::collection::vec(group, 0..3),
            )
                .prop_map(|(parent, has_own_data, is_polymorphic, groups)| PrototypeRecord {
                    id: PrototypeId::INVALID,
                    parent_ref: parent.map(PrototypeId::new),
                    has_own_data,
                    is_polymorphic,
                    groups: if has_own_data { groups } else { Vec::new() },
                })
                .boxed()
        }

        /// Values drawn independently per field, nesting records a few levels deep.
        fn field_value() -> BoxedStrategy<FieldValue> {
            leaf_value().boxed().prop_recursive(3, 24, 4, |inner| {
                prop_oneof![
                    leaf_value(),
                    record_with(inner).prop_map(|r| FieldValue::Record(Box::new(r))),
                ]
                .boxed()
            })
            .boxed()
        }

        fn record() -> impl Strategy<Value = PrototypeRecord> {
            record_with(field_value())
        }

        proptest! {
            #[test]
            fn roundtrip(record in record()) {
                let bytes = record.to_bytes().unwrap();
                let mut reader = BinaryReader::new(&bytes);
                let parsed = PrototypeRecord::read(&mut reader, PrototypeId::INVALID, &ReaderOptions::default()).unwrap();
                prop_assert_eq!(&parsed, &record);
                prop_assert!(reader.is_empty());
            }

            #[test]
            fn no_data_ignores_trailing_bytes(parent in any::<u64>(), trailing in prop::collection::vec(any::<u8>(), 0..64)) {
                let mut bytes = PrototypeRecord::reference_only(PrototypeId::INVALID, PrototypeId::new(parent)).to_bytes().unwrap();
                let len = bytes.len();
                bytes.extend_from_slice(&trailing);

                let mut reader = BinaryReader::new(&bytes);
                let record = PrototypeRecord::read(&mut reader, PrototypeId::INVALID, &ReaderOptions::default()).unwrap();
                prop_assert!(record.groups.is_empty());
                prop_assert_eq!(reader.position(), len);
            }
        }
    }
}
