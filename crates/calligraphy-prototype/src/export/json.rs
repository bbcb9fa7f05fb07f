//! JSON export of effective prototype records.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::{
    BlueprintLookup, EffectiveRecord, FieldResolver, FieldValue, PrototypeIndex, PrototypeRecord,
    ResolvedValue, Result,
};
use calligraphy_common::PrototypeId;

/// Renders effective records with member names attached.
pub struct JsonExporter<'a, L: BlueprintLookup + ?Sized> {
    index: &'a PrototypeIndex,
    catalog: &'a L,
}

impl<'a, L: BlueprintLookup + ?Sized> JsonExporter<'a, L> {
    pub fn new(index: &'a PrototypeIndex, catalog: &'a L) -> Self {
        Self { index, catalog }
    }

    /// Export one prototype as a pretty-printed JSON document.
    pub fn export_record(&self, id: PrototypeId) -> Result<String> {
        let value = self.record_value(id)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Build the JSON value of one prototype.
    pub fn record_value(&self, id: PrototypeId) -> Result<Value> {
        let effective = self.index.effective(id)?;
        let resolver = FieldResolver::new(self.catalog);
        self.effective_value(&effective, &resolver)
    }

    /// Export every indexed prototype to `<output_dir>/<id>.json`.
    ///
    /// The progress callback receives (completed, total) counts.
    pub fn export_all<P: AsRef<Path>>(
        &self,
        output_dir: P,
        mut progress: impl FnMut(usize, usize),
    ) -> Result<usize> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        let total = self.index.len();
        for (i, record) in self.index.iter().enumerate() {
            progress(i, total);
            self.export_to_dir(record.id, output_dir)?;
        }
        progress(total, total);

        Ok(total)
    }

    /// Export one prototype into `output_dir` and return the written path.
    pub fn export_to_dir(&self, id: PrototypeId, output_dir: &Path) -> Result<PathBuf> {
        let path = output_path(output_dir, id);
        let json = self.export_record(id)?;
        std::fs::write(&path, json).map_err(|e| crate::Error::from(e).in_file(&path))?;
        Ok(path)
    }

    fn effective_value(&self, effective: &EffectiveRecord, resolver: &FieldResolver<'_, L>) -> Result<Value> {
        let mut groups = Vec::with_capacity(effective.groups.len());
        let mut fields_by_group: Vec<Map<String, Value>> = vec![Map::new(); effective.groups.len()];

        for field in effective.resolve(resolver) {
            let Some(slot) = effective
                .groups
                .iter()
                .position(|g| g.schema_ref == field.schema_ref && g.copy_number == field.copy_number)
            else {
                continue;
            };

            let value = match field.value {
                ResolvedValue::Single(value) => self.field_value(value, resolver)?,
                ResolvedValue::List(list) => Value::Array(
                    list.elements
                        .iter()
                        .map(|e| self.field_value(e, resolver))
                        .collect::<Result<Vec<_>>>()?,
                ),
            };
            fields_by_group[slot].insert(field.member.name.clone(), value);
        }

        for (group, fields) in effective.groups.iter().zip(fields_by_group) {
            groups.push(json!({
                "blueprint": self.catalog.blueprint_name(group.schema_ref),
                "schema": group.schema_ref,
                "copy": group.copy_number,
                "fields": fields,
            }));
        }

        let mut object = Map::new();
        if effective.id.is_valid() {
            object.insert("id".into(), json!(effective.id));
        }
        if let Some(parent) = effective.parent() {
            object.insert("parent".into(), json!(parent));
        }
        object.insert("polymorphic".into(), json!(effective.is_polymorphic));
        object.insert("groups".into(), Value::Array(groups));
        Ok(Value::Object(object))
    }

    fn field_value(&self, value: &FieldValue, resolver: &FieldResolver<'_, L>) -> Result<Value> {
        Ok(match value {
            FieldValue::Bool(v) => json!(v),
            FieldValue::Float64(v) => json!(v),
            FieldValue::Int64(v) => json!(v),
            FieldValue::RawId(kind, id) => json!({ "ref": kind, "id": format!("{:016X}", id) }),
            FieldValue::Record(record) => self.nested_value(record, resolver)?,
        })
    }

    fn nested_value(&self, record: &PrototypeRecord, resolver: &FieldResolver<'_, L>) -> Result<Value> {
        let effective = self.index.compose(record)?;
        self.effective_value(&effective, resolver)
    }
}

pub(crate) fn output_path(output_dir: &Path, id: PrototypeId) -> PathBuf {
    output_dir.join(format!("{}.json", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BaseKind, Blueprint, BlueprintCatalog, FieldGroup, FieldKind, MemberKind, RefKind};
    use calligraphy_common::{BlueprintId, FieldId};

    const ITEM: BlueprintId = BlueprintId::new(0x10);
    const STATS: BlueprintId = BlueprintId::new(0x20);

    fn catalog() -> BlueprintCatalog {
        BlueprintCatalog::from_blueprints([
            Blueprint::new(ITEM, "ItemPrototype")
                .member(FieldId::new(1), "Level", MemberKind::Scalar(BaseKind::Integer))
                .member(FieldId::new(2), "Stats", MemberKind::Scalar(BaseKind::NestedStruct))
                .member(FieldId::new(3), "Icons", MemberKind::ListOf(BaseKind::ReferenceToAsset)),
            Blueprint::new(STATS, "StatsPrototype")
                .member(FieldId::new(1), "Power", MemberKind::Scalar(BaseKind::FloatingPoint)),
        ])
        .unwrap()
    }

    fn index() -> PrototypeIndex {
        let stats = PrototypeRecord::new(PrototypeId::INVALID)
            .group(FieldGroup::new(STATS, 0).simple(FieldId::new(1), FieldValue::Float64(2.5)));
        let base = PrototypeRecord::new(PrototypeId::new(1)).group(
            FieldGroup::new(ITEM, 0)
                .simple(FieldId::new(1), FieldValue::Int64(4))
                .simple(FieldId::new(2), FieldValue::Record(Box::new(stats)))
                .simple(FieldId::new(9), FieldValue::Bool(true))
                .list(
                    FieldId::new(3),
                    FieldKind::Ref(RefKind::Asset),
                    vec![FieldValue::RawId(RefKind::Asset, 0xAB)],
                ),
        );
        let child = PrototypeRecord::new(PrototypeId::new(2))
            .with_parent(PrototypeId::new(1))
            .group(FieldGroup::new(ITEM, 0).simple(FieldId::new(1), FieldValue::Int64(5)));
        PrototypeIndex::from_records([base, child]).unwrap()
    }

    #[test]
    fn test_export_effective_record() {
        let catalog = catalog();
        let index = index();
        let exporter = JsonExporter::new(&index, &catalog);

        let value = exporter.record_value(PrototypeId::new(2)).unwrap();
        assert_eq!(value["id"], "0000000000000002");
        assert_eq!(value["parent"], "0000000000000001");

        let fields = &value["groups"][0]["fields"];
        assert_eq!(value["groups"][0]["blueprint"], "ItemPrototype");
        assert_eq!(fields["Level"], 5);
        assert_eq!(fields["Stats"]["groups"][0]["fields"]["Power"], 2.5);
        assert_eq!(fields["Icons"][0]["id"], "00000000000000AB");
        // Field 9 is not declared by the blueprint.
        assert_eq!(fields.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_export_all() {
        let catalog = catalog();
        let index = index();
        let exporter = JsonExporter::new(&index, &catalog);

        let dir = std::env::temp_dir().join(format!("calligraphy-json-{}", std::process::id()));
        let mut calls = 0;
        let count = exporter.export_all(&dir, |_, _| calls += 1).unwrap();
        assert_eq!(count, 2);
        assert_eq!(calls, 3);
        assert!(dir.join("0000000000000001.json").exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
