//! Calligraphy prototype records for game content.
//!
//! Prototype records are the game server's data definitions: typed,
//! inheritance-aware records stored in a compact self-describing binary form.
//! This crate reads and writes that form, resolves field ids through a
//! blueprint catalog, and composes each record's effective fields from its
//! parent chain.
//!
//! # Quick Start
//!
//! ```no_run
//! use calligraphy_prototype::{load_directory, BlueprintCatalog, FieldResolver, ReaderOptions};
//!
//! let catalog = BlueprintCatalog::open("blueprints.json")?;
//! let index = load_directory("content/", &ReaderOptions::default())?;
//!
//! let resolver = FieldResolver::new(&catalog);
//! for record in index.iter() {
//!     let effective = index.effective(record.id)?;
//!     for field in effective.resolve(&resolver) {
//!         println!("{} {}: {:?}", record.id, field.member.name, field.value);
//!     }
//! }
//! # Ok::<(), calligraphy_prototype::Error>(())
//! ```
//!
//! # Architecture
//!
//! - **Reader / writer** (`PrototypeRecord::parse`, `PrototypeRecord::to_bytes`):
//!   bytes to a schema-agnostic record tree and back
//! - **Files** (`PrototypeFile`, `load_directory`): the `PDR` file container and
//!   bulk loading of a content directory
//! - **Blueprints** (`BlueprintCatalog`, `FieldResolver`): field id to named
//!   member, with unknown fields skipped
//! - **Inheritance** (`PrototypeIndex`, `EffectiveRecord`): id-indexed records
//!   with validated parent chains and merged field views
//!
//! Everything is built once at load time and is read-only afterwards; the
//! loaded types are `Send + Sync`.

mod blueprint;
mod error;
mod file;
mod index;
mod loader;
mod reader;
mod record;
mod resolver;
mod types;
mod value;
mod writer;

#[cfg(feature = "json-export")]
pub mod export;
pub mod structs;

// Primary API
pub use blueprint::{BaseKind, Blueprint, BlueprintCatalog, BlueprintLookup, BlueprintMember, MemberKind};
pub use error::{Error, Result};
pub use file::{file_name, id_from_path, PrototypeFile, FILE_EXTENSION};
pub use index::{EffectiveRecord, PrototypeIndex, PrototypeIndexBuilder, ResolvedField, ResolvedValue};
pub use loader::load_directory;
pub use reader::{ReaderOptions, DEFAULT_MAX_NESTING_DEPTH};
pub use record::{FieldGroup, GroupKey, ListField, PrototypeRecord, SimpleField};
pub use resolver::FieldResolver;
pub use types::{FieldKind, RefKind};
pub use value::FieldValue;

// Export types
#[cfg(feature = "json-export")]
pub use export::JsonExporter;

#[cfg(test)]
mod tests {
    use super::*;
    use calligraphy_common::{BlueprintId, FieldId, PrototypeId};

    #[test]
    fn test_parse_compose_resolve_with_drift() {
        let schema = BlueprintId::new(0x77);
        let catalog = BlueprintCatalog::from_blueprints([Blueprint::new(schema, "Power")
            .member(FieldId::new(1), "Cooldown", MemberKind::Scalar(BaseKind::FloatingPoint))
            .member(FieldId::new(2), "Charges", MemberKind::Scalar(BaseKind::Integer))])
        .unwrap();

        let base = PrototypeRecord::new(PrototypeId::new(1)).group(
            FieldGroup::new(schema, 0)
                .simple(FieldId::new(1), FieldValue::Float64(1.5))
                // Not declared by the blueprint; must not disturb the fields after it.
                .simple(FieldId::new(9), FieldValue::Record(Box::new(PrototypeRecord::default())))
                .simple(FieldId::new(2), FieldValue::Int64(3)),
        );
        let child = PrototypeRecord::new(PrototypeId::new(2))
            .with_parent(PrototypeId::new(1))
            .group(FieldGroup::new(schema, 0).simple(FieldId::new(2), FieldValue::Int64(5)));

        let records = [base, child]
            .iter()
            .map(|r| PrototypeRecord::parse(&r.to_bytes().unwrap(), r.id).unwrap())
            .collect::<Vec<_>>();
        let index = PrototypeIndex::from_records(records).unwrap();

        let resolver = FieldResolver::new(&catalog);
        let effective = index.effective(PrototypeId::new(2)).unwrap();
        let fields: Vec<_> = effective
            .resolve(&resolver)
            .into_iter()
            .map(|f| match f.value {
                ResolvedValue::Single(v) => (f.member.name.clone(), v.clone()),
                ResolvedValue::List(_) => unreachable!(),
            })
            .collect();

        assert_eq!(
            fields,
            vec![
                ("Cooldown".to_string(), FieldValue::Float64(1.5)),
                ("Charges".to_string(), FieldValue::Int64(5)),
            ]
        );
        assert_eq!(resolver.skipped(), 1);
    }
}
