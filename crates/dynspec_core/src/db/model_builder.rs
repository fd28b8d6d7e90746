//! Entity-to-table registration.
//!
//! # Responsibility
//! - Snapshot entity metadata into type-erased table mappings.
//! - Render `CREATE TABLE` statements for the registered tables.
//!
//! # Invariants
//! - Table names are unique within a `Model`.
//! - Registration order is preserved in the rendered DDL.

use super::sql::quote_identifier;
use crate::model::entity::{Entity, EntityType, ForeignKey, ModelError};
use crate::model::value::ValueKind;

/// Storage shape of one mapped column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub name: String,
    pub member: String,
    pub kind: ValueKind,
    pub nullable: bool,
    pub primary_key: bool,
    pub references: Option<ForeignKey>,
}

/// Storage shape of one mapped entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMapping {
    pub table: String,
    pub entity: String,
    pub columns: Vec<ColumnMapping>,
}

impl TableMapping {
    /// Captures the mapping of a registered entity type.
    ///
    /// # Errors
    /// - Returns `ModelError` when member or column names repeat.
    pub fn from_entity<T>(entity: &EntityType<T>) -> Result<Self, ModelError> {
        entity.validate()?;
        let columns = entity
            .members()
            .iter()
            .map(|member| ColumnMapping {
                name: member.column().to_string(),
                member: member.name().to_string(),
                kind: member.kind(),
                nullable: member.is_nullable(),
                primary_key: member.is_primary_key(),
                references: member.references().cloned(),
            })
            .collect();

        Ok(Self {
            table: entity.table().to_string(),
            entity: entity.name().to_string(),
            columns,
        })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMapping> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Renders an idempotent `CREATE TABLE IF NOT EXISTS` statement.
    pub fn create_table_sql(&self) -> String {
        let key_columns: Vec<&ColumnMapping> = self
            .columns
            .iter()
            .filter(|column| column.primary_key)
            .collect();
        let inline_key = key_columns.len() == 1;

        let mut definitions: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                let mut definition = format!(
                    "{} {}",
                    quote_identifier(&column.name),
                    storage_type(column.kind)
                );
                if column.primary_key && inline_key {
                    definition.push_str(" PRIMARY KEY");
                }
                if !column.nullable {
                    definition.push_str(" NOT NULL");
                }
                if let Some(target) = &column.references {
                    definition.push_str(&format!(
                        " REFERENCES {}({})",
                        quote_identifier(&target.table),
                        quote_identifier(&target.column)
                    ));
                }
                definition
            })
            .collect();

        if key_columns.len() > 1 {
            let names: Vec<String> = key_columns
                .iter()
                .map(|column| quote_identifier(&column.name))
                .collect();
            definitions.push(format!("PRIMARY KEY ({})", names.join(", ")));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n);",
            quote_identifier(&self.table),
            definitions.join(",\n    ")
        )
    }
}

fn storage_type(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Bool | ValueKind::Int | ValueKind::Timestamp => "INTEGER",
        ValueKind::Float => "REAL",
        ValueKind::Text | ValueKind::Uuid => "TEXT",
    }
}

/// Registered set of table mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    tables: Vec<TableMapping>,
}

impl Model {
    pub fn tables(&self) -> &[TableMapping] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&TableMapping> {
        self.tables.iter().find(|mapping| mapping.table == name)
    }

    /// DDL for every table, in registration order.
    pub fn create_table_sql(&self) -> Vec<String> {
        self.tables
            .iter()
            .map(TableMapping::create_table_sql)
            .collect()
    }
}

/// Collects entity registrations, one call per entity type.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    tables: Vec<TableMapping>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the metadata of `T`.
    pub fn entity<T: Entity>(self) -> Result<Self, ModelError> {
        self.entity_type(T::entity_type())
    }

    /// Registers an explicit entity type.
    ///
    /// # Errors
    /// - `DuplicateTable` when the table was already registered.
    /// - `DuplicateMember`/`DuplicateColumn` from entity validation.
    pub fn entity_type<T>(mut self, entity: &EntityType<T>) -> Result<Self, ModelError> {
        let mapping = TableMapping::from_entity(entity)?;
        if self
            .tables
            .iter()
            .any(|existing| existing.table == mapping.table)
        {
            return Err(ModelError::DuplicateTable(mapping.table));
        }
        self.tables.push(mapping);
        Ok(self)
    }

    pub fn build(self) -> Model {
        Model {
            tables: self.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ModelBuilder;
    use crate::model::entity::{EntityType, ModelError};
    use crate::model::value::{Value, ValueKind};

    struct Tag {
        id: i64,
        label: Option<String>,
    }

    struct TagLink {
        tag_id: i64,
        note_id: i64,
    }

    fn tag_type() -> EntityType<Tag> {
        EntityType::<Tag>::builder("Tag", "tags")
            .member("Id", ValueKind::Int, |tag| tag.id.into())
            .primary_key()
            .member("Label", ValueKind::Text, |tag| Value::from(tag.label.clone()))
            .nullable()
            .build()
    }

    #[test]
    fn renders_inline_key_nullability_and_references() {
        let link = EntityType::<TagLink>::builder("TagLink", "tag_links")
            .member("TagId", ValueKind::Int, |link| link.tag_id.into())
            .primary_key()
            .references("tags", "id")
            .member("NoteId", ValueKind::Int, |link| link.note_id.into())
            .primary_key()
            .build();

        let model = ModelBuilder::new()
            .entity_type(&tag_type())
            .and_then(|builder| builder.entity_type(&link))
            .expect("model should build")
            .build();

        let ddl = model.create_table_sql();
        assert_eq!(
            ddl[0],
            "CREATE TABLE IF NOT EXISTS \"tags\" (\n    \"id\" INTEGER PRIMARY KEY NOT NULL,\n    \"label\" TEXT\n);"
        );
        assert!(ddl[1].contains("\"tag_id\" INTEGER NOT NULL REFERENCES \"tags\"(\"id\")"));
        assert!(ddl[1].contains("PRIMARY KEY (\"tag_id\", \"note_id\")"));
    }

    #[test]
    fn rejects_duplicate_tables() {
        let err = ModelBuilder::new()
            .entity_type(&tag_type())
            .and_then(|builder| builder.entity_type(&tag_type()))
            .unwrap_err();
        assert_eq!(err, ModelError::DuplicateTable("tags".to_string()));
    }
}
