//! Entity metadata registered once per Rust type.
//!
//! # Responsibility
//! - Describe the members of an entity type: name, column, kind, getter.
//! - Resolve members by name without runtime type inspection.
//!
//! # Invariants
//! - Member lookup is exact and case-sensitive; the first registration of
//!   a name wins.
//! - An `EntityType` never changes after construction.

use super::value::{Value, ValueKind};
use convert_case::{Case, Casing};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Typed accessor generated at registration time.
pub type Getter<T> = fn(&T) -> Value;

/// Rust types that expose registered entity metadata.
///
/// Implementations usually cache the metadata in a `once_cell::sync::Lazy`.
pub trait Entity: Sized + 'static {
    fn entity_type() -> &'static EntityType<Self>;
}

/// Accessibility of a member. Both public and private members resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Foreign-key target of a member column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// Metadata and typed getter for one entity member.
pub struct MemberDescriptor<T> {
    name: String,
    column: String,
    kind: ValueKind,
    nullable: bool,
    visibility: Visibility,
    primary_key: bool,
    references: Option<ForeignKey>,
    getter: Getter<T>,
}

impl<T> MemberDescriptor<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn references(&self) -> Option<&ForeignKey> {
        self.references.as_ref()
    }

    pub fn getter(&self) -> Getter<T> {
        self.getter
    }

    /// Reads this member from an entity instance.
    pub fn read(&self, instance: &T) -> Value {
        (self.getter)(instance)
    }
}

impl<T> Debug for MemberDescriptor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("visibility", &self.visibility)
            .field("primary_key", &self.primary_key)
            .field("references", &self.references)
            .finish_non_exhaustive()
    }
}

/// Registered shape of one entity type.
pub struct EntityType<T> {
    name: String,
    table: String,
    members: Vec<MemberDescriptor<T>>,
}

impl<T> EntityType<T> {
    /// Starts a registration for entity `name` stored in `table`.
    pub fn builder(name: impl Into<String>, table: impl Into<String>) -> EntityTypeBuilder<T> {
        EntityTypeBuilder {
            name: name.into(),
            table: table.into(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn members(&self) -> &[MemberDescriptor<T>] {
        &self.members
    }

    /// Resolves a member by exact name. First match wins.
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor<T>> {
        self.members.iter().find(|member| member.name == name)
    }

    /// Checks that member names and column names are unique.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut names = HashSet::new();
        let mut columns = HashSet::new();
        for member in &self.members {
            if !names.insert(member.name.as_str()) {
                return Err(ModelError::DuplicateMember {
                    entity: self.name.clone(),
                    member: member.name.clone(),
                });
            }
            if !columns.insert(member.column.as_str()) {
                return Err(ModelError::DuplicateColumn {
                    table: self.table.clone(),
                    column: member.column.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<T> Debug for EntityType<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("members", &self.members)
            .finish()
    }
}

/// Fluent registration of entity members.
///
/// Modifiers such as [`column`](Self::column) and [`nullable`](Self::nullable)
/// apply to the most recently added member.
pub struct EntityTypeBuilder<T> {
    name: String,
    table: String,
    members: Vec<MemberDescriptor<T>>,
}

impl<T> EntityTypeBuilder<T> {
    /// Adds a public, non-null member whose column is the snake_case name.
    pub fn member(mut self, name: impl Into<String>, kind: ValueKind, getter: Getter<T>) -> Self {
        let name = name.into();
        self.members.push(MemberDescriptor {
            column: name.to_case(Case::Snake),
            name,
            kind,
            nullable: false,
            visibility: Visibility::Public,
            primary_key: false,
            references: None,
            getter,
        });
        self
    }

    /// Overrides the column name of the last member.
    pub fn column(self, column: impl Into<String>) -> Self {
        let column = column.into();
        self.with_last(|member| member.column = column)
    }

    pub fn nullable(self) -> Self {
        self.with_last(|member| member.nullable = true)
    }

    pub fn private(self) -> Self {
        self.with_last(|member| member.visibility = Visibility::Private)
    }

    pub fn primary_key(self) -> Self {
        self.with_last(|member| member.primary_key = true)
    }

    /// Declares the last member as a foreign key to `table(column)`.
    pub fn references(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        let target = ForeignKey {
            table: table.into(),
            column: column.into(),
        };
        self.with_last(|member| member.references = Some(target))
    }

    pub fn build(self) -> EntityType<T> {
        EntityType {
            name: self.name,
            table: self.table,
            members: self.members,
        }
    }

    fn with_last(mut self, apply: impl FnOnce(&mut MemberDescriptor<T>)) -> Self {
        if let Some(member) = self.members.last_mut() {
            apply(member);
        }
        self
    }
}

/// Entity registration error detected while building a storage model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    DuplicateMember { entity: String, member: String },
    DuplicateColumn { table: String, column: String },
    DuplicateTable(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateMember { entity, member } => {
                write!(f, "member `{member}` is registered twice on entity `{entity}`")
            }
            Self::DuplicateColumn { table, column } => {
                write!(f, "column `{column}` is mapped twice in table `{table}`")
            }
            Self::DuplicateTable(table) => write!(f, "table `{table}` is registered twice"),
        }
    }
}

impl Error for ModelError {}
