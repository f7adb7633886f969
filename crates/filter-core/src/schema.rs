//! Field catalog a filter is validated against.

use crate::{
    ast::{ComparisonOperator, FieldRef},
    error::SchemaError,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Bool,
    String,
    Int,
    Float,
    Timestamp,
    Enum,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Normal,
    /// A filter-facing name standing in for another field.
    VirtualAlias { target: String },
}

/// Physical column backing a field, optionally qualified by its table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub table: Option<String>,
    pub name: String,
}

impl Column {
    pub fn new(name: &str) -> Self {
        Self {
            table: None,
            name: name.to_string(),
        }
    }

    pub fn qualified(table: &str, name: &str) -> Self {
        Self {
            table: Some(table.to_string()),
            name: name.to_string(),
        }
    }
}

/// How a multi-valued field is serialized in its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionEncoding {
    /// A JSON array, e.g. `["work","home"]`.
    JsonArray,
    /// Values joined by a separator, e.g. `work,home`.
    Delimited { separator: char },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    pub kind: FieldKind,
    pub column: Column,
    /// `None` or empty allows every operator.
    pub allowed_ops: Option<HashSet<ComparisonOperator>>,
    pub supports_contains: bool,
    pub collection: Option<CollectionEncoding>,
}

impl FieldDef {
    pub fn new(name: &str, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            kind: FieldKind::Normal,
            column: Column::new(name),
            allowed_ops: None,
            supports_contains: false,
            collection: None,
        }
    }

    /// Declares `name` as an alias resolving to `target`.
    pub fn alias(name: &str, target: &str) -> Self {
        Self {
            kind: FieldKind::VirtualAlias {
                target: target.to_string(),
            },
            ..Self::new(name, FieldType::String)
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.column = column;
        self
    }

    pub fn allow_ops(mut self, ops: impl IntoIterator<Item = ComparisonOperator>) -> Self {
        self.allowed_ops = Some(ops.into_iter().collect());
        self
    }

    pub fn with_contains(mut self) -> Self {
        self.supports_contains = true;
        self
    }

    pub fn collection(mut self, encoding: CollectionEncoding) -> Self {
        self.collection = Some(encoding);
        self
    }

    pub fn allows(&self, op: ComparisonOperator) -> bool {
        match &self.allowed_ops {
            Some(ops) if !ops.is_empty() => ops.contains(&op),
            _ => true,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.kind, FieldKind::VirtualAlias { .. })
    }

    /// Snapshot of this definition as referenced under `name`.
    pub fn to_field_ref(&self, name: &str) -> FieldRef {
        FieldRef {
            name: name.to_string(),
            column: self.column.clone(),
            ty: self.ty,
            collection: self.collection,
        }
    }
}

/// Read-only field catalog, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: HashMap<String, FieldDef>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Resolves `name` to a concrete field.
    ///
    /// Normal fields resolve to themselves. An alias resolves to its target
    /// only when the target exists and is itself a normal field.
    pub fn resolve_alias(&self, name: &str) -> Option<&FieldDef> {
        let field = self.fields.get(name)?;
        match &field.kind {
            FieldKind::Normal => Some(field),
            FieldKind::VirtualAlias { target } => {
                self.fields.get(target).filter(|def| !def.is_alias())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut fields = HashMap::with_capacity(self.fields.len());
        for field in self.fields {
            if fields.contains_key(&field.name) {
                return Err(SchemaError::DuplicateField(field.name));
            }
            fields.insert(field.name.clone(), field);
        }
        Ok(Schema { fields })
    }
}
