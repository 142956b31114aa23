//! Schema construction
//!
//! [`SchemaBuilder::build`] turns a model's declared field table into an
//! immutable [`Schema`] and rejects declarations that could never validate
//! (no constraint, unsatisfiable optionality, broken patterns).

use std::collections::HashSet;

use crate::constraints::Constraint;
use crate::engine::{ModelRef, RequestModel};
use crate::foundation::Value;
use crate::schema::{Declared, FieldDecl, FieldSpec, FieldType, SchemaError};

// ============================================================================
// SCHEMA
// ============================================================================

/// The ordered, immutable field specs of one model.
///
/// Field order is declaration order; it is the processing order and the
/// order of reported errors.
#[derive(Debug, Clone)]
pub struct Schema {
    model: ModelRef,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Builds the schema of `T` without going through a registry.
    pub fn of<T: RequestModel>() -> Result<Self, SchemaError> {
        SchemaBuilder::describe(ModelRef::of::<T>()).build()
    }

    #[must_use]
    pub const fn model(&self) -> &ModelRef {
        &self.model
    }

    #[must_use]
    pub const fn model_name(&self) -> &'static str {
        self.model.name()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// SCHEMA BUILDER
// ============================================================================

/// Collects field declarations for a model.
///
/// Handed to [`RequestModel::describe`]; every declaration problem is
/// reported by [`build`](Self::build).
#[derive(Debug)]
pub struct SchemaBuilder {
    model: ModelRef,
    fields: Vec<FieldDecl>,
}

impl SchemaBuilder {
    #[must_use]
    pub const fn new(model: ModelRef) -> Self {
        Self {
            model,
            fields: Vec::new(),
        }
    }

    /// A builder pre-filled by the model's own `describe`.
    #[must_use]
    pub fn describe(model: ModelRef) -> Self {
        model.describe(Self::new(model))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    #[must_use]
    pub const fn model(&self) -> &ModelRef {
        &self.model
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let model = self.model.name();
        let mut names = HashSet::with_capacity(self.fields.len());
        let mut keys = HashSet::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());

        for decl in self.fields {
            if !names.insert(decl.name.clone()) {
                return Err(SchemaError::DuplicateField {
                    model,
                    field: decl.name.into_owned(),
                });
            }
            if !keys.insert(decl.source_key().to_owned()) {
                return Err(SchemaError::DuplicateSourceKey {
                    model,
                    key: decl.source_key().to_owned(),
                });
            }
            fields.push(build_field(model, decl)?);
        }

        Ok(Schema {
            model: self.model,
            fields,
        })
    }
}

fn build_field(model: &'static str, decl: FieldDecl) -> Result<FieldSpec, SchemaError> {
    let optional = decl.resolve_optional();
    let default = decl.resolve_default();
    let source_key = decl.alias.clone().unwrap_or_else(|| decl.name.clone());
    let FieldDecl {
        name,
        field_type,
        nullable,
        constraints: declared,
        ..
    } = decl;

    let mut constraints = Vec::with_capacity(declared.len() + 1);
    for entry in declared {
        match entry {
            Declared::Constraint(constraint) => {
                if let Some(produced) = lookup_output(&constraint) {
                    if field_type != produced && field_type != FieldType::Any {
                        return Err(SchemaError::IncompatibleConstraint {
                            model,
                            field: name.into_owned(),
                            constraint: constraint.name(),
                            field_type: field_type.to_string(),
                        });
                    }
                }
                constraints.push(constraint);
            }
            Declared::InvalidPattern { pattern, reason } => {
                return Err(SchemaError::InvalidPattern {
                    model,
                    field: name.into_owned(),
                    pattern,
                    reason,
                });
            }
        }
    }

    if constraints.is_empty() {
        let Some(implicit) = field_type.implicit_constraint() else {
            return Err(SchemaError::MissingConstraint {
                model,
                field: name.into_owned(),
                field_type: field_type.to_string(),
            });
        };
        constraints.push(implicit);
    } else {
        if let Some(transformer) = field_type.scalar_transformer() {
            if !constraints[0].can_transform() {
                constraints.insert(0, transformer);
            }
        }
        if let Some(format) = field_type.format_constraint() {
            if format.name() != constraints[0].name() {
                constraints.insert(0, format);
            }
        }
        if let Some(nested) = field_type.nested_constraint() {
            if !constraints.iter().any(|c| c.is_nested()) {
                constraints.push(nested);
            }
        }
    }

    let default = match default {
        None if optional && nullable => Some(Value::Null),
        None if optional => {
            return Err(SchemaError::UnsatisfiableDefault {
                model,
                field: name.into_owned(),
            });
        }
        other => other,
    };

    if let Some(value) = &default {
        let null_allowed = nullable && value.is_null();
        if !null_allowed && !field_type.accepts(value.kind()) {
            return Err(SchemaError::IncompatibleDefault {
                model,
                field: name.into_owned(),
                expected: field_type.to_string(),
                actual: value.kind(),
            });
        }
    }

    Ok(FieldSpec {
        name,
        source_key,
        field_type,
        nullable,
        optional,
        default,
        constraints,
    })
}

/// The type a reference constraint resolves its keys into.
fn lookup_output(constraint: &Constraint) -> Option<FieldType> {
    match constraint {
        Constraint::Reference(_) => Some(FieldType::Record),
        Constraint::ReferenceList(_) => Some(FieldType::List),
        _ => None,
    }
}
