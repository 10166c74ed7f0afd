//! Editor facade: transform a stored snapshot and write it back.

use crate::config::Config;
use crate::error::{AppError, ListError};
use crate::list::RecordList;
use crate::models::{EditOp, Record};
use crate::schema::{AttributeSchema, SchemaSet};
use crate::store::AttributeStore;
use std::path::Path;

/// Applies [`EditOp`]s to attributes held by an [`AttributeStore`].
///
/// The store is written only after every operation of a request succeeded,
/// so a rejected edit leaves the stored attribute exactly as it was.
pub struct ListEditor<S> {
    store: S,
    schemas: SchemaSet,
    strict: bool,
}

impl<S: AttributeStore> ListEditor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            schemas: SchemaSet::new(),
            strict: false,
        }
    }

    /// Editor honoring `config.strict` and loading `config.schema_path`.
    ///
    /// # Errors
    /// Returns schema loading errors from [`SchemaSet::load`].
    pub fn from_config(store: S, config: &Config) -> Result<Self, AppError> {
        let schemas = match config.schema_path.as_deref() {
            Some(path) => SchemaSet::load(Path::new(path))?,
            None => SchemaSet::new(),
        };
        Ok(Self::new(store).with_schemas(schemas).strict(config.strict))
    }

    pub fn with_schemas(mut self, schemas: SchemaSet) -> Self {
        self.schemas = schemas;
        self
    }

    /// Validate edits against attribute schemas before applying them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn get(&self, attribute: &str) -> Result<RecordList<Record>, AppError> {
        self.store.get(attribute)
    }

    /// Create `attribute` from its schema seed when a block is inserted.
    ///
    /// # Returns
    /// The stored list; an existing attribute is returned untouched.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the attribute is absent and has no
    /// schema to seed from.
    pub fn insert_block(&mut self, attribute: &str) -> Result<RecordList<Record>, AppError> {
        if self.store.contains(attribute)? {
            return self.store.get(attribute);
        }
        let schema = self
            .schemas
            .get(attribute)
            .ok_or_else(|| AppError::NotFound(format!("schema for '{}'", attribute)))?;
        let seeded = schema.seed_list();
        self.store.set(attribute, seeded.clone())?;
        tracing::debug!("Seeded '{}' with {} record(s)", attribute, seeded.len());
        Ok(seeded)
    }

    /// Delete `attribute` when its block is removed.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when the attribute does not exist.
    pub fn remove_block(&mut self, attribute: &str) -> Result<RecordList<Record>, AppError> {
        self.store
            .remove(attribute)?
            .ok_or_else(|| AppError::NotFound(attribute.to_string()))
    }

    /// Apply one edit to `attribute`.
    ///
    /// # Returns
    /// The new snapshot, as stored.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] for a missing attribute,
    /// [`AppError::List`] when the edit is rejected, or store write errors.
    pub fn apply(&mut self, attribute: &str, op: &EditOp) -> Result<RecordList<Record>, AppError> {
        self.apply_all(attribute, std::slice::from_ref(op))
    }

    /// Apply `ops` in order to one snapshot and store the result once.
    ///
    /// The snapshot is read inside [`AttributeStore::update`], so a writer
    /// that committed first is never overwritten.
    ///
    /// # Errors
    /// Same as [`ListEditor::apply`]; the first failing operation aborts the
    /// whole batch. An empty batch is [`AppError::BadRequest`].
    pub fn apply_all(
        &mut self,
        attribute: &str,
        ops: &[EditOp],
    ) -> Result<RecordList<Record>, AppError> {
        if ops.is_empty() {
            return Err(AppError::BadRequest(format!(
                "No edit operations given for '{}'",
                attribute
            )));
        }
        let schema = self.schemas.get(attribute);
        let strict = self.strict;
        let mut before = 0;
        let next = self.store.update(attribute, |current| {
            before = current.len();
            transform(attribute, schema, strict, current, ops).map_err(|(position, err)| {
                tracing::warn!(
                    "Rejected {} #{} on '{}': {}; attribute left unchanged",
                    ops[position].name(),
                    position,
                    attribute,
                    err
                );
                AppError::from(err)
            })
        })?;
        tracing::debug!(
            "Applied {} edit(s) to '{}' ({} -> {} records)",
            ops.len(),
            attribute,
            before,
            next.len()
        );
        Ok(next)
    }
}

fn transform(
    attribute: &str,
    schema: Option<&AttributeSchema>,
    strict: bool,
    current: &RecordList<Record>,
    ops: &[EditOp],
) -> Result<RecordList<Record>, (usize, ListError)> {
    let template = schema.map(|schema| &schema.template);
    let mut list = current.clone();
    for (position, op) in ops.iter().enumerate() {
        if let (true, Some(schema)) = (strict, schema) {
            schema.validate_op(op).map_err(|err| (position, err))?;
        }
        list = op
            .apply(attribute, &list, template)
            .map_err(|err| (position, err))?;
    }
    Ok(list)
}
