//! Identifier and bounded text column helpers.
//!
//! # Responsibility
//! - Render `VARCHAR(n)` DDL fragments for ids, references and strings.
//! - Generate default values for primary-key id columns.
//!
//! # Invariants
//! - Id and reference columns share the same width, so any id fits any ref.

use uuid::Uuid;

/// Width of every id and reference column.
pub const ID_LENGTH: u32 = 128;
/// Default width for general text columns.
pub const DEFAULT_VARCHAR_LENGTH: u32 = 255;

/// Column definition for bounded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarcharColumn {
    name: String,
    length: u32,
    not_null: bool,
    primary_key: bool,
}

impl VarcharColumn {
    pub fn new(name: impl Into<String>, length: u32) -> Self {
        Self {
            name: name.into(),
            length,
            not_null: false,
            primary_key: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Returns whether `value` fits this column, counted in characters.
    pub fn fits(&self, value: &str) -> bool {
        value.chars().count() <= self.length as usize
    }

    pub fn data_type(&self) -> String {
        format!("VARCHAR({})", self.length)
    }

    /// DDL fragment for `CREATE TABLE`.
    pub fn definition(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY");
        } else if self.not_null {
            sql.push_str(" NOT NULL");
        }
        sql
    }
}

/// Primary-key `id VARCHAR(128)` column.
pub fn id_column() -> VarcharColumn {
    VarcharColumn::new("id", ID_LENGTH).primary_key()
}

/// Column referencing another table's id.
pub fn ref_column(name: impl Into<String>) -> VarcharColumn {
    VarcharColumn::new(name, ID_LENGTH)
}

/// General text column with the default width.
pub fn varchar_column(name: impl Into<String>) -> VarcharColumn {
    VarcharColumn::new(name, DEFAULT_VARCHAR_LENGTH)
}

/// Default value generator for id columns.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}
