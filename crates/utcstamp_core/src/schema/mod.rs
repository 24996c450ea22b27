//! Column definitions and the `stamps` table layout.
//!
//! # Responsibility
//! - Provide column helpers that carry both DDL and value conversion.
//! - Describe the tables created by migrations.
//!
//! # Invariants
//! - Migration DDL is rendered from the same column values repositories use
//!   for reading and writing.

pub mod datetime_column;
pub mod text_column;

pub use datetime_column::UtcDatetimeColumn;
pub use text_column::{
    id_column, new_id, ref_column, varchar_column, VarcharColumn, DEFAULT_VARCHAR_LENGTH,
    ID_LENGTH,
};

pub const STAMPS_TABLE: &str = "stamps";

/// Columns of the `stamps` table.
#[derive(Debug, Clone)]
pub struct StampColumns {
    pub id: VarcharColumn,
    pub label: VarcharColumn,
    pub recorded_at: UtcDatetimeColumn,
}

impl StampColumns {
    pub fn new() -> Self {
        Self {
            id: id_column(),
            label: varchar_column("label").not_null(),
            recorded_at: UtcDatetimeColumn::new("recorded_at").not_null(),
        }
    }

    /// `CREATE TABLE` statement for `stamps`.
    pub fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {STAMPS_TABLE} (\n    {},\n    {},\n    {}\n);\n\
             CREATE INDEX IF NOT EXISTS idx_stamps_recorded_at ON {STAMPS_TABLE} ({});",
            self.id.definition(),
            self.label.definition(),
            self.recorded_at.definition(),
            self.recorded_at.name(),
        )
    }
}

impl Default for StampColumns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::StampColumns;

    #[test]
    fn create_table_sql_lists_every_column() {
        let sql = StampColumns::new().create_table_sql();
        assert!(sql.contains("id VARCHAR(128) PRIMARY KEY"));
        assert!(sql.contains("label VARCHAR(255) NOT NULL"));
        assert!(sql.contains("recorded_at DATETIME(3) NOT NULL"));
        assert!(sql.contains("idx_stamps_recorded_at"));
    }
}
