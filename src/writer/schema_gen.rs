use crate::schema::TableSchema;

/// Name of the implicit row-order column added to every loaded table
pub const ROW_COLUMN: &str = "row_num";

/// Generate CREATE TABLE SQL for a table schema
///
/// Partitioned tables get their partition key as a leading column, since
/// the key only exists in the source file name.
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", schema.name);
    let mut columns = Vec::new();

    columns.push(format!("    {} INTEGER NOT NULL", ROW_COLUMN));

    if let Some(kind) = schema.partition {
        columns.push(format!("    {} TEXT NOT NULL", kind.column_name()));
    }

    for col in schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        columns.push(format!(
            "    {} {}{}",
            col.name,
            col.col_type.sql_type(),
            null_constraint
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for the key columns
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    let mut indexes = Vec::new();

    if !schema.key_columns.is_empty() {
        // Match rows repeat their key when a player fields duplicate units
        let unique = schema.partition.is_none();
        indexes.push(format!(
            "CREATE {}INDEX idx_{}_key ON {}({})",
            if unique { "UNIQUE " } else { "" },
            schema.name,
            schema.name,
            schema.key_columns.join(", ")
        ));
    }

    if let Some(kind) = schema.partition {
        indexes.push(format!(
            "CREATE INDEX idx_{}_{} ON {}({})",
            schema.name,
            kind.column_name(),
            schema.name,
            kind.column_name()
        ));
    }

    indexes
}
