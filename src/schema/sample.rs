use super::{ColumnDescriptor, SchemaRequest};
use std::fs;
use std::path::Path;

/// Customer table migrated into a client table: the default smoke test payload.
pub fn customer_migration_request() -> SchemaRequest {
    SchemaRequest {
        source_schema: vec![
            ColumnDescriptor::new("src_1", "customer_id", "INTEGER", true, false),
            ColumnDescriptor::new("src_2", "first_name", "VARCHAR", false, true),
            ColumnDescriptor::new("src_3", "last_name", "VARCHAR", false, true),
            ColumnDescriptor::new("src_4", "email", "VARCHAR", false, true),
            ColumnDescriptor::new("src_5", "phone_number", "VARCHAR", false, true),
            ColumnDescriptor::new("src_6", "age", "INTEGER", false, true),
        ],
        destination_schema: vec![
            ColumnDescriptor::new("dest_1", "client_id", "INTEGER", true, false),
            ColumnDescriptor::new("dest_2", "full_name", "VARCHAR", false, true),
            ColumnDescriptor::new("dest_3", "email_address", "VARCHAR", false, true),
            ColumnDescriptor::new("dest_4", "contact_phone", "VARCHAR", false, true),
            ColumnDescriptor::new("dest_5", "date_of_birth", "DATE", false, true),
            ColumnDescriptor::new("dest_6", "registration_date", "TIMESTAMP", false, true),
        ],
    }
}

/// Reads a request from a JSON file and checks its ids.
pub fn load_request(path: &Path) -> Result<SchemaRequest, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let request: SchemaRequest = serde_json::from_str(&content)?;
    request.validate()?;
    Ok(request)
}
