use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::LatticeConfig;

/// JSON schema for the lattice TOML configuration, for editor and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(LatticeConfig);
    let metadata = schema.schema.metadata();
    metadata.title = Some("typelattice configuration".to_owned());
    metadata.description =
        Some("Assignability defaults, supertype resolution and logging settings.".to_owned());
    schema
}
