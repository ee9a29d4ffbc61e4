//! Diagnostics-only registry exports.
//!
//! The dump lists what a registry knows about so external tooling can show
//! which table types and parameter types a suite has defined.

use serde::Serialize;

use super::{TypeRegistry, read};

#[derive(Serialize)]
struct DumpedTableType<'a> {
    name: &'a str,
    target: &'static str,
}

#[derive(Serialize)]
struct RegistryDump<'a> {
    table_types: Vec<DumpedTableType<'a>>,
    structural_types: Vec<&'static str>,
    parameter_types: Vec<String>,
}

pub(super) fn dump_registry(registry: &TypeRegistry) -> serde_json::Result<String> {
    let table_types = read(&registry.table_types);
    let mut dumped: Vec<_> = table_types
        .values()
        .map(|table_type| DumpedTableType {
            name: table_type.name(),
            target: table_type.target_type(),
        })
        .collect();
    dumped.sort_unstable_by(|a, b| a.name.cmp(b.name));
    serde_json::to_string(&RegistryDump {
        table_types: dumped,
        structural_types: registry.structural_type_names(),
        parameter_types: registry.parameter_type_names(),
    })
}
