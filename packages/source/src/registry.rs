//! Source registry — loads all source definitions from embedded TOML
//! configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the
//! binary at compile time via [`include_str!`]. Merge order is registry
//! order: the current export first, then the historical exports. Adding a
//! new export vintage is as simple as creating a new TOML file and adding
//! it to the list below.

use crate::source_def::{SourceDefinition, parse_source_toml};

/// TOML configs embedded at compile time, in merge order.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    ("sim_current", include_str!("../sources/sim_current.toml")),
    (
        "sim_2015_2022",
        include_str!("../sources/sim_2015_2022.toml"),
    ),
    (
        "sim_2005_2014",
        include_str!("../sources/sim_2005_2014.toml"),
    ),
];

/// Returns all configured source definitions, in merge order.
///
/// # Panics
///
/// Panics if an embedded TOML config fails to parse — a build-time
/// mistake, not a runtime condition.
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            parse_source_toml(toml_str)
                .unwrap_or_else(|e| panic!("invalid embedded source TOML {name}: {e}"))
        })
        .collect()
}
