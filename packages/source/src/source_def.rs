//! Config-driven CSV source definition.
//!
//! [`SourceDefinition`] captures everything unique about one SIM export
//! file in a serializable config struct: the file name and the column name
//! aliases that drifted between export vintages. A single generic loader
//! handles all sources, eliminating per-vintage boilerplate.

use serde::Deserialize;

/// A complete, config-driven CSV source definition.
///
/// Loaded from TOML files at compile time and used as the sole source
/// implementation.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"sim_current"`).
    pub id: String,
    /// Human-readable name (e.g., `"SIM interventions (current)"`).
    pub name: String,
    /// CSV file name, resolved against the run's data directory.
    pub file_name: String,
    /// Column name aliases for the creation timestamp, tried in order;
    /// the first header hit wins.
    pub datetime_columns: Vec<String>,
    /// Column name aliases for the intervention-type description, tried in
    /// order. A source with none of these still loads — every record then
    /// falls back to the `Other` category.
    pub category_columns: Vec<String>,
}

impl SourceDefinition {
    /// Returns the unique source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves a column from this source's alias list against a CSV
    /// header row, returning the index of the first alias present.
    #[must_use]
    pub fn resolve_column(headers: &csv::StringRecord, aliases: &[String]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| headers.iter().position(|h| h.trim() == alias))
    }
}

/// Parses a [`SourceDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_source_toml_fields() {
        let def = parse_source_toml(
            r#"
            id = "sim_current"
            name = "SIM interventions (current)"
            file_name = "donneesouvertes-interventions-sim.csv"
            datetime_columns = ["CREATION_DATE_TIME"]
            category_columns = ["DESCRIPTION_GROUPE", "DESCRIPTIO"]
            "#,
        )
        .unwrap();
        assert_eq!(def.id(), "sim_current");
        assert_eq!(def.file_name, "donneesouvertes-interventions-sim.csv");
        assert_eq!(def.category_columns.len(), 2);
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(parse_source_toml("id = \"x\"").is_err());
    }

    #[test]
    fn resolves_first_matching_alias() {
        let headers = csv::StringRecord::from(vec![
            "INCIDENT_NBR",
            "CREATION_DATE_TIME",
            "DESCRIPTION_GROUPE",
        ]);
        let aliases = vec![
            "MISSING".to_string(),
            "DESCRIPTION_GROUPE".to_string(),
            "CREATION_DATE_TIME".to_string(),
        ];
        assert_eq!(
            SourceDefinition::resolve_column(&headers, &aliases),
            Some(2)
        );
    }

    #[test]
    fn resolve_column_trims_header_whitespace() {
        let headers = csv::StringRecord::from(vec![" CREATION_DATE_TIME "]);
        let aliases = vec!["CREATION_DATE_TIME".to_string()];
        assert_eq!(
            SourceDefinition::resolve_column(&headers, &aliases),
            Some(0)
        );
    }

    #[test]
    fn resolve_column_misses_cleanly() {
        let headers = csv::StringRecord::from(vec!["A", "B"]);
        let aliases = vec!["C".to_string()];
        assert_eq!(SourceDefinition::resolve_column(&headers, &aliases), None);
    }
}
