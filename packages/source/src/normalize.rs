//! Intervention category normalization.
//!
//! Maps raw `DESCRIPTION_GROUPE`-style labels to the canonical
//! [`IncidentCategory`] taxonomy. The export vintages use different naming
//! conventions, so classification is keyword-based over the upper-cased
//! label.

use sim_timelapse_incident_models::IncidentCategory;

/// Keyword groups tested in order; the first group with a match wins.
///
/// The order is load-bearing: the keywords are not mutually exclusive
/// substrings (a label can contain both "ALARME" and "FEU"), so reordering
/// the groups would reclassify historical records. Building-fire terms are
/// always tested first.
const KEYWORD_GROUPS: &[(&[&str], IncidentCategory)] = &[
    (
        &["INCENDIE BATIMENT", "BÂTIMENT", "BUILDING"],
        IncidentCategory::BuildingFire,
    ),
    (
        &["INCENDIE", "AUTRE FEU", "FEU"],
        IncidentCategory::OtherFire,
    ),
    (&["SANS FEU", "SANS INCENDIE"], IncidentCategory::NonFire),
    (&["ALARME", "ALARM"], IncidentCategory::FireAlarm),
    (
        &["PREMIER", "1-REPOND", "RÉPONDANT", "MEDICAL"],
        IncidentCategory::FirstResponder,
    ),
    (
        &["FAUSSE", "ANNUL", "CANCEL"],
        IncidentCategory::FalseAlarm,
    ),
];

/// Maps a raw intervention label to its canonical category.
///
/// Case-insensitive keyword matching over [`KEYWORD_GROUPS`]. Missing,
/// empty, and unrecognized labels fall back to
/// [`IncidentCategory::Other`].
#[must_use]
pub fn normalize_incident_type(raw: Option<&str>) -> IncidentCategory {
    let Some(raw) = raw else {
        return IncidentCategory::Other;
    };

    let upper = raw.to_uppercase();

    for (terms, category) in KEYWORD_GROUPS {
        if contains_any(&upper, terms) {
            return *category;
        }
    }

    IncidentCategory::Other
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_sim_labels() {
        assert_eq!(
            normalize_incident_type(Some("INCENDIE BATIMENT")),
            IncidentCategory::BuildingFire
        );
        assert_eq!(
            normalize_incident_type(Some("Incendies de bâtiments")),
            IncidentCategory::BuildingFire
        );
        assert_eq!(
            normalize_incident_type(Some("AUTRE FEU")),
            IncidentCategory::OtherFire
        );
        assert_eq!(
            normalize_incident_type(Some("10-22 SECOURS")),
            IncidentCategory::Other
        );
        assert_eq!(
            normalize_incident_type(Some("ALARME")),
            IncidentCategory::FireAlarm
        );
        assert_eq!(
            normalize_incident_type(Some("SMOKE ALARM")),
            IncidentCategory::FireAlarm
        );
        assert_eq!(
            normalize_incident_type(Some("1-REPOND")),
            IncidentCategory::FirstResponder
        );
        assert_eq!(
            normalize_incident_type(Some("Fausse alerte")),
            IncidentCategory::FalseAlarm
        );
    }

    #[test]
    fn building_fire_wins_over_any_other_keyword() {
        // Every group's keywords lose to a building-fire term in the same
        // label.
        for label in [
            "INCENDIE BATIMENT SANS FEU",
            "ALARME - BÂTIMENT",
            "BUILDING MEDICAL",
            "FAUSSE ALERTE BUILDING",
        ] {
            assert_eq!(
                normalize_incident_type(Some(label)),
                IncidentCategory::BuildingFire,
                "{label}"
            );
        }
    }

    #[test]
    fn fire_keyword_wins_over_alarm_keyword() {
        // "ALARME FEU" contains terms from groups 2 and 4; group 2 is
        // tested first.
        assert_eq!(
            normalize_incident_type(Some("ALARME FEU")),
            IncidentCategory::OtherFire
        );
    }

    #[test]
    fn non_fire_terms_are_shadowed_by_the_fire_group() {
        // "SANS FEU" contains "FEU" and "SANS INCENDIE" contains
        // "INCENDIE", both of which match the earlier fire group. This
        // matches the historical classification of those labels.
        assert_eq!(
            normalize_incident_type(Some("SANS FEU")),
            IncidentCategory::OtherFire
        );
        assert_eq!(
            normalize_incident_type(Some("SANS INCENDIE")),
            IncidentCategory::OtherFire
        );
    }

    #[test]
    fn missing_and_empty_fall_back_to_other() {
        assert_eq!(normalize_incident_type(None), IncidentCategory::Other);
        assert_eq!(normalize_incident_type(Some("")), IncidentCategory::Other);
        assert_eq!(
            normalize_incident_type(Some("SOME UNRECOGNIZED LABEL")),
            IncidentCategory::Other
        );
    }
}
