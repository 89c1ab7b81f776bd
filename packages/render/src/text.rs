//! Fixed bilingual text and number formatting for rendered frames.
//!
//! Every user-facing string is a hardcoded English/French pair — paired
//! presentation, not a locale lookup. Keep both halves in sync when
//! editing.

use num_format::{Locale, ToFormattedString};
use sim_timelapse_incident_models::MonthKey;

/// English title line (with credit).
pub const TITLE_EN: &str = "Montreal Fire Department Interventions: created by Mycole Brown";

/// French title line (with credit).
pub const TITLE_FR: &str =
    "Interventions du Service d'incendie de Montréal: créé par Mycole Brown";

/// Trend panel caption.
pub const TREND_TITLE: &str = "Monthly Intervention Trend / Tendance mensuelle des interventions";

/// Shared count axis label.
pub const COUNT_AXIS_LABEL: &str = "Number of Interventions / Nombre d'interventions";

/// Breakdown (pie) panel caption prefix; the frame's month is appended.
pub const BREAKDOWN_TITLE: &str = "Incident Types / Types d'incidents";

/// Rolling-total panel caption.
pub const ROLLING_TITLE: &str = "12-Month Rolling Total / Total mobile sur 12 mois";

/// Data source attribution for the footer.
pub const DATA_SOURCE: &str =
    "Data source / Source des données: Service d'incendie de Montréal (SIM)";

/// Fixed data-coverage disclaimer for the footer.
pub const DATA_NOTE: &str = "Note: Animation includes only months with available data. / \
     Remarque: L'animation inclut uniquement les mois avec des données disponibles.";

/// Returns the French month name for a 1-based month.
#[must_use]
pub const fn french_month_name(month: u32) -> &'static str {
    match month {
        1 => "janvier",
        2 => "février",
        3 => "mars",
        4 => "avril",
        5 => "mai",
        6 => "juin",
        7 => "juillet",
        8 => "août",
        9 => "septembre",
        10 => "octobre",
        11 => "novembre",
        12 => "décembre",
        _ => "?",
    }
}

/// Formats a count with thousands separators ("12,345").
#[must_use]
pub fn format_count(count: u64) -> String {
    count.to_formatted_string(&Locale::en)
}

/// Title caption for a frame's month: `"2020-01 (janvier 2020)"`.
#[must_use]
pub fn month_caption(key: MonthKey) -> String {
    format!("{key} ({} {})", french_month_name(key.month()), key.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_counts_with_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(12_345), "12,345");
    }

    #[test]
    fn month_caption_pairs_key_and_french_name() {
        let key = MonthKey::new(2020, 8).unwrap();
        assert_eq!(month_caption(key), "2020-08 (août 2020)");
    }

    #[test]
    fn every_month_has_a_french_name() {
        for month in 1..=12 {
            assert_ne!(french_month_name(month), "?");
        }
        assert_eq!(french_month_name(0), "?");
        assert_eq!(french_month_name(13), "?");
    }

    #[test]
    fn fixed_strings_are_bilingual_pairs() {
        for s in [TREND_TITLE, COUNT_AXIS_LABEL, ROLLING_TITLE, DATA_SOURCE, DATA_NOTE] {
            assert!(s.contains(" / "), "missing pair separator: {s}");
        }
    }
}
