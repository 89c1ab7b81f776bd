#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Intervention category taxonomy and the canonical record model.
//!
//! This crate defines the 7 canonical intervention categories used across
//! the entire sim-timelapse pipeline, together with their bilingual display
//! labels and fixed palette colors. Every data source normalizes its raw
//! `DESCRIPTION_GROUPE`-style labels into this shared taxonomy.

pub mod record;

pub use record::{IncidentDataset, IncidentRecord, InvalidMonthKeyError, MonthKey};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Canonical intervention categories, in fixed palette order.
///
/// The variant order is the palette insertion order used everywhere a full
/// category listing is displayed (legends, bar labels); it is deliberately
/// NOT alphabetical.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentCategory {
    /// Structure fires in buildings
    BuildingFire,
    /// Fires outside buildings (vehicles, vegetation, etc.)
    OtherFire,
    /// Interventions without any fire involved
    NonFire,
    /// Fire alarm activations
    FireAlarm,
    /// First responder / medical assistance calls
    FirstResponder,
    /// False alarms and cancelled calls
    FalseAlarm,
    /// Anything that maps to no other category
    Other,
}

impl IncidentCategory {
    /// Returns the English display label.
    #[must_use]
    pub const fn label_en(self) -> &'static str {
        match self {
            Self::BuildingFire => "Building fires",
            Self::OtherFire => "Other fires",
            Self::NonFire => "Non-fire",
            Self::FireAlarm => "Fire alarms",
            Self::FirstResponder => "First responders",
            Self::FalseAlarm => "False alarms/cancellations",
            Self::Other => "Other",
        }
    }

    /// Returns the French display label.
    #[must_use]
    pub const fn label_fr(self) -> &'static str {
        match self {
            Self::BuildingFire => "Incendies de bâtiments",
            Self::OtherFire => "Autres incendies",
            Self::NonFire => "Sans incendie",
            Self::FireAlarm => "Alarmes-incendie",
            Self::FirstResponder => "Premiers répondants",
            Self::FalseAlarm => "Fausses alertes/annulations",
            Self::Other => "Autres",
        }
    }

    /// Returns the paired bilingual display label ("English / Français").
    ///
    /// Bilingual presentation is a fixed pairing, not a locale lookup:
    /// both languages always appear together.
    #[must_use]
    pub const fn label_bilingual(self) -> &'static str {
        match self {
            Self::BuildingFire => "Building fires / Incendies de bâtiments",
            Self::OtherFire => "Other fires / Autres incendies",
            Self::NonFire => "Non-fire / Sans incendie",
            Self::FireAlarm => "Fire alarms / Alarmes-incendie",
            Self::FirstResponder => "First responders / Premiers répondants",
            Self::FalseAlarm => "False alarms/cancellations / Fausses alertes/annulations",
            Self::Other => "Other / Autres",
        }
    }

    /// Returns the fixed display color for this category as an RGB triple.
    #[must_use]
    pub const fn color(self) -> (u8, u8, u8) {
        match self {
            Self::BuildingFire => (255, 0, 0),      // red
            Self::OtherFire => (255, 165, 0),       // orange
            Self::NonFire => (0, 0, 255),           // blue
            Self::FireAlarm => (255, 215, 0),       // yellow
            Self::FirstResponder => (0, 128, 0),    // green
            Self::FalseAlarm => (128, 128, 128),    // gray
            Self::Other => (128, 0, 128),           // purple
        }
    }

    /// Returns all variants in palette order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::BuildingFire,
            Self::OtherFire,
            Self::NonFire,
            Self::FireAlarm,
            Self::FirstResponder,
            Self::FalseAlarm,
            Self::Other,
        ]
    }
}
