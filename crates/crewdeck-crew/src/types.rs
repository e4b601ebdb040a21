use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every mutable attribute of a crew member, as submitted by create/update.
///
/// Names, the cycle anchor and the cycle length are required; decoding a
/// body without them fails before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewFields {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub preferred_name: Option<String>,

    // Contact
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub contact_method: Option<String>,

    // Employment and rotation
    #[serde(default)]
    pub date_employment_started: Option<NaiveDate>,
    /// Cycle anchor: rotation weeks are counted from this date.
    pub current_cycle_start: NaiveDate,
    pub cycle_length_weeks: u32,

    // Trained for position
    #[serde(default)]
    pub positions_trained_captain: bool,
    #[serde(default)]
    pub positions_trained_1st_mate: bool,
    #[serde(default)]
    pub positions_trained_engineer: bool,
    #[serde(default)]
    pub positions_trained_chef: bool,
    #[serde(default)]
    pub positions_trained_deckhand: bool,

    // Trained on boat
    #[serde(default)]
    pub boats_trained_cat_ppalu: bool,
    #[serde(default)]
    pub boats_trained_morning_star: bool,
    #[serde(default)]
    pub boats_trained_sea_explorer: bool,

    // Banking
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub institute_number: Option<String>,
    #[serde(default)]
    pub transit_number: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
}

impl CrewFields {
    /// Minimal record with every optional attribute empty.
    pub fn new(
        first_name: &str,
        last_name: &str,
        current_cycle_start: NaiveDate,
        cycle_length_weeks: u32,
    ) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            preferred_name: None,
            email: None,
            telephone: None,
            contact_method: None,
            date_employment_started: None,
            current_cycle_start,
            cycle_length_weeks,
            positions_trained_captain: false,
            positions_trained_1st_mate: false,
            positions_trained_engineer: false,
            positions_trained_chef: false,
            positions_trained_deckhand: false,
            boats_trained_cat_ppalu: false,
            boats_trained_morning_star: false,
            boats_trained_sea_explorer: false,
            bank_name: None,
            institute_number: None,
            transit_number: None,
            account_number: None,
        }
    }

    /// Name copied into schedule entries: `"{first} {last}"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// A stored crew member plus the computed end of their current cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(flatten)]
    pub fields: CrewFields,
    /// `current_cycle_start + cycle_length_weeks` weeks.
    pub current_cycle_end: Option<NaiveDate>,
}
