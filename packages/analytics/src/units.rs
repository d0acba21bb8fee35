//! Unit membership matching.

use incident_survey_analytics_models::is_unrestricted;
use incident_survey_incident_models::{IncidentRecord, UnitCode};
use serde::{Deserialize, Serialize};

use crate::AnalyticsError;

/// Which responding units a query is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitSelector {
    /// Department-wide: every record matches.
    #[default]
    All,
    /// Only records the given unit responded to.
    Unit(UnitCode),
}

impl UnitSelector {
    /// Parses a raw unit parameter. `None`, `""` and `"ALL"` select every
    /// unit; anything else must be a valid unit code.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidParameter`] if the code is malformed.
    pub fn parse(raw: Option<&str>) -> Result<Self, AnalyticsError> {
        if is_unrestricted(raw) {
            return Ok(Self::All);
        }
        let value = raw.unwrap_or_default();
        UnitCode::parse(value)
            .map(Self::Unit)
            .map_err(|e| AnalyticsError::InvalidParameter {
                name: "unit",
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Returns `true` if the record's responding units include the
    /// selected unit. Codes are compared uppercased and must match a whole
    /// unit, so `E2` does not match a response by `E23`.
    #[must_use]
    pub fn matches(&self, record: &IncidentRecord) -> bool {
        match self {
            Self::All => true,
            Self::Unit(unit) => record.units.contains(unit),
        }
    }

    /// The selected unit, or `None` for department-wide queries.
    #[must_use]
    pub const fn unit(&self) -> Option<&UnitCode> {
        match self {
            Self::All => None,
            Self::Unit(unit) => Some(unit),
        }
    }
}

impl std::fmt::Display for UnitSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all units"),
            Self::Unit(unit) => write!(f, "{unit}"),
        }
    }
}

impl From<UnitCode> for UnitSelector {
    fn from(unit: UnitCode) -> Self {
        Self::Unit(unit)
    }
}
