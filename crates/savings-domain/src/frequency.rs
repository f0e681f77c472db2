//! Pay and cost cadences used by plans.

use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

/// How often a salary figure is paid.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SalaryFrequency {
    Hourly,
    Weekly,
    Biweekly,
    Monthly,
    Annually,
}

impl SalaryFrequency {
    pub const ALL: [SalaryFrequency; 5] = [
        SalaryFrequency::Hourly,
        SalaryFrequency::Weekly,
        SalaryFrequency::Biweekly,
        SalaryFrequency::Monthly,
        SalaryFrequency::Annually,
    ];

    /// Matches the persisted label exactly; anything else is not a salary cadence.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SalaryFrequency::Hourly => "hourly",
            SalaryFrequency::Weekly => "weekly",
            SalaryFrequency::Biweekly => "biweekly",
            SalaryFrequency::Monthly => "monthly",
            SalaryFrequency::Annually => "annually",
        }
    }
}

impl fmt::Display for SalaryFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a living cost is charged.
///
/// Labels that do not match a known cadence are kept verbatim so that a plan
/// written by another client survives a load/save cycle unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum CostFrequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Annually,
    Unrecognized(String),
}

impl CostFrequency {
    /// Case-insensitive parse; unknown labels become [`CostFrequency::Unrecognized`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => CostFrequency::Daily,
            "weekly" => CostFrequency::Weekly,
            "biweekly" => CostFrequency::Biweekly,
            "monthly" => CostFrequency::Monthly,
            "annually" => CostFrequency::Annually,
            _ => CostFrequency::Unrecognized(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CostFrequency::Daily => "daily",
            CostFrequency::Weekly => "weekly",
            CostFrequency::Biweekly => "biweekly",
            CostFrequency::Monthly => "monthly",
            CostFrequency::Annually => "annually",
            CostFrequency::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for CostFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CostFrequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CostFrequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(label)) => CostFrequency::parse(&label),
            _ => CostFrequency::default(),
        })
    }
}
