use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub id: Uuid,
    pub name: String,
    pub kind: ScheduleKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleKind {
    Constant { value: f64 },
    /// Default day profile only; each entry holds its value until `until_minute`.
    Ruleset { default_day: Vec<DayValue> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DayValue {
    pub until_minute: u32,
    pub value: f64,
}

impl Schedule {
    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: ScheduleKind::Constant { value },
        }
    }

    /// Ruleset whose default day holds `value` for the whole day.
    pub fn all_day(name: impl Into<String>, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: ScheduleKind::Ruleset {
                default_day: vec![DayValue {
                    until_minute: MINUTES_PER_DAY,
                    value,
                }],
            },
        }
    }

    pub fn value_at(&self, minute_of_day: u32) -> Option<f64> {
        match &self.kind {
            ScheduleKind::Constant { value } => Some(*value),
            ScheduleKind::Ruleset { default_day } => default_day
                .iter()
                .find(|d| minute_of_day < d.until_minute)
                .map(|d| d.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_schedule_value() {
        let s = Schedule::constant("Always On", 1.0);
        assert_eq!(s.value_at(0), Some(1.0));
        assert_eq!(s.value_at(1439), Some(1.0));
    }

    #[test]
    fn test_ruleset_lookup() {
        let s = Schedule {
            id: Uuid::new_v4(),
            name: "Setback".into(),
            kind: ScheduleKind::Ruleset {
                default_day: vec![
                    DayValue { until_minute: 6 * 60, value: 15.6 },
                    DayValue { until_minute: MINUTES_PER_DAY, value: 21.0 },
                ],
            },
        };
        assert_eq!(s.value_at(0), Some(15.6));
        assert_eq!(s.value_at(6 * 60), Some(21.0));
        assert_eq!(s.value_at(MINUTES_PER_DAY), None);
    }
}
