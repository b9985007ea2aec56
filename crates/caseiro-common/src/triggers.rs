/// A synthetic sensor condition that can be fired from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerDefinition {
    /// Label shown in the drop-down.
    pub label: &'static str,
    /// Stable key used in object paths.
    pub key: &'static str,
    /// First line of the trigger text object.
    pub message: &'static str,
}

/// Trigger table, in display order.
pub const TRIGGERS: &[TriggerDefinition] = &[
    TriggerDefinition {
        label: "trigger low air flow",
        key: "low_air_flow",
        message: "sensor detected low airflow",
    },
    TriggerDefinition {
        label: "trigger high humidity",
        key: "high_humidity",
        message: "sensor detected high humidity",
    },
    TriggerDefinition {
        label: "trigger amonia",
        key: "ammonia",
        message: "sensor detected high ammonia",
    },
    TriggerDefinition {
        label: "trigger low temperature",
        key: "low_temperature",
        message: "sensor detected low temperature",
    },
    TriggerDefinition {
        label: "trigger high temperature",
        key: "high_temperature",
        message: "sensor detected high temperature",
    },
    TriggerDefinition {
        label: "trigger low fan velocity",
        key: "low_fan_velocity",
        message: "sensor detected low fan velocity",
    },
    TriggerDefinition {
        label: "trigger high fan velocity",
        key: "high_fan_velocity",
        message: "sensor detected high fan velocity",
    },
    TriggerDefinition {
        label: "trigger variable fan speed",
        key: "variable_fan_speed",
        message: "sensor detected variable fan speed",
    },
    TriggerDefinition {
        label: "trigger variable current",
        key: "variable_current",
        message: "sensor detected variable current",
    },
];

/// Looks up a trigger by its display label (exact match).
///
/// # Examples
///
/// ```
/// use caseiro_common::triggers::lookup;
///
/// let def = lookup("trigger amonia").unwrap();
/// assert_eq!(def.key, "ammonia");
/// assert!(lookup("trigger ammonia").is_none());
/// ```
pub fn lookup(label: &str) -> Option<&'static TriggerDefinition> {
    TRIGGERS.iter().find(|t| t.label == label)
}

pub fn labels() -> impl Iterator<Item = &'static str> {
    TRIGGERS.iter().map(|t| t.label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keys_and_labels_are_unique() {
        let keys: HashSet<_> = TRIGGERS.iter().map(|t| t.key).collect();
        let labels: HashSet<_> = labels().collect();
        assert_eq!(keys.len(), TRIGGERS.len());
        assert_eq!(labels.len(), TRIGGERS.len());
    }

    #[test]
    fn high_temperature_maps_to_stable_key() {
        let def = lookup("trigger high temperature").unwrap();
        assert_eq!(def.key, "high_temperature");
        assert!(def.message.starts_with("sensor detected high temperature"));
    }

    #[test]
    fn labels_follow_table_order() {
        assert_eq!(labels().next(), Some("trigger low air flow"));
        assert_eq!(labels().last(), Some("trigger variable current"));
    }
}
