//! Built-in resource schemas for the Flair API.
//!
//! Relationship declarations for each resource type the Flair service
//! exposes. Attribute lists are not declared; attributes are carried as
//! free-form JSON.

use crate::jsonapi::{RelationshipSchema as Rel, ResourceSchema};

pub const USERS: ResourceSchema = ResourceSchema {
    resource_type: "users",
    relationships: &[
        Rel::many("editable-structures", "structures"),
        Rel::many("viewable-structures", "structures"),
        Rel::many("adminable-structures", "structures"),
        Rel::one("default-structure", "structures"),
        Rel::many("devices", "devices"),
    ],
};

pub const STRUCTURES: ResourceSchema = ResourceSchema {
    resource_type: "structures",
    relationships: &[
        Rel::many("editor-users", "users"),
        Rel::many("viewer-users", "users"),
        Rel::many("admin-users", "users"),
        Rel::many("rooms", "rooms"),
        Rel::many("zones", "zones"),
        Rel::many("hvac-units", "hvac-units"),
        Rel::many("thermostats", "thermostats"),
        Rel::many("weather-readings", "weather-readings"),
        Rel::many("pucks", "pucks"),
        Rel::many("vents", "vents"),
    ],
};

pub const OAUTH_APPLICATIONS: ResourceSchema = ResourceSchema {
    resource_type: "oauth-applications",
    relationships: &[Rel::one("user", "users")],
};

pub const CALLBACKS: ResourceSchema = ResourceSchema {
    resource_type: "callbacks",
    relationships: &[Rel::one("application", "oauth-applications")],
};

pub const ZONES: ResourceSchema = ResourceSchema {
    resource_type: "zones",
    relationships: &[
        Rel::one("structure", "structures"),
        Rel::many("rooms", "rooms"),
        Rel::one("thermostat", "thermostats"),
    ],
};

pub const WINDOWS: ResourceSchema = ResourceSchema {
    resource_type: "windows",
    relationships: &[],
};

pub const ROOMS: ResourceSchema = ResourceSchema {
    resource_type: "rooms",
    relationships: &[
        Rel::many("puck-apps", "puck-apps"),
        Rel::one("structure", "structures"),
        Rel::one("zone", "zones"),
        Rel::many("hvac-units", "hvac-units"),
        Rel::many("pucks", "pucks"),
        Rel::many("vents", "vents"),
    ],
};

pub const PUCK_STATES: ResourceSchema = ResourceSchema {
    resource_type: "puck-states",
    relationships: &[Rel::one("puck", "pucks")],
};

pub const PUCKS: ResourceSchema = ResourceSchema {
    resource_type: "pucks",
    relationships: &[
        Rel::one("current-state", "puck-states"),
        Rel::one("previous-state", "puck-states"),
        Rel::one("room", "rooms"),
        Rel::one("structure", "structures"),
        Rel::many("beacon-sightings", "beacon-sightings"),
        Rel::many("sensor-readings", "sensor-readings"),
    ],
};

pub const VENT_SENSOR_READINGS: ResourceSchema = ResourceSchema {
    resource_type: "vent-sensor-readings",
    relationships: &[Rel::one("vent", "vents")],
};

pub const VENT_STATES: ResourceSchema = ResourceSchema {
    resource_type: "vent-states",
    relationships: &[Rel::one("vent", "vents")],
};

pub const VENTS: ResourceSchema = ResourceSchema {
    resource_type: "vents",
    relationships: &[
        Rel::one("current-state", "vent-states"),
        Rel::one("previous-state", "vent-states"),
        Rel::one("room", "rooms"),
        Rel::many("sensor-readings", "vent-sensor-readings"),
        Rel::one("structure", "structures"),
    ],
};

pub const PUCK_APPS: ResourceSchema = ResourceSchema {
    resource_type: "puck-apps",
    relationships: &[Rel::one("room", "rooms")],
};

pub const INTEGRATION_STRUCTURES: ResourceSchema = ResourceSchema {
    resource_type: "integration-structures",
    relationships: &[
        Rel::many("thermostats", "thermostats"),
        Rel::one("structure", "structures"),
        Rel::one("integration", "integrations"),
    ],
};

pub const INTEGRATIONS: ResourceSchema = ResourceSchema {
    resource_type: "integrations",
    relationships: &[
        Rel::many("integration-structures", "integration-structures"),
        Rel::one("user", "users"),
    ],
};

pub const THERMOSTATS: ResourceSchema = ResourceSchema {
    resource_type: "thermostats",
    relationships: &[
        Rel::one("integration-structure", "integration-structures"),
        Rel::one("room", "rooms"),
        Rel::one("structure", "structures"),
        Rel::many("thermostat-states", "thermostat-states"),
    ],
};

pub const THERMOSTAT_STATES: ResourceSchema = ResourceSchema {
    resource_type: "thermostat-states",
    relationships: &[Rel::one("thermostat", "thermostats")],
};

pub const SENSOR_READINGS: ResourceSchema = ResourceSchema {
    resource_type: "sensor-readings",
    relationships: &[Rel::one("puck", "pucks")],
};

pub const WEATHER_READINGS: ResourceSchema = ResourceSchema {
    resource_type: "weather-readings",
    relationships: &[Rel::one("structure", "structures")],
};

pub const BEACON_SIGHTINGS: ResourceSchema = ResourceSchema {
    resource_type: "beacon-sightings",
    relationships: &[Rel::one("puck", "pucks"), Rel::one("device", "devices")],
};

pub const DEVICES: ResourceSchema = ResourceSchema {
    resource_type: "devices",
    relationships: &[
        Rel::one("user", "users"),
        Rel::many("beacon-sightings", "beacon-sightings"),
    ],
};

pub const HVAC_UNIT_STATES: ResourceSchema = ResourceSchema {
    resource_type: "hvac-unit-states",
    relationships: &[],
};

pub const HVAC_UNITS: ResourceSchema = ResourceSchema {
    resource_type: "hvac-units",
    relationships: &[
        Rel::one("structure", "structures"),
        Rel::one("room", "rooms"),
    ],
};

/// Every built-in schema.
pub const ALL: &[&ResourceSchema] = &[
    &USERS,
    &STRUCTURES,
    &OAUTH_APPLICATIONS,
    &CALLBACKS,
    &ZONES,
    &WINDOWS,
    &ROOMS,
    &PUCK_STATES,
    &PUCKS,
    &VENT_SENSOR_READINGS,
    &VENT_STATES,
    &VENTS,
    &PUCK_APPS,
    &INTEGRATION_STRUCTURES,
    &INTEGRATIONS,
    &THERMOSTATS,
    &THERMOSTAT_STATES,
    &SENSOR_READINGS,
    &WEATHER_READINGS,
    &BEACON_SIGHTINGS,
    &DEVICES,
    &HVAC_UNIT_STATES,
    &HVAC_UNITS,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_type_names_are_unique() {
        let names: HashSet<&str> = ALL.iter().map(|s| s.resource_type).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_relationship_targets_are_known_types() {
        let names: HashSet<&str> = ALL.iter().map(|s| s.resource_type).collect();
        for schema in ALL {
            for rel in schema.relationships {
                assert!(
                    names.contains(rel.target),
                    "{}.{} points at unknown type {}",
                    schema.resource_type,
                    rel.name,
                    rel.target
                );
            }
        }
    }

    #[test]
    fn test_cardinality() {
        assert!(!PUCKS.relationship("room").unwrap().many);
        assert!(ROOMS.relationship("pucks").unwrap().many);
        assert!(USERS.relationship("missing").is_none());
    }
}
