use std::fmt;

use serde::{Serialize, Serializer};

/// Provider lifecycle state of an instance.
///
/// Known labels get a variant; anything the provider reports that we do not
/// recognize is carried through verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    Other(String),
}

impl InstanceState {
    pub fn parse(label: &str) -> Self {
        match label {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }

    /// The provider's lowercase label for this state.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InstanceState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One discovered instance, projected from the provider's describe response.
///
/// Records are a snapshot: built fresh on every discovery call, never cached
/// and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InstanceRecord {
    pub id: String,
    pub instance_type: String,
    pub state: InstanceState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_labels() {
        assert_eq!(InstanceState::parse("running"), InstanceState::Running);
        assert_eq!(InstanceState::parse("terminated"), InstanceState::Terminated);
        assert_eq!(
            InstanceState::parse("shutting-down"),
            InstanceState::ShuttingDown
        );
    }

    #[test]
    fn test_parse_unknown_label_is_carried_through() {
        let state = InstanceState::parse("rebalancing");
        assert_eq!(state, InstanceState::Other("rebalancing".to_string()));
        assert_eq!(state.as_str(), "rebalancing");
    }

    #[test]
    fn test_display_round_trips_the_label() {
        for label in ["pending", "running", "stopping", "stopped", "terminated"] {
            assert_eq!(InstanceState::parse(label).to_string(), label);
        }
    }

    #[test]
    fn test_record_serializes_state_as_plain_label() {
        let record = InstanceRecord {
            id: "i-1".into(),
            instance_type: "t2.micro".into(),
            state: InstanceState::Running,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["state"], "running");
        assert_eq!(json["instance_type"], "t2.micro");
    }
}
