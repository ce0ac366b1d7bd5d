use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemberState {
    Primary,
    Secondary,
    Other(String),
}

impl From<String> for MemberState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PRIMARY" => MemberState::Primary,
            "SECONDARY" => MemberState::Secondary,
            _ => MemberState::Other(value),
        }
    }
}

impl From<MemberState> for String {
    fn from(value: MemberState) -> Self {
        match value {
            MemberState::Primary => "PRIMARY".into(),
            MemberState::Secondary => "SECONDARY".into(),
            MemberState::Other(state) => state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "stateStr")]
    pub state: MemberState,
}

/// Decoded `replSetGetStatus` response. Only the fields the launcher reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetStatus {
    pub ok: f64,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl ReplicaSetStatus {
    pub fn is_ok(&self) -> bool {
        self.ok == 1.0
    }

    /// First SECONDARY in server order whose name is not `excluded`.
    pub fn first_eligible_secondary(&self, excluded: Option<&str>) -> Option<&Member> {
        self.members
            .iter()
            .filter(|m| m.state == MemberState::Secondary)
            .find(|m| excluded != Some(m.name.as_str()))
    }
}
