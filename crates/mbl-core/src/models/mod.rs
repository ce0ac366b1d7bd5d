pub mod address;
pub mod launch;
pub mod replica_set;
pub mod settings;

pub use address::{Placement, ReplicaAddress};
pub use launch::{LaunchPlan, LaunchedJob};
pub use replica_set::{Member, MemberState, ReplicaSetStatus};
pub use settings::LauncherSettings;
