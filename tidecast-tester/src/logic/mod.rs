pub mod assets;
pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod tester;

pub use assets::TuningDir;
pub use policy::PlayerStrategy;
pub use seeds::{resolve_seed_inputs, split_csv};
pub use simulation::{RunRecord, SimulationPlan};
pub use tester::*;
