pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod store;

pub use policy::GameplayStrategy;
pub use reports::RunReport;
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use simulation::{SimulationConfig, play_game, play_puzzle};
pub use store::JsonFileStore;
