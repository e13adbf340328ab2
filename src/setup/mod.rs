pub mod chain_access;
pub mod plans;
pub mod sequencer;

pub use chain_access::EthersAccess;
pub use sequencer::{ChainAccess, SetupReport, SetupSequencer, SetupStep, StepStatus};
