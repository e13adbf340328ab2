pub mod artifacts;
pub mod deployer;
pub mod pipeline;
pub mod records;
pub mod steps;

pub use deployer::{DeployContext, Deployed};
pub use steps::{protocol_steps, run_tags};
