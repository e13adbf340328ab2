pub mod contracts;
pub mod dev_chain;
pub mod explorer;
pub mod networks;
pub mod providers;
