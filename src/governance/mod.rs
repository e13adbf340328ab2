pub mod proposal;

pub use proposal::{Proposal, ProposalDriver, ProposalState, ProposalVotes, VoteType};
