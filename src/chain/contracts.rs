// Typed bindings for the LFG contracts and the external tokens they touch.
// Only the functions the scripts and tests call are listed.

pub mod ownable {
    ethers::contract::abigen!(
        Ownable,
        r#"[
            function owner() view returns (address)
            function transferOwnership(address newOwner)
        ]"#
    );
}
pub use ownable::Ownable;

pub mod timelock_roles {
    ethers::contract::abigen!(
        TimelockRoles,
        r#"[
            function PROPOSER_ROLE() view returns (bytes32)
            function EXECUTOR_ROLE() view returns (bytes32)
            function TIMELOCK_ADMIN_ROLE() view returns (bytes32)
            function hasRole(bytes32 role, address account) view returns (bool)
            function grantRole(bytes32 role, address account)
            function revokeRole(bytes32 role, address account)
            function getMinDelay() view returns (uint256)
        ]"#
    );
}
pub use timelock_roles::TimelockRoles;

pub mod loan_governor {
    ethers::contract::abigen!(
        LoanGovernor,
        r#"[
            function propose(address[] targets, uint256[] values, bytes[] calldatas, string description) returns (uint256)
            function castVoteWithReason(uint256 proposalId, uint8 support, string reason) returns (uint256)
            function queue(address[] targets, uint256[] values, bytes[] calldatas, bytes32 descriptionHash) returns (uint256)
            function execute(address[] targets, uint256[] values, bytes[] calldatas, bytes32 descriptionHash) payable returns (uint256)
            function hashProposal(address[] targets, uint256[] values, bytes[] calldatas, bytes32 descriptionHash) pure returns (uint256)
            function state(uint256 proposalId) view returns (uint8)
            function hasVoted(uint256 proposalId, address account) view returns (bool)
            function proposalVotes(uint256 proposalId) view returns (uint256 againstVotes, uint256 forVotes, uint256 abstainVotes)
            function proposalSnapshot(uint256 proposalId) view returns (uint256)
            function proposalEta(uint256 proposalId) view returns (uint256)
            function quorum(uint256 blockNumber) view returns (uint256)
            function votingDelay() view returns (uint256)
            function votingPeriod() view returns (uint256)
        ]"#
    );
}
pub use loan_governor::LoanGovernor;

pub mod erc20 {
    ethers::contract::abigen!(
        Erc20,
        r#"[
            function balanceOf(address owner) view returns (uint256)
            function transfer(address to, uint256 amount) returns (bool)
            function approve(address spender, uint256 amount) returns (bool)
            function deposit() payable
            function name() view returns (string)
            function decimals() view returns (uint8)
        ]"#
    );
}
pub use erc20::Erc20;

pub mod gov_token {
    ethers::contract::abigen!(
        GovToken,
        r#"[
            function balanceOf(address owner) view returns (uint256)
            function approve(address spender, uint256 amount) returns (bool)
            function delegate(address delegatee)
            function mint(address to, uint256 amount)
            function burnFrom(address account, uint256 amount)
            function getVotes(address account) view returns (uint256)
        ]"#
    );
}
pub use gov_token::GovToken;

pub mod gov_token_handler {
    ethers::contract::abigen!(
        GovTokenHandler,
        r#"[
            function mint(address to, address token, uint256 amount)
        ]"#
    );
}
pub use gov_token_handler::GovTokenHandler;

pub mod lend_pool {
    ethers::contract::abigen!(
        LendPool,
        r#"[
            function deposit(address token, uint256 amount)
            function userBalance(address user, address token) view returns (uint256)
            function getLiquidity() view returns (uint256 totalCollateral, uint256 totalDebt, uint256 availableToBorrow, uint256 loanToValue)
        ]"#
    );
}
pub use lend_pool::LendPool;

pub mod swap_router {
    ethers::contract::abigen!(
        SwapRouter,
        r#"[
            function swap(address tokenIn, address tokenOut, uint256 amountIn) returns (uint256)
        ]"#
    );
}
pub use swap_router::SwapRouter;

pub mod loan_manager {
    ethers::contract::abigen!(
        LoanManager,
        r#"[
            function owner() view returns (address)
            function issueLoan(address borrower, address token, uint256 amount)
        ]"#
    );
}
pub use loan_manager::LoanManager;
