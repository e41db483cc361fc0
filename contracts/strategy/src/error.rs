use soroban_sdk::contracterror;

/// Failure signals returned by the Strategy contract.
///
/// Codes are grouped by kind: 1x authorization, 2x configuration, 3x
/// validation, 4x state, 5x arithmetic. Any error reverts the whole
/// invocation.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum StrategyError {
    NotManager = 10,
    NotFactory = 11,
    NotPermitted = 12,

    NotInitialized = 20,
    AlreadyInitialized = 21,
    HandlerNotSet = 22,
    FeedNotSet = 23,
    TableNotCommitted = 24,

    LengthMismatch = 30,
    EmptyInput = 31,
    DuplicateAsset = 32,
    InvalidAsset = 33,
    InvalidAllocation = 34,
    AllocationSum = 35,
    RatioMismatch = 36,
    NonDepositableAmount = 37,
    NegativeAmount = 38,
    ZeroAmount = 39,

    TransfersOpen = 40,
    DepositClosed = 41,
    WithdrawClosed = 42,

    /// The value feed reported a zero unit value.
    PriceNotComputed = 50,
    /// The deposit vector is worth nothing.
    ZeroValue = 51,
    InsufficientShares = 52,
    MathOverflow = 53,
}
