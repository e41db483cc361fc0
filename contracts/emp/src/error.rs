use soroban_sdk::contracterror;

/// Failure signals returned by the EMP contract. Numbering follows the
/// Strategy contract: 1x authorization, 2x configuration, 3x validation, 4x
/// state, 5x arithmetic.
///
/// A failing Strategy leg aborts the EMP invocation with the Strategy's own
/// error.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum EmpError {
    NotManager = 10,

    NotInitialized = 20,
    AlreadyInitialized = 21,
    NoStrategies = 22,

    LengthMismatch = 30,
    EmptyInput = 31,
    DuplicateStrategy = 32,
    InvalidStrategy = 33,
    InvalidAllocation = 34,
    AllocationSum = 35,
    RatioMismatch = 36,
    NonDepositableAmount = 37,
    NegativeAmount = 38,
    ZeroAmount = 39,

    TransfersOpen = 40,
    DepositClosed = 41,
    WithdrawClosed = 42,
    PositionsOpen = 43,

    ZeroValue = 51,
    InsufficientShares = 52,
    MathOverflow = 53,
}
