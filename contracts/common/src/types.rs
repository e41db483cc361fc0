use soroban_sdk::{contracttype, Address};

/// One row of a utilization table.
///
/// `allocation` is the asset's target fraction of deposited value (18
/// decimals). Only rows with `deposit == true` count toward the 100% sum; a
/// withdraw-only row models a reward or residual asset and may carry any
/// fraction.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UtilizationEntry {
    pub asset: Address,
    pub deposit: bool,
    pub withdraw: bool,
    pub allocation: i128,
}

/// Input row for a utilization update, paired positionally with an asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UtilizationParams {
    pub deposit: bool,
    pub withdraw: bool,
    pub allocation: i128,
}

/// A Strategy held by an EMP and the fraction of EMP value routed to it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategyAllocation {
    pub strategy: Address,
    pub allocation: i128,
}

impl UtilizationEntry {
    pub fn new(asset: Address, params: &UtilizationParams) -> Self {
        UtilizationEntry {
            asset,
            deposit: params.deposit,
            withdraw: params.withdraw,
            allocation: params.allocation,
        }
    }
}
