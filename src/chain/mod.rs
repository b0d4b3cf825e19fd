mod traits;

pub use traits::StakingChain;

#[cfg(test)]
pub use traits::MockStakingChain;
