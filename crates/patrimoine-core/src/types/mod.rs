//! 분석 시스템 전반에서 사용되는 공통 타입.

mod allocation;
mod ratio;
mod rebalance;
mod series;

pub use allocation::*;
pub use ratio::*;
pub use rebalance::*;
pub use series::*;
