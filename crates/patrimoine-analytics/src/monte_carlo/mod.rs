//! 몬테카를로 장기 자산 전망 모듈
//!
//! 정규분포 월간 수익률로 다수의 자산 경로를 생성하고, 연말 시점의
//! 분포를 백분위수, 성공 확률, 팬 차트 데이터로 요약합니다.
//!
//! - [`params`]: 시뮬레이션 매개변수와 검증
//! - [`ensemble`]: 시뮬레이션 × 시점 경로 행렬
//! - [`simulator`]: 경로 생성과 집계
//! - [`report`]: 결과 타입

pub mod ensemble;
pub mod params;
pub mod report;
pub mod simulator;

pub use ensemble::{AnnualEnsemble, MonthlyEnsemble};
pub use params::SimulationParams;
pub use report::{
    FanChartPoint, FinalOutcomes, FinalStatistics, FinalValueAccumulator, MonteCarloReport,
    ParameterEcho, PercentileValues, SuccessProbabilities,
};
pub use simulator::{MonteCarloSimulator, SimulatedPaths};

/// 기본 백분위수 수준
pub const DEFAULT_PERCENTILES: [u32; 5] = [10, 25, 50, 75, 90];
