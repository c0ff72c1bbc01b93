//! 포트폴리오 분석 및 백테스팅 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 공통 통계 함수 (평균, 표준편차, 선형 보간 백분위수, 시계열 정렬)
//! - 위험 지표 (VaR, CVaR, 베타, 추적오차, 정보비율, 왜도, 첨도)
//! - 낙폭 분석 (최대 낙폭, 낙폭 에피소드)
//! - 성과 분석 (CAGR, 변동성, 기간별 수익률, 벤치마크 비교)
//! - 고정 비중 리밸런싱 백테스트 엔진
//! - 몬테카를로 장기 자산 전망
//!
//! 모든 계산은 동기식이며 I/O가 없습니다. 입력이 부족한 지표는 에러 대신
//! 관례적인 기본값(0.0, 베타 1.0, 첨도 3.0)을 반환합니다.

pub mod backtest;
pub mod drawdown;
pub mod monte_carlo;
pub mod performance;
pub mod risk;
pub mod stats;

pub use backtest::{AnnualBreakdown, BacktestConfig, BacktestEngine, BacktestReport};
pub use drawdown::{DrawdownAnalyzer, DrawdownEpisode};
pub use monte_carlo::{
    AnnualEnsemble, FanChartPoint, FinalOutcomes, FinalStatistics, MonteCarloReport,
    MonteCarloSimulator, MonthlyEnsemble, SimulatedPaths, SimulationParams, SuccessProbabilities,
    DEFAULT_PERCENTILES,
};
pub use performance::{
    BenchmarkComparison, PerformanceAnalyzer, PerformanceReport, TrailingReturns,
};
pub use risk::{RiskMetrics, RiskReport};
