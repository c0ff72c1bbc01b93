//! 몬테카를로 시뮬레이터.
//!
//! 각 시뮬레이터 인스턴스가 자체 난수 생성기를 소유합니다. 같은 시드로
//! 생성한 두 인스턴스는 같은 결과를 내며, 서로 다른 인스턴스는 난수 상태를
//! 공유하지 않으므로 병렬로 실행해도 서로 영향을 주지 않습니다.
//!
//! # 수익률 모델
//!
//! 월간 수익률 `r ~ N(μ/12, σ/√12)`을 경로별로 독립 추출합니다.
//!
//! ```text
//! v[m+1] = max(0, v[m] × (1 + r[m]) + (m % 12 == 11 ? 납입 - 인출 : 0))
//! ```
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use patrimoine_analytics::monte_carlo::{MonteCarloSimulator, SimulationParams};
//!
//! let params = SimulationParams::new(100_000.0, 0.07, 0.15)
//!     .with_years(30)
//!     .with_contribution(5_000.0);
//!
//! let mut simulator = MonteCarloSimulator::new(Some(42));
//! let report = simulator.analyze_full(&params)?;
//! println!("자본 유지 확률: {}%", report.probabilities.capital_preserved_pct);
//! ```

use patrimoine_core::{AnalyticsError, AnalyticsResult, MonteCarloDefaults};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::monte_carlo::ensemble::{AnnualEnsemble, MonthlyEnsemble};
use crate::monte_carlo::params::SimulationParams;
use crate::monte_carlo::report::{
    FanChartPoint, FinalOutcomes, FinalValueAccumulator, MonteCarloReport, ParameterEcho,
    PercentileValues, SuccessProbabilities,
};
use crate::monte_carlo::DEFAULT_PERCENTILES;
use crate::stats::{self, round_to};

/// 스트리밍 집계의 기본 청크 크기
const DEFAULT_CHUNK_SIZE: usize = 1_000;

/// 경로 생성 결과.
#[derive(Debug, Clone)]
pub struct SimulatedPaths {
    /// 연말 시점 앙상블
    pub annual: AnnualEnsemble,
    /// 월말 시점 앙상블 (요청한 경우에만)
    pub monthly: Option<MonthlyEnsemble>,
}

/// 몬테카를로 시뮬레이터
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    rng: StdRng,
    seed: Option<u64>,
    chunk_size: usize,
}

impl MonteCarloSimulator {
    /// 새 시뮬레이터 생성.
    ///
    /// 시드가 있으면 결과가 재현 가능하고, 없으면 OS 엔트로피를 사용합니다.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            seed,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// 설정 파일의 시드와 청크 크기로 생성합니다.
    pub fn from_defaults(defaults: &MonteCarloDefaults) -> Self {
        Self::new(defaults.seed).with_chunk_size(defaults.chunk_size)
    }

    /// 스트리밍 집계 청크 크기 설정 (최소 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// 생성 시 사용한 시드.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// 자산 경로를 생성합니다.
    ///
    /// 연말 앙상블은 항상 반환하고, 월말 앙상블은 `keep_monthly`일 때만
    /// 보관합니다.
    pub fn simulate_paths(
        &mut self,
        params: &SimulationParams,
        keep_monthly: bool,
    ) -> AnalyticsResult<SimulatedPaths> {
        params.validate()?;
        let normal = monthly_distribution(params)?;

        let months = params.months();
        let mut annual = AnnualEnsemble::with_capacity(params.n_simulations, params.years as usize);
        let mut monthly =
            keep_monthly.then(|| MonthlyEnsemble::with_capacity(params.n_simulations, months));

        for _ in 0..params.n_simulations {
            self.simulate_path(params, &normal, |month, value| {
                if month % 12 == 0 {
                    annual.push_value(value);
                }
                if let Some(monthly) = monthly.as_mut() {
                    monthly.push_value(value);
                }
            });
        }

        debug!(
            simulations = annual.n_simulations(),
            years = annual.years(),
            monthly = keep_monthly,
            "경로 생성 완료"
        );

        Ok(SimulatedPaths { annual, monthly })
    }

    /// 연도별 단면 백분위수.
    ///
    /// 반환값은 수준 → 연도별 값(길이 = 년수 + 1)입니다.
    pub fn percentiles(ensemble: &AnnualEnsemble, levels: &[u32]) -> BTreeMap<u32, Vec<f64>> {
        let mut result: BTreeMap<u32, Vec<f64>> = levels
            .iter()
            .map(|level| (*level, Vec::with_capacity(ensemble.years() + 1)))
            .collect();

        if ensemble.is_empty() {
            return result;
        }

        for year in 0..=ensemble.years() {
            let mut column = ensemble.year_values(year);
            column.sort_by(|a, b| a.total_cmp(b));
            for (level, values) in result.iter_mut() {
                values.push(stats::percentile_sorted(&column, *level as f64));
            }
        }

        result
    }

    /// 마지막 해 기준 성공 확률.
    pub fn success_probabilities(
        ensemble: &AnnualEnsemble,
        goal: Option<f64>,
    ) -> SuccessProbabilities {
        SuccessProbabilities::from_final_values(
            ensemble.initial_value(),
            &ensemble.final_values(),
            goal,
        )
    }

    /// 팬 차트 데이터 (연도별 백분위수, 소수점 둘째 자리).
    pub fn fan_chart_series(ensemble: &AnnualEnsemble, levels: &[u32]) -> Vec<FanChartPoint> {
        let percentiles = Self::percentiles(ensemble, levels);
        if ensemble.is_empty() {
            return Vec::new();
        }

        (0..=ensemble.years())
            .map(|year| FanChartPoint {
                year,
                percentiles: PercentileValues::new(
                    levels
                        .iter()
                        .map(|level| {
                            let value = percentiles
                                .get(level)
                                .and_then(|values| values.get(year))
                                .copied()
                                .unwrap_or(0.0);
                            (*level, round_to(value, 2))
                        })
                        .collect(),
                ),
            })
            .collect()
    }

    /// 종합 분석을 수행합니다.
    pub fn analyze_full(&mut self, params: &SimulationParams) -> AnalyticsResult<MonteCarloReport> {
        info!(
            initial = params.initial_value,
            mean = params.mean_annual_return,
            volatility = params.annual_volatility,
            years = params.years,
            simulations = params.n_simulations,
            "몬테카를로 분석 시작"
        );

        let SimulatedPaths { annual, .. } = self.simulate_paths(params, false)?;

        let percentiles = Self::percentiles(&annual, &DEFAULT_PERCENTILES);
        let final_percentiles = PercentileValues::new(
            DEFAULT_PERCENTILES
                .iter()
                .map(|level| {
                    let value = percentiles
                        .get(level)
                        .and_then(|values| values.last())
                        .copied()
                        .unwrap_or(0.0);
                    (*level, round_to(value, 2))
                })
                .collect(),
        );

        let mut acc = FinalValueAccumulator::new(
            annual.initial_value(),
            params.goal,
            annual.n_simulations(),
        );
        annual.final_values().into_iter().for_each(|v| acc.push(v));
        let (probabilities, final_statistics) = acc.finish();
        let fan_chart = Self::fan_chart_series(&annual, &DEFAULT_PERCENTILES);

        info!(
            capital_preserved = probabilities.capital_preserved_pct,
            median_final = probabilities.median_final_value,
            "몬테카를로 분석 완료"
        );

        Ok(MonteCarloReport {
            parameters: ParameterEcho::from(params),
            percentiles: final_percentiles,
            probabilities,
            final_statistics,
            fan_chart,
            completed_simulations: annual.n_simulations(),
        })
    }

    /// 최종 자산 분포만 스트리밍으로 집계합니다.
    ///
    /// 경로 전체를 보관하지 않고 각 경로의 최종 자산만 누적기에 넣습니다.
    /// 청크 크기는 진행 로그 간격만 정하며 결과에는 영향이 없습니다. 같은
    /// 시드라면 [`analyze_full`](Self::analyze_full)과 같은 확률과 통계를
    /// 반환합니다.
    pub fn final_outcomes(&mut self, params: &SimulationParams) -> AnalyticsResult<FinalOutcomes> {
        params.validate()?;
        let normal = monthly_distribution(params)?;

        let mut acc =
            FinalValueAccumulator::new(params.initial_value, params.goal, params.n_simulations);

        while acc.len() < params.n_simulations {
            let size = (params.n_simulations - acc.len()).min(self.chunk_size);

            for _ in 0..size {
                let mut last = params.initial_value;
                self.simulate_path(params, &normal, |_, value| last = value);
                acc.push(last);
            }

            debug!(done = acc.len(), total = params.n_simulations, "청크 완료");
        }

        let completed_simulations = acc.len();
        let (probabilities, statistics) = acc.finish();

        Ok(FinalOutcomes {
            probabilities,
            statistics,
            completed_simulations,
        })
    }

    /// 경로 하나를 생성하며 매월 (월 인덱스, 자산)을 `record`에 전달합니다.
    ///
    /// 인덱스 0은 초기 자산입니다.
    fn simulate_path(
        &mut self,
        params: &SimulationParams,
        normal: &Normal<f64>,
        mut record: impl FnMut(usize, f64),
    ) {
        let cashflow = params.net_cashflow();
        let mut value = params.initial_value;
        record(0, value);

        for month in 0..params.months() {
            let r = normal.sample(&mut self.rng);
            value *= 1.0 + r;
            if month % 12 == 11 {
                value += cashflow;
            }
            value = value.max(0.0);
            record(month + 1, value);
        }
    }
}

fn monthly_distribution(params: &SimulationParams) -> AnalyticsResult<Normal<f64>> {
    Normal::new(params.monthly_drift(), params.monthly_volatility())
        .map_err(|e| AnalyticsError::InvalidParameter(format!("수익률 분포 생성 실패: {}", e)))
}
