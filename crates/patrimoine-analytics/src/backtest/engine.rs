//! 백테스팅 엔진
//!
//! 고정 목표 비중 포트폴리오를 과거 가격으로 시뮬레이션하고 성과를 분석합니다.
//!
//! # 알고리즘
//!
//! 1. 모든 종목 가격을 날짜 합집합으로 정렬하고 앞채움합니다.
//! 2. 종목별 일간 수익률을 계산하고 정의되지 않는 행을 버립니다.
//! 3. 가치 100에서 시작하여 `v[t] = v[t-1] × (1 + Σ 비중/100 × 수익률)`로
//!    가치 경로를 만듭니다.
//! 4. 리밸런싱 시점(21/63/252 거래일 배수)마다 거래 비용을 차감합니다.
//! 5. 가치 경로에서 CAGR, 변동성, 샤프/소르티노/칼마 비율, VaR/CVaR,
//!    낙폭, 연도별 성과를 계산합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use patrimoine_analytics::backtest::{BacktestConfig, BacktestEngine};
//! use patrimoine_core::{AllocationWeights, RebalanceFrequency};
//!
//! let config = BacktestConfig::default()
//!     .with_rebalance_frequency(RebalanceFrequency::Trimestriel)
//!     .with_transaction_fee(0.001);
//!
//! let engine = BacktestEngine::new(config);
//! let allocation = AllocationWeights::new([("ACWI", 60.0), ("AGG", 40.0)])?;
//! let report = engine.run(&allocation, &prices)?;
//!
//! println!("{}", report.summary());
//! ```

use patrimoine_core::{
    AllocationWeights, AnalyticsError, AnalyticsResult, Ratio, TimeSeries,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::backtest::config::BacktestConfig;
use crate::backtest::report::{AnnualBreakdown, BacktestReport};
use crate::backtest::table::ReturnTable;
use crate::drawdown::DrawdownAnalyzer;
use crate::performance::PerformanceAnalyzer;
use crate::risk::RiskMetrics;
use crate::stats::{self, round_to};

/// 초기 포트폴리오 가치
const INITIAL_VALUE: f64 = 100.0;

/// 백테스트 엔진
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// 새 백테스트 엔진 생성
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// 현재 설정
    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// 백테스트 실행
    ///
    /// # 인자
    ///
    /// * `allocation` - 종목별 목표 비중 (%)
    /// * `prices` - 종목별 가격 시계열
    ///
    /// # 에러
    ///
    /// 설정이 잘못되었거나, 엄격 모드에서 배분 종목의 가격이 없으면 에러를
    /// 반환합니다. 데이터가 부족한 경우에는 에러 대신 0인 지표를 반환합니다.
    pub fn run(
        &self,
        allocation: &AllocationWeights,
        prices: &HashMap<String, TimeSeries>,
    ) -> AnalyticsResult<BacktestReport> {
        self.config.validate()?;

        info!(
            instruments = allocation.len(),
            frequency = %self.config.rebalance_frequency,
            fee = self.config.transaction_fee,
            "백테스트 시작"
        );

        let missing = allocation.missing_from(|id| prices.contains_key(id));
        if !missing.is_empty() {
            if self.config.strict_allocation {
                return Err(AnalyticsError::AllocationResolution { missing });
            }
            warn!(
                missing = %missing.join(", "),
                "가격 데이터가 없는 종목의 비중을 무시합니다"
            );
        }

        let table = ReturnTable::build(prices, self.config.start_date, self.config.end_date);
        debug!(
            price_rows = table.price_rows(),
            return_rows = table.len(),
            instruments = table.instrument_count(),
            "수익률 테이블 생성"
        );

        let values = self.simulate(allocation, &table);
        let value_series = TimeSeries::from_parts(&table.dates()[..values.len()], values)?;

        let report = self.build_report(value_series, table.price_rows());

        info!(
            final_value = report.final_value,
            cagr = report.cagr,
            max_drawdown = report.max_drawdown,
            "백테스트 완료"
        );

        Ok(report)
    }

    /// 가치 경로를 시뮬레이션합니다.
    ///
    /// 수익률 테이블의 첫 행은 시작 시점(가치 100)이며, 이후 행마다
    /// 가중 수익률을 적용합니다. 테이블이 비어있으면 빈 경로를 반환합니다.
    fn simulate(&self, allocation: &AllocationWeights, table: &ReturnTable) -> Vec<f64> {
        if table.is_empty() {
            return Vec::new();
        }

        let columns: Vec<(f64, &[f64])> = allocation
            .iter()
            .filter_map(|(id, weight)| table.column(id).map(|col| (weight / 100.0, col)))
            .collect();

        let mut values = Vec::with_capacity(table.len());
        values.push(INITIAL_VALUE);

        for t in 1..table.len() {
            let daily_return: f64 = columns.iter().map(|(w, col)| w * col[t]).sum();
            let mut value = values[t - 1] * (1.0 + daily_return);

            if self.config.rebalance_frequency.triggers_at(t) {
                value *= 1.0 - self.config.transaction_fee;
            }

            values.push(value);
        }

        values
    }

    fn build_report(&self, value_series: TimeSeries, price_rows: usize) -> BacktestReport {
        let periods = self.config.periods_per_year as f64;
        // 기간은 가치 경로 길이가 아니라 구간 내 가격 행 수(경로 길이 + 1) 기준
        let years = price_rows as f64 / periods;
        let final_value = value_series.last().map_or(INITIAL_VALUE, |p| p.value);

        let returns = value_series.pct_change().values();

        let cagr = PerformanceAnalyzer::annualized_return(INITIAL_VALUE, final_value, years);
        let volatility = PerformanceAnalyzer::new(self.config.periods_per_year)
            .annualized_volatility(&returns);
        let sharpe = self.sharpe_ratio(&returns);
        let sortino = self.sortino_ratio(&returns);

        let (max_drawdown, max_drawdown_episode) = DrawdownAnalyzer::max_drawdown(&value_series);
        let drawdowns =
            DrawdownAnalyzer::all_drawdowns(&value_series, self.config.drawdown_threshold_pct);

        let calmar = Self::calmar_ratio(cagr, max_drawdown);
        let var_95 = RiskMetrics::value_at_risk(&returns, 0.95);
        let cvar_95 = RiskMetrics::conditional_var(&returns, 0.95);

        let annual_returns = value_series.year_end_values().pct_change().values();
        let annual = Self::annual_breakdown(&annual_returns);

        BacktestReport {
            final_value: round_to(final_value, 2),
            cagr: round_to(cagr, 2),
            volatility: round_to(volatility, 2),
            sharpe_ratio: round_to(sharpe, 2),
            sortino_ratio: sortino.map(|v| round_to(v, 2)),
            calmar_ratio: round_to(calmar, 2),
            max_drawdown: round_to(max_drawdown, 2),
            var_95: round_to(var_95, 2),
            cvar_95: round_to(cvar_95, 2),
            annual,
            years: round_to(years, 1),
            value_series,
            max_drawdown_episode,
            drawdowns,
        }
    }

    /// 샤프 비율 = (연율화 평균 수익률 - 무위험 이자율) / 연율화 변동성
    fn sharpe_ratio(&self, returns: &[f64]) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }

        let periods = self.config.periods_per_year as f64;
        let annual_mean = stats::mean(returns) * periods;
        let annual_vol = stats::sample_std(returns) * periods.sqrt();

        if annual_vol == 0.0 {
            return 0.0;
        }

        (annual_mean - self.config.risk_free_rate) / annual_vol
    }

    /// 소르티노 비율 = (연율화 평균 수익률 - 무위험 이자율) / 하방 편차
    ///
    /// 하락 기간이 전혀 없으면 `Ratio::Undefined`. 하락 기간이 하나뿐이면
    /// 하방 편차를 정의할 수 없으므로 0.0.
    fn sortino_ratio(&self, returns: &[f64]) -> Ratio {
        if returns.len() < 2 {
            return Ratio::Finite(0.0);
        }

        let periods = self.config.periods_per_year as f64;
        let annual_mean = stats::mean(returns) * periods;

        let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
        if negatives.is_empty() {
            return Ratio::Undefined;
        }

        let downside = stats::sample_std(&negatives) * periods.sqrt();
        if downside == 0.0 {
            return Ratio::Finite(0.0);
        }

        Ratio::Finite((annual_mean - self.config.risk_free_rate) / downside)
    }

    /// 칼마 비율 = |CAGR / 최대 낙폭|. 최대 낙폭이 0이면 0.0.
    pub fn calmar_ratio(cagr: f64, max_drawdown: f64) -> f64 {
        if max_drawdown == 0.0 {
            return 0.0;
        }
        (cagr / max_drawdown).abs()
    }

    /// 연간 수익률(비율) 목록에서 최고/최저 연도와 양수 연도 비율을 계산합니다.
    pub fn annual_breakdown(annual_returns: &[f64]) -> AnnualBreakdown {
        if annual_returns.is_empty() {
            return AnnualBreakdown::default();
        }

        let best = annual_returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = annual_returns.iter().copied().fold(f64::INFINITY, f64::min);
        let positive = annual_returns.iter().filter(|r| **r > 0.0).count();

        AnnualBreakdown {
            best_year: round_to(best * 100.0, 2),
            worst_year: round_to(worst * 100.0, 2),
            pct_positive_years: round_to(
                positive as f64 / annual_returns.len() as f64 * 100.0,
                1,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use patrimoine_core::RebalanceFrequency;

    fn series(start: NaiveDate, values: &[f64]) -> TimeSeries {
        TimeSeries::prices(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::days(i as i64), *v))
                .collect(),
        )
        .unwrap()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
    }

    #[test]
    fn test_calmar_ratio() {
        assert_eq!(BacktestEngine::calmar_ratio(10.0, -20.0), 0.5);
        assert_eq!(BacktestEngine::calmar_ratio(10.0, 0.0), 0.0);
        assert_eq!(BacktestEngine::calmar_ratio(-10.0, -20.0), 0.5);
    }

    #[test]
    fn test_annual_breakdown() {
        let breakdown = BacktestEngine::annual_breakdown(&[0.10, 0.15, -0.05, 0.08, 0.12]);
        assert_eq!(breakdown.best_year, 15.0);
        assert_eq!(breakdown.worst_year, -5.0);
        assert_eq!(breakdown.pct_positive_years, 80.0);

        assert_eq!(BacktestEngine::annual_breakdown(&[]), AnnualBreakdown::default());
    }

    #[test]
    fn test_constant_growth_path() {
        // 매일 1% 상승, 리밸런싱 없음
        let prices: Vec<f64> = (0..6).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let map = HashMap::from([("A".to_string(), series(start(), &prices))]);
        let allocation = AllocationWeights::new([("A", 100.0)]).unwrap();

        let engine = BacktestEngine::new(
            BacktestConfig::default().with_rebalance_frequency(RebalanceFrequency::Jamais),
        );
        let report = engine.run(&allocation, &map).unwrap();

        // 수익률 5행 → 첫 행은 시작점, 4번 복리
        assert_eq!(report.value_series.len(), 5);
        assert_eq!(report.value_series.first().unwrap().date, start() + Duration::days(1));
        assert_eq!(report.final_value, round_to(100.0 * 1.01f64.powi(4), 2));
        assert_eq!(report.max_drawdown, 0.0);
        assert!(report.max_drawdown_episode.is_none());
        assert!(report.sortino_ratio.is_undefined());
        assert_eq!(report.calmar_ratio, 0.0);
    }

    #[test]
    fn test_years_counted_from_price_rows() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let map = HashMap::from([("A".to_string(), series(start(), &prices))]);
        let allocation = AllocationWeights::new([("A", 100.0)]).unwrap();

        let engine = BacktestEngine::new(BacktestConfig {
            periods_per_year: 4,
            rebalance_frequency: RebalanceFrequency::Jamais,
            ..BacktestConfig::default()
        });
        let report = engine.run(&allocation, &map).unwrap();

        // 가격 10행 → 가치 경로 9점, 기간은 10 / 4
        assert_eq!(report.value_series.len(), 9);
        assert_eq!(report.years, 2.5);
        let expected_cagr = ((report.final_value / 100.0).powf(1.0 / 2.5) - 1.0) * 100.0;
        assert!((report.cagr - expected_cagr).abs() < 0.05);
    }

    #[test]
    fn test_partial_allocation_holds_cash() {
        let prices: Vec<f64> = (0..4).map(|i| 100.0 * 1.1f64.powi(i)).collect();
        let map = HashMap::from([("A".to_string(), series(start(), &prices))]);
        let allocation = AllocationWeights::new([("A", 50.0)]).unwrap();

        let engine = BacktestEngine::new(
            BacktestConfig::default().with_rebalance_frequency(RebalanceFrequency::Jamais),
        );
        let report = engine.run(&allocation, &map).unwrap();

        // 50%만 투자 → 기간당 5%
        let values = report.value_series.values();
        assert!((values[1] - 105.0).abs() < 1e-9);
        assert!((values[2] - 110.25).abs() < 1e-9);
    }

    #[test]
    fn test_rebalance_fee_applied_on_trigger() {
        let prices = vec![100.0; 30];
        let map = HashMap::from([("A".to_string(), series(start(), &prices))]);
        let allocation = AllocationWeights::new([("A", 100.0)]).unwrap();

        let engine = BacktestEngine::new(
            BacktestConfig::default()
                .with_rebalance_frequency(RebalanceFrequency::Mensuel)
                .with_transaction_fee(0.01),
        );
        let report = engine.run(&allocation, &map).unwrap();
        let values = report.value_series.values();

        // 가격 변화 없음: 21번째 기간에만 1% 비용
        assert_eq!(values[20], 100.0);
        assert!((values[21] - 99.0).abs() < 1e-9);
        assert!((values[28] - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_instrument_lenient_and_strict() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let map = HashMap::from([("A".to_string(), series(start(), &prices))]);
        let allocation = AllocationWeights::new([("A", 60.0), ("ZZZ", 40.0)]).unwrap();

        let lenient = BacktestEngine::default().run(&allocation, &map);
        assert!(lenient.is_ok());

        let strict = BacktestEngine::new(BacktestConfig::default().with_strict_allocation(true))
            .run(&allocation, &map);
        match strict {
            Err(AnalyticsError::AllocationResolution { missing }) => {
                assert_eq!(missing, vec!["ZZZ".to_string()]);
            }
            other => panic!("예상치 못한 결과: {:?}", other),
        }
    }

    #[test]
    fn test_empty_prices_yield_zero_metrics() {
        let allocation = AllocationWeights::new([("A", 100.0)]).unwrap();
        let report = BacktestEngine::default()
            .run(&allocation, &HashMap::new())
            .unwrap();

        assert!(report.value_series.is_empty());
        assert_eq!(report.final_value, 100.0);
        assert_eq!(report.cagr, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        assert_eq!(report.sortino_ratio, Ratio::Finite(0.0));
        assert_eq!(report.years, 0.0);
    }

    #[test]
    fn test_report_json_keys() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 100.0 + if i % 2 == 0 { 0.0 } else { -3.0 } + i as f64 * 0.1)
            .collect();
        let map = HashMap::from([("A".to_string(), series(start(), &prices))]);
        let allocation = AllocationWeights::new([("A", 100.0)]).unwrap();

        let report = BacktestEngine::default().run(&allocation, &map).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        for key in [
            "valeur_finale",
            "cagr",
            "volatilite",
            "sharpe_ratio",
            "sortino_ratio",
            "calmar_ratio",
            "max_drawdown",
            "var_95",
            "cvar_95",
            "meilleure_annee",
            "pire_annee",
            "pct_annees_positives",
            "nb_annees",
            "serie_valeurs",
            "drawdown_details",
            "drawdowns",
        ] {
            assert!(json.get(key).is_some(), "{} 키 누락", key);
        }
        assert!(json["serie_valeurs"].is_object());
        assert!(report.summary().contains("CAGR"));
    }
}
