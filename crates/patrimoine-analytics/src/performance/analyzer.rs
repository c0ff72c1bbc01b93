//! 성과 분석기.
//!
//! 가치 경로 하나(와 선택적 벤치마크)로부터 수익률 지표를 계산합니다.
//!
//! # 주요 지표
//!
//! - **총 수익률**: (최종 가치 - 초기 가치) / 초기 가치 × 100
//! - **CAGR**: ((최종 / 초기)^(1/년수) - 1) × 100
//! - **연율화 변동성**: 일별 수익률 표준편차 × √252 × 100
//! - **기간별 수익률**: 최근 1M, 3M, 6M, 1Y, 3Y, 5Y (거래일 기준)
//! - **벤치마크 비교**: 초과 성과, 변동성, 샤프 비율, 알파, 베타

use patrimoine_core::{TimeSeries, TRADING_DAYS_PER_YEAR};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::risk::RiskMetrics;
use crate::stats::{self, round_to};

/// 최근 기간 창 (이름, 거래일 수)
const TRAILING_WINDOWS: [(&str, usize); 6] = [
    ("1M", 21),
    ("3M", 63),
    ("6M", 126),
    ("1Y", 252),
    ("3Y", 756),
    ("5Y", 1260),
];

/// 최근 기간별 수익률 (%). 데이터가 부족한 기간은 None.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailingReturns {
    #[serde(rename = "1M")]
    pub one_month: Option<f64>,
    #[serde(rename = "3M")]
    pub three_months: Option<f64>,
    #[serde(rename = "6M")]
    pub six_months: Option<f64>,
    #[serde(rename = "1Y")]
    pub one_year: Option<f64>,
    #[serde(rename = "3Y")]
    pub three_years: Option<f64>,
    #[serde(rename = "5Y")]
    pub five_years: Option<f64>,
}

impl TrailingReturns {
    /// 기간 이름("1M" 등)으로 수익률을 조회합니다.
    pub fn get(&self, period: &str) -> Option<f64> {
        match period {
            "1M" => self.one_month,
            "3M" => self.three_months,
            "6M" => self.six_months,
            "1Y" => self.one_year,
            "3Y" => self.three_years,
            "5Y" => self.five_years,
            _ => None,
        }
    }

    fn set(&mut self, period: &str, value: Option<f64>) {
        let slot = match period {
            "1M" => &mut self.one_month,
            "3M" => &mut self.three_months,
            "6M" => &mut self.six_months,
            "1Y" => &mut self.one_year,
            "3Y" => &mut self.three_years,
            "5Y" => &mut self.five_years,
            _ => return,
        };
        *slot = value;
    }
}

/// 포트폴리오와 벤치마크 비교 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    /// 포트폴리오 총 수익률 (%)
    #[serde(rename = "performance_portefeuille")]
    pub portfolio_return: f64,
    /// 벤치마크 총 수익률 (%)
    #[serde(rename = "performance_benchmark")]
    pub benchmark_return: f64,
    /// 초과 성과 (%p)
    #[serde(rename = "surperformance")]
    pub outperformance: f64,
    /// 포트폴리오 연율화 변동성 (%)
    #[serde(rename = "volatilite_portefeuille")]
    pub portfolio_volatility: f64,
    /// 벤치마크 연율화 변동성 (%)
    #[serde(rename = "volatilite_benchmark")]
    pub benchmark_volatility: f64,
    /// 포트폴리오 샤프 비율
    #[serde(rename = "sharpe_portefeuille")]
    pub portfolio_sharpe: f64,
    /// 벤치마크 샤프 비율
    #[serde(rename = "sharpe_benchmark")]
    pub benchmark_sharpe: f64,
    /// 알파 (연율화, %)
    pub alpha: f64,
    /// 베타
    pub beta: f64,
}

/// 종합 성과 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    #[serde(rename = "valeur_initiale")]
    pub initial_value: f64,
    #[serde(rename = "valeur_finale")]
    pub final_value: f64,
    /// 총 수익률 (%)
    #[serde(rename = "rendement_total")]
    pub total_return: f64,
    /// 연평균 복합 성장률 (%)
    pub cagr: f64,
    /// 연율화 변동성 (%)
    #[serde(rename = "volatilite")]
    pub volatility: f64,
    #[serde(rename = "performances_periodes")]
    pub trailing: TrailingReturns,
    #[serde(
        rename = "comparaison_benchmark",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub benchmark: Option<BenchmarkComparison>,
}

/// 성과 분석기.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceAnalyzer {
    periods_per_year: u32,
    risk_free_rate: f64,
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(TRADING_DAYS_PER_YEAR)
    }
}

impl PerformanceAnalyzer {
    /// 연간 기간 수를 지정하여 생성합니다. 샤프 비율의 무위험 이자율은 0.
    pub fn new(periods_per_year: u32) -> Self {
        Self {
            periods_per_year,
            risk_free_rate: 0.0,
        }
    }

    /// 벤치마크 비교 샤프 비율에 사용할 무위험 이자율을 설정합니다.
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// 총 수익률 (%). 초기 가치가 0이면 0.0.
    pub fn total_return(initial: f64, final_value: f64) -> f64 {
        if initial == 0.0 {
            return 0.0;
        }
        (final_value - initial) / initial * 100.0
    }

    /// 연평균 복합 성장률 (%).
    ///
    /// 초기 가치가 0 이하이거나 기간이 0 이하이면 0.0.
    pub fn annualized_return(initial: f64, final_value: f64, years: f64) -> f64 {
        if initial <= 0.0 || years <= 0.0 {
            return 0.0;
        }
        ((final_value / initial).powf(1.0 / years) - 1.0) * 100.0
    }

    /// 연율화 변동성 (%). 관측치가 2개 미만이면 0.0.
    pub fn annualized_volatility(&self, returns: &[f64]) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }
        stats::sample_std(returns) * self.sqrt_periods() * 100.0
    }

    /// 최근 기간별 수익률을 계산합니다.
    ///
    /// 창 크기가 `n`이면 `len > n`일 때만 계산하며, 시작 가치는 끝에서
    /// `n`번째 값입니다.
    pub fn trailing_period_returns(values: &TimeSeries) -> TrailingReturns {
        let mut trailing = TrailingReturns::default();
        let points = values.points();

        let Some(last) = points.last() else {
            return trailing;
        };

        for (name, window) in TRAILING_WINDOWS {
            let value = (points.len() > window)
                .then(|| points[points.len() - window].value)
                .filter(|start| *start != 0.0)
                .map(|start| round_to((last.value - start) / start * 100.0, 2));
            trailing.set(name, value);
        }

        trailing
    }

    /// 벤치마크와 비교합니다.
    ///
    /// 두 가치 경로를 공통 날짜로 정렬한 뒤 비교하며, 공통 관측치가 2개
    /// 미만이면 None.
    pub fn benchmark_comparison(
        &self,
        values: &TimeSeries,
        benchmark: &TimeSeries,
    ) -> Option<BenchmarkComparison> {
        let aligned = stats::align(values, benchmark);
        if aligned.len() < 2 {
            debug!(common = aligned.len(), "벤치마크와 공통 관측치 부족");
            return None;
        }

        let ptf = TimeSeries::from_parts(&aligned.dates, aligned.left).ok()?;
        let bm = TimeSeries::from_parts(&aligned.dates, aligned.right).ok()?;

        let ptf_returns = ptf.pct_change();
        let bm_returns = bm.pct_change();
        let ptf_values = ptf_returns.values();
        let bm_values = bm_returns.values();

        let ptf_total = Self::total_return(ptf.first()?.value, ptf.last()?.value);
        let bm_total = Self::total_return(bm.first()?.value, bm.last()?.value);

        let beta = RiskMetrics::beta(&ptf_returns, &bm_returns);

        let n = self.periods_per_year as f64;
        let ptf_annual = stats::mean(&ptf_values) * n * 100.0;
        let bm_annual = stats::mean(&bm_values) * n * 100.0;

        Some(BenchmarkComparison {
            portfolio_return: round_to(ptf_total, 2),
            benchmark_return: round_to(bm_total, 2),
            outperformance: round_to(ptf_total - bm_total, 2),
            portfolio_volatility: round_to(self.annualized_volatility(&ptf_values), 2),
            benchmark_volatility: round_to(self.annualized_volatility(&bm_values), 2),
            portfolio_sharpe: round_to(self.sharpe(&ptf_values), 2),
            benchmark_sharpe: round_to(self.sharpe(&bm_values), 2),
            alpha: round_to(ptf_annual - beta * bm_annual, 2),
            beta: round_to(beta, 2),
        })
    }

    /// 종합 성과 리포트를 생성합니다.
    ///
    /// 기간(년)은 `포인트 수 / 연간 기간 수`입니다. 비어있지 않은 벤치마크가
    /// 주어지면 비교 결과를 포함합니다.
    pub fn full_report(
        &self,
        values: &TimeSeries,
        benchmark: Option<&TimeSeries>,
    ) -> PerformanceReport {
        let initial = values.first().map_or(0.0, |p| p.value);
        let final_value = values.last().map_or(0.0, |p| p.value);
        let years = values.len() as f64 / self.periods_per_year as f64;
        let returns = values.pct_change().values();

        PerformanceReport {
            initial_value: round_to(initial, 2),
            final_value: round_to(final_value, 2),
            total_return: round_to(Self::total_return(initial, final_value), 2),
            cagr: round_to(Self::annualized_return(initial, final_value, years), 2),
            volatility: round_to(self.annualized_volatility(&returns), 2),
            trailing: Self::trailing_period_returns(values),
            benchmark: benchmark
                .filter(|b| !b.is_empty())
                .and_then(|b| self.benchmark_comparison(values, b)),
        }
    }

    fn sharpe(&self, returns: &[f64]) -> f64 {
        let std = stats::sample_std(returns);
        if std <= 0.0 {
            return 0.0;
        }
        let n = self.periods_per_year as f64;
        (stats::mean(returns) * n - self.risk_free_rate) / (std * self.sqrt_periods())
    }

    fn sqrt_periods(&self) -> f64 {
        (self.periods_per_year as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn path(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        TimeSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::days(i as i64), *v))
                .collect(),
        )
        .unwrap()
    }

    fn growth_path(n: usize, daily: f64) -> Vec<f64> {
        (0..n).map(|i| 100.0 * (1.0 + daily).powi(i as i32)).collect()
    }

    #[test]
    fn test_total_return() {
        assert_eq!(PerformanceAnalyzer::total_return(100.0, 150.0), 50.0);
        assert_eq!(PerformanceAnalyzer::total_return(0.0, 150.0), 0.0);
    }

    #[test]
    fn test_cagr() {
        let cagr = PerformanceAnalyzer::annualized_return(100.0, 200.0, 10.0);
        assert_eq!(round_to(cagr, 2), 7.18);

        assert_eq!(PerformanceAnalyzer::annualized_return(0.0, 200.0, 10.0), 0.0);
        assert_eq!(PerformanceAnalyzer::annualized_return(100.0, 200.0, 0.0), 0.0);
    }

    #[test]
    fn test_volatility_needs_two_points() {
        let analyzer = PerformanceAnalyzer::default();
        assert_eq!(analyzer.annualized_volatility(&[0.01]), 0.0);
        assert_eq!(analyzer.annualized_volatility(&[0.01, 0.01, 0.01]), 0.0);
        assert!(analyzer.annualized_volatility(&[0.01, -0.01, 0.02]) > 0.0);
    }

    #[test]
    fn test_trailing_windows() {
        // 100개 포인트: 1M, 3M만 계산 가능
        let values: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let trailing = PerformanceAnalyzer::trailing_period_returns(&path(&values));

        // 시작 = values[100 - 21] = 179, 끝 = 199
        assert_eq!(trailing.one_month, Some(round_to(20.0 / 179.0 * 100.0, 2)));
        assert!(trailing.three_months.is_some());
        assert_eq!(trailing.six_months, None);
        assert_eq!(trailing.get("5Y"), None);

        // 정확히 창 크기만큼 있으면 계산하지 않음
        let exact = PerformanceAnalyzer::trailing_period_returns(&path(&values[..21]));
        assert_eq!(exact.one_month, None);
    }

    #[test]
    fn test_trailing_json_keys() {
        let trailing = PerformanceAnalyzer::trailing_period_returns(&path(&[100.0, 101.0]));
        let json = serde_json::to_value(&trailing).unwrap();
        assert!(json["1M"].is_null());
        assert!(json.get("5Y").is_some());
    }

    #[test]
    fn test_benchmark_comparison_against_itself() {
        let analyzer = PerformanceAnalyzer::default();
        let values: Vec<f64> = growth_path(300, 0.0005)
            .iter()
            .enumerate()
            .map(|(i, v)| v * if i % 3 == 0 { 0.99 } else { 1.0 })
            .collect();
        let series = path(&values);

        let cmp = analyzer.benchmark_comparison(&series, &series).unwrap();
        assert_eq!(cmp.beta, 1.0);
        assert_eq!(cmp.alpha, 0.0);
        assert_eq!(cmp.outperformance, 0.0);
        assert_eq!(cmp.portfolio_sharpe, cmp.benchmark_sharpe);
    }

    #[test]
    fn test_benchmark_comparison_insufficient_overlap() {
        let analyzer = PerformanceAnalyzer::default();
        let a = path(&[100.0, 101.0, 102.0]);
        let b = TimeSeries::new(vec![(NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(), 50.0)]).unwrap();
        assert!(analyzer.benchmark_comparison(&a, &b).is_none());
    }

    #[test]
    fn test_full_report() {
        let analyzer = PerformanceAnalyzer::default();
        let series = path(&growth_path(253, 0.001));

        let report = analyzer.full_report(&series, None);
        assert_eq!(report.initial_value, 100.0);
        assert!(report.total_return > 0.0);
        assert!(report.cagr > 0.0);
        assert!(report.trailing.one_year.is_some());
        assert!(report.benchmark.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("comparaison_benchmark").is_none());
        assert!(json.get("rendement_total").is_some());

        let with_bm = analyzer.full_report(&series, Some(&series));
        assert!(with_bm.benchmark.is_some());
    }

    #[test]
    fn test_full_report_empty_series() {
        let report = PerformanceAnalyzer::default().full_report(&TimeSeries::default(), None);
        assert_eq!(report.final_value, 0.0);
        assert_eq!(report.cagr, 0.0);
        assert_eq!(report.trailing, TrailingReturns::default());
    }
}
