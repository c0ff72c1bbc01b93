//! 위험 지표 계산 모듈
//!
//! 수익률 분포의 꼬리 위험과 벤치마크 대비 위험을 측정합니다:
//! - VaR (Value at Risk): 주어진 신뢰수준에서 한 기간 최대 손실
//! - CVaR (Expected Shortfall): VaR 이하 수익률의 평균
//! - 베타: 시장 대비 민감도
//! - 추적오차 / 정보비율: 벤치마크 대비 초과 수익의 변동성과 효율
//! - 왜도 / 첨도: 분포의 비대칭성과 꼬리 두께
//!
//! 수익률은 비율(0.01 = 1%)로 입력받고, VaR/CVaR/추적오차는 백분율로
//! 반환합니다. 관측치가 부족하면 에러 대신 관례적인 기본값을 반환합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use patrimoine_analytics::risk::RiskMetrics;
//!
//! let var_95 = RiskMetrics::value_at_risk(&daily_returns, 0.95);
//! let cvar_95 = RiskMetrics::conditional_var(&daily_returns, 0.95);
//! assert!(cvar_95 <= var_95);
//! ```

use patrimoine_core::{TimeSeries, TRADING_DAYS_PER_YEAR};
use serde::{Deserialize, Serialize};

use crate::stats::{self, round_to};

/// 위험 지표 계산기.
///
/// 연율화가 필요한 지표(추적오차, 정보비율)는 `periods_per_year`를
/// 사용합니다. 일별 데이터는 252가 기본입니다.
#[derive(Debug, Clone, Copy)]
pub struct RiskMetrics {
    periods_per_year: u32,
}

impl Default for RiskMetrics {
    fn default() -> Self {
        Self::new(TRADING_DAYS_PER_YEAR)
    }
}

impl RiskMetrics {
    /// 연간 기간 수를 지정하여 생성합니다.
    pub fn new(periods_per_year: u32) -> Self {
        Self { periods_per_year }
    }

    /// 연간 기간 수.
    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    /// VaR을 계산합니다 (백분율).
    ///
    /// 수익률 분포의 `(1 - confidence)` 백분위수입니다. 95% 신뢰수준이면
    /// 5번째 백분위수를 사용합니다. 관측치가 2개 미만이면 0.0.
    pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }
        stats::percentile(returns, (1.0 - confidence) * 100.0) * 100.0
    }

    /// CVaR (조건부 VaR)을 계산합니다 (백분율).
    ///
    /// VaR 임계값 이하인 모든 수익률의 평균입니다. 꼬리 집합이 비어있으면
    /// 0.0.
    pub fn conditional_var(returns: &[f64], confidence: f64) -> f64 {
        if returns.len() < 2 {
            return 0.0;
        }

        let threshold = stats::percentile(returns, (1.0 - confidence) * 100.0);
        let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= threshold).collect();

        if tail.is_empty() {
            return 0.0;
        }

        stats::mean(&tail) * 100.0
    }

    /// 베타를 계산합니다.
    ///
    /// 두 시계열을 날짜로 내부 조인한 뒤 `Cov(자산, 시장) / Var(시장)`를
    /// 구합니다. 관측치가 2개 미만이거나 시장 분산이 0이면 중립값 1.0을
    /// 반환합니다.
    pub fn beta(asset: &TimeSeries, market: &TimeSeries) -> f64 {
        if asset.len() < 2 || market.len() < 2 {
            return 1.0;
        }

        let aligned = stats::align(asset, market);
        Self::beta_aligned(&aligned.left, &aligned.right)
    }

    /// 이미 같은 기간으로 정렬된 수익률의 베타.
    pub fn beta_aligned(asset: &[f64], market: &[f64]) -> f64 {
        if asset.len() != market.len() || asset.len() < 2 {
            return 1.0;
        }

        let market_std = stats::sample_std(market);
        let market_variance = market_std * market_std;
        if market_variance == 0.0 {
            return 1.0;
        }

        stats::sample_covariance(asset, market) / market_variance
    }

    /// 추적오차를 계산합니다 (연율화, 백분율).
    ///
    /// `std(자산 - 벤치마크) × √N × 100`. 공통 관측치가 2개 미만이면 0.0.
    pub fn tracking_error(&self, asset: &TimeSeries, benchmark: &TimeSeries) -> f64 {
        let aligned = stats::align(asset, benchmark);
        if aligned.len() < 2 {
            return 0.0;
        }

        let diffs = excess(&aligned.left, &aligned.right);
        stats::sample_std(&diffs) * self.sqrt_periods() * 100.0
    }

    /// 정보비율을 계산합니다.
    ///
    /// `(연율화 자산 수익률 - 연율화 벤치마크 수익률) / 연율화 추적오차`.
    /// 공통 관측치가 2개 미만이거나 추적오차가 0이면 0.0.
    pub fn information_ratio(&self, asset: &TimeSeries, benchmark: &TimeSeries) -> f64 {
        let aligned = stats::align(asset, benchmark);
        if aligned.len() < 2 {
            return 0.0;
        }

        let n = self.periods_per_year as f64;
        let asset_annual = stats::mean(&aligned.left) * n;
        let benchmark_annual = stats::mean(&aligned.right) * n;

        let diffs = excess(&aligned.left, &aligned.right);
        let tracking_error = stats::sample_std(&diffs) * self.sqrt_periods();

        if tracking_error == 0.0 {
            return 0.0;
        }

        (asset_annual - benchmark_annual) / tracking_error
    }

    /// 왜도 (보정된 Fisher-Pearson 계수).
    ///
    /// - 양수: 오른쪽 꼬리가 김 (극단적 이익이 더 많음)
    /// - 음수: 왼쪽 꼬리가 김 (극단적 손실이 더 많음)
    ///
    /// 관측치가 3개 미만이거나 분산이 0이면 0.0.
    pub fn skewness(returns: &[f64]) -> f64 {
        let n = returns.len();
        if n < 3 {
            return 0.0;
        }

        let m = stats::mean(returns);
        let m2 = returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / n as f64;
        let m3 = returns.iter().map(|r| (r - m).powi(3)).sum::<f64>() / n as f64;

        if m2 == 0.0 {
            return 0.0;
        }

        let n = n as f64;
        let g1 = m3 / m2.powf(1.5);
        g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
    }

    /// 첨도 (Pearson 기준, 정규분포 = 3.0).
    ///
    /// 편향 보정된 초과 첨도에 3을 더한 값입니다.
    /// - 3 초과: 두꺼운 꼬리 (극단적 사건이 더 잦음)
    /// - 3 미만: 얇은 꼬리
    ///
    /// 관측치가 4개 미만이거나 분산이 0이면 3.0.
    pub fn kurtosis(returns: &[f64]) -> f64 {
        let n = returns.len();
        if n < 4 {
            return 3.0;
        }

        let m = stats::mean(returns);
        let sum2: f64 = returns.iter().map(|r| (r - m).powi(2)).sum();
        let sum4: f64 = returns.iter().map(|r| (r - m).powi(4)).sum();

        if sum2 == 0.0 {
            return 3.0;
        }

        let n = n as f64;
        let numerator = n * (n + 1.0) * (n - 1.0) * sum4;
        let denominator = (n - 2.0) * (n - 3.0) * sum2 * sum2;
        let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));

        numerator / denominator - adjustment + 3.0
    }

    /// 종합 위험 분석.
    ///
    /// 95%/99% VaR·CVaR, 왜도, 첨도를 계산하고, 비어있지 않은 벤치마크가
    /// 주어지면 베타, 추적오차, 정보비율을 추가합니다. 모든 값은 소수점
    /// 둘째 자리로 반올림됩니다.
    pub fn full_analysis(&self, returns: &TimeSeries, benchmark: Option<&TimeSeries>) -> RiskReport {
        let values = returns.values();

        let mut report = RiskReport {
            var_95: round_to(Self::value_at_risk(&values, 0.95), 2),
            cvar_95: round_to(Self::conditional_var(&values, 0.95), 2),
            var_99: round_to(Self::value_at_risk(&values, 0.99), 2),
            cvar_99: round_to(Self::conditional_var(&values, 0.99), 2),
            skewness: round_to(Self::skewness(&values), 2),
            kurtosis: round_to(Self::kurtosis(&values), 2),
            beta: None,
            tracking_error: None,
            information_ratio: None,
        };

        if let Some(benchmark) = benchmark.filter(|b| !b.is_empty()) {
            report.beta = Some(round_to(Self::beta(returns, benchmark), 2));
            report.tracking_error = Some(round_to(self.tracking_error(returns, benchmark), 2));
            report.information_ratio =
                Some(round_to(self.information_ratio(returns, benchmark), 2));
        }

        report
    }

    fn sqrt_periods(&self) -> f64 {
        (self.periods_per_year as f64).sqrt()
    }
}

fn excess(asset: &[f64], benchmark: &[f64]) -> Vec<f64> {
    asset.iter().zip(benchmark).map(|(a, b)| a - b).collect()
}

/// 종합 위험 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// 95% VaR (%)
    pub var_95: f64,
    /// 95% CVaR (%)
    pub cvar_95: f64,
    /// 99% VaR (%)
    pub var_99: f64,
    /// 99% CVaR (%)
    pub cvar_99: f64,
    /// 왜도
    pub skewness: f64,
    /// 첨도 (정규분포 = 3)
    pub kurtosis: f64,
    /// 벤치마크 대비 베타
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    /// 추적오차 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_error: Option<f64>,
    /// 정보비율
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_ratio: Option<f64>,
}
