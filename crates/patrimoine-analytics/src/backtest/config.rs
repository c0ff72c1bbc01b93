//! 백테스트 설정.

use chrono::NaiveDate;
use patrimoine_core::{
    AnalyticsError, AnalyticsResult, AppConfig, RebalanceFrequency, DEFAULT_DRAWDOWN_THRESHOLD_PCT,
    DEFAULT_RISK_FREE_RATE, DEFAULT_TRANSACTION_FEE, TRADING_DAYS_PER_YEAR,
};
use serde::{Deserialize, Serialize};

/// 백테스트 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// 시작일 (포함), None이면 데이터 처음부터
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    /// 종료일 (포함), None이면 데이터 끝까지
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// 리밸런싱 주기
    #[serde(default)]
    pub rebalance_frequency: RebalanceFrequency,

    /// 리밸런싱 1회당 거래 비용 (비율, 0.001 = 0.1%)
    #[serde(default = "default_transaction_fee")]
    pub transaction_fee: f64,

    /// 샤프/소르티노 비율의 연간 무위험 이자율
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// 연간 거래일 수
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,

    /// 가격 데이터가 없는 종목이 배분에 있으면 에러로 처리
    #[serde(default)]
    pub strict_allocation: bool,

    /// 낙폭 에피소드 임계값 (%)
    #[serde(default = "default_drawdown_threshold")]
    pub drawdown_threshold_pct: f64,
}

fn default_transaction_fee() -> f64 {
    DEFAULT_TRANSACTION_FEE
}
fn default_risk_free_rate() -> f64 {
    DEFAULT_RISK_FREE_RATE
}
fn default_periods_per_year() -> u32 {
    TRADING_DAYS_PER_YEAR
}
fn default_drawdown_threshold() -> f64 {
    DEFAULT_DRAWDOWN_THRESHOLD_PCT
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            rebalance_frequency: RebalanceFrequency::default(),
            transaction_fee: default_transaction_fee(),
            risk_free_rate: default_risk_free_rate(),
            periods_per_year: default_periods_per_year(),
            strict_allocation: false,
            drawdown_threshold_pct: default_drawdown_threshold(),
        }
    }
}

impl BacktestConfig {
    /// 애플리케이션 설정의 기본값으로 생성합니다.
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            rebalance_frequency: config.backtest.rebalance_frequency,
            transaction_fee: config.backtest.transaction_fee,
            strict_allocation: config.backtest.strict_allocation,
            risk_free_rate: config.analytics.risk_free_rate,
            periods_per_year: config.analytics.periods_per_year,
            drawdown_threshold_pct: config.analytics.drawdown_threshold_pct,
            ..Self::default()
        }
    }

    /// 기간 설정 (양 끝 포함)
    pub fn with_period(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// 리밸런싱 주기 설정
    pub fn with_rebalance_frequency(mut self, frequency: RebalanceFrequency) -> Self {
        self.rebalance_frequency = frequency;
        self
    }

    /// 거래 비용 설정
    pub fn with_transaction_fee(mut self, fee: f64) -> Self {
        self.transaction_fee = fee;
        self
    }

    /// 무위험 이자율 설정
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// 엄격한 배분 검증 설정
    pub fn with_strict_allocation(mut self, strict: bool) -> Self {
        self.strict_allocation = strict;
        self
    }

    /// 낙폭 에피소드 임계값 설정
    pub fn with_drawdown_threshold(mut self, threshold_pct: f64) -> Self {
        self.drawdown_threshold_pct = threshold_pct;
        self
    }

    /// 설정 검증
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(0.0..1.0).contains(&self.transaction_fee) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "거래 비용은 0 이상 1 미만이어야 합니다: {}",
                self.transaction_fee
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::InvalidParameter(
                "무위험 이자율은 유한한 값이어야 합니다".to_string(),
            ));
        }
        if self.periods_per_year == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "연간 기간 수는 0보다 커야 합니다".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "시작일({})이 종료일({})보다 늦습니다",
                    start, end
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BacktestConfig::default();
        assert_eq!(config.rebalance_frequency, RebalanceFrequency::Trimestriel);
        assert_eq!(config.transaction_fee, 0.001);
        assert_eq!(config.risk_free_rate, 0.02);
        assert!(!config.strict_allocation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(BacktestConfig::default()
            .with_transaction_fee(-0.01)
            .validate()
            .is_err());
        assert!(BacktestConfig::default()
            .with_transaction_fee(1.0)
            .validate()
            .is_err());

        let start = NaiveDate::from_ymd_opt(2024, 6, 1);
        let end = NaiveDate::from_ymd_opt(2024, 1, 1);
        let result = BacktestConfig::default().with_period(start, end).validate();
        assert!(matches!(result, Err(AnalyticsError::InvalidParameter(_))));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: BacktestConfig =
            serde_json::from_str(r#"{"rebalance_frequency": "mensuel", "start_date": "2020-01-01"}"#)
                .unwrap();
        assert_eq!(config.rebalance_frequency, RebalanceFrequency::Mensuel);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(config.transaction_fee, 0.001);

        let bad = serde_json::from_str::<BacktestConfig>(r#"{"rebalance_frequency": "hebdo"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_from_app_config() {
        let mut app = AppConfig::default();
        app.backtest.transaction_fee = 0.002;
        app.backtest.strict_allocation = true;
        app.analytics.risk_free_rate = 0.03;

        let config = BacktestConfig::from_app_config(&app);
        assert_eq!(config.transaction_fee, 0.002);
        assert!(config.strict_allocation);
        assert_eq!(config.risk_free_rate, 0.03);
        assert_eq!(config.start_date, None);
    }
}
