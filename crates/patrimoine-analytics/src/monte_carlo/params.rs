//! 시뮬레이션 매개변수.

use patrimoine_core::{AnalyticsError, AnalyticsResult, MonteCarloDefaults};
use serde::{Deserialize, Serialize};

/// 몬테카를로 시뮬레이션 매개변수.
///
/// 수익률과 변동성은 연간 비율(0.07 = 7%)입니다. 납입/인출은 매년 12월
/// 말에 모든 경로에 동일하게 적용됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    /// 초기 자산
    pub initial_value: f64,
    /// 연간 기대 수익률
    pub mean_annual_return: f64,
    /// 연간 변동성
    pub annual_volatility: f64,
    /// 투자 기간 (년)
    #[serde(default = "default_years")]
    pub years: u32,
    /// 시뮬레이션 경로 수
    #[serde(default = "default_simulations")]
    pub n_simulations: usize,
    /// 연간 납입액
    #[serde(default)]
    pub annual_contribution: f64,
    /// 연간 인출액
    #[serde(default)]
    pub annual_withdrawal: f64,
    /// 목표 자산 (None이면 초기 자산)
    #[serde(default)]
    pub goal: Option<f64>,
}

fn default_years() -> u32 {
    30
}
fn default_simulations() -> usize {
    10_000
}

impl SimulationParams {
    /// 필수 매개변수로 생성합니다. 기간 30년, 경로 10,000개가 기본입니다.
    pub fn new(initial_value: f64, mean_annual_return: f64, annual_volatility: f64) -> Self {
        Self {
            initial_value,
            mean_annual_return,
            annual_volatility,
            years: default_years(),
            n_simulations: default_simulations(),
            annual_contribution: 0.0,
            annual_withdrawal: 0.0,
            goal: None,
        }
    }

    /// 설정 파일의 기본 기간과 경로 수를 적용합니다.
    pub fn with_defaults(mut self, defaults: &MonteCarloDefaults) -> Self {
        self.years = defaults.years;
        self.n_simulations = defaults.n_simulations;
        self
    }

    /// 투자 기간 설정
    pub fn with_years(mut self, years: u32) -> Self {
        self.years = years;
        self
    }

    /// 경로 수 설정
    pub fn with_simulations(mut self, n: usize) -> Self {
        self.n_simulations = n;
        self
    }

    /// 연간 납입액 설정
    pub fn with_contribution(mut self, amount: f64) -> Self {
        self.annual_contribution = amount;
        self
    }

    /// 연간 인출액 설정
    pub fn with_withdrawal(mut self, amount: f64) -> Self {
        self.annual_withdrawal = amount;
        self
    }

    /// 목표 자산 설정
    pub fn with_goal(mut self, goal: f64) -> Self {
        self.goal = Some(goal);
        self
    }

    /// 총 개월 수.
    pub fn months(&self) -> usize {
        self.years as usize * 12
    }

    /// 월간 기대 수익률 (연간 / 12).
    pub fn monthly_drift(&self) -> f64 {
        self.mean_annual_return / 12.0
    }

    /// 월간 변동성 (연간 / √12).
    pub fn monthly_volatility(&self) -> f64 {
        self.annual_volatility / 12f64.sqrt()
    }

    /// 연말 순현금흐름 (납입 - 인출).
    pub fn net_cashflow(&self) -> f64 {
        self.annual_contribution - self.annual_withdrawal
    }

    /// 매개변수 검증
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !self.initial_value.is_finite() || self.initial_value <= 0.0 {
            return Err(invalid(format!(
                "초기 자산은 0보다 커야 합니다: {}",
                self.initial_value
            )));
        }
        if !self.mean_annual_return.is_finite() {
            return Err(invalid("기대 수익률은 유한한 값이어야 합니다".to_string()));
        }
        if !self.annual_volatility.is_finite() || self.annual_volatility < 0.0 {
            return Err(invalid(format!(
                "변동성은 0 이상이어야 합니다: {}",
                self.annual_volatility
            )));
        }
        if self.years == 0 {
            return Err(invalid("투자 기간은 1년 이상이어야 합니다".to_string()));
        }
        if self.n_simulations == 0 {
            return Err(invalid("시뮬레이션 수는 1 이상이어야 합니다".to_string()));
        }
        for (name, amount) in [
            ("납입액", self.annual_contribution),
            ("인출액", self.annual_withdrawal),
        ] {
            if !amount.is_finite() || amount < 0.0 {
                return Err(invalid(format!("연간 {}은 0 이상이어야 합니다: {}", name, amount)));
            }
        }
        if let Some(goal) = self.goal {
            if !goal.is_finite() || goal < 0.0 {
                return Err(invalid(format!("목표 자산은 0 이상이어야 합니다: {}", goal)));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> AnalyticsError {
    AnalyticsError::InvalidParameter(message)
}
