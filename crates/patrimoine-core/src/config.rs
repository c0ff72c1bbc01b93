//! 설정 관리.
//!
//! 분석 엔진의 기본 매개변수(연간 거래일 수, 무위험 이자율, 리밸런싱 주기,
//! 몬테카를로 시뮬레이션 횟수 등)를 정의하고 파일/환경 변수에서 로드합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::logging::LogFormat;
use crate::types::RebalanceFrequency;

/// 기본 설정 파일 경로
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 연간 거래일 수 (연율화 계산에 사용)
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// 백테스트 샤프/소르티노 비율의 기본 무위험 이자율 (연 2%)
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// 기본 거래 비용 (리밸런싱 1회당 0.1%)
pub const DEFAULT_TRANSACTION_FEE: f64 = 0.001;

/// 유의미한 낙폭으로 간주하는 기본 임계값 (%)
pub const DEFAULT_DRAWDOWN_THRESHOLD_PCT: f64 = -5.0;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 공통 통계 설정
    pub analytics: AnalyticsConfig,
    /// 백테스트 기본값
    pub backtest: BacktestDefaults,
    /// 몬테카를로 기본값
    pub monte_carlo: MonteCarloDefaults,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 공통 통계 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 연율화에 사용하는 연간 기간 수
    pub periods_per_year: u32,
    /// 연간 무위험 이자율 (예: 0.02 = 2%)
    pub risk_free_rate: f64,
    /// 낙폭 에피소드 임계값 (%)
    pub drawdown_threshold_pct: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            drawdown_threshold_pct: DEFAULT_DRAWDOWN_THRESHOLD_PCT,
        }
    }
}

/// 백테스트 기본값.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BacktestDefaults {
    /// 리밸런싱 주기
    pub rebalance_frequency: RebalanceFrequency,
    /// 리밸런싱 1회당 거래 비용 (비율)
    pub transaction_fee: f64,
    /// 가격 데이터에 없는 종목을 에러로 처리할지 여부
    pub strict_allocation: bool,
}

impl Default for BacktestDefaults {
    fn default() -> Self {
        Self {
            rebalance_frequency: RebalanceFrequency::Trimestriel,
            transaction_fee: DEFAULT_TRANSACTION_FEE,
            strict_allocation: false,
        }
    }
}

/// 몬테카를로 기본값.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonteCarloDefaults {
    /// 투자 기간 (년)
    pub years: u32,
    /// 시뮬레이션 경로 수
    pub n_simulations: usize,
    /// 난수 시드 (None이면 OS 엔트로피)
    pub seed: Option<u64>,
    /// 스트리밍 집계 시 한 번에 생성하는 경로 수
    pub chunk_size: usize,
}

impl Default for MonteCarloDefaults {
    fn default() -> Self {
        Self {
            years: 30,
            n_simulations: 10_000,
            seed: None,
            chunk_size: 1_000,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨 또는 EnvFilter 지시문
    pub level: String,
    /// 로그 형식
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    /// 환경 변수는 `PATRIMOINE__BACKTEST__TRANSACTION_FEE=0.002` 형식입니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("PATRIMOINE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }
}
