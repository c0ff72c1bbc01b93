//! 몬테카를로 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! # 초기 자산 10만, 기대 수익률 7%, 변동성 15%, 매년 5천 납입
//! patrimoine monte-carlo -i 100000 -m 0.07 -v 0.15 --contribution 5000 --seed 42
//!
//! # 경로 100만 개, 최종 자산 분포만 스트리밍 집계
//! patrimoine monte-carlo -i 100000 -m 0.05 -v 0.12 -n 1000000 --streaming
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use patrimoine_analytics::monte_carlo::{
    FinalOutcomes, MonteCarloReport, MonteCarloSimulator, SimulationParams,
};
use patrimoine_core::{AppConfig, MonteCarloDefaults};

/// 몬테카를로 CLI 설정
#[derive(Debug, Clone, Default)]
pub struct MonteCarloCliConfig {
    /// 초기 자산
    pub initial: f64,
    /// 연간 기대 수익률 (0.07 = 7%)
    pub mean: f64,
    /// 연간 변동성 (0.15 = 15%)
    pub volatility: f64,
    /// 투자 기간 (없으면 설정 파일 값)
    pub years: Option<u32>,
    /// 경로 수 (없으면 설정 파일 값)
    pub simulations: Option<usize>,
    /// 연간 납입액
    pub contribution: f64,
    /// 연간 인출액
    pub withdrawal: f64,
    /// 목표 자산
    pub goal: Option<f64>,
    /// 난수 시드 (없으면 설정 파일 값)
    pub seed: Option<u64>,
    /// 최종 자산 분포만 집계
    pub streaming: bool,
    /// 결과 저장 경로 (옵션)
    pub output: Option<PathBuf>,
}

/// 실행 결과: 전체 리포트 또는 스트리밍 집계.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MonteCarloOutput {
    Full(MonteCarloReport),
    Streaming(FinalOutcomes),
}

/// 설정 파일 기본값 위에 CLI 인자를 적용한 매개변수를 만듭니다.
pub fn build_params(cli: &MonteCarloCliConfig, app: &AppConfig) -> SimulationParams {
    let mut params = SimulationParams::new(cli.initial, cli.mean, cli.volatility)
        .with_defaults(&app.monte_carlo)
        .with_contribution(cli.contribution)
        .with_withdrawal(cli.withdrawal);

    if let Some(years) = cli.years {
        params = params.with_years(years);
    }
    if let Some(n) = cli.simulations {
        params = params.with_simulations(n);
    }
    if let Some(goal) = cli.goal {
        params = params.with_goal(goal);
    }

    params
}

/// 몬테카를로 시뮬레이션 실행
pub fn run_monte_carlo(cli: &MonteCarloCliConfig, app: &AppConfig) -> Result<MonteCarloOutput> {
    let params = build_params(cli, app);
    let mut simulator = MonteCarloSimulator::from_defaults(&MonteCarloDefaults {
        seed: cli.seed.or(app.monte_carlo.seed),
        ..app.monte_carlo.clone()
    });

    info!(
        years = params.years,
        simulations = params.n_simulations,
        seed = ?simulator.seed(),
        streaming = cli.streaming,
        "몬테카를로 시뮬레이션 시작"
    );

    let output = if cli.streaming {
        MonteCarloOutput::Streaming(
            simulator
                .final_outcomes(&params)
                .context("몬테카를로 스트리밍 집계 실패")?,
        )
    } else {
        MonteCarloOutput::Full(
            simulator
                .analyze_full(&params)
                .context("몬테카를로 시뮬레이션 실패")?,
        )
    };

    Ok(output)
}
