//! 포트폴리오 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 60/40 포트폴리오 백테스트 (분기 리밸런싱)
//! patrimoine backtest -p CW8=data/cw8.csv -p AGG=data/agg.csv -w CW8=60 -w AGG=40
//!
//! # 30년 은퇴 자산 전망
//! patrimoine monte-carlo -i 100000 -m 0.07 -v 0.15 --contribution 5000 --seed 42
//!
//! # 단일 시계열 분석
//! patrimoine analyze --prices data/cw8.csv --benchmark data/msci_world.csv
//! ```
//!
//! 설정은 `config/default.toml`과 `PATRIMOINE__*` 환경 변수에서 읽습니다.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use patrimoine_cli::commands::analyze::{run_analyze, AnalyzeCliConfig};
use patrimoine_cli::commands::backtest::{run_backtest, BacktestCliConfig};
use patrimoine_cli::commands::monte_carlo::{run_monte_carlo, MonteCarloCliConfig};
use patrimoine_cli::commands::write_json;
use patrimoine_core::{init_logging, AppConfig};

#[derive(Parser)]
#[command(name = "patrimoine")]
#[command(about = "Patrimoine CLI - 포트폴리오 백테스트 및 몬테카를로 자산 전망", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 고정 비중 포트폴리오 백테스트
    Backtest {
        /// 종목별 가격 CSV (TICKER=path.csv, 여러 번 지정 가능)
        #[arg(short, long = "price", required = true)]
        prices: Vec<String>,

        /// 종목별 목표 비중 % (TICKER=PCT, 여러 번 지정 가능)
        #[arg(short, long = "weight", required = true)]
        weights: Vec<String>,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 종료 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 리밸런싱 주기 (mensuel, trimestriel, annuel, jamais)
        #[arg(long)]
        frequency: Option<String>,

        /// 리밸런싱 1회당 거래 비용 (0.001 = 0.1%)
        #[arg(long)]
        fee: Option<f64>,

        /// 가격 데이터가 없는 종목을 에러로 처리
        #[arg(long)]
        strict: bool,

        /// 결과 저장 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 몬테카를로 장기 자산 전망
    MonteCarlo {
        /// 초기 자산
        #[arg(short, long)]
        initial: f64,

        /// 연간 기대 수익률 (0.07 = 7%)
        #[arg(short, long, allow_hyphen_values = true)]
        mean: f64,

        /// 연간 변동성 (0.15 = 15%)
        #[arg(short, long)]
        volatility: f64,

        /// 투자 기간 (년)
        #[arg(short, long)]
        years: Option<u32>,

        /// 시뮬레이션 경로 수
        #[arg(short = 'n', long)]
        simulations: Option<usize>,

        /// 연간 납입액
        #[arg(long, default_value = "0")]
        contribution: f64,

        /// 연간 인출액
        #[arg(long, default_value = "0")]
        withdrawal: f64,

        /// 목표 자산 (기본: 초기 자산)
        #[arg(short, long)]
        goal: Option<f64>,

        /// 난수 시드 (재현 가능한 결과)
        #[arg(short, long)]
        seed: Option<u64>,

        /// 최종 자산 분포만 스트리밍 집계 (메모리 절약)
        #[arg(long)]
        streaming: bool,

        /// 결과 저장 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 단일 시계열 성과/위험/낙폭 분석
    Analyze {
        /// 가격 CSV
        #[arg(short, long)]
        prices: PathBuf,

        /// 벤치마크 가격 CSV
        #[arg(short, long)]
        benchmark: Option<PathBuf>,

        /// 결과 저장 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // .env 파일은 없어도 됨
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let app = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("설정 로드 실패: {}", path.display()))?,
        None => AppConfig::load_default().context("기본 설정 로드 실패")?,
    };

    init_logging(&app.logging)?;

    if let Err(e) = run(cli.command, &app) {
        error!("{:#}", e);
        return Err(e);
    }

    Ok(())
}

fn run(command: Commands, app: &AppConfig) -> Result<()> {
    match command {
        Commands::Backtest {
            prices,
            weights,
            from,
            to,
            frequency,
            fee,
            strict,
            output,
        } => {
            let config = BacktestCliConfig {
                prices,
                weights,
                from,
                to,
                frequency,
                fee,
                strict,
                output,
            };

            let report = run_backtest(&config, app)?;
            info!("\n{}", report.summary());
            write_json(&report, config.output.as_deref())?;
        }

        Commands::MonteCarlo {
            initial,
            mean,
            volatility,
            years,
            simulations,
            contribution,
            withdrawal,
            goal,
            seed,
            streaming,
            output,
        } => {
            let config = MonteCarloCliConfig {
                initial,
                mean,
                volatility,
                years,
                simulations,
                contribution,
                withdrawal,
                goal,
                seed,
                streaming,
                output,
            };

            let result = run_monte_carlo(&config, app)?;
            write_json(&result, config.output.as_deref())?;
        }

        Commands::Analyze {
            prices,
            benchmark,
            output,
        } => {
            let config = AnalyzeCliConfig {
                prices,
                benchmark,
                output,
            };

            let report = run_analyze(&config, app)?;
            write_json(&report, config.output.as_deref())?;
        }
    }

    Ok(())
}
