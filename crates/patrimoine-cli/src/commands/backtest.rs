//! 백테스트 명령어.
//!
//! CSV 가격 파일과 목표 비중으로 고정 비중 포트폴리오를 백테스트합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 주식 60 / 채권 40, 분기 리밸런싱
//! patrimoine backtest -p CW8=data/cw8.csv -p AGG=data/agg.csv -w CW8=60 -w AGG=40
//!
//! # 특정 기간, 월간 리밸런싱, 결과 저장
//! patrimoine backtest -p CW8=data/cw8.csv -w CW8=100 \
//!     -f 2015-01-01 -t 2020-12-31 --frequency mensuel -o results/cw8.json
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

use patrimoine_analytics::backtest::{BacktestConfig, BacktestEngine, BacktestReport};
use patrimoine_core::{AllocationWeights, AppConfig, RebalanceFrequency};

use super::parse_date;
use super::prices::{load_price_files, parse_assignment};

/// 백테스트 CLI 설정
#[derive(Debug, Clone, Default)]
pub struct BacktestCliConfig {
    /// `TICKER=path.csv` 목록
    pub prices: Vec<String>,
    /// `TICKER=PCT` 목록
    pub weights: Vec<String>,
    /// 시작일 (옵션)
    pub from: Option<String>,
    /// 종료일 (옵션)
    pub to: Option<String>,
    /// 리밸런싱 주기 (없으면 설정 파일 값)
    pub frequency: Option<String>,
    /// 거래 비용 (없으면 설정 파일 값)
    pub fee: Option<f64>,
    /// 가격이 없는 종목을 에러로 처리
    pub strict: bool,
    /// 결과 저장 경로 (옵션)
    pub output: Option<PathBuf>,
}

/// `TICKER=PCT` 목록에서 배분 비중을 만듭니다.
pub fn parse_weights(specs: &[String]) -> Result<AllocationWeights> {
    let weights = specs
        .iter()
        .map(|spec| {
            let (ticker, pct) = parse_assignment(spec)?;
            let pct: f64 = pct
                .parse()
                .map_err(|e| anyhow!("잘못된 비중 '{}': {}", spec, e))?;
            Ok((ticker, pct))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AllocationWeights::new(weights)?)
}

/// 설정 파일 기본값 위에 CLI 인자를 적용한 엔진 설정을 만듭니다.
pub fn build_config(cli: &BacktestCliConfig, app: &AppConfig) -> Result<BacktestConfig> {
    let start: Option<NaiveDate> = cli.from.as_deref().map(parse_date).transpose()?;
    let end: Option<NaiveDate> = cli.to.as_deref().map(parse_date).transpose()?;

    let mut config = BacktestConfig::from_app_config(app).with_period(start, end);

    if let Some(frequency) = &cli.frequency {
        let frequency: RebalanceFrequency = frequency.parse()?;
        config = config.with_rebalance_frequency(frequency);
    }
    if let Some(fee) = cli.fee {
        config = config.with_transaction_fee(fee);
    }
    if cli.strict {
        config = config.with_strict_allocation(true);
    }

    Ok(config)
}

/// 백테스트 실행
pub fn run_backtest(cli: &BacktestCliConfig, app: &AppConfig) -> Result<BacktestReport> {
    let allocation = parse_weights(&cli.weights)?;
    let config = build_config(cli, app)?;
    let prices = load_price_files(&cli.prices)?;

    info!(
        instruments = prices.len(),
        cash_pct = allocation.cash_pct(),
        "가격 데이터 로드 완료"
    );

    BacktestEngine::new(config)
        .run(&allocation, &prices)
        .context("백테스트 실행 실패")
}
