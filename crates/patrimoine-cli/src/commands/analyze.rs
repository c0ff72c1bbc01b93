//! 단일 시계열 분석 명령어.
//!
//! 가격(또는 자산 가치) 시계열 하나의 성과, 위험, 낙폭을 한 번에 계산합니다.
//!
//! ```bash
//! patrimoine analyze --prices data/cw8.csv --benchmark data/msci_world.csv
//! ```

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use patrimoine_analytics::stats::round_to;
use patrimoine_analytics::{
    DrawdownAnalyzer, DrawdownEpisode, PerformanceAnalyzer, PerformanceReport, RiskMetrics,
    RiskReport,
};
use patrimoine_core::{AppConfig, TimeSeries};

use super::prices::load_price_csv;

/// 분석 CLI 설정
#[derive(Debug, Clone, Default)]
pub struct AnalyzeCliConfig {
    /// 분석할 가격 CSV
    pub prices: PathBuf,
    /// 벤치마크 가격 CSV (옵션)
    pub benchmark: Option<PathBuf>,
    /// 결과 저장 경로 (옵션)
    pub output: Option<PathBuf>,
}

/// 낙폭 요약
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownSummary {
    pub max_drawdown: f64,
    #[serde(rename = "drawdown_details")]
    pub max_drawdown_episode: Option<DrawdownEpisode>,
    pub drawdowns: Vec<DrawdownEpisode>,
}

/// 성과 + 위험 + 낙폭 종합 리포트
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesAnalysis {
    pub performance: PerformanceReport,
    #[serde(rename = "risque")]
    pub risk: RiskReport,
    pub drawdown: DrawdownSummary,
}

/// 이미 로드된 시계열을 분석합니다.
pub fn analyze_series(
    values: &TimeSeries,
    benchmark: Option<&TimeSeries>,
    app: &AppConfig,
) -> SeriesAnalysis {
    let settings = &app.analytics;

    let performance = PerformanceAnalyzer::new(settings.periods_per_year)
        .with_risk_free_rate(settings.risk_free_rate)
        .full_report(values, benchmark);

    let benchmark_returns = benchmark.map(TimeSeries::pct_change);
    let risk = RiskMetrics::new(settings.periods_per_year)
        .full_analysis(&values.pct_change(), benchmark_returns.as_ref());

    let (max_drawdown, max_drawdown_episode) = DrawdownAnalyzer::max_drawdown(values);
    let drawdown = DrawdownSummary {
        max_drawdown: round_to(max_drawdown, 2),
        max_drawdown_episode,
        drawdowns: DrawdownAnalyzer::all_drawdowns(values, settings.drawdown_threshold_pct),
    };

    SeriesAnalysis {
        performance,
        risk,
        drawdown,
    }
}

/// CSV 파일을 로드해 분석합니다.
pub fn run_analyze(cli: &AnalyzeCliConfig, app: &AppConfig) -> Result<SeriesAnalysis> {
    let values = load_price_csv(&cli.prices)?;
    let benchmark = cli.benchmark.as_ref().map(load_price_csv).transpose()?;

    info!(
        points = values.len(),
        benchmark = benchmark.is_some(),
        "시계열 분석 시작"
    );

    Ok(analyze_series(&values, benchmark.as_ref(), app))
}
