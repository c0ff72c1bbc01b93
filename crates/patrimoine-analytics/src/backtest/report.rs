//! 백테스트 결과 리포트.

use patrimoine_core::{Ratio, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::drawdown::DrawdownEpisode;

/// 연도별 성과 요약.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualBreakdown {
    /// 최고 연간 수익률 (%)
    #[serde(rename = "meilleure_annee")]
    pub best_year: f64,
    /// 최저 연간 수익률 (%)
    #[serde(rename = "pire_annee")]
    pub worst_year: f64,
    /// 수익률이 양수인 연도 비율 (%)
    #[serde(rename = "pct_annees_positives")]
    pub pct_positive_years: f64,
}

/// 백테스트 결과.
///
/// 모든 수치는 소수점 둘째 자리(`pct_annees_positives`, `nb_annees`는
/// 첫째 자리)로 반올림되어 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// 최종 가치 (초기 100 기준)
    #[serde(rename = "valeur_finale")]
    pub final_value: f64,

    /// 연평균 복합 성장률 (%)
    pub cagr: f64,

    /// 연율화 변동성 (%)
    #[serde(rename = "volatilite")]
    pub volatility: f64,

    /// 샤프 비율
    pub sharpe_ratio: f64,

    /// 소르티노 비율 (하락 기간이 없으면 정의되지 않음 → null)
    pub sortino_ratio: Ratio,

    /// 칼마 비율
    pub calmar_ratio: f64,

    /// 최대 낙폭 (%)
    pub max_drawdown: f64,

    /// 95% VaR (일별, %)
    pub var_95: f64,

    /// 95% CVaR (일별, %)
    pub cvar_95: f64,

    /// 연도별 성과
    #[serde(flatten)]
    pub annual: AnnualBreakdown,

    /// 백테스트 기간 (년)
    #[serde(rename = "nb_annees")]
    pub years: f64,

    /// 날짜별 포트폴리오 가치
    #[serde(rename = "serie_valeurs")]
    pub value_series: TimeSeries,

    /// 최대 낙폭 에피소드
    #[serde(rename = "drawdown_details")]
    pub max_drawdown_episode: Option<DrawdownEpisode>,

    /// 임계값보다 깊은 모든 낙폭 에피소드 (깊은 순)
    pub drawdowns: Vec<DrawdownEpisode>,
}

impl BacktestReport {
    /// 결과 요약 문자열을 생성합니다.
    pub fn summary(&self) -> String {
        let period = match (self.value_series.first(), self.value_series.last()) {
            (Some(first), Some(last)) => format!("{} → {}", first.date, last.date),
            _ => "-".to_string(),
        };

        format!(
            "백테스트 결과 요약\n\
             ═══════════════════════════════════════\n\
             기간: {} ({:.1} 년)\n\
             데이터 포인트: {}\n\
             ───────────────────────────────────────\n\
             최종 가치: {:.2} (초기 100)\n\
             CAGR: {:.2}%\n\
             변동성: {:.2}%\n\
             ───────────────────────────────────────\n\
             샤프 비율: {:.2}\n\
             소르티노 비율: {}\n\
             칼마 비율: {:.2}\n\
             최대 낙폭: {:.2}%\n\
             VaR 95%: {:.2}%\n\
             CVaR 95%: {:.2}%\n\
             ───────────────────────────────────────\n\
             최고 연도: {:.2}%\n\
             최저 연도: {:.2}%\n\
             양수 연도 비율: {:.1}%\n\
             ═══════════════════════════════════════",
            period,
            self.years,
            self.value_series.len(),
            self.final_value,
            self.cagr,
            self.volatility,
            self.sharpe_ratio,
            self.sortino_ratio,
            self.calmar_ratio,
            self.max_drawdown,
            self.var_95,
            self.cvar_95,
            self.annual.best_year,
            self.annual.worst_year,
            self.annual.pct_positive_years,
        )
    }
}
