//! 낙폭 분석기.
//!
//! 가치 경로의 누적 최고점 대비 하락률을 계산합니다.
//! 낙폭(%) = (가치 - 누적 최고점) / 누적 최고점 × 100 이므로 항상 0 이하입니다.

use chrono::NaiveDate;
use patrimoine_core::{SeriesPoint, TimeSeries, DEFAULT_DRAWDOWN_THRESHOLD_PCT};
use serde::{Deserialize, Serialize};

use crate::stats::round_to;

/// 하나의 낙폭 에피소드 (고점 → 최저점 → 회복).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    /// 최저점의 낙폭 (%, 음수)
    #[serde(rename = "drawdown_pct")]
    pub depth_pct: f64,

    /// 고점 날짜
    #[serde(rename = "date_pic")]
    pub peak_date: NaiveDate,

    /// 고점 가치
    #[serde(rename = "valeur_pic")]
    pub peak_value: f64,

    /// 최저점 날짜
    #[serde(rename = "date_creux")]
    pub trough_date: NaiveDate,

    /// 최저점 가치
    #[serde(rename = "valeur_creux")]
    pub trough_value: f64,

    /// 고점에서 최저점까지 기간 (일)
    #[serde(rename = "duree_chute_jours")]
    pub decline_days: i64,

    /// 고점 가치를 회복한 날짜, 미회복시 None
    #[serde(rename = "date_recuperation")]
    pub recovery_date: Option<NaiveDate>,

    /// 고점에서 회복까지 기간 (일), 미회복시 None
    #[serde(rename = "duree_recuperation_jours")]
    pub recovery_days: Option<i64>,
}

impl DrawdownEpisode {
    fn from_points(
        peak: &SeriesPoint,
        trough: &SeriesPoint,
        depth_pct: f64,
        recovery: Option<&SeriesPoint>,
    ) -> Self {
        Self {
            depth_pct: round_to(depth_pct, 2),
            peak_date: peak.date,
            peak_value: round_to(peak.value, 2),
            trough_date: trough.date,
            trough_value: round_to(trough.value, 2),
            decline_days: (trough.date - peak.date).num_days(),
            recovery_date: recovery.map(|p| p.date),
            recovery_days: recovery.map(|p| (p.date - peak.date).num_days()),
        }
    }

    /// 고점 가치를 회복했는지 여부.
    pub fn is_recovered(&self) -> bool {
        self.recovery_date.is_some()
    }
}

/// 낙폭 분석기. 상태가 없으므로 모든 기능은 연관 함수입니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawdownAnalyzer;

impl DrawdownAnalyzer {
    /// 최대 낙폭과 그 에피소드를 계산합니다.
    ///
    /// 최저점은 낙폭이 가장 큰 첫 시점이고, 고점은 최저점 이전에 누적
    /// 최고점에 도달한 가장 최근 시점입니다. 회복은 최저점 이후 처음으로
    /// 고점 가치 이상이 된 시점입니다.
    ///
    /// 포인트가 2개 미만이거나 한 번도 하락하지 않았으면 `(0.0, None)`.
    pub fn max_drawdown(values: &TimeSeries) -> (f64, Option<DrawdownEpisode>) {
        let points = values.points();
        if points.len() < 2 {
            return (0.0, None);
        }

        let mut running_max = points[0].value;
        let mut peak_idx = 0;
        let mut worst = 0.0;
        let mut worst_peak_idx = 0;
        let mut trough_idx = 0;

        for (i, point) in points.iter().enumerate() {
            if point.value >= running_max {
                running_max = point.value;
                peak_idx = i;
            }

            let dd = drawdown_pct(point.value, running_max);
            if dd < worst {
                worst = dd;
                trough_idx = i;
                worst_peak_idx = peak_idx;
            }
        }

        if worst == 0.0 {
            return (0.0, None);
        }

        let peak = &points[worst_peak_idx];
        let recovery = points[trough_idx + 1..]
            .iter()
            .find(|p| p.value >= peak.value);

        let episode = DrawdownEpisode::from_points(peak, &points[trough_idx], worst, recovery);
        (worst, Some(episode))
    }

    /// 각 시점의 낙폭(%) 시계열.
    pub fn drawdown_series(values: &TimeSeries) -> TimeSeries {
        let mut running_max = f64::NEG_INFINITY;
        values.map_values(|v| {
            running_max = running_max.max(v);
            drawdown_pct(v, running_max)
        })
    }

    /// 임계값보다 깊은 모든 낙폭 에피소드를 찾습니다.
    ///
    /// 최고점 아래에 머무는 연속 구간 하나가 에피소드 하나입니다. 최저점
    /// 낙폭이 `threshold_pct`보다 작은 구간만 남기고 깊은 순으로 정렬합니다.
    /// 끝까지 회복하지 못한 구간은 마지막 시점에서 닫히며 회복 정보가
    /// 없습니다.
    pub fn all_drawdowns(values: &TimeSeries, threshold_pct: f64) -> Vec<DrawdownEpisode> {
        let points = values.points();
        let mut episodes = Vec::new();
        if points.len() < 2 {
            return episodes;
        }

        let mut running_max = points[0].value;
        let mut peak_idx = 0;
        // (최저점 인덱스, 최저점 낙폭)
        let mut current: Option<(usize, f64)> = None;

        for (i, point) in points.iter().enumerate() {
            if point.value >= running_max {
                if let Some((trough_idx, depth)) = current.take() {
                    if depth < threshold_pct {
                        episodes.push(DrawdownEpisode::from_points(
                            &points[peak_idx],
                            &points[trough_idx],
                            depth,
                            Some(point),
                        ));
                    }
                }
                running_max = point.value;
                peak_idx = i;
                continue;
            }

            let dd = drawdown_pct(point.value, running_max);
            match current {
                Some((_, depth)) if dd >= depth => {}
                _ => current = Some((i, dd)),
            }
        }

        // 진행 중인 낙폭
        if let Some((trough_idx, depth)) = current {
            if depth < threshold_pct {
                episodes.push(DrawdownEpisode::from_points(
                    &points[peak_idx],
                    &points[trough_idx],
                    depth,
                    None,
                ));
            }
        }

        episodes.sort_by(|a, b| a.depth_pct.total_cmp(&b.depth_pct));
        episodes
    }

    /// 기본 임계값(-5%)으로 [`all_drawdowns`](Self::all_drawdowns)를 호출합니다.
    pub fn significant_drawdowns(values: &TimeSeries) -> Vec<DrawdownEpisode> {
        Self::all_drawdowns(values, DEFAULT_DRAWDOWN_THRESHOLD_PCT)
    }
}

fn drawdown_pct(value: f64, running_max: f64) -> f64 {
    if running_max <= 0.0 {
        return 0.0;
    }
    (value - running_max) / running_max * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n)
    }

    fn path(values: &[f64]) -> TimeSeries {
        TimeSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (day(i as i64), *v))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_max_drawdown_with_recovery() {
        // 상승 → 하락 → 회복 패턴
        let values = path(&[100.0, 110.0, 99.0, 88.0, 95.0, 112.0]);
        let (mdd, episode) = DrawdownAnalyzer::max_drawdown(&values);
        let episode = episode.unwrap();

        // (88 - 110) / 110 = -20%
        assert!((mdd + 20.0).abs() < 1e-9);
        assert_eq!(episode.depth_pct, -20.0);
        assert_eq!(episode.peak_date, day(1));
        assert_eq!(episode.peak_value, 110.0);
        assert_eq!(episode.trough_date, day(3));
        assert_eq!(episode.trough_value, 88.0);
        assert_eq!(episode.decline_days, 2);
        assert_eq!(episode.recovery_date, Some(day(5)));
        assert_eq!(episode.recovery_days, Some(4));
    }

    #[test]
    fn test_max_drawdown_not_recovered() {
        let values = path(&[100.0, 90.0, 80.0, 85.0]);
        let (mdd, episode) = DrawdownAnalyzer::max_drawdown(&values);
        let episode = episode.unwrap();

        assert!((mdd + 20.0).abs() < 1e-9);
        assert!(!episode.is_recovered());
        assert_eq!(episode.recovery_days, None);
    }

    #[test]
    fn test_max_drawdown_degenerate() {
        assert_eq!(DrawdownAnalyzer::max_drawdown(&path(&[100.0])), (0.0, None));
        assert_eq!(
            DrawdownAnalyzer::max_drawdown(&path(&[100.0, 101.0, 101.0, 105.0])),
            (0.0, None)
        );
    }

    #[test]
    fn test_peak_is_most_recent_running_max() {
        // 고점 110이 두 번 나타남 → 최저점 직전의 것을 사용
        let values = path(&[110.0, 105.0, 110.0, 99.0]);
        let (_, episode) = DrawdownAnalyzer::max_drawdown(&values);
        assert_eq!(episode.unwrap().peak_date, day(2));
    }

    #[test]
    fn test_drawdown_series() {
        let series = DrawdownAnalyzer::drawdown_series(&path(&[100.0, 120.0, 90.0, 130.0]));
        let values = series.values();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[1], 0.0);
        assert!((values[2] + 25.0).abs() < 1e-9);
        assert_eq!(values[3], 0.0);
        assert_eq!(series.dates(), (0..4).map(day).collect::<Vec<_>>());
    }

    #[test]
    fn test_all_drawdowns_filters_and_sorts() {
        let values = path(&[
            100.0, 97.0, 101.0, // -3%: 임계값 미달
            90.0, 102.0, // -10.9%
            80.0, 85.0, // -21.6%, 미회복
        ]);

        let episodes = DrawdownAnalyzer::all_drawdowns(&values, -5.0);
        assert_eq!(episodes.len(), 2);

        // 가장 깊은 것이 먼저
        assert_eq!(episodes[0].peak_date, day(4));
        assert_eq!(episodes[0].trough_date, day(5));
        assert!(episodes[0].recovery_date.is_none());

        assert_eq!(episodes[1].peak_date, day(2));
        assert_eq!(episodes[1].trough_date, day(3));
        assert_eq!(episodes[1].recovery_date, Some(day(4)));
        assert!(episodes[0].depth_pct < episodes[1].depth_pct);
    }

    #[test]
    fn test_all_drawdowns_threshold_excludes_shallow() {
        let values = path(&[100.0, 97.0, 101.0, 98.0]);
        assert!(DrawdownAnalyzer::significant_drawdowns(&values).is_empty());
        assert_eq!(DrawdownAnalyzer::all_drawdowns(&values, -1.0).len(), 2);
    }

    #[test]
    fn test_episode_json_keys() {
        let (_, episode) = DrawdownAnalyzer::max_drawdown(&path(&[100.0, 80.0]));
        let json = serde_json::to_value(episode.unwrap()).unwrap();

        assert_eq!(json["drawdown_pct"], -20.0);
        assert_eq!(json["date_pic"], "2024-01-01");
        assert_eq!(json["date_creux"], "2024-01-02");
        assert!(json["date_recuperation"].is_null());
    }
}
