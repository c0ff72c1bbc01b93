//! 몬테카를로 결과 타입.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::monte_carlo::params::SimulationParams;
use crate::stats::{self, round_to};

/// 최종 자산 기준 성공 확률.
///
/// 확률은 백분율(소수점 첫째 자리), 금액은 소수점 둘째 자리로 반올림됩니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessProbabilities {
    /// 초기 자산 이상으로 끝난 비율 (%)
    #[serde(rename = "prob_maintien_capital")]
    pub capital_preserved_pct: f64,
    /// 목표 자산 이상으로 끝난 비율 (%)
    #[serde(rename = "prob_atteindre_objectif")]
    pub goal_reached_pct: f64,
    /// 초기 자산의 10% 미만으로 끝난 비율 (%)
    #[serde(rename = "prob_ruine")]
    pub ruin_pct: f64,
    /// 최종 자산 중앙값
    #[serde(rename = "valeur_mediane_finale")]
    pub median_final_value: f64,
    /// 최종 자산 평균
    #[serde(rename = "valeur_moyenne_finale")]
    pub mean_final_value: f64,
}

impl SuccessProbabilities {
    /// 최종 자산 목록에서 계산합니다. 목표가 없으면 초기 자산을 사용합니다.
    pub fn from_final_values(initial: f64, finals: &[f64], goal: Option<f64>) -> Self {
        let mut acc = FinalValueAccumulator::new(initial, goal, finals.len());
        finals.iter().for_each(|v| acc.push(*v));
        acc.finish().0
    }
}

/// 경로별 최종 자산을 하나씩 받아 확률 카운터와 합계를 갱신합니다.
///
/// 중앙값과 표준편차를 위해 최종 자산(경로당 값 하나)만 보관하며, 경로
/// 전체는 보관하지 않습니다.
#[derive(Debug, Clone)]
pub struct FinalValueAccumulator {
    initial: f64,
    goal: f64,
    preserved: usize,
    goal_reached: usize,
    ruined: usize,
    sum: f64,
    min: f64,
    max: f64,
    finals: Vec<f64>,
}

impl FinalValueAccumulator {
    /// 목표가 없으면 초기 자산을 목표로 사용합니다.
    pub fn new(initial: f64, goal: Option<f64>, capacity: usize) -> Self {
        Self {
            initial,
            goal: goal.unwrap_or(initial),
            preserved: 0,
            goal_reached: 0,
            ruined: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            finals: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: f64) {
        if value >= self.initial {
            self.preserved += 1;
        }
        if value >= self.goal {
            self.goal_reached += 1;
        }
        if value < self.initial * 0.1 {
            self.ruined += 1;
        }
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.finals.push(value);
    }

    /// 누적된 경로 수.
    pub fn len(&self) -> usize {
        self.finals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finals.is_empty()
    }

    /// 확률과 분포 통계를 확정합니다.
    pub fn finish(self) -> (SuccessProbabilities, FinalStatistics) {
        if self.finals.is_empty() {
            return (SuccessProbabilities::default(), FinalStatistics::default());
        }

        let n = self.finals.len() as f64;
        let share = |count: usize| round_to(count as f64 / n * 100.0, 1);
        let median = round_to(stats::median(&self.finals), 2);
        let mean = round_to(self.sum / n, 2);

        let probabilities = SuccessProbabilities {
            capital_preserved_pct: share(self.preserved),
            goal_reached_pct: share(self.goal_reached),
            ruin_pct: share(self.ruined),
            median_final_value: median,
            mean_final_value: mean,
        };
        let statistics = FinalStatistics {
            min: round_to(self.min, 2),
            max: round_to(self.max, 2),
            median,
            mean,
            std_dev: round_to(stats::population_std(&self.finals), 2),
        };

        (probabilities, statistics)
    }
}

/// 최종 자산 분포 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalStatistics {
    #[serde(rename = "valeur_min")]
    pub min: f64,
    #[serde(rename = "valeur_max")]
    pub max: f64,
    #[serde(rename = "valeur_mediane")]
    pub median: f64,
    #[serde(rename = "valeur_moyenne")]
    pub mean: f64,
    /// 모집단 표준편차
    #[serde(rename = "ecart_type")]
    pub std_dev: f64,
}

impl FinalStatistics {
    /// 최종 자산 목록에서 계산합니다.
    pub fn from_final_values(finals: &[f64]) -> Self {
        let mut acc = FinalValueAccumulator::new(0.0, None, finals.len());
        finals.iter().for_each(|v| acc.push(*v));
        acc.finish().1
    }
}

/// 백분위수 수준별 값. JSON에서는 `{"p10": 값, "p25": 값, ...}` 형태입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PercentileValues {
    values: Vec<(u32, f64)>,
}

impl PercentileValues {
    pub(crate) fn new(values: Vec<(u32, f64)>) -> Self {
        Self { values }
    }

    /// 수준의 값.
    pub fn get(&self, level: u32) -> Option<f64> {
        self.values
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, v)| *v)
    }

    /// (수준, 값)을 입력 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.values.iter().copied()
    }
}

impl Serialize for PercentileValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (level, value) in &self.values {
            map.serialize_entry(&format!("p{}", level), value)?;
        }
        map.end()
    }
}

/// 팬 차트 한 해의 데이터.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanChartPoint {
    /// 연도 (0 = 시작)
    #[serde(rename = "annee")]
    pub year: usize,
    /// 백분위수 값
    #[serde(flatten)]
    pub percentiles: PercentileValues,
}

/// 입력 매개변수 요약 (수익률과 변동성은 %).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterEcho {
    #[serde(rename = "valeur_initiale")]
    pub initial_value: f64,
    #[serde(rename = "rendement_moyen_annuel")]
    pub mean_annual_return_pct: f64,
    #[serde(rename = "volatilite_annuelle")]
    pub annual_volatility_pct: f64,
    #[serde(rename = "nb_annees")]
    pub years: u32,
    #[serde(rename = "nb_simulations")]
    pub n_simulations: usize,
    #[serde(rename = "apports_annuels")]
    pub annual_contribution: f64,
    #[serde(rename = "retraits_annuels")]
    pub annual_withdrawal: f64,
}

impl From<&SimulationParams> for ParameterEcho {
    fn from(params: &SimulationParams) -> Self {
        Self {
            initial_value: params.initial_value,
            mean_annual_return_pct: round_to(params.mean_annual_return * 100.0, 2),
            annual_volatility_pct: round_to(params.annual_volatility * 100.0, 2),
            years: params.years,
            n_simulations: params.n_simulations,
            annual_contribution: params.annual_contribution,
            annual_withdrawal: params.annual_withdrawal,
        }
    }
}

/// 몬테카를로 종합 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloReport {
    #[serde(rename = "parametres")]
    pub parameters: ParameterEcho,
    /// 마지막 해 백분위수
    pub percentiles: PercentileValues,
    #[serde(rename = "probabilites")]
    pub probabilities: SuccessProbabilities,
    #[serde(rename = "statistiques_finales")]
    pub final_statistics: FinalStatistics,
    #[serde(rename = "fan_chart_data")]
    pub fan_chart: Vec<FanChartPoint>,
    #[serde(rename = "nb_simulations_reussies")]
    pub completed_simulations: usize,
}

/// 스트리밍 집계 결과 (최종 자산 분포만).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalOutcomes {
    #[serde(rename = "probabilites")]
    pub probabilities: SuccessProbabilities,
    #[serde(rename = "statistiques_finales")]
    pub statistics: FinalStatistics,
    #[serde(rename = "nb_simulations_reussies")]
    pub completed_simulations: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_probabilities() {
        let finals = [50.0, 5.0, 100.0, 150.0, 200.0];
        let probs = SuccessProbabilities::from_final_values(100.0, &finals, Some(160.0));

        assert_eq!(probs.capital_preserved_pct, 60.0);
        assert_eq!(probs.goal_reached_pct, 20.0);
        assert_eq!(probs.ruin_pct, 20.0);
        assert_eq!(probs.median_final_value, 100.0);
        assert_eq!(probs.mean_final_value, 101.0);

        // 목표가 없으면 초기 자산
        let default_goal = SuccessProbabilities::from_final_values(100.0, &finals, None);
        assert_eq!(default_goal.goal_reached_pct, 60.0);
    }

    #[test]
    fn test_final_statistics() {
        let stats = FinalStatistics::from_final_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.median, 4.5);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_accumulator_matches_slice_reductions() {
        let finals = [120.0, 80.0, 9.0, 100.0, 300.0, 95.5];
        let mut acc = FinalValueAccumulator::new(100.0, Some(250.0), 2);
        for v in finals {
            acc.push(v);
        }
        assert_eq!(acc.len(), 6);

        let (probs, stats) = acc.finish();
        assert_eq!(
            probs,
            SuccessProbabilities::from_final_values(100.0, &finals, Some(250.0))
        );
        assert_eq!(stats, FinalStatistics::from_final_values(&finals));
        assert_eq!(probs.capital_preserved_pct, 50.0);
        assert_eq!(probs.goal_reached_pct, 16.7);
        assert_eq!(probs.ruin_pct, 16.7);
        assert_eq!(stats.min, 9.0);
        assert_eq!(stats.max, 300.0);
    }

    #[test]
    fn test_empty_accumulator_yields_defaults() {
        let acc = FinalValueAccumulator::new(100.0, None, 0);
        assert!(acc.is_empty());
        assert_eq!(
            acc.finish(),
            (SuccessProbabilities::default(), FinalStatistics::default())
        );
    }

    #[test]
    fn test_fan_chart_point_json() {
        let point = FanChartPoint {
            year: 3,
            percentiles: PercentileValues::new(vec![(10, 1.5), (90, 9.25)]),
        };
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"annee":3,"p10":1.5,"p90":9.25}"#);
    }
}
