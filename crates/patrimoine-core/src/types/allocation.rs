//! 자산 배분 비중.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AnalyticsError, AnalyticsResult};

/// 종목별 목표 비중 (백분율, 0–100).
///
/// 합계가 정확히 100일 필요는 없습니다. 배분되지 않은 나머지는 수익률 0인
/// 현금으로 취급됩니다. 가중 합산 순서를 고정하기 위해 종목 코드 순으로
/// 정렬된 맵을 사용합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct AllocationWeights {
    weights: BTreeMap<String, f64>,
}

impl TryFrom<BTreeMap<String, f64>> for AllocationWeights {
    type Error = AnalyticsError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::new(map)
    }
}

impl From<AllocationWeights> for BTreeMap<String, f64> {
    fn from(weights: AllocationWeights) -> Self {
        weights.weights
    }
}

impl AllocationWeights {
    /// (종목, 비중%) 목록에서 배분을 생성합니다.
    ///
    /// 음수이거나 유한하지 않은 비중은 거부합니다. 같은 종목이 여러 번
    /// 나오면 마지막 값이 사용됩니다.
    pub fn new<I, S>(weights: I) -> AnalyticsResult<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (id, weight) in weights {
            let id = id.into();
            if !weight.is_finite() || weight < 0.0 {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "'{}'의 비중은 0 이상의 유한한 값이어야 합니다: {}",
                    id, weight
                )));
            }
            map.insert(id, weight);
        }
        Ok(Self { weights: map })
    }

    /// 종목의 비중(%)을 반환합니다.
    pub fn get(&self, instrument: &str) -> Option<f64> {
        self.weights.get(instrument).copied()
    }

    /// (종목, 비중%)를 종목 코드 순으로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// 배분된 종목 수.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// 배분이 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// 비중 합계 (%).
    pub fn total_pct(&self) -> f64 {
        self.weights.values().sum()
    }

    /// 현금으로 남는 비중 (%). 합계가 100을 넘으면 0.
    pub fn cash_pct(&self) -> f64 {
        (100.0 - self.total_pct()).max(0.0)
    }

    /// `is_available`을 만족하지 않는 종목 목록을 반환합니다.
    pub fn missing_from(&self, is_available: impl Fn(&str) -> bool) -> Vec<String> {
        self.weights
            .keys()
            .filter(|id| !is_available(id))
            .cloned()
            .collect()
    }
}
