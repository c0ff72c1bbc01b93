//! 시뮬레이션 경로 행렬.
//!
//! 행은 시뮬레이션, 열은 시점입니다. 연속된 `Vec<f64>` 하나에 행 우선으로
//! 저장합니다.

use patrimoine_core::{AnalyticsError, AnalyticsResult};

/// 연말 시점 앙상블 (시뮬레이션 × (년수 + 1)).
///
/// 0번 열은 초기 자산, `y`번 열은 `y`년 말 자산입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnualEnsemble {
    width: usize,
    data: Vec<f64>,
}

impl AnnualEnsemble {
    pub(crate) fn with_capacity(n_simulations: usize, years: usize) -> Self {
        Self {
            width: years + 1,
            data: Vec::with_capacity(n_simulations * (years + 1)),
        }
    }

    pub(crate) fn push_value(&mut self, value: f64) {
        self.data.push(value);
    }

    /// 경로 목록에서 앙상블을 생성합니다.
    ///
    /// 모든 경로의 길이가 같고 1 이상이어야 합니다.
    pub fn from_paths(paths: Vec<Vec<f64>>) -> AnalyticsResult<Self> {
        let width = paths.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "앙상블에는 비어있지 않은 경로가 하나 이상 필요합니다".to_string(),
            ));
        }
        if let Some(bad) = paths.iter().find(|p| p.len() != width) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "경로 길이가 다릅니다: {} != {}",
                bad.len(),
                width
            )));
        }

        Ok(Self {
            width,
            data: paths.into_iter().flatten().collect(),
        })
    }

    /// 시뮬레이션 수.
    pub fn n_simulations(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    /// 투자 기간 (년).
    pub fn years(&self) -> usize {
        self.width.saturating_sub(1)
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `index`번째 경로.
    pub fn path(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.width)?;
        self.data.get(start..start + self.width)
    }

    /// 모든 경로를 순회합니다.
    pub fn paths(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.width.max(1))
    }

    /// `year`년 말 모든 시뮬레이션의 자산.
    pub fn year_values(&self, year: usize) -> Vec<f64> {
        if year >= self.width {
            return Vec::new();
        }
        self.paths().map(|p| p[year]).collect()
    }

    /// 마지막 해의 자산.
    pub fn final_values(&self) -> Vec<f64> {
        self.year_values(self.years())
    }

    /// 첫 경로의 초기 자산. 비어있으면 0.0.
    pub fn initial_value(&self) -> f64 {
        self.data.first().copied().unwrap_or(0.0)
    }
}

/// 월말 시점 앙상블 (시뮬레이션 × (개월수 + 1)).
///
/// 메모리 사용량이 크므로 명시적으로 요청할 때만 생성됩니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyEnsemble {
    width: usize,
    data: Vec<f64>,
}

impl MonthlyEnsemble {
    pub(crate) fn with_capacity(n_simulations: usize, months: usize) -> Self {
        Self {
            width: months + 1,
            data: Vec::with_capacity(n_simulations * (months + 1)),
        }
    }

    pub(crate) fn push_value(&mut self, value: f64) {
        self.data.push(value);
    }

    /// 시뮬레이션 수.
    pub fn n_simulations(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    /// 총 개월 수.
    pub fn months(&self) -> usize {
        self.width.saturating_sub(1)
    }

    /// `index`번째 월별 경로.
    pub fn path(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.width)?;
        self.data.get(start..start + self.width)
    }

    /// 연말 시점만 추출하여 연간 앙상블을 만듭니다.
    pub fn to_annual(&self) -> AnnualEnsemble {
        let years = self.months() / 12;
        let mut annual = AnnualEnsemble::with_capacity(self.n_simulations(), years);
        for path in self.data.chunks_exact(self.width.max(1)) {
            for year in 0..=years {
                annual.push_value(path[year * 12]);
            }
        }
        annual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paths() {
        let ensemble =
            AnnualEnsemble::from_paths(vec![vec![100.0, 110.0, 120.0], vec![100.0, 90.0, 80.0]])
                .unwrap();

        assert_eq!(ensemble.n_simulations(), 2);
        assert_eq!(ensemble.years(), 2);
        assert_eq!(ensemble.initial_value(), 100.0);
        assert_eq!(ensemble.final_values(), vec![120.0, 80.0]);
        assert_eq!(ensemble.year_values(1), vec![110.0, 90.0]);
        assert_eq!(ensemble.path(1), Some(&[100.0, 90.0, 80.0][..]));
        assert_eq!(ensemble.path(2), None);
    }

    #[test]
    fn test_from_paths_rejects_ragged() {
        assert!(AnnualEnsemble::from_paths(vec![vec![1.0, 2.0], vec![1.0]]).is_err());
        assert!(AnnualEnsemble::from_paths(vec![]).is_err());
    }

    #[test]
    fn test_monthly_to_annual() {
        let mut monthly = MonthlyEnsemble::with_capacity(1, 24);
        for m in 0..=24 {
            monthly.push_value(m as f64);
        }

        let annual = monthly.to_annual();
        assert_eq!(annual.path(0), Some(&[0.0, 12.0, 24.0][..]));
    }
}
