//! 공통 통계 함수.
//!
//! 백테스트, 위험 지표, 성과 분석, 몬테카를로 집계가 모두 이 모듈의 함수를
//! 사용합니다. 표본 표준편차는 n-1 (ddof=1), 백분위수는 인접 순위 사이의
//! 선형 보간을 사용합니다.

use chrono::NaiveDate;
use patrimoine_core::TimeSeries;

/// 산술 평균. 빈 입력은 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 표본 표준편차 (n-1). 관측치가 2개 미만이면 0.0.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// 모집단 표준편차 (n). 빈 입력은 0.0.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / values.len() as f64).sqrt()
}

/// 표본 공분산 (n-1). 길이가 다르거나 2개 미만이면 0.0.
pub fn sample_covariance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }
    let ma = mean(a);
    let mb = mean(b);
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    sum / (a.len() - 1) as f64
}

/// q번째 백분위수 (0–100), 선형 보간.
///
/// 정렬된 값에서 순위 `q/100 × (n-1)`를 구하고 인접한 두 값 사이를
/// 보간합니다. 빈 입력은 0.0.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(&sorted, q)
}

/// 이미 오름차순 정렬된 값의 백분위수.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (q.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            // 반올림 오차로 구간을 벗어나지 않도록 양 끝에 맞춤
            (sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
                .max(sorted[lo])
                .min(sorted[hi])
        }
    }
}

/// 중앙값.
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// 소수점 `dp` 자리로 반올림합니다 (정확히 중간이면 짝수 쪽).
///
/// 리포트의 모든 수치는 직렬화 전에 이 함수로 반올림됩니다.
pub fn round_to(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(dp as i32);
    (value * factor).round_ties_even() / factor
}

/// 날짜 기준 내부 조인 결과.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aligned {
    /// 공통 날짜
    pub dates: Vec<NaiveDate>,
    /// 왼쪽 시계열 값
    pub left: Vec<f64>,
    /// 오른쪽 시계열 값
    pub right: Vec<f64>,
}

impl Aligned {
    /// 공통 관측치 수.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 공통 관측치가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// 두 시계열을 공통 날짜로 정렬합니다 (내부 조인, 짝이 없는 날짜는 버림).
pub fn align(left: &TimeSeries, right: &TimeSeries) -> Aligned {
    let a = left.points();
    let b = right.points();
    let mut out = Aligned::default();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.dates.push(a[i].date);
                out.left.push(a[i].value);
                out.right.push(b[j].value);
                i += 1;
                j += 1;
            }
        }
    }

    out
}
