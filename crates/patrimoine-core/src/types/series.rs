//! 날짜 기반 시계열.
//!
//! 가격, 수익률, 포트폴리오 가치 경로를 모두 같은 타입으로 표현합니다.
//! 날짜는 엄격하게 증가해야 하며, JSON에서는 `{"YYYY-MM-DD": 값}` 형태의
//! 순서 있는 객체로 직렬화됩니다.

use chrono::{Datelike, NaiveDate};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::error::{AnalyticsError, AnalyticsResult};

/// 시계열의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// 날짜
    pub date: NaiveDate,
    /// 값
    pub value: f64,
}

/// 날짜순으로 정렬된 시계열.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// (날짜, 값) 목록에서 시계열을 생성합니다.
    ///
    /// 날짜가 엄격하게 증가하지 않으면 `AnalyticsError::Data`를 반환합니다.
    pub fn new(points: Vec<(NaiveDate, f64)>) -> AnalyticsResult<Self> {
        for pair in points.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(AnalyticsError::Data(format!(
                    "날짜가 엄격하게 증가해야 합니다: {} 다음에 {}",
                    pair[0].0, pair[1].0
                )));
            }
        }

        Ok(Self {
            points: points
                .into_iter()
                .map(|(date, value)| SeriesPoint { date, value })
                .collect(),
        })
    }

    /// 가격 시계열을 생성합니다.
    ///
    /// 날짜 검증에 더해 모든 가격이 양의 유한값인지 확인합니다.
    pub fn prices(points: Vec<(NaiveDate, f64)>) -> AnalyticsResult<Self> {
        if let Some((date, price)) = points
            .iter()
            .find(|(_, price)| !price.is_finite() || *price <= 0.0)
        {
            return Err(AnalyticsError::Data(format!(
                "{}의 가격은 양수여야 합니다: {}",
                date, price
            )));
        }
        Self::new(points)
    }

    /// 날짜 목록과 값 목록을 짝지어 시계열을 생성합니다.
    pub fn from_parts(dates: &[NaiveDate], values: Vec<f64>) -> AnalyticsResult<Self> {
        if dates.len() != values.len() {
            return Err(AnalyticsError::Data(format!(
                "날짜 수({})와 값 수({})가 다릅니다",
                dates.len(),
                values.len()
            )));
        }
        Self::new(dates.iter().copied().zip(values).collect())
    }

    /// 데이터 포인트 수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 모든 포인트.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// 날짜 목록.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// 값 목록.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// 날짜를 유지한 채 값을 변환합니다.
    pub fn map_values(&self, mut f: impl FnMut(f64) -> f64) -> TimeSeries {
        let points = self
            .points
            .iter()
            .map(|p| SeriesPoint {
                date: p.date,
                value: f(p.value),
            })
            .collect();

        TimeSeries { points }
    }

    /// 첫 번째 포인트.
    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    /// 마지막 포인트.
    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// 특정 날짜의 값.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// 단순 수익률 시계열 (비율, 첫 기간 제외).
    ///
    /// 길이는 `len() - 1`입니다. 이전 값이 0인 기간은 수익률이 정의되지
    /// 않으므로 건너뜁니다.
    pub fn pct_change(&self) -> TimeSeries {
        let points = self
            .points
            .windows(2)
            .filter(|pair| pair[0].value != 0.0)
            .map(|pair| SeriesPoint {
                date: pair[1].date,
                value: pair[1].value / pair[0].value - 1.0,
            })
            .collect();

        TimeSeries { points }
    }

    /// 날짜 구간(양 끝 포함)으로 자릅니다.
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> TimeSeries {
        let points = self
            .points
            .iter()
            .filter(|p| start.map_or(true, |s| p.date >= s))
            .filter(|p| end.map_or(true, |e| p.date <= e))
            .copied()
            .collect();

        TimeSeries { points }
    }

    /// 각 연도의 마지막 값으로 이루어진 시계열.
    pub fn year_end_values(&self) -> TimeSeries {
        let mut points: Vec<SeriesPoint> = Vec::new();

        for point in &self.points {
            match points.last_mut() {
                Some(last) if last.date.year() == point.date.year() => *last = *point,
                _ => points.push(*point),
            }
        }

        TimeSeries { points }
    }
}

impl Serialize for TimeSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.points.len()))?;
        for point in &self.points {
            map.serialize_entry(&point.date.format("%Y-%m-%d").to_string(), &point.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TimeSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<NaiveDate, f64>::deserialize(deserializer)?;
        TimeSeries::new(map.into_iter().collect()).map_err(serde::de::Error::custom)
    }
}
