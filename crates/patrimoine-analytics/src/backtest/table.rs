//! 종목별 가격 정렬 및 수익률 테이블.
//!
//! 모든 종목 가격의 날짜 합집합을 행으로 사용합니다. 각 종목은 마지막
//! 관측 가격으로 앞채움(forward-fill)되며, 어느 한 종목이라도 수익률이
//! 정의되지 않는 행(첫 행 포함)은 버립니다.

use chrono::NaiveDate;
use patrimoine_core::TimeSeries;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 정렬된 일별 수익률 테이블.
#[derive(Debug, Clone, Default)]
pub struct ReturnTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<f64>>,
    price_rows: usize,
}

impl ReturnTable {
    /// 가격 시계열에서 수익률 테이블을 생성합니다.
    ///
    /// `start`/`end`는 양 끝을 포함하는 날짜 구간입니다.
    pub fn build(
        prices: &HashMap<String, TimeSeries>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        let windowed: BTreeMap<&str, TimeSeries> = prices
            .iter()
            .map(|(id, series)| (id.as_str(), series.between(start, end)))
            .collect();

        let all_dates: Vec<NaiveDate> = windowed
            .values()
            .flat_map(|series| series.points().iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // 종목별 앞채움 가격
        let filled: BTreeMap<&str, Vec<Option<f64>>> = windowed
            .iter()
            .map(|(id, series)| (*id, forward_fill(series, &all_dates)))
            .collect();

        let mut dates = Vec::new();
        let mut columns: BTreeMap<String, Vec<f64>> = filled
            .keys()
            .map(|id| (id.to_string(), Vec::new()))
            .collect();

        for row in 1..all_dates.len() {
            let returns: Option<Vec<f64>> = filled
                .values()
                .map(|col| simple_return(col[row - 1], col[row]))
                .collect();

            let Some(returns) = returns else {
                continue;
            };

            dates.push(all_dates[row]);
            for (column, r) in columns.values_mut().zip(returns) {
                column.push(r);
            }
        }

        Self {
            dates,
            columns,
            price_rows: all_dates.len(),
        }
    }

    /// 수익률 행 수.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 수익률 행이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 기간 구간에 포함된 가격 행 수 (날짜 합집합 크기).
    pub fn price_rows(&self) -> usize {
        self.price_rows
    }

    /// 수익률 행의 날짜.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// 종목 수.
    pub fn instrument_count(&self) -> usize {
        self.columns.len()
    }

    /// 테이블에 종목이 있는지 확인합니다.
    pub fn contains(&self, instrument: &str) -> bool {
        self.columns.contains_key(instrument)
    }

    /// 종목의 수익률 열.
    pub fn column(&self, instrument: &str) -> Option<&[f64]> {
        self.columns.get(instrument).map(Vec::as_slice)
    }
}

fn forward_fill(series: &TimeSeries, dates: &[NaiveDate]) -> Vec<Option<f64>> {
    let points = series.points();
    let mut idx = 0;
    let mut last = None;

    dates
        .iter()
        .map(|date| {
            while idx < points.len() && points[idx].date <= *date {
                last = Some(points[idx].value);
                idx += 1;
            }
            last
        })
        .collect()
}

fn simple_return(prev: Option<f64>, current: Option<f64>) -> Option<f64> {
    match (prev, current) {
        (Some(p), Some(c)) if p != 0.0 => Some(c / p - 1.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn prices(entries: Vec<(&str, Vec<(u32, f64)>)>) -> HashMap<String, TimeSeries> {
        entries
            .into_iter()
            .map(|(id, points)| {
                let series =
                    TimeSeries::new(points.iter().map(|(d, v)| (date(*d), *v)).collect()).unwrap();
                (id.to_string(), series)
            })
            .collect()
    }

    #[test]
    fn test_first_row_dropped() {
        let table = ReturnTable::build(
            &prices(vec![("A", vec![(1, 100.0), (2, 110.0), (3, 121.0)])]),
            None,
            None,
        );

        assert_eq!(table.price_rows(), 3);
        assert_eq!(table.len(), 2);
        assert_eq!(table.dates(), &[date(2), date(3)]);
        let col = table.column("A").unwrap();
        assert!((col[0] - 0.1).abs() < 1e-12);
        assert!((col[1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_forward_fill_and_late_start() {
        // B는 3일부터 시작, A는 4일이 비어있음
        let table = ReturnTable::build(
            &prices(vec![
                ("A", vec![(1, 100.0), (2, 101.0), (3, 102.0), (5, 104.0)]),
                ("B", vec![(3, 50.0), (4, 55.0), (5, 55.0)]),
            ]),
            None,
            None,
        );

        // 날짜 합집합 5개, B가 정의되지 않는 1~3일 수익률 행은 버림
        assert_eq!(table.price_rows(), 5);
        assert_eq!(table.dates(), &[date(4), date(5)]);

        let a = table.column("A").unwrap();
        assert_eq!(a[0], 0.0); // 4일: 앞채움 → 변화 없음
        assert!((a[1] - (104.0 / 102.0 - 1.0)).abs() < 1e-12);

        let b = table.column("B").unwrap();
        assert!((b[0] - 0.1).abs() < 1e-12);
        assert_eq!(b[1], 0.0);
    }

    #[test]
    fn test_date_window_inclusive() {
        let table = ReturnTable::build(
            &prices(vec![("A", vec![(1, 100.0), (2, 110.0), (3, 121.0), (4, 100.0)])]),
            Some(date(2)),
            Some(date(3)),
        );
        assert_eq!(table.price_rows(), 2);
        assert_eq!(table.dates(), &[date(3)]);
    }

    #[test]
    fn test_empty_input() {
        let table = ReturnTable::build(&HashMap::new(), None, None);
        assert!(table.is_empty());
        assert_eq!(table.price_rows(), 0);
        assert!(!table.contains("A"));
    }
}
