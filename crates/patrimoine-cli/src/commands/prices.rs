//! CSV 가격 파일 로더.
//!
//! 형식은 `date,price` 한 줄씩이며 날짜는 `YYYY-MM-DD`입니다. 첫 줄이
//! 날짜로 해석되지 않으면 헤더로 보고 건너뜁니다.
//!
//! ```text
//! date,price
//! 2024-01-02,100.5
//! 2024-01-03,101.2
//! ```

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use patrimoine_core::TimeSeries;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// CSV 파일에서 가격 시계열을 로드합니다.
pub fn load_price_csv(path: impl AsRef<Path>) -> Result<TimeSeries> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("CSV 파일 읽기 실패: {}", path.display()))?;

    let series = parse_price_csv(&content)
        .with_context(|| format!("CSV 파싱 실패: {}", path.display()))?;

    debug!(path = %path.display(), points = series.len(), "가격 데이터 로드");
    Ok(series)
}

/// CSV 본문을 가격 시계열로 파싱합니다.
///
/// 행은 날짜순으로 정렬됩니다. 같은 날짜가 두 번 나오거나 가격이 양수가
/// 아니면 에러입니다.
pub fn parse_price_csv(content: &str) -> Result<TimeSeries> {
    let mut points = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 2 {
            bail!("{}번째 줄: date,price 형식이 아닙니다: {}", line_no + 1, line);
        }

        let date = match NaiveDate::parse_from_str(parts[0], DATE_FORMAT) {
            Ok(date) => date,
            // 헤더 건너뛰기
            Err(_) if line_no == 0 => continue,
            Err(e) => bail!("{}번째 줄: 잘못된 날짜 '{}': {}", line_no + 1, parts[0], e),
        };

        let price: f64 = parts[1]
            .parse()
            .map_err(|e| anyhow!("{}번째 줄: 잘못된 가격 '{}': {}", line_no + 1, parts[1], e))?;

        points.push((date, price));
    }

    points.sort_by_key(|(date, _)| *date);
    Ok(TimeSeries::prices(points)?)
}

/// `KEY=VALUE` 형식의 인자를 분리합니다.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("KEY=VALUE 형식이어야 합니다: {}", raw))?;

    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        bail!("KEY=VALUE 형식이어야 합니다: {}", raw);
    }

    Ok((key.to_string(), value.to_string()))
}

/// `TICKER=path.csv` 목록에서 종목별 가격을 로드합니다.
pub fn load_price_files(specs: &[String]) -> Result<HashMap<String, TimeSeries>> {
    let mut prices = HashMap::with_capacity(specs.len());

    for spec in specs {
        let (ticker, path) = parse_assignment(spec)?;
        let series = load_price_csv(&path)?;
        if prices.insert(ticker.clone(), series).is_some() {
            bail!("종목이 두 번 지정되었습니다: {}", ticker);
        }
    }

    Ok(prices)
}
