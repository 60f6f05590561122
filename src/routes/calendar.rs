// src/routes/calendar.rs

use serde::{Deserialize, Serialize};

use crate::{
    dates::{self, MonthDayInterval},
    error::ApiError,
    middleware::JsonBody,
    response::ApiOk,
};

#[derive(Deserialize)]
pub struct DiffBody {
    pub start: String,
    pub end: String,
    #[serde(default = "default_offset")] pub offset: i64,
}
fn default_offset() -> i64 { 1 }

#[derive(Serialize)]
pub struct DiffResp { pub days: i64 }

#[derive(Deserialize)]
pub struct IntervalBody {
    pub date1: String,
    pub date2: String,
}

#[derive(Serialize)]
pub struct IntervalResp {
    #[serde(flatten)]
    pub interval: MonthDayInterval,
    pub more_than_two_months_and_one_day: bool,
}

/// POST /api/dates/diff
pub async fn diff(JsonBody(b): JsonBody<DiffBody>) -> Result<ApiOk<DiffResp>, ApiError> {
    let days = dates::diff_date_days(&b.start, &b.end, b.offset)?;
    Ok(ApiOk(DiffResp { days }))
}

/// POST /api/dates/interval
pub async fn interval(JsonBody(b): JsonBody<IntervalBody>) -> Result<ApiOk<IntervalResp>, ApiError> {
    let (date1, date2) = (dates::parse_date(&b.date1)?, dates::parse_date(&b.date2)?);
    Ok(ApiOk(IntervalResp {
        interval: dates::month_day_interval(date1, date2),
        more_than_two_months_and_one_day: dates::is_more_than_two_months_and_one_day(date1, date2),
    }))
}
