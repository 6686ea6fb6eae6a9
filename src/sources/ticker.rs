use chrono::{Datelike, NaiveDate, Weekday};

/// Spanish month codes used in Rofex dollar-futures tickers.
const MONTH_CODES: [&str; 12] = [
    "ENE", "FEB", "MAR", "ABR", "MAY", "JUN", "JUL", "AGO", "SEP", "OCT", "NOV", "DIC",
];

/// Maturity of a monthly dollar future from its ticker, e.g. "DLR/ENE26" or
/// the A-series "DLR/ENE26A". Contracts settle on the last business day of
/// the month.
pub fn parse_dlr_maturity(symbol: &str) -> Option<NaiveDate> {
    let code = symbol.strip_prefix("DLR/")?;
    if !code.is_ascii() {
        return None;
    }
    let code = match code.len() {
        5 => code,
        6 if code.ends_with('A') => &code[..5],
        _ => return None,
    };
    let (month, year) = code.split_at(3);
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month = MONTH_CODES.iter().position(|m| *m == month)? as u32 + 1;
    let year = 2000 + year.parse::<i32>().ok()?;
    last_business_day(year, month)
}

/// Last Monday-to-Friday day of the month. Holidays are not considered.
pub fn last_business_day(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut day = first_of_next.pred_opt()?;
    while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        day = day.pred_opt()?;
    }
    Some(day)
}
