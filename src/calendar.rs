//! Aritmética de calendario del semestre: semanas que empiezan en lunes.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::models::{DerivedWeekInfo, SemesterWindow};

/// Total de semanas cuando las fechas faltan o no se pueden parsear.
pub const DEFAULT_TOTAL_WEEKS: u32 = 18;

/// Las cadenas de semanas usan números de uno o dos dígitos.
pub const MAX_TOTAL_WEEKS: u32 = 99;

/// Acepta "YYYY-MM-DD", RFC 3339 y "YYYY-MM-DDTHH:MM:SS".
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").ok().map(|dt| dt.date())
}

/// Lunes de la semana que contiene `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// 1 = lunes ... 7 = domingo
pub fn weekday_number(date: NaiveDate) -> u32 {
    date.weekday().number_from_monday()
}

/// Diferencia en semanas de calendario entre `later` y `earlier` (puede ser negativa).
fn calendar_weeks_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (start_of_week(later) - start_of_week(earlier)).num_days() / 7
}

/// Semanas de calendario inclusivas entre inicio y fin, mínimo 1.
/// Sin fechas válidas -> `DEFAULT_TOTAL_WEEKS`.
pub fn total_weeks(start_date: Option<&str>, end_date: Option<&str>) -> u32 {
    let (Some(start), Some(end)) = (start_date.and_then(parse_date), end_date.and_then(parse_date)) else {
        log::warn!(
            "fechas de semestre ausentes o inválidas ({:?} - {:?}); usando {} semanas",
            start_date, end_date, DEFAULT_TOTAL_WEEKS
        );
        return DEFAULT_TOTAL_WEEKS;
    };
    let total = calendar_weeks_between(end, start) + 1;
    if total > 0 { total as u32 } else { 1 }
}

/// Semana del semestre que contiene `today`, acotada a `[1, total_weeks]`.
/// Inicio futuro o inválido -> semana 1.
pub fn current_week(start_date: Option<&str>, total_weeks: u32, today: NaiveDate) -> u32 {
    let Some(start) = start_date.and_then(parse_date) else {
        return 1;
    };
    let week = calendar_weeks_between(today, start) + 1;
    if week < 1 {
        return 1;
    }
    (week as u32).clamp(1, total_weeks.max(1))
}

/// Lunes y domingo de la semana `week` (1-based) del semestre.
pub fn week_dates(start_date: &str, week: u32) -> Option<(NaiveDate, NaiveDate)> {
    if week < 1 {
        return None;
    }
    let first_monday = start_of_week(parse_date(start_date)?);
    let monday = first_monday + Duration::weeks(week as i64 - 1);
    Some((monday, monday + Duration::days(6)))
}

/// Calcula total y semana actual para una ventana ya validada.
pub fn derive_week_info(window: &SemesterWindow, today: NaiveDate) -> DerivedWeekInfo {
    let total = total_weeks(Some(&window.start_date), Some(&window.end_date));
    DerivedWeekInfo {
        total_weeks: total,
        current_week: current_week(Some(&window.start_date), total, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-02-26"), Some(d("2024-02-26")));
        assert_eq!(parse_date("2024-02-26T08:00:00"), Some(d("2024-02-26")));
        assert_eq!(parse_date("2024-02-26T08:00:00+08:00"), Some(d("2024-02-26")));
        assert_eq!(parse_date("26/02/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_start_of_week_is_monday() {
        assert_eq!(start_of_week(d("2024-07-07")), d("2024-07-01"));
        assert_eq!(start_of_week(d("2024-07-01")), d("2024-07-01"));
        assert_eq!(weekday_number(d("2024-07-07")), 7);
    }

    #[test]
    fn test_week_dates() {
        assert_eq!(week_dates("2024-02-28", 1), Some((d("2024-02-26"), d("2024-03-03"))));
        assert_eq!(week_dates("2024-02-26", 3), Some((d("2024-03-11"), d("2024-03-17"))));
        assert_eq!(week_dates("2024-02-26", 0), None);
        assert_eq!(week_dates("nope", 2), None);
    }
}
