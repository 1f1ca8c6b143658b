//! Date parsing helpers
//!
//! The frontend sends dates either as RFC 3339 timestamps or as plain
//! `YYYY-MM-DD` strings; both are accepted everywhere a date crosses the API
//! boundary.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse an incoming date string. Plain dates land at midnight UTC.
pub fn parsear_fecha(valor: &str) -> Option<DateTime<Utc>> {
    if let Ok(fecha) = DateTime::parse_from_rfc3339(valor) {
        return Some(fecha.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(valor, "%Y-%m-%d")
        .ok()
        .and_then(|dia| dia.and_hms_opt(0, 0, 0))
        .map(|fecha| fecha.and_utc())
}

/// Last instant of the calendar day containing `fecha`. Used to make an
/// upper date bound inclusive.
pub fn fin_de_dia(fecha: DateTime<Utc>) -> DateTime<Utc> {
    fecha
        .date_naive()
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("valid time of day")
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parsea_fecha_plana_a_medianoche() {
        let fecha = parsear_fecha("2024-01-05").unwrap();
        assert_eq!(fecha, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parsea_rfc3339() {
        let fecha = parsear_fecha("2024-01-05T14:30:00Z").unwrap();
        assert_eq!(fecha.hour(), 14);
        assert_eq!(fecha.minute(), 30);
    }

    #[test]
    fn test_rechaza_basura() {
        assert!(parsear_fecha("el martes que viene").is_none());
        assert!(parsear_fecha("").is_none());
    }

    #[test]
    fn test_fin_de_dia() {
        let fecha = Utc.with_ymd_and_hms(2024, 1, 5, 9, 15, 0).unwrap();
        let limite = fin_de_dia(fecha);
        assert_eq!(limite.hour(), 23);
        assert_eq!(limite.minute(), 59);
        assert_eq!(limite.date_naive(), fecha.date_naive());
    }
}
