//! Deadline policy
//!
//! Maps a client to an SLA window in business days and turns an intake date
//! into a deadline. Named partner organizations get shorter windows than the
//! walk-in default.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};

use crate::models::{Cliente, TipoCliente};

/// SLA window for clients with no specific agreement
pub const PLAZO_DEFECTO: u32 = 7;

/// Business days granted to the client of an order.
///
/// Lookup order: named organization agreement, then the tier default, then
/// the global default.
pub fn plazo_dias_habiles(cliente: &Cliente) -> u32 {
    match cliente.nombre_empresa.as_deref() {
        Some("Hospital Italiano") => 2,
        Some("Mercantil Andina") => 3,
        Some("Scrapfree") => 5,
        _ => match cliente.tipo_cliente {
            TipoCliente::Particular => 7,
            TipoCliente::Empresa => PLAZO_DEFECTO,
        },
    }
}

/// Advance `desde` by `dias` business days (Mon-Fri).
///
/// The cursor moves one calendar day at a time and only stops on a weekday,
/// so the result is always a weekday strictly after `desde`, even for a
/// 0-day window.
pub fn sumar_dias_habiles(desde: DateTime<Utc>, dias: u32) -> DateTime<Utc> {
    let mut fecha = desde;
    let mut sumados = 0u32;

    loop {
        fecha += Duration::days(1);
        let habil = !matches!(fecha.weekday(), Weekday::Sat | Weekday::Sun);
        if habil {
            sumados += 1;
        }
        if habil && sumados >= dias {
            return fecha;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cliente(tipo: TipoCliente, nombre_empresa: Option<&str>) -> Cliente {
        Cliente {
            dni: "11222333".to_string(),
            nombre_apellido: "Ana Pérez".to_string(),
            telefono: None,
            domicilio: None,
            tipo_cliente: tipo,
            nombre_empresa: nombre_empresa.map(str::to_string),
            fecha_registro: Utc::now(),
        }
    }

    fn dia(anio: i32, mes: u32, dia: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(anio, mes, dia, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_plazo_por_convenio() {
        let hospital = cliente(TipoCliente::Empresa, Some("Hospital Italiano"));
        assert_eq!(plazo_dias_habiles(&hospital), 2);

        let mercantil = cliente(TipoCliente::Empresa, Some("Mercantil Andina"));
        assert_eq!(plazo_dias_habiles(&mercantil), 3);

        let scrapfree = cliente(TipoCliente::Empresa, Some("Scrapfree"));
        assert_eq!(plazo_dias_habiles(&scrapfree), 5);
    }

    #[test]
    fn test_plazo_empresa_sin_convenio_cae_al_defecto() {
        let otra = cliente(TipoCliente::Empresa, Some("Taller López"));
        assert_eq!(plazo_dias_habiles(&otra), PLAZO_DEFECTO);
    }

    #[test]
    fn test_plazo_particular() {
        let particular = cliente(TipoCliente::Particular, None);
        assert_eq!(plazo_dias_habiles(&particular), 7);
    }

    #[test]
    fn test_dos_habiles_desde_lunes() {
        // 2024-01-01 was a Monday
        assert_eq!(sumar_dias_habiles(dia(2024, 1, 1), 2), dia(2024, 1, 3));
    }

    #[test]
    fn test_dos_habiles_desde_viernes_salta_finde() {
        // 2024-01-05 was a Friday; two business days later is Tuesday the 9th
        assert_eq!(sumar_dias_habiles(dia(2024, 1, 5), 2), dia(2024, 1, 9));
    }

    #[test]
    fn test_plazo_cero_avanza_igual() {
        // Even a 0-day window never lands on the intake date itself
        let desde = dia(2024, 1, 5); // Friday
        let limite = sumar_dias_habiles(desde, 0);
        assert!(limite > desde);
        assert_eq!(limite, dia(2024, 1, 8)); // next Monday
    }

    #[test]
    fn test_siempre_cae_en_dia_habil() {
        for plazo in 0..10 {
            for inicio in 1..=14 {
                let limite = sumar_dias_habiles(dia(2024, 1, inicio), plazo);
                assert!(
                    !matches!(limite.weekday(), Weekday::Sat | Weekday::Sun),
                    "plazo {plazo} desde 2024-01-{inicio} cayó en fin de semana"
                );
                assert!(limite > dia(2024, 1, inicio));
            }
        }
    }

    #[test]
    fn test_conserva_hora_de_ingreso() {
        let desde = Utc.with_ymd_and_hms(2024, 1, 1, 16, 45, 0).unwrap();
        let limite = sumar_dias_habiles(desde, 2);
        assert_eq!(limite, Utc.with_ymd_and_hms(2024, 1, 3, 16, 45, 0).unwrap());
    }
}
