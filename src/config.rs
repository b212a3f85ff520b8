//! Configuración desde variables de entorno (con `.env` opcional).

use std::env;
use std::path::PathBuf;

/// Qué respuesta se queda cuando hay varias semanas en vuelo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulePolicy {
    /// La última respuesta en llegar gana, sin importar el orden de emisión.
    #[default]
    LastWriteWins,
    /// Se descartan respuestas de peticiones anteriores a la última emitida.
    LatestIssued,
}

impl SchedulePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "last-write-wins" | "last_write_wins" => Some(SchedulePolicy::LastWriteWins),
            "latest-issued" | "latest_issued" => Some(SchedulePolicy::LatestIssued),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directorio con semester.json, sections.json y schedules.json
    pub data_dir: PathBuf,
    pub bind: String,
    pub workers: usize,
    pub schedule_policy: SchedulePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            bind: "127.0.0.1:8080".to_string(),
            workers: std::cmp::max(1, num_cpus::get()),
            schedule_policy: SchedulePolicy::default(),
        }
    }
}

impl Config {
    /// Lee SEMANARIO_DATA_DIR, SEMANARIO_BIND, SEMANARIO_WORKERS y
    /// SEMANARIO_SCHEDULE_POLICY. Valores inválidos vuelven al default.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Versión parametrizable para pruebas (inyección del lector de variables).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(dir) = lookup("SEMANARIO_DATA_DIR").filter(|s| !s.trim().is_empty()) {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(bind) = lookup("SEMANARIO_BIND").filter(|s| !s.trim().is_empty()) {
            cfg.bind = bind;
        }
        if let Some(raw) = lookup("SEMANARIO_WORKERS") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => cfg.workers = n,
                _ => log::warn!("SEMANARIO_WORKERS inválido ({:?}); usando {}", raw, cfg.workers),
            }
        }
        if let Some(raw) = lookup("SEMANARIO_SCHEDULE_POLICY") {
            match SchedulePolicy::parse(&raw) {
                Some(p) => cfg.schedule_policy = p,
                None => log::warn!("SEMANARIO_SCHEDULE_POLICY desconocida ({:?}); usando last-write-wins", raw),
            }
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_from_lookup_overrides_and_fallbacks() {
        let vars: HashMap<&str, &str> = [
            ("SEMANARIO_DATA_DIR", "/srv/horarios"),
            ("SEMANARIO_WORKERS", "0"),
            ("SEMANARIO_SCHEDULE_POLICY", "latest-issued"),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/horarios"));
        assert_eq!(cfg.bind, "127.0.0.1:8080");
        assert!(cfg.workers >= 1);
        assert_eq!(cfg.schedule_policy, SchedulePolicy::LatestIssued);
    }

    #[test]
    fn test_unknown_policy_keeps_default() {
        let cfg = Config::from_lookup(|k| (k == "SEMANARIO_SCHEDULE_POLICY").then(|| "newest".to_string()));
        assert_eq!(cfg.schedule_policy, SchedulePolicy::LastWriteWins);
    }
}
