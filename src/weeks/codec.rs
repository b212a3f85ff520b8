// Codificación de selecciones de semanas en cadenas de rangos.
//
// Formato en el cable: tokens separados por coma, cada uno "N" o "N-M",
// ascendentes, sin espacios ni solapamientos. La cadena generada por `encode`
// es exactamente lo que se persiste en el campo `weeks` de un horario.

use super::WeekSelection;

/// Número decimal sin signo; cualquier otro carácter invalida el token.
fn parse_week_number(raw: &str) -> Option<u32> {
    let s = raw.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok()
}

/// Parsea "N" o "N-M" a (inicio, fin) con 1 <= inicio <= fin.
fn parse_token(token: &str) -> Option<(u32, u32)> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let (start, end) = match token.split_once('-') {
        Some((a, b)) => (parse_week_number(a)?, parse_week_number(b)?),
        None => {
            let n = parse_week_number(token)?;
            (n, n)
        }
    };
    if start == 0 || start > end {
        return None;
    }
    Some((start, end))
}

/// Convierte una cadena de rangos en una selección de `total_weeks` posiciones.
///
/// Nunca falla: los tokens mal formados, invertidos o fuera de
/// `[1, total_weeks]` se descartan en silencio.
pub fn decode(text: &str, total_weeks: usize) -> WeekSelection {
    let mut selected = vec![false; total_weeks];
    for token in text.split(',') {
        let Some((start, end)) = parse_token(token) else { continue };
        if end as usize > total_weeks {
            continue;
        }
        for week in start..=end {
            selected[week as usize - 1] = true;
        }
    }
    WeekSelection::from_bools(selected)
}

/// Agrupa corridas máximas de semanas marcadas: "N" para una sola semana,
/// "N-M" para dos o más. Selección vacía -> "".
pub fn encode(selection: &WeekSelection) -> String {
    let mut ranges: Vec<String> = Vec::new();
    let mut run_start: Option<usize> = None;

    let flags = selection.as_slice();
    for (index, on) in flags.iter().enumerate() {
        let week = index + 1;
        match (*on, run_start) {
            (true, None) => run_start = Some(week),
            (false, Some(start)) => {
                ranges.push(format_run(start, week - 1));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        ranges.push(format_run(start, flags.len()));
    }
    ranges.join(",")
}

fn format_run(start: usize, end: usize) -> String {
    if start == end { format!("{}", start) } else { format!("{}-{}", start, end) }
}

/// True si la cadena persistida cubre `week`. Sin cota superior: sirve para
/// filtrar horarios sin conocer el total de semanas del semestre.
pub fn contains_week(text: &str, week: u32) -> bool {
    if week == 0 {
        return false;
    }
    text.split(',')
        .filter_map(parse_token)
        .any(|(start, end)| start <= week && week <= end)
}
