use serde::{Deserialize, Serialize};
use std::fmt;

/// Selección de semanas: posición `i` representa la semana `i + 1`.
///
/// El largo es siempre el total de semanas para el que se creó. Las
/// operaciones devuelven una selección nueva; nunca se muta en sitio.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekSelection(Vec<bool>);

impl WeekSelection {
    /// Selección vacía (todo `false`) de `total_weeks` posiciones.
    pub fn empty(total_weeks: usize) -> Self {
        WeekSelection(vec![false; total_weeks])
    }

    pub fn from_bools(bools: Vec<bool>) -> Self {
        WeekSelection(bools)
    }

    pub fn total_weeks(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<bool> {
        self.0
    }

    /// `week` es 1-based; fuera de rango es `false`.
    pub fn is_selected(&self, week: usize) -> bool {
        week >= 1 && self.0.get(week - 1).copied().unwrap_or(false)
    }

    /// Semanas marcadas (1-based), en orden ascendente.
    pub fn selected_weeks(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().filter(|(_, on)| **on).map(|(i, _)| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|on| *on)
    }

    pub fn select_all(&self) -> Self {
        WeekSelection(vec![true; self.0.len()])
    }

    pub fn clear_all(&self) -> Self {
        WeekSelection::empty(self.0.len())
    }

    /// Semanas impares (1, 3, 5...).
    pub fn select_odd(&self) -> Self {
        WeekSelection((0..self.0.len()).map(|i| (i + 1) % 2 == 1).collect())
    }

    /// Semanas pares (2, 4, 6...).
    pub fn select_even(&self) -> Self {
        WeekSelection((0..self.0.len()).map(|i| (i + 1) % 2 == 0).collect())
    }

    /// Invierte una semana (1-based). Fuera de rango devuelve una copia sin cambios.
    pub fn toggle(&self, week: usize) -> Self {
        let mut next = self.0.clone();
        if week >= 1 {
            if let Some(slot) = next.get_mut(week - 1) {
                *slot = !*slot;
            }
        }
        WeekSelection(next)
    }

    /// Copia la selección a un nuevo total: trunca o rellena con `false`.
    pub fn resize(&self, total_weeks: usize) -> Self {
        let mut next = self.0.clone();
        next.resize(total_weeks, false);
        WeekSelection(next)
    }
}

impl From<Vec<bool>> for WeekSelection {
    fn from(bools: Vec<bool>) -> Self {
        WeekSelection(bools)
    }
}

impl fmt::Display for WeekSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::encode(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_helpers_keep_length() {
        let base = WeekSelection::empty(5);
        assert_eq!(base.select_all().as_slice(), &[true; 5]);
        assert_eq!(base.select_all().clear_all().as_slice(), &[false; 5]);
        assert_eq!(base.select_odd().as_slice(), &[true, false, true, false, true]);
        assert_eq!(base.select_even().as_slice(), &[false, true, false, true, false]);
    }

    #[test]
    fn toggle_is_copy_on_write() {
        let base = WeekSelection::empty(3);
        let toggled = base.toggle(2);
        assert_eq!(base.as_slice(), &[false, false, false]);
        assert_eq!(toggled.as_slice(), &[false, true, false]);
        // fuera de rango: sin cambios
        assert_eq!(toggled.toggle(0), toggled);
        assert_eq!(toggled.toggle(4), toggled);
    }

    #[test]
    fn resize_truncates_and_pads() {
        let sel = WeekSelection::from_bools(vec![true, false, true, true]);
        assert_eq!(sel.resize(2).as_slice(), &[true, false]);
        assert_eq!(sel.resize(6).as_slice(), &[true, false, true, true, false, false]);
    }

    #[test]
    fn selected_weeks_are_one_based() {
        let sel = WeekSelection::from_bools(vec![false, true, true, false, true]);
        assert_eq!(sel.selected_weeks().collect::<Vec<_>>(), vec![2, 3, 5]);
        assert!(sel.is_selected(5));
        assert!(!sel.is_selected(0));
        assert!(!sel.is_selected(6));
        assert_eq!(sel.to_string(), "2-3,5");
    }
}
