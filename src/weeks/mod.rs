//! Selección de semanas y su codificación textual ("1-8,10,12-16").
//!
//! Submódulos:
//! - `selection`: `WeekSelection`, arreglo booleano de largo fijo con
//!   operaciones masivas copy-on-write
//! - `codec`: conversión selección <-> cadena de rangos

mod codec;
mod selection;

pub use codec::{contains_week, decode, encode};
pub use selection::WeekSelection;
