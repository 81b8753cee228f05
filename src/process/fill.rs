// src/process/fill.rs

use chrono::NaiveDate;

use super::IndexRow;

/// Last present value per gap-filled column.
///
/// The fill is a pure fold over an ordered row sequence carrying this
/// accumulator; callers choose the scope by choosing where the state starts
/// fresh (once per file, then once across the whole consolidated sequence).
#[derive(Debug, Default, Clone)]
pub struct FillState {
    pub date: Option<NaiveDate>,
    pub setor: Option<String>,
}

/// Forward-fill `date` and `setor` in row order.
///
/// A present value updates the accumulator; an absent one is replaced by the
/// last value seen. Rows before the first present value stay absent — that
/// leading run is the documented edge case, not an error.
pub fn fill_forward(rows: &mut [IndexRow], state: &mut FillState) {
    for row in rows.iter_mut() {
        match row.date {
            Some(date) => state.date = Some(date),
            None => row.date = state.date,
        }
        match &row.setor {
            Some(setor) => state.setor = Some(setor.clone()),
            None => row.setor = state.setor.clone(),
        }
    }
}
