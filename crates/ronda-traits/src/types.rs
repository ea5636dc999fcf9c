//! Common types used throughout the ronda framework.
//!
//! The central type is [`Panel`], a date-by-asset table backed by a dense
//! `ndarray` matrix with `NaN` as the missing-value marker. Keeping the data
//! as an index-addressed matrix (rather than a label-keyed frame) keeps the
//! walk-forward loop and the ranking step index-safe and branch-predictable.

use ndarray::Array2;

use crate::error::{Result, RondaError};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier.
///
/// Symbols identify assets across the ronda framework, typically ticker
/// symbols like "AAPL" or "MSFT".
pub type Symbol = String;

/// A time-ordered table of per-asset values.
///
/// Rows are keyed by a strictly ordered sequence of unique dates, columns by
/// unique asset symbols. Cells are `f64` with `NaN` marking missing values.
/// A `Panel` holds prices, simple returns, or position signals; derived panels
/// always share the keys of the panel they came from.
///
/// # Example
///
/// ```
/// use ronda_traits::{Panel, Date};
/// use ndarray::array;
///
/// let dates = vec![
///     Date::from_ymd_opt(2024, 1, 2).unwrap(),
///     Date::from_ymd_opt(2024, 1, 3).unwrap(),
/// ];
/// let symbols = vec!["AAA".to_string(), "BBB".to_string()];
/// let panel = Panel::new(dates, symbols, array![[10.0, 20.0], [11.0, 19.0]]).unwrap();
/// assert_eq!(panel.n_dates(), 2);
/// assert_eq!(panel.n_assets(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    values: Array2<f64>,
}

impl Panel {
    /// Creates a new panel from row keys, column keys, and a value matrix.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::ShapeMismatch`] if the matrix dimensions do not
    /// match the key lengths, and [`RondaError::InvalidData`] if dates or
    /// symbols contain duplicates.
    pub fn new(dates: Vec<Date>, symbols: Vec<Symbol>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != dates.len() || values.ncols() != symbols.len() {
            return Err(RondaError::ShapeMismatch(format!(
                "values are {}x{} but panel has {} dates and {} symbols",
                values.nrows(),
                values.ncols(),
                dates.len(),
                symbols.len()
            )));
        }

        let mut seen_dates = dates.clone();
        seen_dates.sort_unstable();
        if seen_dates.windows(2).any(|w| w[0] == w[1]) {
            return Err(RondaError::InvalidData(
                "duplicate row keys in panel".to_string(),
            ));
        }

        let mut seen_symbols = symbols.clone();
        seen_symbols.sort_unstable();
        if seen_symbols.windows(2).any(|w| w[0] == w[1]) {
            return Err(RondaError::InvalidData(
                "duplicate column keys in panel".to_string(),
            ));
        }

        Ok(Self {
            dates,
            symbols,
            values,
        })
    }

    /// Returns the row keys.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the column keys.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the underlying value matrix (dates x assets).
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Returns a mutable reference to the value matrix.
    pub const fn values_mut(&mut self) -> &mut Array2<f64> {
        &mut self.values
    }

    /// Number of rows (dates).
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of columns (assets).
    pub fn n_assets(&self) -> usize {
        self.symbols.len()
    }

    /// Returns whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Returns the cell at (date index, asset index).
    pub fn get(&self, t: usize, a: usize) -> f64 {
        self.values[[t, a]]
    }

    /// Returns whether `other` has identical row and column keys in identical
    /// order.
    pub fn same_keys(&self, other: &Self) -> bool {
        self.dates == other.dates && self.symbols == other.symbols
    }

    /// Returns a copy with rows reordered so dates ascend.
    ///
    /// Panels are expected to arrive sorted; this is the defensive re-sort the
    /// engine applies before computing returns.
    pub fn sorted_by_date(&self) -> Self {
        let mut order: Vec<usize> = (0..self.dates.len()).collect();
        order.sort_by_key(|&i| self.dates[i]);

        if order.iter().enumerate().all(|(i, &j)| i == j) {
            return self.clone();
        }

        let dates = order.iter().map(|&i| self.dates[i]).collect();
        let mut values = Array2::from_elem(self.values.dim(), f64::NAN);
        for (new_row, &old_row) in order.iter().enumerate() {
            values
                .row_mut(new_row)
                .assign(&self.values.row(old_row));
        }

        Self {
            dates,
            symbols: self.symbols.clone(),
            values,
        }
    }

    /// Returns a copy with missing values forward-filled column-wise.
    ///
    /// The last known value of each asset is carried forward; leading gaps
    /// (no prior observation) remain `NaN`.
    pub fn ffill(&self) -> Self {
        let mut values = self.values.clone();
        for mut col in values.columns_mut() {
            let mut last = f64::NAN;
            for v in col.iter_mut() {
                if v.is_finite() {
                    last = *v;
                } else if last.is_finite() {
                    *v = last;
                }
            }
        }

        Self {
            dates: self.dates.clone(),
            symbols: self.symbols.clone(),
            values,
        }
    }

    /// Returns the simple-return panel derived from a price panel.
    ///
    /// Cell (t, a) is the return of asset `a` from t-1 to t. The first row is
    /// `NaN` (no prior price), as is any cell whose own or prior price is
    /// missing or whose prior price is zero.
    pub fn simple_returns(&self) -> Self {
        let (n_rows, n_cols) = self.values.dim();
        let mut returns = Array2::from_elem((n_rows, n_cols), f64::NAN);
        for a in 0..n_cols {
            for t in 1..n_rows {
                let prev = self.values[[t - 1, a]];
                let cur = self.values[[t, a]];
                if prev.is_finite() && cur.is_finite() && prev != 0.0 {
                    returns[[t, a]] = cur / prev - 1.0;
                }
            }
        }

        Self {
            dates: self.dates.clone(),
            symbols: self.symbols.clone(),
            values: returns,
        }
    }

    /// Returns an all-zero panel with the same keys as `self`.
    pub fn zeros_like(&self) -> Self {
        Self {
            dates: self.dates.clone(),
            symbols: self.symbols.clone(),
            values: Array2::zeros(self.values.dim()),
        }
    }
}
