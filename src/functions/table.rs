use crate::document::{parse_number, Element};
use crate::functions::Parameter;
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};

/// Lookup table with one or two independent variables.
///
/// One-dimensional data is given as `key value` lines. Two-dimensional data
/// starts with a line of column keys followed by `row_key v1 v2 ...` lines.
/// Lookups interpolate linearly and clamp outside the breakpoints.
#[derive(Debug, Clone)]
pub struct Table {
    row_var: Parameter,
    column_var: Option<Parameter>,
    row_keys: Vec<f64>,
    column_keys: Vec<f64>,
    data: Vec<Vec<f64>>,
}

impl Table {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let mut row_var = None;
        let mut column_var = None;
        for var in element.find_elements("independentVar") {
            let parameter = Parameter::from_element(var, store)?;
            match var.attribute_or("lookup", "row") {
                "row" if row_var.is_none() => row_var = Some(parameter),
                "row" | "column" if column_var.is_none() => column_var = Some(parameter),
                other => {
                    return Err(FcsError::InvalidTable(format!(
                        "unsupported independentVar lookup '{}'",
                        other
                    )))
                }
            }
        }
        let row_var = row_var
            .ok_or_else(|| FcsError::InvalidTable("missing independentVar".to_string()))?;

        let data_element = element
            .find_element("tableData")
            .ok_or_else(|| FcsError::missing("table", "tableData"))?;
        let rows = data_element
            .data_lines()
            .into_iter()
            .map(|line| {
                line.split_whitespace()
                    .map(|token| parse_number("tableData", token))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let table = match column_var {
            None => Self::one_dimensional(row_var, rows)?,
            Some(column_var) => Self::two_dimensional(row_var, column_var, rows)?,
        };
        Ok(table)
    }

    fn one_dimensional(row_var: Parameter, rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(FcsError::InvalidTable("table has no data".to_string()));
        }
        let mut row_keys = Vec::with_capacity(rows.len());
        let mut data = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != 2 {
                return Err(FcsError::InvalidTable(format!(
                    "expected 'key value' pairs, found {} entries",
                    row.len()
                )));
            }
            row_keys.push(row[0]);
            data.push(vec![row[1]]);
        }
        check_ascending(&row_keys)?;
        Ok(Self {
            row_var,
            column_var: None,
            row_keys,
            column_keys: Vec::new(),
            data,
        })
    }

    fn two_dimensional(
        row_var: Parameter,
        column_var: Parameter,
        mut rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if rows.len() < 2 {
            return Err(FcsError::InvalidTable(
                "2-D table needs a column header and at least one row".to_string(),
            ));
        }
        let column_keys = rows.remove(0);
        check_ascending(&column_keys)?;

        let mut row_keys = Vec::with_capacity(rows.len());
        let mut data = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != column_keys.len() + 1 {
                return Err(FcsError::InvalidTable(format!(
                    "row has {} values, expected {}",
                    row.len().saturating_sub(1),
                    column_keys.len()
                )));
            }
            row_keys.push(row[0]);
            data.push(row[1..].to_vec());
        }
        check_ascending(&row_keys)?;
        Ok(Self {
            row_var,
            column_var: Some(column_var),
            row_keys,
            column_keys,
            data,
        })
    }

    /// Looks the table up at the current value of its independent variables.
    pub fn value(&self) -> f64 {
        let row = self.row_var.value();
        match &self.column_var {
            None => self.lookup(row, 0.0),
            Some(column) => self.lookup(row, column.value()),
        }
    }

    pub fn lookup(&self, row: f64, column: f64) -> f64 {
        let (r0, r1, rf) = bracket(&self.row_keys, row);
        if self.column_var.is_none() {
            return self.data[r0][0] + (self.data[r1][0] - self.data[r0][0]) * rf;
        }
        let (c0, c1, cf) = bracket(&self.column_keys, column);
        let low = self.data[r0][c0] + (self.data[r0][c1] - self.data[r0][c0]) * cf;
        let high = self.data[r1][c0] + (self.data[r1][c1] - self.data[r1][c0]) * cf;
        low + (high - low) * rf
    }

    pub fn property_paths(&self) -> Vec<String> {
        [Some(&self.row_var), self.column_var.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|var| var.path().map(str::to_string))
            .collect()
    }
}

fn check_ascending(keys: &[f64]) -> Result<()> {
    if keys.is_empty() {
        return Err(FcsError::InvalidTable("no breakpoints".to_string()));
    }
    if keys.iter().any(|key| !key.is_finite()) {
        return Err(FcsError::InvalidTable("breakpoints must be finite".to_string()));
    }
    if keys.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(FcsError::InvalidTable(
            "breakpoints must be strictly ascending".to_string(),
        ));
    }
    Ok(())
}

/// Indices bracketing `x` and the interpolation factor between them.
/// A NaN key looks up the first breakpoint.
fn bracket(keys: &[f64], x: f64) -> (usize, usize, f64) {
    let last = keys.len() - 1;
    if last == 0 || x.is_nan() || x <= keys[0] {
        return (0, 0, 0.0);
    }
    if x >= keys[last] {
        return (last, last, 0.0);
    }
    let upper = keys.partition_point(|&key| key <= x);
    let lower = upper - 1;
    let factor = (x - keys[lower]) / (keys[upper] - keys[lower]);
    (lower, upper, factor)
}
