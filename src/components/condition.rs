use crate::document::Element;
use crate::functions::Parameter;
use crate::properties::PropertyStore;
use crate::resources::errors::{FcsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    fn parse(token: &str) -> Option<Self> {
        let cmp = match token {
            "==" | "eq" | "EQ" => Comparison::Eq,
            "!=" | "ne" | "NE" => Comparison::Ne,
            "<" | "lt" | "LT" => Comparison::Lt,
            "<=" | "le" | "LE" => Comparison::Le,
            ">" | "gt" | "GT" => Comparison::Gt,
            ">=" | "ge" | "GE" => Comparison::Ge,
            _ => return None,
        };
        Some(cmp)
    }

    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

/// A boolean test: either one comparison or a group of nested tests.
#[derive(Debug, Clone)]
pub enum Condition {
    Compare {
        lhs: Parameter,
        cmp: Comparison,
        rhs: Parameter,
    },
    Group {
        logic: Logic,
        conditions: Vec<Condition>,
    },
}

impl Condition {
    /// Parses a `lhs op rhs` line such as `ap/altitude-hold ge 1`.
    pub fn parse_line(line: &str, store: &dyn PropertyStore) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [lhs, op, rhs] = tokens.as_slice() else {
            return Err(FcsError::StructuralConfig(format!(
                "malformed condition '{}'",
                line
            )));
        };
        let cmp = Comparison::parse(op).ok_or_else(|| {
            FcsError::StructuralConfig(format!("unknown comparison '{}' in '{}'", op, line))
        })?;
        Ok(Condition::Compare {
            lhs: Parameter::parse(lhs, store)?,
            cmp,
            rhs: Parameter::parse(rhs, store)?,
        })
    }

    /// Builds a group from a `<test>` (or `<condition>`) element: one
    /// comparison per text line plus any nested groups.
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let logic = match element.attribute_or("logic", "AND") {
            "AND" | "and" => Logic::And,
            "OR" | "or" => Logic::Or,
            other => {
                return Err(FcsError::StructuralConfig(format!(
                    "unknown logic '{}' in {}",
                    other,
                    element.describe()
                )))
            }
        };

        let mut conditions = element
            .data_lines()
            .into_iter()
            .map(|line| Self::parse_line(line, store))
            .collect::<Result<Vec<_>>>()?;
        for nested in element
            .children()
            .filter(|child| matches!(child.name(), "test" | "condition"))
        {
            conditions.push(Self::from_element(nested, store)?);
        }

        if conditions.is_empty() {
            return Err(FcsError::StructuralConfig(format!(
                "{} has no conditions",
                element.describe()
            )));
        }
        Ok(Condition::Group { logic, conditions })
    }

    pub fn evaluate(&self) -> bool {
        match self {
            Condition::Compare { lhs, cmp, rhs } => cmp.holds(lhs.value(), rhs.value()),
            Condition::Group {
                logic: Logic::And,
                conditions,
            } => conditions.iter().all(Condition::evaluate),
            Condition::Group {
                logic: Logic::Or,
                conditions,
            } => conditions.iter().any(Condition::evaluate),
        }
    }

    pub fn property_paths(&self) -> Vec<String> {
        match self {
            Condition::Compare { lhs, rhs, .. } => [lhs, rhs]
                .into_iter()
                .filter_map(|p| p.path().map(str::to_string))
                .collect(),
            Condition::Group { conditions, .. } => conditions
                .iter()
                .flat_map(Condition::property_paths)
                .collect(),
        }
    }
}
