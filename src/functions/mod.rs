//! Expression trees evaluated against the property store.
//!
//! A `<function>` element holds exactly one expression. Leaves are
//! `property` (`p`), `value` (`v`) and `table` (`t`); everything else is an
//! operator over its child expressions. Evaluation is total: operations
//! that would produce NaN fall back to `0.0` and division by zero yields
//! `f64::MAX` with the sign of the numerator.

mod parameter;
mod table;

pub use parameter::Parameter;
pub use table::Table;

use crate::document::{parse_number, Element};
use crate::properties::{PropertyNode, PropertyStore};
use crate::resources::errors::{FcsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Sum,
    Difference,
    Product,
    Quotient,
    Pow,
    Abs,
    Sign,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Min,
    Max,
    Avg,
    Fraction,
    Integer,
    Mod,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Not,
    IfThen,
}

impl Op {
    fn from_tag(tag: &str) -> Option<Self> {
        let op = match tag {
            "sum" => Op::Sum,
            "difference" => Op::Difference,
            "product" => Op::Product,
            "quotient" => Op::Quotient,
            "pow" => Op::Pow,
            "abs" => Op::Abs,
            "sign" => Op::Sign,
            "sin" => Op::Sin,
            "cos" => Op::Cos,
            "tan" => Op::Tan,
            "asin" => Op::Asin,
            "acos" => Op::Acos,
            "atan" => Op::Atan,
            "atan2" => Op::Atan2,
            "exp" => Op::Exp,
            "ln" => Op::Ln,
            "log10" => Op::Log10,
            "sqrt" => Op::Sqrt,
            "min" => Op::Min,
            "max" => Op::Max,
            "avg" => Op::Avg,
            "fraction" => Op::Fraction,
            "integer" => Op::Integer,
            "mod" => Op::Mod,
            "lt" => Op::Lt,
            "le" => Op::Le,
            "gt" => Op::Gt,
            "ge" => Op::Ge,
            "eq" => Op::Eq,
            "nq" | "ne" => Op::Ne,
            "and" => Op::And,
            "or" => Op::Or,
            "not" => Op::Not,
            "ifthen" => Op::IfThen,
            _ => return None,
        };
        Some(op)
    }

    /// Allowed argument counts as (min, max).
    fn arity(self) -> (usize, usize) {
        match self {
            Op::Sum
            | Op::Difference
            | Op::Product
            | Op::Min
            | Op::Max
            | Op::Avg
            | Op::And
            | Op::Or => (1, usize::MAX),
            Op::Quotient | Op::Pow | Op::Atan2 | Op::Mod => (2, 2),
            Op::Lt | Op::Le | Op::Gt | Op::Ge | Op::Eq | Op::Ne => (2, 2),
            Op::IfThen => (3, 3),
            _ => (1, 1),
        }
    }
}

#[derive(Debug, Clone)]
enum Expr {
    Value(f64),
    Property(Parameter),
    Table(Box<Table>),
    Apply(Op, Vec<Expr>),
}

impl Expr {
    fn parse(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        match element.name() {
            "value" | "v" => Ok(Expr::Value(parse_number(
                element.name(),
                element.data_line().unwrap_or_default(),
            )?)),
            "property" | "p" => Ok(Expr::Property(Parameter::from_element(element, store)?)),
            "table" | "t" => Ok(Expr::Table(Box::new(Table::from_element(element, store)?))),
            tag => {
                let op = Op::from_tag(tag).ok_or_else(|| {
                    FcsError::StructuralConfig(format!("unknown function operation <{}>", tag))
                })?;
                let args = element
                    .children()
                    .map(|child| Expr::parse(child, store))
                    .collect::<Result<Vec<_>>>()?;
                let (min, max) = op.arity();
                if args.len() < min || args.len() > max {
                    return Err(FcsError::StructuralConfig(format!(
                        "<{}> takes {} argument(s), found {}",
                        tag,
                        if min == max {
                            min.to_string()
                        } else {
                            format!("at least {}", min)
                        },
                        args.len()
                    )));
                }
                Ok(Expr::Apply(op, args))
            }
        }
    }

    fn eval(&self) -> f64 {
        match self {
            Expr::Value(value) => *value,
            Expr::Property(parameter) => parameter.value(),
            Expr::Table(table) => table.value(),
            Expr::Apply(op, args) => {
                let result = apply(*op, args);
                if result.is_nan() {
                    0.0
                } else {
                    result
                }
            }
        }
    }

    fn collect_paths(&self, paths: &mut Vec<String>) {
        match self {
            Expr::Value(_) => {}
            Expr::Property(parameter) => paths.extend(parameter.path().map(str::to_string)),
            Expr::Table(table) => paths.extend(table.property_paths()),
            Expr::Apply(_, args) => args.iter().for_each(|arg| arg.collect_paths(paths)),
        }
    }
}

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn apply(op: Op, args: &[Expr]) -> f64 {
    let arg = |i: usize| args[i].eval();
    match op {
        Op::Sum => args.iter().map(Expr::eval).sum(),
        Op::Difference => {
            let first = arg(0);
            args[1..].iter().fold(first, |acc, e| acc - e.eval())
        }
        Op::Product => args.iter().map(Expr::eval).product(),
        Op::Quotient => {
            let (num, den) = (arg(0), arg(1));
            if den != 0.0 {
                num / den
            } else if num < 0.0 {
                -f64::MAX
            } else {
                f64::MAX
            }
        }
        Op::Pow => arg(0).powf(arg(1)),
        Op::Abs => arg(0).abs(),
        Op::Sign => {
            let x = arg(0);
            if x < 0.0 {
                -1.0
            } else {
                1.0
            }
        }
        Op::Sin => arg(0).sin(),
        Op::Cos => arg(0).cos(),
        Op::Tan => arg(0).tan(),
        Op::Asin => arg(0).clamp(-1.0, 1.0).asin(),
        Op::Acos => arg(0).clamp(-1.0, 1.0).acos(),
        Op::Atan => arg(0).atan(),
        Op::Atan2 => arg(0).atan2(arg(1)),
        Op::Exp => arg(0).exp(),
        Op::Ln => {
            let x = arg(0);
            if x > 0.0 {
                x.ln()
            } else {
                0.0
            }
        }
        Op::Log10 => {
            let x = arg(0);
            if x > 0.0 {
                x.log10()
            } else {
                0.0
            }
        }
        Op::Sqrt => arg(0).max(0.0).sqrt(),
        Op::Min => args.iter().map(Expr::eval).fold(f64::INFINITY, f64::min),
        Op::Max => args.iter().map(Expr::eval).fold(f64::NEG_INFINITY, f64::max),
        Op::Avg => args.iter().map(Expr::eval).sum::<f64>() / args.len() as f64,
        Op::Fraction => arg(0).fract(),
        Op::Integer => arg(0).trunc(),
        Op::Mod => {
            let (x, m) = (arg(0), arg(1));
            if m != 0.0 {
                x % m
            } else {
                0.0
            }
        }
        Op::Lt => truth(arg(0) < arg(1)),
        Op::Le => truth(arg(0) <= arg(1)),
        Op::Gt => truth(arg(0) > arg(1)),
        Op::Ge => truth(arg(0) >= arg(1)),
        Op::Eq => truth(arg(0) == arg(1)),
        Op::Ne => truth(arg(0) != arg(1)),
        Op::And => truth(args.iter().all(|e| e.eval() != 0.0)),
        Op::Or => truth(args.iter().any(|e| e.eval() != 0.0)),
        Op::Not => truth(arg(0) == 0.0),
        Op::IfThen => {
            if arg(0) != 0.0 {
                arg(1)
            } else {
                arg(2)
            }
        }
    }
}

/// A named or anonymous function built from a `<function>` element.
#[derive(Debug, Clone)]
pub struct Function {
    name: Option<String>,
    output: Option<PropertyNode>,
    expr: Expr,
    value: f64,
}

impl Function {
    pub fn from_element(element: &Element, store: &dyn PropertyStore) -> Result<Self> {
        let mut children = element.children();
        let body = children
            .next()
            .ok_or_else(|| FcsError::StructuralConfig("<function> has no expression".to_string()))?;
        if children.next().is_some() {
            return Err(FcsError::StructuralConfig(format!(
                "{} must contain exactly one expression",
                element.describe()
            )));
        }
        let expr = Expr::parse(body, store)?;

        let name = element.attribute("name").map(str::to_string);
        let output = name
            .as_deref()
            .map(|name| {
                store.get_node(name, true).ok_or_else(|| {
                    FcsError::StructuralConfig(format!("invalid function name '{}'", name))
                })
            })
            .transpose()?;

        Ok(Self {
            name,
            output,
            expr,
            value: 0.0,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Evaluates the expression and publishes it to the named property.
    pub fn evaluate(&mut self) -> f64 {
        self.value = self.expr.eval();
        if let Some(output) = &self.output {
            output.set(self.value);
        }
        self.value
    }

    /// Result of the most recent evaluation.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn property_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.expr.collect_paths(&mut paths);
        paths
    }
}
