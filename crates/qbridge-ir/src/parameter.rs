//! Angle expressions for gate parameters.
//!
//! Angles are in radians. An expression is either fully numeric or
//! contains free symbols that must be bound before simulation.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;

/// A numeric or symbolic angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant value.
    Constant(f64),
    /// A free symbol.
    Symbol(String),
    /// π.
    Pi,
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Sum.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Difference.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Product.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Quotient.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// A constant angle.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// A free symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// π.
    pub fn pi() -> Self {
        ParameterExpression::Pi
    }

    /// True if any free symbol occurs in the expression.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) | ParameterExpression::Pi => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Numeric value, if the expression has no free symbols.
    ///
    /// Division by zero evaluates to `None`.
    pub fn evaluate(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Pi => Some(PI),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Neg(e) => e.evaluate().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.evaluate()? + b.evaluate()?),
            ParameterExpression::Sub(a, b) => Some(a.evaluate()? - b.evaluate()?),
            ParameterExpression::Mul(a, b) => Some(a.evaluate()? * b.evaluate()?),
            ParameterExpression::Div(a, b) => {
                let d = b.evaluate()?;
                if d == 0.0 { None } else { Some(a.evaluate()? / d) }
            }
        }
    }

    /// Free symbols, sorted by name.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    pub(crate) fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            ParameterExpression::Symbol(name) => {
                out.insert(name.clone());
            }
            ParameterExpression::Constant(_) | ParameterExpression::Pi => {}
            ParameterExpression::Neg(e) => e.collect_symbols(out),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.collect_symbols(out);
                b.collect_symbols(out);
            }
        }
    }

    /// Replace every symbol found in `values`, folding the result to a
    /// constant when nothing symbolic remains.
    pub fn substitute(&self, values: &FxHashMap<String, f64>) -> Self {
        let replaced = self.replace_symbols(values);
        match replaced.evaluate() {
            Some(v) => ParameterExpression::Constant(v),
            None => replaced,
        }
    }

    fn replace_symbols(&self, values: &FxHashMap<String, f64>) -> Self {
        let rec = |e: &ParameterExpression| Box::new(e.replace_symbols(values));
        match self {
            ParameterExpression::Symbol(name) => match values.get(name) {
                Some(v) => ParameterExpression::Constant(*v),
                None => self.clone(),
            },
            ParameterExpression::Constant(_) | ParameterExpression::Pi => self.clone(),
            ParameterExpression::Neg(e) => ParameterExpression::Neg(rec(e)),
            ParameterExpression::Add(a, b) => ParameterExpression::Add(rec(a), rec(b)),
            ParameterExpression::Sub(a, b) => ParameterExpression::Sub(rec(a), rec(b)),
            ParameterExpression::Mul(a, b) => ParameterExpression::Mul(rec(a), rec(b)),
            ParameterExpression::Div(a, b) => ParameterExpression::Div(rec(a), rec(b)),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Pi => write!(f, "pi"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<&str> for ParameterExpression {
    fn from(name: &str) -> Self {
        ParameterExpression::Symbol(name.to_string())
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl std::ops::$trait for ParameterExpression {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                ParameterExpression::$variant(Box::new(self), Box::new(rhs))
            }
        }
    };
}

impl_binary_op!(Add, add, Add);
impl_binary_op!(Sub, sub, Sub);
impl_binary_op!(Mul, mul, Mul);
impl_binary_op!(Div, div, Div);

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}
