use std::fmt::Display;

use beef::lean::Cow;

use crate::array::{Array, Shape};
use crate::error::{Annotate, Error, Result};
use crate::value::{Literal, Scalar, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Xor,
    /// Comparison giving 1 or 0; compares a scalar against every item of an
    /// array instead of requiring equal shapes.
    Eq,
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "×",
            Op::Div => "÷",
            Op::And => "∧",
            Op::Or => "∨",
            Op::Xor => "≠",
            Op::Eq => "=",
        })
    }
}

fn int(op: Op, a: i128, b: i128) -> Result<Scalar> {
    let overflow = || Error::domain(format!("{a} {op} {b} overflows"));
    Ok(Scalar::Int(match op {
        Op::Add => a.checked_add(b).ok_or_else(overflow)?,
        Op::Sub => a.checked_sub(b).ok_or_else(overflow)?,
        Op::Mul => a.checked_mul(b).ok_or_else(overflow)?,
        Op::Div if b == 0 => return Err(Error::domain("division by zero")),
        // rounds toward negative infinity
        Op::Div => {
            let q = a.checked_div(b).ok_or_else(overflow)?;
            if a % b != 0 && (a < 0) != (b < 0) { q - 1 } else { q }
        }
        Op::And => a & b,
        Op::Or => a | b,
        Op::Xor => a ^ b,
        Op::Eq => (a == b) as i128,
    }))
}

fn float(op: Op, a: f64, b: f64) -> Result<Scalar> {
    Ok(match op {
        Op::Add => Scalar::Float(a + b),
        Op::Sub => Scalar::Float(a - b),
        Op::Mul => Scalar::Float(a * b),
        Op::Div => Scalar::Float(a / b),
        Op::Eq => Scalar::Int((a == b) as i128),
        Op::And | Op::Or | Op::Xor => {
            return Err(Error::domain(format!("{op} is not defined for floats")));
        }
    })
}

impl Scalar {
    /// Combines two rank-0 values. A boxed array on the left takes the op
    /// inside the box; a boxed array on the right gets the left value
    /// broadcast over it.
    fn combine(&self, other: &Scalar, op: Op) -> Result<Value> {
        use Scalar::*;
        match (self, other) {
            (Boxed(a), Boxed(b)) => pairwise(a, b, op).map(Value::boxed),
            (Boxed(a), b) => broadcast(a, b, op).map(Value::boxed),
            (a, Boxed(b)) if op == Op::Eq => {
                Value::Scalar(a.clone()).dispatch(&Value::Array(b.clone()), op)
            }
            (a, Boxed(b)) => Value::Array(b.clone())
                .try_apply_at_rank(0, &|leaf| match leaf {
                    Value::Scalar(x) => a.combine(x, op),
                    x => Value::Scalar(a.clone()).dispatch(x, op),
                })
                .map(Value::boxed),
            (Int(a), Int(b)) => int(op, *a, *b).map(Value::Scalar),
            (Float(a), Float(b)) => float(op, *a, *b).map(Value::Scalar),
            (Int(a), Float(b)) => float(op, *a as f64, *b).map(Value::Scalar),
            (Float(a), Int(b)) => float(op, *a, *b as f64).map(Value::Scalar),
            (Text(a), Text(b)) if op == Op::Add => {
                Ok(Value::Scalar(Text(Cow::owned(format!("{}{}", &**a, &**b)))))
            }
            (a, b) if op == Op::Eq => Ok(Value::from((a == b) as i128)),
            (a, b) => Err(Error::domain(format!(
                "{op} is not defined for {} and {}",
                a.ty(),
                b.ty()
            ))),
        }
    }
}

fn broadcast(a: &Array, s: &Scalar, op: Op) -> Result<Value> {
    a.items()
        .iter()
        .map(|item| {
            item.try_apply_at_rank(0, &|leaf| match leaf {
                Value::Scalar(x) => x.combine(s, op),
                x => x.dispatch(&Value::Scalar(s.clone()), op),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(|items| Value::Array(Array::of(items)))
}

fn pairwise(a: &Array, b: &Array, op: Op) -> Result<Value> {
    let (left, right) = (a.shape(), b.shape());
    if left != right {
        return Err(Error::shape_mismatch(left, right));
    }
    a.items()
        .iter()
        .zip(b.items())
        .map(|(x, y)| x.dispatch(y, op))
        .collect::<Result<Vec<_>>>()
        .map(|items| Value::Array(Array::of(items)))
}

#[allow(clippy::should_implement_trait)]
impl Value {
    /// Elementwise `self op other`. A scalar `other` is broadcast over every
    /// leaf of `self`; an array `other` must have the same shape. Raw host
    /// values are coerced to scalars first.
    pub fn op(&self, other: impl Into<Literal>, op: Op) -> Result<Value> {
        let other = Value::coerce(other.into())?;
        self.dispatch(&other, op)
    }

    fn dispatch(&self, other: &Value, op: Op) -> Result<Value> {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a.combine(b, op),
            (Value::Array(a), Value::Scalar(b)) => broadcast(a, b, op),
            (Value::Array(a), Value::Array(b)) => pairwise(a, b, op),
            (Value::Scalar(_), Value::Array(b)) if op == Op::Eq => b
                .items()
                .iter()
                .map(|item| self.dispatch(item, op))
                .collect::<Result<Vec<_>>>()
                .map(|items| Value::Array(Array::of(items))),
            (Value::Scalar(Scalar::Boxed(a)), Value::Array(b)) => {
                pairwise(a, b, op).map(Value::boxed)
            }
            (Value::Scalar(_), Value::Array(b)) => {
                Err(Error::shape_mismatch(Shape::scalar(), b.shape()))
            }
        }
    }

    pub fn add(&self, other: impl Into<Literal>) -> Result<Value> {
        self.op(other, Op::Add)
    }

    pub fn sub(&self, other: impl Into<Literal>) -> Result<Value> {
        self.op(other, Op::Sub)
    }

    pub fn mul(&self, other: impl Into<Literal>) -> Result<Value> {
        self.op(other, Op::Mul)
    }

    pub fn div(&self, other: impl Into<Literal>) -> Result<Value> {
        self.op(other, Op::Div)
    }

    pub fn and(&self, other: impl Into<Literal>) -> Result<Value> {
        self.op(other, Op::And)
    }

    pub fn or(&self, other: impl Into<Literal>) -> Result<Value> {
        self.op(other, Op::Or)
    }

    pub fn xor(&self, other: impl Into<Literal>) -> Result<Value> {
        self.op(other, Op::Xor)
    }

    pub fn eq(&self, other: impl Into<Literal>) -> Result<Value> {
        self.op(other, Op::Eq)
    }

    /// Outer product: one result per item `o` of `other`, each being `self`
    /// combined with `o` (item by item when `self` is an array). Array
    /// results are boxed, so exactly one axis is added.
    pub fn product(
        &self,
        other: &Value,
        op: impl Fn(&Value, &Value) -> Result<Value>,
    ) -> Result<Value> {
        other
            .items()
            .iter()
            .map(|o| match self {
                Value::Scalar(_) => op(self, o).map(Value::boxed),
                Value::Array(a) => a
                    .items()
                    .iter()
                    .map(|i| op(i, o).map(Value::boxed))
                    .collect::<Result<Vec<_>>>()
                    .and_then(Array::new)
                    .map(Value::Array),
            })
            .collect::<Result<Vec<_>>>()
            .and_then(Array::new)
            .map(Value::Array)
            .note("in outer product")
    }

    /// Left fold over the top-level items. A scalar reduces to itself.
    pub fn reduce(&self, op: impl Fn(&Value, &Value) -> Result<Value>) -> Result<Value> {
        let (first, rest) = self
            .items()
            .split_first()
            .ok_or_else(|| Error::domain("can't reduce nothing"))?;
        rest.iter().try_fold(first.clone(), |acc, x| op(&acc, x))
    }

    /// Combines item `i` of `self` with item `i` of `other`, one level deep.
    pub fn zip(
        &self,
        other: &Value,
        op: impl Fn(&Value, &Value) -> Result<Value>,
    ) -> Result<Value> {
        let (left, right) = (self.shape(), other.shape());
        if left != right {
            return Err(Error::shape_mismatch(left, right)).note("can't zip");
        }
        self.items()
            .iter()
            .zip(other.items())
            .map(|(x, y)| op(x, y).map(Value::boxed))
            .collect::<Result<Vec<_>>>()
            .and_then(Array::new)
            .map(Value::Array)
    }
}
