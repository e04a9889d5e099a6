use std::cmp::Ordering;

use beef::lean::Cow;
use itertools::Itertools;

use crate::array::{Array, Shape};
use crate::error::{Error, Result};

#[derive(Clone, PartialEq)]
pub enum Scalar {
    Int(i128),
    Float(f64),
    Text(Cow<'static, str>),
    /// An enclosed array, rank 0 from the outside.
    Boxed(Array),
}

#[derive(Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Array(Array),
}

/// Host-side data on its way into a [`Value`].
#[derive(Clone)]
pub enum Literal {
    Int(i128),
    Float(f64),
    Text(Cow<'static, str>),
    Value(Value),
    List(Vec<Literal>),
}

impl Scalar {
    /// Raw numbers, text and arrays become scalars; scalars pass through.
    /// Raw lists have to be made into arrays first.
    pub fn coerce(literal: impl Into<Literal>) -> Result<Scalar> {
        match literal.into() {
            Literal::Int(x) => Ok(Scalar::Int(x)),
            Literal::Float(x) => Ok(Scalar::Float(x)),
            Literal::Text(x) => Ok(Scalar::Text(x)),
            Literal::Value(Value::Scalar(x)) => Ok(x),
            Literal::Value(Value::Array(x)) => Ok(Scalar::Boxed(x)),
            x @ Literal::List(_) => Err(Error::construction(format!(
                "can't create scalar from {x:?}"
            ))),
        }
    }

    /// The wrapped value, with a boxed array handed back as an array.
    pub fn unwrap(&self) -> Value {
        match self {
            Scalar::Boxed(a) => Value::Array(a.clone()),
            x => Value::Scalar(x.clone()),
        }
    }

    pub fn ty(&self) -> &'static str {
        match self {
            Scalar::Int(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::Text(_) => "text",
            Scalar::Boxed(_) => "array",
        }
    }
}

impl Value {
    /// Builds an array value from host literals, see [`Array::from_literal`].
    pub fn array(items: Vec<Literal>) -> Result<Value> {
        Array::from_literal(Literal::List(items)).map(Value::Array)
    }

    /// An operand handed to an operation. Lists are refused like they are
    /// for [`Scalar::coerce`].
    pub(crate) fn coerce(literal: Literal) -> Result<Value> {
        match literal {
            Literal::Value(x) => Ok(x),
            x => Scalar::coerce(x).map(Value::Scalar),
        }
    }

    /// Like [`Value::coerce`], but lists become arrays.
    pub(crate) fn host(literal: Literal) -> Result<Value> {
        match literal {
            x @ Literal::List(_) => Array::from_literal(x).map(Value::Array),
            x => Value::coerce(x),
        }
    }

    /// One item of an array being built from host data.
    pub(crate) fn item(literal: Literal) -> Result<Value> {
        match literal {
            x @ Literal::List(_) => Array::from_literal(x).map(Value::Array),
            x => Scalar::coerce(x).map(Value::Scalar),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Value::Scalar(_) => Shape::scalar(),
            Value::Array(a) => a.shape(),
        }
    }

    pub fn rank(&self) -> usize {
        match self {
            Value::Scalar(_) => 0,
            Value::Array(a) => a.rank(),
        }
    }

    /// Top-level items; a scalar is its own only item.
    pub fn items(&self) -> &[Value] {
        match self {
            Value::Array(a) => a.items(),
            Value::Scalar(_) => std::slice::from_ref(self),
        }
    }

    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Scalar(Scalar::Int(x)) => Some(*x),
            _ => None,
        }
    }

    /// An integer scalar read as a rotation count.
    pub fn to_count(&self) -> Result<isize> {
        self.as_int()
            .and_then(|x| isize::try_from(x).ok())
            .ok_or_else(|| Error::domain(format!("{self:?} is not a count")))
    }

    pub(crate) fn boxed_array(&self) -> Option<&Array> {
        match self {
            Value::Scalar(Scalar::Boxed(a)) => Some(a),
            _ => None,
        }
    }

    /// Encloses an array; scalars are left alone.
    pub fn wrap(&self) -> Value {
        self.clone().boxed()
    }

    pub(crate) fn boxed(self) -> Value {
        match self {
            Value::Array(a) => Value::Scalar(Scalar::Boxed(a)),
            x => x,
        }
    }

    pub fn unwrap(&self) -> Result<Value> {
        match self {
            Value::Scalar(x) => Ok(x.unwrap()),
            Value::Array(_) => Err(Error::domain(format!(
                "can't unwrap value of shape {}",
                self.shape()
            ))),
        }
    }

    /// Runs `f` on every sub-value of rank `r`. Values already below rank `r`
    /// are returned as they are.
    pub fn apply_at_rank(&self, r: usize, f: &impl Fn(&Value) -> Value) -> Value {
        match (self.rank().cmp(&r), self) {
            (Ordering::Equal, _) => f(self),
            (Ordering::Greater, Value::Array(a)) => Value::Array(Array::of(
                a.items().iter().map(|x| x.apply_at_rank(r, f)).collect(),
            )),
            _ => self.clone(),
        }
    }

    pub fn try_apply_at_rank(
        &self,
        r: usize,
        f: &impl Fn(&Value) -> Result<Value>,
    ) -> Result<Value> {
        match (self.rank().cmp(&r), self) {
            (Ordering::Equal, _) => f(self),
            (Ordering::Greater, Value::Array(a)) => a
                .items()
                .iter()
                .map(|x| x.try_apply_at_rank(r, f))
                .collect::<Result<Vec<_>>>()
                .map(|items| Value::Array(Array::of(items))),
            _ => Ok(self.clone()),
        }
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

macro_rules! ints {
    ($($t:ty)+) => {$(
        impl From<$t> for Literal {
            fn from(value: $t) -> Self {
                Self::Int(value as i128)
            }
        }

        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Self::Scalar(Scalar::Int(value as i128))
            }
        }
    )+};
}
ints!(i8 i16 i32 i64 i128 isize u8 u16 u32 u64 usize);

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Int(value as i128)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<&'static str> for Literal {
    fn from(value: &'static str) -> Self {
        Self::Text(Cow::borrowed(value))
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Self::Scalar(Scalar::Text(Cow::borrowed(value)))
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(Cow::owned(value))
    }
}

impl From<Value> for Literal {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&Value> for Literal {
    fn from(value: &Value) -> Self {
        Self::Value(value.clone())
    }
}

impl From<Scalar> for Literal {
    fn from(value: Scalar) -> Self {
        Self::Value(Value::Scalar(value))
    }
}

impl From<Array> for Literal {
    fn from(value: Array) -> Self {
        Self::Value(Value::Array(value))
    }
}

impl From<&Array> for Literal {
    fn from(value: &Array) -> Self {
        Self::Value(Value::Array(value.clone()))
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Literal>, const N: usize> From<[T; N]> for Literal {
    fn from(value: [T; N]) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(x) => write!(f, "{x}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(x) => write!(f, "{:?}", &**x),
            Self::Value(x) => x.fmt(f),
            Self::List(x) => write!(f, "[{:?}]", x.iter().format(", ")),
        }
    }
}
