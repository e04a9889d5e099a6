//! Nested, rectangular arrays with APL semantics.
//!
//! A [`Value`] is either a [`Scalar`] (a number, some text, or a boxed
//! [`Array`]) or an array of equally shaped values. Every operation takes its
//! operands by reference and builds a fresh value; nothing is mutated in
//! place.
//!
//! ```
//! use kale_apl::ary;
//! let m = ary![[1, 0, 1], [1, 0, 0], [0, 1, 0]]?;
//! assert_eq!(m.hrotate(1), ary![[0, 1, 1], [0, 0, 1], [1, 0, 0]]?);
//! assert_eq!(m.reduce(|a, b| a.add(b))?, ary![2, 1, 1]?);
//! println!("{}", m.wrap());
//! # Ok::<(), kale_apl::Error>(())
//! ```
//!
//! Recursion follows the nesting of the value directly; values nested
//! thousands of levels deep are not supported.

mod array;
mod display;
mod error;
mod exec;
mod value;

pub use array::{Array, Shape};
pub use display::frame;
pub use error::{Annotate, Error, ErrorKind, Result};
pub use exec::Op;
pub use value::{Literal, Scalar, Value};

/// Builds an array [`Value`] from host data, like a nested list literal.
///
/// Nested `[..]` arrays become sub-arrays, [`Value`]s that are arrays become
/// boxed items. Evaluates to a [`Result`].
#[macro_export]
macro_rules! ary {
    ($($x:expr),* $(,)?) => {
        $crate::Value::array(vec![$($crate::Literal::from($x)),*])
    };
}
