use std::ops::Deref;

use itertools::Itertools;
use tinyvec::TinyVec;

use crate::error::{Annotate, Error, Result};
use crate::value::{Literal, Scalar, Value};

/// Dimension lengths, outermost first. Scalars have the empty shape.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: TinyVec<[usize; 3]>,
}

impl Shape {
    pub fn scalar() -> Self {
        Shape {
            dims: TinyVec::new(),
        }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    fn under(mut self, len: usize) -> Self {
        self.dims.insert(0, len);
        self
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.dims
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Shape {
            dims: dims.iter().copied().collect(),
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.dims.iter().format(" "))
    }
}

impl std::fmt::Debug for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// A non-empty run of values that all share one shape.
///
/// Operations inside the crate build arrays through [`Array::of`] and keep the
/// shared-shape rule themselves; host data goes through [`Array::new`] or
/// [`Array::from_literal`], which check it.
#[derive(Clone, PartialEq)]
pub struct Array {
    items: Vec<Value>,
}

impl Array {
    pub(crate) fn of(items: Vec<Value>) -> Self {
        debug_assert!(!items.is_empty(), "arrays hold at least one item");
        Array { items }
    }

    pub fn new(items: Vec<Value>) -> Result<Self> {
        let Some(first) = items.first() else {
            return Err(Error::construction("can't create array from []"));
        };
        let shape = first.shape();
        if let Some(odd) = items.iter().map(Value::shape).find(|s| *s != shape) {
            return Err(Error::shape_mismatch(shape, odd))
                .note("items of an array must all have one shape");
        }
        Ok(Array { items })
    }

    /// Builds an array the way a nested host list reads: inner lists become
    /// sub-arrays, arrays given as items are boxed, anything else is coerced
    /// to a scalar. A non-list literal gives a one-item array.
    pub fn from_literal(literal: impl Into<Literal>) -> Result<Self> {
        let items = match literal.into() {
            Literal::List(items) => items,
            other => vec![other],
        };
        items
            .into_iter()
            .map(Value::item)
            .collect::<Result<Vec<_>>>()
            .and_then(Array::new)
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn shape(&self) -> Shape {
        self.items[0].shape().under(self.items.len())
    }

    pub fn rank(&self) -> usize {
        1 + self.items[0].rank()
    }
}

impl Value {
    /// Cycles the leaves of `self` until there are enough of them to fill
    /// `dims`, then folds them into nested arrays, innermost dimension first.
    /// `[2, 3, 4]` therefore gives two 3×4 planes, leaves in row-major order.
    pub fn reshape(&self, dims: &[usize]) -> Result<Value> {
        let Some((_, inner)) = dims.split_first() else {
            return Err(Error::construction("can't reshape into an empty shape"));
        };
        if dims.contains(&0) {
            return Err(Error::construction(format!(
                "can't reshape into {}",
                Shape::from(dims)
            ))
            .note("arrays hold at least one item"));
        }
        let source = self.flatten(None);
        let source = source.items();
        let total = dims
            .iter()
            .try_fold(1usize, |n, &d| n.checked_mul(d))
            .ok_or_else(|| {
                Error::construction(format!("can't reshape into {}", Shape::from(dims)))
                    .note("too many items")
            })?;
        tracing::trace!(
            source = source.len(),
            repeats = total.div_ceil(source.len()),
            "reshape to {}",
            Shape::from(dims)
        );
        let mut level = source.iter().cycle().take(total).cloned().collect_vec();
        for &dim in inner.iter().rev() {
            level = level
                .chunks(dim)
                .map(|group| Value::Array(Array::of(group.to_vec())))
                .collect();
        }
        Ok(Value::Array(Array::of(level)))
    }

    /// Splices away `levels` levels of array nesting (all of them for
    /// `None`). Boxed scalars are left closed.
    pub fn flatten(&self, levels: Option<usize>) -> Value {
        match (self, levels) {
            (Value::Scalar(_), _) | (_, Some(0)) => self.clone(),
            (Value::Array(a), _) => {
                let levels = levels.map(|l| l - 1);
                Value::Array(Array::of(
                    a.items()
                        .iter()
                        .flat_map(|item| item.flatten(levels).items().to_vec())
                        .collect(),
                ))
            }
        }
    }

    /// Rotates every row left by `count` places (right for negative counts).
    pub fn hrotate(&self, count: isize) -> Value {
        if let Some(boxed) = self.boxed_array() {
            return Value::Array(boxed.clone()).hrotate(count).boxed();
        }
        self.apply_at_rank(1, &|row| {
            let mut items = row.items().to_vec();
            let n = items.len() as isize;
            items.rotate_left(count.rem_euclid(n) as usize);
            Value::Array(Array::of(items))
        })
    }

    /// Rotates the rows of every matrix up by `count` places.
    pub fn vrotate(&self, count: isize) -> Value {
        if let Some(boxed) = self.boxed_array() {
            return Value::Array(boxed.clone()).vrotate(count).boxed();
        }
        self.apply_at_rank(2, &|matrix| {
            matrix.transpose().hrotate(count).transpose()
        })
    }

    /// Swaps the two leading axes. Values of rank below 2 come back as they
    /// are.
    pub fn transpose(&self) -> Value {
        let Value::Array(rows) = self else {
            return self.clone();
        };
        if rows.rank() < 2 {
            return self.clone();
        }
        let columns = rows.items()[0].items().len();
        Value::Array(Array::of(
            (0..columns)
                .map(|j| {
                    Value::Array(Array::of(
                        rows.items().iter().map(|row| row.items()[j].clone()).collect(),
                    ))
                })
                .collect(),
        ))
    }

    /// APL take: the first `dims[0]` items, or the last `-dims[0]`, each
    /// taken again with the remaining dims. Missing items are filled with
    /// zeros.
    pub fn take(&self, dims: &[isize]) -> Result<Value> {
        let Some((&dim, rest)) = dims.split_first() else {
            return Ok(self.clone());
        };
        let Value::Array(array) = self else {
            let dims = dims.iter().map(|d| d.unsigned_abs()).collect_vec();
            return self.reshape(&dims);
        };
        if dim == 0 {
            return Err(Error::construction("can't take 0 items"))
                .note("arrays hold at least one item");
        }
        let zero = Value::from(0);
        let fill = if rest.is_empty() {
            zero
        } else {
            zero.reshape(&rest.iter().map(|d| d.unsigned_abs()).collect_vec())?
        };
        let Ok(n) = isize::try_from(dim.unsigned_abs()) else {
            return Err(Error::construction(format!("can't take {dim} items")));
        };
        let items = array.items();
        // offset of the first taken position, negative when padding goes in front
        let start = if dim > 0 { 0 } else { items.len() as isize - n };
        if n as usize > items.len() {
            tracing::trace!(have = items.len(), want = n, "take pads with zeros");
        }
        (0..n)
            .map(|i| {
                usize::try_from(start + i)
                    .ok()
                    .and_then(|at| items.get(at))
                    .map_or_else(|| Ok(fill.clone()), |item| item.take(rest))
            })
            .collect::<Result<Vec<_>>>()
            .map(|items| Value::Array(Array::of(items)))
    }

    /// Picks items of `self` by position for every scalar in `index`. Boxed
    /// indices select a nested group and box it. Everything picked by one
    /// array of indices must share a shape.
    pub fn values_at(&self, index: impl Into<Literal>) -> Result<Value> {
        self.select(&Value::host(index.into())?)
    }

    fn select(&self, index: &Value) -> Result<Value> {
        match index {
            Value::Array(group) => self.select_all(group),
            Value::Scalar(Scalar::Boxed(group)) => Ok(self.select_all(group)?.boxed()),
            Value::Scalar(_) => self.select_one(index),
        }
    }

    fn select_all(&self, group: &Array) -> Result<Value> {
        group
            .items()
            .iter()
            .map(|i| self.select(i))
            .collect::<Result<Vec<_>>>()
            .and_then(Array::new)
            .map(Value::Array)
            .note("in selection")
    }

    fn select_one(&self, index: &Value) -> Result<Value> {
        let items = self.items();
        let at = index
            .as_int()
            .ok_or_else(|| Error::domain(format!("can't index with {index:?}")))?;
        let len = items.len() as i128;
        let pos = if at < 0 { at + len } else { at };
        usize::try_from(pos)
            .ok()
            .and_then(|p| items.get(p))
            .cloned()
            .ok_or_else(|| Error::index(at, items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ary;

    #[test]
    fn shape_counts_outer_items_first() -> Result<()> {
        let a = ary![[[1, 2, 3], [4, 5, 6]]]?;
        assert_eq!(*a.shape(), [1, 2, 3]);
        assert_eq!(a.rank(), 3);
        for item in a.items() {
            assert_eq!(*item.shape(), [2, 3]);
        }
        Ok(())
    }

    #[test]
    fn ragged_lists_are_rejected() {
        let e = ary![[1, 2], 3].unwrap_err();
        assert_eq!(e.message, "shape mismatch [2] vs []");
        assert!(ary![].is_err());
    }

    #[test]
    fn reshape() -> Result<()> {
        assert_eq!(
            ary![1, 1, 1, 1, 0, 0, 0, 1, 0]?.reshape(&[3, 3])?,
            ary![[1, 1, 1], [1, 0, 0], [0, 1, 0]]?
        );
        assert_eq!(
            ary![1, 2, 3, 4]?.reshape(&[3, 3])?,
            ary![[1, 2, 3], [4, 1, 2], [3, 4, 1]]?
        );
        assert_eq!(ary![1, 2, 3, 4, 5]?.reshape(&[2])?, ary![1, 2]?);
        Ok(())
    }

    #[test]
    fn reshape_three_axes_keeps_axis_order() -> Result<()> {
        let r = ary![1, 2, 3, 4, 5]?.reshape(&[2, 3, 4])?;
        assert_eq!(*r.shape(), [2, 3, 4]);
        assert_eq!(r.items()[1].items()[0], ary![3, 4, 5, 1]?);
        Ok(())
    }

    #[test]
    fn reshape_rejects_empty_shapes() -> Result<()> {
        assert!(ary![1]?.reshape(&[]).is_err());
        assert!(ary![1]?.reshape(&[2, 0]).is_err());
        assert_eq!(
            ary![1]?.reshape(&[usize::MAX, 2]).unwrap_err().kind,
            crate::ErrorKind::Construction
        );
        Ok(())
    }

    #[test]
    fn flatten() -> Result<()> {
        assert_eq!(ary![1, 2, 3]?.flatten(None), ary![1, 2, 3]?);
        assert_eq!(ary![1, 2, 3]?.flatten(Some(1)), ary![1, 2, 3]?);
        assert_eq!(ary![[1, 2], [3, 4]]?.flatten(None), ary![1, 2, 3, 4]?);
        Ok(())
    }

    #[test]
    fn flatten_by_levels_stops_at_boxes() -> Result<()> {
        let cube = ary![[[1, 2], [3, 4]], [[5, 6], [7, 8]]]?;
        assert_eq!(cube.flatten(Some(1)), ary![[1, 2], [3, 4], [5, 6], [7, 8]]?);
        assert_eq!(cube.flatten(Some(0)), cube);

        let boxed = ary![ary![1, 2]?, ary![3, 4]?]?;
        assert_eq!(boxed.flatten(None), boxed);
        Ok(())
    }

    #[test]
    fn hrotate() -> Result<()> {
        let m = ary![[1, 0, 1], [1, 0, 0], [0, 1, 0]]?;
        assert_eq!(m.hrotate(1), ary![[0, 1, 1], [0, 0, 1], [1, 0, 0]]?);
        assert_eq!(m.hrotate(-1), ary![[1, 1, 0], [0, 1, 0], [0, 0, 1]]?);
        assert_eq!(m.hrotate(3), m);
        Ok(())
    }

    #[test]
    fn vrotate() -> Result<()> {
        let m = ary![[1, 0, 1], [1, 0, 0], [0, 1, 0]]?;
        assert_eq!(m.vrotate(1), ary![[1, 0, 0], [0, 1, 0], [1, 0, 1]]?);
        assert_eq!(m.vrotate(-1), ary![[0, 1, 0], [1, 0, 1], [1, 0, 0]]?);
        Ok(())
    }

    #[test]
    fn rotations_lift_over_planes_and_boxes() -> Result<()> {
        let planes = ary![[[1, 2], [3, 4]], [[5, 6], [7, 8]]]?;
        assert_eq!(
            planes.vrotate(1),
            ary![[[3, 4], [1, 2]], [[7, 8], [5, 6]]]?
        );
        let boxed = ary![[1, 2, 3]]?.wrap();
        assert_eq!(boxed.hrotate(1), ary![[2, 3, 1]]?.wrap());
        assert_eq!(Value::from(7).hrotate(1), Value::from(7));
        Ok(())
    }

    #[test]
    fn transpose() -> Result<()> {
        let m = ary![[1, 2, 3], [4, 5, 6]]?;
        assert_eq!(m.transpose(), ary![[1, 4], [2, 5], [3, 6]]?);
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(ary![1, 2]?.transpose(), ary![1, 2]?);
        Ok(())
    }

    #[test]
    fn take() -> Result<()> {
        let v = ary![1, 2, 3, 4]?;
        assert_eq!(v.take(&[2])?, ary![1, 2]?);
        assert_eq!(v.take(&[-2])?, ary![3, 4]?);
        assert_eq!(v.take(&[6])?, ary![1, 2, 3, 4, 0, 0]?);
        assert_eq!(v.take(&[-6])?, ary![0, 0, 1, 2, 3, 4]?);
        assert!(v.take(&[0]).is_err());
        assert!(v.take(&[isize::MIN]).is_err());
        assert_eq!(v.take(&[])?, v);
        Ok(())
    }

    #[test]
    fn take_on_scalars_reshapes() -> Result<()> {
        assert_eq!(Value::from(7).take(&[2, -2])?, ary![[7, 7], [7, 7]]?);
        assert_eq!(Value::from(7).take(&[])?, Value::from(7));
        assert_eq!(
            ary![1, 2]?.take(&[3, 2])?,
            ary![[1, 1], [2, 2], [0, 0]]?
        );
        Ok(())
    }

    #[test]
    fn take_pads_with_zero_arrays() -> Result<()> {
        let m = ary![[1, 2, 3], [4, 5, 6]]?;
        assert_eq!(m.take(&[3, 2])?, ary![[1, 2], [4, 5], [0, 0]]?);
        assert_eq!(m.take(&[-1, -2])?, ary![[5, 6]]?);
        Ok(())
    }

    #[test]
    fn values_at() -> Result<()> {
        let v = ary!["a", "b", "c"]?;
        assert_eq!(v.values_at(ary![2, 0]?)?, ary!["c", "a"]?);
        assert_eq!(v.values_at(-1)?, Value::from("c"));
        assert_eq!(
            v.values_at(ary![0, ary![1, 2]?]?)?,
            ary!["a", ary!["b", "c"]?]?
        );
        Ok(())
    }

    #[test]
    fn values_at_reports_bad_indices() -> Result<()> {
        let v = ary![1, 2]?;
        assert_eq!(
            v.values_at(5).unwrap_err().kind,
            crate::ErrorKind::Index { index: 5, len: 2 }
        );
        assert_eq!(
            v.values_at("x").unwrap_err().kind,
            crate::ErrorKind::Domain
        );
        Ok(())
    }

    #[test]
    fn selections_must_share_a_shape() -> Result<()> {
        let m = ary![[1, 2], [3, 4]]?;
        let e = m.values_at(ary![0, ary![1]?]?).unwrap_err();
        assert_eq!(
            e.kind,
            crate::ErrorKind::ShapeMismatch {
                left: Shape::from(&[2][..]),
                right: Shape::scalar(),
            }
        );
        assert_eq!(
            m.values_at(ary![ary![0]?, ary![1]?]?)?,
            ary![ary![[1, 2]]?, ary![[3, 4]]?]?
        );
        Ok(())
    }
}
