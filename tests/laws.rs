use kale_apl::{ErrorKind, Literal, Value};
use proptest::prelude::*;

fn matrix() -> impl Strategy<Value = Vec<Vec<i128>>> {
    (1..6usize, 1..6usize).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(-100..100i128, cols), rows)
    })
}

fn vector() -> impl Strategy<Value = Vec<i128>> {
    prop::collection::vec(-100..100i128, 1..12)
}

fn value(cells: &[Vec<i128>]) -> Value {
    Value::array(cells.iter().cloned().map(Literal::from).collect()).unwrap()
}

fn ints(value: &Value) -> Vec<i128> {
    value
        .flatten(None)
        .items()
        .iter()
        .map(|x| x.as_int().unwrap())
        .collect()
}

proptest! {
    #[test]
    fn scalar_operands_reach_every_leaf(m in matrix(), k in -100..100i128) {
        let sum = value(&m).add(k).unwrap();
        let expected = m
            .iter()
            .map(|row| row.iter().map(|x| x + k).collect())
            .collect::<Vec<Vec<_>>>();
        prop_assert_eq!(sum, value(&expected));
    }

    #[test]
    fn elementwise_results_keep_their_shape(m in matrix()) {
        let a = value(&m);
        prop_assert_eq!(a.mul(&a).unwrap().shape(), a.shape());
        prop_assert_eq!(a.hrotate(2).shape(), a.shape());
        prop_assert_eq!(a.vrotate(-1).shape(), a.shape());
        let t = a.transpose().shape();
        prop_assert_eq!(&*t, &[m[0].len(), m.len()][..]);
    }

    #[test]
    fn unequal_shapes_never_combine(a in vector(), b in vector()) {
        prop_assume!(a.len() != b.len());
        let (a, b) = (value(&[a][..]), value(&[b][..]));
        let e = a.add(&b).unwrap_err();
        prop_assert!(
            matches!(e.kind, ErrorKind::ShapeMismatch { .. }),
            "expected a shape mismatch, got {}",
            e
        );
        prop_assert!(a.zip(&b, |x, y| x.add(y)).is_err());
    }

    #[test]
    fn reshape_wraps_around(v in vector(), rows in 1..5usize, cols in 1..5usize) {
        let source = Value::array(v.iter().copied().map(Literal::from).collect()).unwrap();
        let r = source.reshape(&[rows, cols]).unwrap();
        prop_assert_eq!(&*r.shape(), &[rows, cols][..]);
        let leaves = ints(&r);
        for (i, x) in leaves.iter().enumerate() {
            prop_assert_eq!(*x, v[i % v.len()]);
        }
    }

    #[test]
    fn rotations_undo_each_other(m in matrix(), k in -7..7isize) {
        let a = value(&m);
        prop_assert_eq!(a.hrotate(k).hrotate(-k), a.clone());
        prop_assert_eq!(a.vrotate(k).vrotate(-k), a);
    }

    #[test]
    fn reduce_sums_columns(m in matrix()) {
        let sums = value(&m).reduce(|a, b| a.add(b)).unwrap();
        let expected = (0..m[0].len())
            .map(|j| m.iter().map(|row| row[j]).sum::<i128>())
            .collect::<Vec<_>>();
        prop_assert_eq!(ints(&sums), expected);
    }
}
