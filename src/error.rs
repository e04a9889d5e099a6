use std::fmt::Display;

use crate::array::Shape;

#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// A host value that cannot become a scalar or an array.
    Construction,
    ShapeMismatch { left: Shape, right: Shape },
    /// The operator is not defined for these operands.
    Domain,
    Index { index: i128, len: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub notes: Vec<String>,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Error {
            kind,
            message: message.into(),
            notes: vec![],
        }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Construction, message)
    }

    pub fn shape_mismatch(left: Shape, right: Shape) -> Self {
        tracing::debug!(%left, %right, "shape mismatch");
        let message = format!("shape mismatch {left} vs {right}");
        Self::new(ErrorKind::ShapeMismatch { left, right }, message)
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Domain, message)
    }

    pub fn index(index: i128, len: usize) -> Self {
        Self::new(
            ErrorKind::Index { index, len },
            format!("index {index} out of range for {len} items"),
        )
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            ErrorKind::Construction => "construction error",
            ErrorKind::ShapeMismatch { .. } => "shape mismatch",
            ErrorKind::Domain => "domain error",
            ErrorKind::Index { .. } => "index error",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name(), self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

pub trait Annotate {
    fn note(self, message: impl Into<String>) -> Self;
}

impl Annotate for Error {
    fn note(mut self, message: impl Into<String>) -> Self {
        self.notes.push(message.into());
        self
    }
}

impl<T> Annotate for Result<T, Error> {
    fn note(self, message: impl Into<String>) -> Self {
        self.map_err(|x| x.note(message))
    }
}

#[test]
fn notes_stack_on_results() {
    let r: Result<()> = Err(Error::domain("no"));
    let e = r.note("while zipping").note("in life").unwrap_err();
    assert_eq!(e.notes, ["while zipping", "in life"]);
    assert_eq!(e.to_string(), "domain error: no\n  note: while zipping\n  note: in life");
}

#[test]
fn mismatch_keeps_both_shapes() {
    let e = Error::shape_mismatch(Shape::from(&[2][..]), Shape::from(&[3, 1][..]));
    assert_eq!(e.message, "shape mismatch [2] vs [3 1]");
    assert!(matches!(e.kind, ErrorKind::ShapeMismatch { .. }));
}
