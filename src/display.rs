use std::fmt::{Debug, Display, Formatter, Result};

use itertools::Itertools;

use crate::array::Array;
use crate::value::{Scalar, Value};

fn width(line: &str) -> usize {
    line.chars().count()
}

fn pad(line: &str, to: usize, right: bool) -> String {
    let fill = " ".repeat(to.saturating_sub(width(line)));
    if right {
        fill + line
    } else {
        format!("{line}{fill}")
    }
}

/// Draws a box around `text`, as wide as its widest line.
pub fn frame(text: &str) -> String {
    let lines = text.lines().collect_vec();
    let size = lines.iter().map(|l| width(l)).max().unwrap_or(0);
    std::iter::once(format!("┌{}┐", "─".repeat(size)))
        .chain(lines.iter().map(|l| format!("│{}│", pad(l, size, false))))
        .chain([format!("└{}┘", "─".repeat(size))])
        .join("\n")
}

/// A rendered cell and how it sits in a wider column.
struct Block {
    lines: Vec<String>,
    right: bool,
}

impl Block {
    fn of(value: &Value) -> Self {
        Block {
            lines: value.to_string().lines().map(str::to_owned).collect(),
            right: matches!(value, Value::Scalar(Scalar::Int(_) | Scalar::Float(_))),
        }
    }

    fn width(&self) -> usize {
        self.lines.iter().map(|l| width(l)).max().unwrap_or(0)
    }
}

/// Lays blocks out left to right, `spacing` columns apart. `widths` gives
/// each block's column width; blocks are top-aligned.
fn side_by_side(blocks: &[Block], widths: &[usize], spacing: usize) -> Vec<String> {
    let height = blocks.iter().map(|b| b.lines.len()).max().unwrap_or(0);
    let gap = " ".repeat(spacing);
    (0..height)
        .map(|i| {
            let line = blocks
                .iter()
                .zip(widths)
                .map(|(b, &w)| pad(b.lines.get(i).map_or("", String::as_str), w, b.right))
                .join(&gap);
            line.trim_end().to_owned()
        })
        .collect()
}

fn is_text(value: &Value) -> bool {
    matches!(value, Value::Scalar(Scalar::Text(_)))
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Scalar::Int(x) => write!(f, "{x}"),
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::Text(x) => f.write_str(x),
            Scalar::Boxed(a) => f.write_str(&frame(&a.to_string())),
        }
    }
}

impl Display for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let rank = self.rank();
        if rank == 1 && self.items().iter().all(is_text) {
            return write!(f, "{}", self.items().iter().format(""));
        }
        let spacing = (rank + 1) / 2;
        if rank == 2 {
            return f.write_str(&self.matrix());
        }
        if rank % 2 == 0 {
            return write!(f, "{}", self.items().iter().format(&"\n".repeat(spacing)));
        }
        let blocks = self.items().iter().map(Block::of).collect_vec();
        let widths = blocks.iter().map(Block::width).collect_vec();
        write!(f, "{}", side_by_side(&blocks, &widths, spacing).join("\n"))
    }
}

impl Array {
    /// Rows one per line, columns padded to their widest cell.
    fn matrix(&self) -> String {
        let rows = self
            .items()
            .iter()
            .map(|row| row.items().iter().map(Block::of).collect_vec())
            .collect_vec();
        let columns = rows[0].len();
        let widths = (0..columns)
            .map(|j| rows.iter().map(|row| row[j].width()).max().unwrap_or(0))
            .collect_vec();
        self.items()
            .iter()
            .zip(&rows)
            .flat_map(|(row, blocks)| {
                let spacing = if row.items().iter().all(is_text) { 0 } else { 1 };
                side_by_side(blocks, &widths, spacing)
            })
            .join("\n")
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Value::Scalar(x) => Display::fmt(x, f),
            Value::Array(x) => Display::fmt(x, f),
        }
    }
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Scalar::Int(x) => write!(f, "{x}"),
            Scalar::Float(x) => write!(f, "{x:?}"),
            Scalar::Text(x) => write!(f, "{:?}", &**x),
            Scalar::Boxed(a) => write!(f, "<{a:?}>"),
        }
    }
}

impl Debug for Array {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "[{:?}]", self.items().iter().format(", "))
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Value::Scalar(x) => Debug::fmt(x, f),
            Value::Array(x) => Debug::fmt(x, f),
        }
    }
}
