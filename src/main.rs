use clap::Parser;
use comat::cformat as cmt;
use kale_apl::{Annotate, Error, Literal, Result, Value, ary};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod ui;

/// John Scholes' one-line Game of Life, which `life` spells out step by step.
const LIFE: &str = "Life←{↑1 ⍵∨.∧3 4=+/,¯1 0 1∘.⊖¯1 0 1∘.⌽⊂⍵}";

#[derive(Parser, Debug)]
#[command(name = "kale-apl")]
#[command(about = "Conway's Game of Life built from nested array primitives", long_about = None)]
struct Args {
    /// Number of generations to print at the end
    #[arg(short, long, default_value_t = 5)]
    generations: usize,

    /// Side length of the square board
    #[arg(short, long, default_value_t = 5)]
    size: usize,

    /// Starting cells as 0s and 1s, repeated as needed to fill the board
    #[arg(short, long, default_value = "00000001100110000100")]
    pattern: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    ui::display_execution(run(&args), LIFE);
}

fn board(args: &Args) -> Result<Value> {
    let cells = args
        .pattern
        .chars()
        .map(|c| match c {
            '0' => Ok(Literal::from(0)),
            '1' => Ok(Literal::from(1)),
            c => Err(Error::construction(format!("can't create cell from {c:?}"))),
        })
        .collect::<Result<Vec<_>>>()
        .note("the pattern is a string of 0s and 1s")?;
    Value::array(cells)?.reshape(&[args.size, args.size])
}

fn offsets() -> Result<Value> {
    ary![-1, 0, 1]
}

fn heading(text: &str) {
    println!("{}", cmt!("{cyan}{text}{reset}"));
}

/// One generation: count each cell's neighbourhood (itself included) by
/// summing the 9 shifted copies of the board, then keep cells whose count is
/// 3, or 4 where the cell was already alive.
fn life(current: &Value) -> Result<Value> {
    let offsets = offsets()?;
    current
        .wrap()
        .product(&offsets, |g, o| Ok(g.hrotate(o.to_count()?)))?
        .product(&offsets, |g, o| Ok(g.vrotate(o.to_count()?)))?
        .flatten(Some(1))
        .reduce(|a, b| a.add(b))?
        .eq(ary![3, 4]?)?
        .zip(&ary![1, current]?, |a, b| a.and(b))?
        .reduce(|a, b| a.or(b))?
        .unwrap()
}

fn run(args: &Args) -> Result<()> {
    let current = board(args)?;
    debug!(shape = %current.shape(), "starting board");
    let offsets = offsets()?;

    heading("Current:");
    println!("{current}");

    heading("Rotate:");
    println!("{}", current.hrotate(1));

    let rotated = current
        .wrap()
        .product(&offsets, |g, o| Ok(g.hrotate(o.to_count()?)))?;
    heading("Rotate 3 times:");
    println!("{rotated}");

    let rotated = rotated.product(&offsets, |g, o| Ok(g.vrotate(o.to_count()?)))?;
    heading("Rotate 9 times:");
    println!("{rotated}");

    heading("Rotate 9 times and sum:");
    println!(
        "{}",
        rotated
            .reduce(|a, b| a.add(b))?
            .reduce(|a, b| a.add(b))?
    );

    let compared = rotated
        .flatten(Some(1))
        .reduce(|a, b| a.add(b))?
        .eq(ary![3, 4]?)?;
    heading("...then compare with 3 & 4");
    println!("{compared}");

    let masked = compared.zip(&ary![1, &current]?, |a, b| a.and(b))?;
    heading("...then AND with 1 and source");
    println!("{masked}");

    let next = masked.reduce(|a, b| a.or(b))?;
    heading("...then OR both");
    println!("{next}");

    heading("...and unwrap");
    println!("{}", next.unwrap()?);

    let mut generations = vec![current];
    while generations.len() < args.generations {
        let next = life(&generations[generations.len() - 1])?;
        generations.push(next);
    }
    heading(&format!("{} generations:", generations.len()));
    println!("{}", Value::array(generations.iter().map(Literal::from).collect())?);
    Ok(())
}
