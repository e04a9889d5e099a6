use codespan_reporting::diagnostic::{Diagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::Chars;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use comat::cformat as cmt;
use kale_apl::{Error, ErrorKind};

/// Returns the value, or reports the error against `code` (the APL
/// expression being evaluated) and exits.
pub fn display_execution<T>(x: Result<T, Error>, code: &str) -> T {
    let e = match x {
        Ok(x) => return x,
        Err(e) => e,
    };
    let mut files = SimpleFiles::new();
    let file = files.add("life.apl", code);
    let mut d = Diagnostic::<usize>::new(Severity::Error)
        .with_message(e.name())
        .with_label(
            Label::new(LabelStyle::Primary, file, 0..code.len()).with_message(&e.message),
        );
    if let ErrorKind::ShapeMismatch { left, right } = &e.kind {
        d = d.with_notes(vec![cmt!(
            "{yellow}shapes{reset}: {left} on the left, {right} on the right"
        )]);
    }
    d = d.with_notes(e.notes.iter().map(|n| cmt!("{yellow}while{reset}: {n}")).collect());

    let writer = StandardStream::stderr(ColorChoice::Auto);
    let mut config = codespan_reporting::term::Config::default();
    config.chars = Chars::box_drawing();
    if let Err(x) = codespan_reporting::term::emit(&mut writer.lock(), &config, &files, &d) {
        eprintln!("{}", e);
        eprintln!("(could not render diagnostic: {x})");
    }
    std::process::exit(2);
}
