use ctrans::{Driver, ErrorKind, Scanner, TranslateError};

use gumdrop::Options;
use rustyline::{error::ReadlineError, Editor};

const HISTORY: &str = ".ctrans_history";

/// Translates assignment statements over doubles into a C program.
#[derive(Debug, Options)]
struct Args {
    #[options(help = "print this help message")]
    help: bool,

    #[options(help = "translate every statement of a file", meta = "FILE")]
    file: Vec<String>,

    #[options(help = "write the C program to a file instead of stdout", meta = "FILE")]
    output: Option<String>,

    #[options(help = "print the tokens of each program instead of translating")]
    tokens: bool,

    #[options(help = "read statements interactively")]
    interactive: bool,

    #[options(free, help = "programs to translate, one statement each")]
    programs: Vec<String>,
}

fn main() {
    #[cfg(feature = "logging")]
    ctrans_log::init();

    let args = Args::parse_args_default_or_exit();

    let mut sources = Vec::new();
    for path in &args.file {
        match std::fs::read_to_string(path) {
            Ok(source) => sources.push(source),
            Err(e) => eprintln!(
                "{}",
                TranslateError::new(ErrorKind::Io {
                    path: path.clone(),
                    message: e.to_string(),
                })
            ),
        }
    }

    if args.tokens {
        for source in sources.iter().chain(args.programs.iter()) {
            print_tokens(source);
        }
        return;
    }

    let mut driver = Driver::new();
    for source in &sources {
        let result = driver.run_program(source);
        report(&mut driver, source, result);
    }
    for program in &args.programs {
        let result = driver.run(program);
        report(&mut driver, program, result);
    }

    if args.interactive || (args.file.is_empty() && args.programs.is_empty()) {
        repl(&mut driver);
    }

    let program = driver.finish();
    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, program) {
                eprintln!("could not write {path}: {e}");
                std::process::exit(1);
            }
        }
        None => print!("{program}"),
    }
}

fn print_tokens(source: &str) {
    let (tokens, diagnostics) = Scanner::scan_all(source);
    for token in tokens {
        println!("{token}");
    }
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}

fn report(driver: &mut Driver, source: &str, result: Result<f64, TranslateError>) {
    for diagnostic in driver.take_diagnostics() {
        eprintln!("{diagnostic}");
    }
    if let Err(e) = result {
        eprintln!("{}", e.report(source));
    }
}

fn repl(driver: &mut Driver) {
    let mut rl = Editor::<()>::new();
    let _ = rl.load_history(HISTORY);

    loop {
        match rl.readline("ctrans> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rl.add_history_entry(line.as_str());

                let result = driver.run_program(&line);
                if let Ok(value) = &result {
                    println!("{value}");
                }
                report(driver, &line, result);
            }
            Err(ReadlineError::Interrupted) => {}
            _ => break,
        }
    }

    let _ = rl.save_history(HISTORY);
}
