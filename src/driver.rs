//! Contains `Driver`, which runs a batch of programs against one store.

use crate::{
    compiler::{
        ast::Node,
        output,
        parser::Parser,
        scanner::Diagnostic,
    },
    debug, error,
    error::{ErrorKind, TranslateError},
    runtime::Store,
};

/// Runs programs one after another, sharing a [`Store`] between them and
/// collecting the C code of every program that succeeds.
///
/// A program that fails to parse or evaluate is recorded and contributes no
/// code. It never stops the programs after it.
#[derive(Debug, Default)]
pub struct Driver {
    store: Store,
    code: String,
    errors: Vec<TranslateError>,
    diagnostics: Vec<Diagnostic>,
}

impl Driver {
    pub fn new() -> Self {
        Driver::default()
    }

    /// Parses, evaluates and generates code for the first statement of
    /// `program`, returning its value.
    pub fn run(&mut self, program: &str) -> Result<f64, TranslateError> {
        self.run_with(program, Parser::statement)
    }

    /// Like [`run`](Driver::run), but for every statement of `program`.
    /// Returns the value of the last one.
    ///
    /// Nothing runs if any statement fails to parse. Otherwise statements
    /// run in order, and each one's code is kept as soon as it succeeds, so
    /// the statements before a failing one stay in both the store and the
    /// generated code.
    pub fn run_program(&mut self, program: &str) -> Result<f64, TranslateError> {
        self.run_with(program, Parser::program)
    }

    fn run_with<'a>(
        &mut self,
        program: &'a str,
        parse: fn(&mut Parser<'a>) -> Result<Node<'a>, TranslateError>,
    ) -> Result<f64, TranslateError> {
        debug!("program {:?}", program);

        let mut parser = Parser::new(program);
        let parsed = parse(&mut parser);
        self.diagnostics.extend(parser.take_diagnostics());

        let result = parsed.and_then(|node| {
            debug!("ast {}", node);
            match &node {
                Node::Block { pos, body } => {
                    let mut last = None;
                    for stmt in body {
                        last = Some(self.emit(stmt)?);
                    }
                    last.ok_or_else(|| TranslateError::new(ErrorKind::CannotEvaluate).pos(*pos))
                }
                stmt => self.emit(stmt),
            }
        });

        if let Err(e) = &result {
            error!("{}", e);
            self.errors.push(e.clone());
        }

        result
    }

    fn emit(&mut self, stmt: &Node) -> Result<f64, TranslateError> {
        let value = stmt.evaluate(&mut self.store)?;
        self.code.push_str(&stmt.generate_code());
        self.code.push('\n');
        Ok(value)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Code generated so far, one statement per line.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Every error so far, in order.
    pub fn errors(&self) -> &[TranslateError] {
        &self.errors
    }

    /// Illegal characters skipped since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// The complete C program for everything run so far.
    pub fn finish(&self) -> String {
        output::c_program(&self.code, &self.store)
    }
}

#[cfg(test)]
mod test {
    use super::Driver;

    #[test]
    fn shares_store() {
        let mut driver = Driver::new();
        assert_eq!(driver.run("x = 2;").unwrap(), 2.0);
        assert_eq!(driver.run("y = x * 10;").unwrap(), 20.0);
        assert_eq!(driver.code(), "x = 2;\ny = x*10;\n");
        assert!(driver.errors().is_empty());
    }

    #[test]
    fn errors_do_not_stop_batch() {
        let mut driver = Driver::new();
        assert!(driver.run("a = 1;").is_ok());
        assert!(driver.run("b = ;").unwrap_err().is_syntax());
        assert!(driver.run("c = nope;").unwrap_err().is_evaluation());
        assert_eq!(driver.run("d = a + 1;").unwrap(), 2.0);

        assert_eq!(driver.errors().len(), 2);
        assert_eq!(driver.code(), "a = 1;\nd = a+1;\n");
        assert!(!driver.store().contains("b"));
        assert!(!driver.store().contains("c"));
    }

    #[test]
    fn whole_programs() {
        let mut driver = Driver::new();
        assert_eq!(driver.run_program("a = 3;\nb = a * a;\n").unwrap(), 9.0);
        assert_eq!(driver.code(), "a = 3;\nb = a*a;\n");
        assert!(driver.finish().contains("    double a,b;\n"));
    }

    #[test]
    fn program_failing_partway() {
        let mut driver = Driver::new();
        let err = driver.run_program("a = 1;\nb = nope;\nc = 2;").unwrap_err();
        assert!(err.is_evaluation());
        assert_eq!(err.position(), 11);

        assert!(driver.store().contains("a"));
        assert!(!driver.store().contains("c"));
        assert_eq!(driver.code(), "a = 1;\n");
        let program = driver.finish();
        assert!(program.contains("    double a;\n    a = 1;\n"), "{program}");
    }

    #[test]
    fn every_stored_variable_is_assigned() {
        let mut driver = Driver::new();
        let _ = driver.run_program("x = 2;\ny = x / 4;\nz = y + w;");
        let _ = driver.run_program("w = 1;\nv = -(w;");
        let _ = driver.run_program("");
        assert_eq!(driver.errors().len(), 3);
        for (name, _) in driver.store().iter() {
            assert!(driver.code().contains(&format!("{name} = ")), "{name}");
        }
        assert_eq!(driver.store().len(), 2);
    }

    #[test]
    fn nesting_does_not_stop_batch() {
        let mut driver = Driver::new();
        let deep = format!("x = {}1{};", "(".repeat(5_000), ")".repeat(5_000));
        assert!(driver.run(&deep).unwrap_err().is_syntax());
        assert_eq!(driver.run("y = 1;").unwrap(), 1.0);
    }

    #[test]
    fn diagnostics() {
        let mut driver = Driver::new();
        assert_eq!(driver.run("a = 1 @+ 1;").unwrap(), 2.0);
        let diagnostics = driver.take_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].pos, 6);
        assert!(driver.take_diagnostics().is_empty());
    }
}
