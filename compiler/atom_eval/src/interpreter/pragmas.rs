//! Lex-time pragmas.

use atom_lexer::PragmaHandler;

use super::Interpreter;
use crate::runtime::read_code;

/// Runs `load-file` and `reference` pragmas against an interpreter.
pub(super) struct Pragmas<'i> {
    interpreter: &'i mut Interpreter,
}

impl<'i> Pragmas<'i> {
    pub(super) fn new(interpreter: &'i mut Interpreter) -> Self {
        Pragmas { interpreter }
    }
}

impl PragmaHandler for Pragmas<'_> {
    fn load_file(&mut self, name: &str) -> Result<String, String> {
        tracing::debug!(name, "pragma load-file");
        read_code(&self.interpreter.base_dir, name).map_err(|err| err.to_string())
    }

    fn reference(&mut self, module: &str, namespaces: &[String]) -> Result<(), String> {
        tracing::debug!(module, ?namespaces, "pragma reference");
        self.interpreter
            .reference(module, namespaces)
            .map_err(|err| err.to_string())
    }
}
