pub mod interpreter;

pub use interpreter::{
    Config, Dictionary, Interpreter, Operator, PSError, PSObject, PSResult, Scoping,
};

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Interpreter handle for a browser front-end. Whatever the interpreter
/// displays while handling a line is handed back as that call's return value.
#[wasm_bindgen]
pub struct Repl {
    interpreter: Interpreter,
    output: Rc<RefCell<Vec<String>>>,
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Repl {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Repl {
        let output = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&output);
        let interpreter = Interpreter::new()
            .with_display(move |line| sink.borrow_mut().push(line.to_string()));
        Repl {
            interpreter,
            output,
        }
    }

    /// Runs one line, returns the lines it displayed joined by newlines.
    pub fn process_input(&mut self, line: &str) -> String {
        self.interpreter.process_input(line);
        let lines: Vec<String> = self.output.borrow_mut().drain(..).collect();
        lines.join("\n")
    }

    pub fn stack_count(&self) -> usize {
        self.interpreter.stack_count()
    }

    pub fn prompt(&self) -> String {
        format!("REPL({})> ", self.interpreter.stack_count())
    }

    pub fn is_halted(&self) -> bool {
        self.interpreter.is_halted()
    }

    pub fn reset(&mut self) {
        self.interpreter.reset();
        self.output.borrow_mut().clear();
    }
}

// one-shot: runs every line of the program in a fresh interpreter
#[wasm_bindgen]
pub fn run_interpreter(input: &str) -> String {
    let mut repl = Repl::new();
    input
        .lines()
        .map(|line| repl.process_input(line))
        .filter(|out| !out.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
