pub mod config;
pub mod error;
pub mod interpreter;
pub mod object;
pub mod operators;
pub mod recognizer;
pub mod scope;
pub mod stack;
pub mod tokenizer;

pub use config::Config;
pub use error::{PSError, PSResult};
pub use interpreter::{DisplayCallback, Interpreter, Scoping};
pub use object::{Dictionary, PSObject};
pub use operators::Operator;
