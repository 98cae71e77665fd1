use crate::interpreter::config::Config;
use crate::interpreter::error::{PSError, PSResult};
use crate::interpreter::object::PSObject;
use crate::interpreter::operators::Operator;
use crate::interpreter::recognizer::recognize;
use crate::interpreter::scope::{lookup_in, Frame, ScopeStack};
use crate::interpreter::stack::Stack;
use crate::interpreter::tokenizer::tokenize;

// can change to lexical scoping, dynamic is on by default
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Scoping {
    #[default]
    Dynamic,
    Lexical,
}

/// Receives every line the interpreter wants shown: `print` output and the
/// messages of recovered errors.
pub type DisplayCallback = Box<dyn FnMut(&str)>;

pub struct Interpreter {
    pub(crate) op_stack: Stack,
    // where our dictionary operations will lay
    pub(crate) dict_stack: ScopeStack,
    pub(crate) scoping: Scoping,
    // latched by quit, only reset clears it
    pub(crate) quit: bool,
    // frames of the named blocks currently running under lexical scoping
    lexical_env: Vec<Frame>,
    // how many blocks are running inside each other right now
    depth: usize,
    config: Config,
    display: DisplayCallback,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Interpreter {
            op_stack: Stack::new(),
            dict_stack: ScopeStack::new(Operator::system_dict()),
            scoping: config.scoping,
            quit: false,
            lexical_env: Vec::new(),
            depth: 0,
            config,
            display: Box::new(|line| println!("{line}")),
        }
    }

    /// Replace the default stdout display.
    pub fn with_display(mut self, display: impl FnMut(&str) + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    /// Feed one line of input. Errors are shown through the display and never
    /// stop the rest of the line; after `quit` this does nothing until `reset`.
    pub fn process_input(&mut self, line: &str) {
        if self.quit {
            tracing::debug!("halted, ignoring input");
            return;
        }
        self.run(line);
    }

    pub fn stack_count(&self) -> usize {
        self.op_stack.count()
    }

    pub fn peek_stack(&self) -> PSResult<&PSObject> {
        self.op_stack.peek().ok_or(PSError::EmptyStack)
    }

    /// Operand stack, bottom first.
    pub fn stack(&self) -> &Stack {
        &self.op_stack
    }

    pub fn scoping(&self) -> Scoping {
        self.scoping
    }

    pub fn is_halted(&self) -> bool {
        self.quit
    }

    /// Clears both stacks, reseeds the built-ins and lifts a `quit`.
    pub fn reset(&mut self) {
        tracing::info!("reset");
        self.op_stack.clear();
        self.dict_stack = ScopeStack::new(Operator::system_dict());
        self.scoping = self.config.scoping;
        self.quit = false;
        self.lexical_env.clear();
        self.depth = 0;
    }

    pub(crate) fn emit(&mut self, text: &str) {
        (self.display)(text);
    }

    pub(crate) fn set_scoping(&mut self, scoping: Scoping) {
        tracing::debug!(?scoping, "scoping changed");
        self.scoping = scoping;
    }

    // main loop: for each token, push it as a constant or look it up and dispatch it
    fn run(&mut self, program: &str) {
        for tok in tokenize(program) {
            if self.quit {
                break;
            }
            tracing::trace!(token = %tok, depth = self.depth, "processing");
            let result = match recognize(&tok) {
                Some(obj) => {
                    self.op_stack.push(obj);
                    Ok(())
                }
                None => self.dispatch(&tok),
            };
            if let Err(err) = result {
                tracing::debug!(token = %tok, %err, "token failed");
                self.emit(&err.to_string());
            }
        }
    }

    // Matches if its dynamic or lexical
    fn lookup(&self, name: &str) -> Option<(PSObject, Frame)> {
        match (self.scoping, self.lexical_env.last()) {
            // the block's own dictionary, then the global scope for the built-ins
            (Scoping::Lexical, Some(env)) => {
                lookup_in(env, name).or_else(|| lookup_in(self.dict_stack.global(), name))
            }
            _ => self.dict_stack.lookup(name),
        }
    }

    fn dispatch(&mut self, name: &str) -> PSResult<()> {
        let (value, home) = self
            .lookup(name)
            .ok_or_else(|| PSError::UnresolvedName(name.to_string()))?;
        match value {
            PSObject::Operator(op) => {
                tracing::debug!(op = op.name(), "operator");
                op.execute(self)
            }
            PSObject::Block(code) => match self.scoping {
                Scoping::Dynamic => self.run_block(&code),
                Scoping::Lexical => self.run_lexical(&code, home),
            },
            // variable dereference
            other => {
                self.op_stack.push(other);
                Ok(())
            }
        }
    }

    /// Runs a block in the current environment. Control flow operators use this;
    /// under lexical scoping the block keeps resolving against the environment of
    /// the named block it sits in.
    pub(crate) fn run_block(&mut self, code: &str) -> PSResult<()> {
        if self.depth >= self.config.max_depth {
            return Err(PSError::RecursionLimit(self.config.max_depth));
        }
        self.depth += 1;
        ensure_sufficient_stack(|| self.run(code));
        self.depth -= 1;
        Ok(())
    }

    // a named block under lexical scoping sees the dictionary it was found in
    fn run_lexical(&mut self, code: &str, env: Frame) -> PSResult<()> {
        self.lexical_env.push(env);
        let result = self.run_block(code);
        self.lexical_env.pop();
        result
    }
}

// red zone and growth size for nested block evaluation
#[cfg(not(target_arch = "wasm32"))]
const RED_ZONE: usize = 100 * 1024;
#[cfg(not(target_arch = "wasm32"))]
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

// wasm manages its own stack
#[inline]
#[cfg(target_arch = "wasm32")]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    // interpreter plus everything it displayed
    fn capture() -> (Interpreter, Rc<RefCell<Vec<String>>>) {
        let out = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&out);
        let interp =
            Interpreter::new().with_display(move |line| sink.borrow_mut().push(line.to_string()));
        (interp, out)
    }

    fn run(program: &str) -> (Interpreter, Vec<String>) {
        let (mut interp, out) = capture();
        for line in program.lines() {
            interp.process_input(line);
        }
        let lines = out.borrow().clone();
        (interp, lines)
    }

    fn stack_of(interp: &Interpreter) -> Vec<PSObject> {
        interp.stack().iter().cloned().collect()
    }

    #[test]
    fn constants_are_pushed() {
        let (interp, out) = run("4 4.0 true (hi there) { 1 2 } /x");
        assert_eq!(
            stack_of(&interp),
            vec![
                PSObject::Int(4),
                PSObject::Real(4.0),
                PSObject::Bool(true),
                PSObject::String("hi there".into()),
                PSObject::Block("1 2".into()),
                PSObject::Name("x".into()),
            ]
        );
        assert!(out.is_empty());
    }

    #[test]
    fn add_across_lines() {
        let (interp, _) = run("1\n1\nadd");
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Int(2)));
        let (interp, _) = run("1 2.5 add");
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Real(3.5)));
        let (interp, _) = run("2.5 2.5 add");
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Int(5)));
    }

    #[test]
    fn arithmetic_chain() {
        let (interp, _) = run("7 5 sub 3 mul 4 idiv 10 3 mod add");
        // (7-5)*3 = 6, 6 idiv 4 = 1, 10 mod 3 = 1
        assert_eq!(stack_of(&interp), vec![PSObject::Int(2)]);
        let (interp, _) = run("7 2 div");
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Real(3.5)));
    }

    #[test]
    fn unresolved_name_does_not_abort_the_line() {
        let (interp, out) = run("1 bogus 2 add");
        assert_eq!(out, vec!["undefined: 'bogus' not found"]);
        assert_eq!(stack_of(&interp), vec![PSObject::Int(3)]);
    }

    #[test]
    fn underflow_leaves_the_stack_alone() {
        let (interp, out) = run("1 add");
        assert_eq!(
            out,
            vec!["stackunderflow: 'add' needs 2 operand(s), found 1"]
        );
        assert_eq!(stack_of(&interp), vec![PSObject::Int(1)]);
    }

    #[test]
    fn type_errors_restore_operands_in_order() {
        let (interp, out) = run("(a) 1 add");
        assert_eq!(out, vec!["typecheck: operand types not supported by 'add'"]);
        assert_eq!(
            stack_of(&interp),
            vec![PSObject::String("a".into()), PSObject::Int(1)]
        );
    }

    #[test]
    fn divide_by_zero_keeps_depth() {
        for program in ["4 0 div", "4.5 0 div", "4 0 mod", "4 0 idiv"] {
            let (interp, out) = run(program);
            assert_eq!(interp.stack_count(), 2, "{program}");
            assert_eq!(out.len(), 1, "{program}");
            assert!(out[0].starts_with("undefinedresult"), "{program}");
        }
    }

    #[test]
    fn stack_operators() {
        let (interp, _) = run("1 2 exch");
        assert_eq!(stack_of(&interp), vec![PSObject::Int(2), PSObject::Int(1)]);
        let (interp, _) = run("1 2 3 2 copy");
        assert_eq!(interp.stack_count(), 5);
        let (interp, _) = run("1 2 3 10 copy count");
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Int(6)));
        let (interp, _) = run("1 2 pop 5 dup count");
        assert_eq!(
            stack_of(&interp),
            vec![
                PSObject::Int(1),
                PSObject::Int(5),
                PSObject::Int(5),
                PSObject::Int(3)
            ]
        );
        let (interp, _) = run("1 2 3 clear");
        assert_eq!(interp.stack_count(), 0);
    }

    #[test]
    fn print_formats_per_kind() {
        let (interp, out) = run("true = 42 = 2.50 = (hi there) print { 1 2 } == /x print 3.0 =");
        assert_eq!(out, vec!["True", "42", "2.5", "hi there", "1 2", "x", "3.0"]);
        assert_eq!(interp.stack_count(), 0);
    }

    #[test]
    fn pstack_shows_top_first_without_popping() {
        let (interp, out) = run("1 (two) 3 pstack");
        assert_eq!(out, vec!["3", "two", "1"]);
        assert_eq!(interp.stack_count(), 3);
    }

    #[test]
    fn dictionaries() {
        let (interp, _) = run("5 dict dup maxlength exch length");
        assert_eq!(stack_of(&interp), vec![PSObject::Int(5), PSObject::Int(0)]);
        let (interp, out) = run("2 dict begin /a 1 def /b (x) def end a");
        assert_eq!(out, vec!["undefined: 'a' not found"]);
        assert_eq!(interp.stack_count(), 0);
    }

    #[test]
    fn def_and_lookup() {
        let (interp, _) = run("/x 5 def x x add");
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Int(10)));
        let (_, out) = run("/sq { dup mul } def 7 sq =");
        assert_eq!(out, vec!["49"]);
    }

    #[test]
    fn end_on_global_scope_is_a_noop() {
        let (interp, out) = run("end end /x 1 def x");
        assert!(out.is_empty());
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Int(1)));
    }

    #[test]
    fn string_operators() {
        let (_, out) = run("(hello) length = (abc) 0 get = (hello world) 6 5 getinterval print");
        assert_eq!(out, vec!["5", "97", "world"]);
        let (_, out) = run("(hello world) 6 (there) putinterval print");
        assert_eq!(out, vec!["hello there"]);
        let (interp, out) = run("(abc) 2 (xyz) putinterval");
        assert_eq!(
            out,
            vec!["rangecheck: putinterval source does not fit in destination"]
        );
        assert_eq!(interp.stack_count(), 3);
    }

    #[test]
    fn comparisons_and_logic() {
        let (_, out) = run("1 1.00001 eq = 1 2 ne = 3 2 gt = 3 2 lt = (a) (a) eq =");
        assert_eq!(out, vec!["True", "True", "True", "False", "True"]);
        let (_, out) = run("true false and = true false or = false not = 12 10 and = 12 10 or = 0 not =");
        assert_eq!(out, vec!["False", "True", "True", "8", "14", "-1"]);
    }

    #[test]
    fn conditionals() {
        let (_, out) = run("3 2 gt { (yes) print } if 2 3 gt { (no) print } if");
        assert_eq!(out, vec!["yes"]);
        let (_, out) = run("false { (a) } { (b) } ifelse print");
        assert_eq!(out, vec!["b"]);
        let (interp, out) = run("1 { 2 } if");
        assert_eq!(out, vec!["typecheck: operand types not supported by 'if'"]);
        assert_eq!(
            stack_of(&interp),
            vec![PSObject::Int(1), PSObject::Block("2".into())]
        );
    }

    #[test]
    fn loops() {
        let (interp, _) = run("0 1 5 1 { 1 add } for");
        assert_eq!(stack_of(&interp), vec![PSObject::Int(5)]);
        let (interp, _) = run("0 2 10 2 { 1 add } for");
        assert_eq!(stack_of(&interp), vec![PSObject::Int(5)]);
        let (interp, _) = run("0 5 1 -1 { 1 add } for");
        assert_eq!(stack_of(&interp), vec![PSObject::Int(5)]);
        let (interp, _) = run("1 3 { 2 mul } repeat");
        assert_eq!(stack_of(&interp), vec![PSObject::Int(8)]);
        let (interp, _) = run("/n 0 def 4 { /n n 1 add def } repeat n");
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Int(4)));
    }

    #[test]
    fn zero_step_for_is_rejected() {
        let (interp, out) = run("1 5 0 { 1 } for");
        assert_eq!(out, vec!["rangecheck: operand out of range in 'for'"]);
        assert_eq!(interp.stack_count(), 4);
    }

    #[test]
    fn nested_control_flow() {
        let (_, out) = run("1 3 1 { 2 { (x) print } repeat } for");
        assert_eq!(out.len(), 6);
        let (_, out) = run("/fact { dup 1 gt { dup 1 sub fact mul } if } def 5 fact =");
        assert_eq!(out, vec!["120"]);
    }

    #[test]
    fn runaway_recursion_hits_the_limit() {
        let (mut interp, out) = capture();
        interp.config.max_depth = 32;
        interp.process_input("/f { f } def f (after) print");
        let out = out.borrow();
        assert_eq!(
            *out,
            vec![
                "execstackoverflow: blocks nested deeper than 32".to_string(),
                "after".to_string()
            ]
        );
    }

    #[test]
    fn exec_runs_a_block() {
        let (interp, _) = run("{ 2 3 add } exec");
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Int(5)));
    }

    #[test]
    fn quit_latches_until_reset() {
        let (mut interp, out) = capture();
        interp.process_input("1 quit 2");
        assert!(interp.is_halted());
        interp.process_input("3");
        assert_eq!(interp.stack_count(), 1);

        interp.reset();
        assert!(!interp.is_halted());
        assert_eq!(interp.stack_count(), 0);
        interp.process_input("4 5 add =");
        assert_eq!(*out.borrow(), vec!["9".to_string()]);
    }

    #[test]
    fn quit_inside_a_loop_stops_it() {
        let (interp, _) = run("0 10 { 1 add dup 3 eq { quit } if } repeat");
        assert!(interp.is_halted());
        assert_eq!(interp.peek_stack(), Ok(&PSObject::Int(3)));
    }

    #[test]
    fn reset_forgets_definitions_and_scoping() {
        let (mut interp, out) = capture();
        interp.process_input("/x 1 def changescoping 1 dict begin");
        assert_eq!(interp.scoping(), Scoping::Lexical);
        interp.reset();
        assert_eq!(interp.scoping(), Scoping::Dynamic);
        interp.process_input("x");
        assert_eq!(*out.borrow(), vec!["undefined: 'x' not found".to_string()]);
    }

    #[test]
    fn peek_on_empty_stack_fails() {
        let interp = Interpreter::new();
        assert_eq!(interp.peek_stack(), Err(PSError::EmptyStack));
    }

    #[test]
    fn scoping_switches() {
        let (interp, _) = run("changescoping");
        assert_eq!(interp.scoping(), Scoping::Lexical);
        let (interp, _) = run("changescoping changescoping");
        assert_eq!(interp.scoping(), Scoping::Dynamic);
        let (interp, _) = run("lexical dynamic lexical");
        assert_eq!(interp.scoping(), Scoping::Lexical);
    }
}
