use crate::interpreter::error::{PSError, PSResult};
use crate::interpreter::interpreter::{Interpreter, Scoping};
use crate::interpreter::object::{Dictionary, PSObject};
use std::cmp::Ordering;

// tolerance for comparisons that involve a float
const EPSILON: f32 = 1e-4;

/// Identifier of a built-in routine. The global scope maps names to these and
/// [`Operator::execute`] is the dispatch table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    // stack
    Exch,
    Pop,
    Copy,
    Dup,
    Clear,
    Count,
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Idiv,
    Abs,
    Neg,
    Ceil,
    Floor,
    Round,
    Sqrt,
    // dictionaries
    Dict,
    Length,
    MaxLength,
    Begin,
    End,
    Def,
    // strings
    Get,
    GetInterval,
    PutInterval,
    // comparison and logic
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
    Not,
    // control
    If,
    IfElse,
    For,
    Repeat,
    Exec,
    Quit,
    // output
    Print,
    PStack,
    // scoping
    ChangeScoping,
    Lexical,
    Dynamic,
}

// everything the global scope gets seeded with, aliases included
const BUILTINS: &[(&str, Operator)] = &[
    ("exch", Operator::Exch),
    ("pop", Operator::Pop),
    ("copy", Operator::Copy),
    ("dup", Operator::Dup),
    ("clear", Operator::Clear),
    ("count", Operator::Count),
    ("add", Operator::Add),
    ("sub", Operator::Sub),
    ("mul", Operator::Mul),
    ("div", Operator::Div),
    ("mod", Operator::Mod),
    ("idiv", Operator::Idiv),
    ("abs", Operator::Abs),
    ("neg", Operator::Neg),
    ("ceil", Operator::Ceil),
    ("ceiling", Operator::Ceil),
    ("floor", Operator::Floor),
    ("round", Operator::Round),
    ("sqrt", Operator::Sqrt),
    ("dict", Operator::Dict),
    ("length", Operator::Length),
    ("maxlength", Operator::MaxLength),
    ("begin", Operator::Begin),
    ("end", Operator::End),
    ("def", Operator::Def),
    ("get", Operator::Get),
    ("getinterval", Operator::GetInterval),
    ("putinterval", Operator::PutInterval),
    ("eq", Operator::Eq),
    ("ne", Operator::Ne),
    ("gt", Operator::Gt),
    ("lt", Operator::Lt),
    ("ge", Operator::Ge),
    ("le", Operator::Le),
    ("and", Operator::And),
    ("or", Operator::Or),
    ("not", Operator::Not),
    ("if", Operator::If),
    ("ifelse", Operator::IfElse),
    ("for", Operator::For),
    ("repeat", Operator::Repeat),
    ("exec", Operator::Exec),
    ("quit", Operator::Quit),
    ("print", Operator::Print),
    ("=", Operator::Print),
    ("==", Operator::Print),
    ("pstack", Operator::PStack),
    ("stack", Operator::PStack),
    ("changescoping", Operator::ChangeScoping),
    ("lexical", Operator::Lexical),
    ("dynamic", Operator::Dynamic),
];

// put the operands back where they were and fail
macro_rules! bail {
    ($self:ident, $operands:expr, $err:expr) => {{
        $self.op_stack.restore($operands);
        return Err($err);
    }};
}

impl Operator {
    /// Fresh global scope with every built-in bound.
    pub fn system_dict() -> Dictionary {
        let mut dict = Dictionary::new(BUILTINS.len());
        for (name, op) in BUILTINS {
            dict.insert(*name, PSObject::Operator(*op));
        }
        dict
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Exch => "exch",
            Operator::Pop => "pop",
            Operator::Copy => "copy",
            Operator::Dup => "dup",
            Operator::Clear => "clear",
            Operator::Count => "count",
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
            Operator::Mod => "mod",
            Operator::Idiv => "idiv",
            Operator::Abs => "abs",
            Operator::Neg => "neg",
            Operator::Ceil => "ceil",
            Operator::Floor => "floor",
            Operator::Round => "round",
            Operator::Sqrt => "sqrt",
            Operator::Dict => "dict",
            Operator::Length => "length",
            Operator::MaxLength => "maxlength",
            Operator::Begin => "begin",
            Operator::End => "end",
            Operator::Def => "def",
            Operator::Get => "get",
            Operator::GetInterval => "getinterval",
            Operator::PutInterval => "putinterval",
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Ge => "ge",
            Operator::Le => "le",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::If => "if",
            Operator::IfElse => "ifelse",
            Operator::For => "for",
            Operator::Repeat => "repeat",
            Operator::Exec => "exec",
            Operator::Quit => "quit",
            Operator::Print => "print",
            Operator::PStack => "pstack",
            Operator::ChangeScoping => "changescoping",
            Operator::Lexical => "lexical",
            Operator::Dynamic => "dynamic",
        }
    }

    // Dispatch to the appropriate operator method
    pub(crate) fn execute(self, interp: &mut Interpreter) -> PSResult<()> {
        match self {
            Operator::Exch => interp.op_stack.exch(),
            Operator::Pop => interp.op_pop(),
            Operator::Copy => interp.op_copy(),
            Operator::Dup => interp.op_stack.dup(),
            Operator::Clear => {
                interp.op_stack.clear();
                Ok(())
            }
            Operator::Count => {
                let n = interp.op_stack.count() as i32;
                interp.op_stack.push(PSObject::Int(n));
                Ok(())
            }
            Operator::Add => interp.binary("add", |a, b| {
                arithmetic("add", a, b, i32::checked_add, |x, y| x + y)
            }),
            Operator::Sub => interp.binary("sub", |a, b| {
                arithmetic("sub", a, b, i32::checked_sub, |x, y| x - y)
            }),
            Operator::Mul => interp.binary("mul", |a, b| {
                arithmetic("mul", a, b, i32::checked_mul, |x, y| x * y)
            }),
            Operator::Div => interp.binary("div", divide),
            Operator::Mod => interp.binary("mod", |a, b| {
                nonzero_divisor("mod", b)?;
                arithmetic("mod", a, b, |x, y| Some(x.wrapping_rem(y)), |x, y| x % y)
            }),
            Operator::Idiv => interp.binary("idiv", |a, b| {
                nonzero_divisor("idiv", b)?;
                arithmetic("idiv", a, b, i32::checked_div, |x, y| (x / y).trunc())
            }),
            Operator::Abs => interp.unary("abs", |a| {
                unary_numeric("abs", a, i32::checked_abs, f32::abs)
            }),
            Operator::Neg => interp.unary("neg", |a| {
                unary_numeric("neg", a, i32::checked_neg, |x| -x)
            }),
            Operator::Ceil => interp.unary("ceil", |a| unary_numeric("ceil", a, Some, f32::ceil)),
            Operator::Floor => {
                interp.unary("floor", |a| unary_numeric("floor", a, Some, f32::floor))
            }
            Operator::Round => {
                interp.unary("round", |a| unary_numeric("round", a, Some, f32::round))
            }
            Operator::Sqrt => interp.unary("sqrt", square_root),
            Operator::Dict => interp.op_dict(),
            Operator::Length => interp.unary("length", |a| match a {
                PSObject::String(s) => Ok(PSObject::Int(s.chars().count() as i32)),
                PSObject::Dict(d) => Ok(PSObject::Int(d.len() as i32)),
                _ => Err(PSError::TypeMismatch { op: "length" }),
            }),
            Operator::MaxLength => interp.unary("maxlength", |a| match a {
                PSObject::Dict(d) => Ok(PSObject::Int(d.capacity() as i32)),
                _ => Err(PSError::TypeMismatch { op: "maxlength" }),
            }),
            Operator::Begin => interp.op_begin(),
            Operator::End => {
                interp.op_end();
                Ok(())
            }
            Operator::Def => interp.op_def(),
            Operator::Get => interp.binary("get", string_get),
            Operator::GetInterval => interp.ternary("getinterval", get_interval),
            Operator::PutInterval => interp.ternary("putinterval", put_interval),
            Operator::Eq => interp.binary("eq", |a, b| {
                equals("eq", a, b).map(PSObject::Bool)
            }),
            Operator::Ne => interp.binary("ne", |a, b| {
                equals("ne", a, b).map(|eq| PSObject::Bool(!eq))
            }),
            Operator::Gt => interp.binary("gt", |a, b| {
                compare("gt", a, b).map(|ord| PSObject::Bool(ord == Ordering::Greater))
            }),
            Operator::Lt => interp.binary("lt", |a, b| {
                compare("lt", a, b).map(|ord| PSObject::Bool(ord == Ordering::Less))
            }),
            Operator::Ge => interp.binary("ge", |a, b| {
                compare("ge", a, b).map(|ord| PSObject::Bool(ord != Ordering::Less))
            }),
            Operator::Le => interp.binary("le", |a, b| {
                compare("le", a, b).map(|ord| PSObject::Bool(ord != Ordering::Greater))
            }),
            Operator::And => interp.binary("and", |a, b| match (a, b) {
                (PSObject::Bool(x), PSObject::Bool(y)) => Ok(PSObject::Bool(*x && *y)),
                (PSObject::Int(x), PSObject::Int(y)) => Ok(PSObject::Int(x & y)),
                _ => Err(PSError::TypeMismatch { op: "and" }),
            }),
            Operator::Or => interp.binary("or", |a, b| match (a, b) {
                (PSObject::Bool(x), PSObject::Bool(y)) => Ok(PSObject::Bool(*x || *y)),
                (PSObject::Int(x), PSObject::Int(y)) => Ok(PSObject::Int(x | y)),
                _ => Err(PSError::TypeMismatch { op: "or" }),
            }),
            Operator::Not => interp.unary("not", |a| match a {
                PSObject::Bool(x) => Ok(PSObject::Bool(!x)),
                PSObject::Int(x) => Ok(PSObject::Int(!x)),
                _ => Err(PSError::TypeMismatch { op: "not" }),
            }),
            Operator::If => interp.op_if(),
            Operator::IfElse => interp.op_ifelse(),
            Operator::For => interp.op_for(),
            Operator::Repeat => interp.op_repeat(),
            Operator::Exec => interp.op_exec(),
            Operator::Quit => {
                tracing::info!("quit requested");
                interp.quit = true;
                Ok(())
            }
            Operator::Print => interp.op_print(),
            Operator::PStack => {
                let lines: Vec<String> =
                    interp.op_stack.iter().rev().map(|obj| obj.to_string()).collect();
                for line in &lines {
                    interp.emit(line);
                }
                Ok(())
            }
            Operator::ChangeScoping => {
                let next = match interp.scoping {
                    Scoping::Dynamic => Scoping::Lexical,
                    Scoping::Lexical => Scoping::Dynamic,
                };
                interp.set_scoping(next);
                Ok(())
            }
            Operator::Lexical => {
                interp.set_scoping(Scoping::Lexical);
                Ok(())
            }
            Operator::Dynamic => {
                interp.set_scoping(Scoping::Dynamic);
                Ok(())
            }
        }
    }
}

// PS ARITHMETIC

// int op int stays integer arithmetic (falling back to float on overflow),
// anything involving a float is done in float; the result is re-typed either way
fn arithmetic(
    op: &'static str,
    a: &PSObject,
    b: &PSObject,
    int_op: fn(i32, i32) -> Option<i32>,
    real_op: fn(f32, f32) -> f32,
) -> PSResult<PSObject> {
    if let (PSObject::Int(x), PSObject::Int(y)) = (a, b) {
        return Ok(match int_op(*x, *y) {
            Some(n) => PSObject::Int(n),
            None => PSObject::from_real(real_op(*x as f32, *y as f32)),
        });
    }
    match (a.as_real(), b.as_real()) {
        (Some(x), Some(y)) => Ok(PSObject::from_real(real_op(x, y))),
        _ => Err(PSError::TypeMismatch { op }),
    }
}

fn nonzero_divisor(op: &'static str, divisor: &PSObject) -> PSResult<()> {
    match divisor.as_real() {
        Some(d) if d == 0.0 => Err(PSError::DivideByZero { op }),
        _ => Ok(()),
    }
}

// always a true division; exact integer quotients stay exact
fn divide(a: &PSObject, b: &PSObject) -> PSResult<PSObject> {
    let (Some(x), Some(y)) = (a.as_real(), b.as_real()) else {
        return Err(PSError::TypeMismatch { op: "div" });
    };
    nonzero_divisor("div", b)?;
    if let (PSObject::Int(n), PSObject::Int(d)) = (a, b) {
        if n.checked_rem(*d) == Some(0) {
            if let Some(q) = n.checked_div(*d) {
                return Ok(PSObject::Int(q));
            }
        }
    }
    Ok(PSObject::from_real(x / y))
}

fn unary_numeric(
    op: &'static str,
    a: &PSObject,
    int_op: fn(i32) -> Option<i32>,
    real_op: fn(f32) -> f32,
) -> PSResult<PSObject> {
    match a {
        PSObject::Int(n) => Ok(match int_op(*n) {
            Some(n) => PSObject::Int(n),
            None => PSObject::from_real(real_op(*n as f32)),
        }),
        PSObject::Real(r) => Ok(PSObject::from_real(real_op(*r))),
        _ => Err(PSError::TypeMismatch { op }),
    }
}

// integers truncate
fn square_root(a: &PSObject) -> PSResult<PSObject> {
    match a {
        PSObject::Int(n) if *n < 0 => Err(PSError::RangeCheck { op: "sqrt" }),
        PSObject::Int(n) => Ok(PSObject::Int((*n as f64).sqrt() as i32)),
        PSObject::Real(r) if *r < 0.0 => Err(PSError::RangeCheck { op: "sqrt" }),
        PSObject::Real(r) => Ok(PSObject::from_real(r.sqrt())),
        _ => Err(PSError::TypeMismatch { op: "sqrt" }),
    }
}

// COMPARISONS LOGIC

fn equals(op: &'static str, a: &PSObject, b: &PSObject) -> PSResult<bool> {
    match (a, b) {
        (PSObject::Int(x), PSObject::Int(y)) => Ok(x == y),
        (PSObject::String(x), PSObject::String(y)) => Ok(x == y),
        (PSObject::Bool(x), PSObject::Bool(y)) => Ok(x == y),
        (PSObject::Name(x), PSObject::Name(y)) => Ok(x == y),
        _ => match (a.as_real(), b.as_real()) {
            (Some(x), Some(y)) => Ok((x - y).abs() < EPSILON),
            _ => Err(PSError::TypeMismatch { op }),
        },
    }
}

fn compare(op: &'static str, a: &PSObject, b: &PSObject) -> PSResult<Ordering> {
    match (a, b) {
        (PSObject::Int(x), PSObject::Int(y)) => Ok(x.cmp(y)),
        (PSObject::String(x), PSObject::String(y)) => Ok(x.cmp(y)),
        _ => match (a.as_real(), b.as_real()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).ok_or(PSError::TypeMismatch { op }),
            _ => Err(PSError::TypeMismatch { op }),
        },
    }
}

// STRING OPERATIONS

fn index(op: &'static str, i: i32) -> PSResult<usize> {
    usize::try_from(i).map_err(|_| PSError::RangeCheck { op })
}

// character code at an index
fn string_get(s: &PSObject, i: &PSObject) -> PSResult<PSObject> {
    let (PSObject::String(s), PSObject::Int(i)) = (s, i) else {
        return Err(PSError::TypeMismatch { op: "get" });
    };
    let c = s
        .chars()
        .nth(index("get", *i)?)
        .ok_or(PSError::RangeCheck { op: "get" })?;
    Ok(PSObject::Int(c as i32))
}

fn get_interval(s: &PSObject, start: &PSObject, len: &PSObject) -> PSResult<PSObject> {
    let (PSObject::String(s), PSObject::Int(start), PSObject::Int(len)) = (s, start, len) else {
        return Err(PSError::TypeMismatch { op: "getinterval" });
    };
    let start = index("getinterval", *start)?;
    let len = index("getinterval", *len)?;
    if start + len > s.chars().count() {
        return Err(PSError::RangeCheck { op: "getinterval" });
    }
    Ok(PSObject::String(s.chars().skip(start).take(len).collect()))
}

// a new string, the destination operand itself is not modified
fn put_interval(dest: &PSObject, at: &PSObject, src: &PSObject) -> PSResult<PSObject> {
    let (PSObject::String(dest), PSObject::Int(at), PSObject::String(src)) = (dest, at, src) else {
        return Err(PSError::TypeMismatch { op: "putinterval" });
    };
    let at = index("putinterval", *at)?;
    let src_len = src.chars().count();
    if at + src_len > dest.chars().count() {
        return Err(PSError::IntervalOverflow);
    }
    let mut out: String = dest.chars().take(at).collect();
    out.push_str(src);
    out.extend(dest.chars().skip(at + src_len));
    Ok(PSObject::String(out))
}

impl Interpreter {
    // pops one operand, pushes the result, or puts the operand back on failure
    fn unary(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&PSObject) -> PSResult<PSObject>,
    ) -> PSResult<()> {
        let operands = self.op_stack.pop_array::<1>(op)?;
        let [a] = &operands;
        match f(a) {
            Ok(result) => {
                self.op_stack.push(result);
                Ok(())
            }
            Err(err) => bail!(self, operands, err),
        }
    }

    fn binary(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&PSObject, &PSObject) -> PSResult<PSObject>,
    ) -> PSResult<()> {
        let operands = self.op_stack.pop_array::<2>(op)?;
        let [a, b] = &operands;
        match f(a, b) {
            Ok(result) => {
                self.op_stack.push(result);
                Ok(())
            }
            Err(err) => bail!(self, operands, err),
        }
    }

    fn ternary(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&PSObject, &PSObject, &PSObject) -> PSResult<PSObject>,
    ) -> PSResult<()> {
        let operands = self.op_stack.pop_array::<3>(op)?;
        let [a, b, c] = &operands;
        match f(a, b, c) {
            Ok(result) => {
                self.op_stack.push(result);
                Ok(())
            }
            Err(err) => bail!(self, operands, err),
        }
    }

    // PS STACK OPERATION

    fn op_pop(&mut self) -> PSResult<()> {
        self.op_stack.pop_array::<1>("pop")?;
        Ok(())
    }

    fn op_copy(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<1>("copy")? {
            [PSObject::Int(n)] if n >= 0 => {
                self.op_stack.copy(n as usize);
                Ok(())
            }
            [PSObject::Int(n)] => bail!(self, [PSObject::Int(n)], PSError::RangeCheck { op: "copy" }),
            operands => bail!(self, operands, PSError::TypeMismatch { op: "copy" }),
        }
    }

    // DICTIONARY OPERATIONS

    // create a new dictionary with specified size
    fn op_dict(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<1>("dict")? {
            [PSObject::Int(n)] if n >= 0 => {
                self.op_stack.push(PSObject::Dict(Dictionary::new(n as usize)));
                Ok(())
            }
            [PSObject::Int(n)] => bail!(self, [PSObject::Int(n)], PSError::RangeCheck { op: "dict" }),
            operands => bail!(self, operands, PSError::TypeMismatch { op: "dict" }),
        }
    }

    // pop a dict and push it in as a new scope
    fn op_begin(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<1>("begin")? {
            [PSObject::Dict(d)] => {
                self.dict_stack.push(d);
                tracing::debug!(depth = self.dict_stack.depth(), "begin");
                Ok(())
            }
            operands => bail!(self, operands, PSError::TypeMismatch { op: "begin" }),
        }
    }

    // a lone global scope is left alone
    fn op_end(&mut self) {
        match self.dict_stack.pop() {
            Some(_) => tracing::debug!(depth = self.dict_stack.depth(), "end"),
            None => tracing::debug!("end with only the global scope, ignored"),
        }
    }

    // pop a value and literal name into the current top scope
    fn op_def(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<2>("def")? {
            [PSObject::Name(name), value] => {
                tracing::debug!(name = %name, kind = value.kind(), "def");
                self.dict_stack.define(name, value);
                Ok(())
            }
            operands => bail!(self, operands, PSError::TypeMismatch { op: "def" }),
        }
    }

    // CONTROL STATEMENTS

    fn op_if(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<2>("if")? {
            [PSObject::Bool(cond), PSObject::Block(code)] => {
                if cond {
                    self.run_block(&code)?;
                }
                Ok(())
            }
            operands => bail!(self, operands, PSError::TypeMismatch { op: "if" }),
        }
    }

    fn op_ifelse(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<3>("ifelse")? {
            [PSObject::Bool(cond), PSObject::Block(yes), PSObject::Block(no)] => {
                let code = if cond { yes } else { no };
                self.run_block(&code)
            }
            operands => bail!(self, operands, PSError::TypeMismatch { op: "ifelse" }),
        }
    }

    // counts from start while the counter hasn't passed end, in the direction of step
    fn op_for(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<4>("for")? {
            [PSObject::Int(start), PSObject::Int(end), PSObject::Int(step), PSObject::Block(code)] => {
                if step == 0 {
                    bail!(
                        self,
                        [
                            PSObject::Int(start),
                            PSObject::Int(end),
                            PSObject::Int(step),
                            PSObject::Block(code)
                        ],
                        PSError::RangeCheck { op: "for" }
                    );
                }
                let in_range: fn(i32, i32) -> bool = if step > 0 {
                    |v, l| v <= l
                } else {
                    |v, l| v >= l
                };
                let mut counter = start;
                while in_range(counter, end) && !self.quit {
                    self.run_block(&code)?;
                    counter = match counter.checked_add(step) {
                        Some(next) => next,
                        None => break,
                    };
                }
                Ok(())
            }
            operands => bail!(self, operands, PSError::TypeMismatch { op: "for" }),
        }
    }

    fn op_repeat(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<2>("repeat")? {
            [PSObject::Int(n), PSObject::Block(code)] if n >= 0 => {
                for _ in 0..n {
                    if self.quit {
                        break;
                    }
                    self.run_block(&code)?;
                }
                Ok(())
            }
            [PSObject::Int(n), PSObject::Block(code)] => bail!(
                self,
                [PSObject::Int(n), PSObject::Block(code)],
                PSError::RangeCheck { op: "repeat" }
            ),
            operands => bail!(self, operands, PSError::TypeMismatch { op: "repeat" }),
        }
    }

    fn op_exec(&mut self) -> PSResult<()> {
        match self.op_stack.pop_array::<1>("exec")? {
            [PSObject::Block(code)] => self.run_block(&code),
            operands => bail!(self, operands, PSError::TypeMismatch { op: "exec" }),
        }
    }

    // PRINTING LOGIC
    fn op_print(&mut self) -> PSResult<()> {
        let [obj] = self.op_stack.pop_array::<1>("print")?;
        self.emit(&obj.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(n: i32) -> PSObject {
        PSObject::Int(n)
    }

    fn real(r: f32) -> PSObject {
        PSObject::Real(r)
    }

    fn string(s: &str) -> PSObject {
        PSObject::String(s.into())
    }

    #[test]
    fn every_builtin_is_in_the_system_dict() {
        let dict = Operator::system_dict();
        for (name, op) in BUILTINS {
            assert_eq!(dict.get(name), Some(&PSObject::Operator(*op)));
        }
        assert_eq!(dict.get("ceiling"), Some(&PSObject::Operator(Operator::Ceil)));
        assert_eq!(dict.get("=="), Some(&PSObject::Operator(Operator::Print)));
    }

    #[test]
    fn primary_names_resolve_to_themselves() {
        let dict = Operator::system_dict();
        for (_, op) in BUILTINS {
            assert_eq!(dict.get(op.name()), Some(&PSObject::Operator(*op)));
        }
    }

    #[test]
    fn int_arithmetic_stays_integer() {
        let add = |a, b| arithmetic("add", &a, &b, i32::checked_add, |x, y| x + y);
        assert_eq!(add(int(1), int(1)), Ok(int(2)));
        assert_eq!(add(int(1), real(2.5)), Ok(real(3.5)));
        assert_eq!(add(real(2.5), int(1)), Ok(real(3.5)));
        // whole float results are re-typed
        assert_eq!(add(real(2.5), real(2.5)), Ok(int(5)));
        assert_eq!(
            add(string("a"), int(1)),
            Err(PSError::TypeMismatch { op: "add" })
        );
    }

    #[test]
    fn overflow_falls_back_to_real() {
        let mul = arithmetic("mul", &int(i32::MAX), &int(2), i32::checked_mul, |x, y| x * y);
        assert!(matches!(mul, Ok(PSObject::Real(_))));
    }

    #[test]
    fn division() {
        assert_eq!(divide(&int(6), &int(3)), Ok(int(2)));
        assert_eq!(divide(&int(7), &int(2)), Ok(real(3.5)));
        assert_eq!(divide(&real(5.0), &int(2)), Ok(real(2.5)));
        assert_eq!(
            divide(&int(1), &int(0)),
            Err(PSError::DivideByZero { op: "div" })
        );
        assert_eq!(
            divide(&real(1.5), &int(0)),
            Err(PSError::DivideByZero { op: "div" })
        );
        assert_eq!(
            divide(&int(1), &PSObject::Bool(true)),
            Err(PSError::TypeMismatch { op: "div" })
        );
        assert!(matches!(divide(&int(i32::MIN), &int(-1)), Ok(PSObject::Real(_))));
    }

    #[test]
    fn unary_ops() {
        let abs = |a| unary_numeric("abs", &a, i32::checked_abs, f32::abs);
        assert_eq!(abs(int(-4)), Ok(int(4)));
        assert_eq!(abs(real(-2.5)), Ok(real(2.5)));
        let ceil = |a| unary_numeric("ceil", &a, Some, f32::ceil);
        assert_eq!(ceil(int(3)), Ok(int(3)));
        assert_eq!(ceil(real(2.1)), Ok(int(3)));
        let floor = |a| unary_numeric("floor", &a, Some, f32::floor);
        assert_eq!(floor(real(-2.1)), Ok(int(-3)));
        assert_eq!(square_root(&int(10)), Ok(int(3)));
        assert_eq!(square_root(&real(2.25)), Ok(real(1.5)));
        assert_eq!(
            square_root(&int(-1)),
            Err(PSError::RangeCheck { op: "sqrt" })
        );
    }

    #[test]
    fn equality_uses_a_tolerance_across_types() {
        assert_eq!(equals("eq", &int(3), &real(3.00001)), Ok(true));
        assert_eq!(equals("eq", &int(3), &real(3.1)), Ok(false));
        assert_eq!(equals("eq", &string("a"), &string("a")), Ok(true));
        assert_eq!(
            equals("eq", &PSObject::Bool(true), &PSObject::Bool(false)),
            Ok(false)
        );
        assert_eq!(
            equals("eq", &string("1"), &int(1)),
            Err(PSError::TypeMismatch { op: "eq" })
        );
    }

    #[test]
    fn ordering() {
        assert_eq!(compare("gt", &int(2), &real(1.5)), Ok(Ordering::Greater));
        assert_eq!(compare("lt", &int(1), &int(2)), Ok(Ordering::Less));
        assert_eq!(compare("lt", &string("a"), &string("b")), Ok(Ordering::Less));
        assert_eq!(
            compare("gt", &PSObject::Bool(true), &int(1)),
            Err(PSError::TypeMismatch { op: "gt" })
        );
    }

    #[test]
    fn string_access() {
        assert_eq!(string_get(&string("abc"), &int(1)), Ok(int(98)));
        assert_eq!(
            string_get(&string("abc"), &int(3)),
            Err(PSError::RangeCheck { op: "get" })
        );
        assert_eq!(
            get_interval(&string("hello world"), &int(6), &int(5)),
            Ok(string("world"))
        );
        assert_eq!(
            get_interval(&string("abc"), &int(2), &int(5)),
            Err(PSError::RangeCheck { op: "getinterval" })
        );
        assert_eq!(
            put_interval(&string("hello world"), &int(6), &string("there")),
            Ok(string("hello there"))
        );
        assert_eq!(
            put_interval(&string("abc"), &int(2), &string("xyz")),
            Err(PSError::IntervalOverflow)
        );
    }
}
