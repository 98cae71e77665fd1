use crate::interpreter::operators::Operator;
use std::collections::HashMap;
use std::fmt;

// enumerated type PSObject to contain every value the language can hold
// we NEED the debug here for us to print out the values of psobject, and when we want to make
// clones of our objects
#[derive(Debug, Clone, PartialEq)]
pub enum PSObject {
    Int(i32),
    Real(f32),
    Bool(bool),
    String(String),
    // literal names, only ever the key side of def
    Name(String),
    // unparsed source of a { } block, tokenized when it runs
    Block(String),
    // built-in routine, never produced by the recognizers
    Operator(Operator),
    Dict(Dictionary),
}

/// Name to value mapping plus the capacity it was created with by `dict`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: HashMap<String, PSObject>,
    capacity: usize,
}

impl Dictionary {
    pub fn new(capacity: usize) -> Self {
        Dictionary {
            // only reported back by maxlength
            entries: HashMap::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    pub fn get(&self, name: &str) -> Option<&PSObject> {
        self.entries.get(name)
    }

    // overwrites an existing binding
    pub fn insert(&mut self, name: impl Into<String>, value: PSObject) {
        self.entries.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity declared at creation (what `maxlength` reports).
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl PSObject {
    /// Re-types a numeric result: a whole number that fits in an `i32` becomes `Int`,
    /// anything else stays `Real`.
    pub fn from_real(r: f32) -> PSObject {
        // i32::MIN is exactly representable, the upper bound is exclusive
        if r.fract() == 0.0 && (i32::MIN as f32..i32::MAX as f32).contains(&r) {
            PSObject::Int(r as i32)
        } else {
            PSObject::Real(r)
        }
    }

    // numeric view used by the mixed int/real operators
    pub fn as_real(&self) -> Option<f32> {
        match self {
            PSObject::Int(n) => Some(*n as f32),
            PSObject::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Short kind name, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            PSObject::Int(_) => "integer",
            PSObject::Real(_) => "float",
            PSObject::Bool(_) => "boolean",
            PSObject::String(_) => "string",
            PSObject::Name(_) => "name",
            PSObject::Block(_) => "block",
            PSObject::Operator(_) => "operator",
            PSObject::Dict(_) => "dict",
        }
    }
}

// fixed point, at most five decimals, trailing zeros trimmed but one decimal kept
fn format_real(r: f32) -> String {
    let mut s = format!("{r:.5}");
    if s.contains('.') {
        while s.ends_with('0') && !s.ends_with(".0") {
            s.pop();
        }
    }
    s
}

// this is what print, = and == show
impl fmt::Display for PSObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PSObject::Int(n) => write!(f, "{n}"),
            PSObject::Real(r) => write!(f, "{}", format_real(*r)),
            PSObject::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            PSObject::String(s) => write!(f, "{s}"),
            PSObject::Name(n) => write!(f, "{n}"),
            PSObject::Block(code) => write!(f, "{code}"),
            PSObject::Operator(op) => write!(f, "--{}--", op.name()),
            PSObject::Dict(d) => write!(f, "{d}"),
        }
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // sorted so the output doesn't depend on hash order
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();
        write!(f, "<<")?;
        for k in keys {
            write!(f, " /{k} {}", self.entries[k])?;
        }
        write!(f, " >>")
    }
}
