// turns a single token into a constant, or gives up so the token can be dispatched
use crate::interpreter::object::PSObject;

type Recognizer = fn(&str) -> Option<PSObject>;

// order matters: first match wins
const RECOGNIZERS: [(&str, Recognizer); 5] = [
    ("numeric", numeric),
    ("boolean", boolean),
    ("string", string),
    ("block", code_block),
    ("name", variable_name),
];

/// Runs the recognizer chain over `tok`. `None` means "not a constant".
pub fn recognize(tok: &str) -> Option<PSObject> {
    RECOGNIZERS.iter().find_map(|(kind, recognizer)| {
        let obj = recognizer(tok)?;
        tracing::trace!(token = tok, kind, "recognized constant");
        Some(obj)
    })
}

// anything float-parseable; it is an integer when there is no '.' and the
// value is whole and fits an i32, so "1e3" is 1000
fn numeric(tok: &str) -> Option<PSObject> {
    let r: f32 = tok.parse().ok()?;
    // "inf" and "nan" parse as floats, they are names here
    if !r.is_finite() {
        return None;
    }
    if tok.contains('.') {
        return Some(PSObject::Real(r));
    }
    // exact for integers past f32 precision
    match tok.parse::<i32>() {
        Ok(n) => Some(PSObject::Int(n)),
        Err(_) => Some(PSObject::from_real(r)),
    }
}

fn boolean(tok: &str) -> Option<PSObject> {
    match tok {
        "true" => Some(PSObject::Bool(true)),
        "false" => Some(PSObject::Bool(false)),
        _ => None,
    }
}

fn string(tok: &str) -> Option<PSObject> {
    let inner = tok.strip_prefix('(')?.strip_suffix(')')?;
    Some(PSObject::String(inner.to_string()))
}

// contents stay unparsed until the block runs
fn code_block(tok: &str) -> Option<PSObject> {
    let inner = tok.strip_prefix('{')?.strip_suffix('}')?;
    Some(PSObject::Block(inner.trim().to_string()))
}

fn variable_name(tok: &str) -> Option<PSObject> {
    tok.strip_prefix('/').map(|name| PSObject::Name(name.to_string()))
}
