// splits a line into tokens, gluing back together the whitespace separated
// pieces of a ( string ) or a { block }, including nested blocks

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Mode {
    Plain,
    // brace nesting counter
    Block(usize),
    Str,
}

/// Tokenize one input line.
///
/// A fragment starting with `{` opens (or nests) a block and a fragment ending
/// with `}` closes one level. A fragment starting with `(` without also ending
/// with `)` opens a string, which runs until a fragment ending with `)` that
/// doesn't start with `(`. Pieces inside either are joined by a single space.
/// Unterminated blocks and strings get their closing delimiters appended.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut toks = Vec::<String>::new();
    let mut buf = String::new();
    let mut mode = Mode::Plain;

    for frag in line.split_whitespace() {
        match mode {
            Mode::Plain => {
                if frag.starts_with('{') {
                    let depth = if frag.ends_with('}') { 0 } else { 1 };
                    if depth == 0 {
                        toks.push(frag.to_string());
                    } else {
                        buf.push_str(frag);
                        mode = Mode::Block(depth);
                    }
                } else if frag.starts_with('(') && !frag.ends_with(')') {
                    buf.push_str(frag);
                    mode = Mode::Str;
                } else {
                    toks.push(frag.to_string());
                }
            }
            Mode::Block(mut depth) => {
                buf.push(' ');
                buf.push_str(frag);
                if frag.starts_with('{') {
                    depth += 1;
                }
                if frag.ends_with('}') {
                    depth -= 1;
                }
                if depth == 0 {
                    toks.push(std::mem::take(&mut buf));
                    mode = Mode::Plain;
                } else {
                    mode = Mode::Block(depth);
                }
            }
            Mode::Str => {
                buf.push(' ');
                buf.push_str(frag);
                if frag.ends_with(')') && !frag.starts_with('(') {
                    toks.push(std::mem::take(&mut buf));
                    mode = Mode::Plain;
                }
            }
        }
    }

    // best effort recovery for a line that ran out early
    match mode {
        Mode::Plain => {}
        Mode::Block(depth) => {
            buf.extend(std::iter::repeat('}').take(depth));
            toks.push(buf);
        }
        Mode::Str => {
            buf.push(')');
            toks.push(buf);
        }
    }
    toks
}
