use crate::interpreter::object::{Dictionary, PSObject};
use std::cell::RefCell;
use std::rc::Rc;

/// A dictionary that has been pushed with `begin`. Shared, so a block running
/// under lexical scoping sees later `def`s into the dictionary it came from.
pub type Frame = Rc<RefCell<Dictionary>>;

/// Looks `name` up in a single frame, handing back the value and the frame.
pub fn lookup_in(frame: &Frame, name: &str) -> Option<(PSObject, Frame)> {
    let value = frame.borrow().get(name).cloned()?;
    Some((value, Rc::clone(frame)))
}

/// The dictionary stack. Index 0 is the global scope holding the built-ins and
/// top level definitions; it can't be popped.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new(global: Dictionary) -> Self {
        ScopeStack {
            frames: vec![Rc::new(RefCell::new(global))],
        }
    }

    pub fn global(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    // begin
    pub fn push(&mut self, dict: Dictionary) {
        self.frames.push(Rc::new(RefCell::new(dict)));
    }

    // end, refuses to drop the global scope
    pub fn pop(&mut self) -> Option<Frame> {
        if self.frames.len() <= 1 {
            None
        } else {
            self.frames.pop()
        }
    }

    // def always binds into whatever is on top
    pub fn define(&mut self, name: String, value: PSObject) {
        let last = self.frames.len() - 1;
        self.frames[last].borrow_mut().insert(name, value);
    }

    /// Walks from the newest scope down to the global one. Returns the value and
    /// the frame it was found in.
    pub fn lookup(&self, name: &str) -> Option<(PSObject, Frame)> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| lookup_in(frame, name))
    }
}
