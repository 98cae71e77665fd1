// import from PSObject so our functions can modify it
use crate::interpreter::error::{PSError, PSResult};
use crate::interpreter::object::PSObject;
use std::slice::Iter;

// our operand stack is its own stack of vector objects
// allow for clones of this stack to happen (tests snapshot it)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    // vec over a linked list, the top is the last element
    stack: Vec<PSObject>,
}

impl Stack {
    // constructor
    pub fn new() -> Self {
        Stack { stack: Vec::new() }
    }

    // bottom to top
    pub fn iter(&self) -> Iter<'_, PSObject> {
        self.stack.iter()
    }

    pub fn push(&mut self, val: PSObject) {
        self.stack.push(val);
    }

    // we have to borrow the object and not take ownership, so we reference it with &
    pub fn peek(&self) -> Option<&PSObject> {
        self.stack.last()
    }

    pub fn pop(&mut self) -> Option<PSObject> {
        self.stack.pop()
    }

    pub fn count(&self) -> usize {
        self.stack.len()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }

    /// Fails with `StackUnderflow` unless at least `needed` cells are present.
    /// Nothing is popped either way.
    pub fn require(&self, op: &'static str, needed: usize) -> PSResult<()> {
        if self.stack.len() < needed {
            return Err(PSError::StackUnderflow {
                op,
                needed,
                found: self.stack.len(),
            });
        }
        Ok(())
    }

    /// Pops the top `N` cells, deepest first, so `[a, b]` for `a b add`.
    /// The depth is checked before anything is removed.
    pub fn pop_array<const N: usize>(&mut self, op: &'static str) -> PSResult<[PSObject; N]> {
        self.require(op, N)?;
        let at = self.stack.len() - N;
        let found = self.stack.len();
        self.stack
            .split_off(at)
            .try_into()
            .map_err(|_| PSError::StackUnderflow {
                op,
                needed: N,
                found,
            })
    }

    /// Puts popped operands back in their original order.
    pub fn restore<const N: usize>(&mut self, operands: [PSObject; N]) {
        self.stack.extend(operands);
    }

    // swaps the top two cells
    pub fn exch(&mut self) -> PSResult<()> {
        self.require("exch", 2)?;
        let i = self.stack.len();
        self.stack.swap(i - 1, i - 2);
        Ok(())
    }

    // duplicate the top of the stack
    pub fn dup(&mut self) -> PSResult<()> {
        let top = self.peek().cloned().ok_or(PSError::StackUnderflow {
            op: "dup",
            needed: 1,
            found: 0,
        })?;
        self.push(top);
        Ok(())
    }

    // copy the top n cells above themselves, in the order they originally appear,
    // i.e [1,2,3,4], 3 copy => [1,2,3,4,2,3,4]
    // n larger than the stack copies the whole stack
    pub fn copy(&mut self, n: usize) {
        let n_index = self.stack.len() - n.min(self.stack.len());
        let n_copies = self.stack[n_index..].to_vec();
        self.stack.extend(n_copies);
    }
}
