use crate::Quadruple;
use std::fmt::{Display, Formatter};

impl Quadruple {
    pub fn new(
        op: impl Into<String>,
        arg1: impl Into<String>,
        arg2: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            op: op.into(),
            arg1: arg1.into(),
            arg2: arg2.into(),
            result: result.into(),
        }
    }

    /// Whether this instruction is a jump; its `result` then holds the target index.
    pub fn is_jump(&self) -> bool {
        self.op.starts_with('j')
    }
}

impl Display for Quadruple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let arg1 = if self.arg1.is_empty() { "_" } else { &self.arg1 };
        let arg2 = if self.arg2.is_empty() { "_" } else { &self.arg2 };
        write!(f, "({}, {}, {}, {})", self.op, arg1, arg2, self.result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unused_slots_are_printed_as_placeholders() {
        let q = Quadruple::new("=", "t0", "", "a");
        assert_eq!(q.to_string(), "(=, t0, _, a)");
        assert!(!q.is_jump());

        let j = Quadruple::new("jnz", "a", "", "2");
        assert_eq!(j.to_string(), "(jnz, a, _, 2)");
        assert!(j.is_jump());
    }
}
