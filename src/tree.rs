use crate::{ParseTreeNode, Quadruple, Symbol};
use ptree::TreeItem;
use std::fmt::{Debug, Formatter};

impl ParseTreeNode {
    /// Create a leaf node for a shifted terminal. The node value starts out as the
    /// terminal's lexeme.
    pub fn leaf(symbol: Symbol) -> Self {
        let literal = symbol.literal.clone();
        let real_value = symbol.lexeme.clone().unwrap_or_default();
        Self {
            symbol,
            literal,
            real_value,
            children: Vec::new(),
            quaters: Vec::new(),
        }
    }

    /// Create an internal node for a reduction, with the children in body order.
    pub fn internal(symbol: Symbol, children: Vec<ParseTreeNode>) -> Self {
        let literal = symbol.literal.clone();
        Self {
            symbol,
            literal,
            real_value: String::new(),
            children,
            quaters: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append one quadruple; the assigned local id equals the prior list length, so
    /// the ids of a node stay dense.
    pub fn add_quater(&mut self, op: &str, arg1: &str, arg2: &str, result: &str) -> usize {
        let id = self.quaters.len();
        self.quaters
            .push((id, Quadruple::new(op, arg1, arg2, result)));
        id
    }

    /// Append a jump whose target is a local quadruple index.
    pub fn add_jump(&mut self, op: &str, arg1: &str, arg2: &str, target: usize) -> usize {
        self.add_quater(op, arg1, arg2, &target.to_string())
    }

    /// Append another node's quadruples, renumbering them into this node's local id
    /// space. Relative jump targets survive because every entry shifts uniformly.
    pub fn append_quaters(&mut self, quaters: &[(usize, Quadruple)]) {
        for (_, quater) in quaters {
            let id = self.quaters.len();
            self.quaters.push((id, quater.clone()));
        }
    }

    /// In-order terminal leaves of the subtree.
    pub fn leaves(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'t>(&'t self, out: &mut Vec<&'t Symbol>) {
        if self.is_leaf() {
            out.push(&self.symbol);
        } else {
            for child in &self.children {
                child.collect_leaves(out);
            }
        }
    }

    /// Print the subtree to stdout.
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }

    /// Print the attached intermediate code, one numbered quadruple per line.
    pub fn print_intermediate_code(&self) {
        for (id, quater) in &self.quaters {
            println!("{}\t{}", id, quater);
        }
    }
}

impl Debug for ParseTreeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug_struct = f.debug_struct("ParseTreeNode");
        debug_struct
            .field("literal", &self.literal)
            .field("real_value", &self.real_value);
        if !self.children.is_empty() {
            debug_struct.field("children", &self.children);
        }
        debug_struct.finish()
    }
}

impl TreeItem for ParseTreeNode {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        if self.is_leaf() && !self.real_value.is_empty() {
            write!(f, "{} # {}", self.literal, self.real_value)
        } else {
            write!(f, "{}", self.literal)
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.children)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn local_ids_stay_dense_across_appends() {
        let mut child = ParseTreeNode::internal(Symbol::nonterminal("term"), Vec::new());
        child.add_quater("+", "a", "b", "t0");
        child.add_quater("*", "t0", "c", "t1");

        let mut parent = ParseTreeNode::internal(Symbol::nonterminal("expression"), Vec::new());
        parent.add_quater("=", "x", "", "y");
        parent.append_quaters(&child.quaters);

        let ids: Vec<usize> = parent.quaters.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(parent.quaters[1].1.op, "+");
    }

    #[test]
    fn leaf_value_comes_from_the_lexeme() {
        let leaf = ParseTreeNode::leaf(Symbol::terminal_with_lexeme("T_IDENTIFIER", "sum"));
        assert_eq!(leaf.real_value, "sum");
        assert_eq!(leaf.literal, "T_IDENTIFIER");
        assert!(leaf.is_leaf());
    }

    #[test]
    fn leaves_walk_is_in_order() {
        let a = ParseTreeNode::leaf(Symbol::terminal_with_lexeme("T_IDENTIFIER", "a"));
        let plus = ParseTreeNode::leaf(Symbol::terminal_with_lexeme("T_PLUS", "+"));
        let b = ParseTreeNode::leaf(Symbol::terminal_with_lexeme("T_IDENTIFIER", "b"));
        let node = ParseTreeNode::internal(Symbol::nonterminal("expression"), vec![a, plus, b]);
        let literals: Vec<&str> = node
            .leaves()
            .iter()
            .map(|symbol| symbol.literal.as_str())
            .collect();
        assert_eq!(literals, vec!["T_IDENTIFIER", "T_PLUS", "T_IDENTIFIER"]);
    }
}
