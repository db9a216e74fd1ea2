use crate::{Grammar, GrammarError, Production, Symbol};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

impl Grammar {
    /// Create a grammar from an explicit production list, a start nonterminal and an
    /// end-of-input terminal.
    ///
    /// Epsilon symbols inside a production body are dropped so that an empty body is
    /// the single representation of the empty string.
    pub fn new(productions: Vec<Production>, start: Symbol, end: Symbol) -> Self {
        let terminals = productions
            .iter()
            .flat_map(|production| &production.rhs)
            .chain(std::iter::once(&end))
            .filter(|symbol| symbol.is_terminal())
            .map(|symbol| symbol.literal.clone())
            .collect();

        let productions: Vec<Production> = productions
            .into_iter()
            .map(|production| Production {
                lhs: production.lhs,
                rhs: production
                    .rhs
                    .into_iter()
                    .filter(|symbol| !symbol.is_epsilon())
                    .collect(),
            })
            .collect();

        let mut by_lhs: HashMap<Symbol, Vec<Production>> = HashMap::new();
        for production in &productions {
            by_lhs
                .entry(production.lhs.clone())
                .or_default()
                .push(production.clone());
        }

        Self {
            productions,
            by_lhs,
            start,
            end,
            terminals,
        }
    }

    /// Load a grammar from its three-section text form.
    ///
    /// The first line names the start nonterminal and the end-of-input terminal, the
    /// second line lists the terminal names, and every following non-empty line is a
    /// production `LHS ::= α1 | α2 | …` where `Epsilon` denotes the empty body.
    pub fn from_text(text: &str) -> Result<Self, GrammarError> {
        let mut lines = text.lines();

        let header = lines
            .next()
            .ok_or_else(|| GrammarError::new("format", "the grammar text is empty"))?;
        let mut header_parts = header.split_whitespace();
        let start = header_parts.next().map(Symbol::nonterminal).ok_or_else(|| {
            GrammarError::new(
                "format",
                "the first line must name the start and end symbols",
            )
        })?;
        let end = header_parts.next().map(Symbol::terminal).ok_or_else(|| {
            GrammarError::new(
                "format",
                "the first line must name the start and end symbols",
            )
        })?;

        let terminal_line = lines.next().ok_or_else(|| {
            GrammarError::new("format", "the second line must declare the terminals")
        })?;
        let terminals: HashSet<String> = terminal_line
            .split_whitespace()
            .map(|name| name.to_string())
            .collect();

        let mut productions = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            parse_production_line(line, &terminals, &mut productions)?;
        }

        if productions.is_empty() {
            return Err(GrammarError::new(
                "format",
                "the grammar does not define any production",
            ));
        }

        let mut grammar = Self::new(productions, start, end);
        grammar.terminals.extend(terminals);
        Ok(grammar)
    }

    /// Read and load a grammar file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GrammarError> {
        let text = fs::read_to_string(path.as_ref()).map_err(|err| {
            GrammarError::new(
                "io",
                format!("cannot open '{}': {}", path.as_ref().display(), err),
            )
        })?;
        Self::from_text(&text)
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// All productions whose left-hand side is the given nonterminal.
    pub fn productions_for(&self, lhs: &Symbol) -> &[Production] {
        self.by_lhs
            .get(lhs)
            .map(|productions| productions.as_slice())
            .unwrap_or(&[])
    }

    /// The accepting production: the first one whose lhs is the start symbol.
    pub fn start_production(&self) -> Result<&Production, GrammarError> {
        self.productions
            .iter()
            .find(|production| production.lhs == self.start)
            .ok_or_else(|| {
                GrammarError::new(
                    "format",
                    format!("no production starts from '{}'", self.start),
                )
            })
    }

    pub fn start(&self) -> &Symbol {
        &self.start
    }

    pub fn end(&self) -> &Symbol {
        &self.end
    }

    pub fn is_terminal_name(&self, name: &str) -> bool {
        self.terminals.contains(name)
    }
}

fn parse_production_line(
    line: &str,
    terminals: &HashSet<String>,
    productions: &mut Vec<Production>,
) -> Result<(), GrammarError> {
    let (lhs_part, rhs_part) = line
        .split_once("::=")
        .ok_or_else(|| GrammarError::new("format", format!("missing '::=' in '{}'", line)))?;

    let lhs_name = lhs_part.trim();
    if lhs_name.is_empty() || lhs_name.split_whitespace().count() != 1 {
        return Err(GrammarError::new(
            "format",
            format!("expected a single nonterminal before '::=' in '{}'", line),
        ));
    }
    if terminals.contains(lhs_name) {
        return Err(GrammarError::new(
            "format",
            format!("terminal '{}' cannot start a production", lhs_name),
        ));
    }
    let lhs = Symbol::nonterminal(lhs_name);

    for alternative in rhs_part.split('|') {
        let rhs = alternative
            .split_whitespace()
            .filter(|name| *name != "Epsilon")
            .map(|name| {
                if terminals.contains(name) {
                    Symbol::terminal(name)
                } else {
                    Symbol::nonterminal(name)
                }
            })
            .collect();
        productions.push(Production::new(lhs.clone(), rhs));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    const TINY: &str = "\
S T_END
T_A T_B T_END
S ::= A B
A ::= T_A | Epsilon
B ::= T_B
";

    #[test]
    fn loads_a_grammar_text() {
        let grammar = Grammar::from_text(TINY).unwrap();
        assert_eq!(grammar.productions().len(), 4);
        assert_eq!(grammar.start(), &Symbol::nonterminal("S"));
        assert_eq!(grammar.end(), &Symbol::terminal("T_END"));
        assert!(grammar.is_terminal_name("T_A"));

        // The Epsilon alternative is stored as an empty body.
        let a = Symbol::nonterminal("A");
        let bodies: Vec<usize> = grammar
            .productions_for(&a)
            .iter()
            .map(|production| production.rhs.len())
            .collect();
        assert_eq!(bodies, vec![1, 0]);
    }

    #[test]
    fn classifies_symbols_by_the_declared_terminal_set() {
        let grammar = Grammar::from_text(TINY).unwrap();
        let s = grammar.start_production().unwrap();
        assert!(s.rhs.iter().all(|symbol| symbol.is_nonterminal()));
    }

    #[test]
    fn rejects_malformed_lines() {
        let text = "S T_END\nT_A\nS = T_A\n";
        assert!(Grammar::from_text(text).is_err());
    }

    #[test]
    fn rejects_an_empty_grammar() {
        assert!(Grammar::from_text("S T_END\nT_A\n").is_err());
    }
}
