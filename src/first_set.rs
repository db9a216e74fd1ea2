use crate::{FirstSets, Grammar, Symbol, SymbolKind};
use std::collections::{BTreeMap, BTreeSet};

impl FirstSets {
    /// Compute FIRST for every symbol of the grammar.
    ///
    /// Nonterminal sets grow monotonically and are bounded by the terminal alphabet
    /// plus epsilon, so the round-robin pass terminates.
    pub fn compute(grammar: &Grammar) -> Self {
        let mut sets: BTreeMap<Symbol, BTreeSet<Symbol>> = BTreeMap::new();
        for production in grammar.productions() {
            sets.entry(production.lhs.clone()).or_default();
        }

        let epsilon = Symbol::epsilon();
        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                let mut addition: BTreeSet<Symbol> = BTreeSet::new();
                let mut all_nullable = true;
                for symbol in &production.rhs {
                    let first = first_of_known(&sets, symbol);
                    let nullable = first.contains(&epsilon);
                    addition.extend(first.into_iter().filter(|member| member != &epsilon));
                    if !nullable {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable {
                    addition.insert(epsilon.clone());
                }

                let entry = sets.entry(production.lhs.clone()).or_default();
                for member in addition {
                    if entry.insert(member) {
                        changed = true;
                    }
                }
            }
        }

        Self { sets }
    }

    /// FIRST of a single symbol.
    pub fn first_of(&self, symbol: &Symbol) -> BTreeSet<Symbol> {
        first_of_known(&self.sets, symbol)
    }

    /// FIRST of a symbol string: the union of the leading FIRST sets, stopping at
    /// the first non-nullable symbol; epsilon is included only when every symbol of
    /// the string is nullable.
    pub fn first_of_string(&self, symbols: &[Symbol]) -> BTreeSet<Symbol> {
        let epsilon = Symbol::epsilon();
        let mut result = BTreeSet::new();
        let mut all_nullable = true;
        for symbol in symbols {
            let first = self.first_of(symbol);
            let nullable = first.contains(&epsilon);
            result.extend(first.into_iter().filter(|member| member != &epsilon));
            if !nullable {
                all_nullable = false;
                break;
            }
        }
        if all_nullable {
            result.insert(epsilon);
        }
        result
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &BTreeSet<Symbol>)> {
        self.sets.iter()
    }
}

fn first_of_known(sets: &BTreeMap<Symbol, BTreeSet<Symbol>>, symbol: &Symbol) -> BTreeSet<Symbol> {
    match symbol.kind {
        SymbolKind::Terminal => BTreeSet::from([symbol.clone()]),
        SymbolKind::Epsilon => BTreeSet::from([Symbol::epsilon()]),
        SymbolKind::NonTerminal => sets.get(symbol).cloned().unwrap_or_default(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn nullable_grammar() -> Grammar {
        Grammar::from_text(
            "\
S T_END
T_A T_B T_END
S ::= A B
A ::= T_A | Epsilon
B ::= T_B
",
        )
        .unwrap()
    }

    #[test]
    fn first_reaches_through_nullable_prefixes() {
        let grammar = nullable_grammar();
        let first = FirstSets::compute(&grammar);

        let s = first.first_of(&Symbol::nonterminal("S"));
        assert!(s.contains(&Symbol::terminal("T_A")));
        assert!(s.contains(&Symbol::terminal("T_B")));
        assert!(!s.contains(&Symbol::epsilon()));

        let a = first.first_of(&Symbol::nonterminal("A"));
        assert!(a.contains(&Symbol::terminal("T_A")));
        assert!(a.contains(&Symbol::epsilon()));
    }

    #[test]
    fn epsilon_membership_matches_nullability_of_every_body() {
        // A is nullable through its Epsilon alternative, B is not, so S = A B is not.
        let grammar = nullable_grammar();
        let first = FirstSets::compute(&grammar);
        assert!(!first
            .first_of(&Symbol::nonterminal("S"))
            .contains(&Symbol::epsilon()));
    }

    #[test]
    fn first_of_string_stops_at_the_first_non_nullable_symbol() {
        let grammar = nullable_grammar();
        let first = FirstSets::compute(&grammar);

        let string = [Symbol::nonterminal("A"), Symbol::terminal("T_END")];
        let result = first.first_of_string(&string);
        assert!(result.contains(&Symbol::terminal("T_A")));
        assert!(result.contains(&Symbol::terminal("T_END")));
        assert!(!result.contains(&Symbol::epsilon()));

        // An empty string derives only the empty string.
        assert_eq!(
            first.first_of_string(&[]),
            BTreeSet::from([Symbol::epsilon()])
        );
    }

    #[test]
    fn terminals_are_their_own_first_set() {
        let grammar = nullable_grammar();
        let first = FirstSets::compute(&grammar);
        assert_eq!(
            first.first_of(&Symbol::terminal("T_B")),
            BTreeSet::from([Symbol::terminal("T_B")])
        );
    }
}
