use crate::{Action, GrammarError, Item, ItemState, Lr1Parser, Symbol};
use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Formatter};

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "S {}", state),
            Action::Reduce(production) => write!(f, "R {}", production),
            Action::Accept => write!(f, "Accept"),
            Action::Error => write!(f, "x"),
        }
    }
}

impl Lr1Parser {
    /// Close an item set under the LR(1) closure rule.
    ///
    /// For every item `[A -> α . B β, a]` with `B` nonterminal, each production
    /// `B -> γ` contributes `[B -> . γ, b]` for every `b` in FIRST(β a). The set
    /// grows monotonically, so the pass repeats until a full round adds nothing.
    pub(crate) fn closure(&self, set: &mut BTreeSet<Item>) {
        let mut visited: HashSet<Item> = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            let mut additions: Vec<Item> = Vec::new();

            for item in set.iter() {
                let next = match item.next_symbol() {
                    Some(symbol) if symbol.is_nonterminal() => symbol,
                    _ => continue,
                };
                if !visited.insert(item.clone()) {
                    continue;
                }

                let mut rest: Vec<Symbol> = item.production.rhs[item.dot + 1..].to_vec();
                rest.push(item.lookahead.clone());
                let lookaheads = self.first_sets.first_of_string(&rest);

                for production in self.grammar.productions_for(next) {
                    for lookahead in &lookaheads {
                        let candidate = Item::new(production.clone(), 0, lookahead.clone());
                        if !set.contains(&candidate) {
                            additions.push(candidate);
                        }
                    }
                }
            }

            for item in additions {
                if set.insert(item) {
                    changed = true;
                }
            }
        }
    }

    /// goto(I, X): advance the dot over `X` in every matching item and close.
    pub(crate) fn goto_set(&self, set: &BTreeSet<Item>, symbol: &Symbol) -> BTreeSet<Item> {
        let mut moved: BTreeSet<Item> = set
            .iter()
            .filter(|item| item.next_symbol() == Some(symbol))
            .map(|item| item.advanced())
            .collect();
        self.closure(&mut moved);
        moved
    }

    /// Build the canonical item-set collection and assemble the ACTION and GOTO
    /// tables. A grammar assigning two different decisions to one `(state, symbol)`
    /// slot is not LR(1) and is rejected.
    pub(crate) fn construct_tables(&mut self) -> Result<(), GrammarError> {
        let start_production = self.grammar.start_production()?.clone();
        let mut seed = BTreeSet::new();
        seed.insert(Item::new(start_production, 0, self.grammar.end().clone()));
        self.closure(&mut seed);
        self.item_sets.push(seed);

        let mut index = 0;
        while index < self.item_sets.len() {
            let current = self.item_sets[index].clone();

            let mut shift_symbols: BTreeSet<Symbol> = BTreeSet::new();
            let mut goto_symbols: BTreeSet<Symbol> = BTreeSet::new();
            for item in &current {
                match item.state(self.grammar.start(), self.grammar.end()) {
                    ItemState::Shift => {
                        if let Some(symbol) = item.next_symbol() {
                            shift_symbols.insert(symbol.clone());
                        }
                    }
                    ItemState::Goto => {
                        if let Some(symbol) = item.next_symbol() {
                            goto_symbols.insert(symbol.clone());
                        }
                    }
                    _ => {}
                }
            }

            for symbol in shift_symbols {
                let target = self.target_state(&current, &symbol);
                self.set_action(index, symbol, Action::Shift(target))?;
            }
            for symbol in goto_symbols {
                let target = self.target_state(&current, &symbol);
                self.goto_table.insert((index, symbol), target);
            }

            for item in &current {
                match item.state(self.grammar.start(), self.grammar.end()) {
                    ItemState::Accept => {
                        self.set_action(index, item.lookahead.clone(), Action::Accept)?;
                    }
                    ItemState::Reduce => {
                        self.set_action(
                            index,
                            item.lookahead.clone(),
                            Action::Reduce(item.production.clone()),
                        )?;
                    }
                    _ => {}
                }
            }

            index += 1;
        }
        Ok(())
    }

    /// The state index of goto(current, symbol), appending a new state when the set
    /// matches no existing one. Set equality decides identity.
    fn target_state(&mut self, current: &BTreeSet<Item>, symbol: &Symbol) -> usize {
        let moved = self.goto_set(current, symbol);
        match self.item_sets.iter().position(|set| *set == moved) {
            Some(existing) => existing,
            None => {
                self.item_sets.push(moved);
                self.item_sets.len() - 1
            }
        }
    }

    fn set_action(
        &mut self,
        state: usize,
        symbol: Symbol,
        action: Action,
    ) -> Result<(), GrammarError> {
        match self.action_table.get(&(state, symbol.clone())) {
            Some(existing) if *existing != action => Err(GrammarError::new(
                "conflict",
                format!(
                    "the grammar is not LR(1): state {} on '{}' admits both [{}] and [{}]",
                    state, symbol, existing, action
                ),
            )),
            _ => {
                self.action_table.insert((state, symbol), action);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Grammar, Lr1Parser};

    // The dragon-book assignment grammar: LR(1) but not SLR(1).
    const LVALUE: &str = "\
S T_END
T_EQ T_DEREF T_ID T_END
S ::= E
E ::= L T_EQ R | R
L ::= T_DEREF R | T_ID
R ::= L
";

    #[test]
    fn closure_of_the_seed_state_expands_all_goto_items() {
        let grammar = Grammar::from_text(LVALUE).unwrap();
        let parser = Lr1Parser::new(grammar).unwrap();
        // [E -> . L = R], [E -> . R], [R -> . L] and the L items with lookaheads
        // drawn from FIRST(= R $) close over the seed item.
        assert_eq!(parser.item_sets()[0].len(), 8);
    }

    #[test]
    fn lr1_grammar_without_conflicts_is_accepted() {
        let grammar = Grammar::from_text(LVALUE).unwrap();
        assert!(Lr1Parser::new(grammar).is_ok());
    }

    #[test]
    fn equal_item_sets_share_one_state() {
        let grammar = Grammar::from_text(LVALUE).unwrap();
        let parser = Lr1Parser::new(grammar).unwrap();
        for (i, left) in parser.item_sets().iter().enumerate() {
            for right in parser.item_sets().iter().skip(i + 1) {
                assert_ne!(left, right);
            }
        }
    }

    #[test]
    fn ambiguous_grammar_is_rejected() {
        // E -> E + E is a textbook shift/reduce ambiguity.
        let ambiguous = "\
S T_END
T_PLUS T_ID T_END
S ::= E
E ::= E T_PLUS E | T_ID
";
        let grammar = Grammar::from_text(ambiguous).unwrap();
        let err = Lr1Parser::new(grammar).unwrap_err();
        assert!(err.to_string().contains("not LR(1)"));
    }

    #[test]
    fn reduce_reduce_conflict_is_rejected() {
        let clashing = "\
S T_END
T_ID T_END
S ::= P
P ::= A | B
A ::= T_ID
B ::= T_ID
";
        let grammar = Grammar::from_text(clashing).unwrap();
        assert!(Lr1Parser::new(grammar).is_err());
    }
}
