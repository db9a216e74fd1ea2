use crate::util::Log;
use crate::{
    Action, FirstSets, Grammar, GrammarError, Item, Lr1Parser, ParseError, ParseTreeNode, Symbol,
};
use once_cell::unsync::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

impl Lr1Parser {
    /// Generate the parser for a grammar: compute the FIRST sets, build the
    /// canonical item-set collection and assemble the ACTION and GOTO tables.
    pub fn new(grammar: Grammar) -> Result<Self, GrammarError> {
        let first_sets = FirstSets::compute(&grammar);
        let mut parser = Self {
            grammar,
            first_sets,
            item_sets: Vec::new(),
            action_table: BTreeMap::new(),
            goto_table: BTreeMap::new(),
            debug: OnceCell::new(),
        };
        parser.construct_tables()?;
        Ok(parser)
    }

    /// Load the grammar from a file and generate the parser.
    pub fn from_grammar_path<P: AsRef<Path>>(path: P) -> Result<Self, GrammarError> {
        Self::new(Grammar::from_path(path)?)
    }

    /// Build a parser for the grammar with the tables read from a cache file
    /// instead of being constructed.
    pub fn from_cache<P: AsRef<Path>>(grammar: Grammar, path: P) -> Result<Self, GrammarError> {
        let first_sets = FirstSets::compute(&grammar);
        let mut parser = Self {
            grammar,
            first_sets,
            item_sets: Vec::new(),
            action_table: BTreeMap::new(),
            goto_table: BTreeMap::new(),
            debug: OnceCell::new(),
        };
        parser.load_tables(path)?;
        Ok(parser)
    }

    /// Set a log label to debug the driver. The verbose level traces the three
    /// stacks at every step.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn first_sets(&self) -> &FirstSets {
        &self.first_sets
    }

    pub fn item_sets(&self) -> &[BTreeSet<Item>] {
        &self.item_sets
    }

    /// Run the shift/reduce driver over a terminal sentence which must already be
    /// terminated by the end-of-input terminal, and synthesize the parse tree.
    pub fn parse(&self, sentence: &[Symbol]) -> Result<ParseTreeNode, ParseError> {
        let mut state_stack: Vec<usize> = vec![0];
        let mut symbol_stack: Vec<Symbol> = Vec::new();
        let mut node_stack: Vec<ParseTreeNode> = Vec::new();
        let mut cursor = 0;

        #[cfg(debug_assertions)]
        let debug = self.debug.get().map_or(Log::None, |s| s.clone());

        loop {
            let current_state = state_stack[state_stack.len() - 1];
            let lookahead = sentence.get(cursor).ok_or_else(|| {
                ParseError::new(cursor, "the token stream ended before an accept decision")
            })?;

            #[cfg(debug_assertions)]
            if debug.order() >= Log::Verbose(()).order() {
                self.print_stacks(&state_stack, &symbol_stack, &sentence[cursor..]);
            }

            match self.action_table.get(&(current_state, lookahead.clone())) {
                Some(Action::Shift(target)) => {
                    state_stack.push(*target);
                    symbol_stack.push(lookahead.clone());
                    node_stack.push(ParseTreeNode::leaf(lookahead.clone()));
                    cursor += 1;
                }
                Some(Action::Reduce(production)) => {
                    let count = production.rhs.len();
                    let split = node_stack.len().checked_sub(count).ok_or_else(|| {
                        ParseError::new(cursor, "malformed tables: reduce beyond stack bottom")
                    })?;
                    let children = node_stack.split_off(split);
                    state_stack.truncate(state_stack.len() - count);
                    symbol_stack.truncate(symbol_stack.len() - count);

                    let top = state_stack[state_stack.len() - 1];
                    let target = self
                        .goto_table
                        .get(&(top, production.lhs.clone()))
                        .ok_or_else(|| {
                            ParseError::new(
                                cursor,
                                format!("no goto entry for state {} and '{}'", top, production.lhs),
                            )
                        })?;
                    state_stack.push(*target);
                    symbol_stack.push(production.lhs.clone());
                    node_stack.push(ParseTreeNode::internal(production.lhs.clone(), children));
                }
                Some(Action::Accept) => {
                    #[cfg(debug_assertions)]
                    if debug.order() >= Log::Success(()).order() {
                        println!("[{}; Parse success]", debug);
                    }
                    return node_stack.pop().ok_or_else(|| {
                        ParseError::new(cursor, "accepted an empty parse: no tree was built")
                    });
                }
                Some(Action::Error) | None => {
                    return Err(ParseError::new(
                        cursor,
                        format!(
                            "no action for state {} and symbol '{}'",
                            current_state, lookahead
                        ),
                    ));
                }
            }
        }
    }

    #[cfg(debug_assertions)]
    fn print_stacks(&self, state_stack: &[usize], symbol_stack: &[Symbol], input: &[Symbol]) {
        let states: Vec<String> = state_stack.iter().map(|state| state.to_string()).collect();
        let symbols: Vec<String> = symbol_stack
            .iter()
            .map(|symbol| symbol.to_string())
            .collect();
        let remaining: Vec<String> = input.iter().map(|symbol| symbol.to_string()).collect();
        println!("State Stack: {}", states.join(" "));
        println!("Symbol Stack: {}", symbols.join(" "));
        println!("Input: {}", remaining.join(" "));
        println!();
    }

    /// Print the FIRST set of every symbol.
    pub fn print_first_sets(&self) {
        for (symbol, first) in self.first_sets.iter() {
            let members: Vec<String> = first.iter().map(|member| member.to_string()).collect();
            println!("FIRST({}) = {{ {} }}", symbol, members.join(" "));
        }
    }

    /// Print the assembled ACTION and GOTO tables.
    pub fn print_tables(&self) {
        println!("ACTION Table:");
        for ((state, symbol), action) in &self.action_table {
            println!("State {}, Symbol {}: {}", state, symbol, action);
        }

        println!();
        println!("GOTO Table:");
        for ((state, symbol), target) in &self.goto_table {
            println!("State {}, Symbol {}: {}", state, symbol, target);
        }
    }
}
