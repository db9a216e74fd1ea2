//! Persistence of the ACTION and GOTO tables.
//!
//! The cache file is line oriented: one record per ACTION entry, a `---`
//! separator, then one record per GOTO entry. Symbols serialize as
//! `<kind> <literal> <lexeme|NULL>` (Epsilon as its kind alone), actions as
//! `<type> <number> <production>` and productions as `<lhs> <len> <rhs...>`.

use crate::{Action, GrammarError, Lr1Parser, Production, Symbol, SymbolKind};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const SEPARATOR: &str = "---";

impl Lr1Parser {
    /// Serialize the ACTION and GOTO tables to a cache file.
    pub fn save_tables<P: AsRef<Path>>(&self, path: P) -> Result<(), GrammarError> {
        let mut out = String::new();
        for ((state, symbol), action) in &self.action_table {
            let mut line = String::new();
            let _ = write!(line, "{} ", state);
            write_symbol(&mut line, symbol);
            line.push(' ');
            write_action(&mut line, action);
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(SEPARATOR);
        out.push('\n');
        for ((state, symbol), target) in &self.goto_table {
            let mut line = String::new();
            let _ = write!(line, "{} ", state);
            write_symbol(&mut line, symbol);
            let _ = write!(line, " {}", target);
            out.push_str(&line);
            out.push('\n');
        }

        fs::write(path.as_ref(), out).map_err(|err| {
            GrammarError::new(
                "io",
                format!("cannot write '{}': {}", path.as_ref().display(), err),
            )
        })
    }

    /// Replace the tables with the contents of a cache file.
    pub fn load_tables<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GrammarError> {
        let text = fs::read_to_string(path.as_ref()).map_err(|err| {
            GrammarError::new(
                "io",
                format!("cannot open '{}': {}", path.as_ref().display(), err),
            )
        })?;

        self.action_table.clear();
        self.goto_table.clear();

        let mut reading_actions = true;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if line == SEPARATOR {
                reading_actions = false;
                continue;
            }

            let mut scanner = FieldScanner::new(line);
            let state = scanner.next_usize()?;
            let symbol = read_symbol(&mut scanner)?;
            if reading_actions {
                let action = read_action(&mut scanner)?;
                self.action_table.insert((state, symbol), action);
            } else {
                let target = scanner.next_usize()?;
                self.goto_table.insert((state, symbol), target);
            }
        }
        Ok(())
    }
}

struct FieldScanner<'a> {
    fields: std::str::SplitWhitespace<'a>,
}

impl<'a> FieldScanner<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            fields: line.split_whitespace(),
        }
    }

    fn next_field(&mut self) -> Result<&'a str, GrammarError> {
        self.fields
            .next()
            .ok_or_else(|| GrammarError::new("cache", "truncated table record"))
    }

    fn next_usize(&mut self) -> Result<usize, GrammarError> {
        let field = self.next_field()?;
        field.parse().map_err(|_| {
            GrammarError::new("cache", format!("expected a number, found '{}'", field))
        })
    }
}

fn kind_code(kind: SymbolKind) -> usize {
    match kind {
        SymbolKind::Terminal => 0,
        SymbolKind::NonTerminal => 1,
        SymbolKind::Epsilon => 2,
    }
}

fn write_symbol(out: &mut String, symbol: &Symbol) {
    if symbol.is_epsilon() {
        let _ = write!(out, "{}", kind_code(symbol.kind));
        return;
    }
    let lexeme = symbol.lexeme.as_deref().unwrap_or("NULL");
    let _ = write!(
        out,
        "{} {} {}",
        kind_code(symbol.kind),
        symbol.literal,
        lexeme
    );
}

fn write_production(out: &mut String, production: &Production) {
    write_symbol(out, &production.lhs);
    let _ = write!(out, " {}", production.rhs.len());
    for symbol in &production.rhs {
        out.push(' ');
        write_symbol(out, symbol);
    }
}

fn write_action(out: &mut String, action: &Action) {
    let empty = Production::new(Symbol::epsilon(), Vec::new());
    match action {
        Action::Shift(target) => {
            let _ = write!(out, "0 {} ", target);
            write_production(out, &empty);
        }
        Action::Reduce(production) => {
            out.push_str("1 0 ");
            write_production(out, production);
        }
        Action::Accept => {
            out.push_str("2 0 ");
            write_production(out, &empty);
        }
        Action::Error => {
            out.push_str("3 0 ");
            write_production(out, &empty);
        }
    }
}

fn read_symbol(scanner: &mut FieldScanner) -> Result<Symbol, GrammarError> {
    let kind = match scanner.next_usize()? {
        0 => SymbolKind::Terminal,
        1 => SymbolKind::NonTerminal,
        2 => return Ok(Symbol::epsilon()),
        other => {
            return Err(GrammarError::new(
                "cache",
                format!("unknown symbol kind {}", other),
            ))
        }
    };
    let literal = scanner.next_field()?.to_string();
    let lexeme = match scanner.next_field()? {
        "NULL" => None,
        value => Some(value.to_string()),
    };
    Ok(Symbol {
        kind,
        literal,
        lexeme,
    })
}

fn read_production(scanner: &mut FieldScanner) -> Result<Production, GrammarError> {
    let lhs = read_symbol(scanner)?;
    let length = scanner.next_usize()?;
    let mut rhs = Vec::with_capacity(length);
    for _ in 0..length {
        rhs.push(read_symbol(scanner)?);
    }
    Ok(Production::new(lhs, rhs))
}

fn read_action(scanner: &mut FieldScanner) -> Result<Action, GrammarError> {
    let kind = scanner.next_usize()?;
    let number = scanner.next_usize()?;
    let production = read_production(scanner)?;
    match kind {
        0 => Ok(Action::Shift(number)),
        1 => Ok(Action::Reduce(production)),
        2 => Ok(Action::Accept),
        3 => Ok(Action::Error),
        other => Err(GrammarError::new(
            "cache",
            format!("unknown action type {}", other),
        )),
    }
}
