//! End-to-end scenarios driving the whole pipeline over the C-like demo grammar.

mod scenarios;
mod tables;

use crate::{
    Code, Grammar, Lexer, Lr1Parser, ParseError, ParseTreeNode, SemanticAnalyzer, SemanticError,
    Token,
};
use once_cell::sync::Lazy;
use std::sync::Mutex;

pub(crate) const C_GRAMMAR: &str = include_str!("../../demos/grammar.txt");

// Generating the canonical LR(1) collection for the demo grammar is the costly
// step, so every test borrows one shared parser.
static PARSER: Lazy<Mutex<Lr1Parser>> = Lazy::new(|| {
    let grammar = Grammar::from_text(C_GRAMMAR).unwrap();
    Mutex::new(Lr1Parser::new(grammar).unwrap())
});

pub(crate) fn with_c_parser<R>(run: impl FnOnce(&Lr1Parser) -> R) -> R {
    let parser = PARSER.lock().unwrap();
    run(&parser)
}

pub(crate) fn try_parse(parser: &Lr1Parser, source: &str) -> Result<ParseTreeNode, ParseError> {
    let code = Code::from(source);
    let tokens = Lexer::new().tokenize(&code).unwrap();
    parser.parse(&Token::into_symbols(&tokens))
}

pub(crate) fn parse_source(parser: &Lr1Parser, source: &str) -> ParseTreeNode {
    try_parse(parser, source).unwrap()
}

pub(crate) fn compile(source: &str) -> Result<(ParseTreeNode, SemanticAnalyzer), SemanticError> {
    let mut root = with_c_parser(|parser| parse_source(parser, source));
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(&mut root)?;
    Ok((root, analyzer))
}

pub(crate) fn quater_strings(root: &ParseTreeNode) -> Vec<String> {
    root.quaters
        .iter()
        .map(|(_, quater)| quater.to_string())
        .collect()
}
