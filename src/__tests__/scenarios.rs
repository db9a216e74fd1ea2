use super::{compile, parse_source, quater_strings, with_c_parser, C_GRAMMAR};
use crate::{Code, Grammar, Lexer, ParseTreeNode, SemanticError, TokenKind};

#[test]
fn arithmetic_with_declarations() {
    let (root, analyzer) = compile("int a; int b = 1; a = b + 2;").unwrap();

    assert_eq!(quater_strings(&root), vec!["(+, b, 2, t0)", "(=, t0, _, a)"]);

    let table = analyzer.variable_table();
    assert_eq!(table["a"].type_name, "int");
    assert_eq!(table["a"].value, "NULL");
    assert_eq!(table["b"].type_name, "int");
    assert_eq!(table["b"].value, "1");
}

#[test]
fn pre_increment_updates_in_place() {
    let (root, analyzer) = compile("int a = 0; ++a;").unwrap();
    assert_eq!(quater_strings(&root), vec!["(+, a, 1, a)"]);
    assert_eq!(analyzer.variable_table()["a"].value, "0");
}

#[test]
fn post_increment_keeps_the_old_value_in_a_temporary() {
    let (root, _) = compile("int a = 0; int b; b = a++;").unwrap();
    assert_eq!(
        quater_strings(&root),
        vec!["(=, a, _, t0)", "(+, a, 1, a)", "(=, t0, _, b)"]
    );
}

#[test]
fn if_then_lowering() {
    let (root, _) = compile("int a; if (a) a = 1;").unwrap();
    assert_eq!(
        quater_strings(&root),
        vec!["(jnz, a, _, 2)", "(j, _, _, 3)", "(=, 1, _, a)"]
    );
}

#[test]
fn if_else_offsets_count_quadruples_not_statements() {
    let source = "int a; int b; if (a) { b = 1; b = 2; } else { b = 3; b = 4; }";
    let (root, _) = compile(source).unwrap();
    assert_eq!(
        quater_strings(&root),
        vec![
            "(jnz, a, _, 4)",
            "(=, 3, _, b)",
            "(=, 4, _, b)",
            "(j, _, _, 6)",
            "(=, 1, _, b)",
            "(=, 2, _, b)",
        ]
    );
}

#[test]
fn while_lowering() {
    let (root, _) = compile("int a; while (a) a = a;").unwrap();
    assert_eq!(
        quater_strings(&root),
        vec![
            "(jnz, a, _, 2)",
            "(j, _, _, 4)",
            "(=, a, _, a)",
            "(j, _, _, 0)",
        ]
    );
}

#[test]
fn for_lowering_runs_the_step_after_the_body() {
    let source = "int i; int s; for (i = 0; i; i = i - 1) { s = s + i; }";
    let (root, _) = compile(source).unwrap();
    assert_eq!(
        quater_strings(&root),
        vec![
            "(=, 0, _, i)",
            "(jnz, i, _, 3)",
            "(j, _, _, 8)",
            "(+, s, i, t1)",
            "(=, t1, _, s)",
            "(-, i, 1, t0)",
            "(=, t0, _, i)",
            "(j, _, _, 1)",
        ]
    );
}

#[test]
fn parenthesized_subexpressions_pass_their_value_through() {
    let (root, _) = compile("int a; int b; a = (a + b) * 2;").unwrap();
    assert_eq!(
        quater_strings(&root),
        vec!["(+, a, b, t0)", "(*, t0, 2, t1)", "(=, t1, _, a)"]
    );
}

#[test]
fn logical_not_lands_in_a_temporary() {
    let (root, _) = compile("int a; int b; b = !a;").unwrap();
    assert_eq!(quater_strings(&root), vec!["(!, a, _, t0)", "(=, t0, _, b)"]);
}

#[test]
fn relational_condition_compiles_before_the_jump() {
    let (root, _) = compile("int a; while (a < 3) a = a + 1;").unwrap();
    assert_eq!(
        quater_strings(&root),
        vec![
            "(<, a, 3, t0)",
            "(jnz, t0, _, 3)",
            "(j, _, _, 6)",
            "(+, a, 1, t1)",
            "(=, t1, _, a)",
            "(j, _, _, 0)",
        ]
    );
}

#[test]
fn undeclared_use_is_fatal() {
    let err = compile("a = 1;").unwrap_err();
    assert_eq!(err, SemanticError::UndeclaredUse("a".to_string()));
    assert!(err.to_string().contains("'a'"));
}

#[test]
fn undeclared_right_hand_side_is_fatal() {
    let err = compile("int a; a = b;").unwrap_err();
    assert_eq!(err, SemanticError::UndeclaredUse("b".to_string()));
}

#[test]
fn redeclaration_is_fatal() {
    let err = compile("int a; float a;").unwrap_err();
    assert_eq!(err, SemanticError::Redeclaration("a".to_string()));
}

#[test]
fn leaf_walk_reproduces_the_token_stream() {
    let source = "int a; a = a + 1;";
    let root = with_c_parser(|parser| parse_source(parser, source));

    let code = Code::from(source);
    let tokens = Lexer::new().tokenize(&code).unwrap();

    let leaves = root.leaves();
    assert_eq!(leaves.len(), tokens.len() - 1);
    for (leaf, token) in leaves.iter().zip(&tokens) {
        assert_eq!(leaf.literal, token.kind.name());
        assert_eq!(leaf.lexeme.as_deref().unwrap_or(""), token.lexeme);
    }
    assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::Eof));
}

#[test]
fn every_internal_node_matches_a_grammar_production() {
    let grammar = Grammar::from_text(C_GRAMMAR).unwrap();
    let root = with_c_parser(|parser| parse_source(parser, "int a; if (a) { while (a) a = a - 1; }"));
    assert_node_matches(&grammar, &root);
}

fn assert_node_matches(grammar: &Grammar, node: &ParseTreeNode) {
    if node.is_leaf() {
        return;
    }
    let matched = grammar.productions_for(&node.symbol).iter().any(|production| {
        production.rhs.len() == node.children.len()
            && production
                .rhs
                .iter()
                .zip(&node.children)
                .all(|(symbol, child)| *symbol == child.symbol)
    });
    assert!(
        matched,
        "node '{}' with {} children matches no production",
        node.literal,
        node.children.len()
    );
    for child in &node.children {
        assert_node_matches(grammar, child);
    }
}

#[test]
fn the_demo_program_compiles() {
    let source = include_str!("../../demos/sample.c");
    let (root, analyzer) = compile(source).unwrap();
    assert!(!root.quaters.is_empty());
    assert_eq!(analyzer.variable_table().len(), 3);

    // Local ids are dense on every node of the tree.
    fn assert_dense(node: &ParseTreeNode) {
        for (expected, (id, _)) in node.quaters.iter().enumerate() {
            assert_eq!(*id, expected);
        }
        for child in &node.children {
            assert_dense(child);
        }
    }
    assert_dense(&root);
}
