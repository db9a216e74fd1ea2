use crate::{Symbol, Token, TokenKind};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

pub(crate) static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("while", TokenKind::While),
        ("for", TokenKind::For),
        ("return", TokenKind::Return),
        ("int", TokenKind::Int),
        ("float", TokenKind::Float),
        ("char", TokenKind::Char),
        ("void", TokenKind::Void),
        ("struct", TokenKind::Struct),
    ])
});

// Operators and delimiters share one table; the lexer probes the two-character
// slice before the single character, so the longest match wins.
pub(crate) static PUNCTUATIONS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("+", TokenKind::Plus),
        ("-", TokenKind::Minus),
        ("*", TokenKind::Multiply),
        ("/", TokenKind::Divide),
        ("=", TokenKind::Assign),
        ("==", TokenKind::Equal),
        ("!=", TokenKind::NotEqual),
        ("<", TokenKind::Less),
        ("<=", TokenKind::LessEqual),
        (">", TokenKind::Greater),
        (">=", TokenKind::GreaterEqual),
        ("&&", TokenKind::And),
        ("||", TokenKind::Or),
        ("!", TokenKind::Not),
        ("%", TokenKind::Mod),
        ("++", TokenKind::Increment),
        ("--", TokenKind::Decrement),
        ("&", TokenKind::BitAnd),
        ("|", TokenKind::BitOr),
        ("^", TokenKind::BitXor),
        ("~", TokenKind::BitNot),
        ("<<", TokenKind::LeftShift),
        (">>", TokenKind::RightShift),
        (";", TokenKind::Semicolon),
        ("{", TokenKind::LeftBrace),
        ("}", TokenKind::RightBrace),
        ("(", TokenKind::LeftParen),
        (")", TokenKind::RightParen),
        ("[", TokenKind::LeftSquare),
        ("]", TokenKind::RightSquare),
        (",", TokenKind::Comma),
        (".", TokenKind::Dot),
        ("->", TokenKind::Arrow),
        (":", TokenKind::Colon),
        ("?", TokenKind::Question),
    ])
});

impl TokenKind {
    /// The grammar-facing terminal literal of this token kind.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "T_IDENTIFIER",
            TokenKind::IntegerLiteral => "T_INTEGER_LITERAL",
            TokenKind::FloatLiteral => "T_FLOAT_LITERAL",
            TokenKind::StringLiteral => "T_STRING_LITERAL",
            TokenKind::CharLiteral => "T_CHAR_LITERAL",
            TokenKind::If => "T_IF",
            TokenKind::Else => "T_ELSE",
            TokenKind::While => "T_WHILE",
            TokenKind::For => "T_FOR",
            TokenKind::Return => "T_RETURN",
            TokenKind::Int => "T_INT",
            TokenKind::Float => "T_FLOAT",
            TokenKind::Char => "T_CHAR",
            TokenKind::Void => "T_VOID",
            TokenKind::Struct => "T_STRUCT",
            TokenKind::Plus => "T_PLUS",
            TokenKind::Minus => "T_MINUS",
            TokenKind::Multiply => "T_MULTIPLY",
            TokenKind::Divide => "T_DIVIDE",
            TokenKind::Assign => "T_ASSIGN",
            TokenKind::Equal => "T_EQUAL",
            TokenKind::NotEqual => "T_NOTEQUAL",
            TokenKind::Less => "T_LESS",
            TokenKind::LessEqual => "T_LESSEQUAL",
            TokenKind::Greater => "T_GREATER",
            TokenKind::GreaterEqual => "T_GREATEREQUAL",
            TokenKind::And => "T_AND",
            TokenKind::Or => "T_OR",
            TokenKind::Not => "T_NOT",
            TokenKind::Mod => "T_MOD",
            TokenKind::Increment => "T_INCREMENT",
            TokenKind::Decrement => "T_DECREMENT",
            TokenKind::BitAnd => "T_BITAND",
            TokenKind::BitOr => "T_BITOR",
            TokenKind::BitXor => "T_BITXOR",
            TokenKind::BitNot => "T_BITNOT",
            TokenKind::LeftShift => "T_LEFTSHIFT",
            TokenKind::RightShift => "T_RIGHTSHIFT",
            TokenKind::Semicolon => "T_SEMICOLON",
            TokenKind::LeftBrace => "T_LEFT_BRACE",
            TokenKind::RightBrace => "T_RIGHT_BRACE",
            TokenKind::LeftParen => "T_LEFT_PAREN",
            TokenKind::RightParen => "T_RIGHT_PAREN",
            TokenKind::LeftSquare => "T_LEFT_SQUARE",
            TokenKind::RightSquare => "T_RIGHT_SQUARE",
            TokenKind::Comma => "T_COMMA",
            TokenKind::Dot => "T_DOT",
            TokenKind::Arrow => "T_ARROW",
            TokenKind::Colon => "T_COLON",
            TokenKind::Question => "T_QUESTION",
            TokenKind::Unknown => "T_UNKNOWN",
            TokenKind::Eof => "T_EOF",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            start,
            end,
        }
    }

    /// The grammar terminal corresponding to this token, with the lexeme riding
    /// along as the semantic payload.
    pub fn to_symbol(&self) -> Symbol {
        if self.lexeme.is_empty() {
            Symbol::terminal(self.kind.name())
        } else {
            Symbol::terminal_with_lexeme(self.kind.name(), self.lexeme.clone())
        }
    }

    /// Map a token stream to the sentence consumed by the parser driver.
    pub fn into_symbols(tokens: &[Token]) -> Vec<Symbol> {
        tokens.iter().map(|token| token.to_symbol()).collect()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("")
            .field(&self.kind)
            .field(&self.lexeme)
            .field(&self.start)
            .field(&self.end)
            .finish()
    }
}
