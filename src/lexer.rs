use crate::token::{KEYWORDS, PUNCTUATIONS};
use crate::util::{Code, Log};
use crate::{Lexer, ParseError, Token, TokenKind};
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::bytes::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^//[^\n]*").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^/\*.*?\*/").unwrap());
static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+\.?[0-9]*|\.[0-9]+)").unwrap());
static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?s)^"[^"]*""#).unwrap());
static CHAR_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^'[^']'").unwrap());

impl Lexer {
    pub fn new() -> Self {
        Self {
            debug: OnceCell::new(),
        }
    }

    /// Set a log label to debug the lexeme stream.
    pub fn set_log(&self, log: Log<&'static str>) -> Result<(), String> {
        self.debug
            .set(log)
            .map_err(|err| format!("Log label {} is already assigned.", err))
    }

    /// Tokenize the code and return the token stream, terminated by an Eof token.
    /// Whitespace and comments are consumed and never reach the stream.
    pub fn tokenize(&self, code: &Code) -> Result<Vec<Token>, ParseError> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut pointer: usize = 0;
        let eof_pointer: usize = code.value.len();

        #[cfg(debug_assertions)]
        let debug = self.debug.get().map_or(Log::None, |s| s.clone());

        loop {
            pointer = skip_trivia(code, pointer)?;
            if pointer >= eof_pointer {
                tokens.push(Token::new(TokenKind::Eof, "", eof_pointer, eof_pointer));
                #[cfg(debug_assertions)]
                if debug.order() >= Log::Success(()).order() {
                    println!("[{}; Tokenization success]", debug);
                }
                break Ok(tokens);
            }

            let token = next_token(code, pointer)?;
            debug_assert_eq!(token.start, pointer);
            pointer = token.end;

            #[cfg(debug_assertions)]
            if debug.order() >= Log::Verbose(()).order() {
                println!(
                    "[{}; Lexeme]: {:?} '{}' at {}",
                    debug,
                    token.kind,
                    token.lexeme,
                    code.obtain_position(token.start)
                );
            }

            tokens.push(token);
        }
    }
}

fn skip_trivia(code: &Code, mut pointer: usize) -> Result<usize, ParseError> {
    loop {
        let rest = &code.value[pointer..];
        if let Some(found) = WHITESPACE.find(rest) {
            pointer += found.end();
            continue;
        }
        if let Some(found) = LINE_COMMENT.find(rest) {
            pointer += found.end();
            continue;
        }
        if rest.starts_with(b"/*") {
            match BLOCK_COMMENT.find(rest) {
                Some(found) => {
                    pointer += found.end();
                    continue;
                }
                None => {
                    return Err(ParseError::new(
                        pointer,
                        format!(
                            "unclosed block comment at {}",
                            code.obtain_position(pointer)
                        ),
                    ));
                }
            }
        }
        break Ok(pointer);
    }
}

fn next_token(code: &Code, pointer: usize) -> Result<Token, ParseError> {
    let rest = &code.value[pointer..];

    if let Some(found) = IDENTIFIER.find(rest) {
        let lexeme = String::from_utf8_lossy(&rest[..found.end()]).into_owned();
        let kind = KEYWORDS
            .get(lexeme.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        return Ok(Token::new(kind, lexeme, pointer, pointer + found.end()));
    }

    if let Some(found) = NUMBER.find(rest) {
        let mut end = found.end();
        let mut kind = if rest[..end].contains(&b'.') {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        // A number running straight into identifier characters is no token at all.
        if let Some(tail) = IDENTIFIER.find(&rest[end..]) {
            end += tail.end();
            kind = TokenKind::Unknown;
        }
        let lexeme = String::from_utf8_lossy(&rest[..end]).into_owned();
        return Ok(Token::new(kind, lexeme, pointer, pointer + end));
    }

    if rest.starts_with(b"\"") {
        return match STRING_LITERAL.find(rest) {
            Some(found) => {
                let lexeme = String::from_utf8_lossy(&rest[..found.end()]).into_owned();
                Ok(Token::new(
                    TokenKind::StringLiteral,
                    lexeme,
                    pointer,
                    pointer + found.end(),
                ))
            }
            None => Err(ParseError::new(
                pointer,
                format!(
                    "unterminated string literal at {}",
                    code.obtain_position(pointer)
                ),
            )),
        };
    }

    if let Some(found) = CHAR_LITERAL.find(rest) {
        let lexeme = String::from_utf8_lossy(&rest[..found.end()]).into_owned();
        return Ok(Token::new(
            TokenKind::CharLiteral,
            lexeme,
            pointer,
            pointer + found.end(),
        ));
    }

    for length in [2usize, 1] {
        if rest.len() < length {
            continue;
        }
        if let Ok(slice) = std::str::from_utf8(&rest[..length]) {
            if let Some(kind) = PUNCTUATIONS.get(slice) {
                return Ok(Token::new(*kind, slice, pointer, pointer + length));
            }
        }
    }

    let lexeme = String::from_utf8_lossy(&rest[..1]).into_owned();
    Ok(Token::new(TokenKind::Unknown, lexeme, pointer, pointer + 1))
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let code = Code::from(source);
        Lexer::new()
            .tokenize(&code)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn keywords_are_split_from_identifiers() {
        assert_eq!(
            kinds("int counter; while whileever"),
            vec![
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::While,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operators_take_the_longest_match() {
        assert_eq!(
            kinds("a<=b ++c d// tail"),
            vec![
                TokenKind::Identifier,
                TokenKind::LessEqual,
                TokenKind::Identifier,
                TokenKind::Increment,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("a - -b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Minus,
                TokenKind::Minus,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_elided() {
        let source = "int a; // line\n/* block\nspanning */ a = 1;";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::IntegerLiteral,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unclosed_block_comment_is_an_error() {
        let code = Code::from("int a; /* no end");
        assert!(Lexer::new().tokenize(&code).is_err());
    }

    #[test]
    fn numbers_and_their_degenerate_forms() {
        assert_eq!(
            kinds("42 3.14 .5 123abc"),
            vec![
                TokenKind::IntegerLiteral,
                TokenKind::FloatLiteral,
                TokenKind::FloatLiteral,
                TokenKind::Unknown,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn literal_lexemes_keep_their_quotes() {
        let code = Code::from(r#""hi" 'x'"#);
        let tokens = Lexer::new().tokenize(&code).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, "\"hi\"");
        assert_eq!(tokens[1].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[1].lexeme, "'x'");
    }

    #[test]
    fn token_positions_cover_the_source() {
        let code = Code::from("a = 1;");
        let tokens = Lexer::new().tokenize(&code).unwrap();
        assert_eq!(tokens[0].start, 0);
        assert_eq!(tokens[0].end, 1);
        assert_eq!(tokens[2].lexeme, "1");
        assert_eq!(tokens[2].start, 4);
    }
}
