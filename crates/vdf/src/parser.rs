//! Text VDF parser.
//!
//! Grammar, as Valve writes it:
//!
//! ```text
//! document := pair*
//! pair     := key (scalar | '{' pair* '}') conditional?
//! key      := quoted | bare
//! scalar   := quoted | bare
//! ```
//!
//! `//` comments run to end of line. Conditionals such as `[$WIN32]` are
//! accepted after a key or value and ignored.

use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use crate::error::VdfError;
use crate::node::{Number, VdfNode, VdfValue};

/// Blocks nested deeper than this are rejected instead of recursing further.
const MAX_DEPTH: usize = 128;

/// Reads and parses a VDF file. Invalid UTF-8 is replaced, not rejected.
pub fn parse_file(path: &Path) -> Result<VdfNode, VdfError> {
    let bytes = fs::read(path)?;
    parse(&String::from_utf8_lossy(&bytes))
}

/// Parses VDF text into a tree. Either the whole document parses or an error
/// is returned; partial trees are never produced.
pub fn parse(text: &str) -> Result<VdfNode, VdfError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lexer = Lexer::new(text);
    parse_block(&mut lexer, None, 0)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Quoted(String),
    Bare(String),
    Open,
    Close,
    Conditional,
}

/// A token plus the 1-based position where it starts.
#[derive(Debug)]
struct Spanned {
    token: Token,
    line: usize,
    column: usize,
}

/// Parses pairs until the matching `}` (or end of input for the root).
///
/// `opened_at` is the position of the `{` that opened this block, `None` for
/// the document root.
fn parse_block(
    lexer: &mut Lexer<'_>,
    opened_at: Option<(usize, usize)>,
    depth: usize,
) -> Result<VdfNode, VdfError> {
    if depth > MAX_DEPTH {
        let (line, column) = opened_at.unwrap_or((1, 1));
        return Err(VdfError::syntax(line, column, "blocks nested too deeply"));
    }

    let mut node = VdfNode::new();

    loop {
        let Some(spanned) = lexer.next_token()? else {
            return match opened_at {
                Some((line, column)) => Err(VdfError::syntax(
                    line,
                    column,
                    "unexpected end of input: block is never closed",
                )),
                None => Ok(node),
            };
        };

        let key = match spanned.token {
            Token::Quoted(k) | Token::Bare(k) => k,
            Token::Close => {
                if opened_at.is_some() {
                    return Ok(node);
                }
                return Err(VdfError::syntax(
                    spanned.line,
                    spanned.column,
                    "unexpected '}' with no open block",
                ));
            }
            Token::Open => {
                return Err(VdfError::syntax(
                    spanned.line,
                    spanned.column,
                    "unexpected '{' where a key was expected",
                ));
            }
            Token::Conditional => continue,
        };

        let value = parse_value(lexer, &key, spanned.line, spanned.column, depth)?;
        lexer.skip_conditional()?;
        node.insert(key, value);
    }
}

fn parse_value(
    lexer: &mut Lexer<'_>,
    key: &str,
    key_line: usize,
    key_column: usize,
    depth: usize,
) -> Result<VdfValue, VdfError> {
    lexer.skip_conditional()?;

    let Some(spanned) = lexer.next_token()? else {
        return Err(VdfError::syntax(
            key_line,
            key_column,
            format!("key '{key}' has no value"),
        ));
    };

    match spanned.token {
        Token::Quoted(s) => Ok(VdfValue::String(s)),
        Token::Bare(s) => Ok(match Number::parse(&s) {
            Some(n) => VdfValue::Number(n),
            None => VdfValue::String(s),
        }),
        Token::Open => {
            let child = parse_block(lexer, Some((spanned.line, spanned.column)), depth + 1)?;
            Ok(VdfValue::Object(child))
        }
        Token::Close | Token::Conditional => Err(VdfError::syntax(
            key_line,
            key_column,
            format!("key '{key}' has no value"),
        )),
    }
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    peeked: Option<Spanned>,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
            peeked: None,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek_token(&mut self) -> Result<Option<&Spanned>, VdfError> {
        if self.peeked.is_none() {
            self.peeked = self.read_token()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn next_token(&mut self) -> Result<Option<Spanned>, VdfError> {
        match self.peeked.take() {
            Some(t) => Ok(Some(t)),
            None => self.read_token(),
        }
    }

    /// Consumes a conditional if one is next.
    fn skip_conditional(&mut self) -> Result<(), VdfError> {
        let conditional = matches!(
            self.peek_token()?,
            Some(Spanned {
                token: Token::Conditional,
                ..
            })
        );
        if conditional {
            self.peeked = None;
        }
        Ok(())
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    if ahead.peek() != Some(&'/') {
                        return;
                    }
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn read_token(&mut self) -> Result<Option<Spanned>, VdfError> {
        self.skip_trivia();

        let (line, column) = (self.line, self.column);
        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match c {
            '{' => {
                self.bump();
                Token::Open
            }
            '}' => {
                self.bump();
                Token::Close
            }
            '"' => {
                self.bump();
                Token::Quoted(self.read_quoted(line, column)?)
            }
            '[' => {
                self.bump();
                self.read_conditional(line, column)?;
                Token::Conditional
            }
            _ => Token::Bare(self.read_bare()),
        };

        Ok(Some(Spanned {
            token,
            line,
            column,
        }))
    }

    fn read_quoted(&mut self, line: usize, column: usize) -> Result<String, VdfError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(VdfError::syntax(line, column, "unterminated string"));
                }
                Some('"') => return Ok(out),
                Some('\\') => match self.chars.peek() {
                    Some('\\') => {
                        self.bump();
                        out.push('\\');
                    }
                    Some('"') => {
                        self.bump();
                        out.push('"');
                    }
                    Some('n') => {
                        self.bump();
                        out.push('\n');
                    }
                    Some('t') => {
                        self.bump();
                        out.push('\t');
                    }
                    Some('r') => {
                        self.bump();
                        out.push('\r');
                    }
                    // Unknown escapes are kept literally (e.g. single-backslash paths).
                    _ => out.push('\\'),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn read_conditional(&mut self, line: usize, column: usize) -> Result<(), VdfError> {
        while let Some(c) = self.bump() {
            if c == ']' {
                return Ok(());
            }
            if c == '\n' {
                break;
            }
        }
        Err(VdfError::syntax(line, column, "unterminated conditional"))
    }

    fn read_bare(&mut self) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '"' | '{' | '}') {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }
}
