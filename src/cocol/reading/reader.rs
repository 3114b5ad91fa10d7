//! Recursive-descent reader for Cocol grammar files
//!
//! A grammar file is a sequence of sections:
//!
//! ```text
//! /*! id sample */
//! /*! filePattern *.smp */
//! COMPILER Program
//! CHARACTERS
//!   letter = 'a'..'z' + 'A'..'Z'.
//! KEYWORDS
//!   "if" "end"
//! COMMENTS FROM "/*" TO "*/"
//! TOKENS
//!   ident = letter { letter }.
//! PRODUCTIONS
//!   Program = { Statement }.
//! END Program.
//! ```
//!
//! Heading annotations (`/*! key value */`) may appear anywhere and are
//! processed during tokenization. Every other declaration is routed
//! through the [DefinitionBuilder] protocol, so the reader never builds
//! rules itself beyond the helper rules for `{x}`, `[x]` and `a | b`
//! bodies.

use crate::cocol::building::builder::DefinitionBuilder;
use crate::cocol::charset::CharSet;
use crate::cocol::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::cocol::reading::tokens::Token;
use crate::cocol::symbol::Symbol;
use logos::Logos;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;

/// Errors that can occur while reading a grammar
#[derive(Debug, Clone, PartialEq)]
pub enum ReadError {
    UnrecognizedInput {
        line: usize,
        column: usize,
    },
    UnexpectedToken {
        line: usize,
        column: usize,
        expected: String,
        found: String,
    },
    UnexpectedEnd {
        expected: String,
    },
    UnknownCharacterSet {
        line: usize,
        column: usize,
        name: String,
    },
    DuplicateDefinition {
        line: usize,
        column: usize,
        name: String,
    },
    InvalidEscape {
        line: usize,
        column: usize,
        sequence: String,
    },
    UnsupportedConstruct {
        line: usize,
        column: usize,
        message: String,
    },
    MissingStartRule {
        name: String,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::UnrecognizedInput { line, column } => {
                write!(f, "Unrecognized input at line {}, column {}", line, column)
            }
            ReadError::UnexpectedToken {
                line,
                column,
                expected,
                found,
            } => write!(
                f,
                "Expected {} but found {} at line {}, column {}",
                expected, found, line, column
            ),
            ReadError::UnexpectedEnd { expected } => {
                write!(f, "Expected {} but the grammar ended", expected)
            }
            ReadError::UnknownCharacterSet { line, column, name } => write!(
                f,
                "Unknown character set '{}' at line {}, column {}",
                name, line, column
            ),
            ReadError::DuplicateDefinition { line, column, name } => write!(
                f,
                "'{}' is already defined, second definition at line {}, column {}",
                name, line, column
            ),
            ReadError::InvalidEscape {
                line,
                column,
                sequence,
            } => write!(
                f,
                "Invalid escape sequence '{}' at line {}, column {}",
                sequence, line, column
            ),
            ReadError::UnsupportedConstruct {
                line,
                column,
                message,
            } => write!(f, "{} (line {}, column {})", message, line, column),
            ReadError::MissingStartRule { name } => {
                write!(f, "Start rule '{}' is never defined", name)
            }
        }
    }
}

impl std::error::Error for ReadError {}

/// Parses grammar source into a populated [DefinitionBuilder]
pub struct GrammarReader<'source> {
    source: &'source str,
    tokens: Vec<(Token, Range<usize>)>,
    position: usize,
    builder: DefinitionBuilder,
    sets: BTreeMap<String, CharSet>,
    declared: BTreeSet<String>,
}

impl<'source> GrammarReader<'source> {
    /// Reads a whole grammar file
    ///
    /// Returns the builder rather than a built definition so callers can
    /// inspect collected diagnostics before normalization runs.
    pub fn read(source: &'source str) -> Result<DefinitionBuilder, ReadError> {
        let mut builder = DefinitionBuilder::new();
        let mut tokens = Vec::new();
        for (result, span) in Token::lexer(source).spanned() {
            match result {
                Ok(Token::Comment(text)) => process_comment(&mut builder, &text),
                Ok(token) => tokens.push((token, span)),
                Err(()) => {
                    let (line, column) = position_at(source, span.start);
                    return Err(ReadError::UnrecognizedInput { line, column });
                }
            }
        }

        let mut reader = GrammarReader {
            source,
            tokens,
            position: 0,
            builder,
            sets: BTreeMap::new(),
            declared: BTreeSet::new(),
        };
        reader.parse_grammar()?;

        for name in reader.builder.start_rule_names() {
            if !reader.builder.contains_rule(name) {
                return Err(ReadError::MissingStartRule { name: name.clone() });
            }
        }
        Ok(reader.builder)
    }

    fn parse_grammar(&mut self) -> Result<(), ReadError> {
        while let Some(token) = self.peek() {
            match token {
                Token::Compiler => {
                    self.advance();
                    let (name, _) = self.expect_ident("a start rule name")?;
                    self.builder.add_start_rule(name);
                }
                Token::Characters => {
                    self.advance();
                    self.parse_character_section()?;
                }
                Token::Keywords => {
                    self.advance();
                    self.parse_keyword_section()?;
                }
                Token::Comments => {
                    self.advance();
                    self.parse_comment_declaration()?;
                }
                Token::Tokens => {
                    self.advance();
                    self.parse_rule_section(false)?;
                }
                Token::Productions => {
                    self.advance();
                    self.parse_rule_section(true)?;
                }
                Token::End => {
                    self.advance();
                    self.parse_end()?;
                }
                _ => return Err(self.unexpected("a section keyword")),
            }
        }
        Ok(())
    }

    /// `CHARACTERS` entries: `name = expression.`
    fn parse_character_section(&mut self) -> Result<(), ReadError> {
        while matches!(self.peek(), Some(Token::Ident(_))) {
            let (name, span) = self.expect_ident("a character set name")?;
            self.check_duplicate(&name, &span)?;
            self.expect(&Token::Equals, "'='")?;
            let set = self.parse_set_expression()?;
            self.expect(&Token::Dot, "'.'")?;
            self.sets.insert(name.clone(), set.clone());
            self.builder.add_character_set_rule(&name, set);
        }
        Ok(())
    }

    /// Left-associative `+`/`-` chain over set terms
    fn parse_set_expression(&mut self) -> Result<CharSet, ReadError> {
        let mut set = self.parse_set_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    set = set + self.parse_set_term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    let span = self.current_span();
                    let term = self.parse_set_term()?;
                    // The algebra only supports finite subtrahends.
                    if term.symbols().iter().any(|symbol| {
                        matches!(symbol, Symbol::AnyCharacter | Symbol::AnyCharExcept(_))
                    }) {
                        let (line, column) = position_at(self.source, span.start);
                        return Err(ReadError::UnsupportedConstruct {
                            line,
                            column,
                            message: "Subtracting an exclusion-based character set is not supported"
                                .to_string(),
                        });
                    }
                    set = set - term;
                }
                _ => break,
            }
        }
        Ok(set)
    }

    fn parse_set_term(&mut self) -> Result<CharSet, ReadError> {
        match self.next_spanned() {
            Some((Token::CharLiteral(raw), span)) => {
                let low = unescape_char(&raw, self.source, &span)?;
                if matches!(self.peek(), Some(Token::Range)) {
                    self.advance();
                    match self.next_spanned() {
                        Some((Token::CharLiteral(raw), span)) => {
                            let high = unescape_char(&raw, self.source, &span)?;
                            Ok(CharSet::from_range(low, high))
                        }
                        Some((token, span)) => {
                            Err(self.unexpected_at(&token, &span, "a character literal"))
                        }
                        None => Err(ReadError::UnexpectedEnd {
                            expected: "a character literal".to_string(),
                        }),
                    }
                } else {
                    Ok(CharSet::from_char(low))
                }
            }
            Some((Token::StringLiteral(raw), span)) => {
                let text = unescape_string(&raw, self.source, &span)?;
                Ok(CharSet::from_chars(text.chars()))
            }
            Some((Token::Ident(name), span)) => match self.sets.get(&name) {
                Some(set) => Ok(set.clone()),
                None => {
                    let (line, column) = position_at(self.source, span.start);
                    Err(ReadError::UnknownCharacterSet { line, column, name })
                }
            },
            Some((Token::Any, _)) => Ok(CharSet::any()),
            Some((Token::Eol, _)) => Ok(CharSet::end_of_line()),
            Some((token, span)) => Err(self.unexpected_at(&token, &span, "a character set operand")),
            None => Err(ReadError::UnexpectedEnd {
                expected: "a character set operand".to_string(),
            }),
        }
    }

    /// `KEYWORDS` entries: a bare list of string literals
    fn parse_keyword_section(&mut self) -> Result<(), ReadError> {
        while matches!(self.peek(), Some(Token::StringLiteral(_))) {
            if let Some((Token::StringLiteral(raw), span)) = self.next_spanned() {
                let text = unescape_string(&raw, self.source, &span)?;
                self.builder.add_keyword(text);
            }
        }
        Ok(())
    }

    /// `COMMENTS FROM "<start>" TO "<end>" [DOC]`
    fn parse_comment_declaration(&mut self) -> Result<(), ReadError> {
        self.expect(&Token::From, "'FROM'")?;
        let start = self.expect_string("a comment start delimiter")?;
        self.expect(&Token::To, "'TO'")?;
        let end = self.expect_string("a comment end delimiter")?;
        let documentation = matches!(self.peek(), Some(Token::Doc));
        if documentation {
            self.advance();
        }
        self.builder.add_comment_rule(start, end, documentation);
        Ok(())
    }

    /// `TOKENS` / `PRODUCTIONS` entries: `name = body.`
    fn parse_rule_section(&mut self, force_ws_between: bool) -> Result<(), ReadError> {
        while matches!(self.peek(), Some(Token::Ident(_))) {
            let (name, span) = self.expect_ident("a rule name")?;
            self.check_duplicate(&name, &span)?;
            self.expect(&Token::Equals, "'='")?;
            let mut helpers = 0;
            let symbols = self.parse_rule_body(&name, force_ws_between, &mut helpers)?;
            self.expect(&Token::Dot, "'.'")?;
            self.builder.add_rule(name, symbols, force_ws_between, false);
        }
        Ok(())
    }

    /// A rule body, with `|` alternatives folded into one `Alternation`
    fn parse_rule_body(
        &mut self,
        parent: &str,
        force_ws_between: bool,
        helpers: &mut usize,
    ) -> Result<Vec<Symbol>, ReadError> {
        let mut alternatives = vec![self.parse_sequence(parent, force_ws_between, helpers)?];
        while matches!(self.peek(), Some(Token::Pipe)) {
            self.advance();
            alternatives.push(self.parse_sequence(parent, force_ws_between, helpers)?);
        }
        if alternatives.len() == 1 {
            return Ok(alternatives.pop().unwrap_or_default());
        }

        // Alternation options are rule names. An alternative that is a
        // single reference contributes its name directly, anything else
        // moves into a helper rule.
        let mut options = Vec::new();
        for alternative in alternatives {
            if let [Symbol::NonTerminal(target)] = alternative.as_slice() {
                options.push(target.clone());
                continue;
            }
            let helper = format!("{}|alt{}", parent, helpers);
            *helpers += 1;
            self.builder
                .add_rule(helper.clone(), alternative, force_ws_between, false);
            options.push(helper);
        }
        Ok(vec![Symbol::Alternation {
            allow_empty: false,
            options,
        }])
    }

    fn parse_sequence(
        &mut self,
        parent: &str,
        force_ws_between: bool,
        helpers: &mut usize,
    ) -> Result<Vec<Symbol>, ReadError> {
        let mut symbols = Vec::new();
        loop {
            match self.peek() {
                None
                | Some(Token::Dot)
                | Some(Token::Pipe)
                | Some(Token::CloseBrace)
                | Some(Token::CloseBracket) => break,
                _ => symbols.push(self.parse_factor(parent, force_ws_between, helpers)?),
            }
        }
        if symbols.is_empty() {
            return Err(self.unexpected("a grammar symbol"));
        }
        Ok(symbols)
    }

    fn parse_factor(
        &mut self,
        parent: &str,
        force_ws_between: bool,
        helpers: &mut usize,
    ) -> Result<Symbol, ReadError> {
        match self.next_spanned() {
            Some((Token::Ident(name), _)) => Ok(Symbol::NonTerminal(name)),
            Some((Token::StringLiteral(raw), span)) => Ok(Symbol::Literal(unescape_string(
                &raw,
                self.source,
                &span,
            )?)),
            Some((Token::CharLiteral(raw), span)) => {
                let chr = unescape_char(&raw, self.source, &span)?;
                Ok(Symbol::OneCharOf(BTreeSet::from([chr])))
            }
            Some((Token::Any, _)) => Ok(Symbol::AnyCharacter),
            Some((Token::Eol, _)) => Ok(Symbol::AnyLineEnd),
            Some((Token::Action(raw), _)) => Ok(Symbol::Action(action_text(&raw))),
            Some((Token::OpenBrace, _)) => {
                let mut body = self.parse_sequence(parent, force_ws_between, helpers)?;
                self.expect(&Token::CloseBrace, "'}'")?;
                let helper = format!("{}|rep{}", parent, helpers);
                *helpers += 1;
                body.push(Symbol::optional_reference(helper.clone()));
                self.builder
                    .add_rule(helper.clone(), body, force_ws_between, false);
                Ok(Symbol::optional_reference(helper))
            }
            Some((Token::OpenBracket, _)) => {
                let body = self.parse_sequence(parent, force_ws_between, helpers)?;
                self.expect(&Token::CloseBracket, "']'")?;
                if let [Symbol::NonTerminal(target)] = body.as_slice() {
                    return Ok(Symbol::optional_reference(target.clone()));
                }
                let helper = format!("{}|opt{}", parent, helpers);
                *helpers += 1;
                self.builder
                    .add_rule(helper.clone(), body, force_ws_between, false);
                Ok(Symbol::optional_reference(helper))
            }
            Some((Token::OpenParen, span)) => {
                let (line, column) = position_at(self.source, span.start);
                Err(ReadError::UnsupportedConstruct {
                    line,
                    column,
                    message: "Parenthesized groups are not supported, use a separate rule"
                        .to_string(),
                })
            }
            Some((token, span)) => Err(self.unexpected_at(&token, &span, "a grammar symbol")),
            None => Err(ReadError::UnexpectedEnd {
                expected: "a grammar symbol".to_string(),
            }),
        }
    }

    /// `END [name] [.]`, then nothing else
    fn parse_end(&mut self) -> Result<(), ReadError> {
        if matches!(self.peek(), Some(Token::Ident(_))) {
            self.advance();
        }
        if matches!(self.peek(), Some(Token::Dot)) {
            self.advance();
        }
        if self.position < self.tokens.len() {
            return Err(self.unexpected("the end of the grammar"));
        }
        Ok(())
    }

    fn check_duplicate(&mut self, name: &str, span: &Range<usize>) -> Result<(), ReadError> {
        if !self.declared.insert(name.to_string()) {
            let (line, column) = position_at(self.source, span.start);
            return Err(ReadError::DuplicateDefinition {
                line,
                column,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(token, _)| token)
    }

    fn current_span(&self) -> Range<usize> {
        self.tokens
            .get(self.position)
            .map(|(_, span)| span.clone())
            .unwrap_or(self.source.len()..self.source.len())
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn next_spanned(&mut self) -> Option<(Token, Range<usize>)> {
        let entry = self.tokens.get(self.position).cloned();
        if entry.is_some() {
            self.position += 1;
        }
        entry
    }

    fn expect(&mut self, expected: &Token, description: &str) -> Result<(), ReadError> {
        match self.peek() {
            Some(token) if token == expected => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(description)),
        }
    }

    fn expect_ident(&mut self, description: &str) -> Result<(String, Range<usize>), ReadError> {
        match self.next_spanned() {
            Some((Token::Ident(name), span)) => Ok((name, span)),
            Some((token, span)) => Err(self.unexpected_at(&token, &span, description)),
            None => Err(ReadError::UnexpectedEnd {
                expected: description.to_string(),
            }),
        }
    }

    fn expect_string(&mut self, description: &str) -> Result<String, ReadError> {
        match self.next_spanned() {
            Some((Token::StringLiteral(raw), span)) => unescape_string(&raw, self.source, &span),
            Some((token, span)) => Err(self.unexpected_at(&token, &span, description)),
            None => Err(ReadError::UnexpectedEnd {
                expected: description.to_string(),
            }),
        }
    }

    fn unexpected(&self, expected: &str) -> ReadError {
        match self.tokens.get(self.position) {
            Some((token, span)) => {
                let (line, column) = position_at(self.source, span.start);
                ReadError::UnexpectedToken {
                    line,
                    column,
                    expected: expected.to_string(),
                    found: token.describe(),
                }
            }
            None => ReadError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }

    fn unexpected_at(&self, token: &Token, span: &Range<usize>, expected: &str) -> ReadError {
        let (line, column) = position_at(self.source, span.start);
        ReadError::UnexpectedToken {
            line,
            column,
            expected: expected.to_string(),
            found: token.describe(),
        }
    }
}

/// Routes heading annotations to the builder, drops plain comments
fn process_comment(builder: &mut DefinitionBuilder, text: &str) {
    let inner = match text.strip_prefix("/*!") {
        Some(inner) => inner,
        None => return,
    };
    let inner = inner.strip_suffix("*/").unwrap_or(inner).trim();
    match inner.split_once(char::is_whitespace) {
        Some((key, value)) if !value.trim().is_empty() => {
            builder.set_heading_field(key, value.trim());
        }
        _ => builder.add_diagnostic(
            Diagnostic::new(
                DiagnosticSeverity::Warning,
                "heading annotation does not have enough arguments".to_string(),
            )
            .with_code("invalid-heading"),
        ),
    }
}

/// 1-indexed line and column of a byte offset
fn position_at(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (index, chr) in source.char_indices() {
        if index >= offset {
            break;
        }
        if chr == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// Resolves escapes in a quoted string slice from the lexer
fn unescape_string(
    raw: &str,
    source: &str,
    span: &Range<usize>,
) -> Result<String, ReadError> {
    let inner = &raw[1..raw.len() - 1];
    let mut text = String::new();
    let mut chars = inner.chars();
    while let Some(chr) = chars.next() {
        if chr != '\\' {
            text.push(chr);
            continue;
        }
        match chars.next() {
            Some(escaped) => match unescape_code(escaped) {
                Some(resolved) => text.push(resolved),
                None => return Err(invalid_escape(source, span, &format!("\\{}", escaped))),
            },
            None => return Err(invalid_escape(source, span, "\\")),
        }
    }
    Ok(text)
}

/// Resolves a quoted character slice from the lexer
fn unescape_char(raw: &str, source: &str, span: &Range<usize>) -> Result<char, ReadError> {
    let inner = &raw[1..raw.len() - 1];
    let mut chars = inner.chars();
    match (chars.next(), chars.next()) {
        (Some('\\'), Some(escaped)) => unescape_code(escaped)
            .ok_or_else(|| invalid_escape(source, span, &format!("\\{}", escaped))),
        (Some(chr), None) => Ok(chr),
        _ => Err(invalid_escape(source, span, inner)),
    }
}

fn unescape_code(code: char) -> Option<char> {
    match code {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '0' => Some('\0'),
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        _ => None,
    }
}

fn invalid_escape(source: &str, span: &Range<usize>, sequence: &str) -> ReadError {
    let (line, column) = position_at(source, span.start);
    ReadError::InvalidEscape {
        line,
        column,
        sequence: sequence.to_string(),
    }
}

/// Strips the `(.` / `.)` delimiters from an action block
fn action_text(raw: &str) -> String {
    let inner = raw.strip_prefix("(.").unwrap_or(raw);
    let inner = inner.strip_suffix(".)").unwrap_or(inner);
    inner.trim().to_string()
}
