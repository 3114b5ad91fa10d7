//! Token definitions for the Cocol grammar dialect
//!
//! Tokens are defined with the logos derive macro. Whitespace is
//! insignificant everywhere and skipped by the lexer; comments are kept
//! as tokens because heading annotations (`/*! key value */`) carry
//! content the reader needs.

use logos::Logos;

/// All tokens of a Cocol grammar file
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Section keywords
    #[token("COMPILER")]
    Compiler,
    #[token("CHARACTERS")]
    Characters,
    #[token("KEYWORDS")]
    Keywords,
    #[token("TOKENS")]
    Tokens,
    #[token("PRODUCTIONS")]
    Productions,
    #[token("COMMENTS")]
    Comments,
    #[token("END")]
    End,

    // Clause keywords
    #[token("FROM")]
    From,
    #[token("TO")]
    To,
    #[token("DOC")]
    Doc,
    #[token("ANY")]
    Any,
    #[token("EOL")]
    Eol,

    // Operators and delimiters
    #[token("=")]
    Equals,
    #[token("..")]
    Range,
    #[token(".")]
    Dot,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("|")]
    Pipe,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,

    // Semantic action blocks, delimited by (. and .)
    #[regex(r"\(\.([^.]|\.+[^.)])*\.+\)", |lex| lex.slice().to_string())]
    Action(String),

    // Comments, including heading annotations
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", |lex| lex.slice().to_string())]
    Comment(String),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    StringLiteral(String),

    #[regex(r"'([^'\\\n]|\\.)'", |lex| lex.slice().to_string())]
    CharLiteral(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl Token {
    /// Short description of the token for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Compiler => "'COMPILER'".to_string(),
            Token::Characters => "'CHARACTERS'".to_string(),
            Token::Keywords => "'KEYWORDS'".to_string(),
            Token::Tokens => "'TOKENS'".to_string(),
            Token::Productions => "'PRODUCTIONS'".to_string(),
            Token::Comments => "'COMMENTS'".to_string(),
            Token::End => "'END'".to_string(),
            Token::From => "'FROM'".to_string(),
            Token::To => "'TO'".to_string(),
            Token::Doc => "'DOC'".to_string(),
            Token::Any => "'ANY'".to_string(),
            Token::Eol => "'EOL'".to_string(),
            Token::Equals => "'='".to_string(),
            Token::Range => "'..'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::OpenBrace => "'{'".to_string(),
            Token::CloseBrace => "'}'".to_string(),
            Token::OpenBracket => "'['".to_string(),
            Token::CloseBracket => "']'".to_string(),
            Token::OpenParen => "'('".to_string(),
            Token::CloseParen => "')'".to_string(),
            Token::Action(_) => "an action block".to_string(),
            Token::Comment(_) => "a comment".to_string(),
            Token::StringLiteral(text) => format!("string {}", text),
            Token::CharLiteral(text) => format!("character {}", text),
            Token::Ident(name) => format!("identifier '{}'", name),
        }
    }
}
