use std::io::Read;

use crate::lexer::Token;
use crate::parser::Parser;

/// Adapt a byte reader into the character stream the lexer pulls from.
/// The language is ascii, so bytes map straight to chars; a read error
/// ends the stream the same way end-of-input does.
pub fn reader_chars<R: Read>(reader: R) -> impl Iterator<Item = char> {
    reader.bytes().map_while(|byte| byte.ok()).map(char::from)
}

/// The interactive read loop: parse one unit at a time, print a status
/// line for each, and keep going until end of input.
pub fn main_loop<I: Iterator<Item = char>>(parser: &mut Parser<I>) {
    eprint!("ready> ");
    parser.advance_token();

    loop {
        match parser.current_token().clone() {
            Token::Eof => return,
            Token::Char(';') => {
                // bare delimiter between units, nothing to parse
                parser.advance_token();
                continue;
            }
            Token::Def => handle_definition(parser),
            Token::Extern => handle_extern(parser),
            _ => handle_top_level_expression(parser),
        }
        eprint!("ready> ");
    }
}

fn handle_definition<I: Iterator<Item = char>>(parser: &mut Parser<I>) {
    if parser.try_parse_definition().is_some() {
        eprintln!("Parsed a function definition");
    } else {
        // skip one token past the failure so the loop makes progress
        parser.advance_token();
    }
}

fn handle_extern<I: Iterator<Item = char>>(parser: &mut Parser<I>) {
    if parser.try_parse_extern().is_some() {
        eprintln!("Parsed an extern");
    } else {
        parser.advance_token();
    }
}

fn handle_top_level_expression<I: Iterator<Item = char>>(parser: &mut Parser<I>) {
    if parser.try_parse_top_level_expr().is_some() {
        eprintln!("Parsed a top-level expression");
    } else {
        parser.advance_token();
    }
}
