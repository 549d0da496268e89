mod ast;
mod driver;
mod lexer;
mod parser;

use std::fs;
use std::io;

use anyhow::Context;
use clap::{App, Arg};

use lexer::Lexer;
use parser::Parser;

fn main() -> anyhow::Result<()> {
    let matches = App::new("ember")
        .version(clap::crate_version!())
        .about("parser front end for the ember expression language")
        .arg(
            Arg::with_name("file")
                .help("source file to parse and dump as an AST; omit to start a repl"),
        )
        .get_matches();

    match matches.value_of("file") {
        Some(path) => {
            let source =
                fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
            let mut parser = Parser::from_source(&source);
            for node in parser.parse_program()? {
                println!("{:#?}", node);
            }
        }
        None => {
            let stdin = io::stdin();
            let mut parser = Parser::new(Lexer::new(driver::reader_chars(stdin.lock())));
            driver::main_loop(&mut parser);
        }
    }

    Ok(())
}
