use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::{ASTNode, Expression, Function, Prototype};
use crate::lexer::{Lexer, Token};

#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum ParserError {
    // TODO: carry the offending token for context
    #[error("expected expression")]
    ExpectedExpression,
    #[error("expected ')'")]
    ExpectedCloseParen,
    #[error("expected ')' or ',' in argument list")]
    ExpectedArgDelimiter,
    #[error("expected function name in prototype")]
    ExpectedPrototypeName,
    #[error("expected '(' in prototype")]
    ExpectedPrototypeOpenParen,
    #[error("expected ')' in prototype")]
    ExpectedPrototypeCloseParen,
}

pub type PartialParseResult = Result<Expression, ParserError>;

lazy_static! {
    static ref BINOP_PRECEDENCE: HashMap<char, i32> = {
        let mut precedence = HashMap::new();
        precedence.insert('<', 10);
        precedence.insert('+', 20);
        precedence.insert('-', 30);
        precedence.insert('*', 40);
        precedence
    };
}

/// Binding strength of a binary operator, absent for anything else.
pub fn precedence_of(op: char) -> Option<i32> {
    BINOP_PRECEDENCE.get(&op).copied()
}

fn report<T>(result: Result<T, ParserError>) -> Option<T> {
    match result {
        Ok(unit) => Some(unit),
        Err(err) => {
            eprintln!("error: {}", err);
            None
        }
    }
}

/// Recursive-descent parser holding the single token of lookahead. One
/// parse is in flight per instance; independent instances share nothing.
pub struct Parser<I: Iterator<Item = char>> {
    lexer: Lexer<I>,
    cur_tok: Token,
}

impl<'s> Parser<std::str::Chars<'s>> {
    /// Parser over an in-memory source; the first token is read immediately.
    pub fn from_source(source: &'s str) -> Self {
        let mut parser = Parser::new(Lexer::new(source.chars()));
        parser.advance_token();
        parser
    }
}

impl<I: Iterator<Item = char>> Parser<I> {
    /// The lookahead slot starts unprimed: the caller issues the first
    /// `advance_token`, so an interactive source is not pulled from before
    /// the first prompt.
    pub fn new(lexer: Lexer<I>) -> Self {
        Parser {
            lexer,
            cur_tok: Token::Eof,
        }
    }

    pub fn current_token(&self) -> &Token {
        &self.cur_tok
    }

    /// Pull the next token into the lookahead slot.
    pub fn advance_token(&mut self) -> &Token {
        self.cur_tok = self.lexer.next_token();
        &self.cur_tok
    }

    fn cur_tok_precedence(&self) -> i32 {
        match self.cur_tok {
            Token::Char(op) => precedence_of(op).unwrap_or(-1),
            _ => -1,
        }
    }

    fn parse_number_expr(&mut self) -> PartialParseResult {
        let value = match self.cur_tok {
            Token::Number(value) => value,
            _ => unreachable!(),
        };
        self.advance_token();
        Ok(Expression::Literal(value))
    }

    fn parse_paren_expr(&mut self) -> PartialParseResult {
        self.advance_token(); // consume '('
        let inner = self.parse_expression()?;
        if self.cur_tok != Token::Char(')') {
            return Err(ParserError::ExpectedCloseParen);
        }
        self.advance_token(); // consume ')'

        // parentheses only guide the parse; the tree keeps the inner
        // expression unchanged
        Ok(inner)
    }

    fn parse_identifier_expr(&mut self) -> PartialParseResult {
        let name = match &self.cur_tok {
            Token::Ident(name) => name.clone(),
            _ => unreachable!(),
        };
        self.advance_token();

        if self.cur_tok != Token::Char('(') {
            return Ok(Expression::Variable(name));
        }
        self.advance_token(); // consume '('

        let mut args = Vec::new();
        if self.cur_tok != Token::Char(')') {
            loop {
                args.push(self.parse_expression()?);

                if self.cur_tok == Token::Char(')') {
                    break;
                }
                if self.cur_tok != Token::Char(',') {
                    return Err(ParserError::ExpectedArgDelimiter);
                }
                self.advance_token(); // consume ','
            }
        }
        self.advance_token(); // consume ')'

        Ok(Expression::Call(name, args))
    }

    fn parse_primary(&mut self) -> PartialParseResult {
        match self.cur_tok {
            Token::Number(_) => self.parse_number_expr(),
            Token::Ident(_) => self.parse_identifier_expr(),
            Token::Char('(') => self.parse_paren_expr(),
            _ => Err(ParserError::ExpectedExpression),
        }
    }

    /// The precedence-climbing loop: fold `(operator, primary)` pairs into
    /// `lhs` while the operator binds at least as tightly as
    /// `min_precedence`.
    fn parse_bin_op_rhs(&mut self, min_precedence: i32, mut lhs: Expression) -> PartialParseResult {
        loop {
            let tok_precedence = self.cur_tok_precedence();

            // every non-operator token reports -1 and ends the climb
            if tok_precedence < min_precedence {
                return Ok(lhs);
            }

            let op = match self.cur_tok {
                Token::Char(op) => op,
                _ => unreachable!(),
            };
            self.advance_token();

            let mut rhs = self.parse_primary()?;

            // a tighter-binding next operator takes the rhs for itself;
            // climbing at one above our precedence keeps equal-precedence
            // chains left-associated
            let next_precedence = self.cur_tok_precedence();
            if tok_precedence < next_precedence {
                rhs = self.parse_bin_op_rhs(tok_precedence + 1, rhs)?;
            }

            lhs = Expression::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    pub fn parse_expression(&mut self) -> PartialParseResult {
        let lhs = self.parse_primary()?;
        self.parse_bin_op_rhs(0, lhs)
    }

    pub fn parse_prototype(&mut self) -> Result<Prototype, ParserError> {
        let name = match &self.cur_tok {
            Token::Ident(name) => name.clone(),
            _ => return Err(ParserError::ExpectedPrototypeName),
        };
        self.advance_token();

        if self.cur_tok != Token::Char('(') {
            return Err(ParserError::ExpectedPrototypeOpenParen);
        }

        // parameters are bare identifiers with no separators: foo(a b c)
        let mut args = Vec::new();
        while let Token::Ident(arg) = self.advance_token() {
            args.push(arg.clone());
        }
        if self.cur_tok != Token::Char(')') {
            return Err(ParserError::ExpectedPrototypeCloseParen);
        }
        self.advance_token(); // consume ')'

        Ok(Prototype { name, args })
    }

    pub fn parse_definition(&mut self) -> Result<Function, ParserError> {
        self.advance_token(); // consume 'def'
        let prototype = self.parse_prototype()?;
        let body = self.parse_expression()?;
        Ok(Function { prototype, body })
    }

    pub fn parse_extern(&mut self) -> Result<Prototype, ParserError> {
        self.advance_token(); // consume 'extern'
        self.parse_prototype()
    }

    /// A bare expression becomes the body of a function with an empty name
    /// and no parameters.
    pub fn parse_top_level_expr(&mut self) -> Result<Function, ParserError> {
        let body = self.parse_expression()?;
        let prototype = Prototype {
            name: String::new(),
            args: Vec::new(),
        };
        Ok(Function { prototype, body })
    }

    pub fn try_parse_definition(&mut self) -> Option<Function> {
        report(self.parse_definition())
    }

    pub fn try_parse_extern(&mut self) -> Option<Prototype> {
        report(self.parse_extern())
    }

    pub fn try_parse_top_level_expr(&mut self) -> Option<Function> {
        report(self.parse_top_level_expr())
    }

    /// Parse a whole buffer into top-level units, stopping at the first
    /// syntax error.
    pub fn parse_program(&mut self) -> Result<Vec<ASTNode>, ParserError> {
        let mut nodes = Vec::new();
        loop {
            match self.cur_tok {
                Token::Eof => return Ok(nodes),
                Token::Char(';') => {
                    self.advance_token();
                }
                Token::Def => nodes.push(ASTNode::Function(self.parse_definition()?)),
                Token::Extern => nodes.push(ASTNode::Extern(self.parse_extern()?)),
                _ => nodes.push(ASTNode::Function(self.parse_top_level_expr()?)),
            }
        }
    }
}
