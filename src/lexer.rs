/// The smallest classified lexical unit pulled from the input stream.
#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Eof,
    Def,
    Extern,
    Ident(String),
    Number(f64),
    /// Any other single character, raw - punctuation and operators alike.
    Char(char),
}

/// A streaming tokenizer over a character source. At most one character is
/// buffered, so the source is never rewound or held in memory.
pub struct Lexer<I: Iterator<Item = char>> {
    chars: I,
    lookahead: Option<char>,
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn new(chars: I) -> Self {
        Lexer {
            chars,
            lookahead: None,
        }
    }

    fn peek(&mut self) -> Option<char> {
        if self.lookahead.is_none() {
            self.lookahead = self.chars.next();
        }
        self.lookahead
    }

    fn bump(&mut self) -> Option<char> {
        self.lookahead.take().or_else(|| self.chars.next())
    }

    /// Pull the next token, consuming exactly the characters it spans.
    pub fn next_token(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }

        let c = match self.peek() {
            Some(c) => c,
            None => return Token::Eof,
        };

        if c.is_ascii_alphabetic() {
            let mut ident = String::new();
            while let Some(c) = self.peek() {
                if !c.is_ascii_alphanumeric() {
                    break;
                }
                ident.push(c);
                self.bump();
            }
            return match ident.as_str() {
                "def" => Token::Def,
                "extern" => Token::Extern,
                _ => Token::Ident(ident),
            };
        }

        if c.is_ascii_digit() || c == '.' {
            let mut digits = String::new();
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() && c != '.' {
                    break;
                }
                digits.push(c);
                self.bump();
            }
            // the scan admits runs like "1.2.3"; those fail conversion and
            // collapse to zero instead of aborting the lex
            return Token::Number(digits.parse().unwrap_or(0.0));
        }

        if c == '#' {
            // comment runs to end of line; the newline stays buffered and
            // the whitespace skip of the recursion consumes it
            while let Some(c) = self.peek() {
                if c == '\n' || c == '\r' {
                    break;
                }
                self.bump();
            }
            return self.next_token();
        }

        self.bump();
        Token::Char(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input.chars());
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn lex_works() {
        let input = "def add(x) x+1.0;";
        let tokenized = [
            Token::Def,
            Token::Ident("add".to_string()),
            Token::Char('('),
            Token::Ident("x".to_string()),
            Token::Char(')'),
            Token::Ident("x".to_string()),
            Token::Char('+'),
            Token::Number(1.0),
            Token::Char(';'),
            Token::Eof,
        ];
        assert_eq!(lex(input), tokenized);
    }

    #[test]
    fn keywords_need_exact_match() {
        assert_eq!(
            lex("extern definition"),
            [
                Token::Extern,
                Token::Ident("definition".to_string()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn comments_yield_no_tokens() {
        assert_eq!(lex("# comment\n1"), [Token::Number(1.0), Token::Eof]);
        assert_eq!(lex("1 # trailing"), [Token::Number(1.0), Token::Eof]);
        assert_eq!(lex("# only a comment"), [Token::Eof]);
    }

    #[test]
    fn numbers_may_start_with_a_dot() {
        assert_eq!(lex(".5"), [Token::Number(0.5), Token::Eof]);
    }

    #[test]
    fn malformed_number_runs_collapse_to_zero() {
        assert_eq!(lex("1.2.3"), [Token::Number(0.0), Token::Eof]);
    }

    #[test]
    fn whitespace_runs_are_skipped() {
        assert_eq!(
            lex("  a \n\t b"),
            [
                Token::Ident("a".to_string()),
                Token::Ident("b".to_string()),
                Token::Eof,
            ]
        );
    }
}
