use std::iter::Peekable;
use std::str::FromStr;

use super::{
    ast::{BinOp, Expr, Func1, Func2, Var},
    lexer::{Lexeme, Lexer, Token},
    Error,
};

type Result<T> = std::result::Result<T, Error>;

/// Parse `input` into an expression tree.
///
/// Grammar, loosest binding first:
///
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/' | '%') factor)*
/// factor := ('-' | '+') factor | power
/// power  := atom ('^' factor)?
/// atom   := number | ident | ident '(' expr (',' expr)* ')' | '(' expr ')'
/// ```
///
/// `^` binds tighter than unary minus and is right-associative, so `-x^2`
/// is `-(x^2)` and `2^3^2` is `2^(3^2)`.
pub fn parse(input: &str) -> Result<Expr> {
    let mut parser = Parser::new(Lexer::new(input));
    let expr = parser.expr()?;
    parser.finish()?;
    Ok(expr)
}

struct Parser<'a> {
    lexer: Peekable<Lexer<'a>>,
}

impl<'a> Parser<'a> {
    fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer: lexer.peekable(),
        }
    }

    fn token(&mut self) -> Result<Lexeme> {
        match self.lexer.next() {
            Some(lexeme) if lexeme.token == Token::Error => {
                Err(Error::InvalidCharacter(lexeme.text))
            }
            Some(lexeme) => Ok(lexeme),
            None => Err(Error::UnexpectedEnd),
        }
    }

    fn peek(&mut self) -> Option<&Token> {
        self.lexer.peek().map(|lexeme| &lexeme.token)
    }

    fn bump(&mut self) {
        self.lexer.next();
    }

    fn guard(&mut self, token: Token) -> Result<Lexeme> {
        let tok = self.token()?;
        if tok.token != token {
            Err(Error::UnexpectedToken(tok.text))
        } else {
            Ok(tok)
        }
    }

    /// The whole input must have been consumed.
    fn finish(&mut self) -> Result<()> {
        match self.lexer.next() {
            None => Ok(()),
            Some(lexeme) if lexeme.token == Token::Error => {
                Err(Error::InvalidCharacter(lexeme.text))
            }
            Some(lexeme) => Err(Error::UnexpectedToken(lexeme.text)),
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        let mut lhs = self.term()?;

        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.term()?;
            lhs = Expr::bin(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut lhs = self.factor()?;

        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => break,
            };
            self.bump();
            let rhs = self.factor()?;
            lhs = Expr::bin(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                Ok(Expr::neg(self.factor()?))
            }
            Some(Token::Plus) => {
                self.bump();
                self.factor()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.atom()?;

        if let Some(Token::Caret) = self.peek() {
            self.bump();
            let exponent = self.factor()?;
            Ok(Expr::bin(BinOp::Pow, base, exponent))
        } else {
            Ok(base)
        }
    }

    fn atom(&mut self) -> Result<Expr> {
        let tok = self.token()?;
        match tok.token {
            Token::Number => {
                let value =
                    f64::from_str(&tok.text).map_err(|_| Error::InvalidNumber(tok.text.clone()))?;
                Ok(Expr::num(value))
            }

            Token::LParen => {
                let inner = self.expr()?;
                self.guard(Token::RParen)?;
                Ok(inner)
            }

            Token::Ident => self.ident(tok.text),

            _ => Err(Error::UnexpectedToken(tok.text)),
        }
    }

    /// Resolve an identifier: a variable, a constant, or a function call.
    fn ident(&mut self, name: String) -> Result<Expr> {
        match name.as_str() {
            "x" => return Ok(Expr::var(Var::X)),
            "y" => return Ok(Expr::var(Var::Y)),
            "pi" => return Ok(Expr::num(std::f64::consts::PI)),
            "e" => return Ok(Expr::num(std::f64::consts::E)),
            _ => {}
        }

        if let Some(func) = Func1::from_name(&name) {
            return match <[Expr; 1]>::try_from(self.args()?) {
                Ok([arg]) => Ok(Expr::Func1 {
                    func,
                    arg: Box::new(arg),
                }),
                Err(_) => Err(Error::WrongArity { name, expected: 1 }),
            };
        }

        if let Some(func) = Func2::from_name(&name) {
            return match <[Expr; 2]>::try_from(self.args()?) {
                Ok([lhs, rhs]) => Ok(Expr::Func2 {
                    func,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                }),
                Err(_) => Err(Error::WrongArity { name, expected: 2 }),
            };
        }

        Err(Error::UnknownName(name))
    }

    fn args(&mut self) -> Result<Vec<Expr>> {
        self.guard(Token::LParen)?;

        let mut args = vec![self.expr()?];
        while let Some(Token::Comma) = self.peek() {
            self.bump();
            args.push(self.expr()?);
        }

        self.guard(Token::RParen)?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ast::EvalContext;

    fn eval(input: &str, x: f64, y: f64) -> f64 {
        let expr = parse(input).unwrap();
        expr.eval(&EvalContext { x, y })
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1+2*3", 0.0, 0.0), 7.0);
        assert_eq!(eval("(1+2)*3", 0.0, 0.0), 9.0);
        assert_eq!(eval("10-4-3", 0.0, 0.0), 3.0);
        assert_eq!(eval("10%3", 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_power_binds_tight_and_right() {
        assert_eq!(eval("2^3^2", 0.0, 0.0), 512.0);
        assert_eq!(eval("-x^2", 2.0, 0.0), -4.0);
        assert_eq!(eval("2^-1", 0.0, 0.0), 0.5);
    }

    #[test]
    fn test_variables_and_constants() {
        assert_eq!(eval("x*y", 3.0, 4.0), 12.0);
        approx::assert_relative_eq!(eval("pi", 0.0, 0.0), std::f64::consts::PI);
        approx::assert_relative_eq!(eval("e", 0.0, 0.0), std::f64::consts::E);
    }

    #[test]
    fn test_functions() {
        approx::assert_relative_eq!(eval("sin(pi/2)", 0.0, 0.0), 1.0);
        approx::assert_relative_eq!(eval("sqrt(x)", 9.0, 0.0), 3.0);
        assert_eq!(eval("pow(2,10)", 0.0, 0.0), 1024.0);
        approx::assert_relative_eq!(eval("atan2(1,1)", 0.0, 0.0), std::f64::consts::FRAC_PI_4);
        assert_eq!(eval("abs(-3)", 0.0, 0.0), 3.0);
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(parse("k^2"), Err(Error::UnknownName("k".to_string())));
        assert_eq!(parse("sine(x)"), Err(Error::UnknownName("sine".to_string())));
    }

    #[test]
    fn test_wrong_arity() {
        assert_eq!(
            parse("pow(2)"),
            Err(Error::WrongArity {
                name: "pow".to_string(),
                expected: 2
            })
        );
        assert_eq!(
            parse("sin(x,y)"),
            Err(Error::WrongArity {
                name: "sin".to_string(),
                expected: 1
            })
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse(""), Err(Error::UnexpectedEnd));
        assert_eq!(parse("1+"), Err(Error::UnexpectedEnd));
        assert_eq!(parse("(x"), Err(Error::UnexpectedEnd));
        assert_eq!(parse("x 2"), Err(Error::UnexpectedToken("2".to_string())));
        assert_eq!(parse("x$2"), Err(Error::InvalidCharacter("$".to_string())));
    }
}
