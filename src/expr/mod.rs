use thiserror::Error;

mod ast;
mod lexer;
mod parser;

pub use ast::EvalContext;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid character `{0}` in expression")]
    InvalidCharacter(String),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("unknown name `{0}`; expressions are written in terms of x and y")]
    UnknownName(String),

    #[error("`{name}` takes {expected} argument(s)")]
    WrongArity { name: String, expected: usize },

    #[error("unexpected `{0}` in expression")]
    UnexpectedToken(String),

    #[error("expression ended unexpectedly")]
    UnexpectedEnd,
}

/// A compiled expression, ready for repeated evaluation. Dropping it
/// releases everything; there is nothing else to clean up.
#[derive(Debug, Clone)]
pub struct Program {
    ast: ast::Expr,
    uses_x: bool,
    uses_y: bool,
}

/// Compile an expression over the variables `x` and `y`.
pub fn compile(input: &str) -> Result<Program, Error> {
    let ast = parser::parse(input)?;
    let uses_x = ast.references(ast::Var::X);
    let uses_y = ast.references(ast::Var::Y);

    Ok(Program {
        ast,
        uses_x,
        uses_y,
    })
}

impl Program {
    /// Evaluate against the variable bindings in `ctx`.
    pub fn eval(&self, ctx: &EvalContext) -> f64 {
        self.ast.eval(ctx)
    }

    /// Whether the expression references `x`.
    pub fn uses_x(&self) -> bool {
        self.uses_x
    }

    /// Whether the expression references `y`.
    pub fn uses_y(&self) -> bool {
        self.uses_y
    }
}
