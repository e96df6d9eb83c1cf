/// The plot variables an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Var {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// One-argument builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func1 {
    Abs,
    Ceil,
    Floor,
    Sqrt,
    Exp,
    Ln,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
}

/// Two-argument builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func2 {
    Pow,
    Atan2,
}

/// A parsed expression tree. Function names and arities are resolved at
/// parse time, so evaluation cannot fail; numeric trouble (poles, domain
/// errors) propagates as `inf`/`NaN` results instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(Var),
    Neg(Box<Expr>),
    BinOp {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Func1 {
        func: Func1,
        arg: Box<Expr>,
    },
    Func2 {
        func: Func2,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// Variable bindings read during evaluation. The sampler writes each sample
/// coordinate here immediately before calling [`Expr::eval`], keeping the
/// bindings explicit rather than shared mutable state.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvalContext {
    pub x: f64,
    pub y: f64,
}

impl Func1 {
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "abs" => Func1::Abs,
            "ceil" => Func1::Ceil,
            "floor" => Func1::Floor,
            "sqrt" => Func1::Sqrt,
            "exp" => Func1::Exp,
            "ln" => Func1::Ln,
            "log10" => Func1::Log10,
            "sin" => Func1::Sin,
            "cos" => Func1::Cos,
            "tan" => Func1::Tan,
            "asin" => Func1::Asin,
            "acos" => Func1::Acos,
            "atan" => Func1::Atan,
            "sinh" => Func1::Sinh,
            "cosh" => Func1::Cosh,
            "tanh" => Func1::Tanh,
            _ => return None,
        };
        Some(func)
    }
}

impl Func2 {
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "pow" => Func2::Pow,
            "atan2" => Func2::Atan2,
            _ => return None,
        };
        Some(func)
    }
}

impl Expr {
    pub fn num(value: f64) -> Self {
        Expr::Num(value)
    }

    pub fn var(var: Var) -> Self {
        Expr::Var(var)
    }

    pub fn neg(expr: Expr) -> Self {
        Expr::Neg(Box::new(expr))
    }

    pub fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::BinOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Whether `var` appears anywhere in this expression.
    pub fn references(&self, var: Var) -> bool {
        match self {
            Expr::Num(_) => false,
            Expr::Var(v) => *v == var,
            Expr::Neg(inner) => inner.references(var),
            Expr::BinOp { lhs, rhs, .. } => lhs.references(var) || rhs.references(var),
            Expr::Func1 { arg, .. } => arg.references(var),
            Expr::Func2 { lhs, rhs, .. } => lhs.references(var) || rhs.references(var),
        }
    }

    /// Evaluate against the bindings in `ctx`.
    pub fn eval(&self, ctx: &EvalContext) -> f64 {
        match self {
            Expr::Num(value) => *value,
            Expr::Var(Var::X) => ctx.x,
            Expr::Var(Var::Y) => ctx.y,
            Expr::Neg(inner) => -inner.eval(ctx),

            Expr::BinOp { op, lhs, rhs } => {
                let lhs = lhs.eval(ctx);
                let rhs = rhs.eval(ctx);
                match op {
                    BinOp::Add => lhs + rhs,
                    BinOp::Sub => lhs - rhs,
                    BinOp::Mul => lhs * rhs,
                    BinOp::Div => lhs / rhs,
                    BinOp::Rem => lhs % rhs,
                    BinOp::Pow => lhs.powf(rhs),
                }
            }

            Expr::Func1 { func, arg } => {
                let arg = arg.eval(ctx);
                match func {
                    Func1::Abs => arg.abs(),
                    Func1::Ceil => arg.ceil(),
                    Func1::Floor => arg.floor(),
                    Func1::Sqrt => arg.sqrt(),
                    Func1::Exp => arg.exp(),
                    Func1::Ln => arg.ln(),
                    Func1::Log10 => arg.log10(),
                    Func1::Sin => arg.sin(),
                    Func1::Cos => arg.cos(),
                    Func1::Tan => arg.tan(),
                    Func1::Asin => arg.asin(),
                    Func1::Acos => arg.acos(),
                    Func1::Atan => arg.atan(),
                    Func1::Sinh => arg.sinh(),
                    Func1::Cosh => arg.cosh(),
                    Func1::Tanh => arg.tanh(),
                }
            }

            Expr::Func2 { func, lhs, rhs } => {
                let lhs = lhs.eval(ctx);
                let rhs = rhs.eval(ctx);
                match func {
                    Func2::Pow => lhs.powf(rhs),
                    Func2::Atan2 => lhs.atan2(rhs),
                }
            }
        }
    }
}
