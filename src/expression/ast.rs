use crate::expression::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Lit(Value),
    /// Feature attribute reference: `[name]`.
    Attr(String),
    /// Context variable: `zoom`, or a caller-provided name.
    Var(String),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        func: String,
        args: Vec<Expr>,
    },
    /// String template parts, stringified and joined.
    Concat(Vec<Expr>),
}

impl Expr {
    pub(crate) fn is_constant(&self) -> bool {
        match self {
            Expr::Lit(_) => true,
            Expr::Attr(_) | Expr::Var(_) => false,
            Expr::Unary { expr, .. } => expr.is_constant(),
            Expr::Binary { left, right, .. } => left.is_constant() && right.is_constant(),
            Expr::Call { args, .. } => args.iter().all(Expr::is_constant),
            Expr::Concat(parts) => parts.iter().all(Expr::is_constant),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}
