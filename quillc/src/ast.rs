use std::borrow::Cow;

use crate::span::Spand;

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(Cow<'a, str>),
    Ident(&'a str),

    List(Box<[Expr<'a>]>),
    Record(Box<[Field<'a>]>),

    Neg(Box<Expr<'a>>),

    Call {
        callee: Box<Expr<'a>>,
        args:   Box<[Expr<'a>]>,
    },
}

pub type Expr<'a> = Spand<ExprKind<'a>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub key:   Spand<Cow<'a, str>>,
    pub value: Expr<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind<'a> {
    Let { name: &'a str, bind: Expr<'a> },
    Assign { name: &'a str, value: Expr<'a> },
    /// expression without a trailing `;`, its value is the statement's value
    Expr(Expr<'a>),
    Semi(Expr<'a>),
}

pub type Stmt<'a> = Spand<StmtKind<'a>>;
