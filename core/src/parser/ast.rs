use std::fmt::Display;

use crate::{lexer::lexer::InputSource, util::error::LineInfo};

#[derive(Debug, Clone)]
pub struct ParamAst {
    pub name: String,
    pub ty: Option<TypeAst>,
    pub info: LineInfo,
}

impl PartialEq for ParamAst {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

/// A `(domain, ...) -> range` pair as written in an annotation.
#[derive(Debug, Clone)]
pub struct ArityAst {
    pub domain: Vec<TypeAst>,
    pub range: TypeAst,
    pub info: LineInfo,
}

impl PartialEq for ArityAst {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain && self.range == other.range
    }
}

impl ArityAst {
    pub fn print_expr(&self) -> String {
        format!(
            "({}) -> {}",
            self.domain
                .iter()
                .map(TypeAst::print_expr)
                .collect::<Vec<_>>()
                .join(", "),
            self.range.print_expr()
        )
    }
}

#[derive(Debug, Clone)]
pub enum TypeAst {
    Identifier {
        /// The name of the type.
        name: String,
        info: LineInfo,
    },
    /// The null marker, written `Null` or `null`.
    Null { info: LineInfo },
    Union {
        members: Vec<TypeAst>,
        info: LineInfo,
    },
    /// A bracketed ordered intersection, `[(A) -> B & (C) -> D]`.
    Function {
        arities: Vec<ArityAst>,
        info: LineInfo,
    },
}

impl TypeAst {
    pub fn info(&self) -> &LineInfo {
        match self {
            TypeAst::Identifier { info, .. } => info,
            TypeAst::Null { info } => info,
            TypeAst::Union { info, .. } => info,
            TypeAst::Function { info, .. } => info,
        }
    }

    pub fn print_expr(&self) -> String {
        match self {
            TypeAst::Identifier { name, .. } => name.clone(),
            TypeAst::Null { .. } => "Null".to_string(),
            TypeAst::Union { members, .. } => members
                .iter()
                .map(TypeAst::print_expr)
                .collect::<Vec<_>>()
                .join(" | "),
            TypeAst::Function { arities, .. } => format!(
                "[{}]",
                arities
                    .iter()
                    .map(ArityAst::print_expr)
                    .collect::<Vec<_>>()
                    .join(" & ")
            ),
        }
    }
}

impl PartialEq for TypeAst {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Identifier { name: l0, .. }, Self::Identifier { name: r0, .. }) => l0 == r0,
            (Self::Null { .. }, Self::Null { .. }) => true,
            (Self::Union { members: l0, .. }, Self::Union { members: r0, .. }) => l0 == r0,
            (Self::Function { arities: l0, .. }, Self::Function { arities: r0, .. }) => l0 == r0,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// The source text of a numeric literal.
    Number(String),
    String(String),
    Boolean(bool),
    Null,
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "{:?}", s),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

/// **Expressions** in a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// A constant written directly in the source code.
    Literal { value: Literal, info: LineInfo },
    /// A reference to one of the enclosing function's parameters.
    Argument { name: String, info: LineInfo },
    /// `if test then then [else otherwise]`
    Conditional {
        test: Box<Ast>,
        then: Box<Ast>,
        otherwise: Option<Box<Ast>>,
        info: LineInfo,
    },
    /// An application of a declared operation or annotated function.
    /// Binary operators such as `a + b` are operations named by their symbol.
    Operation {
        name: String,
        args: Vec<Ast>,
        infix: bool,
        info: LineInfo,
    },
}

impl Ast {
    pub fn info(&self) -> &LineInfo {
        match self {
            Ast::Literal { info, .. } => info,
            Ast::Argument { info, .. } => info,
            Ast::Conditional { info, .. } => info,
            Ast::Operation { info, .. } => info,
        }
    }

    /// Whether the expression needs parentheses when nested inside an infix operation.
    fn is_compound(&self) -> bool {
        matches!(
            self,
            Ast::Conditional { .. } | Ast::Operation { infix: true, .. }
        )
    }

    /// Print the expression back in surface syntax.
    pub fn print_expr(&self) -> String {
        match self {
            Ast::Literal { value, .. } => value.to_string(),
            Ast::Argument { name, .. } => name.clone(),
            Ast::Conditional {
                test,
                then,
                otherwise,
                ..
            } => match otherwise {
                Some(otherwise) => format!(
                    "if {} then {} else {}",
                    test.print_expr(),
                    then.print_expr(),
                    otherwise.print_expr()
                ),
                None => format!("if {} then {}", test.print_expr(), then.print_expr()),
            },
            Ast::Operation {
                name,
                args,
                infix: true,
                ..
            } if args.len() == 2 => {
                let operand = |a: &Ast| {
                    if a.is_compound() {
                        format!("({})", a.print_expr())
                    } else {
                        a.print_expr()
                    }
                };
                format!("{} {} {}", operand(&args[0]), name, operand(&args[1]))
            }
            Ast::Operation { name, args, .. } => format!(
                "{}({})",
                name,
                args.iter()
                    .map(Ast::print_expr)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl Display for Ast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print_expr())
    }
}

/// A top-level item of a module.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `ann name : (A) -> B & ...;`
    Annotation {
        name: String,
        arities: Vec<ArityAst>,
        info: LineInfo,
    },
    /// `fn name(a: A, b) -> R = body;`
    Function {
        name: String,
        params: Vec<ParamAst>,
        return_type: Option<TypeAst>,
        body: Ast,
        info: LineInfo,
    },
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Annotation { name, .. } => name,
            Declaration::Function { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub declarations: Vec<Declaration>,
    pub source: InputSource,
}

impl Module {
    pub fn new(name: String, declarations: Vec<Declaration>, source: InputSource) -> Self {
        Self {
            name,
            declarations,
            source,
        }
    }
}
