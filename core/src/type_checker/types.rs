use colorful::Colorful;
use std::fmt::{Debug, Display};

//--------------------------------------------------------------------------------------//
//                                     Type System                                      //
//--------------------------------------------------------------------------------------//

/// Generalized trait for type implementations
pub trait TypeTrait {
    /// Check if the type is assignable to the other type.
    /// A type is a subtype of another type if a value of it can be used where the other is expected.
    ///
    /// ## Mathematical Notation
    /// ```ignore
    /// A <: B, where A and B are types.
    /// ```
    ///
    /// ## Examples
    /// ```ignore
    /// Number <: Number
    /// Number <: Number | Null
    /// Null <: Number | Null
    /// Number | Null </: Number
    ///
    /// // Covariant range and contravariant domain
    /// (Number | Null) -> Number <: (Number) -> Number | Null
    /// ```
    fn subtype(&self, other: &Self) -> bool;

    /// Bring the type into its canonical form.
    fn simplify(self) -> Self;
}

/// One `domain -> range` pair of an ordered intersection function type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Arity {
    pub domain: Vec<Type>,
    pub range: Type,
}

impl Arity {
    pub fn new(domain: Vec<Type>, range: Type) -> Self {
        Arity { domain, range }
    }

    /// Whether arguments of the given types may be passed to this arity.
    pub fn accepts(&self, args: &[Type]) -> bool {
        self.domain.len() == args.len()
            && args
                .iter()
                .zip(self.domain.iter())
                .all(|(arg, param)| arg.subtype(param))
    }

    pub fn pretty_print(&self) -> String {
        format!("{} -> {}", print_domain(&self.domain), self.range)
    }

    pub fn pretty_print_color(&self) -> String {
        format!(
            "{} {} {}",
            print_domain_color(&self.domain),
            "->".dark_gray(),
            self.range.pretty_print_color()
        )
    }
}

impl TypeTrait for Arity {
    fn subtype(&self, other: &Self) -> bool {
        self.domain.len() == other.domain.len()
            && other
                .domain
                .iter()
                .zip(self.domain.iter())
                .all(|(theirs, ours)| theirs.subtype(ours))
            && self.range.subtype(&other.range)
    }

    fn simplify(self) -> Self {
        Arity {
            domain: self.domain.into_iter().map(Type::simplify).collect(),
            range: self.range.simplify(),
        }
    }
}

/// An ordered intersection of arities.
/// When applied, the first arity whose domain accepts the arguments is selected.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FunctionType {
    pub arities: Vec<Arity>,
}

impl FunctionType {
    pub fn new(arities: Vec<Arity>) -> Self {
        FunctionType { arities }
    }

    pub fn single(domain: Vec<Type>, range: Type) -> Self {
        FunctionType {
            arities: vec![Arity::new(domain, range)],
        }
    }

    /// Select the first arity accepting `args`, in declared order.
    pub fn select(&self, args: &[Type]) -> Option<&Arity> {
        self.arities.iter().find(|arity| arity.accepts(args))
    }

    pub fn extend(&mut self, other: FunctionType) {
        self.arities.extend(other.arities);
    }

    pub fn pretty_print(&self) -> String {
        self.arities
            .iter()
            .map(Arity::pretty_print)
            .collect::<Vec<_>>()
            .join(" & ")
    }

    pub fn pretty_print_color(&self) -> String {
        self.arities
            .iter()
            .map(Arity::pretty_print_color)
            .collect::<Vec<_>>()
            .join(&" & ".dark_gray().to_string())
    }
}

impl TypeTrait for FunctionType {
    fn subtype(&self, other: &Self) -> bool {
        other
            .arities
            .iter()
            .all(|theirs| self.arities.iter().any(|ours| ours.subtype(theirs)))
    }

    fn simplify(self) -> Self {
        FunctionType {
            arities: self.arities.into_iter().map(Arity::simplify).collect(),
        }
    }
}

/// A type expression.
///
/// The variant order is significant: it defines the canonical order of union members,
/// which keeps `Null` last when printing nullable types.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    /// A non-nullable named type, such as `Number`, `String` or `Boolean`.
    Base(String),

    /// A function type, see [`FunctionType`].
    Function(FunctionType),

    /// An unordered alternation of types.
    /// Always normalized when built through [`Type::union`]: nested unions are flattened,
    /// duplicates removed and members sorted. The empty union is the bottom type.
    Union(Vec<Type>),

    /// The null marker.
    Null,
}

impl Type {
    pub fn base(name: &str) -> Type {
        Type::Base(name.to_string())
    }

    /// The type with no values.
    pub fn nothing() -> Type {
        Type::Union(vec![])
    }

    /// Build a normalized union of the given types.
    pub fn union(members: impl IntoIterator<Item = Type>) -> Type {
        let mut flat = vec![];
        for member in members {
            match member.simplify() {
                Type::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        flat.sort();
        flat.dedup();
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Type::Union(flat)
        }
    }

    /// `T | Null`
    pub fn nullable(self) -> Type {
        Type::union([self, Type::Null])
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Null => true,
            Type::Union(members) => members.iter().any(Type::is_nullable),
            _ => false,
        }
    }

    /// Remove the null marker from the type.
    /// `Null` itself becomes the empty union.
    pub fn remove_null(&self) -> Type {
        match self {
            Type::Null => Type::nothing(),
            Type::Union(members) => {
                Type::union(members.iter().filter(|m| **m != Type::Null).cloned())
            }
            other => other.clone(),
        }
    }

    pub fn pretty_print(&self) -> String {
        self.to_string()
    }

    pub fn pretty_print_color(&self) -> String {
        match self {
            Type::Base(name) => name.clone().light_blue().to_string(),
            Type::Null => "Null".yellow().to_string(),
            Type::Union(members) if members.is_empty() => "Nothing".dark_gray().to_string(),
            Type::Union(members) => members
                .iter()
                .map(Type::pretty_print_color)
                .collect::<Vec<_>>()
                .join(&" | ".dark_gray().to_string()),
            Type::Function(func) => format!(
                "{}{}{}",
                "[".dark_gray(),
                func.pretty_print_color(),
                "]".dark_gray()
            ),
        }
    }
}

impl TypeTrait for Type {
    fn subtype(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Union(members), _) => members.iter().all(|m| m.subtype(other)),
            (_, Type::Union(members)) => members.iter().any(|m| self.subtype(m)),
            (Type::Null, Type::Null) => true,
            (Type::Base(a), Type::Base(b)) => a == b,
            (Type::Function(f1), Type::Function(f2)) => f1.subtype(f2),
            _ => false,
        }
    }

    fn simplify(self) -> Self {
        match self {
            Type::Base(_) | Type::Null => self,
            Type::Function(func) => Type::Function(func.simplify()),
            Type::Union(members) => Type::union(members),
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Base(name) => write!(f, "{}", name),
            Type::Null => write!(f, "Null"),
            Type::Union(members) if members.is_empty() => write!(f, "Nothing"),
            Type::Union(members) => {
                for (i, t) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", t)?;
                }
                Ok(())
            }
            Type::Function(func) => write!(f, "[{}]", func.pretty_print()),
        }
    }
}

impl Display for FunctionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_print())
    }
}

/// Print an argument list as `(A, B)`.
pub fn print_domain(domain: &[Type]) -> String {
    format!(
        "({})",
        domain
            .iter()
            .map(Type::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    )
}

pub fn print_domain_color(domain: &[Type]) -> String {
    format!(
        "{}{}{}",
        "(".dark_gray(),
        domain
            .iter()
            .map(Type::pretty_print_color)
            .collect::<Vec<_>>()
            .join(&", ".dark_gray().to_string()),
        ")".dark_gray()
    )
}

// Standard types
pub mod std_types {
    use super::*;

    /// The type of numeric literals.
    #[allow(non_snake_case)]
    pub fn NUMBER() -> Type {
        Type::base("Number")
    }

    /// The type of string literals.
    #[allow(non_snake_case)]
    pub fn STRING() -> Type {
        Type::base("String")
    }

    /// The type of `true` and `false`.
    #[allow(non_snake_case)]
    pub fn BOOLEAN() -> Type {
        Type::base("Boolean")
    }

    /// `Number | Null`
    #[allow(non_snake_case)]
    pub fn NULLABLE_NUMBER() -> Type {
        NUMBER().nullable()
    }
}
