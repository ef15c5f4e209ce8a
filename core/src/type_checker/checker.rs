use std::fmt::Display;

use rayon::prelude::*;

use crate::{
    parser::ast::{Ast, Literal},
    util::error::{BaseError, LineInfo},
};

use super::{
    namespace::{AnnotatedFunction, Namespace},
    narrow::{narrow, TypeEnv},
    types::{print_domain, std_types, Arity, FunctionType, Type, TypeTrait},
};

/// A type error is a malformed declaration that stops a function from being checked.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeError {
    pub inner: BaseError,
}

impl TypeError {
    pub fn new(message: String, info: LineInfo) -> Self {
        Self {
            inner: BaseError::new(message, info),
        }
    }

    pub fn with_hint(self, hint: String) -> Self {
        Self {
            inner: self.inner.with_hint(hint),
        }
    }

    pub fn with_label(self, message: String, info: LineInfo) -> Self {
        Self {
            inner: self.inner.with_label(message, info),
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for TypeError {}

// The result of the type checker stage
pub type TypeResult<T> = Result<T, TypeError>;

/// What disagreed at a violation site.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    /// No arity of `operation` accepts the argument types.
    /// `expected` is the domain of the first declared arity.
    Arguments {
        operation: String,
        expected: Vec<Type>,
        actual: Vec<Type>,
    },
    /// The function body is not assignable to the declared range.
    Return { expected: Type, actual: Type },
}

impl Mismatch {
    pub fn expected_text(&self) -> String {
        match self {
            Mismatch::Arguments { expected, .. } => print_domain(expected),
            Mismatch::Return { expected, .. } => expected.to_string(),
        }
    }

    pub fn actual_text(&self) -> String {
        match self {
            Mismatch::Arguments { actual, .. } => print_domain(actual),
            Mismatch::Return { actual, .. } => actual.to_string(),
        }
    }
}

/// A place where a value may be used at a type that does not allow it.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The function whose body contains the site.
    pub function: String,
    /// The arity being checked, when the function declares more than one.
    pub arity: Option<usize>,
    pub mismatch: Mismatch,
    /// The offending sub-expression, printed.
    pub expr: String,
    pub info: LineInfo,
    pub explanation: String,
}

/// The outcome of checking one function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionReport {
    pub name: String,
    pub info: LineInfo,
    pub result: TypeResult<Vec<Violation>>,
}

/// The outcome of checking a namespace, in function declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckReport {
    pub functions: Vec<FunctionReport>,
}

impl CheckReport {
    /// All violations, in the order they were found.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.functions
            .iter()
            .filter_map(|f| f.result.as_ref().ok())
            .flatten()
    }

    /// Functions that could not be checked.
    pub fn errors(&self) -> impl Iterator<Item = (&FunctionReport, &TypeError)> {
        self.functions
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|err| (f, err)))
    }

    pub fn is_success(&self) -> bool {
        self.functions
            .iter()
            .all(|f| matches!(&f.result, Ok(violations) if violations.is_empty()))
    }
}

/// Check every function of `namespace`.
pub fn check(namespace: &Namespace) -> CheckReport {
    TypeChecker::new(namespace).check_all()
}

/// Where violations found by the current walk belong.
struct Site<'f> {
    function: &'f AnnotatedFunction,
    arity: Option<usize>,
}

impl Site<'_> {
    fn violation(&self, mismatch: Mismatch, expr: &Ast, explanation: String) -> Violation {
        Violation {
            function: self.function.name.clone(),
            arity: self.arity,
            mismatch,
            expr: expr.print_expr(),
            info: expr.info().clone(),
            explanation,
        }
    }
}

/// The type checker infers the type of every sub-expression of a function body
/// and verifies it against the declared operation and function types.
#[derive(Debug, Clone, Copy)]
pub struct TypeChecker<'a> {
    namespace: &'a Namespace,
}

impl<'a> TypeChecker<'a> {
    pub fn new(namespace: &'a Namespace) -> Self {
        TypeChecker { namespace }
    }

    /// Check all functions, in parallel. Results keep declaration order.
    pub fn check_all(&self) -> CheckReport {
        let functions = self.namespace.functions();
        log::info!("Checking {} function(s)", functions.len());
        let functions = (0..functions.len())
            .into_par_iter()
            .filter_map(|index| self.check_function(index))
            .collect();
        CheckReport { functions }
    }

    /// Check the function at `index` in declaration order,
    /// or `None` if there is no such function.
    pub fn check_function(&self, index: usize) -> Option<FunctionReport> {
        let function = self.namespace.functions().get(index)?;
        Some(FunctionReport {
            name: function.name.clone(),
            info: function.info.clone(),
            result: self.check_function_violations(index, function),
        })
    }

    fn check_function_violations(
        &self,
        index: usize,
        function: &AnnotatedFunction,
    ) -> TypeResult<Vec<Violation>> {
        log::debug!("Checking function '{}'", function.name);
        if let Some(first) = self.namespace.functions()[..index]
            .iter()
            .find(|f| f.name == function.name)
        {
            return Err(TypeError::new(
                format!("Function '{}' is already defined", function.name),
                function.info.clone(),
            )
            .with_label("first defined here".to_string(), first.info.clone()));
        }
        let Some(ty) = &function.ty else {
            return Err(TypeError::new(
                format!("Function '{}' is missing a type annotation", function.name),
                function.info.clone(),
            )
            .with_hint(format!(
                "Annotate it with 'ann {} : (...) -> ...' or type its parameters and return value",
                function.name
            )));
        };
        if ty.arities.is_empty() {
            return Err(TypeError::new(
                format!("Function '{}' has no arities", function.name),
                function.info.clone(),
            ));
        }
        for arity in &ty.arities {
            if arity.domain.len() != function.params.len() {
                return Err(TypeError::new(
                    format!(
                        "Function '{}' takes {} parameter(s) but its annotation {} has {}",
                        function.name,
                        function.params.len(),
                        arity.pretty_print(),
                        arity.domain.len()
                    ),
                    function.info.clone(),
                ));
            }
        }

        let multiple = ty.arities.len() > 1;
        let mut violations = vec![];
        for (i, arity) in ty.arities.iter().enumerate() {
            let site = Site {
                function,
                arity: multiple.then_some(i + 1),
            };
            violations.extend(self.check_arity(&site, arity)?);
        }
        Ok(violations)
    }

    /// Check the body against one arity; the body root is the return site.
    fn check_arity(&self, site: &Site, arity: &Arity) -> TypeResult<Vec<Violation>> {
        let function = site.function;
        let env: TypeEnv = function
            .params
            .iter()
            .cloned()
            .zip(arity.domain.iter().cloned())
            .collect();
        let mut body_violations = vec![];
        let body_type = self.check_expr(site, &function.body, &env, &mut body_violations)?;
        let mut violations = vec![];
        if !body_type.subtype(&arity.range) {
            let explanation = if body_type.is_nullable() && !arity.range.is_nullable() {
                format!(
                    "'{}' may return null, but its declared range {} does not allow it",
                    function.name, arity.range
                )
            } else {
                format!(
                    "The body of '{}' has type {}, which is not assignable to its declared range {}",
                    function.name, body_type, arity.range
                )
            };
            violations.push(site.violation(
                Mismatch::Return {
                    expected: arity.range.clone(),
                    actual: body_type,
                },
                &function.body,
                explanation,
            ));
        }
        violations.extend(body_violations);
        Ok(violations)
    }

    /// Infer the type of an expression, collecting violations in pre-order.
    fn check_expr(
        &self,
        site: &Site,
        expr: &Ast,
        env: &TypeEnv,
        violations: &mut Vec<Violation>,
    ) -> TypeResult<Type> {
        Ok(match expr {
            Ast::Literal { value, .. } => check_literal(value),
            Ast::Argument { name, info } => self.check_argument(site, name, env, info)?,
            Ast::Conditional {
                test,
                then,
                otherwise,
                ..
            } => self.check_conditional(site, test, then, otherwise.as_deref(), env, violations)?,
            Ast::Operation { name, args, info, .. } => {
                self.check_operation(site, expr, name, args, info, env, violations)?
            }
        })
    }

    fn check_argument(
        &self,
        site: &Site,
        name: &str,
        env: &TypeEnv,
        info: &LineInfo,
    ) -> TypeResult<Type> {
        env.get(name).cloned().ok_or_else(|| {
            TypeError::new(format!("Unknown argument '{}'", name), info.clone()).with_hint(
                if site.function.params.is_empty() {
                    format!("'{}' takes no parameters", site.function.name)
                } else {
                    format!(
                        "The parameters of '{}' are: {}",
                        site.function.name,
                        site.function.params.join(", ")
                    )
                },
            )
        })
    }

    fn check_conditional(
        &self,
        site: &Site,
        test: &Ast,
        then: &Ast,
        otherwise: Option<&Ast>,
        env: &TypeEnv,
        violations: &mut Vec<Violation>,
    ) -> TypeResult<Type> {
        self.check_expr(site, test, env, violations)?;
        let narrowings = narrow(env, test);
        let then_type = self.check_expr(site, then, &narrowings.then, violations)?;
        let otherwise_type = match otherwise {
            Some(otherwise) => self.check_expr(site, otherwise, &narrowings.otherwise, violations)?,
            None => Type::Null,
        };
        Ok(Type::union([then_type, otherwise_type]))
    }

    #[allow(clippy::too_many_arguments)]
    fn check_operation(
        &self,
        site: &Site,
        expr: &Ast,
        name: &str,
        args: &[Ast],
        info: &LineInfo,
        env: &TypeEnv,
        violations: &mut Vec<Violation>,
    ) -> TypeResult<Type> {
        let ty = self.lookup_operation(name, info)?;
        let mut arg_violations = vec![];
        let arg_types = args
            .iter()
            .map(|arg| self.check_expr(site, arg, env, &mut arg_violations))
            .collect::<TypeResult<Vec<_>>>()?;

        let first = ty.arities.first().ok_or_else(|| {
            TypeError::new(format!("Operation '{}' has no arities", name), info.clone())
        })?;
        let result = match ty.select(&arg_types) {
            Some(arity) => {
                log::trace!(
                    "Selected '{}' : {} for {}",
                    name,
                    arity.pretty_print(),
                    print_domain(&arg_types)
                );
                arity.range.clone()
            }
            None => {
                log::trace!(
                    "No arity of '{}' : {} accepts {}",
                    name,
                    ty,
                    print_domain(&arg_types)
                );
                violations.push(site.violation(
                    Mismatch::Arguments {
                        operation: name.to_string(),
                        expected: first.domain.clone(),
                        actual: arg_types.clone(),
                    },
                    expr,
                    explain_arguments(name, first, &arg_types),
                ));
                // Carry on as if the first arity applied
                first.range.clone()
            }
        };
        violations.extend(arg_violations);
        Ok(result)
    }

    /// Declared operations come first, then the namespace's functions,
    /// then the built-in operations they shadow.
    fn lookup_operation(&self, name: &str, info: &LineInfo) -> TypeResult<&'a FunctionType> {
        let operation = self.namespace.lookup_operation(name);
        if let (true, Some(ty)) = (self.namespace.is_declared(name), operation) {
            return Ok(ty);
        }
        match self.namespace.lookup_function(name) {
            Some(AnnotatedFunction { ty: Some(ty), .. }) => Ok(ty),
            Some(function) => Err(TypeError::new(
                format!("Operation '{}' refers to an unannotated function", name),
                info.clone(),
            )
            .with_label("defined here".to_string(), function.info.clone())),
            None => operation.ok_or_else(|| {
                TypeError::new(format!("Unknown operation '{}'", name), info.clone()).with_hint(
                    format!("Declare it with 'ann {} : (...) -> ...'", name),
                )
            }),
        }
    }
}

fn check_literal(value: &Literal) -> Type {
    match value {
        Literal::Number(_) => std_types::NUMBER(),
        Literal::String(_) => std_types::STRING(),
        Literal::Boolean(_) => std_types::BOOLEAN(),
        Literal::Null => Type::Null,
    }
}

fn explain_arguments(name: &str, expected: &Arity, actual: &[Type]) -> String {
    if expected.domain.len() != actual.len() {
        return format!(
            "'{}' expects {} argument(s), found {}",
            name,
            expected.domain.len(),
            actual.len()
        );
    }
    let offending = actual
        .iter()
        .zip(expected.domain.iter())
        .position(|(arg, param)| !arg.subtype(param));
    match offending {
        Some(i) if actual[i].is_nullable() && !expected.domain[i].is_nullable() => format!(
            "Argument {} of '{}' may be null, but {} does not allow it",
            i + 1,
            name,
            expected.domain[i]
        ),
        Some(i) => format!(
            "Argument {} of '{}' has type {}, expected {}",
            i + 1,
            name,
            actual[i],
            expected.domain[i]
        ),
        None => format!(
            "No arity of '{}' accepts arguments of type {}",
            name,
            print_domain(actual)
        ),
    }
}
