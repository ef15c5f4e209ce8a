use std::collections::HashMap;

use crate::{
    parser::ast::{ArityAst, Ast, Declaration, Module, TypeAst},
    stdlib::init::prelude,
    util::error::LineInfo,
};

use super::types::{Arity, FunctionType, Type};

/// A function together with its declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedFunction {
    pub name: String,
    pub params: Vec<String>,
    /// `None` when the function was defined without an annotation.
    pub ty: Option<FunctionType>,
    pub body: Ast,
    pub info: LineInfo,
}

impl AnnotatedFunction {
    pub fn new(name: &str, params: &[&str], ty: Option<FunctionType>, body: Ast) -> Self {
        let info = body.info().clone();
        AnnotatedFunction {
            name: name.to_string(),
            params: params.iter().map(|p| p.to_string()).collect(),
            ty,
            body,
            info,
        }
    }
}

/// The set of declared operations and annotated functions checked together.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    /// Every operation, built-in arities first.
    operations: HashMap<String, FunctionType>,
    /// Only the arities declared with `ann`.
    declared: HashMap<String, FunctionType>,
    functions: Vec<AnnotatedFunction>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A namespace with the default operations declared.
    pub fn with_prelude() -> Self {
        let mut namespace = Self::new();
        prelude().init_namespace(&mut namespace);
        namespace
    }

    /// Declare a built-in operation. User functions of the same name shadow it.
    pub fn add_builtin(&mut self, name: &str, ty: FunctionType) {
        log::trace!("Declaring built-in operation '{}' : {}", name, ty);
        extend_entry(&mut self.operations, name, ty);
    }

    /// Declare an operation. Declaring an existing name appends the new arities
    /// after the existing ones, built-in arities included.
    pub fn add_operation(&mut self, name: &str, ty: FunctionType) {
        log::trace!("Declaring operation '{}' : {}", name, ty);
        extend_entry(&mut self.declared, name, ty.clone());
        extend_entry(&mut self.operations, name, ty);
    }

    pub fn add_function(&mut self, function: AnnotatedFunction) {
        log::debug!(
            "Adding function '{}' with {}",
            function.name,
            match &function.ty {
                Some(ty) => format!("type {}", ty),
                None => "no annotation".to_string(),
            }
        );
        self.functions.push(function);
    }

    pub fn functions(&self) -> &[AnnotatedFunction] {
        &self.functions
    }

    /// All arities of an operation, built-in or declared.
    pub fn lookup_operation(&self, name: &str) -> Option<&FunctionType> {
        self.operations.get(name)
    }

    /// Whether `name` was declared with `ann` rather than only built in.
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains_key(name)
    }

    /// The first function defined with the given name.
    pub fn lookup_function(&self, name: &str) -> Option<&AnnotatedFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Add every declaration of `module`, returning the number of functions added.
    ///
    /// An `ann` names the type of a function defined in the same module, or else
    /// declares an operation. A fully annotated `fn` signature takes precedence over `ann`.
    pub fn load_module(&mut self, module: &Module) -> usize {
        let defined = module
            .declarations
            .iter()
            .filter_map(|d| match d {
                Declaration::Function { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>();

        let mut annotations: HashMap<&str, FunctionType> = HashMap::new();
        for declaration in &module.declarations {
            let Declaration::Annotation { name, arities, .. } = declaration else {
                continue;
            };
            let ty = resolve_arities(arities);
            if defined.contains(&name.as_str()) {
                annotations
                    .entry(name.as_str())
                    .and_modify(|existing| existing.extend(ty.clone()))
                    .or_insert(ty);
            } else {
                self.add_operation(name, ty);
            }
        }

        let mut added = 0;
        for declaration in &module.declarations {
            let Declaration::Function {
                name,
                params,
                return_type,
                body,
                info,
            } = declaration
            else {
                continue;
            };
            let domain = params
                .iter()
                .map(|p| p.ty.as_ref().map(resolve_type))
                .collect::<Option<Vec<_>>>();
            let inline = match (domain, return_type) {
                (Some(domain), Some(range)) => {
                    Some(FunctionType::single(domain, resolve_type(range)))
                }
                _ => None,
            };
            let declared = annotations
                .get(name.as_str())
                .or_else(|| self.declared.get(name))
                .cloned();
            let ty = match (inline, declared) {
                (Some(inline), Some(_)) => {
                    log::warn!(
                        "Function '{}' has an inline signature, its separate annotation is ignored",
                        name
                    );
                    Some(inline)
                }
                (Some(inline), None) => Some(inline),
                (None, declared) => declared,
            };
            self.add_function(AnnotatedFunction {
                name: name.clone(),
                params: params.iter().map(|p| p.name.clone()).collect(),
                ty,
                body: body.clone(),
                info: info.clone(),
            });
            added += 1;
        }
        added
    }
}

fn extend_entry(map: &mut HashMap<String, FunctionType>, name: &str, ty: FunctionType) {
    match map.get_mut(name) {
        Some(existing) => existing.extend(ty),
        None => {
            map.insert(name.to_string(), ty);
        }
    }
}

/// Turn a written type into a type expression.
pub fn resolve_type(ty: &TypeAst) -> Type {
    match ty {
        TypeAst::Identifier { name, .. } => Type::Base(name.clone()),
        TypeAst::Null { .. } => Type::Null,
        TypeAst::Union { members, .. } => Type::union(members.iter().map(resolve_type)),
        TypeAst::Function { arities, .. } => Type::Function(resolve_arities(arities)),
    }
}

pub fn resolve_arities(arities: &[ArityAst]) -> FunctionType {
    FunctionType::new(
        arities
            .iter()
            .map(|a| {
                Arity::new(
                    a.domain.iter().map(resolve_type).collect(),
                    resolve_type(&a.range),
                )
            })
            .collect(),
    )
}
