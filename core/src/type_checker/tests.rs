#[cfg(test)]
mod tests {
    use crate::{
        parser::{
            ast::{Ast, Literal},
            parser::from_str,
        },
        type_checker::{
            checker::{check, CheckReport, Mismatch, TypeChecker, Violation},
            namespace::{AnnotatedFunction, Namespace},
            types::{std_types, Arity, FunctionType, Type, TypeTrait},
        },
        util::error::LineInfo,
    };

    fn namespace_str(input: &str) -> Namespace {
        let module = from_str(input).parse_module("test").unwrap();
        let mut namespace = Namespace::with_prelude();
        namespace.load_module(&module);
        namespace
    }

    fn check_str(input: &str) -> CheckReport {
        check(&namespace_str(input))
    }

    fn violations_str(input: &str) -> Vec<Violation> {
        let report = check_str(input);
        assert_eq!(report.errors().count(), 0, "unexpected errors: {:?}", report);
        report.violations().cloned().collect()
    }

    fn argument(name: &str) -> Ast {
        Ast::Argument {
            name: name.to_string(),
            info: LineInfo::default(),
        }
    }

    fn number(n: &str) -> Ast {
        Ast::Literal {
            value: Literal::Number(n.to_string()),
            info: LineInfo::default(),
        }
    }

    fn operation(name: &str, args: Vec<Ast>) -> Ast {
        Ast::Operation {
            name: name.to_string(),
            args,
            infix: true,
            info: LineInfo::default(),
        }
    }

    //--------------------------------------------------------------------------------------//
    //                                   Assignability                                      //
    //--------------------------------------------------------------------------------------//

    #[test]
    fn subtype_nullable() {
        let number = std_types::NUMBER();
        let nullable = number.clone().nullable();
        assert!(number.subtype(&nullable));
        assert!(!nullable.subtype(&number));
        assert!(Type::Null.subtype(&nullable));
        assert!(!Type::Null.subtype(&number));
    }

    #[test]
    fn subtype_base() {
        assert!(std_types::NUMBER().subtype(&std_types::NUMBER()));
        assert!(!std_types::NUMBER().subtype(&std_types::STRING()));
    }

    #[test]
    fn subtype_union_union() {
        let inner = Type::union([std_types::BOOLEAN(), Type::Null]);
        let outer = Type::union([inner.clone(), std_types::STRING()]);
        assert!(inner.subtype(&outer));
        assert!(!outer.subtype(&inner));
        assert!(outer.subtype(&outer));
    }

    #[test]
    fn nothing_is_assignable_to_everything() {
        assert!(Type::nothing().subtype(&std_types::NUMBER()));
        assert!(Type::nothing().subtype(&Type::Null));
        assert!(!std_types::NUMBER().subtype(&Type::nothing()));
    }

    #[test]
    fn subtype_function() {
        let accepts_nullable = Type::Function(FunctionType::single(
            vec![std_types::NULLABLE_NUMBER()],
            std_types::NUMBER(),
        ));
        let accepts_number = Type::Function(FunctionType::single(
            vec![std_types::NUMBER()],
            std_types::NULLABLE_NUMBER(),
        ));
        assert!(accepts_nullable.subtype(&accepts_number));
        assert!(!accepts_number.subtype(&accepts_nullable));
    }

    #[test]
    fn union_normalization() {
        let a = Type::union([
            std_types::NUMBER(),
            Type::union([Type::Null, std_types::NUMBER()]),
            Type::Null,
        ]);
        let b = Type::union([Type::Null, std_types::NUMBER()]);
        assert_eq!(a, b);
        assert_eq!(
            a,
            Type::Union(vec![std_types::NUMBER(), Type::Null]),
            "nested unions flatten and duplicates collapse"
        );
        assert_eq!(Type::union([std_types::NUMBER()]), std_types::NUMBER());
        assert_eq!(Type::Union(vec![Type::Null, Type::Null]).simplify(), Type::Null);
    }

    #[test]
    fn remove_null() {
        assert_eq!(std_types::NULLABLE_NUMBER().remove_null(), std_types::NUMBER());
        assert_eq!(std_types::NUMBER().remove_null(), std_types::NUMBER());
        assert_eq!(Type::Null.remove_null(), Type::nothing());
        let three = Type::union([std_types::NUMBER(), std_types::STRING(), Type::Null]);
        assert_eq!(
            three.remove_null(),
            Type::union([std_types::STRING(), std_types::NUMBER()])
        );
    }

    #[test]
    fn display() {
        assert_eq!(std_types::NULLABLE_NUMBER().to_string(), "Number | Null");
        assert_eq!(Type::nothing().to_string(), "Nothing");
        let add = FunctionType::new(vec![
            Arity::new(
                vec![std_types::NUMBER(), std_types::NUMBER()],
                std_types::NUMBER(),
            ),
            Arity::new(vec![std_types::STRING()], std_types::NULLABLE_NUMBER()),
        ]);
        assert_eq!(
            Type::Function(add).to_string(),
            "[(Number, Number) -> Number & (String) -> Number | Null]"
        );
    }

    //--------------------------------------------------------------------------------------//
    //                                   Checking                                           //
    //--------------------------------------------------------------------------------------//

    #[test]
    fn guarded_add_has_no_violations() {
        let report = check_str(
            "ann f : (Number | Null) -> Number;
             fn f(a) = if a then a + 20 else 0;",
        );
        assert!(report.is_success(), "{:?}", report);
    }

    #[test]
    fn unguarded_add_is_one_operation_violation() {
        let violations = violations_str("fn f(a: Number | Null) -> Number = a + 20;");
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].mismatch,
            Mismatch::Arguments {
                operation: "+".to_string(),
                expected: vec![std_types::NUMBER(), std_types::NUMBER()],
                actual: vec![std_types::NULLABLE_NUMBER(), std_types::NUMBER()],
            }
        );
        assert_eq!(violations[0].expr, "a + 20");
        assert_eq!(violations[0].mismatch.expected_text(), "(Number, Number)");
        assert_eq!(violations[0].mismatch.actual_text(), "(Number | Null, Number)");
        assert_eq!(
            violations[0].explanation,
            "Argument 1 of '+' may be null, but Number does not allow it"
        );
    }

    #[test]
    fn missing_else_is_one_return_violation() {
        let violations = violations_str(
            "ann f : (Number | Null) -> Number;
             fn f(a) = if a then a + 20;",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].mismatch,
            Mismatch::Return {
                expected: std_types::NUMBER(),
                actual: std_types::NULLABLE_NUMBER(),
            }
        );
        assert_eq!(violations[0].expr, "if a then a + 20");
    }

    #[test]
    fn explicit_null_else_is_one_return_violation() {
        let violations =
            violations_str("fn f(a: Number | Null) -> Number = if a then a + 20 else null;");
        assert_eq!(violations.len(), 1);
        assert!(matches!(violations[0].mismatch, Mismatch::Return { .. }));
        assert_eq!(violations[0].mismatch.actual_text(), "Number | Null");
    }

    #[test]
    fn else_branch_is_not_narrowed() {
        let violations = violations_str("fn f(a: Number | Null) -> Number = if a then 0 else a + 1;");
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0].mismatch,
            Mismatch::Arguments { operation, .. } if operation == "+"
        ));
    }

    #[test]
    fn compound_test_does_not_narrow() {
        let violations =
            violations_str("fn f(a: Number | Null) -> Number = if a == 1 then a + 1 else 0;");
        // Both `a == 1` and `a + 1` receive a nullable argument
        assert_eq!(violations.len(), 2);
        let operations = violations
            .iter()
            .map(|v| match &v.mismatch {
                Mismatch::Arguments { operation, .. } => operation.as_str(),
                Mismatch::Return { .. } => "return",
            })
            .collect::<Vec<_>>();
        assert_eq!(operations, vec!["==", "+"]);
    }

    #[test]
    fn nullable_range_accepts_missing_else() {
        let report = check_str("fn f(a: Number | Null) -> Number | Null = if a then a * 2;");
        assert!(report.is_success());
    }

    #[test]
    fn first_matching_arity_is_selected() {
        // Strings select the second arity of `+` and produce a String
        let violations = violations_str("fn f(a: String) -> Number = a + \"!\";");
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].mismatch,
            Mismatch::Return {
                expected: std_types::NUMBER(),
                actual: std_types::STRING(),
            }
        );
    }

    #[test]
    fn declared_order_breaks_ties() {
        let report = check_str(
            "ann pick : (Number | Null) -> String & (Number) -> Number;
             fn f(a: Number) -> String = pick(a);",
        );
        assert!(report.is_success(), "{:?}", report);
    }

    #[test]
    fn unmatched_operation_reports_first_arity() {
        let violations = violations_str("fn f(a: Boolean) -> Number = a + a;");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].mismatch.expected_text(), "(Number, Number)");
        assert_eq!(
            violations[0].explanation,
            "Argument 1 of '+' has type Boolean, expected Number"
        );
    }

    #[test]
    fn wrong_argument_count() {
        let violations = violations_str("fn f(a: Number) -> Number = inc(a, a);");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].explanation, "'inc' expects 1 argument(s), found 2");
    }

    #[test]
    fn violations_in_pre_order() {
        // The return site comes first, then the outer operation, then the inner one
        let violations =
            violations_str("fn f(a: Number | Null, b: Boolean) -> String = (a + 1) * b;");
        let kinds = violations
            .iter()
            .map(|v| v.expr.clone())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["(a + 1) * b", "(a + 1) * b", "a + 1"]);
        assert!(matches!(violations[0].mismatch, Mismatch::Return { .. }));
        assert!(matches!(violations[1].mismatch, Mismatch::Arguments { .. }));
    }

    #[test]
    fn functions_in_declaration_order() {
        let violations = violations_str(
            "fn z(a: Number | Null) -> Number = a + 1;
             fn a(a: Number | Null) -> Number = a - 1;",
        );
        let functions = violations
            .iter()
            .map(|v| v.function.as_str())
            .collect::<Vec<_>>();
        assert_eq!(functions, vec!["z", "a"]);
    }

    #[test]
    fn annotated_function_as_operation() {
        let violations = violations_str(
            "fn safe(a: Number | Null) -> Number = if a then a else 0;
             fn twice(a: Number | Null) -> Number = safe(a) + safe(a);
             fn bad(a: Number | Null) -> Number = inc(safe(a)) + a;",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].function, "bad");
    }

    #[test]
    fn multiple_arities_check_body_per_arity() {
        let violations = violations_str(
            "ann f : (Number) -> Number & (Null) -> Number;
             fn f(a) = a + 1;",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].arity, Some(2));
        assert_eq!(violations[0].mismatch.actual_text(), "(Null, Number)");
    }

    #[test]
    fn narrowing_null_yields_nothing() {
        let report = check_str("fn f(a: Null) -> Number = if a then a else 0;");
        assert!(report.is_success(), "{:?}", report);
    }

    #[test]
    fn user_annotation_extends_prelude() {
        let report = check_str(
            "ann + : (Boolean, Boolean) -> Boolean;
             fn f(a: Boolean) -> Boolean = a + true;",
        );
        assert!(report.is_success(), "{:?}", report);
    }

    //--------------------------------------------------------------------------------------//
    //                                 Malformed input                                      //
    //--------------------------------------------------------------------------------------//

    #[test]
    fn unannotated_function_is_fatal_for_that_function_only() {
        let report = check_str(
            "fn f(a) = a + 1;
             fn g(a: Number | Null) -> Number = a + 1;",
        );
        let errors = report.errors().collect::<Vec<_>>();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0.name, "f");
        assert_eq!(
            errors[0].1.inner.message,
            "Function 'f' is missing a type annotation"
        );
        assert!(errors[0].1.inner.hint.is_some());
        assert_eq!(report.violations().count(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn partially_annotated_function_is_unannotated() {
        let report = check_str("fn f(a: Number) = a;");
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn undeclared_operation() {
        let report = check_str("fn f(a: Number) -> Number = frobnicate(a);");
        let (_, err) = report.errors().next().unwrap();
        assert_eq!(err.inner.message, "Unknown operation 'frobnicate'");
    }

    #[test]
    fn unannotated_function_as_operation() {
        let report = check_str(
            "fn g(a) = a;
             fn f(a: Number) -> Number = g(a);",
        );
        let messages = report
            .errors()
            .map(|(_, err)| err.inner.message.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                "Function 'g' is missing a type annotation".to_string(),
                "Operation 'g' refers to an unannotated function".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_argument() {
        let report = check_str("fn f(a: Number) -> Number = b;");
        let (_, err) = report.errors().next().unwrap();
        assert_eq!(err.inner.message, "Unknown argument 'b'");
        assert_eq!(
            err.inner.hint.as_deref(),
            Some("The parameters of 'f' are: a")
        );
    }

    #[test]
    fn parameter_count_mismatch() {
        let report = check_str(
            "ann f : (Number, Number) -> Number;
             fn f(a) = a;",
        );
        let (_, err) = report.errors().next().unwrap();
        assert!(err.inner.message.starts_with("Function 'f' takes 1 parameter(s)"));
    }

    #[test]
    fn duplicate_function() {
        let report = check_str(
            "fn f(a: Number) -> Number = a;
             fn f(a: Number) -> Number = a;",
        );
        assert!(report.functions[0].result.is_ok());
        let err = report.functions[1].result.as_ref().unwrap_err();
        assert_eq!(err.inner.message, "Function 'f' is already defined");
        assert_eq!(err.inner.labels.len(), 1);
    }

    #[test]
    fn without_prelude_operators_are_undeclared() {
        let module = from_str("fn f(a: Number) -> Number = a + 1;")
            .parse_module("test")
            .unwrap();
        let mut namespace = Namespace::new();
        namespace.load_module(&module);
        let report = check(&namespace);
        assert_eq!(report.errors().count(), 1);
    }

    //--------------------------------------------------------------------------------------//
    //                              Built-ins and user functions                            //
    //--------------------------------------------------------------------------------------//

    #[test]
    fn unannotated_function_named_like_builtin() {
        let report = check_str("fn str(a) = a;");
        assert_eq!(report.violations().count(), 0);
        let errors = report.errors().collect::<Vec<_>>();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].1.inner.message,
            "Function 'str' is missing a type annotation"
        );
    }

    #[test]
    fn user_function_shadows_builtin() {
        let violations = violations_str(
            "fn inc(a: Number | Null) -> Number = if a then a + 1 else 0;
             fn g(a: Number | Null) -> Number = inc(a);",
        );
        assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn builtin_still_applies_without_shadowing() {
        let violations = violations_str("fn g(a: Number | Null) -> Number = dec(a);");
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0].mismatch,
            Mismatch::Arguments { operation, .. } if operation == "dec"
        ));
    }

    #[test]
    fn inline_function_named_like_builtin_keeps_its_signature() {
        let namespace = namespace_str("fn str(a: Number) -> Number = a;");
        let ty = namespace.lookup_function("str").unwrap().ty.as_ref().unwrap();
        assert_eq!(
            *ty,
            FunctionType::single(vec![std_types::NUMBER()], std_types::NUMBER())
        );
        assert!(check(&namespace).is_success());
    }

    //--------------------------------------------------------------------------------------//
    //                                 Loading modules                                      //
    //--------------------------------------------------------------------------------------//

    fn load(namespace: &mut Namespace, input: &str) -> usize {
        let module = from_str(input).parse_module("test").unwrap();
        namespace.load_module(&module)
    }

    #[test]
    fn inline_signature_wins_over_annotation() {
        let namespace = namespace_str(
            "ann f : (Number | Null) -> Number | Null;
             fn f(a: Number) -> Number = a;",
        );
        let f = namespace.lookup_function("f").unwrap();
        assert_eq!(
            f.ty,
            Some(FunctionType::single(vec![std_types::NUMBER()], std_types::NUMBER()))
        );
        assert!(namespace.lookup_operation("f").is_none());
    }

    #[test]
    fn repeated_annotations_append_arities() {
        let namespace = namespace_str(
            "ann f : (Number) -> Number;
             ann f : (Null) -> Number;
             fn f(a) = if a then a else 0;",
        );
        let ty = namespace.lookup_function("f").unwrap().ty.clone().unwrap();
        assert_eq!(
            ty.arities,
            vec![
                Arity::new(vec![std_types::NUMBER()], std_types::NUMBER()),
                Arity::new(vec![Type::Null], std_types::NUMBER()),
            ]
        );
        assert!(check(&namespace).is_success());
    }

    #[test]
    fn annotation_then_definition_in_separate_modules() {
        let mut namespace = Namespace::with_prelude();
        assert_eq!(load(&mut namespace, "ann f : (Number | Null) -> Number;"), 0);
        assert!(namespace.is_declared("f"));
        assert_eq!(load(&mut namespace, "fn f(a) = if a then a + 1 else 0;"), 1);
        assert_eq!(
            namespace.functions()[0].ty,
            Some(FunctionType::single(
                vec![std_types::NULLABLE_NUMBER()],
                std_types::NUMBER()
            ))
        );
        assert!(check(&namespace).is_success());
    }

    #[test]
    fn builtins_are_not_declared() {
        let mut namespace = Namespace::with_prelude();
        assert!(namespace.lookup_operation("+").is_some());
        assert!(!namespace.is_declared("+"));
        load(&mut namespace, "ann + : (Boolean, Boolean) -> Boolean;");
        assert!(namespace.is_declared("+"));
        assert_eq!(namespace.lookup_operation("+").unwrap().arities.len(), 3);
    }

    //--------------------------------------------------------------------------------------//
    //                                 Determinism                                          //
    //--------------------------------------------------------------------------------------//

    #[test]
    fn check_is_idempotent() {
        let namespace = namespace_str(
            "fn f(a: Number | Null) -> Number = a + 20;
             fn g(a: Number | Null) -> Number = if a then a + 20;
             fn h(a) = a;
             fn i(a: Number | Null, b: Number | Null) -> Number = a * b - a;",
        );
        let first = check(&namespace);
        for _ in 0..8 {
            assert_eq!(check(&namespace), first);
        }
        assert_eq!(
            first.functions.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["f", "g", "h", "i"]
        );
    }

    #[test]
    fn programmatic_namespace() {
        let mut namespace = Namespace::with_prelude();
        namespace.add_function(AnnotatedFunction::new(
            "f",
            &["a"],
            Some(FunctionType::single(
                vec![std_types::NULLABLE_NUMBER()],
                std_types::NUMBER(),
            )),
            operation("+", vec![argument("a"), number("20")]),
        ));
        let checker = TypeChecker::new(&namespace);
        let report = checker.check_function(0).unwrap();
        assert_eq!(report.result.unwrap().len(), 1);
        assert!(checker.check_function(1).is_none());
    }
}
