use indoc::indoc;
use yamlgram_core::{Context, Parameters};

use crate::CompileError;
use crate::test_utils::{compile_err, render_err};

#[test]
fn syntax_error_points_at_unparsed_clause() {
    let text = "foo ::= 'a'\nbar = 'b'\n";
    assert_eq!(compile_err(text), CompileError::Syntax { span: 16..16 });

    let rendered = render_err(text);
    assert!(rendered.contains("cannot parse a production here"), "{rendered}");
    assert!(rendered.contains('^'), "{rendered}");
}

#[test]
fn syntax_error_skips_leading_comments() {
    let text = "# header\n\n!!";
    assert_eq!(compile_err(text), CompileError::Syntax { span: 10..10 });
}

#[test]
fn unterminated_string() {
    let err = compile_err("foo ::= 'abc");
    assert!(matches!(err, CompileError::Syntax { .. }));
}

#[test]
fn unknown_special() {
    assert_eq!(
        compile_err("foo ::= <nothing>"),
        CompileError::UnknownSpecial {
            name: "nothing".to_string(),
            span: 8..17
        }
    );
}

#[test]
fn inconsistent_formals() {
    let err = compile_err("foo(n) ::= 'a'\nfoo(n,c) ::= 'b'");
    assert_eq!(
        err,
        CompileError::InconsistentFormals {
            name: "foo".to_string(),
            span: 15..31
        }
    );
}

#[test]
fn duplicate_clause() {
    let err = compile_err(indoc! {"
        foo(block-in) ::= 'a'
        foo(block-in) ::= 'b'
    "});
    let CompileError::DuplicateClause { name, pattern, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(name, "foo");
    assert_eq!(
        *pattern,
        Parameters {
            c: Some(Context::BlockIn),
            ..Parameters::default()
        }
    );
    assert_eq!(err.to_string(), "`foo(c=block-in)` is defined twice");
}

#[test]
fn unconditioned_duplicate() {
    assert!(matches!(
        compile_err("foo ::= 'a'\nfoo ::= 'b'"),
        CompileError::DuplicateClause { .. }
    ));
}

#[test]
fn unsupported_expressions() {
    for text in [
        "foo(n) ::= bar(n+n)",
        "foo(n,c) ::= bar(n+c)",
        "foo ::= bar(in-flow(n))",
        "foo(c) ::= x20{c}",
        "foo ::= x20{-1}",
    ] {
        assert!(
            matches!(compile_err(text), CompileError::UnsupportedExpression { .. }),
            "{text}"
        );
    }
}

#[test]
fn lookbehind_needs_char_set() {
    assert_eq!(
        compile_err("foo ::= [ lookbehind = 'ab' ] 'c'"),
        CompileError::NotACharSet {
            text: "'ab'".to_string(),
            span: 23..27
        }
    );
    assert_eq!(
        compile_err("foo ::= [ lookbehind = b(n) ] 'c'\nb(n) ::= ."),
        CompileError::NotACharSet {
            text: "b(n)".to_string(),
            span: 23..27
        }
    );
}

#[test]
fn code_point_out_of_range() {
    assert_eq!(
        compile_err("foo ::= x110000"),
        CompileError::InvalidNumber {
            text: "x110000".to_string(),
            span: 8..15
        }
    );
}

#[test]
fn invalid_formals() {
    for (text, reason) in [
        ("foo(n+1) ::= 'a'", "expected a parameter name or a literal"),
        ("foo(n,n) ::= 'a'", "parameter declared twice"),
        ("foo(in-flow(c)) ::= 'a'", "`in-flow` is not a parameter name"),
    ] {
        match compile_err(text) {
            CompileError::InvalidFormal { reason: actual, .. } => assert_eq!(actual, reason),
            other => panic!("{text}: unexpected error {other}"),
        }
    }
}

#[test]
fn render_with_path() {
    let text = "foo ::= <nothing>";
    let err = compile_err(text);
    let rendered = err.printer().source(text).path("grammar.bnf").render();
    assert!(rendered.contains("grammar.bnf"), "{rendered}");
    assert!(rendered.contains("unknown special `<nothing>`"), "{rendered}");
}

#[test]
fn render_without_span() {
    let err = CompileError::UndefinedReference {
        caller: "a".to_string(),
        name: "b".to_string(),
    };
    insta::assert_snapshot!(
        err.printer().source("a ::= b").render(),
        @"error: undefined production `b` referenced from `a`"
    );
}
