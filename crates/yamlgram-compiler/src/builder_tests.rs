use indoc::indoc;
use yamlgram_core::{Binding, Grammar, GrammarNode, Production};
use yamlgram_vm::{ParseOperation, RuntimeError};

use crate::{CompileError, GrammarBuilder};

#[test]
fn patch_replaces_in_place() {
    let grammar = GrammarBuilder::from_bnf(indoc! {"
        a ::= b c
        b ::= 'x'
        c ::= 'y'
    "})
    .unwrap()
    .patch_bnf("b ::= 'z'\nd ::= <empty>")
    .unwrap()
    .finish()
    .unwrap();

    assert_eq!(grammar.names().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    assert_eq!(grammar.get("b").unwrap().body, GrammarNode::string("z"));
    assert!(ParseOperation::new(&grammar, "zy").parse_all("a").is_ok());
    assert!(ParseOperation::new(&grammar, "xy").parse_all("a").is_err());
}

fn accepts(grammar: &Grammar, root: &str, input: &str) -> bool {
    ParseOperation::new(grammar, input).parse_all(root).is_ok()
}

#[test]
fn patch_reaches_minus_operands() {
    let base = GrammarBuilder::from_bnf(indoc! {"
        ns-char ::= [x61-x7A] - s-white
        s-white ::= 'b'
    "})
    .unwrap();
    assert!(!accepts(base.grammar(), "ns-char", "b"));
    assert!(accepts(base.grammar(), "ns-char", "c"));

    let grammar = base.patch_bnf("s-white ::= 'c'").unwrap().finish().unwrap();

    insta::assert_snapshot!(grammar.to_string(), @r"
    ns-char ::= [ lookahead ≠ s-white ] [x61-x7A]
    s-white ::= 'c'
    ");
    assert!(accepts(&grammar, "ns-char", "b"));
    assert!(!accepts(&grammar, "ns-char", "c"));
}

#[test]
fn patch_reaches_lookbehind_operands() {
    let base = GrammarBuilder::from_bnf(indoc! {"
        hash ::= . [ lookbehind = ns-char ] '#'
        ns-char ::= [x21-x7E]
    "})
    .unwrap();
    assert!(accepts(base.grammar(), "hash", "!#"));

    let grammar = base.patch_bnf("ns-char ::= ['a'-'z']").unwrap().finish().unwrap();
    assert!(accepts(&grammar, "hash", "a#"));
    assert!(!accepts(&grammar, "hash", "!#"));
}

#[test]
fn patch_errors_propagate() {
    let err = GrammarBuilder::from_bnf("a ::= 'x'")
        .unwrap()
        .patch_bnf("a ::= <bogus>")
        .unwrap_err();
    assert!(matches!(err, CompileError::UnknownSpecial { .. }));
}

#[test]
fn validation_reports_undefined_reference() {
    let builder = GrammarBuilder::from_bnf("a ::= b\nb ::= c").unwrap();

    assert_eq!(builder.grammar().len(), 2);
    assert!(builder.clone().finish().is_ok());
    assert_eq!(
        builder.validate(true).finish(),
        Err(CompileError::UndefinedReference {
            caller: "b".to_string(),
            name: "c".to_string(),
        })
    );
}

#[test]
fn empty_builder() {
    assert_eq!(GrammarBuilder::new().finish(), Ok(Grammar::new()));
}

#[test]
fn ir_fragment_for_indentation_detection() {
    let base = indoc! {"
        entry(n) ::= s-indent(n) ['a'-'z']
        s-indent(n) ::= x20{n}
    "};
    let block = GrammarNode::detect_indentation(
        Binding::int(1),
        GrammarNode::seq([
            GrammarNode::call("entry", vec![Binding::m()]),
            GrammarNode::zero_or_more(GrammarNode::seq([
                GrammarNode::string("\n"),
                GrammarNode::call("entry", vec![Binding::m()]),
            ])),
        ]),
    );
    let grammar = GrammarBuilder::from_bnf(base)
        .unwrap()
        .body("block", block)
        .validate(true)
        .finish()
        .unwrap();

    assert_eq!(grammar.names().last(), Some("block"));
    assert!(ParseOperation::new(&grammar, "  x\n  y").parse_all("block").is_ok());
    assert!(matches!(
        ParseOperation::new(&grammar, "   x\n  y").parse_all("block"),
        Err(RuntimeError::Incomplete { offset: 4, .. })
    ));
}

#[test]
fn production_override_keeps_number() {
    let grammar = GrammarBuilder::from_bnf("[7] a ::= 'x'")
        .unwrap()
        .production("a", Production::new(GrammarNode::string("y")).number(7))
        .finish()
        .unwrap();
    assert_eq!(grammar.get("a").unwrap().number, Some(7));
    assert_eq!(grammar.to_string(), "[7] a ::= 'y'\n");
}
