use indoc::indoc;
use yamlgram_core::{
    Binding, CharSet, Chomping, Context, Grammar, GrammarNode, ParamName, ParamValue, Parameters,
    Production,
};
use yamlgram_vm::{ParseOperation, RuntimeError};

use crate::test_utils::{compile, run};

#[test]
fn literal_sequence() {
    let node = run("foo ::= 'a' 'b'", "foo", "ab").unwrap();
    assert_eq!(node.name, "foo");
    assert_eq!(node.range, 0..2);
    assert!(node.content.is_empty());

    assert!(matches!(
        run("foo ::= 'a' 'b'", "foo", "ac"),
        Err(RuntimeError::NoMatch { .. })
    ));
}

#[test]
fn one_or_more() {
    assert_eq!(run("foo ::= 'a'+", "foo", "aaa").unwrap().range, 0..3);
    assert!(run("foo ::= 'a'+", "foo", "").is_err());
}

#[test]
fn negative_lookahead() {
    let grammar = "foo ::= [ lookahead ≠ 'x' ] .";
    assert!(run(grammar, "foo", "y").is_ok());
    assert!(run(grammar, "foo", "x").is_err());

    let ascii = "foo ::= [ lookahead != 'x' ] .";
    assert_eq!(compile(ascii), compile(grammar));
}

#[test]
fn positive_lookahead() {
    let grammar = "foo ::= [ lookahead = 'ab' ] 'a' .";
    assert!(run(grammar, "foo", "ab").is_ok());
    assert!(run(grammar, "foo", "ac").is_err());
}

#[test]
fn empty_text_is_an_empty_grammar() {
    assert!(compile("").is_empty());
    assert!(compile("  # only a comment\n/* and\na block */\n").is_empty());
}

#[test]
fn productions_keep_order_and_numbers() {
    let grammar = compile(indoc! {"
        [2] second ::= first
        [1] first ::= 'x'
        third ::= <empty>
    "});
    assert_eq!(
        grammar.names().collect::<Vec<_>>(),
        ["second", "first", "third"]
    );
    assert_eq!(grammar.get("second").unwrap().number, Some(2));
    assert_eq!(grammar.get("third").unwrap().number, None);
}

#[test]
fn bodies_span_lines() {
    let grammar = compile(indoc! {"
        foo ::= 'a'
                'b' # trailing comment
              | 'c'
        bar ::= foo
    "});
    assert_eq!(
        grammar.get("foo").unwrap().body,
        GrammarNode::first([
            GrammarNode::seq([GrammarNode::string("a"), GrammarNode::string("b")]),
            GrammarNode::string("c"),
        ])
    );
    assert_eq!(grammar.get("bar").unwrap().body, GrammarNode::reference("foo"));
}

#[test]
fn specials() {
    let grammar = compile("a ::= <empty> <start-of-line> <end-of-input>");
    assert_eq!(
        grammar.get("a").unwrap().body,
        GrammarNode::seq([
            GrammarNode::Empty,
            GrammarNode::StartOfLine,
            GrammarNode::EndOfInput,
        ])
    );
}

#[test]
fn character_classes() {
    let grammar = compile(indoc! {r#"
        hex ::= x41
        range ::= [x30-x39]
        quoted-range ::= ['a'-'z']
        any ::= .
        apostrophe ::= "'"
    "#});
    let body = |name: &str| grammar.get(name).unwrap().body.clone();

    assert_eq!(body("hex"), GrammarNode::chars(CharSet::from_ranges(['A'])));
    assert_eq!(
        body("range"),
        GrammarNode::chars(CharSet::from_ranges([('0', '9')]))
    );
    assert_eq!(
        body("quoted-range"),
        GrammarNode::chars(CharSet::from_ranges([('a', 'z')]))
    );
    assert_eq!(body("any"), GrammarNode::chars(CharSet::any()));
    assert_eq!(body("apostrophe"), GrammarNode::string("'"));
}

#[test]
fn minus_of_literal_sets_folds() {
    let grammar = compile("ns-ascii ::= [x20-x7E] - ( x20 | x09 )");
    assert_eq!(
        grammar.get("ns-ascii").unwrap().body,
        GrammarNode::chars(CharSet::from_ranges([(0x21u32, 0x7Eu32)]))
    );
}

#[test]
fn minus_keeps_references() {
    let text = indoc! {"
        [34] ns-char ::= nb-char - s-white
        [27] nb-char ::= [x20-x7E]
        [33] s-white ::= x20 | x09
    "};
    let grammar = compile(text);
    assert_eq!(
        grammar.get("ns-char").unwrap().body,
        GrammarNode::seq([
            GrammarNode::not_ahead(GrammarNode::reference("s-white")),
            GrammarNode::reference("nb-char"),
        ])
    );

    let tree = run(text, "ns-char", "a").unwrap();
    let names: Vec<_> = tree.content.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["nb-char"]);
    assert!(run(text, "ns-char", " ").is_err());
}

#[test]
fn minus_of_sequences_uses_lookahead() {
    let text = indoc! {"
        word ::= letter+ - 'end'
        letter ::= ['a'-'z']
    "};
    let grammar = compile(text);
    assert_eq!(
        grammar.get("word").unwrap().body,
        GrammarNode::seq([
            GrammarNode::not_ahead(GrammarNode::string("end")),
            GrammarNode::one_or_more(GrammarNode::reference("letter")),
        ])
    );
    assert!(run(text, "word", "abc").is_ok());
    assert!(run(text, "word", "endx").is_err());
}

#[test]
fn minus_through_parameterised_reference_does_not_fold() {
    let grammar = compile(indoc! {"
        a ::= b(n) - 'x'
        b(n) ::= .
    "});
    assert!(matches!(
        grammar.get("a").unwrap().body,
        GrammarNode::Sequence(_)
    ));
}

#[test]
fn lookbehind() {
    let text = "after-space ::= ' ' [ lookbehind = x20 | x09 ] 'a'";
    let grammar = compile(text);
    assert_eq!(
        grammar.get("after-space").unwrap().body,
        GrammarNode::seq([
            GrammarNode::string(" "),
            GrammarNode::behind(GrammarNode::chars(CharSet::from_ranges([' ', '\t']))),
            GrammarNode::string("a"),
        ])
    );
    assert!(run(text, "after-space", " a").is_ok());
}

#[test]
fn lookbehind_through_reference() {
    let text = indoc! {"
        hash ::= . [ lookbehind = nb-char - s-white ] '#'
        nb-char ::= [x20-x7E]
        s-white ::= x20 | x09
    "};
    let grammar = compile(text);
    assert_eq!(
        grammar.get("hash").unwrap().body,
        GrammarNode::seq([
            GrammarNode::chars(CharSet::any()),
            GrammarNode::behind(GrammarNode::seq([
                GrammarNode::not_ahead(GrammarNode::reference("s-white")),
                GrammarNode::reference("nb-char"),
            ])),
            GrammarNode::string("#"),
        ])
    );

    // The lookbehind's own match leaves no node.
    assert!(run(text, "hash", "a#").unwrap().content.is_empty());
    assert!(run(text, "hash", " #").is_err());
}

#[test]
fn argument_bindings() {
    let grammar = compile("a(n,c) ::= b(n+1,in-flow(c),keep,-1,n-1,m,n+1+m,c,t,flow-key)");
    let GrammarNode::Ref { name, args } = &grammar.get("a").unwrap().body else {
        panic!("expected a reference");
    };
    assert_eq!(name, "b");
    assert_eq!(
        args,
        &[
            Binding::n_plus(1),
            Binding::InFlow,
            Binding::Value(ParamValue::Chomping(Chomping::Keep)),
            Binding::int(-1),
            Binding::n_plus(-1),
            Binding::m(),
            Binding::Indent {
                n: true,
                m: true,
                offset: 1
            },
            Binding::Context,
            Binding::Chomping,
            Binding::Value(ParamValue::Context(Context::FlowKey)),
        ]
    );
    assert_eq!(
        grammar.get("a").unwrap().parameters,
        [ParamName::N, ParamName::C]
    );
}

#[test]
fn repetition_counts() {
    let grammar = compile(indoc! {"
        four ::= 'a'{4}
        indent(n) ::= x20{ n }
        deeper(n) ::= x20{n+1}
    "});
    insta::assert_snapshot!(grammar.to_string(), @r"
    four ::= 'a'{4}
    indent(n) ::= x20{n}
    deeper(n) ::= x20{n+1}
    ");
}

const LINE_PREFIX: &str = indoc! {"
    # Indentation and line prefixes.
    [63] s-indent(n) ::= s-space{n}
    [31] s-space ::= x20
    [67] s-line-prefix(n,block-out) ::= s-block-line-prefix(n)
    s-line-prefix(n,block-in) ::= s-block-line-prefix(n)
    s-line-prefix(n,flow-out) ::= s-flow-line-prefix(n)
    s-line-prefix(n,flow-in) ::= s-flow-line-prefix(n)
    [68] s-block-line-prefix(n) ::= s-indent(n)
    [69] s-flow-line-prefix(n) ::= s-indent(n) s-separate-in-line?
    s-separate-in-line ::= ( x20 | x09 )+ | <start-of-line>
"};

#[test]
fn context_clauses_group_into_one_production() {
    let grammar = compile(LINE_PREFIX);
    let prefix = grammar.get("s-line-prefix").unwrap();
    assert_eq!(prefix.number, Some(67));
    assert_eq!(prefix.parameters, [ParamName::N, ParamName::C]);
    let GrammarNode::Context(cases) = &prefix.body else {
        panic!("expected context dispatch");
    };
    assert_eq!(cases.len(), 4);
    assert_eq!(cases[0].pattern.c, Some(Context::BlockOut));
    assert_eq!(cases[0].pattern.n, None);

    insta::assert_snapshot!(grammar.to_string(), @r"
    [63] s-indent(n) ::= s-space{n}
    [31] s-space ::= x20
    [67] s-line-prefix(n,block-out) ::= s-block-line-prefix(n)
    s-line-prefix(n,block-in) ::= s-block-line-prefix(n)
    s-line-prefix(n,flow-out) ::= s-flow-line-prefix(n)
    s-line-prefix(n,flow-in) ::= s-flow-line-prefix(n)
    [68] s-block-line-prefix(n) ::= s-indent(n)
    [69] s-flow-line-prefix(n) ::= s-indent(n) s-separate-in-line?
    s-separate-in-line ::= ( x20 | x09 )+ | <start-of-line>
    ");
}

#[test]
fn context_clauses_dispatch() {
    let grammar = compile(LINE_PREFIX);
    let prefix = |c: Context| {
        GrammarNode::call(
            "s-line-prefix",
            vec![Binding::int(2), Binding::Value(ParamValue::Context(c))],
        )
    };
    let end = |c: Context, text: &str| {
        ParseOperation::new(&grammar, text)
            .parse(0, &Parameters::default(), &prefix(c))
            .map(|m| m.map(|m| m.end))
    };

    assert_eq!(end(Context::FlowIn, "  \tx"), Ok(Some(3)));
    assert_eq!(end(Context::BlockIn, "  \tx"), Ok(Some(2)));
    assert_eq!(end(Context::BlockOut, " x"), Ok(None));
    assert!(matches!(
        end(Context::BlockKey, "  "),
        Err(RuntimeError::UncoveredContext { .. })
    ));
}

#[test]
fn literal_number_in_head() {
    let grammar = compile(indoc! {"
        pad(0) ::= <empty>
        pad(n) ::= ' ' pad(n-1)
    "});
    let pad = grammar.get("pad").unwrap();
    assert_eq!(pad.parameters, [ParamName::N]);

    let call = GrammarNode::call("pad", vec![Binding::int(3)]);
    let m = ParseOperation::new(&grammar, "   ")
        .parse(0, &Parameters::default(), &call)
        .unwrap()
        .unwrap();
    assert_eq!(m.end, 3);
}

#[test]
fn chomping_literals_in_head() {
    let grammar = compile(indoc! {"
        chomped(strip) ::= 's'
        chomped(clip) ::= 'c'
        chomped(keep) ::= 'k'
    "});
    let chomped = grammar.get("chomped").unwrap();
    assert_eq!(chomped.parameters, [ParamName::T]);
    let GrammarNode::Context(cases) = &chomped.body else {
        panic!("expected context dispatch");
    };
    assert_eq!(cases[2].pattern.t, Some(Chomping::Keep));
}

#[test]
fn printed_literals_compile_back() {
    let original: Grammar = [(
        "quote",
        Production::new(GrammarNode::seq([
            GrammarNode::string("say \"it's\""),
            GrammarNode::string(""),
            GrammarNode::optional(GrammarNode::string("\r\n")),
        ])),
    )]
    .into_iter()
    .collect();

    let reparsed = compile(&original.to_string());
    for input in ["say \"it's\"", "say \"it's\"\r\n"] {
        assert!(ParseOperation::new(&original, input).parse_all("quote").is_ok());
        assert!(
            ParseOperation::new(&reparsed, input).parse_all("quote").is_ok(),
            "{input:?}"
        );
    }
    assert!(ParseOperation::new(&reparsed, "say 'it's'").parse_all("quote").is_err());
}
