//! The meta-grammar: the BNF dialect described directly in grammar IR.
//!
//! [`meta_grammar`] is assembled by hand from IR constructors, so compiling
//! grammar text never depends on a previously compiled grammar.
//! [`META_GRAMMAR_BNF`] is the same grammar written in the dialect itself;
//! compiling it must yield a grammar that parses exactly like the hand-built one.

use std::sync::LazyLock;

use yamlgram_core::{CharSet, Grammar, GrammarNode, Production};

/// Textual transcription of [`meta_grammar`], production for production.
pub const META_GRAMMAR_BNF: &str = r##"# BNF dialect accepted by yamlgram.
grammar ::= production* s-ignorable <end-of-input>
production ::= s-ignorable section-number? production-name parameter-list? s-ignorable '::=' alternation
production-head ::= section-number? production-name parameter-list? s-ignorable '::='
section-number ::= '[' decimal ']' s-ignorable
alternation ::= s-ignorable sequence ( s-ignorable '|' s-ignorable sequence )*
sequence ::= difference ( s-ignorable [ lookahead ≠ production-head ] difference )*
difference ::= quantified ( s-ignorable '-' s-ignorable quantified )*
quantified ::= atom quantifier?
quantifier ::= '?' | '*' | '+' | '{' s-space* param-sum s-space* '}'
atom ::= lookaround | special | group | code-point-range | hex-char | quoted-string | any-char | reference
lookaround ::= '[' s-space* ( lookahead-negative | lookahead-positive | lookbehind-positive ) alternation s-ignorable ']'
lookahead-positive ::= 'lookahead' s-space* '='
lookahead-negative ::= 'lookahead' s-space* ( '≠' | '!=' )
lookbehind-positive ::= 'lookbehind' s-space* '='
special ::= '<' name-char+ '>'
group ::= '(' alternation s-ignorable ')'
code-point-range ::= '[' range-bound '-' range-bound ']'
range-bound ::= hex-char | quoted-char
hex-char ::= 'x' hex-digit+ [ lookahead ≠ alnum ]
quoted-string ::= "'" single-quoted-char+ "'" | '"' double-quoted-char+ '"'
quoted-char ::= "'" single-quoted-char "'" | '"' double-quoted-char '"'
single-quoted-char ::= . - "'" - x0A - x0D
double-quoted-char ::= . - '"' - x0A - x0D
any-char ::= '.'
reference ::= production-name parameter-list?
production-name ::= alpha ( alnum | name-joiner alnum )*
name-joiner ::= '-' | '+'
parameter-list ::= '(' s-space* parameter ( s-space* ',' s-space* parameter )* s-space* ')'
parameter ::= in-flow | context-value | chomping-value | param-sum
in-flow ::= 'in-flow(' s-space* param-variable s-space* ')'
context-value ::= ( 'block-in' | 'block-out' | 'block-key' | 'flow-in' | 'flow-out' | 'flow-key' | 'annotation-in' ) [ lookahead ≠ name-char ]
chomping-value ::= ( 'strip' | 'clip' | 'keep' ) [ lookahead ≠ name-char ]
param-sum ::= param-term ( s-space* sum-operator s-space* param-term )*
param-term ::= param-variable | decimal
param-variable ::= ( 'n' | 'm' | 'c' | 't' ) [ lookahead ≠ alnum ]
sum-operator ::= '+' | '-'
decimal ::= '-'? digit+
name-char ::= alnum | '-' | '+'
alnum ::= alpha | digit
alpha ::= ['a'-'z'] | ['A'-'Z']
digit ::= ['0'-'9']
hex-digit ::= digit | ['a'-'f'] | ['A'-'F']
s-ignorable ::= ( s-space | b-break | comment )*
s-space ::= x20 | x09
b-break ::= x0A | x0D
comment ::= line-comment | block-comment
line-comment ::= '#' ( . - x0A - x0D )*
block-comment ::= '/*' ( [ lookahead ≠ '*/' ] . )* '*/'
"##;

static META_GRAMMAR: LazyLock<Grammar> = LazyLock::new(build);

/// The hand-built meta-grammar. Its root production is `grammar`.
pub fn meta_grammar() -> &'static Grammar {
    &META_GRAMMAR
}

fn lit(text: &str) -> GrammarNode {
    GrammarNode::string(text)
}

fn r(name: &str) -> GrammarNode {
    GrammarNode::reference(name)
}

fn point(cp: u32) -> GrammarNode {
    GrammarNode::chars(CharSet::from_ranges([cp]))
}

fn range(lo: char, hi: char) -> GrammarNode {
    GrammarNode::chars(CharSet::from_ranges([(lo, hi)]))
}

fn any_except(excluded: &[char]) -> GrammarNode {
    let excluded = CharSet::from_ranges(excluded.iter().copied());
    GrammarNode::chars(CharSet::any().minus(&excluded))
}

fn seq<const N: usize>(nodes: [GrammarNode; N]) -> GrammarNode {
    GrammarNode::seq(nodes)
}

fn first<const N: usize>(nodes: [GrammarNode; N]) -> GrammarNode {
    GrammarNode::first(nodes)
}

fn opt(node: GrammarNode) -> GrammarNode {
    GrammarNode::optional(node)
}

fn star(node: GrammarNode) -> GrammarNode {
    GrammarNode::zero_or_more(node)
}

fn plus(node: GrammarNode) -> GrammarNode {
    GrammarNode::one_or_more(node)
}

fn spaces() -> GrammarNode {
    star(r("s-space"))
}

fn build() -> Grammar {
    let rules = [
        (
            "grammar",
            seq([star(r("production")), r("s-ignorable"), GrammarNode::EndOfInput]),
        ),
        (
            "production",
            seq([
                r("s-ignorable"),
                opt(r("section-number")),
                r("production-name"),
                opt(r("parameter-list")),
                r("s-ignorable"),
                lit("::="),
                r("alternation"),
            ]),
        ),
        (
            "production-head",
            seq([
                opt(r("section-number")),
                r("production-name"),
                opt(r("parameter-list")),
                r("s-ignorable"),
                lit("::="),
            ]),
        ),
        (
            "section-number",
            seq([lit("["), r("decimal"), lit("]"), r("s-ignorable")]),
        ),
        (
            "alternation",
            seq([
                r("s-ignorable"),
                r("sequence"),
                star(seq([
                    r("s-ignorable"),
                    lit("|"),
                    r("s-ignorable"),
                    r("sequence"),
                ])),
            ]),
        ),
        (
            "sequence",
            seq([
                r("difference"),
                star(seq([
                    r("s-ignorable"),
                    GrammarNode::not_ahead(r("production-head")),
                    r("difference"),
                ])),
            ]),
        ),
        (
            "difference",
            seq([
                r("quantified"),
                star(seq([
                    r("s-ignorable"),
                    lit("-"),
                    r("s-ignorable"),
                    r("quantified"),
                ])),
            ]),
        ),
        ("quantified", seq([r("atom"), opt(r("quantifier"))])),
        (
            "quantifier",
            first([
                lit("?"),
                lit("*"),
                lit("+"),
                seq([lit("{"), spaces(), r("param-sum"), spaces(), lit("}")]),
            ]),
        ),
        (
            "atom",
            first([
                r("lookaround"),
                r("special"),
                r("group"),
                r("code-point-range"),
                r("hex-char"),
                r("quoted-string"),
                r("any-char"),
                r("reference"),
            ]),
        ),
        (
            "lookaround",
            seq([
                lit("["),
                spaces(),
                first([
                    r("lookahead-negative"),
                    r("lookahead-positive"),
                    r("lookbehind-positive"),
                ]),
                r("alternation"),
                r("s-ignorable"),
                lit("]"),
            ]),
        ),
        (
            "lookahead-positive",
            seq([lit("lookahead"), spaces(), lit("=")]),
        ),
        (
            "lookahead-negative",
            seq([lit("lookahead"), spaces(), first([lit("≠"), lit("!=")])]),
        ),
        (
            "lookbehind-positive",
            seq([lit("lookbehind"), spaces(), lit("=")]),
        ),
        ("special", seq([lit("<"), plus(r("name-char")), lit(">")])),
        (
            "group",
            seq([lit("("), r("alternation"), r("s-ignorable"), lit(")")]),
        ),
        (
            "code-point-range",
            seq([
                lit("["),
                r("range-bound"),
                lit("-"),
                r("range-bound"),
                lit("]"),
            ]),
        ),
        ("range-bound", first([r("hex-char"), r("quoted-char")])),
        (
            "hex-char",
            seq([
                lit("x"),
                plus(r("hex-digit")),
                GrammarNode::not_ahead(r("alnum")),
            ]),
        ),
        (
            "quoted-string",
            first([
                seq([lit("'"), plus(r("single-quoted-char")), lit("'")]),
                seq([lit("\""), plus(r("double-quoted-char")), lit("\"")]),
            ]),
        ),
        (
            "quoted-char",
            first([
                seq([lit("'"), r("single-quoted-char"), lit("'")]),
                seq([lit("\""), r("double-quoted-char"), lit("\"")]),
            ]),
        ),
        ("single-quoted-char", any_except(&['\'', '\n', '\r'])),
        ("double-quoted-char", any_except(&['"', '\n', '\r'])),
        ("any-char", lit(".")),
        (
            "reference",
            seq([r("production-name"), opt(r("parameter-list"))]),
        ),
        (
            "production-name",
            seq([
                r("alpha"),
                star(first([r("alnum"), seq([r("name-joiner"), r("alnum")])])),
            ]),
        ),
        ("name-joiner", first([lit("-"), lit("+")])),
        (
            "parameter-list",
            seq([
                lit("("),
                spaces(),
                r("parameter"),
                star(seq([spaces(), lit(","), spaces(), r("parameter")])),
                spaces(),
                lit(")"),
            ]),
        ),
        (
            "parameter",
            first([
                r("in-flow"),
                r("context-value"),
                r("chomping-value"),
                r("param-sum"),
            ]),
        ),
        (
            "in-flow",
            seq([
                lit("in-flow("),
                spaces(),
                r("param-variable"),
                spaces(),
                lit(")"),
            ]),
        ),
        (
            "context-value",
            seq([
                first([
                    lit("block-in"),
                    lit("block-out"),
                    lit("block-key"),
                    lit("flow-in"),
                    lit("flow-out"),
                    lit("flow-key"),
                    lit("annotation-in"),
                ]),
                GrammarNode::not_ahead(r("name-char")),
            ]),
        ),
        (
            "chomping-value",
            seq([
                first([lit("strip"), lit("clip"), lit("keep")]),
                GrammarNode::not_ahead(r("name-char")),
            ]),
        ),
        (
            "param-sum",
            seq([
                r("param-term"),
                star(seq([
                    spaces(),
                    r("sum-operator"),
                    spaces(),
                    r("param-term"),
                ])),
            ]),
        ),
        ("param-term", first([r("param-variable"), r("decimal")])),
        (
            "param-variable",
            seq([
                first([lit("n"), lit("m"), lit("c"), lit("t")]),
                GrammarNode::not_ahead(r("alnum")),
            ]),
        ),
        ("sum-operator", first([lit("+"), lit("-")])),
        ("decimal", seq([opt(lit("-")), plus(r("digit"))])),
        ("name-char", first([r("alnum"), lit("-"), lit("+")])),
        ("alnum", first([r("alpha"), r("digit")])),
        ("alpha", first([range('a', 'z'), range('A', 'Z')])),
        ("digit", range('0', '9')),
        (
            "hex-digit",
            first([r("digit"), range('a', 'f'), range('A', 'F')]),
        ),
        (
            "s-ignorable",
            star(first([r("s-space"), r("b-break"), r("comment")])),
        ),
        ("s-space", first([point(0x20), point(0x09)])),
        ("b-break", first([point(0x0A), point(0x0D)])),
        ("comment", first([r("line-comment"), r("block-comment")])),
        ("line-comment", seq([lit("#"), star(any_except(&['\n', '\r']))])),
        (
            "block-comment",
            seq([
                lit("/*"),
                star(seq([
                    GrammarNode::not_ahead(lit("*/")),
                    GrammarNode::chars(CharSet::any()),
                ])),
                lit("*/"),
            ]),
        ),
    ];

    rules
        .into_iter()
        .map(|(name, body)| (name, Production::new(body)))
        .collect()
}
