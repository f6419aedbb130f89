use super::*;
use crate::{CharSet, Context, ParamError, ParamName, ParamValue, Parameters};

fn caller() -> Parameters {
    Parameters {
        n: Some(2),
        m: Some(3),
        c: Some(Context::BlockKey),
        t: None,
    }
}

#[test]
fn binding_resolves_against_caller() {
    let params = caller();
    assert_eq!(Binding::n().resolve(&params), Ok(ParamValue::Int(2)));
    assert_eq!(Binding::n_plus(-1).resolve(&params), Ok(ParamValue::Int(1)));
    assert_eq!(
        Binding::Indent {
            n: true,
            m: true,
            offset: 1
        }
        .resolve(&params),
        Ok(ParamValue::Int(6))
    );
    assert_eq!(
        Binding::Context.resolve(&params),
        Ok(ParamValue::Context(Context::BlockKey))
    );
    assert_eq!(
        Binding::InFlow.resolve(&params),
        Ok(ParamValue::Context(Context::FlowKey))
    );
    assert_eq!(
        Binding::Chomping.resolve(&params),
        Err(ParamError::Unbound(ParamName::T))
    );
}

#[test]
fn in_flow_of_block_context_is_an_error() {
    let params = Parameters {
        c: Some(Context::BlockIn),
        ..Parameters::default()
    };
    assert_eq!(
        Binding::InFlow.resolve(&params),
        Err(ParamError::InFlowUndefined(Context::BlockIn))
    );
}

#[test]
fn bound_clamps_negative_to_zero() {
    let params = Parameters {
        n: Some(-1),
        ..Parameters::default()
    };
    assert_eq!(Bound::Param(Binding::n()).resolve(&params), Ok(0));
    assert_eq!(Bound::Param(Binding::n_plus(3)).resolve(&params), Ok(2));
    assert_eq!(Bound::Fixed(4).resolve(&params), Ok(4));
}

#[test]
fn merge_overrides_by_name_and_keeps_order() {
    let base: Grammar = [
        ("a", Production::new(GrammarNode::string("a"))),
        ("b", Production::new(GrammarNode::string("b"))),
    ]
    .into_iter()
    .collect();
    let patch: Grammar = [
        ("b", Production::new(GrammarNode::string("B"))),
        ("c", Production::new(GrammarNode::Empty)),
    ]
    .into_iter()
    .collect();

    let merged = base.merged(patch);
    assert_eq!(merged.names().collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(merged.get("b").unwrap().body, GrammarNode::string("B"));
}

#[test]
fn undefined_references_are_listed_once() {
    let grammar: Grammar = [
        (
            "top",
            Production::new(GrammarNode::seq([
                GrammarNode::reference("item"),
                GrammarNode::zero_or_more(GrammarNode::reference("missing")),
                GrammarNode::not_ahead(GrammarNode::reference("missing")),
            ])),
        ),
        (
            "item",
            Production::new(GrammarNode::context([(
                Parameters::default(),
                GrammarNode::chars(CharSet::from_ranges([('a', 'z')])),
            )])),
        ),
    ]
    .into_iter()
    .collect();

    assert_eq!(grammar.undefined_references(), [("top", "missing")]);
}
