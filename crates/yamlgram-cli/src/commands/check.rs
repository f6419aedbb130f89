use yamlgram_core::Colors;

use super::grammar_loader::{GrammarSelection, load_grammar};

pub struct CheckArgs {
    pub grammar: GrammarSelection,
    pub strict: bool,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let grammar = match load_grammar(&args.grammar, args.color) {
        Ok(grammar) => grammar,
        Err(e) => {
            e.print();
            std::process::exit(1);
        }
    };

    let missing = grammar.undefined_references();
    let c = Colors::new(args.color);
    let (label, color) = if args.strict {
        ("error", c.failed)
    } else {
        ("warning", c.muted)
    };
    for (caller, name) in &missing {
        eprintln!(
            "{color}{label}{}: undefined production `{name}` referenced from `{caller}`",
            c.reset
        );
    }

    log::debug!(
        "checked {} production(s), {} undefined reference(s)",
        grammar.len(),
        missing.len()
    );

    if args.strict && !missing.is_empty() {
        std::process::exit(1);
    }

    // Silent on success (like cargo check)
}
