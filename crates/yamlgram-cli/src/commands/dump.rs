use yamlgram_compiler::META_GRAMMAR_BNF;

use super::grammar_loader::{GrammarSelection, load_grammar};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DumpFormat {
    #[default]
    Bnf,
    Json,
}

pub struct DumpArgs {
    pub grammar: GrammarSelection,
    pub format: DumpFormat,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let meta_only =
        args.grammar.meta && args.grammar.base.is_none() && args.grammar.patches.is_empty();
    if meta_only && args.format == DumpFormat::Bnf {
        print!("{}", META_GRAMMAR_BNF);
        return;
    }

    let grammar = match load_grammar(&args.grammar, args.color) {
        Ok(grammar) => grammar,
        Err(e) => {
            e.print();
            std::process::exit(1);
        }
    };

    match args.format {
        DumpFormat::Bnf => print!("{}", grammar),
        DumpFormat::Json => match grammar.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        },
    }
}
