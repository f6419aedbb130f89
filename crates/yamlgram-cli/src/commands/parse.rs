//! Parse input with a compiled grammar and print the tree.

use yamlgram_vm::TreeOptions;

use super::run_common::{self, RunOptions};

pub struct ParseArgs {
    pub run: RunOptions,
    pub spans: bool,
    pub params: bool,
    pub json: bool,
    pub color: bool,
}

pub fn run(args: ParseArgs) {
    let prepared = run_common::prepare(args.run, args.color);

    let tree = match prepared.operation().parse_all(&prepared.root) {
        Ok(tree) => tree,
        Err(e) => run_common::exit_with(&e),
    };

    if args.json {
        match serde_json::to_string_pretty(&tree) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let options = TreeOptions::default()
        .spans(args.spans)
        .parameters(args.params)
        .colored(args.color);
    print!("{}", tree.dump_with(&prepared.source, options));
}
