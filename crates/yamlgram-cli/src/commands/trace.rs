//! Trace production calls for debugging.

use yamlgram_core::Colors;
use yamlgram_vm::{PrintTracer, TreeOptions, Verbosity};

use super::run_common::{self, RunOptions};

pub struct TraceArgs {
    pub run: RunOptions,
    pub verbosity: Verbosity,
    pub no_result: bool,
    pub spans: bool,
    pub params: bool,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let prepared = run_common::prepare(args.run, args.color);
    let mut tracer = PrintTracer::builder(&prepared.source)
        .verbosity(args.verbosity)
        .colored(args.color)
        .build();

    let result = prepared
        .operation()
        .parse_all_with(&prepared.root, &mut tracer);
    tracer.print();

    let tree = match result {
        Ok(tree) => tree,
        Err(e) => run_common::exit_with(&e),
    };

    if args.no_result {
        return;
    }

    let colors = Colors::new(args.color);
    println!("{}---{}", colors.muted, colors.reset);
    let options = TreeOptions::default()
        .spans(args.spans)
        .parameters(args.params)
        .colored(args.color);
    print!("{}", tree.dump_with(&prepared.source, options));
}
