use std::time::Instant;

use log::LevelFilter;
use mindom::{cli, errors::InvariantCheck, log::build_stderr_logger_for_level};

/// Configuration problems are diagnostics, not failures: they are logged
/// and the process exits 0 without running a solver.
fn main() {
    build_stderr_logger_for_level(LevelFilter::Info);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        log::info!("use the -h flag for a list of components");
    }

    let mut context = match cli::parse_arguments(&args) {
        Ok(Some(context)) => context,
        Ok(None) => return,
        Err(error) => {
            log::error!("{error}");
            return;
        }
    };

    log::info!("{}", context.summary);

    loop {
        let mut inst = match context.input_source.read_next() {
            Ok(Some(inst)) => inst,
            Ok(None) => break,
            Err(error) => {
                log::error!("{error}");
                return;
            }
        };

        context.output_proxy.observe_input(&inst.graph);

        for filter in &mut context.preprocess_filters {
            if let Err(error) = filter.process(&mut inst) {
                log::error!("{error}");
                return;
            }
        }
        if let Err(error) = inst.is_correct() {
            log::error!("{error}");
            return;
        }

        let timer = Instant::now();
        if let Err(error) = context.solver.solve(&mut inst, context.output_proxy.as_mut()) {
            log::error!("{error}");
            return;
        }
        log::info!("total solver time: {:.3}s", timer.elapsed().as_secs_f64());
    }
}
