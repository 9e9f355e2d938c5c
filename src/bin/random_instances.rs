use std::{fs::File, io::BufWriter, path::PathBuf};

use log::LevelFilter;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use structopt::StructOpt;

use mindom::{
    exact::{DdMinCdAsc, FixedOrder, MddMinCdDesc},
    graph::{AdjArray, GnpGenerator, GraphEdgeOrder, GraphNodeOrder},
    io::write_graph,
    log::build_stderr_logger_for_verbosity,
    testing::{best_size, brute_force_min, optimize},
};

/// Generates random instances and cross-checks the solver variants
/// against each other (and, for small graphs, against brute force).
/// Mismatching instances can be written out for later debugging.
#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(short, long, default_value = "1000")]
    repeats: u32,

    #[structopt(short, long, default_value = "12")]
    nodes: u32,

    #[structopt(short, long, default_value = "0.25")]
    edge_probability: f64,

    #[structopt(short, long, default_value = "1234567")]
    seed: u64,

    /// Write mismatching instances into this directory
    #[structopt(short, long)]
    write_dir: Option<PathBuf>,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    build_stderr_logger_for_verbosity(LevelFilter::Warn, opt.verbose);

    let mut rng = Pcg64Mcg::seed_from_u64(opt.seed);
    let mut mismatches = 0u32;

    for round in 0..opt.repeats {
        let graph = AdjArray::random_gnp(&mut rng, opt.nodes, opt.edge_probability);

        let fixed = best_size(&optimize::<FixedOrder>(&graph, &[], &[]), &graph);
        let dd = best_size(&optimize::<DdMinCdAsc>(&graph, &[], &[]), &graph);
        let mdd = best_size(&optimize::<MddMinCdDesc>(&graph, &[], &[]), &graph);

        let brute = (graph.len() <= 16)
            .then(|| brute_force_min(&graph, &[], &[]).expect("unconstrained instance"));

        let agree = fixed == dd && dd == mdd && brute.map_or(true, |b| b == fixed);
        if !agree {
            mismatches += 1;
            println!(
                "mismatch on round {round}: n = {}, m = {}, fixed = {fixed}, dd = {dd}, \
                 mdd = {mdd}, brute = {brute:?}",
                graph.number_of_nodes(),
                graph.number_of_edges(),
            );

            if let Some(dir) = &opt.write_dir {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(format!("mismatch_round{round}.graph"));
                let mut writer = BufWriter::new(File::create(&path)?);
                write_graph(&mut writer, &graph)?;
                println!("wrote {}", path.display());
            }
        } else if round % 100 == 0 {
            log::info!("round {round}: gamma = {fixed}");
        }
    }

    if mismatches > 0 {
        anyhow::bail!("{mismatches} mismatching instances");
    }
    println!("all {} rounds agree", opt.repeats);
    Ok(())
}
