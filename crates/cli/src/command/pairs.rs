use anyhow::Result;
use clap::Args;
use deid_graph::{consolidate, generate_pairs, CandidatePair, MatchThreshold};
use deid_protocol::serialize_json;
use serde::Serialize;

#[derive(Args)]
pub struct PairsArgs {
    /// Surface strings to compare
    #[arg(required = true)]
    pub strings: Vec<String>,

    /// Match threshold (normalized distance, 0-1)
    #[arg(long, default_value_t = MatchThreshold::DEFAULT)]
    pub threshold: f64,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
struct Component {
    id: usize,
    members: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PairsOutput {
    threshold: f64,
    pairs: Vec<CandidatePair>,
    components: Vec<Component>,
}

pub fn run_pairs(args: &PairsArgs) -> Result<()> {
    let threshold = MatchThreshold::new(args.threshold)?;
    let pairs = generate_pairs(&args.strings, threshold);
    let ids = consolidate(&args.strings, &pairs);

    let components = (1..=ids.component_count())
        .map(|id| Component {
            id,
            members: ids.members(id).into_iter().map(str::to_string).collect(),
        })
        .collect();

    let output = PairsOutput {
        threshold: threshold.value(),
        pairs,
        components,
    };
    println!("{}", serialize_json(&output, args.pretty)?);
    Ok(())
}
