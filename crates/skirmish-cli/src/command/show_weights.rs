use std::path::PathBuf;

use anyhow::Context;
use skirmish_evaluator::{feature::FeatureKind, q_function::WeightVector};
use skirmish_training::weight_store::{DEFAULT_PATH, WeightStore};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ShowWeightsArg {
    /// Weight file path
    #[arg(default_value = DEFAULT_PATH)]
    path: PathBuf,
}

pub(crate) fn run(arg: &ShowWeightsArg) -> anyhow::Result<()> {
    let ShowWeightsArg { path } = arg;
    let values = WeightStore::new(path.clone())
        .load()
        .with_context(|| format!("Failed to load weights from {}", path.display()))?;
    let weights = WeightVector::new(values)
        .with_context(|| format!("Unusable weights in {}", path.display()))?;

    println!("{:<24} {:>12}", "Feature", "Weight");
    for (kind, weight) in FeatureKind::ALL.iter().zip(weights.as_slice()) {
        println!("{:<24} {weight:>12.6}", kind.name());
    }
    Ok(())
}
