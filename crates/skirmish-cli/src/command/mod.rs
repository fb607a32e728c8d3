use clap::{Parser, Subcommand};

use self::{evaluate::EvaluateArg, show_weights::ShowWeightsArg, train::TrainArg};

mod evaluate;
mod show_weights;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Train target-selection weights against the arena
    Train(#[clap(flatten)] TrainArg),
    /// Play greedy episodes with saved weights, without learning
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Print the weights stored in a weight file
    ShowWeights(#[clap(flatten)] ShowWeightsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::ShowWeights(arg) => show_weights::run(&arg)?,
    }
    Ok(())
}
