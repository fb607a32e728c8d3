//! Averaged evaluation rewards and the fixed-format table they are printed in.
//!
//! Other tools parse this table, so its layout must not change:
//!
//! ```text
//!
//! Games Played      Average Cumulative Reward
//! -------------     -------------------------
//! 0                 -12.34
//! 10                57.00
//!
//! ```
//!
//! Row `i` shows `10 · i` games played, left-aligned in an 18 column field,
//! followed by the average with two decimals.

use crate::schedule::LEARNING_BLOCK;

const HEADER: &str = "Games Played      Average Cumulative Reward";
const RULE: &str = "-------------     -------------------------";
const GAMES_COLUMN_WIDTH: usize = RULE.len() - "-------------------------".len();

/// Renders the performance table for the given block averages.
///
/// ```
/// use skirmish_training::report::format_performance_table;
///
/// let table = format_performance_table(&[-3.5]);
/// assert!(table.ends_with("0                 -3.50\n\n"));
/// ```
#[must_use]
pub fn format_performance_table(averages: &[f64]) -> String {
    let mut table = String::new();
    table.push('\n');
    table.push_str(HEADER);
    table.push('\n');
    table.push_str(RULE);
    table.push('\n');
    for (i, average) in (0_u64..).zip(averages) {
        let games = i * u64::from(LEARNING_BLOCK);
        table.push_str(&format!(
            "{games:<width$}{average:.2}\n",
            width = GAMES_COLUMN_WIDTH
        ));
    }
    table.push('\n');
    table
}

/// Collects the cumulative rewards of evaluation episodes and averages them
/// per evaluation block.
#[derive(Debug, Clone, Default)]
pub struct PerformanceReport {
    current_block: Vec<f64>,
    averages: Vec<f64>,
}

impl PerformanceReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, cumulative_reward: f64) {
        self.current_block.push(cumulative_reward);
    }

    /// Closes the current block and returns its average.
    ///
    /// Returns `None` (and records nothing) if no reward was recorded.
    #[expect(clippy::cast_precision_loss)]
    pub fn finish_block(&mut self) -> Option<f64> {
        if self.current_block.is_empty() {
            return None;
        }
        let sum: f64 = self.current_block.iter().sum();
        let average = sum / self.current_block.len() as f64;
        self.current_block.clear();
        self.averages.push(average);
        Some(average)
    }

    /// Averages of every finished block, oldest first.
    #[must_use]
    pub fn averages(&self) -> &[f64] {
        &self.averages
    }

    #[must_use]
    pub fn table(&self) -> String {
        format_performance_table(&self.averages)
    }
}
