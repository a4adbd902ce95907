use colored::Colorize;
use serde::{Deserialize, Serialize};
use tidecast_game::{Angler, Loadout, QuestDef, TuningCatalog};

use crate::logic::policy::PlayerStrategy;
use crate::logic::simulation::{RunRecord, SimulationPlan, simulate_run};

/// Aggregate outcome of every run played under one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySummary {
    pub strategy: PlayerStrategy,
    pub runs: usize,
    pub successes: usize,
    pub perfects: usize,
    pub goldens: usize,
    pub cancelled: usize,
    pub success_rate: f64,
    pub perfect_rate: f64,
    pub golden_rate: f64,
    pub mean_ticks: f64,
    pub mean_bite_ms: f64,
    /// Sale value of everything landed.
    pub total_value: i64,
    /// Money paid out by completed quest goals.
    pub quest_money: i64,
    pub completed_goals: Vec<String>,
    /// Angler balance after quest payouts and selling the creel.
    pub final_money: i64,
    pub violations: Vec<String>,
}

impl PolicySummary {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Full result of one harness invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub generated_at: String,
    pub loadout: Loadout,
    pub seeds: Vec<u64>,
    pub iterations: u64,
    pub summaries: Vec<PolicySummary>,
    pub runs: Vec<RunRecord>,
}

impl BalanceReport {
    #[must_use]
    pub fn has_violations(&self) -> bool {
        self.summaries.iter().any(|summary| !summary.passed())
    }
}

pub struct BalanceTester {
    verbose: bool,
}

impl BalanceTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Play `iterations` sessions per seed for every strategy.
    pub fn run(
        &self,
        catalog: &TuningCatalog,
        quests: &QuestDef,
        plan: &SimulationPlan,
        strategies: &[PlayerStrategy],
        seeds: &[u64],
        iterations: u64,
    ) -> BalanceReport {
        let mut summaries = Vec::with_capacity(strategies.len());
        let mut runs = Vec::new();

        for &strategy in strategies {
            if self.verbose {
                println!(
                    "🎣 Testing policy: {} ({} seeds x {iterations} iterations)",
                    strategy.label().bright_white(),
                    seeds.len()
                );
            }
            let (summary, records) =
                self.run_strategy(catalog, quests, plan, strategy, seeds, iterations);
            summaries.push(summary);
            runs.extend(records);
        }

        BalanceReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            loadout: plan.loadout.clone(),
            seeds: seeds.to_vec(),
            iterations,
            summaries,
            runs,
        }
    }

    fn run_strategy(
        &self,
        catalog: &TuningCatalog,
        quests: &QuestDef,
        plan: &SimulationPlan,
        strategy: PlayerStrategy,
        seeds: &[u64],
        iterations: u64,
    ) -> (PolicySummary, Vec<RunRecord>) {
        let mut angler = Angler::new(&plan.loadout.character_id, quests.clone());
        let mut records = Vec::new();
        let mut quest_money = 0_i64;
        let mut completed_goals = Vec::new();
        let mut violations = Vec::new();

        for &seed in seeds {
            for iteration in 0..iterations {
                let (record, result) = simulate_run(catalog, plan, strategy, seed, iteration);

                for payout in angler.record(&result) {
                    quest_money += payout.money;
                    if self.verbose {
                        println!(
                            "  🏆 Goal {} complete (+{} coins)",
                            payout.goal_id.green(),
                            payout.money
                        );
                    }
                    completed_goals.push(payout.goal_id);
                }

                for violation in &record.violations {
                    let line = format!("seed {seed} iteration {iteration}: {violation}");
                    if self.verbose {
                        println!("  ❌ {}", line.red());
                    }
                    violations.push(line);
                }

                if self.verbose {
                    let status = if record.success {
                        "landed".green()
                    } else if record.cancelled {
                        "cancelled".yellow()
                    } else {
                        "lost".red()
                    };
                    println!(
                        "  {status} {} (seed {seed}, iteration {iteration}, {} ticks)",
                        record.fish_name, record.ticks
                    );
                }
                records.push(record);
            }
        }

        let total_value = angler.sell_creel();
        let summary = summarize(
            strategy,
            &records,
            total_value,
            quest_money,
            completed_goals,
            angler.money(),
            violations,
        );
        (summary, records)
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[allow(clippy::cast_precision_loss)]
fn summarize(
    strategy: PlayerStrategy,
    records: &[RunRecord],
    total_value: i64,
    quest_money: i64,
    completed_goals: Vec<String>,
    final_money: i64,
    violations: Vec<String>,
) -> PolicySummary {
    let runs = records.len();
    let successes = records.iter().filter(|r| r.success).count();
    let perfects = records.iter().filter(|r| r.perfect).count();
    let goldens = records.iter().filter(|r| r.golden).count();
    let cancelled = records.iter().filter(|r| r.cancelled).count();

    PolicySummary {
        strategy,
        runs,
        successes,
        perfects,
        goldens,
        cancelled,
        success_rate: ratio(successes, runs),
        perfect_rate: ratio(perfects, runs),
        golden_rate: ratio(goldens, runs),
        mean_ticks: mean(records.iter().map(|r| r.ticks as f64)),
        mean_bite_ms: mean(records.iter().map(|r| r.bite_time_ms as f64)),
        total_value,
        quest_money,
        completed_goals,
        final_money,
        violations,
    }
}
