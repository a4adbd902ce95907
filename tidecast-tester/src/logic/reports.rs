use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::{BalanceReport, PolicySummary};

fn percent(rate: f64) -> f64 {
    rate * 100.0
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    report: &BalanceReport,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Balance Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;

    let loadout = &report.loadout;
    writeln!(
        out,
        "Loadout: world {} / {} / {}",
        loadout.world_id, loadout.character_id, loadout.rod_id
    )?;
    let seeds: Vec<String> = report.seeds.iter().map(u64::to_string).collect();
    writeln!(out, "Seeds: {} x {} iterations", seeds.join(","), report.iterations)?;
    writeln!(out, "Total runs: {}", report.runs.len())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for summary in &report.summaries {
        write_console_summary(out, summary)?;
    }

    let failing = report.summaries.iter().filter(|s| !s.passed()).count();
    if failing == 0 {
        writeln!(out, "{}", "✅ No invariant violations".green().bold())?;
    } else {
        writeln!(
            out,
            "{}",
            format!("❌ {failing} policies reported invariant violations")
                .red()
                .bold()
        )?;
    }
    Ok(())
}

fn write_console_summary<W: Write + ?Sized>(out: &mut W, summary: &PolicySummary) -> Result<()> {
    let status = if summary.passed() {
        "✅ PASS".green()
    } else {
        "❌ FAIL".red()
    };
    writeln!(out, "{status} {}", summary.strategy.label().bold())?;
    writeln!(
        out,
        "   Landed: {}/{} ({:.1}%)  perfect {:.1}%  golden {:.1}%  cancelled {}",
        summary.successes,
        summary.runs,
        percent(summary.success_rate),
        percent(summary.perfect_rate),
        percent(summary.golden_rate),
        summary.cancelled
    )?;
    writeln!(
        out,
        "   Mean ticks: {:.1}  mean bite: {:.0} ms",
        summary.mean_ticks, summary.mean_bite_ms
    )?;
    writeln!(
        out,
        "   Value landed: {}  quest payouts: {}  final money: {}",
        summary.total_value.to_string().yellow(),
        summary.quest_money,
        summary.final_money
    )?;
    if !summary.completed_goals.is_empty() {
        writeln!(out, "   Goals: {}", summary.completed_goals.join(", "))?;
    }
    if !summary.violations.is_empty() {
        writeln!(out, "   Violations:")?;
        for violation in &summary.violations {
            writeln!(out, "     • {}", violation.red())?;
        }
    }
    writeln!(out)?;
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, report: &BalanceReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    report: &BalanceReport,
) -> Result<()> {
    writeln!(out, "# Tidecast Balance Results\n")?;
    writeln!(out, "_Generated {}_\n", report.generated_at)?;

    let loadout = &report.loadout;
    writeln!(out, "## Setup\n")?;
    writeln!(out, "- **World**: {}", loadout.world_id)?;
    writeln!(out, "- **Character**: {}", loadout.character_id)?;
    writeln!(out, "- **Rod**: {}", loadout.rod_id)?;
    writeln!(out, "- **Iterations per seed**: {}", report.iterations)?;
    writeln!(out, "- **Total runs**: {}\n", report.runs.len())?;

    writeln!(out, "## Policies\n")?;
    writeln!(
        out,
        "| Policy | Runs | Success | Perfect | Golden | Mean ticks | Mean bite ms | Value | Quest money |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|")?;
    for summary in &report.summaries {
        let status = if summary.passed() { "✅" } else { "❌" };
        writeln!(
            out,
            "| {status} {} | {} | {:.1}% | {:.1}% | {:.1}% | {:.1} | {:.0} | {} | {} |",
            summary.strategy.label(),
            summary.runs,
            percent(summary.success_rate),
            percent(summary.perfect_rate),
            percent(summary.golden_rate),
            summary.mean_ticks,
            summary.mean_bite_ms,
            summary.total_value,
            summary.quest_money
        )?;
    }

    let flagged: Vec<&PolicySummary> = report.summaries.iter().filter(|s| !s.passed()).collect();
    if !flagged.is_empty() {
        writeln!(out, "\n## Violations\n")?;
        for summary in flagged {
            writeln!(out, "### {}\n", summary.strategy.label())?;
            for violation in &summary.violations {
                writeln!(out, "- {violation}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn generate_csv_report<W: Write + ?Sized>(out: &mut W, report: &BalanceReport) -> Result<()> {
    writeln!(
        out,
        "policy,seed,iteration,fish_id,fish_name,golden,price,bite_time_ms,success,perfect,cancelled,ticks,final_progress,violations"
    )?;
    for run in &report.runs {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{:.3},{}",
            run.strategy.key(),
            run.seed,
            run.iteration,
            csv_field(&run.fish_id),
            csv_field(&run.fish_name),
            run.golden,
            run.price,
            run.bite_time_ms,
            run.success,
            run.perfect,
            run.cancelled,
            run.ticks,
            run.final_progress,
            run.violations.len()
        )?;
    }
    Ok(())
}
