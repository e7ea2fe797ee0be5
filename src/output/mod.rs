// Terminal rendering for check verdicts.
//
// All terminal-specific formatting lives here; main.rs delegates after
// running the checks.

use colored::Colorize;

use crate::result::AggregateResult;

/// Display one URL's aggregate verdict with per-provider detail.
pub fn display_aggregate(result: &AggregateResult) {
    let verdict = if !result.is_conclusive() {
        "INCONCLUSIVE".yellow().bold()
    } else if result.is_safe() {
        "SAFE".green().bold()
    } else {
        "UNSAFE".red().bold()
    };

    println!("\n{}  {}", verdict, result.url().bold());

    for (provider, check) in result.provider_results() {
        if check.is_safe() {
            println!("  {:<22} {}", provider, "clean".green());
        } else {
            println!(
                "  {:<22} {}",
                provider,
                check.threat_types().join(", ").red()
            );
            for threat in check.threats() {
                println!("    {}", threat.description.dimmed());
            }
        }
    }

    for failure in result.failures() {
        println!(
            "  {:<22} {} {}",
            failure.provider,
            "failed:".yellow(),
            failure.error.dimmed()
        );
    }
}

/// Display a one-line-per-URL summary for a batch.
pub fn display_batch_summary(results: &[(String, AggregateResult)]) {
    let unsafe_count = results.iter().filter(|(_, r)| !r.is_safe()).count();

    println!(
        "\n{}",
        format!("=== Batch verdicts ({} URLs) ===", results.len()).bold()
    );

    for (url, result) in results {
        let verdict = if !result.is_conclusive() {
            "?".yellow().bold()
        } else if result.is_safe() {
            "ok".green()
        } else {
            "UNSAFE".red().bold()
        };
        println!("  {:<7} {}", verdict, url);
    }

    if unsafe_count > 0 {
        println!("\n{}", format!("{unsafe_count} unsafe URL(s) found").red());
    } else {
        println!("\n{}", "No unsafe URLs found".green());
    }
}
