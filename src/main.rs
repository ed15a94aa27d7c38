mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use oxidized_iac_smells::offense::Verdict;
use oxidized_iac_smells::{audit, config, logging, output, smells};

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Commands::Audit {
            path,
            format,
            output: output_path,
            strict,
            config: config_path,
            max_permissions,
        } => {
            if !path.exists() {
                eprintln!("Error: path does not exist: {}", path.display());
                std::process::exit(2);
            }

            let mut config = config::Config::load(config_path.as_deref()).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });

            if let Some(ref mode) = max_permissions {
                if let Err(e) = config.set_max_permissions(mode) {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                }
            }

            if strict {
                config.strict.enabled = true;
            }

            let report = audit::run_audit(&path, &config).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });
            if output_path.is_some() && format.is_human_readable() {
                colored::control::set_override(false);
            }
            if let Err(e) = output::write_report(&report, &format, output_path.as_deref()) {
                eprintln!("Error writing output: {e}");
                std::process::exit(2);
            }
            if let Some(out_path) = &output_path {
                eprintln!("Output written to {}", out_path.display());
            }

            std::process::exit(if report.passed { 0 } else { 1 });
        }

        Commands::ListRules => {
            let rules = smells::all_rules();
            println!("{}", "Built-in Rules".bold().underline());
            println!();

            let mut current_detector = "";
            for rule in &rules {
                if rule.detector != current_detector {
                    if !current_detector.is_empty() {
                        println!();
                    }
                    println!("  {}", rule.detector.bold());
                    current_detector = rule.detector;
                }

                println!(
                    "    [{verdict}] {id:<32} {message}",
                    verdict = verdict_label(rule.verdict),
                    id = rule.id,
                    message = rule.message,
                );
            }

            println!();
            println!("  Total: {} rules", rules.len());
        }

        Commands::Explain { rule_id } => {
            let rules = smells::all_rules();
            match rules.iter().find(|r| r.id == rule_id) {
                Some(rule) => {
                    println!("{}", rule.id.bold());
                    println!();
                    println!("  Detector:     {}", rule.detector);
                    println!("  Smell:        {}", rule.smell);
                    println!("  Verdict:      {}", rule.verdict);
                    println!("  Description:  {}", rule.message);
                    println!("  Remediation:  {}", rule.remediation);
                }
                None => {
                    eprintln!("Unknown rule: {rule_id}");
                    eprintln!("Use 'oxidized-iac-smells list-rules' to see all available rules.");
                    std::process::exit(2);
                }
            }
        }
    }
}

fn verdict_label(verdict: Verdict) -> String {
    match verdict {
        Verdict::TruePositive => "TP".red().bold().to_string(),
        Verdict::FalsePositive => "FP".yellow().bold().to_string(),
        Verdict::TrueNegative => "TN".green().to_string(),
    }
}
