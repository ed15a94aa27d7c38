use crate::offense::{AuditReport, Offense, Verdict};
use crate::smells;
use serde_sarif::sarif::{
    ArtifactLocation, Location, Message, MultiformatMessageString, PhysicalLocation, Region,
    ReportingDescriptor, Result as SarifResult, ResultLevel, Run, Sarif, Tool, ToolComponent,
};
use std::collections::HashMap;

/// Formats the actionable offenses (True and False Positives) as SARIF 2.1.0.
/// True Negatives are not results and are left out.
pub fn format(report: &AuditReport) -> String {
    let offenses: Vec<&Offense> = report.actionable().collect();

    let catalogue: HashMap<&str, smells::RuleInfo> = smells::all_rules()
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    let mut rule_ids: Vec<&str> = offenses.iter().map(|o| o.rule_id.as_str()).collect();
    rule_ids.sort();
    rule_ids.dedup();

    let rule_index: HashMap<&str, i64> = rule_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (*id, i as i64))
        .collect();

    let rules: Vec<ReportingDescriptor> = rule_ids
        .iter()
        .map(|id| {
            let mut rule = ReportingDescriptor::builder().id(id.to_string()).build();
            if let Some(info) = catalogue.get(id) {
                rule.short_description = Some(
                    MultiformatMessageString::builder()
                        .text(info.message.to_string())
                        .build(),
                );
                rule.help = Some(
                    MultiformatMessageString::builder()
                        .text(info.remediation.to_string())
                        .build(),
                );
            }
            rule
        })
        .collect();

    let results: Vec<SarifResult> = offenses
        .iter()
        .map(|o| {
            let level = match o.verdict {
                Verdict::TruePositive => ResultLevel::Error,
                Verdict::FalsePositive | Verdict::TrueNegative => ResultLevel::Note,
            };

            let mut result = SarifResult::builder()
                .message(Message::builder().text(o.message.clone()).build())
                .build();

            result.rule_id = Some(o.rule_id.clone());
            result.level = Some(level);
            result.rule_index = rule_index.get(o.rule_id.as_str()).copied();

            if let Some(ref file) = o.resource.location.file {
                let uri = file.to_string_lossy().replace('\\', "/");

                let mut location = Location::builder().build();
                let mut physical = PhysicalLocation::builder().build();

                physical.artifact_location = Some(ArtifactLocation::builder().uri(uri).build());

                if o.resource.location.line > 0 {
                    physical.region = Some(
                        Region::builder()
                            .start_line(o.resource.location.line as i64)
                            .build(),
                    );
                }

                location.physical_location = Some(physical);
                result.locations = Some(vec![location]);
            }

            result
        })
        .collect();

    let driver = ToolComponent::builder()
        .name("oxidized-iac-smells")
        .version(env!("CARGO_PKG_VERSION").to_string())
        .rules(rules)
        .build();

    let tool = Tool::builder().driver(driver).build();

    let run = Run::builder().tool(tool).results(results).build();

    let sarif = Sarif::builder().version("2.1.0").runs(vec![run]).build();

    serde_json::to_string_pretty(&sarif).expect("SARIF serialization failed")
}
