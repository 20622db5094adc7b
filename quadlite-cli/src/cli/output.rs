// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for the compile command

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::collections::BTreeSet;

use super::commands::OutputFormat;
use super::handlers::CompileReport;

pub struct ResultFormatter;

impl ResultFormatter {
    pub fn format(report: &CompileReport, format: OutputFormat, explain: bool) -> String {
        match format {
            OutputFormat::Table => Self::format_table(report, explain),
            OutputFormat::Json => Self::format_json(report, explain),
        }
    }

    fn format_table(report: &CompileReport, explain: bool) -> String {
        let mut out = String::new();

        if explain {
            out.push_str(&format!("{}\n", "Iterator tree:".bold()));
            out.push_str(&report.tree.to_string());
            out.push('\n');
        }

        if report.results.is_empty() {
            out.push_str(&"No results".yellow().to_string());
            return out;
        }

        let tag_names: BTreeSet<&str> = report
            .results
            .iter()
            .flat_map(|entry| entry.tags.keys().map(String::as_str))
            .collect();

        let mut header = vec!["result"];
        header.extend(tag_names.iter().copied());

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);

        for entry in &report.results {
            let mut row = vec![entry.result.clone()];
            row.extend(
                tag_names
                    .iter()
                    .map(|tag| entry.tags.get(*tag).cloned().unwrap_or_default()),
            );
            table.add_row(row);
        }

        out.push_str(&table.to_string());
        out.push_str(&format!(
            "\n{} result(s) from step {} ({} steps, {} quads)",
            report.results.len(),
            report.tip,
            report.steps,
            report.quads
        ));
        out
    }

    fn format_json(report: &CompileReport, explain: bool) -> String {
        let value = if explain {
            serde_json::to_value(report)
        } else {
            serde_json::to_value(&report.results)
        };
        value
            .and_then(|v| serde_json::to_string_pretty(&v))
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::ResultEntry;
    use quadlite::gremlin::StepId;
    use quadlite::GraphIterator;
    use std::collections::BTreeMap;

    fn report(results: Vec<ResultEntry>) -> CompileReport {
        let store = quadlite::MemStore::new();
        CompileReport {
            tip: StepId(1),
            steps: 2,
            quads: 0,
            tree: GraphIterator::all().describe(&store),
            results,
        }
    }

    fn entry(result: &str, tags: &[(&str, &str)]) -> ResultEntry {
        ResultEntry {
            result: result.to_string(),
            tags: tags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_table_has_a_column_per_tag() {
        let report = report(vec![
            entry("bob", &[("start", "alice")]),
            entry("carol", &[("friend", "bob"), ("start", "alice")]),
        ]);
        let out = ResultFormatter::format(&report, OutputFormat::Table, false);
        assert!(out.contains("result"));
        assert!(out.contains("friend"));
        assert!(out.contains("start"));
        assert!(out.contains("carol"));
        assert!(out.contains("2 result(s) from step 1"));
    }

    #[test]
    fn test_json_results() {
        let report = report(vec![entry("bob", &[])]);
        let out = ResultFormatter::format(&report, OutputFormat::Json, false);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["result"], "bob");

        let explained = ResultFormatter::format(&report, OutputFormat::Json, true);
        let parsed: serde_json::Value = serde_json::from_str(&explained).unwrap();
        assert_eq!(parsed["tree"]["type"], "all");
        assert_eq!(parsed["tip"], 1);
    }
}
