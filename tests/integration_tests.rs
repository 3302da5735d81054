use serde_json::Value;
use std::process::Command;

/// Helper function to run autochart with arguments
fn run_autochart(args: &[&str]) -> Result<Vec<u8>, String> {
    let output = Command::new(env!("CARGO_BIN_EXE_autochart"))
        .args(args)
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn run_json(args: &[&str]) -> Value {
    let stdout =
        run_autochart(args).unwrap_or_else(|e| panic!("autochart {:?} failed: {}", args, e));
    serde_json::from_slice(&stdout).expect("Output is not valid JSON")
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

// summary (4 tests)

#[test]
fn test_end_to_end_summary_csv() {
    let summary = run_json(&["summary", "test/sales.csv"]);
    assert_eq!(summary["count"], 8);
    assert_eq!(summary["numeric"]["sales"]["min"], 60.0);
    assert_eq!(summary["numeric"]["sales"]["max"], 200.0);
    assert_eq!(summary["numeric"]["sales"]["median"], 110.0);
    assert_eq!(summary["missingValues"]["sales"], 1);
    assert_eq!(summary["missingValues"]["units"], 1);
    assert_eq!(summary["missingValues"]["region"], 0);
    assert_eq!(summary["categorical"]["region"]["uniqueValues"], 4);
    assert_eq!(summary["categorical"]["region"]["mostCommon"][0]["value"], "North");
    assert_eq!(summary["categorical"]["region"]["mostCommon"][0]["count"], 3);
}

#[test]
fn test_end_to_end_summary_json_matches_csv() {
    let from_csv = run_json(&["summary", "test/sales.csv"]);
    let from_json = run_json(&["summary", "test/sales.json"]);
    assert_eq!(from_csv, from_json);
}

#[test]
fn test_end_to_end_summary_wrapped_json() {
    let summary = run_json(&["summary", "test/wrapped.json"]);
    assert_eq!(summary["count"], 3);
    assert_eq!(summary["numeric"]["rating"]["mean"], 4.0);
    assert_eq!(summary["categorical"]["city"]["uniqueValues"], 2);
}

#[test]
fn test_end_to_end_summary_with_config() {
    let summary = run_json(&["--config", "test/config.json", "summary", "test/sales.csv"]);
    let most_common = summary["categorical"]["region"]["mostCommon"].as_array().unwrap();
    assert_eq!(most_common.len(), 2);
}

// suggest (3 tests)

#[test]
fn test_end_to_end_suggest() {
    let specs = run_json(&["suggest", "test/sales.csv"]);
    let kinds: Vec<&str> = specs
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["bar", "line", "pie", "scatter", "histogram", "table"]);
    assert_eq!(specs[0]["title"], "region by sales");
    assert_eq!(specs[1]["title"], "sales Trend by region");
    assert_eq!(specs[2]["aggregation"]["function"], "sum");
    assert_eq!(specs[3]["title"], "sales vs units");
    assert_eq!(specs[5]["title"], "Data Table");
}

#[test]
fn test_end_to_end_suggest_numeric_only() {
    let specs = run_json(&["suggest", "test/measurements.csv"]);
    let kinds: Vec<&str> = specs
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["scatter", "histogram", "table"]);
}

#[test]
fn test_end_to_end_analyze() {
    let analysis = run_json(&["analyze", "test/wrapped.json"]);
    assert_eq!(analysis["summary"]["count"], 3);
    let kinds: Vec<&str> = analysis["suggestions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["bar", "pie", "table"]);
}

// chart (4 tests)

#[test]
fn test_end_to_end_chart_default_index() {
    let series = run_json(&["chart", "test/sales.csv"]);
    assert_eq!(series["shape"], "labeled");
    assert_eq!(series["labels"], serde_json::json!(["North", "South", "East", "West"]));
    assert_eq!(series["datasets"][0]["values"], serde_json::json!([380.0, 230.0, 110.0, 90.0]));
    assert_eq!(series["datasets"][0]["label"], "sales");
}

#[test]
fn test_end_to_end_chart_histogram_values() {
    let series = run_json(&["chart", "test/sales.csv", "--index", "4"]);
    assert_eq!(series["shape"], "values");
    assert_eq!(series["values"].as_array().unwrap().len(), 7);
}

#[test]
fn test_end_to_end_chart_from_spec_file() {
    let series = run_json(&["chart", "test/sales.csv", "--spec", "test/bar_spec.json"]);
    assert_eq!(series["labels"], serde_json::json!(["Widget", "Gadget", "Gizmo"]));
    assert_eq!(series["datasets"][0]["values"], serde_json::json!([8.0, 11.0, 2.0]));
    assert_eq!(series["datasets"][0]["label"], "Units by product");
}

#[test]
fn test_end_to_end_chart_index_out_of_range() {
    let result = run_autochart(&["chart", "test/sales.csv", "--index", "42"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("out of range"));
}

// render (4 tests)

#[test]
fn test_end_to_end_render_bar_chart() {
    let result = run_autochart(&["render", "test/sales.csv", "--width", "400", "--height", "300"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_render_line_chart() {
    let result = run_autochart(&["render", "test/sales.csv", "--index", "1"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_render_histogram_with_bins() {
    let result = run_autochart(&["render", "test/measurements.csv", "--index", "1", "--bins", "4"]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_render_table_fails() {
    let result = run_autochart(&["render", "test/measurements.csv", "--index", "2"]);
    assert!(result.is_err());
}

// ingestion errors (3 tests)

#[test]
fn test_end_to_end_unsupported_extension() {
    let result = run_autochart(&["summary", "test/notes.txt"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("unsupported file type"));
}

#[test]
fn test_end_to_end_ragged_csv() {
    let result = run_autochart(&["summary", "test/ragged.csv"]);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("failed to parse CSV"));
}

#[test]
fn test_end_to_end_missing_file() {
    let result = run_autochart(&["summary", "test/does_not_exist.csv"]);
    assert!(result.is_err());
}
