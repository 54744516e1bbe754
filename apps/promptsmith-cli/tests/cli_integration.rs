//! Integration tests for the promptsmith CLI.
//!
//! Runs each subcommand against a temporary template directory to check
//! output and error handling.

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to create a temporary template directory
fn create_template_dir() -> Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let templates = temp_dir.path().join("templates");
    fs::create_dir(&templates)?;

    fs::write(
        templates.join("qa.yaml"),
        r#"name: qa
description: Answer questions
template: "Answer: {{ question }}"
input_variables: [question]
"#,
    )?;
    fs::write(
        templates.join("k1.json"),
        r#"{
  "name": "k1",
  "description": "first",
  "template": "K1: {{x}}",
  "input_variables": ["x"]
}"#,
    )?;
    fs::write(
        templates.join("k2.json"),
        r#"{
  "name": "k2",
  "description": "second",
  "template": "K2: {{output}}",
  "input_variables": ["output"]
}"#,
    )?;
    fs::write(
        templates.join("sentiment.yaml"),
        r#"name: sentiment
description: Few-shot sentiment
template: "{% for e in examples %}{{ e.text }}={{ e.label }};{% endfor %} {{ text }}"
input_variables: [text, examples]
examples:
  - text: great
    label: positive
  - text: awful
    label: negative
"#,
    )?;

    Ok(temp_dir)
}

/// Run the promptsmith binary inside `dir`
fn promptsmith(dir: &Path, args: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_promptsmith"))
        .args(args)
        .current_dir(dir)
        .output()?)
}

#[test]
fn test_cli_version() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(temp.path(), &["--version"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("promptsmith"));

    Ok(())
}

#[test]
fn test_cli_help() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(temp.path(), &["--help"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("list"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("chain"));

    Ok(())
}

#[test]
fn test_cli_list() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(temp.path(), &["list"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["k1", "k2", "qa", "sentiment"]);

    Ok(())
}

#[test]
fn test_cli_logs_info_to_stderr_by_default() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(temp.path(), &["list"])?;

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("loaded 4 templates"), "{stderr}");
    let stdout = String::from_utf8(output.stdout)?;
    assert!(!stdout.contains("loaded"));

    Ok(())
}

#[test]
fn test_cli_render() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(temp.path(), &["render", "qa", "--var", "question=2+2?"])?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "Answer: 2+2?\n");

    Ok(())
}

#[test]
fn test_cli_render_missing_variable_fails() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(temp.path(), &["render", "qa"])?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("missing required variables for template 'qa': question"));

    Ok(())
}

#[test]
fn test_cli_render_with_examples_and_vars_file() -> Result<()> {
    let temp = create_template_dir()?;
    fs::write(temp.path().join("vars.json"), r#"{"text": "fine"}"#)?;

    let output = promptsmith(
        temp.path(),
        &["render", "sentiment", "--vars-file", "vars.json", "--with-examples"],
    )?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout)?,
        "great=positive;awful=negative; fine\n"
    );

    Ok(())
}

#[test]
fn test_cli_chain_with_history() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(
        temp.path(),
        &["chain", "k1", "k2", "--var", "x=v", "--history"],
    )?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let (result, history) = stdout.split_once('\n').expect("result line");
    assert_eq!(result, "K2: K1: v");

    let records: serde_json::Value = serde_json::from_str(history)?;
    let names: Vec<_> = records
        .as_array()
        .expect("history array")
        .iter()
        .map(|r| r["template_name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["k1", "k2"]);

    Ok(())
}

#[test]
fn test_cli_chain_unknown_template_fails() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(temp.path(), &["chain", "k1", "nope", "--var", "x=v"])?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("unknown template: nope"));

    Ok(())
}

#[test]
fn test_cli_show_prints_json() -> Result<()> {
    let temp = create_template_dir()?;
    let output = promptsmith(temp.path(), &["show", "qa"])?;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["name"], "qa");
    assert_eq!(json["input_variables"], serde_json::json!(["question"]));

    Ok(())
}

#[test]
fn test_cli_check_reports_invalid_files() -> Result<()> {
    let temp = create_template_dir()?;
    let ok = promptsmith(temp.path(), &["check"])?;
    assert!(ok.status.success());

    fs::write(temp.path().join("templates/bad.json"), "{ nope")?;
    let bad = promptsmith(temp.path(), &["check"])?;

    assert!(!bad.status.success());
    let stdout = String::from_utf8(bad.stdout)?;
    assert!(stdout.contains("bad.json"));
    let stderr = String::from_utf8(bad.stderr)?;
    assert!(stderr.contains("1 of 5 template files failed to load"));

    Ok(())
}

#[test]
fn test_cli_config_sets_template_dir_and_output_key() -> Result<()> {
    let temp = create_template_dir()?;
    let prompts = temp.path().join("prompts");
    fs::create_dir(&prompts)?;
    fs::write(
        prompts.join("draft.yaml"),
        r#"name: draft
description: d
template: "draft of {{ topic }}"
input_variables: [topic]
"#,
    )?;
    fs::write(
        prompts.join("polish.yaml"),
        r#"name: polish
description: d
template: "polish {{ previous }}"
input_variables: [previous]
"#,
    )?;
    fs::write(
        temp.path().join("promptsmith.toml"),
        "template_dir = \"prompts\"\n\n[chain]\noutput_key = \"previous\"\n",
    )?;

    let output = promptsmith(temp.path(), &["chain", "draft", "polish", "--var", "topic=rust"])?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "polish draft of rust\n");

    Ok(())
}
