use std::fs;

use edgetree::{
    EdgetreeOptions, InputOptions, OutputFormat, ProcessingOptions, RenderOptions,
    describe_failure, failure_exit_code, run_main,
};
use edgetree_core::{Error, ErrorKind};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

fn services_fixture() -> &'static str {
    r#"[
        {"id": "gw", "name": "gateway", "type": "edge", "edges": [{"targetid": "auth"}, {"targetid": "db"}]},
        {"id": "auth", "name": "auth", "type": "service", "edges": [{"targetid": "db"}, {"targetid": "ldap"}]},
        {"id": "db", "name": "postgres", "type": "storage"}
    ]"#
}

fn write_fixture(name: &str, content: &str) -> (tempfile::TempDir, String) {
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join(name);
    fs::write(&file_path, content).expect("write fixture");
    (dir, file_path.display().to_string())
}

fn file_options(file: String) -> EdgetreeOptions {
    EdgetreeOptions::new(InputOptions::new().with_files([file]))
}

#[test]
fn json_output_nests_children() {
    let (_dir, file) = write_fixture("services.json", services_fixture());

    let output = run_main(&file_options(file)).expect("json run");
    assert!(output.warnings.is_empty());

    let value: Value = serde_json::from_str(&output.rendered).expect("valid json");
    assert_eq!(value["name"], json!("gateway"));
    assert_eq!(value["children"][0]["name"], json!("auth"));
    assert_eq!(value["children"][0]["children"][0]["name"], json!("postgres"));
    assert_eq!(
        value["children"][0]["children"][1],
        json!({"id": "missing-ldap", "name": "Missing: ldap", "isMissing": true, "children": []})
    );
    assert_eq!(value["children"][1]["name"], json!("postgres"));
}

#[test]
fn tree_output_shows_selected_attributes() {
    let (_dir, file) = write_fixture("services.json", services_fixture());

    let mut opts = file_options(file).with_format(OutputFormat::Tree);
    opts.show = vec!["type".to_string()];
    let output = run_main(&opts).expect("tree run");

    assert!(
        output.rendered.starts_with("(gateway [children: 2] type: edge\n"),
        "unexpected tree: {}",
        output.rendered
    );
    assert!(output.rendered.contains("(Not found: ldap)"), "{}", output.rendered);
    assert_eq!(output.rendered.matches("postgres").count(), 2);
}

#[test]
fn keys_output_lists_root_string_attributes() {
    let (_dir, file) = write_fixture("services.json", services_fixture());
    let output = run_main(&file_options(file).with_format(OutputFormat::Keys)).expect("keys run");
    assert_eq!(output.rendered, "id\nname\ntype");
}

#[test]
fn dot_output_draws_shared_nodes_once() {
    let (_dir, file) = write_fixture("services.json", services_fixture());
    let output = run_main(&file_options(file).with_format(OutputFormat::Dot)).expect("dot run");

    assert!(output.rendered.starts_with("digraph hierarchy {"));
    assert_eq!(output.rendered.matches("label=\"postgres").count(), 1);
    assert_eq!(output.rendered.matches(" -> n2;").count(), 2);
}

#[test]
fn cyclic_input_fails_json_but_renders_tree() {
    let cyclic = r#"[
        {"id": "r", "edges": [{"targetid": "a"}]},
        {"id": "a", "edges": [{"targetid": "b"}]},
        {"id": "b", "edges": [{"targetid": "a"}]}
    ]"#;
    let (_dir, file) = write_fixture("cycle.json", cyclic);

    let err = run_main(&file_options(file.clone())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CycleDetected);

    let output = run_main(&file_options(file).with_format(OutputFormat::Compact)).expect("compact run");
    assert!(output.rendered.contains("(cycle)"), "{}", output.rendered);
}

#[test]
fn inline_text_input() {
    let input = InputOptions::new().with_text(r#"[{"id": 1}, {"id": 2}]"#);
    let output = run_main(&EdgetreeOptions::new(input)).expect("text run");
    let value: Value = serde_json::from_str(&output.rendered).unwrap();
    assert_eq!(value, json!([{"id": 1, "children": []}, {"id": 2, "children": []}]));

    let err = run_main(&EdgetreeOptions::new(InputOptions::new().with_text("[]"))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);

    let err = run_main(&EdgetreeOptions::new(InputOptions::new().with_text("{}"))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidShape);
}

#[test]
fn directory_input_reports_skipped_files() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("a.json"), r#"[{"id": "root", "edges": [{"targetid": "leaf"}]}]"#).unwrap();
    fs::write(dir.path().join("b.json"), r#"[{"id": "leaf"}]"#).unwrap();
    fs::write(dir.path().join("c.json"), "not json").unwrap();

    let opts = EdgetreeOptions::new(InputOptions::new().with_dirs([dir.path().display().to_string()]));
    let output = run_main(&opts).expect("dir run");

    let value: Value = serde_json::from_str(&output.rendered).unwrap();
    assert_eq!(value["id"], json!("root"));
    assert_eq!(value["children"][0]["id"], json!("leaf"));

    let message = output.warning_message().expect("one warning");
    assert!(message.contains("c.json' is not valid JSON"), "{message}");
}

#[test]
fn no_input_is_rejected() {
    let err = run_main(&EdgetreeOptions::new(InputOptions::new())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn show_all_lists_every_root_string_attribute() {
    let (_dir, file) = write_fixture("services.json", services_fixture());

    let mut opts = file_options(file).with_format(OutputFormat::Tree);
    opts.show_all = true;
    let output = run_main(&opts).expect("tree run");

    assert!(
        output
            .rendered
            .starts_with("(gateway [children: 2] id: gw name: gateway type: edge\n"),
        "{}",
        output.rendered
    );
    assert!(output.rendered.contains("(postgres [children: 0] id: db name: postgres type: storage)"));
}

#[test]
fn max_depth_cuts_text_views() {
    let (_dir, file) = write_fixture("services.json", services_fixture());

    let mut opts = file_options(file).with_format(OutputFormat::Compact);
    opts.max_depth = Some(1);
    let output = run_main(&opts).expect("compact run");

    assert_eq!(
        output.rendered,
        "(gateway [children: 2] (auth [children: 2] (...)) (postgres [children: 0]))"
    );
}

#[test]
fn rankdir_flag_reaches_dot_output() {
    let (_dir, file) = write_fixture("services.json", services_fixture());

    let render = RenderOptions::new()
        .with_format(OutputFormat::Dot)
        .with_rankdir("LR");
    let opts = EdgetreeOptions::resolve(
        InputOptions::new().with_files([file]),
        render,
        ProcessingOptions::new(),
        None,
    )
    .expect("resolve");
    let output = run_main(&opts).expect("dot run");

    assert!(output.rendered.contains("rankdir=\"LR\";"), "{}", output.rendered);
}

#[test]
fn repeated_file_is_loaded_twice() {
    let (_dir, file) = write_fixture("one.json", r#"[{"id": "solo"}]"#);

    let opts = EdgetreeOptions::new(InputOptions::new().with_files([file.clone(), file]));
    let output = run_main(&opts).expect("json run");

    let value: Value = serde_json::from_str(&output.rendered).unwrap();
    assert_eq!(
        value,
        json!([{"id": "solo", "children": []}, {"id": "solo", "children": []}])
    );
}

#[test]
fn long_chain_renders_as_minified_json() {
    let records: Vec<Value> = (0..100_000)
        .map(|i| json!({"id": i, "edges": [{"targetid": i + 1}]}))
        .collect();
    let text = Value::Array(records).to_string();

    let mut opts = EdgetreeOptions::new(InputOptions::new().with_text(text));
    opts.minify = true;
    let output = run_main(&opts).expect("json run");

    assert!(!output.rendered.contains('\n'));
    assert!(output.rendered.starts_with(r#"{"id":0,"edges":[{"targetid":1}],"children":[{"id":1,"#));
    assert_eq!(output.rendered.matches(r#""children":["#).count(), 100_001);
    assert!(output.rendered.ends_with(&"]}".repeat(100_001)));
}

#[test]
fn failures_map_to_exit_codes() {
    let err = run_main(&EdgetreeOptions::new(InputOptions::new().with_text("[]"))).unwrap_err();
    assert_eq!(failure_exit_code(&err), 2);
    assert_eq!(describe_failure(&err), err.message());

    let err = Error::serialization_failed("failed to write JSON output")
        .with_operation("json::write_json");
    assert_eq!(failure_exit_code(&err), 1);
    assert_eq!(
        describe_failure(&err),
        "SerializationFailed at json::write_json => failed to write JSON output"
    );

    let err = Error::file_not_found("/nonexistent.json");
    assert_eq!(failure_exit_code(&err), 1);
    assert!(describe_failure(&err).starts_with("FileNotFound"));
}
