use std::process::{Command, Output};

const SIGNATURE_BASE64: &str = "6IzMzMzM2tyfKKFuYUfICA==";
const SIGNATURE_HEX: &str = "e88cccccccccdadc9f28a16e6147c808";
const SIGNATURE_CMR: &str = "b9639080b501fa8271c1f95acc1e263704670994c333cb2059d37c6c234957de";

fn hycomb(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hycomb"))
        .args(args)
        .output()
        .expect("failed to run hycomb")
}

fn info_json(args: &[&str]) -> serde_json::Value {
    let output = hycomb(args);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "hycomb {args:?} failed: {stderr}");
    assert!(stderr.is_empty(), "unexpected stderr: {stderr}");
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn info_reports_the_signature_program() {
    let info = info_json(&["info", SIGNATURE_BASE64]);
    assert_eq!(info["jets"], "elements");
    assert_eq!(info["commit_base64"], SIGNATURE_BASE64);
    assert_eq!(
        info["commit_decode"],
        "comp (pair (pair witness jet_sig_all_hash) witness) jet_bip_0340_verify"
    );
    assert_eq!(info["type_arrow"], "1 → 1");
    assert_eq!(info["cmr"], SIGNATURE_CMR);
    assert_eq!(
        info["liquid_address_unconf"],
        "ex1p8h2n7wd35geereunea9cvqpp4che9p4tlknrfyqtr4p3w8tv78nq2njj5r"
    );
    assert_eq!(
        info["liquid_testnet_address_unconf"],
        "tex1p8h2n7wd35geereunea9cvqpp4che9p4tlknrfyqtr4p3w8tv78nqt2q49v"
    );
    assert_eq!(
        info["elements_regtest_address_unconf"],
        "ert1p8h2n7wd35geereunea9cvqpp4che9p4tlknrfyqtr4p3w8tv78nqa7dsj5"
    );
    assert_eq!(info["is_jet"], false);
    assert_eq!(info["is_redeem"], false);
}

#[test]
fn hex_input_is_accepted() {
    let from_hex = info_json(&["info", SIGNATURE_HEX]);
    let from_base64 = info_json(&["info", SIGNATURE_BASE64]);
    assert_eq!(from_hex, from_base64);
}

#[test]
fn yaml_output() {
    let output = hycomb(&["info", "--yaml", SIGNATURE_BASE64]);
    assert!(output.status.success());
    let info: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).expect("stdout is YAML");
    assert_eq!(info["cmr"].as_str(), Some(SIGNATURE_CMR));
}

#[test]
fn display_budget_truncates_the_expression() {
    let info = info_json(&["info", "--max-display", "2", SIGNATURE_BASE64]);
    let decode = info["commit_decode"].as_str().unwrap();
    assert!(decode.ends_with("..."), "{decode}");
}

#[test]
fn core_jets_reject_the_signature_program() {
    let output = hycomb(&["info", "--jets", "core", SIGNATURE_BASE64]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jet"), "{stderr}");
}

#[test]
fn node_limit_is_applied() {
    let output = hycomb(&["info", "--max-nodes", "3", SIGNATURE_BASE64]);
    assert!(!output.status.success());
}

#[test]
fn garbage_is_rejected() {
    let output = hycomb(&["info", "not a program!"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("neither valid base64 nor valid hex"), "{stderr}");
}

#[test]
fn missing_program_is_a_usage_error() {
    let output = hycomb(&["info"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("<PROGRAM>"), "{stderr}");
}
