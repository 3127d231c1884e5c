use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEMP_DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let seq = TEMP_DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "integrand-cli-{prefix}-{}-{unique}-{seq}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Runs inside `dir` so a stray `integrand.toml` elsewhere never leaks in.
fn run_integrand_in<I, S>(dir: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_integrand");
    Command::new(bin)
        .current_dir(dir)
        .args(args)
        .output()
        .expect("integrand command should execute")
}

fn run_integrand<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let tmp = TempDirGuard::new("run");
    run_integrand_in(tmp.path(), args)
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn show_json_lists_every_stage() {
    let output = run_integrand(["show", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["action"], "show");

    let stages = payload["stages"].as_array().expect("stages array");
    let counts: Vec<usize> = stages
        .iter()
        .map(|s| s["specs"].as_array().expect("specs array").len())
        .collect();
    assert_eq!(counts, vec![1, 5, 3, 2, 3, 6, 1]);
    assert_eq!(stages[0]["specs"][0]["shape"], "spartan");
    assert_eq!(stages[6]["specs"][0]["name"], "HammingWeightClaimReduction");
    assert_eq!(stages[6]["specs"][0]["degree"]["status"], "consistent");
}

#[test]
fn show_filters_by_stage() {
    let output = run_integrand(["show", "--stage", "7"]);
    assert_success(&output);
    let text = stdout_text(&output);
    assert!(text.starts_with("integrand show\n"));
    assert!(text.contains("Stage 7: Hamming Weight Claim Reduction"));
    assert!(text.contains("HammingWeightClaimReduction [sumcheck]"));
    assert!(!text.contains("Stage 1:"));
}

#[test]
fn show_groups_additive_constraint_factors() {
    let output = run_integrand(["show", "--stage", "1"]);
    assert_success(&output);
    let text = stdout_text(&output);
    assert!(text.contains(
        "[RamAddrZeroIfNotLoadStore] (1 - vp:OpFlags(Load)(X_t) - vp:OpFlags(Store)(X_t)) · vp:RamAddress(X_t)"
    ));
    assert!(text.contains(
        "[RamReadEqRamWriteIfLoad] vp:OpFlags(Load)(X_t) · (vp:RamReadValue(X_t) - vp:RamWriteValue(X_t))"
    ));
}

#[test]
fn show_rejects_unknown_stage() {
    let output = run_integrand(["show", "--stage", "9"]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("error: no stage matches"));
}

#[test]
fn resolve_json_is_deterministic() {
    let first = parse_json_stdout(&run_integrand(["resolve", "--json"]));
    let second = parse_json_stdout(&run_integrand(["resolve", "--json"]));
    let report_id = first["reportId"].as_str().expect("reportId string");
    assert!(report_id.starts_with("r1_"));
    assert_eq!(first["reportId"], second["reportId"]);
    assert_eq!(first["kindMismatches"], 2);
    assert!(!first["log"].as_array().expect("log array").is_empty());
    assert_eq!(first["steps"].as_array().expect("steps array").len(), 21);
}

#[test]
fn resolve_strict_follows_soundness() {
    let payload = parse_json_stdout(&run_integrand(["resolve", "--json"]));
    let sound = payload["sound"].as_bool().expect("sound flag");
    let unresolved = payload["unresolved"].as_array().expect("unresolved array");
    assert_eq!(sound, unresolved.is_empty());

    let strict = run_integrand(["resolve", "--strict"]);
    assert_eq!(strict.status.success(), sound);
    if !sound {
        assert!(stderr_text(&strict).contains("left unresolved"));
    }
}

#[test]
fn degree_check_reports_two_mismatches() {
    let output = run_integrand(["degree-check", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(payload["checked"], 19);
    assert_eq!(payload["mismatches"], 2);

    let mismatched: Vec<&str> = payload["checks"]
        .as_array()
        .expect("checks array")
        .iter()
        .filter(|c| c["status"] == "mismatch")
        .map(|c| c["spec"].as_str().expect("spec name"))
        .collect();
    assert_eq!(mismatched, vec!["RamOutputCheck", "InstructionInput"]);

    let strict = run_integrand(["degree-check", "--strict"]);
    assert_failure(&strict);
    assert!(stdout_text(&strict).contains("MISMATCH"));
}

#[test]
fn latex_writes_standalone_document() {
    let tmp = TempDirGuard::new("latex");
    let out = tmp.path().join("docs").join("specs.tex");
    let output = run_integrand_in(
        tmp.path(),
        [
            OsStr::new("latex"),
            OsStr::new("--stage"),
            OsStr::new("6"),
            OsStr::new("--out"),
            out.as_os_str(),
        ],
    );
    assert_success(&output);
    assert!(stdout_text(&output).contains("Stages: 1"));

    let doc = fs::read_to_string(&out).expect("latex output should exist");
    assert!(doc.starts_with("\\documentclass"));
    assert!(doc.contains("\\title{Sumcheck Specifications}"));
    assert!(doc.contains("\\subsection*{BytecodeReadRaf}"));
    assert!(doc.contains("\\textcolor{ForestGreen}"));
    assert!(!doc.contains("Stage 7"));
}

#[test]
fn config_in_working_dir_sets_latex_defaults() {
    let tmp = TempDirGuard::new("config");
    fs::write(
        tmp.path().join("integrand.toml"),
        "[latex]\ntitle = \"Jolt Stages\"\nderived_color = \"Plum\"\nout = \"custom.tex\"\n",
    )
    .expect("config should be written");

    let output = run_integrand_in(tmp.path(), ["latex", "--stage", "7"]);
    assert_success(&output);
    let doc = fs::read_to_string(tmp.path().join("custom.tex")).expect("custom.tex should exist");
    assert!(doc.contains("\\title{Jolt Stages}"));
    assert!(doc.contains("\\textcolor{Plum}"));
}

#[test]
fn config_strict_degree_check_fails() {
    let tmp = TempDirGuard::new("strict");
    let config = tmp.path().join("strict.toml");
    fs::write(&config, "[degree]\nstrict = true\n").expect("config should be written");

    let output = run_integrand_in(
        tmp.path(),
        [
            OsStr::new("degree-check"),
            OsStr::new("--config"),
            config.as_os_str(),
        ],
    );
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn invalid_config_exits_with_error() {
    let tmp = TempDirGuard::new("bad-config");
    let config = tmp.path().join("bad.toml");
    fs::write(&config, "[latex\ntitle = 3\n").expect("config should be written");

    let output = run_integrand_in(
        tmp.path(),
        [OsStr::new("show"), OsStr::new("--config"), config.as_os_str()],
    );
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_text(&output).contains("error: invalid toml at"));

    let missing = run_integrand_in(tmp.path(), ["show", "--config", "nope.toml"]);
    assert_failure(&missing);
    assert!(stderr_text(&missing).contains("error: failed to read nope.toml"));
}

#[test]
fn registry_filters_by_kind() {
    let output = run_integrand(["registry", "--kind", "committed", "--json"]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    let polys = payload["polys"].as_array().expect("polys array");
    assert!(!polys.is_empty());
    assert!(polys.iter().all(|p| p["kind"] == "committed"));
    assert!(payload["params"].as_array().expect("params array").is_empty());

    let aliased = parse_json_stdout(&run_integrand(["registry", "--kind", "vp", "--json"]));
    assert_eq!(aliased["kinds"], serde_json::json!(["derived"]));

    let verifier = parse_json_stdout(&run_integrand(["registry", "--kind", "vr", "--json"]));
    assert_eq!(verifier["kinds"], serde_json::json!(["computable"]));
    let polys = verifier["polys"].as_array().expect("polys array");
    assert!(polys.iter().all(|p| p["kind"] == "computable"));
}

#[test]
fn registry_text_lists_parameters() {
    let output = run_integrand(["registry"]);
    assert_success(&output);
    let text = stdout_text(&output);
    assert!(text.contains("Committed polynomials"));
    assert!(text.contains("Derived polynomials"));
    assert!(text.contains("Parameters (13)"));
}

#[test]
fn registry_rejects_unknown_kind() {
    let output = run_integrand(["registry", "--kind", "public"]);
    assert_failure(&output);
    assert!(stderr_text(&output).contains("error: unknown provenance: public"));
}
