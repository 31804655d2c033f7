//! Integration tests that run the CLI binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn bin(data_dir: &Path) -> Command {
    // CARGO_BIN_EXE_<name> uses the binary target name; hyphens require concat! for env!()
    let bin = env!(concat!("CARGO_BIN_EXE_chat", "-", "enhance"));
    let mut cmd = Command::new(bin);
    // Run from the temp dir so dotenv() won't load .env from project root
    cmd.current_dir(data_dir)
        .env("CHAT_ENHANCE_DATA_DIR", data_dir)
        .env("CHAT_ENHANCE_EXPORT_DIR", data_dir.join("exports"))
        .env_remove("CHAT_ENHANCE_FILE_PREFIX")
        .env_remove("CHAT_ENHANCE_EXPORT_TITLE");
    cmd
}

fn run_with_stdin(cmd: &mut Command, stdin: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary not found - run cargo build first");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path()).arg("--help").output().expect("run");
    let stdout = stdout_of(&output);
    assert!(stdout.contains("render"), "expected usage text in output");
    assert!(stdout.contains("EXAMPLES"));
}

#[test]
fn cli_version_succeeds() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path()).arg("--version").output().expect("run");
    assert!(stdout_of(&output).contains("chat-enhance"));
}

#[test]
fn cli_render_reads_stdin() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = run_with_stdin(
        bin(tmp.path()).arg("render"),
        "Here:\n```js\nconst s = \"<b>\";\n```\n",
    );
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("Here:\n<div class=\"code-block\">"));
    assert!(stdout.contains("<span class=\"code-language\">js</span>"));
    assert!(stdout.contains("<span class=\"code-string\">&quot;&lt;b&gt;&quot;</span>"));
}

#[test]
fn cli_copy_print_outputs_original_source() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = run_with_stdin(
        bin(tmp.path()).args(["copy", "--print", "--index", "1"]),
        "```\nfirst\n```\nthen\n```python\nif a < b:\n    pass\n```",
    );
    assert_eq!(stdout_of(&output), "if a < b:\n    pass\n");
}

#[test]
fn cli_copy_missing_block_exits_with_error() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = run_with_stdin(bin(tmp.path()).args(["copy", "--print"]), "no code here");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: No code block #0"), "got: {}", stderr);
}

#[test]
fn cli_theme_toggle_persists() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let show = || stdout_of(&bin(tmp.path()).arg("theme").output().expect("run"));
    assert_eq!(show(), "light\n");
    let toggled = bin(tmp.path()).args(["theme", "toggle"]).output().expect("run");
    assert_eq!(stdout_of(&toggled), "dark\n");
    assert_eq!(show(), "dark\n");
    assert!(tmp.path().join("storage.json").exists());
}

#[test]
fn cli_prefs_set_rejects_invalid_value() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(tmp.path())
        .args(["prefs", "set", "fontSize", "huge"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid value 'huge' for fontSize"), "got: {}", stderr);

    let ok = bin(tmp.path())
        .args(["prefs", "set", "fontSize", "large"])
        .output()
        .expect("run");
    assert_eq!(stdout_of(&ok), "fontSize = \"large\"\n");
}

#[test]
fn cli_export_writes_file_to_export_dir() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let conversation = tmp.path().join("conversation.json");
    std::fs::write(
        &conversation,
        r#"[{"role":"user","content":"hello","timestamp":"10:00:00"}]"#,
    )
    .expect("write conversation");

    let output = bin(tmp.path())
        .args(["export", "--format", "html"])
        .arg(&conversation)
        .output()
        .expect("run");
    let path = stdout_of(&output).trim().to_string();
    assert!(path.ends_with(".html"), "got: {}", path);
    assert!(Path::new(&path).starts_with(tmp.path().join("exports")));
    let html = std::fs::read_to_string(&path).expect("read export");
    assert!(html.contains("<div class=\"content\">hello</div>"));
}
