use assert_cmd::Command;
use tempfile::TempDir;

fn stype(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stype").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"));
    cmd
}

#[test]
fn list_texts_prints_bundled_passages() {
    let home = TempDir::new().unwrap();
    let output = stype(&home).arg("--list-texts").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("default"));
    assert!(stdout.contains("pangrams"));
}

#[test]
fn refuses_to_run_without_tty() {
    let home = TempDir::new().unwrap();
    let output = stype(&home)
        .args(["-p", "hi"])
        .write_stdin("")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("stdin must be a tty"));
}

#[test]
fn blank_prompt_is_rejected() {
    let home = TempDir::new().unwrap();
    let output = stype(&home)
        .args(["-p", "   "])
        .write_stdin("")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("EmptyText"));
}

#[test]
fn unknown_bundled_text_is_rejected() {
    let home = TempDir::new().unwrap();
    let output = stype(&home)
        .args(["-t", "no-such-passage"])
        .write_stdin("")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no-such-passage"));
}

// ProjectDirs only follows XDG_CONFIG_HOME on Linux
#[cfg(target_os = "linux")]
#[test]
fn save_config_writes_file() {
    let home = TempDir::new().unwrap();
    let _ = stype(&home)
        .args(["-t", "pangrams", "-r", "3", "--save-config"])
        .write_stdin("")
        .output()
        .unwrap();

    let path = home.path().join("config").join("stype").join("config.json");
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.contains("pangrams"));
    assert!(contents.contains("\"reset_delay_secs\": 3"));
}
