use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!("safe-mkdir-cli-test-{ts}"));
    dir
}

fn run<I, S>(root: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_with_config(root, &root.join("missing-config.toml"), args)
}

fn run_with_config<I, S>(root: &Path, config: &Path, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_safe-recursive-mkdir"))
        .args(args)
        .env("SAFE_RECURSIVE_MKDIR_CONFIG", config)
        .env("SAFE_RECURSIVE_MKDIR_LOG_DIR", root.join("logs"))
        .env("SAFE_RECURSIVE_MKDIR_LOGGER", "file")
        .output()
        .unwrap()
}

#[test]
fn creates_every_directory_and_exits_zero() {
    let root = unique_temp_dir();
    let first = root.join("one").join("two");
    let second = root.join("three");

    let output = run(&root, [&first, &second, &first]);

    assert!(output.status.success(), "{:?}", output);
    assert!(first.is_dir());
    assert!(second.is_dir());

    let log = fs::read_to_string(root.join("logs").join("debug.log")).unwrap();
    assert!(log.contains("Start of execution block."));
    assert!(log.contains("End of execution block."));
    assert!(log.contains("\"process\":\"safe-recursive-mkdir\""));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn reports_failed_index_and_keeps_going() {
    let root = unique_temp_dir();
    fs::create_dir_all(&root).unwrap();
    let blocker = root.join("blocker");
    fs::write(&blocker, "").unwrap();

    let a = root.join("a");
    let b = blocker.join("b-invalid");
    let c = root.join("c");

    let output = run(&root, [&a, &b, &c]);

    assert!(!output.status.success());
    #[cfg(unix)]
    assert_eq!(output.status.code(), Some(248));
    assert!(a.is_dir());
    assert!(c.is_dir());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("index 1:"), "{}", stderr);
    assert!(stderr.contains(&*b.to_string_lossy()), "{}", stderr);

    let log = fs::read_to_string(root.join("logs").join("debug.log")).unwrap();
    assert!(log.contains("\"level\":\"error\""));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn broken_config_file_does_not_stop_the_run() {
    let root = unique_temp_dir();
    fs::create_dir_all(&root).unwrap();
    let config = root.join("config.toml");
    fs::write(&config, "level = [not toml\n").unwrap();
    let target = root.join("made").join("anyway");

    let output = run_with_config(&root, &config, [&target]);

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    assert!(target.is_dir());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ignoring config file"), "{}", stderr);

    let _ = fs::remove_dir_all(&root);
}
