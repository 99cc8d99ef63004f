//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gradebook(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("gradebook").unwrap();
    cmd.current_dir(dir.path()).env_remove("GRADEBOOK_DATA_DIR");
    cmd
}

fn register(dir: &TempDir, role: &str, login: &str, password: &str, name: &str) {
    gradebook(dir)
        .args(["register", "--role", role, "--login", login])
        .args(["--password", password, "--name", name])
        .assert()
        .success();
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    gradebook(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradebook.toml"))
        .stdout(predicate::str::contains("Created data/teachers.txt"));

    assert!(dir.path().join("gradebook.toml").exists());
    assert!(dir.path().join("data/students.txt").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    gradebook(&dir).arg("init").assert().success();

    gradebook(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn register_persists_accounts() {
    let dir = TempDir::new().unwrap();
    gradebook(&dir).arg("init").assert().success();

    gradebook(&dir)
        .args(["register", "--role", "teacher", "--login", "alice"])
        .args(["--password", "pw1", "--name", "Alice A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered teacher 'Alice A' with ID 1000."));
    register(&dir, "student", "bob", "pw2", "Bob B");

    let teachers = std::fs::read_to_string(dir.path().join("data/teachers.txt")).unwrap();
    assert_eq!(teachers, "1000,alice,pw1,Alice A\n");
    let students = std::fs::read_to_string(dir.path().join("data/students.txt")).unwrap();
    assert_eq!(students, "1001,bob,pw2,Bob B\n");
}

#[test]
fn register_duplicate_login_fails() {
    let dir = TempDir::new().unwrap();
    register(&dir, "teacher", "alice", "pw1", "Alice A");

    gradebook(&dir)
        .args(["register", "--role", "student", "--login", "alice"])
        .args(["--password", "x", "--name", "Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("login name already taken: alice"));
}

#[test]
fn accounts_lists_without_passwords() {
    let dir = TempDir::new().unwrap();
    register(&dir, "teacher", "alice", "secret-pw", "Alice A");
    register(&dir, "student", "bob", "pw2", "Bob B");

    gradebook(&dir)
        .arg("accounts")
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("Bob B"))
        .stdout(predicate::str::contains("2 account(s)"))
        .stdout(predicate::str::contains("secret-pw").not());

    gradebook(&dir)
        .args(["accounts", "--role", "student"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 account(s)"));
}

#[test]
fn session_runs_reference_scenario() {
    let dir = TempDir::new().unwrap();
    let script = "\
register-teacher alice pw1 Alice A
register-student bob pw2 Bob B
login teacher alice pw1
create-subject Math
login student bob pw2
enroll Math
login teacher alice pw1
grade 1001 90 Math
login student bob pw2
rate 1000 4
quit
";
    std::fs::write(dir.path().join("script.txt"), script).unwrap();

    gradebook(&dir)
        .args(["session", "--script", "script.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Subject 'Math' created with ID 1002."))
        .stdout(predicate::str::contains("Class average: 90.00"))
        .stdout(predicate::str::contains("Overall rating: 4.00"));

    // Accounts survive; subjects and grades do not.
    gradebook(&dir)
        .arg("session")
        .write_stdin("login teacher alice pw1\ngrades Math\nregister-teacher carol pw Carol C\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Alice A!"))
        .stdout(predicate::str::contains("error: you do not teach subject: Math"))
        .stdout(predicate::str::contains("with ID 1002."));
}

#[test]
fn missing_config_file_fails() {
    let dir = TempDir::new().unwrap();
    gradebook(&dir)
        .args(["accounts", "--config", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn config_redirects_data_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("custom.toml"), "data_dir = \"records\"\n").unwrap();

    gradebook(&dir)
        .args(["--config", "custom.toml", "register", "--role", "student"])
        .args(["--login", "bob", "--password", "pw", "--name", "Bob"])
        .assert()
        .success();

    assert!(dir.path().join("records/students.txt").exists());
}

#[test]
fn broken_students_file_leaves_teachers_intact() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("data/students.txt")).unwrap();
    std::fs::write(dir.path().join("data/teachers.txt"), "1000,alice,pw1,Alice A\n").unwrap();

    gradebook(&dir)
        .args(["register", "--role", "teacher", "--login", "carol"])
        .args(["--password", "pw", "--name", "Carol C"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("changes will not be saved"))
        .stderr(predicate::str::contains("not saving: student accounts failed to load"));

    let teachers = std::fs::read_to_string(dir.path().join("data/teachers.txt")).unwrap();
    assert_eq!(teachers, "1000,alice,pw1,Alice A\n");

    gradebook(&dir)
        .arg("accounts")
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"));
}
