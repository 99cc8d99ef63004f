//! Flat-file persistence of accounts.
//!
//! Each account kind lives in its own file, one `id,login,password,name`
//! record per line. Fields are not escaped; registration rejects values that
//! would break the format. Subjects, grades and ratings are never written.
//!
//! The files load independently. While either one has failed to load, the
//! store refuses to save, so the durable copy stays authoritative.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::GradebookConfig;
use crate::error::{RecordsError, Result};
use crate::model::{Role, Student, StudentId, Teacher, TeacherId};
use crate::store::Store;

/// Account kinds in load and save order.
const ROLES: [Role; 2] = [Role::Teacher, Role::Student];

/// One persisted account line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub id: u64,
    pub login: String,
    pub password: String,
    pub name: String,
}

impl AccountRecord {
    /// Parse a single line. Returns `None` for anything that is not exactly
    /// four fields with a numeric id.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').collect();
        let [id, login, password, name] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            id: id.trim().parse().ok()?,
            login: login.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        })
    }

    pub fn to_line(&self) -> String {
        format!("{},{},{},{}", self.id, self.login, self.password, self.name)
    }
}

/// Every persisted account, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub teachers: Vec<AccountRecord>,
    pub students: Vec<AccountRecord>,
    /// Lines dropped while parsing.
    pub skipped_lines: usize,
}

impl AccountSnapshot {
    pub fn records(&self, role: Role) -> &[AccountRecord] {
        match role {
            Role::Teacher => &self.teachers,
            Role::Student => &self.students,
        }
    }

    fn records_mut(&mut self, role: Role) -> &mut Vec<AccountRecord> {
        match role {
            Role::Teacher => &mut self.teachers,
            Role::Student => &mut self.students,
        }
    }
}

/// The parsed content of one account file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFile {
    pub records: Vec<AccountRecord>,
    pub skipped_lines: usize,
}

/// Outcome of applying a snapshot to a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub teachers: usize,
    pub students: usize,
    /// Malformed lines plus records rejected for a taken id or login name.
    pub skipped: usize,
}

/// Backing store for account records, one collection per account kind.
pub trait AccountGateway {
    fn load(&self, role: Role) -> Result<AccountFile>;

    /// Replace every stored record of `role` with `records`.
    fn save(&self, role: Role, records: &[AccountRecord]) -> Result<()>;
}

/// Two comma-separated text files, one per account kind.
#[derive(Debug, Clone)]
pub struct FlatFileGateway {
    teachers_path: PathBuf,
    students_path: PathBuf,
}

impl FlatFileGateway {
    pub fn new(teachers_path: impl Into<PathBuf>, students_path: impl Into<PathBuf>) -> Self {
        Self {
            teachers_path: teachers_path.into(),
            students_path: students_path.into(),
        }
    }

    pub fn from_config(config: &GradebookConfig) -> Self {
        Self::new(config.teachers_path(), config.students_path())
    }

    pub fn teachers_path(&self) -> &Path {
        &self.teachers_path
    }

    pub fn students_path(&self) -> &Path {
        &self.students_path
    }

    pub fn path(&self, role: Role) -> &Path {
        match role {
            Role::Teacher => &self.teachers_path,
            Role::Student => &self.students_path,
        }
    }

    /// Create parent directories and empty files where missing.
    ///
    /// Returns the paths that were created.
    pub fn ensure_files(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for path in [&self.teachers_path, &self.students_path] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| RecordsError::persistence(parent, e))?;
            }
            if !path.exists() {
                fs::write(path, "").map_err(|e| RecordsError::persistence(path, e))?;
                created.push(path.clone());
            }
        }
        Ok(created)
    }
}

fn read_records(path: &Path) -> Result<AccountFile> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no account file, starting empty");
            return Ok(AccountFile::default());
        }
        Err(e) => return Err(RecordsError::persistence(path, e)),
    };
    let (records, skipped_lines) = parse_records(&content, path);
    Ok(AccountFile {
        records,
        skipped_lines,
    })
}

/// Parse file content, skipping malformed lines.
pub fn parse_records(content: &str, source: &Path) -> (Vec<AccountRecord>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0;
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match AccountRecord::parse_line(line) {
            Some(record) => records.push(record),
            None => {
                skipped += 1;
                tracing::warn!(
                    path = %source.display(),
                    line = lineno + 1,
                    "skipping malformed account line"
                );
            }
        }
    }
    (records, skipped)
}

/// Write to a temporary file beside `path`, then rename it into place.
fn write_records(path: &Path, records: &[AccountRecord]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let fail = |e| RecordsError::persistence(path, e);

    let mut file = NamedTempFile::new_in(dir).map_err(fail)?;
    for record in records {
        writeln!(file, "{}", record.to_line()).map_err(fail)?;
    }
    file.as_file().sync_all().map_err(fail)?;
    file.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}

impl AccountGateway for FlatFileGateway {
    fn load(&self, role: Role) -> Result<AccountFile> {
        read_records(self.path(role))
    }

    fn save(&self, role: Role, records: &[AccountRecord]) -> Result<()> {
        write_records(self.path(role), records)
    }
}

impl Store {
    /// Account records for every teacher and student, ordered by id.
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            teachers: self
                .teachers
                .values()
                .map(|t| AccountRecord {
                    id: t.id.0,
                    login: t.login.clone(),
                    password: t.password.clone(),
                    name: t.name.clone(),
                })
                .collect(),
            students: self
                .students
                .values()
                .map(|s| AccountRecord {
                    id: s.id.0,
                    login: s.login.clone(),
                    password: s.password.clone(),
                    name: s.name.clone(),
                })
                .collect(),
            skipped_lines: 0,
        }
    }

    /// Insert persisted accounts, teachers first.
    ///
    /// Records whose id or login name is already taken are skipped, so the
    /// store invariants hold even for hand-edited files.
    pub fn restore(&mut self, snapshot: &AccountSnapshot) -> LoadReport {
        let mut report = LoadReport {
            skipped: snapshot.skipped_lines,
            ..LoadReport::default()
        };

        for record in &snapshot.teachers {
            if self.accepts(record, "teacher") {
                self.insert_teacher(Teacher::new(
                    TeacherId(record.id),
                    &record.login,
                    &record.password,
                    &record.name,
                ));
                self.observe_id(record.id);
                report.teachers += 1;
            } else {
                report.skipped += 1;
            }
        }
        for record in &snapshot.students {
            if self.accepts(record, "student") {
                self.insert_student(Student::new(
                    StudentId(record.id),
                    &record.login,
                    &record.password,
                    &record.name,
                ));
                self.observe_id(record.id);
                report.students += 1;
            } else {
                report.skipped += 1;
            }
        }
        report
    }

    fn accepts(&self, record: &AccountRecord, kind: &str) -> bool {
        if self.id_in_use(record.id) {
            tracing::warn!(id = record.id, kind, "skipping account with duplicate id");
            return false;
        }
        if self.login_taken(&record.login) {
            tracing::warn!(login = %record.login, kind, "skipping account with duplicate login name");
            return false;
        }
        true
    }

    /// Load accounts from `gateway` into this store, one kind at a time.
    ///
    /// A kind that fails to load is remembered and blocks [`Store::save_to`]
    /// until a later load of it succeeds. The kinds that did load are kept,
    /// and the first failure is returned.
    pub fn load_from(&mut self, gateway: &dyn AccountGateway) -> Result<LoadReport> {
        let mut snapshot = AccountSnapshot::default();
        let mut failure = None;
        for role in ROLES {
            match gateway.load(role) {
                Ok(file) => {
                    self.load_failures.remove(&role);
                    snapshot.skipped_lines += file.skipped_lines;
                    *snapshot.records_mut(role) = file.records;
                }
                Err(e) => {
                    tracing::warn!(%role, error = %e, "failed to load accounts");
                    self.load_failures.insert(role);
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        let report = self.restore(&snapshot);
        tracing::info!(
            teachers = report.teachers,
            students = report.students,
            skipped = report.skipped,
            "loaded accounts"
        );
        match failure {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Overwrite `gateway` with the current accounts.
    ///
    /// Refused while any account file has failed to load: ids of the
    /// unloaded records are unknown, so writing either file could clash
    /// with them.
    pub fn save_to(&self, gateway: &dyn AccountGateway) -> Result<()> {
        if let Some(role) = ROLES.into_iter().find(|role| self.load_failed(*role)) {
            tracing::warn!(%role, "not saving over accounts that failed to load");
            return Err(RecordsError::SaveRefused(role));
        }

        let snapshot = self.snapshot();
        for role in ROLES {
            gateway
                .save(role, snapshot.records(role))
                .inspect_err(|e| tracing::warn!(%role, error = %e, "failed to save accounts"))?;
        }
        tracing::info!(
            teachers = snapshot.teachers.len(),
            students = snapshot.students.len(),
            "saved accounts"
        );
        Ok(())
    }
}
