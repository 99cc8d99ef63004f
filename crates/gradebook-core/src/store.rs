//! The entity store.
//!
//! Owns every teacher, student and subject record together with the lookup
//! indices. Inserts update every index in one call, so no partially indexed
//! record is ever observable.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{RecordsError, Result};
use crate::model::{AccountId, Role, Student, StudentId, Subject, SubjectId, Teacher, TeacherId};

/// First value of the identifier sequence.
pub const DEFAULT_FIRST_ID: u64 = 1000;

/// Construction options for a [`Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// First identifier handed out by an empty store.
    pub first_id: u64,
    /// Reject grades outside 0–100 and ratings outside 1–5.
    pub enforce_ranges: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            first_id: DEFAULT_FIRST_ID,
            enforce_ranges: true,
        }
    }
}

/// Summary row for account listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub login: String,
    pub name: String,
}

impl AccountSummary {
    pub fn role(&self) -> Role {
        self.id.role()
    }
}

/// In-memory record store, constructed once and passed to every operation.
#[derive(Debug, Clone)]
pub struct Store {
    pub(crate) options: StoreOptions,
    next_id: u64,
    pub(crate) teachers: BTreeMap<TeacherId, Teacher>,
    pub(crate) students: BTreeMap<StudentId, Student>,
    pub(crate) subjects: BTreeMap<SubjectId, Subject>,
    logins: HashMap<String, AccountId>,
    subject_names: HashMap<String, SubjectId>,
    /// Display name index; duplicates allowed, never used for uniqueness.
    display_names: HashMap<String, Vec<AccountId>>,
    /// Account kinds whose backing file failed to load.
    pub(crate) load_failures: HashSet<Role>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            options,
            next_id: options.first_id,
            teachers: BTreeMap::new(),
            students: BTreeMap::new(),
            subjects: BTreeMap::new(),
            logins: HashMap::new(),
            subject_names: HashMap::new(),
            display_names: HashMap::new(),
            load_failures: HashSet::new(),
        }
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// The identifier the next created record will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Hand out the next identifier. `u64::MAX` is the ceiling and is never
    /// handed out.
    pub(crate) fn allocate_id(&mut self) -> Result<u64> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(RecordsError::IdsExhausted)?;
        Ok(id)
    }

    /// Advance the sequence past an identifier that came from outside.
    ///
    /// At the ceiling the sequence stays put and the next allocation fails.
    pub(crate) fn observe_id(&mut self, id: u64) {
        self.next_id = self.next_id.max(id.saturating_add(1));
    }

    /// Whether any record of any kind holds this identifier.
    pub fn id_in_use(&self, id: u64) -> bool {
        self.teachers.contains_key(&TeacherId(id))
            || self.students.contains_key(&StudentId(id))
            || self.subjects.contains_key(&SubjectId(id))
    }

    /// Whether the account file for `role` failed to load into this store.
    pub fn load_failed(&self, role: Role) -> bool {
        self.load_failures.contains(&role)
    }

    pub fn login_taken(&self, login: &str) -> bool {
        self.logins.contains_key(login)
    }

    pub fn account_by_login(&self, login: &str) -> Option<AccountId> {
        self.logins.get(login).copied()
    }

    pub(crate) fn insert_teacher(&mut self, teacher: Teacher) {
        let id = AccountId::Teacher(teacher.id);
        self.logins.insert(teacher.login.clone(), id);
        self.display_names
            .entry(teacher.name.clone())
            .or_default()
            .push(id);
        self.teachers.insert(teacher.id, teacher);
    }

    pub(crate) fn insert_student(&mut self, student: Student) {
        let id = AccountId::Student(student.id);
        self.logins.insert(student.login.clone(), id);
        self.display_names
            .entry(student.name.clone())
            .or_default()
            .push(id);
        self.students.insert(student.id, student);
    }

    pub(crate) fn insert_subject(&mut self, subject: Subject) {
        self.subject_names.insert(subject.name.clone(), subject.id);
        if let Some(teacher) = self.teachers.get_mut(&subject.teacher) {
            teacher.subjects.push(subject.id);
        }
        self.subjects.insert(subject.id, subject);
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.get(&id)
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.get(&id)
    }

    pub fn subject_by_name(&self, name: &str) -> Option<&Subject> {
        self.subject_names
            .get(name)
            .and_then(|id| self.subjects.get(id))
    }

    pub fn teacher_by_login(&self, login: &str) -> Option<&Teacher> {
        match self.logins.get(login)? {
            AccountId::Teacher(id) => self.teachers.get(id),
            AccountId::Student(_) => None,
        }
    }

    pub fn student_by_login(&self, login: &str) -> Option<&Student> {
        match self.logins.get(login)? {
            AccountId::Student(id) => self.students.get(id),
            AccountId::Teacher(_) => None,
        }
    }

    /// Teachers ordered by identifier.
    pub fn teachers(&self) -> impl Iterator<Item = &Teacher> {
        self.teachers.values()
    }

    /// Students ordered by identifier.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// Subjects ordered by identifier.
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }

    pub fn account_count(&self) -> usize {
        self.logins.len()
    }

    /// Every account, ordered by identifier.
    pub fn accounts(&self) -> Vec<AccountSummary> {
        let mut rows: Vec<AccountSummary> = self
            .teachers
            .values()
            .map(|t| AccountSummary {
                id: AccountId::Teacher(t.id),
                login: t.login.clone(),
                name: t.name.clone(),
            })
            .chain(self.students.values().map(|s| AccountSummary {
                id: AccountId::Student(s.id),
                login: s.login.clone(),
                name: s.name.clone(),
            }))
            .collect();
        rows.sort_by_key(|row| row.id.raw());
        rows
    }

    /// Accounts sharing a display name, in registration order.
    pub fn accounts_named(&self, name: &str) -> &[AccountId] {
        self.display_names
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
