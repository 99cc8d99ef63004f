//! Account registration and login.
//!
//! Passwords are compared as opaque text. Login names are unique across
//! teachers and students, matched case-sensitively.

use crate::error::{RecordsError, Result};
use crate::input::check_record_field;
use crate::model::{AccountId, Role, Student, StudentId, Teacher, TeacherId};
use crate::store::Store;

fn check_registration(store: &Store, login: &str, password: &str, name: &str) -> Result<()> {
    if store.login_taken(login) {
        return Err(RecordsError::NameTaken(login.to_string()));
    }
    if login.is_empty() {
        return Err(RecordsError::InvalidInput("login name may not be empty".into()));
    }
    if name.is_empty() {
        return Err(RecordsError::InvalidInput("display name may not be empty".into()));
    }
    check_record_field("login name", login)?;
    check_record_field("password", password)?;
    check_record_field("display name", name)?;
    Ok(())
}

impl Store {
    /// Register a new teacher account and return its identifier.
    pub fn register_teacher(&mut self, login: &str, password: &str, name: &str) -> Result<TeacherId> {
        check_registration(self, login, password, name)?;
        let id = TeacherId(self.allocate_id()?);
        self.insert_teacher(Teacher::new(id, login, password, name));
        tracing::info!(%id, login, "registered teacher");
        Ok(id)
    }

    /// Register a new student account and return its identifier.
    pub fn register_student(&mut self, login: &str, password: &str, name: &str) -> Result<StudentId> {
        check_registration(self, login, password, name)?;
        let id = StudentId(self.allocate_id()?);
        self.insert_student(Student::new(id, login, password, name));
        tracing::info!(%id, login, "registered student");
        Ok(id)
    }

    /// Verify credentials for an account of the given role.
    pub fn login(&self, login: &str, password: &str, role: Role) -> Result<AccountId> {
        let not_found = || RecordsError::not_found(role_kind(role), login);
        let (account, stored) = match self.account_by_login(login).ok_or_else(not_found)? {
            AccountId::Teacher(id) if role == Role::Teacher => {
                let teacher = self.teacher(id).ok_or_else(not_found)?;
                (AccountId::Teacher(id), teacher.password.as_str())
            }
            AccountId::Student(id) if role == Role::Student => {
                let student = self.student(id).ok_or_else(not_found)?;
                (AccountId::Student(id), student.password.as_str())
            }
            _ => return Err(not_found()),
        };

        if stored != password {
            tracing::debug!(login, %role, "login rejected");
            return Err(RecordsError::InvalidCredential(login.to_string()));
        }
        Ok(account)
    }

    pub fn login_teacher(&self, login: &str, password: &str) -> Result<TeacherId> {
        match self.login(login, password, Role::Teacher)? {
            AccountId::Teacher(id) => Ok(id),
            AccountId::Student(_) => Err(RecordsError::not_found("teacher", login)),
        }
    }

    pub fn login_student(&self, login: &str, password: &str) -> Result<StudentId> {
        match self.login(login, password, Role::Student)? {
            AccountId::Student(id) => Ok(id),
            AccountId::Teacher(_) => Err(RecordsError::not_found("student", login)),
        }
    }
}

fn role_kind(role: Role) -> &'static str {
    match role {
        Role::Teacher => "teacher",
        Role::Student => "student",
    }
}
