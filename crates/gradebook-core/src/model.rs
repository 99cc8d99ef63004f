//! Core data model types for gradebook.
//!
//! Teachers, students and subjects reference one another by identifier; the
//! [`Store`](crate::store::Store) owns every record and keeps the references
//! and the derived averages consistent.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a teacher account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeacherId(pub u64);

/// Identifier of a student account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(pub u64);

/// Identifier of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId(pub u64);

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two kinds of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Teacher,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "teacher" | "t" => Ok(Role::Teacher),
            "student" | "s" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Handle to either kind of account, as stored in the login index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountId {
    Teacher(TeacherId),
    Student(StudentId),
}

impl AccountId {
    pub fn role(&self) -> Role {
        match self {
            AccountId::Teacher(_) => Role::Teacher,
            AccountId::Student(_) => Role::Student,
        }
    }

    /// The raw value from the shared identifier sequence.
    pub fn raw(&self) -> u64 {
        match self {
            AccountId::Teacher(id) => id.0,
            AccountId::Student(id) => id.0,
        }
    }
}

/// A teacher account.
///
/// Note: Custom Debug impl masks the password to prevent accidental exposure in logs.
#[derive(Clone)]
pub struct Teacher {
    pub(crate) id: TeacherId,
    pub(crate) login: String,
    pub(crate) password: String,
    pub(crate) name: String,
    /// Subjects taught, in creation order.
    pub(crate) subjects: Vec<SubjectId>,
    /// Ratings received, keyed by the rating student.
    pub(crate) ratings: BTreeMap<StudentId, i32>,
    pub(crate) overall_rating: f64,
}

impl Teacher {
    pub(crate) fn new(id: TeacherId, login: &str, password: &str, name: &str) -> Self {
        Self {
            id,
            login: login.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            subjects: Vec::new(),
            ratings: BTreeMap::new(),
            overall_rating: 0.0,
        }
    }

    pub fn id(&self) -> TeacherId {
        self.id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }

    pub fn ratings(&self) -> &BTreeMap<StudentId, i32> {
        &self.ratings
    }

    /// Mean of all received ratings, 0.0 if none.
    pub fn overall_rating(&self) -> f64 {
        self.overall_rating
    }
}

impl fmt::Debug for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teacher")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("password", &"***")
            .field("name", &self.name)
            .field("subjects", &self.subjects)
            .field("ratings", &self.ratings)
            .field("overall_rating", &self.overall_rating)
            .finish()
    }
}

/// A student account.
#[derive(Clone)]
pub struct Student {
    pub(crate) id: StudentId,
    pub(crate) login: String,
    pub(crate) password: String,
    pub(crate) name: String,
    /// Enrolled subjects, in enrollment order.
    pub(crate) subjects: Vec<SubjectId>,
    pub(crate) grades: BTreeMap<SubjectId, i32>,
    /// Ratings given, keyed by the rated teacher.
    pub(crate) ratings_given: BTreeMap<TeacherId, i32>,
}

impl Student {
    pub(crate) fn new(id: StudentId, login: &str, password: &str, name: &str) -> Self {
        Self {
            id,
            login: login.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            subjects: Vec::new(),
            grades: BTreeMap::new(),
            ratings_given: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }

    pub fn grades(&self) -> &BTreeMap<SubjectId, i32> {
        &self.grades
    }

    pub fn ratings_given(&self) -> &BTreeMap<TeacherId, i32> {
        &self.ratings_given
    }
}

impl fmt::Debug for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Student")
            .field("id", &self.id)
            .field("login", &self.login)
            .field("password", &"***")
            .field("name", &self.name)
            .field("subjects", &self.subjects)
            .field("grades", &self.grades)
            .field("ratings_given", &self.ratings_given)
            .finish()
    }
}

/// A subject taught by exactly one teacher.
#[derive(Debug, Clone)]
pub struct Subject {
    pub(crate) id: SubjectId,
    pub(crate) name: String,
    pub(crate) teacher: TeacherId,
    /// Roster, in enrollment order.
    pub(crate) students: Vec<StudentId>,
    pub(crate) grades: BTreeMap<StudentId, i32>,
    pub(crate) class_average: f64,
}

impl Subject {
    pub(crate) fn new(id: SubjectId, name: &str, teacher: TeacherId) -> Self {
        Self {
            id,
            name: name.to_string(),
            teacher,
            students: Vec::new(),
            grades: BTreeMap::new(),
            class_average: 0.0,
        }
    }

    pub fn id(&self) -> SubjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn teacher(&self) -> TeacherId {
        self.teacher
    }

    pub fn students(&self) -> &[StudentId] {
        &self.students
    }

    pub fn grades(&self) -> &BTreeMap<StudentId, i32> {
        &self.grades
    }

    /// Mean of all assigned grades, 0.0 if none.
    pub fn class_average(&self) -> f64 {
        self.class_average
    }

    pub fn is_enrolled(&self, student: StudentId) -> bool {
        self.students.contains(&student)
    }
}

/// Unweighted arithmetic mean, 0.0 for an empty input.
pub(crate) fn mean<'a>(values: impl IntoIterator<Item = &'a i32>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), v| (sum + i64::from(*v), count + 1));
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_and_parse() {
        assert_eq!(Role::Teacher.to_string(), "teacher");
        assert_eq!("Student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!("t".parse::<Role>().unwrap(), Role::Teacher);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&Vec::<i32>::new()), 0.0);
        assert_eq!(mean(&[90, 80]), 85.0);
        assert_eq!(mean(&[1, 2]), 1.5);
    }

    #[test]
    fn debug_masks_password() {
        let t = Teacher::new(TeacherId(1000), "alice", "secret", "Alice A");
        let s = Student::new(StudentId(1001), "bob", "hunter2", "Bob B");
        let out = format!("{t:?} {s:?}");
        assert!(!out.contains("secret"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("***"));
    }

    #[test]
    fn account_id_role_and_raw() {
        let a = AccountId::Student(StudentId(1001));
        assert_eq!(a.role(), Role::Student);
        assert_eq!(a.raw(), 1001);
    }
}
