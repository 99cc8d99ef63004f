//! Subject creation, enrollment, and grading.
//!
//! Grades are written to both the subject's and the student's grade maps, and
//! the class average is recomputed on every write.

use crate::error::{RecordsError, Result};
use crate::input::check_grade;
use crate::model::{mean, StudentId, Subject, SubjectId, TeacherId};
use crate::store::Store;

/// One row of a subject's grade sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeEntry {
    pub student: StudentId,
    pub name: String,
    pub grade: i32,
}

/// A subject's grades, ordered by student identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectGrades {
    pub subject: String,
    pub entries: Vec<GradeEntry>,
    pub class_average: f64,
}

/// An enrolled student, as listed to the teacher before grading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub student: StudentId,
    pub name: String,
}

impl Store {
    /// Create a subject owned by `teacher`.
    pub fn create_subject(&mut self, teacher: TeacherId, name: &str) -> Result<SubjectId> {
        if !self.teachers.contains_key(&teacher) {
            return Err(RecordsError::not_found("teacher", teacher));
        }
        if self.subject_by_name(name).is_some() {
            return Err(RecordsError::DuplicateSubject(name.to_string()));
        }
        if name.is_empty() {
            return Err(RecordsError::InvalidInput("subject name may not be empty".into()));
        }

        let id = SubjectId(self.allocate_id()?);
        self.insert_subject(Subject::new(id, name, teacher));
        tracing::info!(%id, %teacher, subject = name, "created subject");
        Ok(id)
    }

    /// Add `student` to the roster of the named subject.
    pub fn enroll(&mut self, student: StudentId, subject_name: &str) -> Result<SubjectId> {
        if !self.students.contains_key(&student) {
            return Err(RecordsError::not_found("student", student));
        }
        let subject_id = self
            .subject_by_name(subject_name)
            .map(Subject::id)
            .ok_or_else(|| RecordsError::not_found("subject", subject_name))?;

        let subject = self
            .subjects
            .get_mut(&subject_id)
            .ok_or_else(|| RecordsError::not_found("subject", subject_name))?;
        if subject.is_enrolled(student) {
            return Err(RecordsError::AlreadyEnrolled {
                student: student.0,
                subject: subject_name.to_string(),
            });
        }
        subject.students.push(student);
        if let Some(s) = self.students.get_mut(&student) {
            s.subjects.push(subject_id);
        }

        tracing::debug!(%student, subject = subject_name, "enrolled");
        Ok(subject_id)
    }

    /// The named subject, provided `teacher` teaches it.
    fn owned_subject(&self, teacher: TeacherId, subject_name: &str) -> Result<&Subject> {
        self.subject_by_name(subject_name)
            .filter(|s| s.teacher == teacher)
            .ok_or_else(|| RecordsError::NotOwner(subject_name.to_string()))
    }

    /// Record a grade and return the recomputed class average.
    pub fn assign_grade(
        &mut self,
        teacher: TeacherId,
        subject_name: &str,
        student: StudentId,
        grade: i32,
    ) -> Result<f64> {
        let subject_id = self.owned_subject(teacher, subject_name)?.id;
        let enrolled = self.students.contains_key(&student)
            && self
                .subjects
                .get(&subject_id)
                .is_some_and(|s| s.is_enrolled(student));
        if !enrolled {
            return Err(RecordsError::NotEnrolled {
                student: student.0,
                subject: subject_name.to_string(),
            });
        }
        if self.options.enforce_ranges {
            check_grade(grade)?;
        }

        let Some(subject) = self.subjects.get_mut(&subject_id) else {
            return Err(RecordsError::NotOwner(subject_name.to_string()));
        };
        subject.grades.insert(student, grade);
        subject.class_average = mean(subject.grades.values());
        let average = subject.class_average;

        if let Some(s) = self.students.get_mut(&student) {
            s.grades.insert(subject_id, grade);
        }

        tracing::debug!(%student, subject = subject_name, grade, average, "assigned grade");
        Ok(average)
    }

    /// Grades recorded for a subject `teacher` teaches.
    pub fn view_subject_grades(&self, teacher: TeacherId, subject_name: &str) -> Result<SubjectGrades> {
        let subject = self.owned_subject(teacher, subject_name)?;
        let entries = subject
            .grades
            .iter()
            .map(|(&student, &grade)| GradeEntry {
                student,
                name: self
                    .student(student)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                grade,
            })
            .collect();

        Ok(SubjectGrades {
            subject: subject.name.clone(),
            entries,
            class_average: subject.class_average,
        })
    }

    /// Students enrolled in a subject `teacher` teaches, in enrollment order.
    pub fn subject_roster(&self, teacher: TeacherId, subject_name: &str) -> Result<Vec<RosterEntry>> {
        let subject = self.owned_subject(teacher, subject_name)?;
        Ok(subject
            .students
            .iter()
            .filter_map(|id| self.student(*id))
            .map(|s| RosterEntry {
                student: s.id,
                name: s.name.clone(),
            })
            .collect())
    }

    /// Subjects `student` is enrolled in, as (id, name), in enrollment order.
    pub fn student_subjects(&self, student: StudentId) -> Result<Vec<(SubjectId, String)>> {
        let s = self
            .student(student)
            .ok_or_else(|| RecordsError::not_found("student", student))?;
        Ok(s.subjects
            .iter()
            .filter_map(|id| self.subject(*id))
            .map(|subj| (subj.id, subj.name.clone()))
            .collect())
    }

    /// Grades `student` has received, as (subject name, grade), ordered by subject id.
    pub fn student_grades(&self, student: StudentId) -> Result<Vec<(String, i32)>> {
        let s = self
            .student(student)
            .ok_or_else(|| RecordsError::not_found("student", student))?;
        Ok(s.grades
            .iter()
            .filter_map(|(id, &grade)| self.subject(*id).map(|subj| (subj.name.clone(), grade)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreOptions;

    fn classroom() -> (Store, TeacherId, StudentId) {
        let mut store = Store::new();
        let alice = store.register_teacher("alice", "pw1", "Alice A").unwrap();
        let bob = store.register_student("bob", "pw2", "Bob B").unwrap();
        store.create_subject(alice, "Math").unwrap();
        (store, alice, bob)
    }

    #[test]
    fn create_subject_links_teacher() {
        let (store, alice, _) = classroom();
        let math = store.subject_by_name("Math").unwrap();
        assert_eq!(math.id(), SubjectId(1002));
        assert_eq!(math.teacher(), alice);
        assert_eq!(store.teacher(alice).unwrap().subjects(), &[math.id()]);
    }

    #[test]
    fn subject_names_are_unique() {
        let (mut store, alice, _) = classroom();
        let carol = store.register_teacher("carol", "pw", "Carol C").unwrap();
        assert!(matches!(
            store.create_subject(carol, "Math"),
            Err(RecordsError::DuplicateSubject(_))
        ));
        assert!(matches!(
            store.create_subject(alice, "Math"),
            Err(RecordsError::DuplicateSubject(_))
        ));
        assert!(store.teacher(carol).unwrap().subjects().is_empty());
    }

    #[test]
    fn enroll_adds_mutual_references() {
        let (mut store, _, bob) = classroom();
        let math = store.enroll(bob, "Math").unwrap();
        assert!(store.subject(math).unwrap().is_enrolled(bob));
        assert_eq!(store.student(bob).unwrap().subjects(), &[math]);

        assert!(matches!(
            store.enroll(bob, "Math"),
            Err(RecordsError::AlreadyEnrolled { student: 1001, .. })
        ));
        assert!(matches!(
            store.enroll(bob, "History"),
            Err(RecordsError::NotFound { kind: "subject", .. })
        ));
        assert_eq!(store.subject(math).unwrap().students().len(), 1);
    }

    #[test]
    fn assign_grade_updates_both_sides() {
        let (mut store, alice, bob) = classroom();
        let math = store.enroll(bob, "Math").unwrap();

        let avg = store.assign_grade(alice, "Math", bob, 90).unwrap();
        assert_eq!(avg, 90.0);
        assert_eq!(store.subject(math).unwrap().grades().get(&bob), Some(&90));
        assert_eq!(store.student(bob).unwrap().grades().get(&math), Some(&90));

        // Regrading overwrites.
        let avg = store.assign_grade(alice, "Math", bob, 70).unwrap();
        assert_eq!(avg, 70.0);
        assert_eq!(store.subject(math).unwrap().grades().len(), 1);
    }

    #[test]
    fn class_average_over_students() {
        let (mut store, alice, bob) = classroom();
        let dan = store.register_student("dan", "pw3", "Dan D").unwrap();
        store.enroll(bob, "Math").unwrap();
        store.enroll(dan, "Math").unwrap();

        store.assign_grade(alice, "Math", bob, 90).unwrap();
        let avg = store.assign_grade(alice, "Math", dan, 80).unwrap();
        assert_eq!(avg, 85.0);
        assert_eq!(store.subject_by_name("Math").unwrap().class_average(), 85.0);
    }

    #[test]
    fn grading_requires_ownership() {
        let (mut store, _, bob) = classroom();
        let carol = store.register_teacher("carol", "pw", "Carol C").unwrap();
        store.enroll(bob, "Math").unwrap();

        assert!(matches!(
            store.assign_grade(carol, "Math", bob, 50),
            Err(RecordsError::NotOwner(_))
        ));
        assert!(matches!(
            store.assign_grade(carol, "Art", bob, 50),
            Err(RecordsError::NotOwner(_))
        ));
        assert!(matches!(
            store.view_subject_grades(carol, "Math"),
            Err(RecordsError::NotOwner(_))
        ));
    }

    #[test]
    fn grading_unenrolled_student_changes_nothing() {
        let (mut store, alice, bob) = classroom();
        let err = store.assign_grade(alice, "Math", bob, 90).unwrap_err();
        assert!(matches!(err, RecordsError::NotEnrolled { student: 1001, .. }));

        // An id that is not a student at all.
        assert!(matches!(
            store.assign_grade(alice, "Math", StudentId(alice.0), 90),
            Err(RecordsError::NotEnrolled { .. })
        ));

        let math = store.subject_by_name("Math").unwrap();
        assert!(math.grades().is_empty());
        assert_eq!(math.class_average(), 0.0);
        assert!(store.student(bob).unwrap().grades().is_empty());
    }

    #[test]
    fn grade_range_enforced_unless_disabled() {
        let (mut store, alice, bob) = classroom();
        store.enroll(bob, "Math").unwrap();
        assert!(matches!(
            store.assign_grade(alice, "Math", bob, 101),
            Err(RecordsError::InvalidInput(_))
        ));
        assert!(store.student(bob).unwrap().grades().is_empty());

        let mut lenient = Store::with_options(StoreOptions {
            enforce_ranges: false,
            ..StoreOptions::default()
        });
        let t = lenient.register_teacher("t", "p", "T").unwrap();
        let s = lenient.register_student("s", "p", "S").unwrap();
        lenient.create_subject(t, "Math").unwrap();
        lenient.enroll(s, "Math").unwrap();
        assert_eq!(lenient.assign_grade(t, "Math", s, 150).unwrap(), 150.0);
    }

    #[test]
    fn view_grades_orders_by_student_id() {
        let (mut store, alice, bob) = classroom();
        let dan = store.register_student("dan", "pw3", "Dan D").unwrap();
        store.enroll(dan, "Math").unwrap();
        store.enroll(bob, "Math").unwrap();
        store.assign_grade(alice, "Math", dan, 60).unwrap();
        store.assign_grade(alice, "Math", bob, 100).unwrap();

        let sheet = store.view_subject_grades(alice, "Math").unwrap();
        assert_eq!(sheet.subject, "Math");
        assert_eq!(sheet.entries[0].student, bob);
        assert_eq!(sheet.entries[0].name, "Bob B");
        assert_eq!(sheet.entries[1].grade, 60);
        assert_eq!(sheet.class_average, 80.0);

        let roster = store.subject_roster(alice, "Math").unwrap();
        assert_eq!(roster[0].student, dan);
        assert_eq!(roster[1].student, bob);
    }

    #[test]
    fn student_views() {
        let (mut store, alice, bob) = classroom();
        store.create_subject(alice, "Art").unwrap();
        store.enroll(bob, "Art").unwrap();
        store.enroll(bob, "Math").unwrap();
        store.assign_grade(alice, "Math", bob, 88).unwrap();

        let subjects = store.student_subjects(bob).unwrap();
        let names: Vec<&str> = subjects.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, ["Art", "Math"]);
        assert_eq!(store.student_grades(bob).unwrap(), vec![("Math".to_string(), 88)]);
        assert!(store.student_grades(StudentId(9999)).is_err());
    }
}
