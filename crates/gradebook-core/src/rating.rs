//! Student-to-teacher ratings.

use crate::error::{RecordsError, Result};
use crate::input::check_rating;
use crate::model::{mean, StudentId, TeacherId};
use crate::store::Store;

/// Public profile of a teacher.
#[derive(Debug, Clone, PartialEq)]
pub struct TeacherInfo {
    pub id: TeacherId,
    pub name: String,
    pub login: String,
    pub overall_rating: f64,
    /// Names of subjects taught, in creation order.
    pub subjects: Vec<String>,
}

impl Store {
    /// Record `student`'s rating of a teacher and return the teacher's new overall rating.
    ///
    /// A repeated rating from the same student replaces the earlier one.
    pub fn rate_teacher(&mut self, student: StudentId, teacher: TeacherId, rating: i32) -> Result<f64> {
        if !self.students.contains_key(&student) {
            return Err(RecordsError::not_found("student", student));
        }
        if !self.teachers.contains_key(&teacher) {
            return Err(RecordsError::not_found("teacher", teacher));
        }
        if self.options.enforce_ranges {
            check_rating(rating)?;
        }

        if let Some(s) = self.students.get_mut(&student) {
            s.ratings_given.insert(teacher, rating);
        }
        let Some(t) = self.teachers.get_mut(&teacher) else {
            return Err(RecordsError::not_found("teacher", teacher));
        };
        t.ratings.insert(student, rating);
        t.overall_rating = mean(t.ratings.values());

        tracing::debug!(%student, %teacher, rating, overall = t.overall_rating, "rated teacher");
        Ok(t.overall_rating)
    }

    pub fn teacher_rating(&self, teacher: TeacherId) -> Result<f64> {
        self.teacher(teacher)
            .map(|t| t.overall_rating)
            .ok_or_else(|| RecordsError::not_found("teacher", teacher))
    }

    pub fn teacher_info(&self, teacher: TeacherId) -> Result<TeacherInfo> {
        let t = self
            .teacher(teacher)
            .ok_or_else(|| RecordsError::not_found("teacher", teacher))?;
        Ok(TeacherInfo {
            id: t.id,
            name: t.name.clone(),
            login: t.login.clone(),
            overall_rating: t.overall_rating,
            subjects: t
                .subjects
                .iter()
                .filter_map(|id| self.subject(*id))
                .map(|s| s.name.clone())
                .collect(),
        })
    }
}
