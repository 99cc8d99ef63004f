//! The `gradebook session` command.
//!
//! Reads one command per line and runs it against the loaded store. Rule
//! violations are printed as `error: ...` and the session carries on.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use gradebook_core::input::{parse_grade, parse_id, parse_rating};
use gradebook_core::persistence::AccountGateway;
use gradebook_core::{AccountId, RecordsError, Role, Store, StudentId, TeacherId};

pub fn execute(config_path: Option<PathBuf>, script: Option<PathBuf>) -> Result<()> {
    let mut opened = super::open(config_path)?;

    let input: Box<dyn BufRead> = match script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("failed to open script: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut session = Session::new(&mut opened.store, &opened.gateway, stdout.lock());
    session.run(input)
}

/// What a command printed, and whether the session should stop.
#[derive(Debug, Default)]
struct Reply {
    lines: Vec<String>,
    quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }

    fn push(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }
}

/// A logged-in (or anonymous) command session.
pub struct Session<'a, W: Write> {
    store: &'a mut Store,
    gateway: &'a dyn AccountGateway,
    out: W,
    current: Option<AccountId>,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(store: &'a mut Store, gateway: &'a dyn AccountGateway, out: W) -> Self {
        Self {
            store,
            gateway,
            out,
            current: None,
        }
    }

    /// Run every line of `input`, then save accounts.
    pub fn run(&mut self, input: impl BufRead) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read session input")?;
            if !self.execute_line(&line)? {
                break;
            }
        }
        self.store.save_to(self.gateway)?;
        Ok(())
    }

    /// Run one line. Returns `false` once the session should end.
    fn execute_line(&mut self, line: &str) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(true);
        }

        match self.dispatch(line) {
            Ok(reply) => {
                for text in &reply.lines {
                    writeln!(self.out, "{text}")?;
                }
                Ok(!reply.quit)
            }
            Err(e) => {
                writeln!(self.out, "error: {e}")?;
                Ok(true)
            }
        }
    }

    fn dispatch(&mut self, line: &str) -> Result<Reply, RecordsError> {
        let mut split = line.split_whitespace();
        let command = split.next().unwrap_or_default();
        let args = Words {
            line,
            args: split.collect(),
        };

        match command {
            "register-teacher" => self.register(Role::Teacher, &args),
            "register-student" => self.register(Role::Student, &args),
            "login" => self.login(&args),
            "logout" => {
                self.current = None;
                Ok(Reply::line("Logged out."))
            }
            "create-subject" => {
                let teacher = self.teacher()?;
                let name = args.rest(0, "create-subject NAME")?;
                let id = self.store.create_subject(teacher, &name)?;
                Ok(Reply::line(format!("Subject '{name}' created with ID {id}.")))
            }
            "enroll" => {
                let student = self.student()?;
                let name = args.rest(0, "enroll SUBJECT")?;
                self.store.enroll(student, &name)?;
                Ok(Reply::line(format!("Enrolled in '{name}'.")))
            }
            "roster" => self.roster(&args),
            "grade" => self.grade(&args),
            "grades" => self.grades(&args),
            "my-rating" => {
                let rating = self.store.teacher_rating(self.teacher()?)?;
                Ok(Reply::line(format!("Your overall rating: {rating:.2}")))
            }
            "rate" => self.rate(&args),
            "my-subjects" => self.my_subjects(),
            "my-grades" => self.my_grades(),
            "teacher" => self.teacher_info(&args),
            "help" => Ok(Reply {
                lines: HELP.lines().map(str::to_string).collect(),
                quit: false,
            }),
            "quit" | "exit" => Ok(Reply {
                lines: vec!["Goodbye!".into()],
                quit: true,
            }),
            other => Err(RecordsError::InvalidInput(format!(
                "unknown command {other:?}, try `help`"
            ))),
        }
    }

    fn teacher(&self) -> Result<TeacherId, RecordsError> {
        match self.current {
            Some(AccountId::Teacher(id)) => Ok(id),
            _ => Err(RecordsError::InvalidInput("log in as a teacher first".into())),
        }
    }

    fn student(&self) -> Result<StudentId, RecordsError> {
        match self.current {
            Some(AccountId::Student(id)) => Ok(id),
            _ => Err(RecordsError::InvalidInput("log in as a student first".into())),
        }
    }

    fn register(&mut self, role: Role, args: &Words) -> Result<Reply, RecordsError> {
        let usage = "register-<teacher|student> LOGIN PASSWORD NAME";
        let (login, password) = match args.args.as_slice() {
            [login, password, ..] => (*login, *password),
            _ => return Err(usage_error(usage)),
        };
        let name = args.rest(2, usage)?;

        let id = match role {
            Role::Teacher => self.store.register_teacher(login, password, &name)?.0,
            Role::Student => self.store.register_student(login, password, &name)?.0,
        };

        let mut reply = Reply::line(format!("Registered {role} '{name}' with ID {id}."));
        if let Err(e) = self.store.save_to(self.gateway) {
            reply.push(format!("warning: {e}"));
        }
        Ok(reply)
    }

    fn login(&mut self, args: &Words) -> Result<Reply, RecordsError> {
        let [role, login, password] = args.args.as_slice() else {
            return Err(usage_error("login <teacher|student> LOGIN PASSWORD"));
        };
        let role: Role = role.parse().map_err(RecordsError::InvalidInput)?;

        let account = self.store.login(login, password, role)?;
        let name = match account {
            AccountId::Teacher(id) => self.store.teacher(id).map(|t| t.name().to_string()),
            AccountId::Student(id) => self.store.student(id).map(|s| s.name().to_string()),
        }
        .unwrap_or_default();
        self.current = Some(account);
        Ok(Reply::line(format!("Welcome, {name}!")))
    }

    fn roster(&self, args: &Words) -> Result<Reply, RecordsError> {
        let teacher = self.teacher()?;
        let subject = args.rest(0, "roster SUBJECT")?;
        let roster = self.store.subject_roster(teacher, &subject)?;
        if roster.is_empty() {
            return Ok(Reply::line("No students enrolled."));
        }
        let mut reply = Reply::line("Enrolled students:");
        for entry in roster {
            reply.push(format!(" - {}: {}", entry.student, entry.name));
        }
        Ok(reply)
    }

    fn grade(&mut self, args: &Words) -> Result<Reply, RecordsError> {
        let usage = "grade STUDENT_ID GRADE SUBJECT";
        let teacher = self.teacher()?;
        let (student, grade) = match args.args.as_slice() {
            [student, grade, _, ..] => (StudentId(parse_id(student)?), parse_grade(grade)?),
            _ => return Err(usage_error(usage)),
        };
        let subject = args.rest(2, usage)?;

        let average = self.store.assign_grade(teacher, &subject, student, grade)?;
        let name = self
            .store
            .student(student)
            .map(|s| s.name().to_string())
            .unwrap_or_default();
        Ok(Reply::line(format!(
            "Assigned grade {grade} to {name}. Class average: {average:.2}"
        )))
    }

    fn grades(&self, args: &Words) -> Result<Reply, RecordsError> {
        let teacher = self.teacher()?;
        let subject = args.rest(0, "grades SUBJECT")?;
        let sheet = self.store.view_subject_grades(teacher, &subject)?;

        let mut reply = Reply::line(format!("Grades for '{}':", sheet.subject));
        if sheet.entries.is_empty() {
            reply.push("  No grades assigned yet.");
            return Ok(reply);
        }
        for entry in &sheet.entries {
            reply.push(format!("  {} ({}): {}", entry.name, entry.student, entry.grade));
        }
        reply.push(format!("Class average: {:.2}", sheet.class_average));
        Ok(reply)
    }

    fn rate(&mut self, args: &Words) -> Result<Reply, RecordsError> {
        let student = self.student()?;
        let [teacher, rating] = args.args.as_slice() else {
            return Err(usage_error("rate TEACHER_ID RATING"));
        };
        let teacher = TeacherId(parse_id(teacher)?);
        let rating = parse_rating(rating)?;

        let overall = self.store.rate_teacher(student, teacher, rating)?;
        let name = self
            .store
            .teacher(teacher)
            .map(|t| t.name().to_string())
            .unwrap_or_default();
        Ok(Reply::line(format!(
            "You rated {name} {rating}/5. Overall rating: {overall:.2}"
        )))
    }

    fn my_subjects(&self) -> Result<Reply, RecordsError> {
        let subjects = self.store.student_subjects(self.student()?)?;
        if subjects.is_empty() {
            return Ok(Reply::line("Not enrolled in any subjects."));
        }
        let mut reply = Reply::line("Your subjects:");
        for (id, name) in subjects {
            reply.push(format!(" - {name} (ID {id})"));
        }
        Ok(reply)
    }

    fn my_grades(&self) -> Result<Reply, RecordsError> {
        let grades = self.store.student_grades(self.student()?)?;
        if grades.is_empty() {
            return Ok(Reply::line("No grades yet."));
        }
        let mut reply = Reply::line("Your grades:");
        for (subject, grade) in grades {
            reply.push(format!("  {subject}: {grade}"));
        }
        Ok(reply)
    }

    fn teacher_info(&self, args: &Words) -> Result<Reply, RecordsError> {
        let [id] = args.args.as_slice() else {
            return Err(usage_error("teacher TEACHER_ID"));
        };
        let info = self.store.teacher_info(TeacherId(parse_id(id)?))?;

        let mut reply = Reply::line(format!("Name: {}", info.name));
        reply.push(format!("Username: {}", info.login));
        reply.push(format!("Overall rating: {:.2}", info.overall_rating));
        reply.push("Subjects taught:");
        for subject in &info.subjects {
            reply.push(format!(" - {subject}"));
        }
        Ok(reply)
    }
}

/// The arguments of one command line, plus the raw line they came from.
struct Words<'l> {
    line: &'l str,
    args: Vec<&'l str>,
}

impl Words<'_> {
    /// Raw text after the command word and the first `from` arguments.
    ///
    /// Spacing inside the text is kept as typed, so names and subjects
    /// match exactly.
    fn rest(&self, from: usize, usage: &str) -> Result<String, RecordsError> {
        let mut tail = self.line;
        for _ in 0..=from {
            tail = tail.trim_start();
            let end = tail.find(char::is_whitespace).unwrap_or(tail.len());
            tail = &tail[end..];
        }
        match tail.trim() {
            "" => Err(usage_error(usage)),
            text => Ok(text.to_string()),
        }
    }
}

fn usage_error(usage: &str) -> RecordsError {
    RecordsError::InvalidInput(format!("usage: {usage}"))
}

const HELP: &str = "\
Commands:
  register-teacher LOGIN PASSWORD NAME
  register-student LOGIN PASSWORD NAME
  login <teacher|student> LOGIN PASSWORD
  logout
Teacher:
  create-subject NAME
  roster SUBJECT
  grade STUDENT_ID GRADE SUBJECT
  grades SUBJECT
  my-rating
Student:
  enroll SUBJECT
  my-subjects
  my-grades
  rate TEACHER_ID RATING
Anyone:
  teacher TEACHER_ID
  help
  quit";
