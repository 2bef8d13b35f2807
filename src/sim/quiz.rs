//! Checkpoint quiz gate
//!
//! Optional score-triggered knowledge check. Crossing a 5000-point boundary
//! (while enabled and no session is already up) opens a session of 3
//! questions drawn uniformly from the loaded pool. Two of three correct
//! passes; failing restarts the same three questions. The gate owns no UI -
//! the host presents `current_question()` and feeds back `answer()`.
//!
//! Question sets arrive as JSON in either of two accepted shapes and are
//! normalized on load. A set that fails to parse contributes zero questions
//! and is logged, never fatal.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Questions per checkpoint session
pub const SESSION_LEN: usize = 3;
/// Correct answers required to pass
pub const PASS_THRESHOLD: usize = 2;

/// Normalized question shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
}

/// Failure to load a question set. Callers treat this as "zero questions",
/// never as a crash.
#[derive(Debug)]
pub enum QuestionLoadError {
    Parse(serde_json::Error),
    Empty,
}

impl fmt::Display for QuestionLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionLoadError::Parse(e) => write!(f, "unrecognized question set: {e}"),
            QuestionLoadError::Empty => write!(f, "question set contained no usable questions"),
        }
    }
}

impl std::error::Error for QuestionLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuestionLoadError::Parse(e) => Some(e),
            QuestionLoadError::Empty => None,
        }
    }
}

/// Wire shape A: `{"questions": [{id, prompt, options, correctOption}]}`
#[derive(Deserialize)]
struct WrappedQuestion {
    id: String,
    prompt: String,
    options: Vec<String>,
    #[serde(rename = "correctOption")]
    correct_option: usize,
}

/// Wire shape B: flat list of `{id, question, choices: {key: number}, answer: key}`
#[derive(Deserialize)]
struct FlatQuestion {
    id: String,
    question: String,
    choices: BTreeMap<String, f64>,
    answer: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionFile {
    Wrapped { questions: Vec<WrappedQuestion> },
    Flat(Vec<FlatQuestion>),
}

fn format_choice(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Parse one question set in either accepted shape
pub fn parse_question_set(json: &str) -> Result<Vec<Question>, QuestionLoadError> {
    let file: QuestionFile = serde_json::from_str(json).map_err(QuestionLoadError::Parse)?;
    let questions = match file {
        QuestionFile::Wrapped { questions } => questions
            .into_iter()
            .filter(|q| q.correct_option < q.options.len())
            .map(|q| Question {
                id: q.id,
                prompt: q.prompt,
                options: q.options,
                correct: q.correct_option,
            })
            .collect::<Vec<_>>(),
        QuestionFile::Flat(list) => list
            .into_iter()
            .filter_map(|q| {
                // Choice ordering follows the (sorted) key order, so the
                // answer key maps to a stable option index
                let correct = q.choices.keys().position(|k| *k == q.answer)?;
                Some(Question {
                    id: q.id,
                    prompt: q.question,
                    options: q.choices.values().map(|v| format_choice(*v)).collect(),
                    correct,
                })
            })
            .collect(),
    };
    if questions.is_empty() {
        return Err(QuestionLoadError::Empty);
    }
    Ok(questions)
}

/// Outcome of answering the final question of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Passed,
    /// Session restarts at question 0 with the counter cleared
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Session {
    /// Indices into the pool, fixed for the life of the session
    picks: Vec<usize>,
    current: usize,
    correct: usize,
}

/// The gate itself: pool + at most one live session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizGate {
    enabled: bool,
    pool: Vec<Question>,
    session: Option<Session>,
}

impl QuizGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pool: Vec::new(),
            session: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Runtime toggle from the host; never resets game state. Disabling
    /// while a session is up drops it without an outcome so play resumes.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.session = None;
        }
    }

    /// Append a parsed question set to the pool
    pub fn load_set(&mut self, json: &str) -> Result<usize, QuestionLoadError> {
        let questions = parse_question_set(json)?;
        let count = questions.len();
        self.pool.extend(questions);
        Ok(count)
    }

    /// Load a set, degrading to zero questions on failure
    pub fn load_set_lenient(&mut self, name: &str, json: &str) -> usize {
        match self.load_set(json) {
            Ok(count) => {
                log::info!("loaded question set '{name}': {count} questions");
                count
            }
            Err(e) => {
                log::warn!("question set '{name}' skipped: {e}");
                0
            }
        }
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session if the gate can run one (enabled, idle, pool big
    /// enough). Returns whether a session started.
    pub fn try_start_session<R: Rng>(&mut self, rng: &mut R) -> bool {
        if !self.enabled || self.session.is_some() {
            return false;
        }
        if self.pool.len() < SESSION_LEN {
            log::warn!(
                "checkpoint skipped: pool has {} questions, need {SESSION_LEN}",
                self.pool.len()
            );
            return false;
        }
        let mut picks: Vec<usize> = (0..self.pool.len()).collect();
        picks.shuffle(rng);
        picks.truncate(SESSION_LEN);
        self.session = Some(Session { picks, current: 0, correct: 0 });
        true
    }

    /// The question awaiting an answer, if a session is up
    pub fn current_question(&self) -> Option<&Question> {
        let session = self.session.as_ref()?;
        let idx = *session.picks.get(session.current)?;
        self.pool.get(idx)
    }

    /// 1-based progress for the host overlay: (current, total)
    pub fn session_progress(&self) -> Option<(usize, usize)> {
        self.session
            .as_ref()
            .map(|s| (s.current + 1, SESSION_LEN))
    }

    /// Feed an answer. Returns an outcome once the last question resolves;
    /// `None` means the session continues.
    pub fn answer(&mut self, option: usize) -> Option<SessionOutcome> {
        let session = self.session.as_mut()?;
        let question_idx = *session.picks.get(session.current)?;
        if self.pool[question_idx].correct == option {
            session.correct += 1;
        }
        session.current += 1;
        if session.current < SESSION_LEN {
            return None;
        }
        if session.correct >= PASS_THRESHOLD {
            self.session = None;
            Some(SessionOutcome::Passed)
        } else {
            // Same questions, from the top
            session.current = 0;
            session.correct = 0;
            Some(SessionOutcome::Failed)
        }
    }

    /// Gate carried across a restart: pool and toggle survive, sessions do not
    pub fn reset_for_new_run(&self) -> Self {
        Self {
            enabled: self.enabled,
            pool: self.pool.clone(),
            session: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WRAPPED: &str = r#"{"questions":[
        {"id":"q1","prompt":"2+2?","options":["3","4","5"],"correctOption":1},
        {"id":"q2","prompt":"3*3?","options":["9","6"],"correctOption":0},
        {"id":"q3","prompt":"10-7?","options":["2","3"],"correctOption":1},
        {"id":"q4","prompt":"8/2?","options":["4","2"],"correctOption":0}
    ]}"#;

    const FLAT: &str = r#"[
        {"id":"f1","question":"5+5?","choices":{"a":10,"b":11},"answer":"a"},
        {"id":"f2","question":"6+1?","choices":{"a":6,"b":7},"answer":"b"},
        {"id":"f3","question":"1.5*2?","choices":{"a":3,"b":3.5},"answer":"a"}
    ]"#;

    fn loaded_gate() -> QuizGate {
        let mut gate = QuizGate::new(true);
        assert_eq!(gate.load_set(WRAPPED).unwrap(), 4);
        gate
    }

    #[test]
    fn test_parse_both_shapes() {
        let wrapped = parse_question_set(WRAPPED).unwrap();
        assert_eq!(wrapped.len(), 4);
        assert_eq!(wrapped[0].options[wrapped[0].correct], "4");

        let flat = parse_question_set(FLAT).unwrap();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[0].prompt, "5+5?");
        assert_eq!(flat[0].options[flat[0].correct], "10");
        assert_eq!(flat[1].options[flat[1].correct], "7");
    }

    #[test]
    fn test_parse_garbage_is_error_not_panic() {
        assert!(parse_question_set("not json").is_err());
        assert!(parse_question_set("[]").is_err());
        // Unknown answer key drops the question rather than failing the set
        let partial = r#"[{"id":"x","question":"?","choices":{"a":1},"answer":"z"}]"#;
        assert!(matches!(
            parse_question_set(partial),
            Err(QuestionLoadError::Empty)
        ));
    }

    #[test]
    fn test_session_pass_two_of_three() {
        let mut gate = loaded_gate();
        let mut rng = Pcg32::seed_from_u64(9);
        assert!(gate.try_start_session(&mut rng));
        assert!(gate.session_active());

        // Answer first two correctly, flub the last
        for i in 0..SESSION_LEN {
            let q = gate.current_question().unwrap().clone();
            let pick = if i < 2 { q.correct } else { (q.correct + 1) % q.options.len() };
            let outcome = gate.answer(pick);
            if i < SESSION_LEN - 1 {
                assert_eq!(outcome, None);
            } else {
                assert_eq!(outcome, Some(SessionOutcome::Passed));
            }
        }
        assert!(!gate.session_active());
    }

    #[test]
    fn test_session_fail_restarts_same_questions() {
        let mut gate = loaded_gate();
        let mut rng = Pcg32::seed_from_u64(9);
        gate.try_start_session(&mut rng);
        let first_question = gate.current_question().unwrap().id.clone();

        // Miss everything
        for i in 0..SESSION_LEN {
            let q = gate.current_question().unwrap().clone();
            let wrong = (q.correct + 1) % q.options.len();
            let outcome = gate.answer(wrong);
            if i == SESSION_LEN - 1 {
                assert_eq!(outcome, Some(SessionOutcome::Failed));
            }
        }
        // Same session re-presents from the top
        assert!(gate.session_active());
        assert_eq!(gate.current_question().unwrap().id, first_question);
        assert_eq!(gate.session_progress(), Some((1, 3)));
    }

    #[test]
    fn test_one_of_three_still_fails() {
        // One correct answer sits just below the pass threshold
        let mut gate = loaded_gate();
        let mut rng = Pcg32::seed_from_u64(9);
        gate.try_start_session(&mut rng);

        for i in 0..SESSION_LEN {
            let q = gate.current_question().unwrap().clone();
            let pick = if i == 0 { q.correct } else { (q.correct + 1) % q.options.len() };
            let outcome = gate.answer(pick);
            if i == SESSION_LEN - 1 {
                assert_eq!(outcome, Some(SessionOutcome::Failed));
            }
        }
        assert!(gate.session_active());
    }

    #[test]
    fn test_small_pool_degrades() {
        let mut gate = QuizGate::new(true);
        gate.load_set_lenient("broken", "{nope");
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(!gate.try_start_session(&mut rng));
    }

    #[test]
    fn test_disable_drops_session_without_outcome() {
        let mut gate = loaded_gate();
        let mut rng = Pcg32::seed_from_u64(2);
        gate.try_start_session(&mut rng);
        gate.set_enabled(false);
        assert!(!gate.session_active());
        assert!(!gate.try_start_session(&mut rng));
    }
}
