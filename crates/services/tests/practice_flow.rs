//! End-to-end flows over the in-memory store: add questions, practice,
//! check the recorded statistics, and round-trip a backup.

use std::sync::Arc;

use quiz_core::time::fixed_clock;
use services::{
    AppServices, PracticeMode, QuestionCount, QuizConfig, SessionError, Step,
};
use storage::{BackupDocument, InMemoryStore, QuizStore};

fn open_empty() -> (AppServices, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    // one recorded answer keeps the starter bank from being seeded
    let services = {
        let stats = services::StatsService::new(store.clone(), fixed_clock());
        stats.record_answer(true).unwrap();
        let opened = AppServices::open(store.clone(), fixed_clock());
        store.save_statistics(&quiz_core::model::Statistics::default()).unwrap();
        opened
    };
    (services, store)
}

const MATH_BANK: &str = "\
Question 1: 2 + 2 = ?
A. 3
B. 4
C. 5
D. 6
Correct answer: B

Question 2: 3 × 3 = ?
A. 9
B. 6
C. 12
D. 3
Correct answer: A

Question 3: 10 / 2 = ?
A. 2
B. 4
C. 5
D. 20
Correct answer: C

Question 4: 7 - 4 = ?
A. 3
B. 4
C. 11
D. 28
Correct answer: A

Question 5: 1 + 0 = ?
A. 0
B. 1
C. 10
D. 2
Correct answer: B
";

#[test]
fn check_as_you_go_session_records_score_and_history() {
    let (services, store) = open_empty();
    let summary = services.bank.add_from_text(MATH_BANK, "Math").unwrap();
    assert_eq!(summary.saved, 5);
    assert_eq!(summary.skipped, 0);

    let config = QuizConfig {
        mode: PracticeMode::CheckAsYouGo,
        count: QuestionCount::Limit(3),
        shuffle_questions: false,
        shuffle_answers: false,
        subject: Some("Math".into()),
    };
    let mut started = services.practice.start(&config).unwrap();
    assert_eq!(started.session.len(), 3);
    assert!(started.shortfall.is_none());

    // Q1 correct (B), Q2 correct (A), Q3 wrong (A instead of C)
    let check = services.practice.answer(&mut started.session, 1).unwrap().unwrap();
    assert!(check.is_correct);
    assert_eq!(started.session.advance().unwrap(), Step::Moved);

    let check = services.practice.answer(&mut started.session, 0).unwrap().unwrap();
    assert!(check.is_correct);
    assert_eq!(started.session.advance().unwrap(), Step::Moved);

    let check = services.practice.answer(&mut started.session, 0).unwrap().unwrap();
    assert!(!check.is_correct);
    assert_eq!(check.correct_answer, 2);
    assert_eq!(started.session.advance().unwrap(), Step::End);

    let report = services.practice.finish(&mut started.session).unwrap();
    assert_eq!(report.score(), "2/3");
    assert_eq!(report.accuracy, 67);

    let stats = store.load_statistics();
    assert_eq!(stats.total_questions(), 3);
    assert_eq!(stats.correct_answers(), 2);
    assert_eq!(stats.history().len(), 1);
    assert_eq!(stats.history()[0].correct(), 2);
    assert_eq!(stats.history()[0].total(), 3);
    assert_eq!(stats.history()[0].accuracy(), 67);
}

#[test]
fn count_all_uses_every_available_question() {
    let (services, _) = open_empty();
    services.bank.add_from_text(MATH_BANK, "Math").unwrap();
    services
        .bank
        .add_from_text(
            "Question 1: Capital of France?\nA. Lyon\nB. Paris\nCorrect answer: B\n\n\
             Question 2: Capital of Japan?\nA. Tokyo\nB. Kyoto\nCorrect answer: A\n",
            "Geography",
        )
        .unwrap();

    let started = services
        .practice
        .start(&QuizConfig {
            count: QuestionCount::All,
            ..QuizConfig::default()
        })
        .unwrap();

    assert_eq!(started.session.len(), 7);
    assert!(started.shortfall.is_none());
}

#[test]
fn practicing_an_unknown_subject_fails() {
    let (services, _) = open_empty();
    services.bank.add_from_text(MATH_BANK, "Math").unwrap();

    let err = services
        .practice
        .start(&QuizConfig {
            subject: Some("Chemistry".into()),
            ..QuizConfig::default()
        })
        .unwrap_err();
    assert!(matches!(err, SessionError::NoQuestionsAvailable));
}

#[test]
fn end_of_quiz_session_allows_revisiting_answers() {
    let (services, store) = open_empty();
    services.bank.add_from_text(MATH_BANK, "Math").unwrap();

    let config = QuizConfig {
        mode: PracticeMode::EndOfQuiz,
        count: QuestionCount::Limit(2),
        shuffle_questions: false,
        shuffle_answers: false,
        subject: Some("Math".into()),
    };
    let mut started = services.practice.start(&config).unwrap();

    // wrong first, then go back and correct it
    services.practice.answer(&mut started.session, 3).unwrap();
    started.session.advance().unwrap();
    services.practice.answer(&mut started.session, 0).unwrap();
    assert!(started.session.retreat().unwrap());
    services.practice.answer(&mut started.session, 1).unwrap();

    let report = services.practice.finish(&mut started.session).unwrap();
    assert_eq!(report.score(), "2/2");
    assert_eq!(report.accuracy, 100);

    let stats = store.load_statistics();
    assert_eq!(stats.total_questions(), 2);
    assert_eq!(stats.correct_answers(), 2);
}

#[test]
fn malformed_backup_import_leaves_state_unchanged() {
    let (services, store) = open_empty();
    services.bank.add_from_text(MATH_BANK, "Math").unwrap();
    let before_questions = store.load_questions();
    let before_subjects = store.load_subjects();

    // missing required `subjects` field
    let err = BackupDocument::parse(r#"{"version": "1.0", "questions": []}"#).unwrap_err();
    assert!(matches!(err, storage::BackupError::MissingField("subjects")));

    assert_eq!(store.load_questions(), before_questions);
    assert_eq!(store.load_subjects(), before_subjects);
}

#[test]
fn backup_round_trips_between_stores() {
    let (services, _) = open_empty();
    services.bank.add_from_text(MATH_BANK, "Math").unwrap();
    let document = services.backup.export();

    let (other, other_store) = open_empty();
    let summary = other.backup.import(document).unwrap();

    assert_eq!(summary.questions, 5);
    assert!(summary.statistics_replaced);
    assert_eq!(other_store.load_questions().len(), 5);
    assert!(other_store.load_subjects().contains(&"Math".to_owned()));
}
