use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{Question, QuestionId, Quiz, QuizId};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{
    DriverOutcome, QuizSessionService, SessionCommand, SessionDriver, SessionError,
    SessionUpdate,
};
use storage::repository::{AttemptRepository, InMemoryRepository, QuizRepository};
use tokio::sync::mpsc;
use tokio::time::Instant;

fn build_quiz(correct: &[usize], time_limit: Option<u32>) -> Quiz {
    let questions = correct
        .iter()
        .enumerate()
        .map(|(i, &answer)| {
            let options = ["A", "B", "C", "D"].iter().map(ToString::to_string).collect();
            Question::new(QuestionId::for_position(i), format!("Q{}", i + 1), options, answer)
                .unwrap()
        })
        .collect();
    Quiz::new(QuizId::new("timed"), "Driver", questions, fixed_now(), time_limit).unwrap()
}

async fn setup(quiz: &Quiz) -> (SessionDriver, Arc<QuizSessionService>, InMemoryRepository) {
    let repo = InMemoryRepository::new();
    repo.upsert_quiz(quiz).await.unwrap();
    let service = Arc::new(QuizSessionService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    ));
    (SessionDriver::new(Arc::clone(&service)), service, repo)
}

#[tokio::test(start_paused = true)]
async fn idle_session_times_out() {
    let quiz = build_quiz(&[0, 1], Some(1));
    let (driver, service, repo) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (_tx, rx) = mpsc::unbounded_channel();

    let started = Instant::now();
    let mut ticks = 0;
    let outcome = driver
        .run(session, rx, |_, update| {
            if matches!(update, SessionUpdate::Tick { .. }) {
                ticks += 1;
            }
        })
        .await
        .unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(60));
    assert_eq!(ticks, 59);
    let DriverOutcome::Completed(receipt) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(receipt.attempt.score(), 0);
    assert_eq!(receipt.attempt.answers(), &[None, None]);
    assert_eq!(repo.list_attempts(quiz.id(), 10).await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn ten_minute_countdown_submits_after_six_hundred_ticks() {
    let quiz = build_quiz(&[0, 1, 2], Some(10));
    let (driver, service, _) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (_tx, rx) = mpsc::unbounded_channel();

    let mut last_remaining = 600;
    let outcome = driver
        .run(session, rx, |_, update| {
            if let SessionUpdate::Tick { remaining } = update {
                assert_eq!(remaining, last_remaining - 1);
                last_remaining = remaining;
            }
        })
        .await
        .unwrap();

    assert_eq!(last_remaining, 1);
    assert!(matches!(outcome, DriverOutcome::Completed(_)));
}

#[tokio::test(start_paused = true)]
async fn exit_abandons_without_storing() {
    let quiz = build_quiz(&[0], None);
    let (driver, service, repo) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::SelectAnswer(0)).unwrap();
    tx.send(SessionCommand::Exit).unwrap();

    let outcome = driver.run(session, rx, |_, _| {}).await.unwrap();

    assert!(matches!(outcome, DriverOutcome::Abandoned));
    assert!(repo.list_attempts(quiz.id(), 10).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn closed_channel_abandons() {
    let quiz = build_quiz(&[0], None);
    let (driver, service, _) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel::<SessionCommand>();
    drop(tx);

    let outcome = driver.run(session, rx, |_, _| {}).await.unwrap();
    assert!(matches!(outcome, DriverOutcome::Abandoned));
}

#[tokio::test(start_paused = true)]
async fn review_mark_advances_after_delay() {
    let quiz = build_quiz(&[0, 0, 0], None);
    let (driver, service, _) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::ToggleMark).unwrap();

    let mut seen = Vec::new();
    let run = driver.run(session, rx, |session, update| match update {
        SessionUpdate::Changed(command) => seen.push((
            format!("{command:?}"),
            session.current_index(),
            session.marked_for_review()[0],
        )),
        SessionUpdate::Advanced => seen.push((
            "Advanced".to_string(),
            session.current_index(),
            session.marked_for_review()[0],
        )),
        _ => {}
    });
    let exit = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(SessionCommand::Exit).unwrap();
    };
    let (outcome, ()) = tokio::join!(run, exit);

    assert!(matches!(outcome.unwrap(), DriverOutcome::Abandoned));
    assert_eq!(
        seen,
        vec![
            ("ToggleMark".to_string(), 0, true),
            ("Advanced".to_string(), 1, true),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn navigation_before_delay_cancels_advance() {
    let quiz = build_quiz(&[0, 0, 0], None);
    let (driver, service, _) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::ToggleMark).unwrap();
    tx.send(SessionCommand::JumpTo(2)).unwrap();

    let mut advanced = false;
    let mut final_index = None;
    let run = driver.run(session, rx, |session, update| {
        if matches!(update, SessionUpdate::Advanced) {
            advanced = true;
        }
        final_index = Some(session.current_index());
    });
    let exit = async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(SessionCommand::Exit).unwrap();
    };
    let (outcome, ()) = tokio::join!(run, exit);

    assert!(matches!(outcome.unwrap(), DriverOutcome::Abandoned));
    assert!(!advanced);
    assert_eq!(final_index, Some(2));
}

#[tokio::test(start_paused = true)]
async fn leaving_and_returning_before_delay_cancels_advance() {
    let quiz = build_quiz(&[0, 0, 0], None);
    let (driver, service, _) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::ToggleMark).unwrap();
    tx.send(SessionCommand::Next).unwrap();
    tx.send(SessionCommand::Previous).unwrap();

    let mut advanced = false;
    let mut final_index = None;
    let run = driver.run(session, rx, |session, update| {
        if matches!(update, SessionUpdate::Advanced) {
            advanced = true;
        }
        final_index = Some(session.current_index());
    });
    let exit = async {
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(SessionCommand::Exit).unwrap();
    };
    let (outcome, ()) = tokio::join!(run, exit);

    assert!(matches!(outcome.unwrap(), DriverOutcome::Abandoned));
    assert!(!advanced);
    assert_eq!(final_index, Some(0));
}

#[tokio::test(start_paused = true)]
async fn confirmed_submit_completes() {
    let quiz = build_quiz(&[2, 1], None);
    let (driver, service, repo) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::SelectAnswer(2)).unwrap();
    tx.send(SessionCommand::RequestSubmit).unwrap();
    tx.send(SessionCommand::ConfirmSubmit).unwrap();

    let mut prompted = None;
    let outcome = driver
        .run(session, rx, |_, update| {
            if let SessionUpdate::SubmitPrompt(prompt) = update {
                prompted = Some(prompt.unanswered);
            }
        })
        .await
        .unwrap();

    assert_eq!(prompted, Some(1));
    let DriverOutcome::Completed(receipt) = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(receipt.attempt.score(), 1);
    assert_eq!(receipt.review.percentage, 50);
    assert_eq!(repo.list_attempts(quiz.id(), 10).await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn confirm_without_prompt_is_rejected() {
    let quiz = build_quiz(&[0], None);
    let (driver, service, _) = setup(&quiz).await;
    let session = service.start_session(quiz.id()).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::ConfirmSubmit).unwrap();
    tx.send(SessionCommand::SelectAnswer(7)).unwrap();
    tx.send(SessionCommand::Exit).unwrap();

    let mut rejected = Vec::new();
    let outcome = driver
        .run(session, rx, |_, update| {
            if let SessionUpdate::Rejected { command, error } = update {
                let transition = matches!(error, SessionError::InvalidTransition { .. });
                rejected.push((command, transition));
            }
        })
        .await
        .unwrap();

    assert!(matches!(outcome, DriverOutcome::Abandoned));
    assert_eq!(
        rejected,
        vec![
            (SessionCommand::ConfirmSubmit, true),
            (SessionCommand::SelectAnswer(7), false),
        ]
    );
}
