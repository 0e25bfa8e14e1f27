//! Terminal driver for a running exam session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use quiz_core::model::{OptionId, QuizResult};
use quiz_core::scoring::review_answers;
use quiz_core::time::{format_countdown, format_time_spent};
use services::exam::SharedSession;
use services::{AppServices, Clock, Countdown, Direction, ExamSession, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};

enum Step {
    Continue,
    Submitted(QuizResult),
    Quit,
}

fn lock(session: &SharedSession) -> MutexGuard<'_, ExamSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run `session` against stdin until it is submitted, times out or the
/// user quits, then record and print the result.
pub async fn run_session(
    services: &AppServices,
    session: ExamSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let clock = services.store().clock();
    let questions = session.questions().to_vec();
    let shared: SharedSession = Arc::new(Mutex::new(session));
    let (countdown, mut expired) = Countdown::spawn(Arc::clone(&shared), clock);

    println!("Enter an option number to answer, n/p to move, s to submit, q to quit.");
    print_question(&lock(&shared));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result = loop {
        tokio::select! {
            timed_out = &mut expired => {
                match timed_out {
                    Ok(result) => {
                        println!("\nTime is up!");
                        break Some(result);
                    }
                    Err(_) => break None,
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break None;
                };
                match handle_input(&shared, line.trim(), clock) {
                    Step::Continue => print_question(&lock(&shared)),
                    Step::Submitted(result) => break Some(result),
                    Step::Quit => break None,
                }
            }
        }
    };
    drop(countdown);

    let Some(result) = result else {
        println!("Quiz abandoned; nothing was recorded.");
        return Ok(());
    };

    let done = services.quiz().complete_quiz(&questions, result).await?;
    print_result(&questions, &done.result);
    if !done.new_records.is_empty() {
        println!(
            "{} question(s) added to your incorrect note.",
            done.new_records.len()
        );
    }
    Ok(())
}

fn handle_input(shared: &SharedSession, input: &str, clock: Clock) -> Step {
    let mut session = lock(shared);
    match input {
        "n" => {
            session.advance(Direction::Next);
        }
        "p" => {
            session.advance(Direction::Previous);
        }
        "s" => match session.submit(clock.now()) {
            Ok(result) => return Step::Submitted(result),
            // The timer got there first; its result arrives on the channel.
            Err(SessionError::Completed) => {}
            Err(err) => {
                eprintln!("{err}");
                return Step::Quit;
            }
        },
        "q" => return Step::Quit,
        other => {
            let option = other
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| session.current_question().options.get(i))
                .map(|o| o.id.clone());
            match option {
                Some(id) => select(&mut session, id),
                None => println!("Unrecognized input: {other}"),
            }
        }
    }
    Step::Continue
}

fn select(session: &mut ExamSession, option: OptionId) {
    if session.select_current(option).is_err() {
        println!("This quiz has already been submitted.");
    }
}

fn print_question(session: &ExamSession) {
    let question = session.current_question();
    let selected = session.selected_for(&question.id);
    println!();
    println!(
        "{}  Question {}/{}  [{}]  answered {}",
        session.category().name,
        session.current_index() + 1,
        session.questions().len(),
        format_countdown(session.remaining_secs()),
        session.answered_count()
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(&option.id) { '*' } else { ' ' };
        println!(" {marker} {}. {}", i + 1, option.text);
    }
    if session.is_last_question() {
        println!("(last question, s to submit)");
    }
}

fn print_result(questions: &[quiz_core::model::Question], result: &QuizResult) {
    println!();
    println!(
        "{}  {}/{} correct  {}%  time {}",
        result.grade().label(),
        result.score(),
        result.total_questions(),
        result.percentage(),
        format_time_spent(result.time_spent_seconds())
    );
    for (i, row) in review_answers(questions, result).iter().enumerate() {
        let mark = if row.is_correct { "correct" } else { "wrong" };
        println!("{}. {} [{mark}]", i + 1, row.question.text);
        let chosen = row
            .selected_option()
            .map_or("(no answer)", |o| o.text.as_str());
        println!("   Your answer: {chosen}");
        if !row.is_correct {
            if let Some(correct) = row.question.correct_option() {
                println!("   Correct answer: {}", correct.text);
            }
        }
        if let Some(explanation) = &row.question.explanation {
            println!("   {explanation}");
        }
    }
}
