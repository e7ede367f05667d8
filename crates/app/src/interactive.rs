//! Line-driven loops for the panel, flashcards and interview practice.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio::time::Instant;

use prep_core::model::{PanelSessionRecord, Question};
use prep_core::time::format_mm_ss;
use services::practice::{FlashcardDeck, InterviewPractice};
use services::{Confirmation, PanelProgress, PanelService, QuestionBank, SystemRandom};

use crate::render;

const PANEL_HELP: &str = "n: next  p: previous  t: time left  note <text>: jot a note  e: end panel";
const FLASHCARD_HELP: &str = "f: flip  n: next  p: previous  s: shuffle  q: quit";
const INTERVIEW_HELP: &str = "n: next  p: previous  a: show answer  note <text>: jot a note  q: quit";

/// Remaining-time reminders are printed on these boundaries.
const REMINDER_EVERY_SECS: u64 = 5 * 60;
const FINAL_COUNTDOWN_SECS: u64 = 60;

/// Line reader shared by prompts and interactive loops. Reads stdin unless
/// built with `from_reader`.
pub struct Terminal<R = Stdin> {
    lines: Lines<BufReader<R>>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::from_reader(tokio::io::stdin())
    }
}

impl<R: AsyncRead + Unpin> Terminal<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
        }
    }

    /// Next input line, or `None` at end of input. Cancel-safe.
    pub async fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    /// Ask a `y/N` question. Anything but an explicit yes declines.
    pub async fn confirm(&mut self, prompt: &str) -> anyhow::Result<Confirmation> {
        print!("{prompt} [y/N] ");
        std::io::stdout().flush()?;
        let answer = self.read_line().await?;
        Ok(Confirmation::from_bool(is_yes(answer.as_deref())))
    }
}

fn is_yes(answer: Option<&str>) -> bool {
    answer.is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn prompt() -> anyhow::Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

/// True when the countdown passed a reminder mark between two ticks. Ticks
/// can be skipped, so marks are matched by crossing rather than equality.
fn crossed_reminder(previous_secs: u64, remaining_secs: u64) -> bool {
    if remaining_secs == 0 || remaining_secs >= previous_secs {
        return false;
    }
    let next_mark = remaining_secs.div_ceil(REMINDER_EVERY_SECS) * REMINDER_EVERY_SECS;
    next_mark < previous_secs || (remaining_secs..previous_secs).contains(&FINAL_COUNTDOWN_SECS)
}

fn report_recorded(record: Option<&PanelSessionRecord>) {
    match record {
        Some(record) => println!(
            "Recorded panel with {} questions.",
            record.questions().len()
        ),
        None => println!("Nothing to record."),
    }
}

async fn show_panel(panels: &PanelService) -> anyhow::Result<()> {
    let (panel, remaining) = (panels.active().await, panels.remaining_secs().await);
    if let (Some(panel), Some(remaining)) = (panel, remaining) {
        println!("\n{}", render::panel_question(&panel, remaining));
    }
    prompt()
}

/// Compose a panel and run it until time is up or the user ends it.
///
/// A terminal error ends the running panel early, so it is still recorded,
/// before the error is returned.
pub async fn run_panel<R: AsyncRead + Unpin>(
    panels: &PanelService,
    term: &mut Terminal<R>,
) -> anyhow::Result<()> {
    let panel = panels.start().await?;
    let config = panels.config().await;
    println!(
        "Panel started: {} questions, {} minutes.",
        panel.questions().len(),
        config.duration_minutes
    );
    println!("{PANEL_HELP}");

    let (timer, ticks) = panels.timer().await;
    let outcome = drive_panel(panels, term, ticks).await;
    timer.cancel();

    if outcome.is_err() {
        match panels.end_early().await {
            Ok(record) => {
                tracing::warn!(recorded = record.is_some(), "panel interrupted by a terminal error");
            }
            Err(err) => tracing::error!(%err, "could not record the interrupted panel"),
        }
    }
    outcome
}

async fn drive_panel<R: AsyncRead + Unpin>(
    panels: &PanelService,
    term: &mut Terminal<R>,
    mut ticks: mpsc::Receiver<Instant>,
) -> anyhow::Result<()> {
    let mut last_remaining = panels.remaining_secs().await.unwrap_or(0);
    show_panel(panels).await?;

    loop {
        tokio::select! {
            Some(_) = ticks.recv() => {
                match panels.tick().await? {
                    PanelProgress::Running { remaining_secs } => {
                        if crossed_reminder(last_remaining, remaining_secs) {
                            println!("\n{} remaining", format_mm_ss(remaining_secs));
                            prompt()?;
                        }
                        last_remaining = remaining_secs;
                    }
                    PanelProgress::TimedOut(record) => {
                        println!("\nPanel simulation time is up!");
                        report_recorded(record.as_ref());
                        return Ok(());
                    }
                    PanelProgress::Idle => return Ok(()),
                }
            }
            line = term.read_line() => {
                let Some(line) = line? else {
                    let record = panels.end_early().await?;
                    report_recorded(record.as_ref());
                    return Ok(());
                };
                let input = line.trim();
                match input {
                    "n" => {
                        panels.next().await;
                        show_panel(panels).await?;
                    }
                    "p" => {
                        panels.prev().await;
                        show_panel(panels).await?;
                    }
                    "t" => {
                        if let Some(left) = panels.remaining_display().await {
                            println!("{left} remaining");
                        }
                        prompt()?;
                    }
                    "e" => {
                        let record = panels.end_early().await?;
                        println!("Panel ended early.");
                        report_recorded(record.as_ref());
                        return Ok(());
                    }
                    "" => show_panel(panels).await?,
                    _ => {
                        if let Some(note) = note_text(input) {
                            panels.set_note(note).await;
                        } else {
                            println!("{PANEL_HELP}");
                        }
                        prompt()?;
                    }
                }
            }
        }
    }
}

fn note_text(input: &str) -> Option<&str> {
    if input == "note" {
        return Some("");
    }
    input.strip_prefix("note ")
}

/// Shuffled flashcards over `questions`.
pub async fn run_flashcards<R: AsyncRead + Unpin>(
    questions: Vec<Question>,
    term: &mut Terminal<R>,
) -> anyhow::Result<()> {
    let mut rng = SystemRandom::new();
    let mut deck = FlashcardDeck::new(questions, &mut rng);
    if deck.is_empty() {
        println!("No questions match; add some or change the filter.");
        return Ok(());
    }
    println!("{FLASHCARD_HELP}");

    loop {
        println!("\n{}", render::flashcard(&deck));
        prompt()?;
        let Some(line) = term.read_line().await? else {
            break;
        };
        match line.trim() {
            "f" | "" => {
                deck.flip();
            }
            "n" => {
                deck.next();
            }
            "p" => {
                deck.prev();
            }
            "s" => deck.reshuffle(&mut rng),
            "q" => break,
            _ => println!("{FLASHCARD_HELP}"),
        }
    }
    Ok(())
}

/// Walk through flagged questions. The flagged list is re-read every step so
/// changes made elsewhere show up.
pub async fn run_interview<R: AsyncRead + Unpin>(
    questions: &QuestionBank,
    term: &mut Terminal<R>,
) -> anyhow::Result<()> {
    let mut practice = InterviewPractice::new();
    println!("{INTERVIEW_HELP}");

    loop {
        let flagged = questions.flagged().await;
        let Some(current) = practice.current(&flagged).cloned() else {
            println!("No flagged questions. Flag some with `flag <id>`.");
            return Ok(());
        };
        println!(
            "\nFlagged {}/{}  [{}] {}\n{}",
            practice.index() + 1,
            flagged.len(),
            current.kind(),
            current.category(),
            current.text()
        );
        if let Some(note) = practice.notes().get(current.id()) {
            println!("notes: {note}");
        }
        prompt()?;

        let Some(line) = term.read_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "n" => {
                practice.next(&flagged);
            }
            "p" => {
                practice.prev(&flagged);
            }
            "a" => println!("\n{}", render::question_detail(&current)),
            "q" => break,
            _ => match note_text(input) {
                Some(note) => practice.notes_mut().set(current.id(), note),
                None => println!("{INTERVIEW_HELP}"),
            },
        }
    }
    Ok(())
}
