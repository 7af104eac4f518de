//! Integration tests for the notification-callback state machine.
//!
//! These drive [`handle_progress_notification`] against a recording command
//! surface, with no dialog window anywhere: the session object is explicit,
//! so every row of the notification protocol can be checked directly:
//! - marquee start on creation
//! - auto-dismissal clicks on terminal operation states
//! - the cancel-click veto protocol
//! - progress element pushes and their ordering

use std::cell::RefCell;
use std::time::Duration;

use anyhow::anyhow;
use xtaskdialog::dialog::callback::handle_progress_notification;
use xtaskdialog::{
    CallbackStatus, CancelSource, DialogCommands, DialogElement, DialogResult, Notification,
    Operation, Outcome, ProgressBarState, ProgressSession, SharedProgress, StatusProbe,
    WindowHandle,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    StartMarquee,
    StopMarquee,
    SetRange(i32, i32),
    SetPosition(i32),
    SetState(ProgressBarState),
    UpdateText(DialogElement, String),
    Click(DialogResult),
}

/// Records every command a handler issues, in order.
#[derive(Default)]
struct RecordingCommands {
    commands: RefCell<Vec<Command>>,
}

impl RecordingCommands {
    fn take(&self) -> Vec<Command> {
        self.commands.take()
    }

    fn push(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }
}

impl DialogCommands for RecordingCommands {
    fn window(&self) -> WindowHandle {
        WindowHandle::NULL
    }

    fn start_marquee(&self) {
        self.push(Command::StartMarquee);
    }

    fn stop_marquee(&self) {
        self.push(Command::StopMarquee);
    }

    fn set_progress_range(&self, min: i32, max: i32) {
        self.push(Command::SetRange(min, max));
    }

    fn set_progress_position(&self, position: i32) {
        self.push(Command::SetPosition(position));
    }

    fn set_progress_state(&self, state: ProgressBarState) {
        self.push(Command::SetState(state));
    }

    fn update_element_text(&self, element: DialogElement, text: &str) {
        self.push(Command::UpdateText(element, text.to_string()));
    }

    fn click_button(&self, button: DialogResult) {
        self.push(Command::Click(button));
    }
}

/// An operation parked until its sender is used or dropped.
fn running_operation(
    runtime: &tokio::runtime::Runtime,
) -> (Operation<i32>, tokio::sync::oneshot::Sender<Outcome<i32>>) {
    let (tx, rx) = tokio::sync::oneshot::channel::<Outcome<i32>>();
    let op = Operation::spawn(runtime.handle(), async move {
        match rx.await {
            Ok(outcome) => outcome,
            Err(_) => Outcome::Canceled,
        }
    });
    (op, tx)
}

fn session<'a>(operation: &'a dyn StatusProbe, marquee: bool) -> ProgressSession<'a> {
    ProgressSession {
        operation,
        cancel: None,
        progress: None,
        marquee,
        hyperlink: None,
    }
}

#[test]
fn test_created_starts_marquee_when_requested() {
    let dlg = RecordingCommands::default();
    let op = Operation::finished(Outcome::Completed(1));
    let mut session = session(&op, true);

    let status = handle_progress_notification(&dlg, &Notification::Created, &mut session);

    assert_eq!(status, CallbackStatus::Proceed);
    assert_eq!(dlg.take(), vec![Command::StartMarquee]);
}

#[test]
fn test_created_without_marquee_issues_nothing() {
    let dlg = RecordingCommands::default();
    let op = Operation::finished(Outcome::Completed(1));
    let mut session = session(&op, false);

    handle_progress_notification(&dlg, &Notification::Created, &mut session);

    assert!(dlg.take().is_empty());
}

#[test]
fn test_timer_clicks_ok_on_completed() {
    let dlg = RecordingCommands::default();
    let op = Operation::finished(Outcome::Completed(1));
    let mut session = session(&op, true);

    let status = handle_progress_notification(&dlg, &Notification::Timer(400), &mut session);

    assert_eq!(status, CallbackStatus::Proceed);
    assert_eq!(dlg.take(), vec![Command::Click(DialogResult::Ok)]);
}

#[test]
fn test_timer_clicks_ok_on_faulted() {
    let dlg = RecordingCommands::default();
    let op: Operation<i32> = Operation::finished(Outcome::Faulted(anyhow!("boom")));
    let mut session = session(&op, true);

    handle_progress_notification(&dlg, &Notification::Timer(400), &mut session);

    // The fault itself is unwrapped after the modal call; the timer only
    // dismisses the dialog.
    assert_eq!(dlg.take(), vec![Command::Click(DialogResult::Ok)]);
}

#[test]
fn test_timer_clicks_cancel_on_canceled() {
    let dlg = RecordingCommands::default();
    let op: Operation<i32> = Operation::finished(Outcome::Canceled);
    let mut session = session(&op, true);

    handle_progress_notification(&dlg, &Notification::Timer(400), &mut session);

    assert_eq!(dlg.take(), vec![Command::Click(DialogResult::Cancel)]);
}

#[test]
fn test_timer_keeps_running_dialog_open_and_resets_marquee() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let dlg = RecordingCommands::default();
    let mut session = session(&op, true);

    let status = handle_progress_notification(&dlg, &Notification::Timer(200), &mut session);

    assert_eq!(status, CallbackStatus::Proceed);
    // Cosmetic marquee reset only; no click.
    assert_eq!(dlg.take(), vec![Command::SetPosition(0)]);
}

#[test]
fn test_timer_running_without_marquee_is_silent() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let dlg = RecordingCommands::default();
    let mut session = session(&op, false);

    handle_progress_notification(&dlg, &Notification::Timer(200), &mut session);

    assert!(dlg.take().is_empty());
}

#[test]
fn test_cancel_click_while_running_vetoes_and_signals() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let cancel = CancelSource::new();
    let dlg = RecordingCommands::default();
    let mut session = ProgressSession {
        operation: &op,
        cancel: Some(&cancel),
        progress: None,
        marquee: true,
        hyperlink: None,
    };

    let click = Notification::ButtonClicked(DialogResult::Cancel.raw());
    let status = handle_progress_notification(&dlg, &click, &mut session);

    assert_eq!(status, CallbackStatus::Veto);
    assert!(cancel.is_canceled());
    assert!(dlg.take().is_empty());

    // A second click while still running re-signals and vetoes again.
    let status = handle_progress_notification(&dlg, &click, &mut session);
    assert_eq!(status, CallbackStatus::Veto);
}

#[test]
fn test_cancel_click_after_cancellation_observed_allows_close() {
    let dlg = RecordingCommands::default();
    let op: Operation<i32> = Operation::finished(Outcome::Canceled);
    let cancel = CancelSource::new();
    let mut session = ProgressSession {
        operation: &op,
        cancel: Some(&cancel),
        progress: None,
        marquee: true,
        hyperlink: None,
    };

    let click = Notification::ButtonClicked(DialogResult::Cancel.raw());
    let status = handle_progress_notification(&dlg, &click, &mut session);

    assert_eq!(status, CallbackStatus::Proceed);
    // No further signal once the operation is already canceled.
    assert!(!cancel.is_canceled());
}

#[test]
fn test_cancel_click_without_sink_still_vetoes() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let dlg = RecordingCommands::default();
    let mut session = session(&op, true);

    let click = Notification::ButtonClicked(DialogResult::Cancel.raw());
    assert_eq!(
        handle_progress_notification(&dlg, &click, &mut session),
        CallbackStatus::Veto
    );
}

#[test]
fn test_non_cancel_button_clicks_proceed() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let dlg = RecordingCommands::default();
    let mut session = session(&op, true);

    let click = Notification::ButtonClicked(DialogResult::Ok.raw());
    assert_eq!(
        handle_progress_notification(&dlg, &click, &mut session),
        CallbackStatus::Proceed
    );
    assert!(dlg.take().is_empty());
}

#[test]
fn test_hyperlink_click_raises_observer() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let dlg = RecordingCommands::default();
    let mut seen = Vec::new();
    let mut observer = |link: &str| seen.push(link.to_string());
    let mut session = ProgressSession {
        operation: &op,
        cancel: None,
        progress: None,
        marquee: true,
        hyperlink: Some(&mut observer),
    };

    let status = handle_progress_notification(
        &dlg,
        &Notification::HyperlinkClicked("https://example.com/help".to_string()),
        &mut session,
    );

    assert_eq!(status, CallbackStatus::Proceed);
    drop(session);
    assert_eq!(seen, vec!["https://example.com/help".to_string()]);
}

#[test]
fn test_progress_with_only_content_pushes_only_content() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let progress = SharedProgress::new();
    progress.set_content("Step 2 of 5");

    let dlg = RecordingCommands::default();
    let mut session = ProgressSession {
        operation: &op,
        cancel: None,
        progress: Some(&progress),
        marquee: false,
        hyperlink: None,
    };

    handle_progress_notification(&dlg, &Notification::Timer(200), &mut session);

    assert_eq!(
        dlg.take(),
        vec![Command::UpdateText(
            DialogElement::Content,
            "Step 2 of 5".to_string()
        )]
    );
}

#[test]
fn test_progress_bar_pushes_range_then_position() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let progress = SharedProgress::new();
    progress.set_progress_bar(0, 100, 50);

    let dlg = RecordingCommands::default();
    let mut session = ProgressSession {
        operation: &op,
        cancel: None,
        progress: Some(&progress),
        marquee: false,
        hyperlink: None,
    };

    handle_progress_notification(&dlg, &Notification::Timer(200), &mut session);

    assert_eq!(
        dlg.take(),
        vec![Command::SetRange(0, 100), Command::SetPosition(50)]
    );
}

#[test]
fn test_progress_pushes_on_created_too() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let progress = SharedProgress::new();
    progress.set_main_instruction("Preparing");

    let dlg = RecordingCommands::default();
    let mut session = ProgressSession {
        operation: &op,
        cancel: None,
        progress: Some(&progress),
        marquee: false,
        hyperlink: None,
    };

    handle_progress_notification(&dlg, &Notification::Created, &mut session);

    assert_eq!(
        dlg.take(),
        vec![Command::UpdateText(
            DialogElement::MainInstruction,
            "Preparing".to_string()
        )]
    );
}

#[test]
fn test_unmodeled_notifications_are_ignored() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (op, _tx) = running_operation(&runtime);
    let dlg = RecordingCommands::default();
    let mut session = session(&op, true);

    for notification in [
        Notification::Navigated,
        Notification::Destroyed,
        Notification::DialogConstructed,
        Notification::RadioButtonClicked(200),
        Notification::VerificationClicked(true),
        Notification::Help,
        Notification::ExpandoButtonClicked(false),
        Notification::Other(99),
    ] {
        assert_eq!(
            handle_progress_notification(&dlg, &notification, &mut session),
            CallbackStatus::Proceed
        );
    }
    assert!(dlg.take().is_empty());
}

#[test]
fn test_cancellation_flow_end_to_end() {
    // Click cancel -> veto; worker observes the token and finishes canceled;
    // the next timer tick clicks cancel; the click after that is allowed.
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cancel = CancelSource::new();
    let mut token = cancel.token();
    let op: Operation<i32> = Operation::spawn(runtime.handle(), async move {
        token.canceled().await;
        Outcome::Canceled
    });

    let dlg = RecordingCommands::default();
    let mut session = ProgressSession {
        operation: &op,
        cancel: Some(&cancel),
        progress: None,
        marquee: true,
        hyperlink: None,
    };

    let click = Notification::ButtonClicked(DialogResult::Cancel.raw());
    assert_eq!(
        handle_progress_notification(&dlg, &click, &mut session),
        CallbackStatus::Veto
    );

    assert!(op.wait_timeout(Duration::from_secs(5)));

    handle_progress_notification(&dlg, &Notification::Timer(600), &mut session);
    assert_eq!(dlg.take(), vec![Command::Click(DialogResult::Cancel)]);

    assert_eq!(
        handle_progress_notification(&dlg, &click, &mut session),
        CallbackStatus::Proceed
    );
}
