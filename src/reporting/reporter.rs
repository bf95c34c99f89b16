//! Reporter: turns failures into logged error records and user replies.
//!
//! A reporter is built once at startup around an escalation chain it is given:
//!
//! ```text
//!   Reporter (caller scope) ──escalate──▶ Reporter (reporting scope) ──escalate──▶ terminal log
//! ```
//!
//! Failures about reporting (expired session, failed reply, misuse of
//! `report`) go one hop up the chain. Escalation reporters have no session,
//! so they never reply, and the last one only writes to the log. The chain is
//! built from already constructed reporters, so it is finite and error
//! reporting always terminates, however often delivery fails.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use futures::FutureExt;
use log::debug;

use crate::{
    commands::CommandFailure,
    reporting::{
        catalog::{Scope, keys},
        identity::IdentityContext,
        record::{Cause, ErrorContext, ErrorRecord, ReportOptions},
        sink::LogSink,
    },
    session::Session,
};

/// What is being reported.
#[derive(Debug)]
pub enum Failure {
    /// Nothing; reported as `EMPTY_ERROR`
    Empty,
    /// A key from the reporter's scope
    Key(String),
    /// An existing record, passed through unchanged
    Record(Arc<ErrorRecord>),
    /// A failure that was never reported, wrapped exactly once
    Foreign(Arc<anyhow::Error>),
}

impl From<&str> for Failure {
    fn from(key: &str) -> Self {
        Failure::from(key.to_owned())
    }
}

impl From<String> for Failure {
    fn from(key: String) -> Self {
        if key.is_empty() {
            Failure::Empty
        } else {
            Failure::Key(key)
        }
    }
}

impl From<Arc<ErrorRecord>> for Failure {
    fn from(record: Arc<ErrorRecord>) -> Self {
        Failure::Record(record)
    }
}

impl From<ErrorRecord> for Failure {
    fn from(record: ErrorRecord) -> Self {
        Failure::Record(Arc::new(record))
    }
}

impl From<anyhow::Error> for Failure {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<Arc<ErrorRecord>>() {
            Ok(record) => Failure::Record(record),
            Err(error) => Failure::Foreign(Arc::new(error)),
        }
    }
}

impl<T: Into<Failure>> From<Option<T>> for Failure {
    fn from(failure: Option<T>) -> Self {
        failure.map(Into::into).unwrap_or(Failure::Empty)
    }
}

/// Where a reporter sends failures about reporting.
#[derive(Clone)]
enum Escalation {
    /// Escalation reporter, one hop up
    Reporter(Arc<Reporter>),
    /// End of the chain: log only
    Terminal,
}

/// Reports failures for one scope, optionally bound to a session.
///
/// Cloning is cheap; binding a session or changing the scope creates a new
/// reporter sharing the same sink, identity context and escalation chain.
#[derive(Clone)]
pub struct Reporter {
    scope: Arc<Scope>,
    sink: Arc<dyn LogSink>,
    ids: &'static IdentityContext,
    session: Option<Arc<Session>>,
    escalation: Escalation,
}

impl Reporter {
    /// Creates the last reporter of an escalation chain.
    ///
    /// Failures about its own reporting are only written to `sink`.
    ///
    /// # Arguments
    ///
    /// * `scope` - The scope resolving messages and replies
    /// * `sink` - Where every record of the chain is logged
    /// * `ids` - The identity context numbering every record of the chain
    pub fn terminal(scope: Scope, sink: Arc<dyn LogSink>, ids: &'static IdentityContext) -> Self {
        Reporter {
            scope: Arc::new(scope),
            sink,
            ids,
            session: None,
            escalation: Escalation::Terminal,
        }
    }

    /// Creates a reporter for `scope` escalating to `escalation`.
    ///
    /// The new reporter logs to the sink of `escalation` and numbers its
    /// records from the same identity context. A session bound to
    /// `escalation` is dropped: escalation reporters never reply.
    ///
    /// # Arguments
    ///
    /// * `scope` - The scope resolving messages and replies
    /// * `escalation` - The reporter receiving failures about reporting
    ///
    /// # Examples
    ///
    /// ```text
    /// let ids = IdentityContext::init();
    /// let escalation = Reporter::terminal(Scope::reporting(), Arc::new(ErrorLogSink), ids);
    /// let reporter = Reporter::new(Scope::top_level(), escalation);
    /// ```
    pub fn new(scope: Scope, escalation: Reporter) -> Self {
        Reporter {
            scope: Arc::new(scope),
            sink: Arc::clone(&escalation.sink),
            ids: escalation.ids,
            session: None,
            escalation: Escalation::Reporter(Arc::new(Reporter {
                session: None,
                ..escalation
            })),
        }
    }

    /// Same reporter, reporting through another scope.
    pub fn scoped(&self, scope: Arc<Scope>) -> Self {
        Reporter {
            scope,
            ..self.clone()
        }
    }

    /// Same reporter, replying to `session`.
    pub fn bind(&self, session: Arc<Session>) -> Self {
        Reporter {
            session: Some(session),
            ..self.clone()
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Reports a failure: builds its record, logs it and answers the session.
    ///
    /// A record is answered at most once, however often it is reported.
    /// Never fails and never panics. A panic inside reporting is caught here
    /// and written to the sink together with the inspected arguments.
    pub async fn report(&self, failure: impl Into<Failure>, options: Option<ReportOptions>) {
        let failure = failure.into();

        let outcome = AssertUnwindSafe(self.try_report(&failure, options.as_ref()))
            .catch_unwind()
            .await;

        if let Err(panic) = outcome {
            self.backstop(&failure, options.as_ref(), panic.as_ref());
        }
    }

    /// Reports a failure returned by a command.
    ///
    /// A [`CommandFailure`] is reported as its key with its arguments, any
    /// other error as a foreign failure.
    pub async fn report_error(&self, error: anyhow::Error) {
        match error.downcast::<CommandFailure>() {
            Ok(failure) => {
                let options = ReportOptions::new().args(failure.args().iter().cloned());
                self.report(failure.key(), Some(options)).await
            }
            Err(error) => self.report(error, None).await,
        }
    }

    /// Builds and logs the record without answering any session.
    ///
    /// Used where there is nothing to reply to, such as command loading.
    pub fn record(
        &self,
        failure: impl Into<Failure>,
        options: Option<ReportOptions>,
    ) -> Option<Arc<ErrorRecord>> {
        let failure = failure.into();

        match panic::catch_unwind(AssertUnwindSafe(|| self.observe(&failure, options.as_ref()))) {
            Ok(record) => record,
            Err(panic) => {
                self.backstop(&failure, options.as_ref(), panic.as_ref());
                None
            }
        }
    }

    async fn try_report(&self, failure: &Failure, options: Option<&ReportOptions>) {
        let Some(record) = self.observe(failure, options) else {
            return;
        };
        let Some(session) = &self.session else {
            return;
        };
        if !record.mark_answered() {
            debug!("error {} already answered", record.id());
            return;
        }

        let reply = self.scope.reply_for(record.key()).to_owned();
        let delivery = session.gateway().deliver(&reply, &record, self).await;
        debug!(
            "error {} delivered through scope {}: {:?}",
            record.id(),
            self.scope.name(),
            delivery
        );
    }

    /// Resolves the record, attaches context and logs it.
    ///
    /// Returns `None` when the call itself was invalid and got escalated.
    fn observe(
        &self,
        failure: &Failure,
        options: Option<&ReportOptions>,
    ) -> Option<Arc<ErrorRecord>> {
        let record = match (failure, options) {
            (Failure::Empty, _) => {
                self.escalate(keys::EMPTY_ERROR, ReportOptions::new());
                return None;
            }
            (Failure::Record(record), Some(_)) => {
                self.escalate(
                    keys::TOO_MANY_ARGUMENTS,
                    ReportOptions::new().cause(Arc::clone(record)),
                );
                return None;
            }
            (Failure::Foreign(error), Some(_)) => {
                self.escalate(
                    keys::TOO_MANY_ARGUMENTS,
                    ReportOptions::new().cause(Cause::Foreign(Arc::clone(error))),
                );
                return None;
            }
            (Failure::Key(key), options) => {
                return Some(self.observe_key(key, options.cloned().unwrap_or_default()));
            }
            (Failure::Record(record), None) => Arc::clone(record),
            (Failure::Foreign(error), None) => Arc::new(ErrorRecord::wrap(
                self.ids,
                Cause::Foreign(Arc::clone(error)),
            )),
        };

        Some(self.settle(record))
    }

    fn observe_key(&self, key: &str, options: ReportOptions) -> Arc<ErrorRecord> {
        let record = ErrorRecord::new(self.ids, self.scope.messages(), Some(key), options);
        self.settle(Arc::new(record))
    }

    /// Attaches context and logs the record. A forced reply without session
    /// is escalated the first time the record is logged.
    fn settle(&self, record: Arc<ErrorRecord>) -> Arc<ErrorRecord> {
        record.attach_context(self.context());

        if self.log(&record) && record.forced_reply() && self.session.is_none() {
            self.escalate(
                keys::NO_INTERACTION,
                ReportOptions::new().primary(Arc::clone(&record)),
            );
        }

        record
    }

    /// Reports a failure about reporting one hop up the escalation chain.
    pub(crate) fn escalate(&self, key: &str, mut options: ReportOptions) {
        options.context.get_or_insert_with(|| self.context());

        match &self.escalation {
            Escalation::Reporter(reporter) => {
                reporter.observe_key(key, options);
            }
            Escalation::Terminal => {
                let record = ErrorRecord::new(self.ids, self.scope.messages(), Some(key), options);
                self.log(&record);
            }
        }
    }

    fn context(&self) -> ErrorContext {
        match &self.session {
            Some(session) => ErrorContext::from_session(session),
            None => ErrorContext::Global,
        }
    }

    /// Writes the record to the sink, once per record.
    ///
    /// Returns `false` if the record was already logged.
    fn log(&self, record: &ErrorRecord) -> bool {
        if !record.mark_logged() {
            debug!("error {} already logged", record.id());
            return false;
        }

        let context = record
            .context()
            .map(ToString::to_string)
            .unwrap_or_else(|| ErrorContext::Global.to_string());
        let stack = record
            .stack()
            .map(|stack| format!("\n{stack}"))
            .unwrap_or_default();

        self.sink.write(&format!(
            "{}. {}\n{}: {}{}\n",
            record.id(),
            context,
            record.name(),
            record.message(),
            stack
        ));
        debug!(
            "error {} logged through scope {} (args {:?}, cause depth {}, primary error {:?})",
            record.id(),
            self.scope.name(),
            record.args(),
            record.cause_depth(),
            record.primary().map(|primary| primary.id())
        );
        true
    }

    /// Last resort when reporting itself panicked. A failing sink is ignored.
    fn backstop(
        &self,
        failure: &Failure,
        options: Option<&ReportOptions>,
        panic: &(dyn Any + Send),
    ) {
        let line = format!(
            "Error reporter failed: {}\nInspected arguments:\n{:?}\n{:?}\n",
            panic_message(panic),
            failure,
            options
        );
        let _ = panic::catch_unwind(AssertUnwindSafe(|| self.sink.write(&line)));
    }
}

/// Extracts the message of a panic payload.
pub fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use anyhow::anyhow;

    use super::*;
    use crate::{
        session::ReplyState,
        testing::{FakeTransport, MemorySink, reporter, session},
    };

    #[tokio::test]
    async fn test_report_key_logs_formatted_line() {
        let (reporter, sink) = reporter(Scope::top_level());

        reporter
            .report(
                keys::UNKNOWN_COMMAND,
                Some(ReportOptions::new().arg("roll")),
            )
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        let id = lines[0].split('.').next().unwrap();
        assert!(id.parse::<u64>().is_ok());
        assert!(lines[0].ends_with(
            ". Global\nUNKNOWN_COMMAND: Attempted to call unknown command: roll\n"
        ));
    }

    #[tokio::test]
    async fn test_report_bound_session_logs_context_and_replies() {
        let transport = Arc::new(FakeTransport::new());
        let session = session("roll", &[], transport.clone());
        let (reporter, sink) = reporter(Scope::top_level());

        reporter
            .bind(session)
            .report(keys::UNKNOWN_COMMAND, Some(ReportOptions::new().arg("roll")))
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("alice (@alice:example.com) on Lobby during roll =>"));
        assert_eq!(
            transport.calls(),
            vec!["reply:⚠️ This command does not exist or not loaded yet."]
        );
        assert_eq!(transport.state(), ReplyState::Replied);
    }

    #[tokio::test]
    async fn test_report_unknown_key_uses_default_reply() {
        let transport = Arc::new(FakeTransport::with_state(ReplyState::Deferred));
        let (reporter, _sink) = reporter(Scope::top_level());

        reporter
            .bind(session("say", &[], transport.clone()))
            .report("SOMETHING_ELSE", None)
            .await;

        assert_eq!(
            transport.calls(),
            vec!["edit:❌ An error occurred while executing this command"]
        );
    }

    #[tokio::test]
    async fn test_report_empty_escalates() {
        let transport = Arc::new(FakeTransport::new());
        let (reporter, sink) = reporter(Scope::top_level());

        reporter
            .bind(session("ping", &[], transport.clone()))
            .report(Option::<&str>::None, None)
            .await;
        reporter.report("", None).await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.contains("EMPTY_ERROR: Attempt to send empty error")));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_report_record_with_options_is_too_many_arguments() {
        let (reporter, sink) = reporter(Scope::top_level());
        let record = Arc::new(ErrorRecord::wrap(IdentityContext::init(), anyhow!("boom")));

        reporter
            .report(Arc::clone(&record), Some(ReportOptions::new().arg("x")))
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("TOO_MANY_ARGUMENTS"));
        assert!(lines[0].contains("Cause: Non-wrapped error\nCause: boom"));
    }

    #[tokio::test]
    async fn test_report_foreign_with_options_is_too_many_arguments() {
        let (reporter, sink) = reporter(Scope::top_level());

        reporter
            .report(anyhow!("boom"), Some(ReportOptions::new()))
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("TOO_MANY_ARGUMENTS"));
        assert!(lines[0].contains("Cause: boom"));
    }

    #[test]
    fn test_rewrapping_does_not_grow_chain() {
        let (reporter, sink) = reporter(Scope::top_level());

        let first = reporter.record(anyhow!("disk full"), None).unwrap();
        assert_eq!(first.cause_depth(), 1);

        let again = reporter.record(Arc::clone(&first), None).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(again.cause_depth(), 1);

        let through_anyhow = reporter
            .record(anyhow::Error::new(Arc::clone(&first)), None)
            .unwrap();
        assert!(Arc::ptr_eq(&first, &through_anyhow));

        let fresh = reporter.record(anyhow!("another failure"), None).unwrap();
        assert_eq!(fresh.cause_depth(), 1);
        assert_ne!(fresh.id(), first.id());

        // The same record is only logged once
        assert_eq!(sink.lines().len(), 2);
    }

    #[tokio::test]
    async fn test_reporting_a_record_again_answers_once() {
        let transport = Arc::new(FakeTransport::new());
        let (reporter, sink) = reporter(Scope::top_level());
        let bound = reporter.bind(session("ping", &[], transport.clone()));

        let record = bound.record(anyhow!("boom"), None).unwrap();
        bound.report(Arc::clone(&record), None).await;
        bound.report(Arc::clone(&record), None).await;

        assert_eq!(sink.lines().len(), 1);
        assert_eq!(
            transport.calls(),
            vec!["reply:❌ An error occurred while executing this command"]
        );
    }

    #[tokio::test]
    async fn test_forced_reply_record_escalates_once() {
        let (reporter, sink) = reporter(Scope::top_level());

        let record = reporter
            .record("CRITICAL", Some(ReportOptions::new().forced_reply(true)))
            .unwrap();
        reporter.report(Arc::clone(&record), None).await;
        reporter.report(record, None).await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("NO_INTERACTION"));
    }

    #[tokio::test]
    async fn test_escalation_chain_is_injected() {
        let sink = Arc::new(MemorySink::default());
        let audit = Scope::new("audit")
            .message(keys::FAILED_REPLY, |_| "reply lost".to_owned());
        let escalation = Reporter::terminal(audit, sink.clone(), IdentityContext::init());
        let reporter = Reporter::new(Scope::top_level(), escalation);
        let transport = Arc::new(FakeTransport::new().failing());

        reporter
            .bind(session("ping", &[], transport))
            .report(anyhow!("handler broke"), None)
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("FAILED_REPLY: reply lost"));
    }

    #[tokio::test]
    async fn test_terminal_reporter_only_logs_its_escalations() {
        let sink = Arc::new(MemorySink::default());
        let terminal = Reporter::terminal(Scope::reporting(), sink.clone(), IdentityContext::init());
        let transport = Arc::new(FakeTransport::new());

        terminal
            .bind(session("ping", &[], transport.clone()))
            .report("", None)
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("EMPTY_ERROR: Attempt to send empty error"));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_reply_logs_twice() {
        let transport = Arc::new(FakeTransport::new().failing());
        let (reporter, sink) = reporter(Scope::top_level());

        reporter
            .bind(session("ping", &[], transport))
            .report(anyhow!("handler broke"), None)
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Error: Non-wrapped error\nCause: handler broke"));
        assert!(lines[1].contains("FAILED_REPLY"));
        let primary_id = lines[0].split('.').next().unwrap();
        assert!(lines[1].contains(&format!("Primary error: {}", primary_id)));
        // Escalated line keeps the session context
        assert!(lines[1].contains("during ping =>"));
    }

    #[tokio::test]
    async fn test_three_level_failure_terminates() {
        let transport = Arc::new(FakeTransport::new().failing());
        let (reporter, sink) = reporter(Scope::top_level());

        reporter
            .bind(session("ping", &[], transport.clone()))
            .report(
                "CRITICAL",
                Some(ReportOptions::new().forced_reply(true).arg("db down")),
            )
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("CRITICAL: db down"));
        assert!(lines[1].contains("FAILED_REPLY"));
        assert!(lines[2].contains("NO_INTERACTION"));
        assert_eq!(transport.calls(), vec!["reply-failed"]);
    }

    #[tokio::test]
    async fn test_repeated_delivery_failures_stay_bounded() {
        let transport = Arc::new(FakeTransport::new().failing());
        let (reporter, sink) = reporter(Scope::top_level());
        let bound = reporter.bind(session("ping", &[], transport));

        for _ in 0..10 {
            bound
                .report("CRITICAL", Some(ReportOptions::new().forced_reply(true)))
                .await;
        }

        assert_eq!(sink.lines().len(), 30);
    }

    #[tokio::test]
    async fn test_forced_reply_without_session() {
        let (reporter, sink) = reporter(Scope::top_level());

        reporter
            .report("CRITICAL", Some(ReportOptions::new().forced_reply(true)))
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("NO_INTERACTION"));
    }

    #[tokio::test]
    async fn test_expired_session_escalates() {
        let transport = Arc::new(FakeTransport::new().expired());
        let (reporter, sink) = reporter(Scope::top_level());

        reporter
            .bind(session("ping", &[], transport.clone()))
            .report(anyhow!("late failure"), None)
            .await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("EXPIRED_INTERACTION"));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_report_error_uses_command_failure_key() {
        let transport = Arc::new(FakeTransport::new());
        let scope = Scope::new("say")
            .message("MISSING_TEXT", |args| format!("nothing to say for {}", args[0]))
            .reply("MISSING_TEXT", "❌ Nothing to say");
        let (reporter, sink) = reporter(scope);

        reporter
            .bind(session("say", &[], transport.clone()))
            .report_error(CommandFailure::new("MISSING_TEXT").arg("alice").into())
            .await;

        assert!(sink.lines()[0].contains("MISSING_TEXT: nothing to say for alice"));
        assert_eq!(transport.calls(), vec!["reply:❌ Nothing to say"]);
    }

    fn chain(sink: Arc<dyn LogSink>) -> Reporter {
        let escalation = Reporter::terminal(Scope::reporting(), sink, IdentityContext::init());
        Reporter::new(Scope::top_level(), escalation)
    }

    /// Panics on its first write, records afterwards.
    struct FlakySink {
        writes: AtomicUsize,
        lines: Mutex<Vec<String>>,
    }

    impl LogSink for FlakySink {
        fn write(&self, line: &str) {
            if self.writes.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("sink exploded");
            }
            self.lines.lock().unwrap().push(line.to_owned());
        }
    }

    #[tokio::test]
    async fn test_backstop_catches_reporting_panic() {
        let sink = Arc::new(FlakySink {
            writes: AtomicUsize::new(0),
            lines: Mutex::new(Vec::new()),
        });
        let reporter = chain(sink.clone());

        reporter
            .report(keys::UNKNOWN_COMMAND, Some(ReportOptions::new().arg("zap")))
            .await;

        let lines = sink.lines.lock().unwrap().clone();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Error reporter failed: sink exploded"));
        assert!(lines[0].contains("Key(\"UNKNOWN_COMMAND\")"));
        assert!(lines[0].contains("zap"));
    }

    struct BrokenSink;

    impl LogSink for BrokenSink {
        fn write(&self, _line: &str) {
            panic!("no logging today");
        }
    }

    #[tokio::test]
    async fn test_backstop_survives_broken_sink() {
        let reporter = chain(Arc::new(BrokenSink));

        reporter.report(anyhow!("lost"), None).await;
        assert!(reporter.record("ANY", None).is_none());
    }

    #[tokio::test]
    async fn test_backstop_inspects_foreign_failure() {
        let sink = Arc::new(FlakySink {
            writes: AtomicUsize::new(0),
            lines: Mutex::new(Vec::new()),
        });
        let reporter = chain(sink.clone());

        reporter.report(anyhow!("quota exceeded"), None).await;

        let lines = sink.lines.lock().unwrap().clone();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Foreign"));
        assert!(lines[0].contains("quota exceeded"));
        assert!(lines[0].ends_with("\nNone\n"));
    }

    #[test]
    fn test_record_is_not_replied() {
        let (reporter, sink) = reporter(Scope::loading());

        let record = reporter
            .record(keys::MISSING_PATH, Some(ReportOptions::new().arg("ping")))
            .unwrap();

        assert_eq!(record.message(), "Missing path. ping");
        assert_eq!(record.context(), Some(&ErrorContext::Global));
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
