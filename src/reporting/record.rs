//! Error records: one immutable description per observed failure.

use std::{
    backtrace::BacktraceStatus,
    error::Error,
    fmt,
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    reporting::{catalog::MessageCatalog, identity::IdentityContext},
    session::Session,
};

/// Where a failure was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
    /// Outside of any session
    Global,
    /// During a session
    Session {
        username: String,
        user_id: String,
        group: String,
        command: String,
    },
}

impl ErrorContext {
    /// Snapshots the actor, group and command of a session.
    pub fn from_session(session: &Session) -> Self {
        let actor = session.actor();
        ErrorContext::Session {
            username: actor.name.clone(),
            user_id: actor.id.clone(),
            group: session
                .group()
                .map(|group| group.name.clone())
                .unwrap_or_else(|| "DM".to_owned()),
            command: session.command_name().to_owned(),
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorContext::Global => write!(f, "Global"),
            ErrorContext::Session {
                username,
                user_id,
                group,
                command,
            } => write!(f, "{username} ({user_id}) on {group} during {command} =>"),
        }
    }
}

/// What an error record wraps.
#[derive(Debug, Clone)]
pub enum Cause {
    /// An earlier error record
    Record(Arc<ErrorRecord>),
    /// A failure that never went through a reporter
    Foreign(Arc<anyhow::Error>),
}

impl Cause {
    pub fn message(&self) -> String {
        match self {
            Cause::Record(record) => record.message().to_owned(),
            Cause::Foreign(error) => format!("{error:#}"),
        }
    }

    /// Number of links from here to the end of the cause chain.
    pub fn depth(&self) -> usize {
        match self {
            Cause::Record(record) => 1 + record.cause_depth(),
            Cause::Foreign(_) => 1,
        }
    }
}

impl From<Arc<ErrorRecord>> for Cause {
    fn from(record: Arc<ErrorRecord>) -> Self {
        Cause::Record(record)
    }
}

impl From<anyhow::Error> for Cause {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<Arc<ErrorRecord>>() {
            Ok(record) => Cause::Record(record),
            Err(error) => Cause::Foreign(Arc::new(error)),
        }
    }
}

/// Options used to build an error record.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Raw text appended to the catalog message
    pub message: Option<String>,
    /// Failure wrapped by the record
    pub cause: Option<Cause>,
    /// Failure the record is about, kept for correlation only
    pub primary: Option<Arc<ErrorRecord>>,
    /// The record must reach the user
    pub forced_reply: bool,
    /// Arguments given to the catalog formatter
    pub args: Vec<String>,
    /// Context to use instead of the reporter's
    pub context: Option<ErrorContext>,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn primary(mut self, primary: Arc<ErrorRecord>) -> Self {
        self.primary = Some(primary);
        self
    }

    pub fn forced_reply(mut self, forced_reply: bool) -> Self {
        self.forced_reply = forced_reply;
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Description of one observed failure.
///
/// A record is built exactly once per failure and never changes afterwards,
/// except that its context may be attached later when it was not known at
/// construction time.
#[derive(Debug)]
pub struct ErrorRecord {
    id: u64,
    key: Option<String>,
    message: String,
    cause: Option<Cause>,
    primary: Option<Arc<ErrorRecord>>,
    forced_reply: bool,
    args: Vec<String>,
    context: OnceLock<ErrorContext>,
    /// Set once the record has been written to the log sink
    logged: AtomicBool,
    /// Set once a reply about the record has been attempted
    answered: AtomicBool,
}

impl ErrorRecord {
    /// Builds a record, resolving its message from `messages`.
    ///
    /// The message is the catalog text for `key`, followed by the raw message,
    /// then one line for the cause and one for the primary error. A record
    /// without a key and without any text is labelled "Non-wrapped error".
    ///
    /// # Arguments
    ///
    /// * `ids` - The identity context allocating the record's id
    /// * `messages` - The catalog formatting the message for `key`
    /// * `key` - The error key, `None` for wrapped failures
    /// * `options` - Cause, primary error, arguments and context of the record
    pub fn new(
        ids: &IdentityContext,
        messages: &MessageCatalog,
        key: Option<&str>,
        options: ReportOptions,
    ) -> Self {
        let ReportOptions {
            message: raw,
            cause,
            primary,
            forced_reply,
            args,
            context,
        } = options;

        let mut message = key
            .map(|key| messages.format(key, &args))
            .unwrap_or_default();
        if let Some(raw) = raw {
            message.push_str(&raw);
        }
        if key.is_none() && message.is_empty() {
            message.push_str("Non-wrapped error");
        }
        if let Some(cause) = &cause {
            message.push_str(&format!("\nCause: {}", cause.message()));
        }
        if let Some(primary) = &primary {
            message.push_str(&format!("\nPrimary error: {}", primary.id()));
        }

        let context = match context {
            Some(context) => OnceLock::from(context),
            None => OnceLock::new(),
        };

        ErrorRecord {
            id: ids.allocate(),
            key: key.map(str::to_owned),
            message,
            cause,
            primary,
            forced_reply,
            args,
            context,
            logged: AtomicBool::new(false),
            answered: AtomicBool::new(false),
        }
    }

    /// Wraps a failure that has no key.
    pub fn wrap(ids: &IdentityContext, cause: impl Into<Cause>) -> Self {
        ErrorRecord::new(
            ids,
            &MessageCatalog::default(),
            None,
            ReportOptions::new().cause(cause),
        )
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Key, or a generic label for unkeyed records.
    pub fn name(&self) -> &str {
        self.key().unwrap_or("Error")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn primary(&self) -> Option<&Arc<ErrorRecord>> {
        self.primary.as_ref()
    }

    pub fn forced_reply(&self) -> bool {
        self.forced_reply
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.get()
    }

    /// Attaches `context` unless the record already has one.
    pub fn attach_context(&self, context: ErrorContext) {
        let _ = self.context.set(context);
    }

    /// Length of the cause chain below this record.
    pub fn cause_depth(&self) -> usize {
        self.cause().map(Cause::depth).unwrap_or(0)
    }

    /// Captured backtrace of the innermost foreign cause, if any.
    pub fn stack(&self) -> Option<String> {
        match self.cause()? {
            Cause::Record(record) => record.stack(),
            Cause::Foreign(error) => {
                let backtrace = error.backtrace();
                (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string())
            }
        }
    }

    /// Marks the record as logged. Returns `false` if it already was.
    pub(crate) fn mark_logged(&self) -> bool {
        !self.logged.swap(true, Ordering::AcqRel)
    }

    /// Marks the record as answered. Returns `false` if a reply was already
    /// attempted for it.
    pub(crate) fn mark_answered(&self) -> bool {
        !self.answered.swap(true, Ordering::AcqRel)
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.message)
    }
}

impl Error for ErrorRecord {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.cause()? {
            Cause::Record(record) => Some(&**record),
            Cause::Foreign(error) => {
                let error: &anyhow::Error = error;
                Some(&**error)
            }
        }
    }
}
