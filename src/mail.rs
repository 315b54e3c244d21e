//! Send stage: deliver compiled emails over SMTP.
//!
//! Intended for local testing against Mailpit (`localhost:1025`, no TLS, no
//! auth), but any SMTP relay works with `smtp.secure` and credentials.
//!
//! ## send-all selection
//!
//! ```text
//! include glob  (dist/*.html)
//!   − exclude globs  (dist/*.tokens.html)
//!   − token artifacts (always)
//!   − dotfiles
//!   = files, sorted
//! ```
//!
//! Each file is sent as one HTML message to all recipients. The subject comes
//! from the `<name>.subject.txt` sidecar, or the humanised file name when the
//! sidecar is missing or blank, with the configured prefix in front.

use crate::config::SmtpConfig;
use crate::metadata::{self, SUBJECT_KIND};
use crate::naming;
use glob::{MatchOptions, Pattern};
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Subject used by `send` when none is given.
pub const DEFAULT_SUBJECT: &str = "Test email";

#[derive(Error, Debug)]
pub enum SendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("At least one recipient is required via --to")]
    NoRecipients,
    #[error("invalid address '{value}': {source}")]
    Address {
        value: String,
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// A message ready for a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Delivers one message. Returns the server's message identifier.
pub trait Mailer {
    fn deliver(&self, email: &OutgoingEmail) -> Result<String, SendError>;
}

/// Blocking SMTP delivery through lettre.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, SendError> {
        let mut builder = if config.secure {
            SmtpTransport::relay(&config.host)?.port(config.port)
        } else {
            SmtpTransport::builder_dangerous(&config.host).port(config.port)
        };
        if let (Some(user), Some(pass)) = (&config.user, &config.pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(Self {
            transport: builder.build(),
        })
    }
}

impl Mailer for SmtpMailer {
    fn deliver(&self, email: &OutgoingEmail) -> Result<String, SendError> {
        let message = build_message(email)?;
        let response = self.transport.send(&message)?;
        Ok(response.message().next().unwrap_or_default().to_string())
    }
}

fn parse_mailbox(value: &str) -> Result<Mailbox, SendError> {
    value.parse().map_err(|source| SendError::Address {
        value: value.to_string(),
        source,
    })
}

/// Build the lettre message: HTML body, one `To` per recipient.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, SendError> {
    if email.to.is_empty() {
        return Err(SendError::NoRecipients);
    }
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(&email.subject);
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    Ok(builder
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())?)
}

/// Split every `--to` value on commas, trim, and drop empties.
pub fn parse_recipients<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Files matching `include` minus `exclude`, never token artifacts, sorted.
pub fn select_files(include: &str, exclude: &[String]) -> Result<Vec<PathBuf>, SendError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let excludes = exclude
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<Result<Vec<_>, _>>()?;

    let mut files: Vec<PathBuf> = glob::glob_with(include, options)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter(|path| !excludes.iter().any(|p| p.matches_path_with(path, options)))
        .filter(|path| {
            !path
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(naming::is_token_artifact)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Subject for an HTML file: sidecar, else humanised file stem.
pub fn subject_for(path: &Path) -> String {
    let dir = path.parent().unwrap_or(Path::new(""));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let sidecar = metadata::read_sidecar(&naming::sidecar_path(dir, stem, SUBJECT_KIND));
    let humanized = naming::humanize_name(stem);
    metadata::resolve(&[sidecar.as_deref(), Some(humanized.as_str())]).unwrap_or(humanized)
}

pub fn prefixed_subject(prefix: &str, subject: &str) -> String {
    format!("{prefix}{subject}").trim().to_string()
}

/// One file queued for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEmail {
    pub path: PathBuf,
    pub subject: String,
}

/// What `send-all` will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendPlan {
    /// Include pattern followed by `!`-prefixed excludes, for display.
    pub patterns: Vec<String>,
    pub recipients: Vec<String>,
    pub emails: Vec<PlannedEmail>,
}

/// Select files and resolve subjects.
///
/// No matching files is not an error. Matching files with no recipients is.
pub fn plan_send_all(
    include: &str,
    exclude: &[String],
    subject_prefix: &str,
    to: &[String],
) -> Result<SendPlan, SendError> {
    let patterns = std::iter::once(include.to_string())
        .chain(exclude.iter().map(|e| format!("!{e}")))
        .collect();
    let emails: Vec<PlannedEmail> = select_files(include, exclude)?
        .into_iter()
        .map(|path| {
            let subject = prefixed_subject(subject_prefix, &subject_for(&path));
            PlannedEmail { path, subject }
        })
        .collect();

    let recipients = parse_recipients(to);
    if !emails.is_empty() && recipients.is_empty() {
        return Err(SendError::NoRecipients);
    }
    Ok(SendPlan {
        patterns,
        recipients,
        emails,
    })
}

/// A delivered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub path: PathBuf,
    pub subject: String,
    pub message_id: String,
}

/// Send one HTML file.
pub fn send_file(
    path: &Path,
    to: &[String],
    subject: &str,
    from: &str,
    mailer: &dyn Mailer,
) -> Result<SentEmail, SendError> {
    let recipients = parse_recipients(to);
    if recipients.is_empty() {
        return Err(SendError::NoRecipients);
    }
    let email = OutgoingEmail {
        from: from.to_string(),
        to: recipients,
        subject: subject.to_string(),
        html: fs::read_to_string(path)?,
    };
    let message_id = mailer.deliver(&email)?;
    info!(file = %path.display(), %message_id, "sent");
    Ok(SentEmail {
        path: path.to_path_buf(),
        subject: email.subject,
        message_id,
    })
}

/// Deliver every planned file in order. Stops at the first failure.
pub fn deliver_all(
    plan: &SendPlan,
    from: &str,
    mailer: &dyn Mailer,
) -> Result<Vec<SentEmail>, SendError> {
    plan.emails
        .iter()
        .map(|planned| send_file(&planned.path, &plan.recipients, &planned.subject, from, mailer))
        .collect()
}
