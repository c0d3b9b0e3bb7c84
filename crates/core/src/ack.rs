//! ACK (acknowledgment) message construction.
//!
//! Builds the minimal MLLP-framed reply for a received message: an MSH with
//! the sender and receiver swapped, a fresh timestamp, the message type
//! fixed to `ACK^<original trigger event>`, and an MSA carrying the
//! configured acknowledgment code plus the original control ID. A message
//! whose MSH carries fewer than 12 delimited fields gets no reply — the
//! generator returns the empty string and the caller must not send
//! anything.

use chrono::Local;

use crate::delim::Delimiters;
use crate::document;

/// MLLP start-of-message byte (VT).
pub const MLLP_START: char = '\x0B';
/// First byte of the MLLP end-of-message pair (FS).
pub const MLLP_END: char = '\x1C';
/// Second byte of the MLLP end-of-message pair (CR).
pub const MLLP_CR: char = '\r';

/// HL7 acknowledgment codes for MSA-1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AckCode {
    /// `CA` — commit accept (the default).
    #[default]
    CommitAccept,
    /// `CE` — commit error.
    CommitError,
    /// `CR` — commit reject.
    CommitReject,
    /// `AA` — application accept.
    ApplicationAccept,
    /// `AE` — application error.
    ApplicationError,
    /// `AR` — application reject.
    ApplicationReject,
}

impl AckCode {
    /// The two-letter wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AckCode::CommitAccept => "CA",
            AckCode::CommitError => "CE",
            AckCode::CommitReject => "CR",
            AckCode::ApplicationAccept => "AA",
            AckCode::ApplicationError => "AE",
            AckCode::ApplicationReject => "AR",
        }
    }
}

impl std::fmt::Display for AckCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AckCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CA" => Ok(AckCode::CommitAccept),
            "CE" => Ok(AckCode::CommitError),
            "CR" => Ok(AckCode::CommitReject),
            "AA" => Ok(AckCode::ApplicationAccept),
            "AE" => Ok(AckCode::ApplicationError),
            "AR" => Ok(AckCode::ApplicationReject),
            other => Err(format!("unknown acknowledgment code: {other:?}")),
        }
    }
}

/// Options for ACK generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckOptions {
    /// The MSA-1 acknowledgment code to reply with.
    pub code: AckCode,
}

/// Build the MLLP-framed ACK for a received message.
///
/// [`build_ack`] wrapped in VT … FS CR framing. The empty-string sentinel
/// passes through unframed so "do not reply" stays unmistakable.
pub fn generate_ack(message: &str, opts: &AckOptions) -> String {
    let body = build_ack(message, opts);
    if body.is_empty() {
        body
    } else {
        format!("{MLLP_START}{body}{MLLP_END}{MLLP_CR}")
    }
}

/// Build the unframed ACK for a received message.
///
/// Delimiters are resolved from the message itself and the reply is encoded
/// with the same set. Returns the empty string — meaning "do not reply" —
/// when the message has no MSH line or its MSH has fewer than 12 delimited
/// fields (the reply needs the version ID in MSH-12).
pub fn build_ack(message: &str, opts: &AckOptions) -> String {
    let delims = Delimiters::from_message(message);
    let Some(msh) = document::lines(message)
        .map(|(_, line)| line)
        .find(|line| {
            line.get(..3)
                .is_some_and(|head| head.eq_ignore_ascii_case("MSH"))
        })
    else {
        return String::new();
    };

    // fields[n] is MSH-(n+1): the name token counts as MSH-1 here because
    // the real MSH-1 (the delimiter) was consumed by the split.
    let fields: Vec<&str> = msh.split(delims.field).collect();
    if fields.len() < 12 {
        return String::new();
    }

    let sending_application = fields[2];
    let sending_facility = fields[3];
    let receiving_application = fields[4];
    let receiving_facility = fields[5];
    let message_type = fields[8];
    let control_id = fields[9];
    let version = fields[11];

    let trigger_event = message_type
        .split(delims.component)
        .nth(1)
        .unwrap_or_default();
    let ack_type = if trigger_event.is_empty() {
        "ACK".to_string()
    } else {
        format!("ACK{}{}", delims.component, trigger_event)
    };

    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    let f = delims.field;
    let encoding = delims.encoding_characters();
    let code = opts.code.as_str();

    format!(
        "MSH{f}{encoding}{f}{receiving_application}{f}{receiving_facility}\
         {f}{sending_application}{f}{sending_facility}{f}{timestamp}{f}{f}{ack_type}\
         {f}{control_id}{f}P{f}{version}\r\
         MSA{f}{code}{f}{control_id}"
    )
}
