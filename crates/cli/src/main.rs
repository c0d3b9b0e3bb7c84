mod render;

use std::fs;
use std::io::Read;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use hl7_toolchain_core::{
    AckCode, AckOptions, Delimiters, FindResult, MaskOptions, Segment, add_segment_linebreaks,
    check_required_fields, document, find_fields, generate_ack, mask_message,
    normalize_line_endings, render_message, split_batch,
};
use hl7_toolchain_diagnostics::{self as diag, Diagnostic, Severity};
use hl7_toolchain_schema::{SchemaTables, SchemaVersion};

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "hl7",
    version,
    about = "HL7 toolchain — parse, check, mask, and send HL7 v2.x messages"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// HL7 schema version for field names and required-field optionality.
    #[arg(long, global = true, default_value = "2.5", value_name = "VERSION")]
    hl7_version: SchemaVersion,

    /// Path to an external schema JSON file. When omitted, the builtin
    /// compact tables for the selected version are used.
    #[arg(long, global = true)]
    schema: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Message inspection (progressive: parse → find → check) ───────
    /// Decompose a message into schema-named fields and components.
    Parse {
        /// Message file, or `-` for stdin.
        file: String,
    },

    /// Find fields by location (`PID-3`) or description (`"Patient Name"`).
    Find {
        /// Message file, or `-` for stdin.
        file: String,
        /// A `SEG-N` location or a field-description search term.
        query: String,
    },

    /// Check required fields against the schema.
    Check {
        /// Message file, or `-` for stdin.
        file: String,
    },

    // ── Message transformation ───────────────────────────────────────
    /// Mask patient-identifying fields (PID, NK1, IN1, IN2, GT1).
    Mask {
        /// Message file, or `-` for stdin.
        file: String,
        /// Mask character.
        #[arg(long, default_value_t = '*')]
        mask_char: char,
        /// Write the masked message back to the file (in-place).
        #[arg(long, short)]
        write: bool,
    },

    /// Split a batch file (FHS/BHS wrapped) into individual messages.
    Split {
        /// Batch file, or `-` for stdin.
        file: String,
        /// Write each message to `<out-dir>/message_NNNN.hl7` instead of
        /// printing.
        #[arg(long)]
        out_dir: Option<String>,
    },

    /// Normalize line endings to `\r` and restore lost segment breaks.
    Normalize {
        /// Message file, or `-` for stdin.
        file: String,
        /// Write the normalized message back to the file (in-place).
        #[arg(long, short)]
        write: bool,
    },

    // ── Acknowledgment & transport ───────────────────────────────────
    /// Generate the MLLP-framed ACK reply for a message.
    Ack {
        /// Message file, or `-` for stdin.
        file: String,
        /// Acknowledgment code for MSA-1.
        #[arg(long, default_value = "CA")]
        code: AckCode,
    },

    /// Send a message (or batch) to an MLLP interface and print replies.
    #[cfg(feature = "tcp")]
    Send {
        /// Message file, or `-` for stdin.
        file: String,
        /// Interface address: `host`, `host:port`, or IP (port defaults
        /// to 2575).
        #[arg(long)]
        addr: String,
    },

    /// Listen for MLLP messages and reply with ACKs.
    #[cfg(feature = "tcp")]
    Listen {
        /// Bind address, e.g. `0.0.0.0:2575`.
        #[arg(long)]
        addr: String,
        /// Acknowledgment code to reply with.
        #[arg(long, default_value = "CA")]
        code: AckCode,
    },

    // ── Reference / informational ────────────────────────────────────
    /// Explain a diagnostic ID (e.g. HL72001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());
    let schema = resolve_schema(cli.hl7_version, cli.schema.as_deref())?;

    match cli.cmd {
        Cmd::Parse { file } => cmd_parse(&file, &schema, format)?,
        Cmd::Find { file, query } => cmd_find(&file, &query, &schema, format)?,
        Cmd::Check { file } => cmd_check(&file, &schema, format)?,
        Cmd::Mask {
            file,
            mask_char,
            write,
        } => cmd_mask(&file, mask_char, write)?,
        Cmd::Split { file, out_dir } => cmd_split(&file, out_dir.as_deref(), format)?,
        Cmd::Normalize { file, write } => cmd_normalize(&file, write)?,
        Cmd::Ack { file, code } => cmd_ack(&file, code, format)?,
        #[cfg(feature = "tcp")]
        Cmd::Send { file, addr } => cmd_send(&file, &addr, format)?,
        #[cfg(feature = "tcp")]
        Cmd::Listen { addr, code } => cmd_listen(&addr, code)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(file).with_context(|| format!("failed to read {file}"))
    }
}

fn write_output(file: &str, write: bool, output: &str) -> Result<()> {
    if write {
        if file == "-" {
            bail!("--write requires a file path, not stdin");
        }
        fs::write(file, output).with_context(|| format!("failed to write {file}"))?;
        eprintln!("wrote {file}");
    } else {
        print!("{output}");
    }
    Ok(())
}

fn resolve_schema(version: SchemaVersion, path: Option<&str>) -> Result<SchemaTables> {
    match path {
        Some(p) => {
            let json =
                fs::read_to_string(p).with_context(|| format!("failed to read schema {p}"))?;
            let mut tables = SchemaTables::from_json(&json)
                .with_context(|| format!("failed to parse schema {p}"))?;
            tables.version = version;
            Ok(tables)
        }
        None => Ok(SchemaTables::builtin(version)),
    }
}

/// Exit with status 1 when any error-severity diagnostic is present.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(file: &str, schema: &SchemaTables, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let delims = Delimiters::from_message(&input);

    match format {
        Format::Json => {
            let segments: Vec<Segment> = document::lines(&input)
                .filter(|(_, line)| document::segment_name(line, &delims).is_some())
                .map(|(_, line)| Segment::parse(line, &delims, schema))
                .collect();
            let out = serde_json::json!({
                "version": schema.version,
                "segments": segments,
            });
            println!("{}", hl7_toolchain_core::to_pretty_json(&out));
        }
        Format::Pretty => {
            print!("{}", render_message(&input, &delims, schema));
        }
    }
    Ok(())
}

fn cmd_find(file: &str, query: &str, schema: &SchemaTables, format: Format) -> Result<()> {
    let input = read_input(file)?;

    match find_fields(&input, query, schema) {
        FindResult::InvalidQuery => {
            let diagnostic = Diagnostic::error(
                diag::codes::INVALID_LOCATION,
                format!("{query:?} is not a usable location or search term"),
                None,
            );
            render_diagnostics(&input, file, std::slice::from_ref(&diagnostic), format);
            process::exit(1);
        }
        FindResult::Found(occurrences) => match format {
            Format::Json => {
                let out = serde_json::json!({
                    "query": query,
                    "occurrences": occurrences,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Format::Pretty => {
                if occurrences.is_empty() {
                    let diagnostic = Diagnostic::info(
                        diag::codes::LOCATION_NOT_FOUND,
                        format!("no fields matching {query:?} in this message"),
                        None,
                    );
                    render_diagnostics(&input, file, std::slice::from_ref(&diagnostic), format);
                } else {
                    for hit in &occurrences {
                        println!("{}:{} {}: {}", file, hit.line + 1, hit.location, hit.value);
                    }
                }
            }
        },
    }
    Ok(())
}

fn cmd_check(file: &str, schema: &SchemaTables, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let result = check_required_fields(&input, schema);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": result.ok,
                "missing": result.missing,
                "issues": result.issues,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics(&input, file, &result.issues, format);
            print_summary(&result.issues);
            if result.ok {
                eprintln!("all required fields present");
            }
        }
    }

    exit_on_errors(&result.issues);
    Ok(())
}

fn cmd_mask(file: &str, mask_char: char, write: bool) -> Result<()> {
    let input = read_input(file)?;
    let delims = Delimiters::from_message(&input);
    let masked = mask_message(&input, &delims, &MaskOptions { mask_char });
    write_output(file, write, &masked)
}

fn cmd_split(file: &str, out_dir: Option<&str>, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let delims = Delimiters::from_message(&input);
    let messages = split_batch(&input, &delims);

    match out_dir {
        Some(dir) => {
            fs::create_dir_all(dir).with_context(|| format!("failed to create {dir}"))?;
            for (i, message) in messages.iter().enumerate() {
                let path = format!("{dir}/message_{:04}.hl7", i + 1);
                fs::write(&path, message).with_context(|| format!("failed to write {path}"))?;
            }
            eprintln!("wrote {} messages to {dir}", messages.len());
        }
        None => match format {
            Format::Json => {
                let out = serde_json::json!({ "messages": messages });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Format::Pretty => {
                for message in &messages {
                    println!("{message}");
                    println!();
                }
            }
        },
    }
    Ok(())
}

fn cmd_normalize(file: &str, write: bool) -> Result<()> {
    let input = read_input(file)?;
    let delims = Delimiters::from_message(&input);
    let normalized = add_segment_linebreaks(&normalize_line_endings(&input), &delims);
    write_output(file, write, &normalized)
}

fn cmd_ack(file: &str, code: AckCode, format: Format) -> Result<()> {
    let input = read_input(file)?;
    let ack = generate_ack(&input, &AckOptions { code });

    if ack.is_empty() {
        let diagnostic = Diagnostic::error(
            diag::codes::MALFORMED_HEADER,
            "message has no MSH header with at least 12 fields; no ACK generated",
            None,
        );
        render_diagnostics(&input, file, std::slice::from_ref(&diagnostic), format);
        process::exit(1);
    }

    print!("{ack}");
    Ok(())
}

#[cfg(feature = "tcp")]
fn cmd_send(file: &str, addr: &str, format: Format) -> Result<()> {
    use std::ops::ControlFlow;

    use hl7_toolchain_net::{MllpClient, NetConfig, send_batch_with_replies};

    let input = read_input(file)?;
    let delims = Delimiters::from_message(&input);
    let mut messages = split_batch(&input, &delims);
    if messages.is_empty() {
        // Not a batch: send the whole input as one message.
        messages.push(normalize_line_endings(input.trim_end()));
    }

    let mut client = MllpClient::connect(addr, NetConfig::default())
        .with_context(|| format!("failed to connect to {addr}"))?;

    let mut replies: Vec<String> = Vec::new();
    let result = send_batch_with_replies(&mut client, &messages, |progress| {
        if let Some(reply) = &progress.reply {
            if format == Format::Pretty {
                eprintln!("{}/{}: {}", progress.sent, progress.total, reply);
            }
            replies.push(reply.clone());
        }
        ControlFlow::Continue(())
    })
    .with_context(|| format!("send to {addr} failed"))?;

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "sent": result.sent,
                "total": result.total,
                "replies": replies,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            eprintln!("sent {}/{} messages", result.sent, result.total);
        }
    }
    Ok(())
}

#[cfg(feature = "tcp")]
fn cmd_listen(addr: &str, code: AckCode) -> Result<()> {
    use hl7_toolchain_net::{MllpListener, NetConfig};

    let listener = MllpListener::bind(addr, NetConfig::default())
        .with_context(|| format!("failed to bind {addr}"))?;
    eprintln!(
        "listening on {} (replying {code})",
        listener.local_addr().map_err(anyhow::Error::from)?
    );

    let options = AckOptions { code };
    listener
        .run(|message| {
            let ack = hl7_toolchain_core::build_ack(message, &options);
            if ack.is_empty() {
                log::warn!("received message with a malformed MSH; not replying");
                None
            } else {
                Some(ack)
            }
        })
        .map_err(anyhow::Error::from)?;
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    let id = id.to_ascii_uppercase();
    match diag::explain(&id) {
        Some(text) => match format {
            Format::Json => {
                let out = serde_json::json!({ "id": id, "explanation": text });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Format::Pretty => {
                println!("{id}: {text}");
            }
        },
        None => {
            bail!("unknown diagnostic ID: {id}");
        }
    }
    Ok(())
}
