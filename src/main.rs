//! Purpose: `fanbox` CLI entry point: decode saved responses, render posts, fetch endpoints.
//! Role: Binary crate root; parses args, runs one command, writes results to stdout.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Decode/render diagnostics are emitted as notices on stderr, never stdout.
//! Invariants: Process exit code is derived from `to_exit_code`.
#![allow(clippy::result_large_err)]
use std::error::Error as StdError;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

use fanbox::api::session::SESSION_ENV;
use fanbox::api::{FanboxClient, resolve_session};
use fanbox::model::response::{
    BellCountResponse, CommentListResponse, CountResponse, CreatorListResponse, CreatorResponse,
    PaymentListResponse, PlanListResponse, PostInfoResponse, PostListCreatorResponse,
    PostPaginateResponse, TagListResponse,
};
use fanbox::notice::{Notice, notice_json};
use fanbox::{
    Decode, Diagnostic, Diagnostics, Encode, Error, ErrorKind, decode, decode_str, encode,
    render_markdown_with, to_exit_code,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `fanbox --help`."));
            }
        },
    };

    match cli.command {
        Command::Decode { kind, input } => {
            let raw = read_input(&input)?;
            let value: Value = serde_json::from_str(&raw).map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message(format!("{} is not valid json", input_label(&input)))
                    .with_source(err)
            })?;
            let (encoded, diagnostics) = kind.reencode(value)?;
            emit_notices("decode", &diagnostics);
            emit_json(&encoded);
        }
        Command::Render { input, creator } => {
            let raw = read_input(&input)?;
            let decoded = decode_str::<PostInfoResponse>(&raw)?;
            emit_notices("render", &decoded.diagnostics);
            let post = decoded.node.body;
            let body = post.body.as_present().ok_or_else(|| {
                Error::new(ErrorKind::Render)
                    .with_node("PostInfo")
                    .with_message(format!("post {} has no body", post.id))
                    .with_hint("Restricted posts come back without a body; check the plan fee.")
            })?;
            let mut diags = Diagnostics::new();
            let markdown = render_markdown_with(body, &creator, &mut diags)?;
            emit_notices("render", diags.as_slice());
            print!("{markdown}");
        }
        Command::Get {
            endpoint,
            query,
            session,
            cookie_file,
        } => {
            let query = query
                .iter()
                .map(|pair| parse_query_arg(pair))
                .collect::<Result<Vec<_>, _>>()?;
            let env = std::env::var(SESSION_ENV).ok();
            let (session_id, source) =
                resolve_session(session.as_deref(), env.as_deref(), cookie_file.as_deref())?;
            tracing::debug!(source = ?source, "resolved session");
            let client = FanboxClient::new(session_id)?;
            let value = client.get_json(&endpoint, &query)?;
            emit_json(&value);
        }
    }
    Ok(RunOutcome::ok())
}

#[derive(Parser)]
#[command(
    name = "fanbox",
    version,
    about = "Decode, render, and fetch pixivFANBOX API responses",
    long_about = None,
    after_help = r#"EXAMPLES
  $ fanbox get /post.info --query postId=1234567 > post.json
  $ fanbox decode post-info post.json
  $ fanbox render post.json --creator mika > post.md

Set FANBOXSESSID (or pass --session) to authenticate `get`."#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Decode a saved response and print it re-encoded")]
    Decode {
        #[arg(value_enum, help = "Response kind to decode as")]
        kind: ResponseKind,
        #[arg(default_value = "-", help = "Input file, or - for stdin", value_hint = ValueHint::FilePath)]
        input: String,
    },
    #[command(about = "Render the body of a saved post.info response as markdown")]
    Render {
        #[arg(default_value = "-", help = "Input file, or - for stdin", value_hint = ValueHint::FilePath)]
        input: String,
        #[arg(long, help = "Creator id used for post links")]
        creator: String,
    },
    #[command(about = "Fetch an endpoint and print the raw JSON")]
    Get {
        #[arg(help = "API path (/post.info) or absolute URL")]
        endpoint: String,
        #[arg(long, value_name = "KEY=VALUE", help = "Query parameter (repeatable)")]
        query: Vec<String>,
        #[arg(long, help = "Session id (default: $FANBOXSESSID, then the cookie file)")]
        session: Option<String>,
        #[arg(
            long,
            help = "Cookie file (default: ~/.fanbox/cookie.json)",
            value_hint = ValueHint::FilePath
        )]
        cookie_file: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ResponseKind {
    PostInfo,
    PostList,
    PostPaginate,
    Comments,
    Creator,
    Creators,
    Plans,
    Tags,
    Bell,
    Count,
    Payments,
}

impl ResponseKind {
    fn reencode(self, value: Value) -> Result<(Value, Vec<Diagnostic>), Error> {
        match self {
            ResponseKind::PostInfo => reencode::<PostInfoResponse>(value),
            ResponseKind::PostList => reencode::<PostListCreatorResponse>(value),
            ResponseKind::PostPaginate => reencode::<PostPaginateResponse>(value),
            ResponseKind::Comments => reencode::<CommentListResponse>(value),
            ResponseKind::Creator => reencode::<CreatorResponse>(value),
            ResponseKind::Creators => reencode::<CreatorListResponse>(value),
            ResponseKind::Plans => reencode::<PlanListResponse>(value),
            ResponseKind::Tags => reencode::<TagListResponse>(value),
            ResponseKind::Bell => reencode::<BellCountResponse>(value),
            ResponseKind::Count => reencode::<CountResponse>(value),
            ResponseKind::Payments => reencode::<PaymentListResponse>(value),
        }
    }
}

fn reencode<T: Decode + Encode>(value: Value) -> Result<(Value, Vec<Diagnostic>), Error> {
    let decoded = decode::<T>(value)?;
    Ok((encode(&decoded.node), decoded.diagnostics))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(input: &str) -> Result<String, Error> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read stdin")
                .with_source(err)
        })?;
        return Ok(buf);
    }
    let path = Path::new(input);
    std::fs::read_to_string(path).map_err(|err| {
        let kind = if err.kind() == io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Io
        };
        Error::new(kind)
            .with_message(format!("failed to read {}", path.display()))
            .with_source(err)
    })
}

fn input_label(input: &str) -> &str {
    if input == "-" { "stdin" } else { input }
}

fn parse_query_arg(pair: &str) -> Result<(&str, &str), Error> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => Err(Error::new(ErrorKind::Usage)
            .with_message(format!("invalid --query `{pair}`"))
            .with_hint("Use --query key=value, e.g. --query creatorId=mika.")),
    }
}

fn emit_json(value: &Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn notice_time_now() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

fn emit_notices(cmd: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let time = notice_time_now();
    let is_tty = io::stderr().is_terminal();
    for diagnostic in diagnostics {
        let notice = Notice::from_diagnostic(diagnostic, cmd, &time);
        if is_tty {
            eprintln!(
                "{} {}",
                colorize_label("notice:", use_color(), AnsiColor::Yellow),
                notice.message
            );
            continue;
        }
        let json = serde_json::to_string(&notice_json(&notice)).unwrap_or_else(|_| {
            "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
        });
        eprintln!("{json}");
    }
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err, use_color()));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::Schema => "response does not match the expected schema".to_string(),
        ErrorKind::Render => "post body could not be rendered".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(node) = err.node() {
        inner.insert("node".to_string(), json!(node));
    }
    if let Some(field) = err.field() {
        inner.insert("field".to_string(), json!(field));
    }
    if let Some(discriminant) = err.discriminant() {
        inner.insert("type".to_string(), json!(discriminant));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(node) = err.node() {
        lines.push(format!(
            "{} {node}",
            colorize_label("node:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(field) = err.field() {
        lines.push(format!(
            "{} {field}",
            colorize_label("field:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(discriminant) = err.discriminant() {
        lines.push(format!(
            "{} {discriminant}",
            colorize_label("type:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[cfg(test)]
mod tests {
    use super::{ResponseKind, error_json, parse_query_arg};
    use fanbox::{Error, ErrorKind};
    use serde_json::json;

    #[test]
    fn query_args_split_on_first_equals() {
        assert_eq!(
            parse_query_arg("maxPublishedDatetime=2024-01-01 00:00:00").expect("pair"),
            ("maxPublishedDatetime", "2024-01-01 00:00:00")
        );
        assert_eq!(parse_query_arg("k=a=b").expect("pair"), ("k", "a=b"));
        let err = parse_query_arg("=x").expect_err("empty key");
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn error_json_carries_schema_context() {
        let err = Error::schema("PostItem", "missing required field")
            .with_field("id")
            .with_field("0")
            .with_field("items");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], json!("Schema"));
        assert_eq!(value["error"]["node"], json!("PostItem"));
        assert_eq!(value["error"]["field"], json!("items.0.id"));
    }

    #[test]
    fn decode_kind_reencodes_count() {
        let (value, diagnostics) = ResponseKind::Count
            .reencode(json!({"body": 3}))
            .expect("count");
        assert_eq!(value, json!({"body": 3}));
        assert!(diagnostics.is_empty());
    }
}
