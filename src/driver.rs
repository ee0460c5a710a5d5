//! Execution driver — one diagnostic run of the handler.
//!
//! ```text
//! START → CONFIG_CHECK ─┬─ MISSING_CONFIG_EXIT
//!                       └─ INVOKE ─┬─ SUCCESS_EXIT
//!                                  └─ FAILURE_EXIT
//! ```
//!
//! Every terminal state is an ordinary return: handler failures are reported
//! on `out` and folded into [`Outcome`], never propagated. Only a failure to
//! write the transcript itself surfaces as `Err`.

use std::future::Future;
use std::io::{self, Write};

use tracing::{error, info, warn};

use crate::config::{Credentials, MissingVars, redact};
use crate::handler::{Context, Event, Handler, HandlerError};

const RULE_WIDTH: usize = 50;
const REMEDIATION_HINT: &str = "Check your AWS credentials and environment variables.";

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Required settings were absent; the handler was not invoked.
    MissingConfig(Vec<String>),
    /// The handler returned; holds its rendered result.
    Success(String),
    /// Building or invoking the handler failed; holds the diagnostic.
    Failure(String),
}

/// Drive one run: validate credentials, build the handler with `connect`,
/// invoke it exactly once with empty placeholders, and report to `out`.
pub async fn run<H, C, Fut, W>(
    credentials: Result<Credentials, MissingVars>,
    connect: C,
    out: &mut W,
) -> io::Result<Outcome>
where
    H: Handler,
    C: FnOnce(Credentials) -> Fut,
    Fut: Future<Output = Result<H, HandlerError>>,
    W: Write,
{
    let credentials = match credentials {
        Ok(credentials) => credentials,
        Err(MissingVars(missing)) => {
            warn!(missing = ?missing, "required settings missing; skipping execution");
            writeln!(out, "Error: Missing environment variables: {}", missing.join(", "))?;
            writeln!(out, "Please check your .env file and ensure all variables are set.")?;
            return Ok(Outcome::MissingConfig(missing));
        }
    };

    writeln!(out, "Starting local test of NBA Game Day Notifications...")?;
    writeln!(out, "NBA API Key: {}", redact(&credentials.api_key))?;
    writeln!(out, "SNS Topic ARN: {}", credentials.topic_arn)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    out.flush()?;

    let invoked = match connect(credentials).await {
        Ok(handler) => handler.handle(Event::default(), Context::default()).await,
        Err(e) => Err(e),
    };

    match invoked {
        Ok(result) => {
            let rendered = result.to_string();
            info!("handler completed");
            writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
            writeln!(out, "Function execution completed!")?;
            writeln!(out, "Result: {rendered}")?;
            Ok(Outcome::Success(rendered))
        }
        Err(e) => {
            error!(error = %e, "handler failed");
            writeln!(out, "Error during execution: {e}")?;
            writeln!(out, "{REMEDIATION_HINT}")?;
            Ok(Outcome::Failure(e.to_string()))
        }
    }
}
