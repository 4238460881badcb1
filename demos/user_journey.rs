//! Demo showing a happy and an unhappy user journey.
//!
//! Run with: cargo run --example user_journey

use stepwise::{stepwise, Harness, OutcomeKind};

#[derive(Debug, Default)]
struct Journey {
    registered: bool,
    confirmed: bool,
    token: Option<String>,
    api_log: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
enum JourneyError {
    #[error("mailbox empty, nothing to confirm")]
    NothingToConfirm,
    #[error("sign in rejected: {0}")]
    SignInRejected(String),
}

fn declare_journey(harness: &mut Harness<JourneyError>, name: &str, deliver_mail: bool) {
    stepwise(harness, name, Journey::default, move |s| {
        s.step("register", move |ctx| {
            ctx.api_log.push("POST /register".into());
            ctx.registered = true;
            if deliver_mail {
                ctx.confirmed = true;
            }
            Ok(())
        });

        s.step("confirm", |ctx| {
            ctx.api_log.push("POST /confirm".into());
            if !ctx.confirmed {
                return Err(JourneyError::NothingToConfirm);
            }
            Ok(())
        });

        s.step("sign in", |ctx| {
            ctx.api_log.push("POST /session".into());
            if !ctx.confirmed {
                return Err(JourneyError::SignInRejected("unconfirmed".into()));
            }
            ctx.token = Some("session-token".into());
            Ok(())
        });

        s.on_fail(|ctx| {
            println!("  api log at failure: {:?}", ctx.api_log);
            Ok(())
        });

        s.after(|ctx| {
            ctx.token = None;
            println!("  cleaned up session");
            Ok(())
        });
    });
}

fn main() {
    let mut harness = Harness::new();
    declare_journey(&mut harness, "happy journey", true);
    declare_journey(&mut harness, "unhappy journey", false);

    let report = harness.run();

    for unit in report.units() {
        let mark = match unit.outcome.kind() {
            OutcomeKind::Passed => "ok",
            OutcomeKind::Failed => "FAILED",
            OutcomeKind::Pending => "pending",
        };
        println!("[{mark}] {} / {}", unit.series, unit.unit);
    }

    match serde_json::to_string_pretty(&report.summary()) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("summary unavailable: {err}"),
    }

    if let Err(verdict) = report.into_result() {
        println!("run failed: {verdict}");
    }
}
