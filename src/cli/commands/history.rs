//! History command implementation
//!
//! Human-readable view of the audit collections: the latest access event of
//! an actor, or the distinct accesses recorded in the access index.

use super::open_store;
use crate::core::{Command, Ledger};
use crate::domain::{AccessEvent, AccessTrailEntry, ActorId, Purpose, RecordId};
use clap::Args;

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Actor whose accesses to show
    #[arg(short, long)]
    pub actor: String,

    /// Which audit log to read (query or modify)
    #[arg(short, long, default_value = "query")]
    pub purpose: Purpose,

    /// List every distinct access instead of only the latest event
    #[arg(long)]
    pub trail: bool,

    /// Narrow the trail to one patient
    #[arg(long, requires = "trail")]
    pub subject: Option<String>,
}

impl HistoryArgs {
    /// Execute the history command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let actor = match ActorId::new(self.actor.clone()) {
            Ok(actor) => actor,
            Err(e) => {
                eprintln!("❌ Invalid actor: {e}");
                return Ok(3);
            }
        };
        let subject = match self.subject.clone().map(RecordId::new).transpose() {
            Ok(subject) => subject,
            Err(e) => {
                eprintln!("❌ Invalid subject: {e}");
                return Ok(3);
            }
        };

        let (config, store) = match open_store(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };
        let ledger = Ledger::from_config(store, &config);

        let command = if self.trail {
            Command::AccessTrail {
                actor,
                purpose: self.purpose,
                subject,
            }
        } else {
            match self.purpose {
                Purpose::Query => Command::HistoryQuery(actor),
                Purpose::Modify => Command::HistoryModify(actor),
            }
        };

        let payload = match ledger.execute(command).await {
            Ok(payload) => payload,
            Err(e) => {
                eprintln!("❌ {}: {e}", e.kind());
                return Ok(3);
            }
        };

        if self.trail {
            let entries: Vec<AccessTrailEntry> = serde_json::from_slice(&payload)?;
            print_trail(&self.actor, self.purpose, &entries);
        } else {
            let event: AccessEvent = serde_json::from_slice(&payload)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        Ok(0)
    }
}

fn print_trail(actor: &str, purpose: Purpose, entries: &[AccessTrailEntry]) {
    println!("📜 {purpose} trail for {actor}: {} entries", entries.len());
    for entry in entries {
        println!("  {} @ {}", entry.subject, entry.location);
    }
}
