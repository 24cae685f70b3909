//! API inspector output

use crate::utils::{format_duration_ms, truncate_text, ColoredOutput};
use conduit_client::{CallHistory, HistoryEntry};

fn status_label(status: u16) -> String {
    let text = status.to_string();
    if (200..300).contains(&status) {
        ColoredOutput::success(&text).to_string()
    } else {
        ColoredOutput::error(&text).to_string()
    }
}

pub async fn print_history(history: &CallHistory, verbose: bool) {
    let entries = history.entries().await;
    println!();
    println!("{}", ColoredOutput::highlight(&format!("API calls ({}):", entries.len())));
    if entries.is_empty() {
        println!("{}", ColoredOutput::dim("  none"));
        return;
    }

    for entry in entries {
        match entry {
            HistoryEntry::Call(call) => {
                println!(
                    "  {:<6} {:<70} {} {}",
                    call.method,
                    truncate_text(&call.url, 70),
                    status_label(call.status),
                    ColoredOutput::dim(&format_duration_ms(call.duration_ms))
                );
                if verbose {
                    if let Some(body) = &call.request_body {
                        println!("         {} {}", ColoredOutput::dim("request:"), body);
                    }
                    println!("         {} {}", ColoredOutput::dim("response:"), call.response_body);
                }
            }
            HistoryEntry::CredentialChecks(group) => {
                println!(
                    "  {:<6} {:<70} {} {}",
                    "GET",
                    truncate_text(
                        &format!("credential checks x{} ({})", group.call_count, group.connectors.join(", ")),
                        70
                    ),
                    status_label(group.status),
                    ColoredOutput::dim(&format_duration_ms(group.total_duration_ms))
                );
            }
        }
    }
}
