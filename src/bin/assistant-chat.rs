//! `assistant-chat`: terminal chat against a running relay
//!
//! Reads one message per line from stdin. The weather function is answered
//! locally; `/weather` shows the last report, `/quit` exits.

use std::io::Write;
use std::sync::{Arc, Mutex};

use assistant_relay::chat::{ChatObserver, ChatSession, HttpTransport, Message, Role};
use assistant_relay::config::ChatClientConfig;
use assistant_relay::functions::WeatherFunctionHandler;
use assistant_relay::stream::Update;
use assistant_relay::telemetry;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Prints streamed text as it arrives.
#[derive(Default)]
struct TerminalObserver {
    /// Bytes of the current message already printed
    printed: Mutex<usize>,
}

impl TerminalObserver {
    fn print_tail(&self, text: &str) {
        let mut printed = self.printed.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(tail) = text.get(*printed..) {
            print!("{tail}");
            let _ = std::io::stdout().flush();
        }
        *printed = text.len();
    }
}

impl ChatObserver for TerminalObserver {
    fn on_update(&self, update: Update, message: &Message) {
        match (update, message.role) {
            (Update::Appended(_), Role::User) => {}
            (Update::Appended(_), role) => {
                *self.printed.lock().unwrap_or_else(|e| e.into_inner()) = 0;
                let label = if role == Role::Code { "code" } else { "assistant" };
                print!("\n{label}> ");
                self.print_tail(&message.text);
            }
            (Update::Extended(_), _) => self.print_tail(&message.text),
            // Resolved links are shown in the final transcript.
            (Update::Annotated(_), _) => {}
        }
    }

    fn on_run_completed(&self) {
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = telemetry::init_from_env()?;

    let config = ChatClientConfig::from_env();
    let weather = Arc::new(WeatherFunctionHandler::new());
    let transport = HttpTransport::from_config(&config);
    let mut session =
        ChatSession::with_handler(transport, weather.clone()).with_observer(TerminalObserver::default());

    let thread_id = session.start().await?;
    println!("connected to {} (thread {thread_id})", config.server_url);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"you> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/weather" => {
                match weather.latest().await {
                    Some(report) => println!(
                        "{}: {}°F, {}",
                        report.location, report.temperature, report.conditions
                    ),
                    None => println!("no weather report yet"),
                }
                continue;
            }
            _ => {}
        }

        if let Err(e) = session.send(&line).await {
            eprintln!("\nerror: {}", e.user_message());
            session.recover_input();
        }
        if session.transcript().input_disabled() {
            eprintln!("run ended without completing");
            session.recover_input();
        }
    }

    Ok(())
}
