//! Interactive line session on top of [`TumultClient`].

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;
use tumult_shared::protocol::ConnectionError;

use crate::{
    client::TumultClient,
    error::ClientError,
    event::ClientEvent,
    formatter::MessageFormatter,
    ui::{PROMPT, redisplay_prompt},
};

const NICK_USAGE: &str = "/nick <name>";

/// One line typed by the user.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Nick(String),
    Quit,
    Usage(&'static str),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.split_once(char::is_whitespace) {
            Some(("/nick", name)) if !name.trim().is_empty() => {
                Command::Nick(name.trim().to_string())
            }
            _ if line == "/nick" => Command::Usage(NICK_USAGE),
            _ if line == "/quit" => Command::Quit,
            _ => Command::Say(line.to_string()),
        }
    }
}

/// Run the client session until the user quits or the server goes away
pub async fn run_client_session(
    host: &str,
    port: u16,
    nickname: Option<String>,
) -> Result<(), ClientError> {
    let (mut client, mut events) = TumultClient::new();
    client.set_nickname(nickname).await;
    client.connect(host, port).await?;

    print!("{}", MessageFormatter::format_welcome(client.server()));

    let mut input_rx = spawn_readline();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ClientEvent::Disconnected) | None => {
                    print!("{}", MessageFormatter::format_disconnected());
                    return Err(ConnectionError::Closed.into());
                }
                Some(event) => {
                    print!("{}", MessageFormatter::format_event(&event));
                    redisplay_prompt();
                }
            },
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Ctrl+C / Ctrl+D
                    client.leave().await;
                    return Ok(());
                };

                match Command::parse(&line) {
                    Command::Say(text) => client.send_message(&text).await?,
                    Command::Nick(name) => {
                        client.send_nickname(name.as_str()).await?;
                        tracing::info!("Nickname changed to {}", name);
                    }
                    Command::Quit => {
                        client.leave().await;
                        return Ok(());
                    }
                    Command::Usage(usage) => {
                        print!("{}", MessageFormatter::format_usage(usage));
                        redisplay_prompt();
                    }
                }
            }
        }
    }
}

/// Spawn a blocking thread for rustyline (synchronous readline)
fn spawn_readline() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
