//! `careerchat chat`: interactive or single-message chat mode.

use std::io::Write;
use std::path::Path;

use careerchat_channels::CliChannel;
use careerchat_core::message::Message;

use crate::bootstrap;

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let runtime = bootstrap::build(&config);
    bootstrap::announce_startup(&config, runtime.sink.as_ref()).await;
    let engine = runtime.engine;

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let response = engine.respond(&msg, &[]).await;
        eprint!("\r              \r");
        println!("{}", response?);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        careerchat, interactive mode          ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Persona:   {}", config.persona.name);
    println!("  Provider:  {} ({})", config.provider.name, config.provider.base_url);
    println!("  Model:     {}", config.provider.model);
    println!("  Tools:     {}", runtime.tool_names.join(", "));
    println!("  Notify:    {}", runtime.sink.name());
    println!("  Knowledge: ~{} tokens", runtime.knowledge_tokens);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let channel = CliChannel::new();
    let mut rx = channel.start();
    let mut history: Vec<Message> = Vec::new();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(result) = rx.recv().await {
        match result {
            Ok(line) => {
                eprint!("  ...");

                match engine.respond(&line, &history).await {
                    Ok(response) => {
                        eprint!("\r     \r");
                        println!();
                        for text in response.lines() {
                            println!("  {} > {text}", config.persona.name);
                        }
                        println!();
                        history.push(Message::user(line));
                        history.push(Message::assistant(response));
                    }
                    Err(e) => {
                        eprint!("\r     \r");
                        eprintln!("  [Error] {e}");
                        println!();
                    }
                }

                print!("  You > ");
                std::io::stdout().flush()?;
            }
            Err(e) => {
                eprintln!("  [Input Error] {e}");
                break;
            }
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
