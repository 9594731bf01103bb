//! `careerchat serve`: start the HTTP chat gateway.

use std::path::Path;

use crate::bootstrap;

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    let runtime = bootstrap::build(&config);
    bootstrap::announce_startup(&config, runtime.sink.as_ref()).await;

    println!("careerchat gateway");
    println!("   Persona:   {}", config.persona.name);
    println!("   Model:     {}", config.provider.model);
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);

    careerchat_gateway::start(&config, runtime.engine).await?;

    Ok(())
}
