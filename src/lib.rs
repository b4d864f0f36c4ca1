pub mod cli;
pub mod config;
pub mod history;
pub mod llm;
pub mod models;
pub mod session;
pub mod shell;

use cli::Args;
use config::RequestConfig;
use llm::{ new_client, ClientConfig };
use log::info;
use session::ConversationController;
use shell::Shell;
use std::error::Error;
use tokio::io::{ stdin, stdout, BufReader };

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let client_config = ClientConfig::from_args(&args)?;
    let settings = RequestConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("Ollama URL: {}", client_config.base_url);
    info!("Probe Timeout: {:?}", client_config.probe_timeout);
    info!("Request Timeout: {:?}", client_config.request_timeout);
    info!("Model: {}", settings.model());
    info!("System Prompt Set: {}", !settings.system_prompt().is_empty());
    info!("Temperature: {}", settings.temperature());
    info!("Max Tokens: {}", settings.max_tokens());
    info!("-------------------------");

    let controller = ConversationController::new(new_client(&client_config));
    let mut shell = Shell::new(controller, settings);
    let mut out = stdout();
    shell.run(BufReader::new(stdin()), &mut out).await?;

    Ok(())
}
