mod command;

pub use command::{ Command, HELP };

use log::info;
use std::io;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt };

use crate::config::{ ChatModel, RequestConfig };
use crate::llm::InferenceClient;
use crate::models::chat::Role;
use crate::models::view::{ TurnState, ViewState };
use crate::session::{ ConversationController, SendError };

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end over a [`ConversationController`].
///
/// Each line is handled to completion before the next one is read.
pub struct Shell<C: InferenceClient> {
    controller: ConversationController<C>,
    settings: RequestConfig,
}

impl<C: InferenceClient> Shell<C> {
    pub fn new(controller: ConversationController<C>, settings: RequestConfig) -> Self {
        Self { controller, settings }
    }

    pub fn controller(&self) -> &ConversationController<C> {
        &self.controller
    }

    pub fn settings(&self) -> &RequestConfig {
        &self.settings
    }

    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> io::Result<()>
        where R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin
    {
        let status = self.controller.service_status().await;
        let banner = format!(
            "Ollama chat (model: {}, Ollama status: {})\nType /help for commands.\n",
            self.settings.model(),
            status
        );
        out.write_all(banner.as_bytes()).await?;
        self.write_header(out).await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let Some(command) = Command::parse(&line) else {
                continue;
            };
            if let Flow::Quit = self.handle(command, out).await? {
                break;
            }
        }

        info!("Session {} ended", self.controller.session_id());
        out.flush().await
    }

    async fn write_header<W: AsyncWrite + Unpin>(&self, out: &mut W) -> io::Result<()> {
        let header = format!("Current Chat: {}\n", self.controller.active());
        out.write_all(header.as_bytes()).await
    }

    async fn handle<W: AsyncWrite + Unpin>(
        &mut self,
        command: Command,
        out: &mut W
    ) -> io::Result<Flow> {
        let text = match command {
            Command::Prompt(prompt) => {
                return self.send(&prompt, out).await.map(|_| Flow::Continue);
            }
            Command::NewChat => {
                let view = self.controller.new_chat();
                format!("Current Chat: {}\n", view.active)
            }
            Command::Clear => {
                let view = self.controller.clear_current();
                format!("Cleared {}.\n", view.active)
            }
            Command::Chats => render_chat_list(&self.controller.view()),
            Command::Switch(name) if name.is_empty() => "Usage: /switch <name>\n".to_string(),
            Command::Switch(name) =>
                match self.controller.switch_to(&name) {
                    Ok(view) => render_transcript(&view),
                    Err(e) => format!("{}\n", e),
                }
            Command::Model(id) =>
                match id.parse::<ChatModel>() {
                    Ok(model) => {
                        self.settings.set_model(model);
                        format!("Model set to {}.\n", model)
                    }
                    Err(e) => format!("{}\n", e),
                }
            Command::System(prompt) => {
                let reply = if prompt.is_empty() {
                    "System prompt removed.\n"
                } else {
                    "System prompt updated.\n"
                };
                self.settings.set_system_prompt(prompt);
                reply.to_string()
            }
            Command::Temperature(raw) =>
                match raw.parse::<f32>() {
                    Ok(value) =>
                        match self.settings.set_temperature(value) {
                            Ok(()) => format!("Temperature set to {}.\n", value),
                            Err(e) => format!("{}\n", e),
                        }
                    Err(_) => format!("Not a number: '{}'\n", raw),
                }
            Command::MaxTokens(raw) =>
                match raw.parse::<u32>() {
                    Ok(value) =>
                        match self.settings.set_max_tokens(value) {
                            Ok(()) => format!("Max tokens set to {}.\n", value),
                            Err(e) => format!("{}\n", e),
                        }
                    Err(_) => format!("Not a whole number: '{}'\n", raw),
                }
            Command::Settings => render_settings(&self.settings),
            Command::Status => {
                let status = self.controller.service_status().await;
                format!("Ollama Status: {}\n", status)
            }
            Command::Help => format!("{}\n", HELP),
            Command::Quit => {
                return Ok(Flow::Quit);
            }
            Command::Unknown(name) => format!("Unknown command '/{}'. Type /help.\n", name),
        };

        out.write_all(text.as_bytes()).await?;
        Ok(Flow::Continue)
    }

    async fn send<W: AsyncWrite + Unpin>(&mut self, prompt: &str, out: &mut W) -> io::Result<()> {
        let view = match self.controller.submit_prompt(prompt) {
            Ok(view) => view,
            Err(e) => {
                return out.write_all(render_send_error(&e).as_bytes()).await;
            }
        };
        out.write_all(render_turn(&view).as_bytes()).await?;
        out.flush().await?;

        let text = match self.controller.await_reply(&self.settings).await {
            Ok(result) =>
                format!(
                    "assistant: {}\nResponse time: {} seconds\n",
                    result.text,
                    result.elapsed_seconds()
                ),
            Err(e) => render_send_error(&e),
        };
        out.write_all(text.as_bytes()).await
    }
}

fn render_turn(view: &ViewState) -> &'static str {
    match view.turn {
        TurnState::AwaitingResponse => "Thinking...\n",
        TurnState::Idle => "",
    }
}

fn render_send_error(err: &SendError) -> String {
    match err {
        SendError::EmptyPrompt => String::new(),
        SendError::Inference(e) =>
            format!(
                "{}\nFailed to get a response from the model. Please check if Ollama is running.\n",
                e
            ),
        other => format!("{}\n", other),
    }
}

fn render_chat_list(view: &ViewState) -> String {
    let mut result = String::from("Saved Chats:\n");
    for name in &view.names {
        let marker = if *name == view.active { "*" } else { " " };
        result.push_str(&format!("{} {}\n", marker, name));
    }
    result
}

fn render_transcript(view: &ViewState) -> String {
    let mut result = format!("Current Chat: {}\n", view.active);
    for msg in &view.messages {
        let role_display = match msg.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        result.push_str(&format!("{}: {}\n", role_display, msg.content));
    }
    result
}

fn render_settings(settings: &RequestConfig) -> String {
    let system = if settings.system_prompt().is_empty() {
        "(none)"
    } else {
        settings.system_prompt()
    };
    format!(
        "Model: {}\nSystem Prompt: {}\nTemperature: {}\nMax Tokens: {}\n",
        settings.model(),
        system,
        settings.temperature(),
        settings.max_tokens()
    )
}
