/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Prompt(String),
    NewChat,
    Clear,
    Chats,
    Switch(String),
    Model(String),
    System(String),
    Temperature(String),
    MaxTokens(String),
    Settings,
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /new                 start a new chat
  /clear               clear the current chat
  /chats               list saved chats
  /switch <name>       load a saved chat
  /model <id>          select the model (deepseek, llama3.2:3b)
  /system [text]       set the system prompt (empty removes it)
  /temperature <f>     sampling temperature, 0.1 to 1.0
  /max-tokens <n>      response token cap, 100 to 4000
  /settings            show current settings
  /status              check whether Ollama is running
  /help                show this help
  /quit                exit
Anything else is sent to the model.";

impl Command {
    /// Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Command> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Some(Command::Prompt(trimmed.to_string()));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim().to_string()),
            None => (rest, String::new()),
        };

        let command = match name.to_lowercase().as_str() {
            "new" => Command::NewChat,
            "clear" => Command::Clear,
            "chats" | "list" => Command::Chats,
            "switch" | "load" => Command::Switch(arg),
            "model" => Command::Model(arg),
            "system" => Command::System(arg),
            "temperature" | "temp" => Command::Temperature(arg),
            "max-tokens" | "max_tokens" => Command::MaxTokens(arg),
            "settings" => Command::Settings,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}
