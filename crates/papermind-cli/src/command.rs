use std::path::PathBuf;

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    Pdf(Vec<PathBuf>),
    New,
    Save,
    List,
    Load(String),
    Delete(String),
    DeleteAll,
    History,
    Help,
    Exit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            return ReplCommand::Exit;
        }
        if !line.starts_with('/') {
            return ReplCommand::Ask(line.to_string());
        }

        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match (name, args.as_slice()) {
            ("/pdf", paths) if !paths.is_empty() => {
                ReplCommand::Pdf(paths.iter().map(PathBuf::from).collect())
            }
            ("/new", []) => ReplCommand::New,
            ("/save", []) => ReplCommand::Save,
            ("/list", []) => ReplCommand::List,
            ("/load", [id]) => ReplCommand::Load(id.to_string()),
            ("/delete", [id]) => ReplCommand::Delete(id.to_string()),
            ("/delete-all", []) => ReplCommand::DeleteAll,
            ("/history", []) => ReplCommand::History,
            ("/help", []) => ReplCommand::Help,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
Commands:
  /pdf FILE...    replace the document with the text of these PDFs
  /new            start a new conversation
  /save           save the conversation
  /list           list saved conversations, newest first
  /load ID        load a saved conversation
  /delete ID      delete a saved conversation
  /delete-all     delete every saved conversation
  /history        print the current transcript
  /help           show this help
  exit, quit      leave
Anything else is sent as a question.";
