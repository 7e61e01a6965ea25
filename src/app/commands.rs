/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Remove(String),
    Up(String),
    Down(String),
    Clear,
    List,
    Map,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  <cep> | add <cep>   register a CEP (punctuation is ignored)
  rm <cep>            remove a CEP from the list
  up <cep>            move a CEP one position up
  down <cep>          move a CEP one position down
  clear               remove every CEP
  list                show the list
  map                 write the map page with the current order
  help                show this text
  quit                leave";

/// Anything that does not start with a known keyword is treated as a CEP to
/// register, so an empty line becomes an empty `Add` and is ignored later.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "add" | "a" => Command::Add(rest.to_string()),
        "rm" | "remove" | "del" => Command::Remove(rest.to_string()),
        "up" | "u" => Command::Up(rest.to_string()),
        "down" | "d" => Command::Down(rest.to_string()),
        "clear" if rest.is_empty() => Command::Clear,
        "list" | "ls" if rest.is_empty() => Command::List,
        "map" | "m" if rest.is_empty() => Command::Map,
        "help" | "h" | "?" if rest.is_empty() => Command::Help,
        "quit" | "exit" | "q" if rest.is_empty() => Command::Quit,
        _ => Command::Add(line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(parse_command("add 59064-320"), Command::Add("59064-320".to_string()));
        assert_eq!(parse_command("rm 59064320"), Command::Remove("59064320".to_string()));
        assert_eq!(parse_command("UP 59064320"), Command::Up("59064320".to_string()));
        assert_eq!(parse_command("down  59064320 "), Command::Down("59064320".to_string()));
        assert_eq!(parse_command("clear"), Command::Clear);
        assert_eq!(parse_command(" list "), Command::List);
        assert_eq!(parse_command("map"), Command::Map);
        assert_eq!(parse_command("help"), Command::Help);
        assert_eq!(parse_command("quit"), Command::Quit);
    }

    #[test]
    fn test_bare_input_is_add() {
        assert_eq!(parse_command("59064-320"), Command::Add("59064-320".to_string()));
        assert_eq!(parse_command("59064 320"), Command::Add("59064 320".to_string()));
        assert_eq!(parse_command(""), Command::Add(String::new()));
        assert_eq!(parse_command("   "), Command::Add(String::new()));
    }

    #[test]
    fn test_keyword_without_argument() {
        assert_eq!(parse_command("rm"), Command::Remove(String::new()));
        assert_eq!(parse_command("add"), Command::Add(String::new()));
    }
}
