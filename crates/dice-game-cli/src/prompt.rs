//! Reading user commands from the console.

use std::io::{self, BufRead};

/// One line of user input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Exit,
    Table,
    Help,
    Number(u32),
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "exit" | "x" | "quit" | "q" => Command::Exit,
            "table" | "?" => Command::Table,
            "help" | "h" => Command::Help,
            other => other
                .parse()
                .map(Command::Number)
                .unwrap_or_else(|_| Command::Unknown(line.to_string())),
        }
    }
}

/// Read the next command; end of input counts as `Exit`
pub fn read_command(input: &mut impl BufRead) -> io::Result<Command> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Command::Exit);
    }
    Ok(Command::parse(&line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse(" X \n"), Command::Exit);
        assert_eq!(Command::parse("TABLE"), Command::Table);
        assert_eq!(Command::parse("?"), Command::Table);
        assert_eq!(Command::parse("help"), Command::Help);
        assert_eq!(Command::parse("3\n"), Command::Number(3));
        assert_eq!(Command::parse("\n"), Command::Empty);
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(Command::parse("-1"), Command::Unknown("-1".to_string()));
        assert_eq!(Command::parse("two"), Command::Unknown("two".to_string()));
        assert_eq!(Command::parse("1.5"), Command::Unknown("1.5".to_string()));
    }

    #[test]
    fn test_read_command_sequence() {
        let mut input = Cursor::new("1\ntable\n");
        assert_eq!(read_command(&mut input).unwrap(), Command::Number(1));
        assert_eq!(read_command(&mut input).unwrap(), Command::Table);
        assert_eq!(read_command(&mut input).unwrap(), Command::Exit);
    }
}
