//! Line commands typed on stdin.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostRef {
    /// 1-based position in the feed as printed.
    Index(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Subreddit(String),
    Open(PostRef),
    Close(Option<PostRef>),
    Retry,
    User(String),
    Login(String),
    Logout,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  r <name>        open a subreddit
  open <n|id>     show the comments of post n
  close [n|id]    hide comments (all when no post given)
  retry           retry the last failed request
  user <name>     show an author's profile
  login <token>   store an access token for authenticated requests
  logout          forget the stored token
  help            this text
  quit            exit";

pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match (word.to_ascii_lowercase().as_str(), rest) {
        ("r" | "sub", name) if !name.is_empty() => Command::Subreddit(name.to_string()),
        ("open" | "o", target) if !target.is_empty() => Command::Open(post_ref(target)),
        ("close" | "c", "") => Command::Close(None),
        ("close" | "c", target) => Command::Close(Some(post_ref(target))),
        ("retry", "") => Command::Retry,
        ("user" | "u", name) if !name.is_empty() => Command::User(name.to_string()),
        ("login", token) if !token.is_empty() => Command::Login(token.to_string()),
        ("logout", "") => Command::Logout,
        ("help" | "?", "") => Command::Help,
        ("quit" | "q" | "exit", "") => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

fn post_ref(target: &str) -> PostRef {
    match target.parse::<usize>() {
        Ok(index) => PostRef::Index(index),
        Err(_) => PostRef::Id(target.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation() {
        assert_eq!(parse("r rust"), Command::Subreddit("rust".to_string()));
        assert_eq!(parse("  open 3 "), Command::Open(PostRef::Index(3)));
        assert_eq!(
            parse("open 1abcd"),
            Command::Open(PostRef::Id("1abcd".to_string()))
        );
        assert_eq!(parse("close"), Command::Close(None));
        assert_eq!(parse("c 2"), Command::Close(Some(PostRef::Index(2))));
    }

    #[test]
    fn parses_account_commands() {
        assert_eq!(parse("user spez"), Command::User("spez".to_string()));
        assert_eq!(parse("login abc.def"), Command::Login("abc.def".to_string()));
        assert_eq!(parse("LOGOUT"), Command::Logout);
    }

    #[test]
    fn missing_arguments_are_unknown() {
        assert_eq!(parse("r"), Command::Unknown("r".to_string()));
        assert_eq!(parse("open"), Command::Unknown("open".to_string()));
        assert_eq!(parse("retry now"), Command::Unknown("retry now".to_string()));
        assert_eq!(parse("   "), Command::Empty);
    }
}
