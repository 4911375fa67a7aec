use analyst_core::{Msg, ScopeId};

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: ask a question.
    Ask(String),
    /// `/table <text>`: build a table straight from the text.
    Table(String),
    /// `/check N` or `/uncheck N` (1-based, as printed).
    Check { index: usize, approved: bool },
    /// `/all` or `/none`.
    CheckAll(bool),
    Confirm,
    Scope(ScopeId),
    Report,
    /// `/open [N]`: open entry N, or the latest link.
    Open(Option<usize>),
    /// `/example N`: put sample question N into the draft.
    Example(usize),
    /// `/send`: submit the current draft.
    Send,
    Show,
    Help,
    Quit,
}

/// Questions offered as a starting point, prefilled with `/example N`.
pub const SAMPLE_QUESTIONS: [&str; 2] = [
    "Total current assets for Q1 2017 as a bar chart",
    "Goodwill for Q2 2018 as a line chart",
];

pub const HELP: &str = "\
commands:
  <text>            ask a question
  /example N        put sample question N into the draft
  /send             ask the current draft
  /table <text>     build a table straight from <text>
  /check N          approve suggested metric N
  /uncheck N        withdraw approval for metric N
  /all | /none      approve or withdraw every metric
  /confirm          chart the approved metrics
  /scope ID         choose the chart to analyse or report on
  /report           download the analysis report
  /open [N]         open the link in entry N (default: latest)
  /show             reprint the panel
  /help             this text
  /quit             close the panel
sample questions:
  1. Total current assets for Q1 2017 as a bar chart
  2. Goodwill for Q2 2018 as a line chart";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(pub String);

pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Ask(line.to_string())));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    let command = match name {
        "table" => Command::Table(arg.to_string()),
        "check" => Command::Check {
            index: parse_position(arg)?,
            approved: true,
        },
        "uncheck" => Command::Check {
            index: parse_position(arg)?,
            approved: false,
        },
        "all" => Command::CheckAll(true),
        "none" => Command::CheckAll(false),
        "confirm" => Command::Confirm,
        "scope" => Command::Scope(
            arg.parse()
                .map_err(|_| ParseError(format!("expected a chart id, got {arg:?}")))?,
        ),
        "report" => Command::Report,
        "open" if arg.is_empty() => Command::Open(None),
        "open" => Command::Open(Some(parse_position(arg)?)),
        "example" => {
            let index = parse_position(arg)?;
            if index >= SAMPLE_QUESTIONS.len() {
                return Err(ParseError(format!(
                    "there are {} sample questions",
                    SAMPLE_QUESTIONS.len()
                )));
            }
            Command::Example(index)
        }
        "send" => Command::Send,
        "show" => Command::Show,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ParseError(format!("unknown command /{other}"))),
    };
    Ok(Some(command))
}

/// Translates a 1-based position into a 0-based index.
fn parse_position(arg: &str) -> Result<usize, ParseError> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(ParseError(format!("expected a position starting at 1, got {arg:?}"))),
    }
}

impl Command {
    /// Messages for the panel; `latest_link` resolves `/open` without a position.
    pub fn into_msgs(self, latest_link: Option<usize>) -> Vec<Msg> {
        match self {
            Command::Ask(text) => vec![Msg::InputChanged(text), Msg::PromptSubmitted],
            Command::Table(text) => vec![Msg::InputChanged(text), Msg::QuickTableSubmitted],
            Command::Check { index, approved } => vec![Msg::CandidateToggled { index, approved }],
            Command::CheckAll(approved) => vec![Msg::SelectAllToggled(approved)],
            Command::Confirm => vec![Msg::SelectionConfirmed],
            Command::Scope(id) => vec![Msg::ScopeSelected(id)],
            Command::Report => vec![Msg::ReportRequested],
            Command::Open(position) => position
                .or(latest_link)
                .map(|entry_index| vec![Msg::ArtifactActivated { entry_index }])
                .unwrap_or_default(),
            Command::Example(index) => SAMPLE_QUESTIONS
                .get(index)
                .map(|text| vec![Msg::InputChanged(text.to_string())])
                .unwrap_or_default(),
            Command::Send => vec![Msg::PromptSubmitted],
            Command::Show | Command::Help | Command::Quit => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            parse("  Q1 assets by bar chart ").unwrap(),
            Some(Command::Ask("Q1 assets by bar chart".to_string()))
        );
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(
            parse("/check 2").unwrap(),
            Some(Command::Check {
                index: 1,
                approved: true
            })
        );
        assert_eq!(
            parse("/uncheck 1").unwrap(),
            Some(Command::Check {
                index: 0,
                approved: false
            })
        );
        assert!(parse("/check 0").is_err());
        assert!(parse("/check x").is_err());
    }

    #[test]
    fn slash_commands_parse() {
        assert_eq!(parse("/all").unwrap(), Some(Command::CheckAll(true)));
        assert_eq!(parse("/none").unwrap(), Some(Command::CheckAll(false)));
        assert_eq!(parse("/scope 17").unwrap(), Some(Command::Scope(17)));
        assert_eq!(parse("/open").unwrap(), Some(Command::Open(None)));
        assert_eq!(parse("/open 3").unwrap(), Some(Command::Open(Some(2))));
        assert_eq!(
            parse("/table sales by region").unwrap(),
            Some(Command::Table("sales by region".to_string()))
        );
        assert_eq!(parse("/exit").unwrap(), Some(Command::Quit));
        assert!(parse("/dance").is_err());
    }

    #[test]
    fn ask_becomes_input_then_submit() {
        let msgs = Command::Ask("why".to_string()).into_msgs(None);
        assert_eq!(
            msgs,
            vec![Msg::InputChanged("why".to_string()), Msg::PromptSubmitted]
        );
    }

    #[test]
    fn example_prefills_the_draft_without_submitting() {
        assert_eq!(parse("/example 2").unwrap(), Some(Command::Example(1)));
        assert!(parse("/example 3").is_err());
        assert_eq!(
            Command::Example(0).into_msgs(None),
            vec![Msg::InputChanged(SAMPLE_QUESTIONS[0].to_string())]
        );
        assert_eq!(
            parse("/send").unwrap().map(|c| c.into_msgs(None)),
            Some(vec![Msg::PromptSubmitted])
        );
    }

    #[test]
    fn help_lists_every_sample_question() {
        for sample in SAMPLE_QUESTIONS {
            assert!(HELP.contains(sample), "{sample}");
        }
    }

    #[test]
    fn open_without_position_uses_latest_link() {
        assert_eq!(
            Command::Open(None).into_msgs(Some(4)),
            vec![Msg::ArtifactActivated { entry_index: 4 }]
        );
        assert!(Command::Open(None).into_msgs(None).is_empty());
    }
}
