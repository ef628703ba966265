use std::str::FromStr;
use std::sync::Arc;

use matchdeck::screen::NO_LIKES_MESSAGE;
use matchdeck::{CardView, ClientConfig, DeckScreen, DeckView, HttpApi, Session};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::{AppError, InputParseError};

const HELP: &str = "\
next             show the next profile
back             show the previous profile
like             like the current profile and move on
skip             move on without liking
swipe <x0> <x1>  drag from x0 to x1, leftwards moves forward
likes            list liked profiles
reload           fetch profiles again
quit             leave";

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "browse", about = "Swipe through profiles interactively")]
pub struct Browse {
    #[clap(long, action, help = "Print the first card and exit")]
    once: bool,
}

/// One line typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Next,
    Back,
    Like,
    Skip,
    Swipe { start: f32, end: f32 },
    Likes,
    Reload,
    Help,
    Quit,
}

impl FromStr for Input {
    type Err = InputParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words.next().unwrap_or_default();

        let input = match command {
            "next" | "n" => Input::Next,
            "back" | "b" => Input::Back,
            "like" | "l" => Input::Like,
            "skip" | "s" => Input::Skip,
            "likes" => Input::Likes,
            "reload" | "r" => Input::Reload,
            "help" | "?" => Input::Help,
            "quit" | "q" | "exit" => Input::Quit,
            "swipe" => {
                let start = coordinate(words.next())?;
                let end = coordinate(words.next())?;
                Input::Swipe { start, end }
            }
            other => {
                return Err(InputParseError::UnknownCommand(other.to_owned()))
            }
        };

        if words.next().is_some() {
            return match input {
                Input::Swipe { .. } => Err(InputParseError::SwipeUsage),
                _ => Err(InputParseError::UnknownCommand(s.trim().to_owned())),
            };
        }
        Ok(input)
    }
}

fn coordinate(word: Option<&str>) -> Result<f32, InputParseError> {
    let word = word.ok_or(InputParseError::SwipeUsage)?;
    match word.parse::<f32>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => Err(InputParseError::InvalidCoordinate(word.to_owned())),
    }
}

impl Browse {
    pub async fn run(
        &self,
        session: Session,
        api: HttpApi,
        config: &ClientConfig,
    ) -> Result<(), AppError> {
        let mut screen = DeckScreen::new(session, Arc::new(api), config);
        screen.reload();
        println!("{}", render_view(&screen.view()));

        if self.once {
            screen.process_next().await;
            println!("{}", render_view(&screen.view()));
            return Ok(());
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                changed = screen.process_next() => {
                    if changed {
                        println!("{}", render_view(&screen.view()));
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Input>() {
                        Ok(Input::Quit) => break,
                        Ok(input) => apply(&mut screen, input),
                        Err(e) => eprintln!("{e}"),
                    }
                }
            }
        }

        Ok(())
    }
}

fn apply(screen: &mut DeckScreen, input: Input) {
    let accepted = match input {
        Input::Next => screen.advance(),
        Input::Back => screen.retreat(),
        Input::Like => screen.like(),
        Input::Skip => screen.dislike(),
        Input::Swipe { start, end } => {
            screen.pointer_down(start);
            screen.pointer_up(end).is_some()
        }
        Input::Reload => {
            screen.reload();
            true
        }
        Input::Likes => {
            println!("{}", render_likes(&screen.liked_cards()));
            return;
        }
        Input::Help => {
            println!("{HELP}");
            return;
        }
        Input::Quit => return,
    };

    if accepted {
        println!("{}", render_view(&screen.view()));
    } else {
        log::debug!("{:?} had no effect", input);
    }
}

fn render_card(card: &CardView) -> String {
    let heart = if card.liked { " <3" } else { "" };
    format!("{} {}{}", card.fullname, card.handle, heart)
}

fn render_photo(src: &str) -> &str {
    if src.starts_with("data:") {
        "inline image"
    } else {
        src
    }
}

pub fn render_view(view: &DeckView) -> String {
    if let Some(message) = view.message {
        return match &view.error {
            Some(error) => format!("{message} ({error})"),
            None => message.to_owned(),
        };
    }

    match (&view.card, view.position) {
        (Some(card), Some(position)) => format!(
            "[{}] {} | photo: {} | likes: {} | {}",
            position,
            render_card(card),
            render_photo(&card.photo_src),
            view.like_count,
            view.visual.as_class(),
        ),
        _ => String::new(),
    }
}

pub fn render_likes(cards: &[CardView]) -> String {
    if cards.is_empty() {
        return NO_LIKES_MESSAGE.to_owned();
    }
    cards
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n")
}
