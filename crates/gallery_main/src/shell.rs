//! Line commands read from stdin

use anyhow::Result;
use gallery_core::{GalleryWidget, InputEvent, Key, PointerTarget, Viewport};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Input(Vec<InputEvent>),
    Scroll(Viewport),
    Height(String),
    Open,
    Close,
    State,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err("empty command".to_string());
        };
        let rest: Vec<&str> = words.collect();

        let click = |target: PointerTarget| -> std::result::Result<Self, String> {
            Ok(ShellCommand::Input(vec![InputEvent::Click(target)]))
        };

        match (name, rest.as_slice()) {
            ("click", [index]) => click(PointerTarget::Thumbnail(number(index)?)),
            ("image", []) => click(PointerTarget::FullsizeImage),
            ("backdrop", []) => click(PointerTarget::Backdrop),
            ("container", []) => click(PointerTarget::Container),
            ("prev", []) => click(PointerTarget::PrevButton),
            ("next", []) => click(PointerTarget::NextButton),
            ("x", []) => click(PointerTarget::CloseButton),
            ("key", [key]) => Ok(ShellCommand::Input(vec![InputEvent::key(key)])),
            ("focus", [index, key]) => Ok(ShellCommand::Input(vec![InputEvent::Key {
                key: Key::parse(key),
                focused_thumbnail: Some(number(index)?),
            }])),
            ("swipe", [x0, y0, x1, y1]) => Ok(ShellCommand::Input(vec![
                InputEvent::TouchStart { x: coord(x0)?, y: coord(y0)? },
                InputEvent::TouchEnd { x: coord(x1)?, y: coord(y1)? },
            ])),
            ("scroll", [top, bottom]) => {
                Ok(ShellCommand::Scroll(Viewport::new(coord(top)?, coord(bottom)?)))
            }
            ("height", [value @ ..]) if !value.is_empty() => {
                Ok(ShellCommand::Height(value.join(" ")))
            }
            ("resize", []) => Ok(ShellCommand::Input(vec![InputEvent::Resize])),
            ("open", []) => Ok(ShellCommand::Open),
            ("close", []) => Ok(ShellCommand::Close),
            ("state", []) => Ok(ShellCommand::State),
            ("quit" | "exit", []) => Ok(ShellCommand::Quit),
            _ => Err(format!("unknown command: {}", line.trim())),
        }
    }
}

fn number(s: &str) -> std::result::Result<usize, String> {
    s.parse().map_err(|_| format!("not an index: {}", s))
}

fn coord(s: &str) -> std::result::Result<f32, String> {
    s.parse().map_err(|_| format!("not a number: {}", s))
}

/// Read commands until `quit` or end of input
pub async fn run(widget: &GalleryWidget) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("{}", e);
                continue;
            }
        };

        match command {
            ShellCommand::Input(events) => {
                for event in events {
                    if let Some(action) = widget.handle_input(event) {
                        tracing::info!(?action, "Input handled");
                    }
                }
            }
            ShellCommand::Scroll(viewport) => widget.on_scroll(viewport),
            ShellCommand::Height(value) => widget.set_height(&value),
            ShellCommand::Open => {
                if let Err(e) = widget.open() {
                    tracing::error!("Cannot open gallery: {}", e);
                }
            }
            ShellCommand::Close => widget.close(),
            ShellCommand::State => {
                tracing::info!(
                    open = widget.is_open(),
                    state = ?widget.gallery_state(),
                    height = %widget.get_height(),
                    "Gallery state"
                );
            }
            ShellCommand::Quit => break,
        }
    }

    widget.close();
    Ok(())
}
