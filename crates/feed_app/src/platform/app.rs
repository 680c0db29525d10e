use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use feed_core::{update, AppState, Credential, Msg, PostId};
use feed_logging::{feed_info, feed_warn};

use super::clock::Clock;
use super::config;
use super::effects::EffectRunner;
use super::logging;
use super::persistence;
use super::ui::command::{self, Command, PostRef, HELP};
use super::ui::render::{self, RenderContext};
use crate::cli::Cli;

/// Everything the main loop reacts to.
pub enum AppEvent {
    /// A line typed on stdin.
    Input(String),
    /// stdin reached end of file.
    InputClosed,
    /// A message for the core, e.g. an engine completion.
    Core(Msg),
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log_destination.into());

    let mut config = config::load_config(cli.config.as_deref())?;
    config.apply_cli(&cli);
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));

    let clock = Clock::start();
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(event_tx.clone(), config.fetch.clone(), data_dir.clone(), clock)?;
    spawn_input_reader(event_tx);

    let mut app = App::new(AppState::with_config(config.feed.clone()), runner, clock);
    if let Some(credential) = persistence::load_credential(&data_dir) {
        app.dispatch(Msg::CredentialRestored(credential));
    }
    app.dispatch(Msg::SelectSubreddit {
        name: config.feed.default_subreddit.clone(),
        at: clock.now(),
    });
    println!("Type `help` for commands.");
    app.render_if_dirty();

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Core(msg) => app.dispatch(msg),
            AppEvent::Input(line) => {
                if app.handle_input(&line).is_break() {
                    break;
                }
            }
            AppEvent::InputClosed => break,
        }
        app.render_if_dirty();
    }

    feed_info!("Exiting");
    Ok(())
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if event_tx.send(AppEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    feed_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

struct App {
    state: AppState,
    runner: EffectRunner,
    clock: Clock,
    focused_author: Option<String>,
    force_render: bool,
}

impl App {
    fn new(state: AppState, runner: EffectRunner, clock: Clock) -> Self {
        Self {
            state,
            runner,
            clock,
            focused_author: None,
            force_render: false,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn handle_input(&mut self, line: &str) -> ControlFlow<()> {
        let at = self.clock.now();
        match command::parse(line) {
            Command::Subreddit(name) => self.dispatch(Msg::SelectSubreddit { name, at }),
            Command::Open(target) => match self.resolve(&target) {
                Some(post_id) => self.dispatch(Msg::ExpandPost { post_id, at }),
                None => println!("No such post: {}", describe(&target)),
            },
            Command::Close(None) => self.dispatch(Msg::CollapsePost { post_id: None }),
            Command::Close(Some(target)) => match self.resolve(&target) {
                Some(post_id) => self.dispatch(Msg::CollapsePost {
                    post_id: Some(post_id),
                }),
                None => println!("No such post: {}", describe(&target)),
            },
            Command::Retry => self.dispatch(Msg::Retry { at }),
            Command::User(name) => {
                let author = name.trim_start_matches("u/").to_string();
                self.focused_author = Some(author.clone());
                self.force_render = true;
                self.dispatch(Msg::AuthorHovered { author, at });
            }
            Command::Login(token) => {
                self.dispatch(Msg::CredentialChanged(Some(Credential::new(token))));
                println!("Token stored; it is used from the next request on.");
            }
            Command::Logout => {
                self.dispatch(Msg::CredentialChanged(None));
                println!("Token removed.");
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return ControlFlow::Break(()),
            Command::Empty => self.force_render = true,
            Command::Unknown(text) => println!("Unknown command `{text}`. Type `help`."),
        }
        ControlFlow::Continue(())
    }

    /// Maps a typed post reference onto a post id of the current feed.
    fn resolve(&self, target: &PostRef) -> Option<PostId> {
        let posts = self.state.posts().data()?;
        match target {
            PostRef::Index(position) => posts
                .get(position.checked_sub(1)?)
                .map(|post| post.id.clone()),
            PostRef::Id(id) => posts
                .iter()
                .find(|post| &post.id == id)
                .map(|post| post.id.clone()),
        }
    }

    fn render_if_dirty(&mut self) {
        let dirty = self.state.consume_dirty();
        if !dirty && !std::mem::take(&mut self.force_render) {
            return;
        }
        self.force_render = false;

        let view = self.state.view();
        let ctx = RenderContext {
            now: self.clock.now(),
            wall_now: chrono::Utc::now().timestamp(),
            focused_author: self.focused_author.as_deref(),
        };
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}> ", render::render(&view, &ctx));
        let _ = stdout.flush();
    }
}

fn describe(target: &PostRef) -> String {
    match target {
        PostRef::Index(position) => format!("#{position}"),
        PostRef::Id(id) => id.clone(),
    }
}
