//! A menu, a game view and a help view behind a hub, driven by a script of
//! input steps on the in-memory backend.

use std::{cell::RefCell, fmt, rc::Rc, str::FromStr, time::Duration};

use arbor::{
    Props, Scene, TypedId,
    backend::memory::MemoryBackend,
    config::Config,
    error::{Error, Result},
    event::{
        Event,
        key::Key,
        mouse::{Button as MouseButton, Buttons},
    },
    geom::{Expanse, Point},
    message::{AppCommand, HubCommand, Message},
    model::{Model, Snapshot, StateChange, Subject},
    style::Color,
    timer::{CountdownTimer, ManualClock, Time},
    widgets::{Container, Hub, Menu, Text, text::DEFAULT_FONT},
};
use tracing::{debug, info, warn};

/// Simulated time per frame.
const FRAME: Duration = Duration::from_millis(16);

/// Length of a round.
const ROUND_SECS: i64 = 30;

/// The script used when none is given.
pub const DEFAULT_SCRIPT: &str = "tick click:30,230 tick wait:1500 tick key:p key:p \
                                  key:esc tick click:30,290 tick key:esc tick key:q";

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Move the pointer.
    Move(Point),
    /// Move to a point and click the left button there.
    Click(Point),
    /// Press and release a key.
    Key(Key),
    /// Let simulated time pass without drawing.
    Wait(Duration),
    /// Run one frame.
    Tick,
}

impl Step {
    /// Parse a whitespace separated script.
    pub fn parse_script(script: &str) -> Result<Vec<Self>> {
        script.split_whitespace().map(str::parse).collect()
    }
}

/// Parse an `x,y` pair.
fn parse_point(s: &str) -> Result<Point> {
    let bad = || Error::Parse(format!("invalid point: {s:?}"));
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse().map_err(|_| bad())?;
    let y = y.trim().parse().map_err(|_| bad())?;
    Ok(Point::new(x, y))
}

impl FromStr for Step {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (verb, arg) = s.split_once(':').unwrap_or((s, ""));
        match verb {
            "tick" if arg.is_empty() => Ok(Self::Tick),
            "move" => Ok(Self::Move(parse_point(arg)?)),
            "click" => Ok(Self::Click(parse_point(arg)?)),
            "key" => Ok(Self::Key(arg.parse()?)),
            "wait" => arg
                .parse()
                .map(|ms| Self::Wait(Duration::from_millis(ms)))
                .map_err(|_| Error::Parse(format!("invalid wait: {arg:?}"))),
            _ => Err(Error::Parse(format!("unknown step: {s:?}"))),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(p) => write!(f, "move:{},{}", p.x, p.y),
            Self::Click(p) => write!(f, "click:{},{}", p.x, p.y),
            Self::Key(k) => write!(f, "key:{k}"),
            Self::Wait(d) => write!(f, "wait:{}", d.as_millis()),
            Self::Tick => f.write_str("tick"),
        }
    }
}

/// Observable session state.
#[derive(Debug, Default)]
struct Session {
    /// Change notifications.
    subject: Subject,
    /// Where the hub is.
    location: String,
    /// Game entries so far.
    rounds: u32,
    /// Is the game paused?
    paused: bool,
}

impl Model for Session {
    fn subject_mut(&mut self) -> &mut Subject {
        &mut self.subject
    }

    fn state(&self) -> Snapshot {
        Snapshot::new()
            .with("location", self.location.as_str())
            .with("rounds", self.rounds)
            .with("paused", self.paused)
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Frames run.
    pub frames: usize,
    /// Frames that presented something.
    pub presents: usize,
    /// Hub location at the end.
    pub location: String,
    /// Game entries.
    pub rounds: u32,
    /// Did the script end with a quit?
    pub quit: bool,
    /// Session changes seen by the observer, in order.
    pub changes: Vec<String>,
}

/// The demo application.
pub struct Demo {
    /// The scene.
    scene: Scene,
    /// View switcher.
    hub: TypedId<Hub>,
    /// Countdown label in the game view.
    label: TypedId<Text>,
    /// Simulated time.
    clock: ManualClock,
    /// Round countdown.
    countdown: CountdownTimer<ManualClock>,
    /// Session model.
    session: Session,
    /// Observer log shared with the session.
    changes: Rc<RefCell<Vec<String>>>,
    /// Frames run.
    frames: usize,
    /// Frames that presented.
    presents: usize,
    /// Set by a quit message.
    quit: bool,
}

impl Demo {
    /// Build the scene described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let size = config.window_size();
        let mut scene = Scene::new(MemoryBackend::new(size), size)?;
        scene.set_keymap(config.keymap()?);
        let root = scene.root();
        scene.style_add(root, &config.style())?;

        let hub = scene.add(Hub::new(size))?;
        scene.register(root, hub.into())?;
        scene.set_key_listener(root, Some(hub.id()))?;

        let menu = scene.add(Menu::new(Expanse::new(size.w / 2, size.h * 5 / 6)))?;
        scene.with_widget(menu, |m: &mut Menu, ctx| {
            m.add_button(ctx, "Play", Message::enter("game"))?;
            m.add_button(ctx, "Help", Message::enter("help"))?;
            m.add_button(ctx, "Quit", AppCommand::Quit)
        })?;

        let game = scene.create(Container::new(
            Props::new(300, 200)
                .at(size.w as i32 - 350, 50)
                .typable(true),
        ))?;
        let font = config.font().unwrap_or(DEFAULT_FONT);
        let label = scene.add(Text::new("ready").with_font(font).with_color(Color::WHITE))?;
        scene.register(game, label.into())?;
        scene.set_pos(label.id(), Point::new(10, 10))?;

        let help = scene.create(
            Container::new(
                Props::new(size.w / 2, size.h / 2).at(size.w as i32 / 4, size.h as i32 / 4),
            )
            .with_fill(Color::grey(40)),
        )?;
        let text = scene.create(Text::new("esc returns to the menu").with_font(font))?;
        scene.register(help, text)?;

        scene.with_widget(hub, |h: &mut Hub, ctx| {
            h.register_center(ctx, menu.id())?;
            h.register_node(ctx, "game", game)?;
            h.register_node(ctx, "help", help)
        })?;

        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut session = Session {
            location: "menu".into(),
            ..Session::default()
        };
        let sink = Rc::clone(&changes);
        session.subject.add_observer(move |c: &StateChange| {
            let attrs = c.changed_attrs().join(",");
            info!(%attrs, state = %c.after, "session changed");
            sink.borrow_mut().push(attrs);
        });

        let clock = ManualClock::new();
        Ok(Self {
            scene,
            hub,
            label,
            countdown: CountdownTimer::with_clock(clock.clone()),
            clock,
            session,
            changes,
            frames: 0,
            presents: 0,
            quit: false,
        })
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Run steps until the script ends or a quit arrives.
    pub fn run(&mut self, steps: &[Step]) -> Result<Summary> {
        for step in steps {
            if self.quit {
                break;
            }
            debug!(%step, "step");
            self.step(step)?;
        }
        Ok(Summary {
            frames: self.frames,
            presents: self.presents,
            location: self.session.location.clone(),
            rounds: self.session.rounds,
            quit: self.quit,
            changes: self.changes.borrow().clone(),
        })
    }

    /// Apply one step.
    fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Move(p) => self.move_to(*p, Buttons::NONE)?,
            Step::Click(p) => {
                self.move_to(*p, Buttons::NONE)?;
                for event in [
                    Event::MouseDown {
                        pos: *p,
                        button: MouseButton::Left,
                    },
                    Event::MouseUp {
                        pos: *p,
                        button: MouseButton::Left,
                    },
                ] {
                    self.scene.handle_event(event)?;
                }
            }
            Step::Key(k) => {
                self.scene.handle_event(Event::KeyDown(*k))?;
                self.scene.handle_event(Event::KeyUp(*k))?;
            }
            Step::Wait(d) => self.clock.advance(*d),
            Step::Tick => self.frame()?,
        }
        self.drain()
    }

    /// Synthesize pointer motion from the current position.
    fn move_to(&mut self, p: Point, buttons: Buttons) -> Result<()> {
        let start = self.scene.pointer().pos;
        self.scene.handle_event(Event::MouseMove {
            start,
            end: p,
            buttons,
        })
    }

    /// One frame: advance the clock, refresh the label, tick the scene and
    /// the session.
    fn frame(&mut self) -> Result<()> {
        self.clock.advance(FRAME);
        let remaining = self.countdown.remaining();
        let label = if self.countdown.expired() {
            "time".to_string()
        } else {
            remaining.to_string()
        };
        self.scene
            .with_widget(self.label, |t: &mut Text, ctx| t.set_text(ctx, label))?;
        self.frames += 1;
        if self.scene.tick()? {
            self.presents += 1;
        }
        self.session.tick();
        Ok(())
    }

    /// The hub's location by name.
    fn location(&self) -> String {
        let Ok(hub) = self.scene.widget_ref::<Hub>(self.hub) else {
            return String::new();
        };
        match hub.location() {
            Some(loc) if Some(loc) == hub.center() => "menu".into(),
            Some(loc) => hub
                .names()
                .find(|n| hub.node(n.as_str()) == Some(loc))
                .map(ToString::to_string)
                .unwrap_or_default(),
            None => String::new(),
        }
    }

    /// Act on messages nothing in the tree handled.
    fn drain(&mut self) -> Result<()> {
        let location = self.location();
        if location == "game" && self.session.location != "game" {
            self.session.rounds += 1;
            self.countdown.start(Time::new(0, 0, 0, ROUND_SECS, 0));
        }
        for message in self.scene.take_messages() {
            match message {
                Message::App(AppCommand::Quit) => {
                    info!("quit");
                    self.quit = true;
                }
                Message::App(AppCommand::Restart) => {
                    self.countdown.restart();
                }
                Message::App(AppCommand::TogglePause) => self.toggle_pause()?,
                Message::Hub(HubCommand::Exit) => debug!("already at the menu"),
                Message::Hub(HubCommand::Enter(name)) => warn!(%name, "no such view"),
            }
        }
        self.session.location = location;
        Ok(())
    }

    /// Pause or resume the hub and the countdown.
    fn toggle_pause(&mut self) -> Result<()> {
        let hub = self.hub.id();
        if self.session.paused {
            self.scene.unpause(hub)?;
            self.countdown.unpause();
        } else {
            self.scene.pause(hub)?;
            self.countdown.pause();
        }
        self.session.paused = !self.session.paused;
        Ok(())
    }
}

impl fmt::Debug for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Demo")
            .field("frames", &self.frames)
            .field("location", &self.session.location)
            .field("quit", &self.quit)
            .finish()
    }
}
