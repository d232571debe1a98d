use chrono::NaiveDate;
use std::io::{self, Write};
use termion::raw::IntoRawMode;
use termion::screen::AlternateScreen;
use termion::{clear, cursor};

use crate::cmds::Cmd;
use crate::config::Config;
use crate::error::Result;
use crate::events::{Dispatcher, Event};

use super::calendar_view::{CalendarView, Direction, SelectionSink};
use super::render;

pub type Clock = Box<dyn Fn() -> NaiveDate + Send>;

/// Interactive month browser. Owns the view; "now" is pulled from `clock`
/// on every tick so the today marker follows the date across midnight.
/// Selected days go to `sink` and are echoed in the status line.
pub struct App<'a> {
    config: &'a Config,
    view: CalendarView,
    clock: Clock,
    sink: Box<dyn SelectionSink + 'a>,
    status: Option<String>,
}

impl<'a> App<'a> {
    const FOOTER: &'static str =
        "h/l: month  H/L: year  j/k: day  enter: select  t: today  q: quit";

    pub fn new(
        config: &'a Config,
        view: CalendarView,
        clock: Clock,
        sink: Box<dyn SelectionSink + 'a>,
    ) -> App<'a> {
        App {
            config,
            view,
            clock,
            sink,
            status: None,
        }
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Applies `cmd` to the view. Returns `Ok(false)` once the app should quit.
    pub fn send_cmd(&mut self, cmd: Cmd) -> Result<bool> {
        log::debug!("Command: {}", cmd);
        match cmd {
            Cmd::NextMonth => self.view.change_month(Direction::Next),
            Cmd::PrevMonth => self.view.change_month(Direction::Prev),
            Cmd::NextYear => self.view.change_year(Direction::Next),
            Cmd::PrevYear => self.view.change_year(Direction::Prev),
            Cmd::NextDay => self.view.move_focus(Direction::Next),
            Cmd::PrevDay => self.view.move_focus(Direction::Prev),
            Cmd::Select => {
                if let Some(event) = self.view.select_focused()? {
                    self.status = Some(event.to_string());
                    self.sink.on_select(event);
                }
            }
            Cmd::Today => self.view.reset_to_today(),
            Cmd::Exit => return Ok(false),
            Cmd::Noop => {}
        }
        Ok(true)
    }

    /// Returns `Ok(false)` once the app should quit.
    pub fn handle(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Update => {
                self.view.set_now((self.clock)())?;
                Ok(true)
            }
            Event::Input(key) => {
                let cmd = self.config.cmd_for(&key);
                self.send_cmd(cmd)
            }
        }
    }

    pub fn draw<W: Write>(&self, out: &mut W) -> Result<()> {
        let grid = self.view.render()?;
        let lines = render::to_lines(&grid, &self.config.theme, &self.config.display);

        write!(out, "{}{}", clear::All, cursor::Goto(1, 1))?;
        for line in lines {
            write!(out, "{}\r\n", line)?;
        }
        write!(out, "\r\n{}\r\n", self.status.as_deref().unwrap_or(""))?;
        write!(out, "{}\r\n", Self::FOOTER)?;
        out.flush()?;

        Ok(())
    }

    pub fn run(&mut self, dispatcher: Dispatcher) -> Result<()> {
        let stdout = io::stdout().into_raw_mode()?;
        let mut screen = AlternateScreen::from(stdout);
        write!(screen, "{}", cursor::Hide)?;

        let result = self.event_loop(&dispatcher, &mut screen);

        write!(screen, "{}", cursor::Show)?;
        screen.flush()?;

        result
    }

    fn event_loop<W: Write>(&mut self, dispatcher: &Dispatcher, out: &mut W) -> Result<()> {
        self.draw(out)?;

        while let Ok(event) = dispatcher.next() {
            let is_input = matches!(event, Event::Input(_));
            let today = self.view.today();
            if !self.handle(event)? {
                break;
            }
            if is_input || today != self.view.today() {
                self.draw(out)?;
            }
        }

        Ok(())
    }
}
