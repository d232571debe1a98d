use crate::config;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use termion::event::Key;
use termion::input::TermRead;

use config::Config;

pub enum Event {
    Input(Key),
    Update,
}

/// Merges terminal key presses and periodic ticks into one channel. Ticks
/// drive the refresh of "today" while the calendar stays open.
pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    _input_handle: thread::JoinHandle<()>,
    _update_handle: thread::JoinHandle<()>,
}

impl Dispatcher {
    pub fn from_config(config: &Config) -> Dispatcher {
        Self::with_tick_rate(config.tick_rate())
    }

    pub fn with_tick_rate(tick_rate: Duration) -> Dispatcher {
        let (tx, rx) = mpsc::channel();
        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                let stdin = stdin.lock();
                for key in stdin.keys() {
                    match key {
                        Ok(key) => {
                            if tx.send(Event::Input(key)).is_err() {
                                return;
                            }
                        }
                        Err(err) => log::warn!("Could not read key: {}", err),
                    }
                }
            })
        };
        let update_handle = thread::spawn(move || loop {
            if tx.send(Event::Update).is_err() {
                return;
            }
            thread::sleep(tick_rate);
        });
        Dispatcher {
            rx,
            _input_handle: input_handle,
            _update_handle: update_handle,
        }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
