extern crate ethcal as lib;

use chrono::{Datelike, Local, NaiveDate};
use flexi_logger::{FileSpec, Logger};
use lib::calendar::{self, EthiopianDate, EthiopianMonth};
use lib::error::{Error, ErrorKind};
use lib::events::Dispatcher;
use lib::ui::{render, App, CalendarCursor, CalendarView, SelectionEvent, SelectionSink};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ethcal",
    about = "Ethiopian calendar month view and date converter."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,

    #[structopt(
        short = "d",
        long = "date",
        help = "Gregorian date (YYYY-MM-DD) to use as today"
    )]
    pub date: Option<String>,

    #[structopt(
        short = "m",
        long = "month",
        help = "Ethiopian month to display, by number or name"
    )]
    pub month: Option<EthiopianMonth>,

    #[structopt(short = "y", long = "year", help = "Ethiopian year to display")]
    pub year: Option<i32>,

    #[structopt(long = "select", help = "select a day of the displayed month")]
    pub select: Option<u8>,

    #[structopt(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(about = "convert a Gregorian date (YYYY-MM-DD) to the Ethiopian calendar")]
    ToEthiopian { date: String },
    #[structopt(about = "convert an Ethiopian date to the Gregorian calendar")]
    ToGregorian {
        year: i32,
        month: EthiopianMonth,
        day: u32,
    },
}

struct PrintSink;

impl SelectionSink for PrintSink {
    fn on_select(&mut self, event: SelectionEvent) {
        log::info!("{}", event);
        println!("{}", event);
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, Error> {
    Ok(NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")?)
}

fn convert(cmd: Command) -> Result<(), Error> {
    match cmd {
        Command::ToEthiopian { date } => {
            let date = parse_date(&date)?;
            let eth = calendar::to_ethiopian(date.year(), date.month(), date.day())?;
            println!("{} ({} {}, {})", eth, eth.month_name(), eth.day(), eth.year());
        }
        Command::ToGregorian { year, month, day } => {
            let greg = calendar::to_gregorian(year, month.number_from_month() as u32, day)?;
            println!("{} ({})", greg, greg.format("%A, %B %-d, %Y"));
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &'static str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let interactive = args.cmd.is_none() && !args.show && args.select.is_none();

    // stderr output would corrupt the alternate screen
    let level = if interactive && args.log_file.is_none() {
        "warn"
    } else {
        DEFAULT_LOG_LEVEL
    };

    let mut logger = Logger::try_with_env_or_str(level)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        println!("ethcal ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    if let Some(cmd) = args.cmd {
        return Ok(convert(cmd)?);
    }

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let now = match &args.date {
        Some(date) => parse_date(date)?,
        None => Local::now().date_naive(),
    };

    let mut view = CalendarView::new(now)?;
    if args.month.is_some() || args.year.is_some() {
        let today = view.today();
        let month = args.month.unwrap_or_else(|| today.month_name());
        view.set_cursor(CalendarCursor::new(args.year.unwrap_or(today.year()), month));
    }

    if !interactive {
        let grid = view.render()?;
        for line in render::to_lines(&grid, &config.theme, &config.display) {
            println!("{}", line);
        }

        if let Some(day) = args.select {
            let cursor = view.cursor();
            let cell = grid.cell(day).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidDate,
                    &format!("{} has no day {}", cursor, day),
                )
            })?;
            if !cell.is_selectable() {
                let date = EthiopianDate::from_ymd(cursor.year(), cursor.month(), day)?;
                return Err(Error::new(
                    ErrorKind::InvalidArgument,
                    &format!("{} lies in the future", date),
                )
                .into());
            }
            let event = view.select_day(cursor.year(), cursor.month(), day)?;
            PrintSink.on_select(event);
        }

        return Ok(());
    }

    let dispatcher = Dispatcher::from_config(&config);
    let mut selected = Vec::new();
    {
        let mut app = App::new(
            &config,
            view,
            Box::new(|| Local::now().date_naive()),
            Box::new(|event: SelectionEvent| selected.push(event)),
        );
        app.run(dispatcher)?;
    }

    // the alternate screen is gone now, report selections on the main one
    for event in selected {
        PrintSink.on_select(event);
    }

    Ok(())
}
