//! soundmask - ambient masking sounds from the terminal
//!
//! # Usage
//!
//! ```bash
//! soundmask
//! soundmask --sound rain --volume 60 --timer 90
//! soundmask --assets ./sounds --settings-dir /tmp/soundmask
//! RUST_LOG=soundmask=debug soundmask
//! ```
//!
//! Commands are read from stdin, one per line. An empty line toggles playback.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;

use soundmask::player::WARNING_PROMPT;
use soundmask::settings::TIMER_CHOICES;
use soundmask::{
    AssetDir, CpalDevice, DefaultOutput, FileStore, Player, Resolver, Settings, SoundClass, Tick,
    TickClock, VoiceState,
};

/// Blocks rendered ahead of real time.
const LEAD_BLOCKS: u64 = 6;
/// Falling further behind than this skips ahead instead of bursting.
const MAX_BEHIND_BLOCKS: u64 = 64;
const BLOCK_LEN: f64 = 64.0;

#[derive(Parser)]
#[command(name = "soundmask")]
#[command(author, version, about = "Procedural ambient sounds to mask bathroom noise")]
struct Args {
    /// Sound to play: water, rain, birds, bubble or white-noise
    #[arg(long)]
    sound: Option<SoundClass>,

    /// Volume in percent
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    volume: Option<u8>,

    /// Auto-stop after this many seconds (0, 10, 15, 30, 60, 90, 120, 180 or 300)
    #[arg(long, value_parser = parse_timer)]
    timer: Option<u32>,

    /// Directory holding the settings file (default: the user config directory)
    #[arg(long)]
    settings_dir: Option<PathBuf>,

    /// Directory of recorded Ogg Vorbis sounds, used when present
    #[arg(long, default_value = "sounds")]
    assets: PathBuf,

    /// List output devices and exit
    #[arg(long)]
    list_devices: bool,
}

fn parse_timer(s: &str) -> Result<u32, String> {
    let secs: u32 = s.parse().map_err(|_| format!("`{s}` is not a number of seconds"))?;
    if TIMER_CHOICES.contains(&secs) {
        Ok(secs)
    } else {
        Err(format!("timer must be one of {TIMER_CHOICES:?}"))
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Toggle,
    Stop,
    Volume(u8),
    Sound(SoundClass),
    Timer(u32),
    Warn,
    Dark,
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(Command::Toggle);
    };
    let arg = words.next();

    match (cmd, arg) {
        ("play" | "p", None) => Ok(Command::Toggle),
        ("stop" | "s", None) => Ok(Command::Stop),
        ("vol" | "volume", Some(v)) => match v.parse::<u8>() {
            Ok(v) if v <= 100 => Ok(Command::Volume(v)),
            _ => Err(format!("volume must be 0-100, got `{v}`")),
        },
        ("sound", Some(s)) => match s.parse::<SoundClass>() {
            Ok(class) if class.is_ambience() => Ok(Command::Sound(class)),
            Ok(class) => Err(format!("`{class}` is not an ambience sound, use `warn`")),
            Err(err) => Err(err.to_string()),
        },
        ("timer", Some(t)) => parse_timer(t).map(Command::Timer),
        ("warn" | "w", None) => Ok(Command::Warn),
        ("dark", None) => Ok(Command::Dark),
        ("status", None) => Ok(Command::Status),
        ("help" | "?", None) => Ok(Command::Help),
        ("quit" | "q" | "exit", None) => Ok(Command::Quit),
        _ => Err(format!("unknown command `{}`, try `help`", line.trim())),
    }
}

const HELP: &str = "\
commands:
  <enter> | play     start or stop the ambience
  stop               stop the ambience
  vol <0-100>        set the volume
  sound <name>       water, rain, birds, bubble, white-noise
  timer <secs>       auto-stop after 0 (off), 10, 15, 30, 60, 90, 120, 180, 300
  warn               start or stop the warning sound (asks first)
  dark               toggle the dark theme preference
  status             show the current state
  quit               exit";

/// Keeps the engine fed a few blocks ahead of wall-clock time.
struct Pacer {
    start: Instant,
    blocks: u64,
}

impl Pacer {
    fn new() -> Self {
        Self { start: Instant::now(), blocks: 0 }
    }

    fn pump<F: soundmask::Fetch>(&mut self, player: &mut Player<DefaultOutput, F>, sample_rate: u32) {
        let due = (self.start.elapsed().as_secs_f64() * sample_rate as f64 / BLOCK_LEN) as u64 + LEAD_BLOCKS;
        if due > self.blocks + MAX_BEHIND_BLOCKS {
            tracing::debug!(skipped = due - self.blocks, "audio pump fell behind");
            self.blocks = due - LEAD_BLOCKS;
        }
        while self.blocks < due {
            player.process();
            self.blocks += 1;
        }
    }
}

/// The line typed after the warning prompt answers it.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y" | "yes")
}

/// A confirmation whose answer was collected earlier.
fn answered(answer: bool) -> impl FnMut(&str) -> bool {
    move |_: &str| answer
}

fn print_status(player: &Player<DefaultOutput, AssetDir>, settings: &Settings) {
    println!(
        "{} | sound {} | volume {}% | timer {} | theme {}",
        if player.is_playing() { "playing" } else { "stopped" },
        player.sound(),
        settings.volume,
        match player.remaining() {
            Some(secs) => format!("{secs}s left"),
            None if player.timer_secs() == 0 => "off".to_owned(),
            None => format!("{}s", player.timer_secs()),
        },
        if settings.dark_mode { "dark" } else { "light" },
    );
    if !player.status().is_empty() {
        println!("{}", player.status());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("soundmask=info")),
        )
        .init();

    let args = Args::parse();

    if args.list_devices {
        for (i, device) in CpalDevice::list_outputs().iter().enumerate() {
            println!("[{}] {} ({} Hz, {} ch)", i, device.name(), device.sample_rate(), device.channels());
        }
        return Ok(());
    }

    let settings_dir = args
        .settings_dir
        .or_else(|| {
            directories::ProjectDirs::from("io", "soundmask", "soundmask")
                .map(|dirs| dirs.config_dir().to_path_buf())
        })
        .unwrap_or_else(|| PathBuf::from("."));
    let mut store = FileStore::new(&settings_dir);
    let mut settings = Settings::load(&store);

    if let Some(sound) = args.sound.filter(|s| s.is_ambience()) {
        settings.sound_type = sound;
    }
    if let Some(volume) = args.volume {
        settings.volume = volume;
    }
    if let Some(timer) = args.timer {
        settings.timer = timer;
    }
    if let Err(err) = settings.save(&mut store) {
        tracing::warn!(%err, path = %store.path().display(), "failed to save settings");
    }
    tracing::debug!(path = %store.path().display(), ?settings, "settings loaded");

    let mut player = Player::with_resolver(DefaultOutput, Resolver::new(AssetDir::new(&args.assets)));
    player.apply_settings(&settings);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let (tx, lines) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("soundmask: press enter to play or stop, `help` for commands");
    print_status(&player, &settings);

    let mut pacer: Option<Pacer> = None;
    let mut clock = TickClock::new();
    // Audio keeps playing while the prompt waits for its answer
    let mut awaiting_warning = false;

    while running.load(Ordering::SeqCst) {
        match lines.try_recv() {
            Ok(line) if awaiting_warning => {
                awaiting_warning = false;
                if let Err(err) = player.play_warning(&mut answered(is_yes(&line))) {
                    println!("{err}");
                }
                print_status(&player, &settings);
            }
            Ok(line) => {
                let command = match parse_command(&line) {
                    Ok(command) => command,
                    Err(msg) => {
                        println!("{msg}");
                        continue;
                    }
                };

                let mut changed = false;
                let result = match command {
                    Command::Toggle => {
                        clock.reset();
                        player.toggle()
                    }
                    Command::Stop => {
                        player.stop();
                        Ok(())
                    }
                    Command::Volume(v) => {
                        settings.volume = v;
                        player.set_volume(settings.gain());
                        changed = true;
                        Ok(())
                    }
                    Command::Sound(class) => {
                        settings.sound_type = class;
                        changed = true;
                        clock.reset();
                        player.select_sound(class)
                    }
                    Command::Timer(secs) => {
                        settings.timer = secs;
                        player.set_timer(secs);
                        changed = true;
                        Ok(())
                    }
                    Command::Warn if player.alarm_state() == VoiceState::Idle => {
                        println!("{WARNING_PROMPT}\n[y/N] ");
                        awaiting_warning = true;
                        Ok(())
                    }
                    // A playing alarm is stopped without asking
                    Command::Warn => player.play_warning(&mut answered(false)),
                    Command::Dark => {
                        settings.dark_mode = !settings.dark_mode;
                        changed = true;
                        Ok(())
                    }
                    Command::Status => Ok(()),
                    Command::Help => {
                        println!("{HELP}");
                        Ok(())
                    }
                    Command::Quit => break,
                };

                if let Err(err) = result {
                    println!("{err}");
                }
                if changed {
                    if let Err(err) = settings.save(&mut store) {
                        tracing::warn!(%err, "failed to save settings");
                    }
                }
                if !awaiting_warning {
                    print_status(&player, &settings);
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        for _ in 0..clock.poll() {
            match player.tick() {
                Tick::Running(secs) => println!("{secs}"),
                Tick::Expired => {
                    println!("time is up");
                    print_status(&player, &settings);
                }
                Tick::Idle => {}
            }
        }

        if let Some(sample_rate) = player.engine().map(|engine| engine.sample_rate()) {
            pacer.get_or_insert_with(Pacer::new).pump(&mut player, sample_rate);
        }

        std::thread::sleep(Duration::from_micros(500));
    }

    player.shutdown();
    Ok(())
}
