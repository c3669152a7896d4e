use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use greeting::album::{self, DirectorySupplier, Slideshow};
use greeting::audio::{self, Music};
use greeting::canvas::Canvas;
use greeting::color::Rgb;
use greeting::config::Config;
use greeting::scene::Director;
use greeting::surface::Surface;
use greeting::Error;
use std::env;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn print_usage() {
    eprintln!("greeting - Animated terminal greeting with a photo album and fireworks");
    eprintln!();
    eprintln!("Usage: greeting [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config PATH          Load settings from a TOML file");
    eprintln!("  --photos DIR           Directory holding photo1.jpg, photo2.jpg, ...");
    eprintln!("  --music PATH           Background track (needs the `audio` feature)");
    eprintln!("  --bg-color RRGGBB      Set background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!("  --album-duration SECS  How long the album plays before the fireworks");
    eprintln!("  --seed N               Fixed random seed for a reproducible show");
    eprintln!("  --log-file PATH        Write logs (RUST_LOG, default info) to a file");
    eprintln!();
    eprintln!("Press any key or click to start, 'm' to toggle music.");
    eprintln!("Press 'q', ESC, or Ctrl+C to exit");
}

/// Command-line values that override the config file.
#[derive(Default)]
struct Options {
    config: Option<PathBuf>,
    photos: Option<PathBuf>,
    music: Option<PathBuf>,
    bg_color: Option<String>,
    album_duration: Option<f32>,
    seed: Option<u64>,
    log_file: Option<PathBuf>,
}

impl Options {
    /// `None` means help was requested.
    fn parse(args: &[String]) -> Result<Option<Self>, Error> {
        let mut options = Options::default();

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            if matches!(flag, "help" | "--help" | "-h") {
                return Ok(None);
            }

            let value = args
                .get(i + 1)
                .ok_or_else(|| Error::Usage(format!("{flag} requires a value")))?;

            match flag {
                "--config" => options.config = Some(value.into()),
                "--photos" => options.photos = Some(value.into()),
                "--music" => options.music = Some(value.into()),
                "--log-file" => options.log_file = Some(value.into()),
                "--bg-color" => {
                    if Rgb::from_hex(value).is_none() {
                        return Err(Error::InvalidColor(value.clone()));
                    }
                    options.bg_color = Some(value.clone());
                }
                "--album-duration" => {
                    let secs = value
                        .parse::<f32>()
                        .ok()
                        .filter(|secs| *secs >= 0.0)
                        .ok_or_else(|| Error::Usage(format!("invalid duration: {value}")))?;
                    options.album_duration = Some(secs);
                }
                "--seed" => {
                    let seed = value
                        .parse()
                        .map_err(|_| Error::Usage(format!("invalid seed: {value}")))?;
                    options.seed = Some(seed);
                }
                _ => return Err(Error::Usage(format!("Unknown option: {flag}"))),
            }
            i += 2;
        }

        Ok(Some(options))
    }

    fn apply(self, config: &mut Config) {
        if let Some(dir) = self.photos {
            config.photos.dir = dir;
        }
        if let Some(track) = self.music {
            config.music.track = Some(track);
        }
        if let Some(hex) = self.bg_color {
            config.display.bg_color = Some(hex);
        }
        if let Some(secs) = self.album_duration {
            config.timing.album_duration_secs = secs;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), Error> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        if env::var_os("RUST_LOG").is_none() {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    builder.init();
    Ok(())
}

fn run_show(mut director: Director, config: &Config, background: Rgb) -> std::io::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All), EnableMouseCapture)?;

    let (cols, rows) = terminal::size()?;
    let mut canvas = Canvas::new(cols as usize, rows as usize * 2, config.display.pixel_scale, background);
    director.resize(canvas.width(), canvas.height());

    let result = event_loop(&mut stdout, &mut director, &mut canvas);
    director.stop();

    execute!(stdout, Show, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal::disable_raw_mode()?;

    result
}

fn event_loop<W: Write>(stdout: &mut W, director: &mut Director, canvas: &mut Canvas) -> std::io::Result<()> {
    let start = Instant::now();
    let mut last_frame = start;
    let mut accumulator = 0.0f32;
    const FIXED_DT: f32 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            let now = start.elapsed();
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    if matches!(key_event.code, KeyCode::Char('m') | KeyCode::Char('M')) {
                        director.toggle_music(now);
                    } else {
                        director.begin(now);
                    }
                }
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                    director.begin(now);
                }
                Event::Resize(cols, rows) => {
                    canvas.resize(cols as usize, rows as usize * 2);
                    director.resize(canvas.width(), canvas.height());
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let instant = Instant::now();
        let frame_time = instant.duration_since(last_frame).as_secs_f32();
        last_frame = instant;

        let now = instant.duration_since(start);
        director.poll(now);

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        let mut steps = 0;
        while accumulator >= FIXED_DT {
            accumulator -= FIXED_DT;
            steps += 1;
        }

        if steps > 0 {
            for _ in 0..director.frames_for(steps) {
                director.frame(canvas, now);
            }
            canvas.present(stdout, &director.captions(now))?;
        }
    }

    Ok(())
}

fn run() -> Result<(), Error> {
    let args: Vec<String> = env::args().collect();
    let Some(options) = Options::parse(&args)? else {
        print_usage();
        return Ok(());
    };

    init_logging(options.log_file.as_ref())?;

    let mut config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    options.apply(&mut config);
    let background = config.display.background()?;

    let rng = match config.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    eprintln!("Loading photos...");
    let slides = album::preload(&mut DirectorySupplier::new(config.photos.clone()));
    let music = Music::new(audio::default_player(config.music.track.clone()), config.music.volume);
    let director = Director::new(&config, Slideshow::new(slides), music, rng).with_background(background);

    run_show(director, &config, background)?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        if matches!(err, Error::Usage(_) | Error::InvalidColor(_)) {
            eprintln!();
            print_usage();
        }
        std::process::exit(1);
    }
}
